//! Property tests over whole seeded games.
//!
//! Each case deals a game and plays it to the end on one thread with random
//! deciders, checking the table invariants before every move.

mod common;

use proptest::prelude::*;
use rustc_hash::FxHashSet;

use common::{drive_game, init_logging};
use moska::agent::{build_move, Decider, PlayerView, RandomDecider};
use moska::core::{Card, GameConfig, PlayerId};
use moska::game::{Game, GameStateSnapshot, LockHolder, StateSnapshot};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Cards are conserved, the table holds no duplicates, ranks never change
    /// once given and every unfinished player has a legal move.
    #[test]
    fn prop_table_invariants(seed in any::<u64>(), players in 2usize..=6) {
        init_logging();
        let config = GameConfig::new().with_seed(seed).with_player_count(players);
        let mut seen_ranks: Vec<Option<u8>> = vec![None; players];

        let game = drive_game(config, 5_000, |guard, player| {
            guard.check_invariants().unwrap();

            let table: FxHashSet<Card> = guard.cards_to_fall().iter().copied().collect();
            assert_eq!(table.len(), guard.cards_to_fall().len());

            for (seat, rank) in guard.ranks().into_iter().enumerate() {
                if let Some(before) = seen_ranks[seat] {
                    assert_eq!(rank, Some(before), "rank of seat {seat} changed");
                }
                seen_ranks[seat] = rank;
            }

            let legal = guard.legal_moves(player).unwrap();
            assert!(!legal.is_empty());
        });

        let guard = game.acquire(LockHolder::Coordinator).unwrap();
        let mut ranks: Vec<u8> = guard.ranks().into_iter().flatten().collect();
        ranks.sort_unstable();
        prop_assert_eq!(ranks, (1..=players as u8).collect::<Vec<_>>());
    }

    /// Mocking a random legal move leaves every field as it was.
    #[test]
    fn prop_mock_is_exact(seed in any::<u64>(), players in 2usize..=4) {
        init_logging();
        let config = GameConfig::new().with_seed(seed).with_player_count(players);
        let mut probe = RandomDecider::new(seed.wrapping_add(1), PlayerId::new(0));

        drive_game(config, 5_000, |guard, player| {
            let before = StateSnapshot::capture(&**guard);
            let view_before = GameStateSnapshot::from_core(&**guard);
            let legal = guard.legal_moves(player).unwrap();
            let mv = {
                let mut view = PlayerView::new(&mut *guard, player);
                let kind = probe.choose_move(&mut view, &legal);
                build_move(kind, &mut view, &mut probe).unwrap()
            };

            if let Err(err) = guard.mock(player, &mv) {
                assert!(err.is_recoverable(), "{err}");
            }
            assert_eq!(StateSnapshot::capture(&**guard).diff(&before), None);
            assert_eq!(GameStateSnapshot::from_core(&**guard), view_before);
        });
    }

    /// State vectors always have the documented width.
    #[test]
    fn prop_state_vector_width(seed in any::<u64>(), players in 2usize..=7) {
        let config = GameConfig::new().with_seed(seed).with_player_count(players);
        let game = Game::new(config).unwrap();
        let guard = game.acquire(LockHolder::Coordinator).unwrap();
        let snapshot = GameStateSnapshot::from_core(&guard);

        for player in guard.players() {
            prop_assert_eq!(
                snapshot.as_vector(player, true).len(),
                GameStateSnapshot::vector_len(players)
            );
        }
    }
}


//! Mock moves roll back exactly and report what a commit would produce.

mod common;

use common::{c, drive_game, init_logging, p};
use moska::agent::{build_move, PlayerView, RandomDecider};
use moska::core::{GameConfig, Suit};
use moska::error::GameError;
use moska::game::{Game, GameStateSnapshot, LockHolder, StateSnapshot, TableSetup};
use moska::rules::{Move, MoveKind};

fn midgame() -> TableSetup {
    let hands = vec![
        vec![c(Suit::Hearts, 9), c(Suit::Spades, 3), c(Suit::Clubs, 5)],
        vec![c(Suit::Clubs, 4), c(Suit::Diamonds, 5)],
        vec![c(Suit::Diamonds, 11), c(Suit::Clubs, 13)],
    ];
    TableSetup::new(hands, c(Suit::Spades, 7))
        .with_cards_to_fall(vec![c(Suit::Hearts, 5), c(Suit::Diamonds, 9)])
        .with_fell_cards(vec![c(Suit::Clubs, 2), c(Suit::Clubs, 8)])
        .with_deck(vec![c(Suit::Diamonds, 6), c(Suit::Hearts, 12), c(Suit::Diamonds, 14)])
        .with_ready(p(2))
}

/// The mocked position is the one a real commit reaches.
#[test]
fn test_mock_matches_commit() {
    init_logging();
    let moves = [
        (
            p(0),
            Move::PlayFallFromHand {
                pairs: vec![(c(Suit::Hearts, 9), c(Suit::Hearts, 5))],
            },
        ),
        (p(0), Move::PlayFallFromDeck { fall: None }),
        (
            p(0),
            Move::PlayToSelf {
                cards: vec![c(Suit::Clubs, 5)],
            },
        ),
        (
            p(1),
            Move::PlayToOther {
                target: p(0),
                cards: vec![c(Suit::Diamonds, 5)],
            },
        ),
    ];

    for (player, mv) in moves {
        let mocked = Game::from_setup(midgame()).unwrap();
        let committed = Game::from_setup(midgame()).unwrap();

        let mut guard = mocked.acquire(LockHolder::Player(player)).unwrap();
        let before = StateSnapshot::capture(&guard);
        let predicted = guard.mock(player, &mv).unwrap();
        assert_eq!(StateSnapshot::capture(&guard).diff(&before), None, "{mv:?}");

        let mut real = committed.acquire(LockHolder::Player(player)).unwrap();
        real.propose(player, &mv).unwrap();
        assert_eq!(predicted, GameStateSnapshot::from_core(&real), "{mv:?}");
    }
}

/// A rejected mock reports the rejection and keeps the player's readiness.
#[test]
fn test_rejected_mock_changes_nothing() {
    init_logging();
    let game = Game::from_setup(midgame()).unwrap();
    let mut guard = game.acquire(LockHolder::Player(p(2))).unwrap();
    let before = StateSnapshot::capture(&guard);

    let err = guard
        .mock(
            p(2),
            &Move::PlayToOther {
                target: p(0),
                cards: vec![c(Suit::Clubs, 13)],
            },
        )
        .unwrap_err();

    assert!(matches!(
        err,
        GameError::MoveRejected {
            kind: MoveKind::PlayToOther,
            ..
        }
    ));
    assert!(guard.is_ready(p(2)));
    assert_eq!(StateSnapshot::capture(&guard).diff(&before), None);
    assert_eq!(guard.moves_committed(), 0);
}

/// Every legal kind, mocked at every decision point of whole games.
#[test]
fn test_mock_rolls_back_throughout_games() {
    init_logging();
    for seed in 0..6 {
        let config = GameConfig::new().with_seed(seed).with_player_count(3);
        let mut probe = RandomDecider::new(seed ^ 0xA5A5, p(0));
        let mut mocked = 0usize;

        let game = drive_game(config, 5_000, |guard, player| {
            let before = StateSnapshot::capture(&**guard);
            let legal = guard.legal_moves(player).unwrap();
            for kind in legal.iter() {
                let mv = {
                    let mut view = PlayerView::new(&mut *guard, player);
                    build_move(kind, &mut view, &mut probe).unwrap()
                };
                match guard.mock(player, &mv) {
                    Ok(_) => mocked += 1,
                    Err(err) => assert!(err.is_recoverable(), "seed {seed}: {err}"),
                }
                assert_eq!(
                    StateSnapshot::capture(&**guard).diff(&before),
                    None,
                    "seed {seed}: {mv:?}"
                );
            }
        });

        assert!(mocked > 0);
        let guard = game.acquire(LockHolder::Coordinator).unwrap();
        assert!(guard.players().all(|pl| guard.rank(pl).is_some()), "seed {seed}");
    }
}

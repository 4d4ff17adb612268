//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::Once;

use moska::agent::{take_turn, Decider, RandomDecider};
use moska::core::{Card, GameConfig, PlayerId, Suit};
use moska::game::{Game, GameGuard, LockHolder};
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Route engine logs to the test harness.
///
/// Filter comes from `TEST_LOG`, then `RUST_LOG`, then defaults to `warn`.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string());
        fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub fn c(suit: Suit, value: u8) -> Card {
    Card::new(suit, value)
}

pub fn p(i: u8) -> PlayerId {
    PlayerId::new(i)
}

/// One seeded random decider per seat.
pub fn random_deciders(seed: u64, player_count: usize) -> Vec<Box<dyn Decider>> {
    PlayerId::all(player_count)
        .map(|player| Box::new(RandomDecider::new(seed, player)) as Box<dyn Decider>)
        .collect()
}

/// Play a dealt game on the calling thread, seats taking the lock in turn.
///
/// `before_move` sees the guard each time a seat is about to act. Returns the
/// game once everyone is ranked, or after `max_rounds` rounds.
pub fn drive_game(
    config: GameConfig,
    max_rounds: usize,
    mut before_move: impl FnMut(&mut GameGuard<'_>, PlayerId),
) -> Game {
    let game = Game::new(config.clone()).expect("valid config");
    let mut deciders: Vec<RandomDecider> = PlayerId::all(config.player_count)
        .map(|player| RandomDecider::new(config.seed, player))
        .collect();

    for _ in 0..max_rounds {
        let mut all_ranked = true;
        for player in PlayerId::all(config.player_count) {
            let mut guard = game.acquire(LockHolder::Player(player)).expect("not stopped");
            if guard.rank(player).is_none() {
                all_ranked = false;
                before_move(&mut guard, player);
            }
            take_turn(
                &mut guard,
                player,
                &mut deciders[player.index()],
                config.max_move_attempts,
            )
            .expect("random play never fails");
        }
        if all_ranked {
            break;
        }
    }
    game
}

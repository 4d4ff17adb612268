//! # moska
//!
//! A multiplayer Moska engine where every player runs on its own thread and
//! all of them share one game behind a single lock.
//!
//! ## Design Principles
//!
//! 1. **One Critical Section**: The whole table lives in one `GameCore`
//!    behind one mutex. Holding a `GameGuard` is the only way to read or
//!    change it, and a guard only acts for the player it was taken for.
//!
//! 2. **Closed Move Set**: The eight moves are one enum with one handler
//!    each. Handlers validate everything before mutating, so a rejected move
//!    changes nothing.
//!
//! 3. **Checked Rollback**: A mock move snapshots the value fields a move can
//!    touch, plays the move, restores, and fails loudly if anything did not
//!    come back.
//!
//! ## Modules
//!
//! - `core`: Cards, deck, hands, seats, turn pointer, RNG, configuration
//! - `rules`: Fall rule, moves, move handlers, legality query
//! - `monitor`: Incremental fall tracking
//! - `game`: Shared state, lock guard, snapshots, coordinator
//! - `agent`: Decision capability and the per-player loop
//! - `training`: Labelled decision-point samples

pub mod agent;
pub mod core;
pub mod error;
pub mod game;
pub mod monitor;
pub mod rules;
pub mod training;

// Re-export commonly used types
pub use crate::core::{
    Card, Deck, GameConfig, GameRng, GameRngState, Hand, PlayerId, PlayerMap, Suit, TurnCycle,
};

pub use crate::error::{GameError, GameResult};

pub use crate::rules::{check_can_fall_card, legal_moves, Move, MoveEffect, MoveKind, MoveSet};

pub use crate::monitor::CardMonitor;

pub use crate::game::{
    Coordinator, Game, GameCore, GameGuard, GameReport, GameStateSnapshot, LockHolder,
    StateSnapshot, TableSetup,
};

pub use crate::agent::{build_move, run_player, take_turn, Decider, PlayerView, RandomDecider};

pub use crate::training::{balanced_samples, write_lines, TrainingSample};

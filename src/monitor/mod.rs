//! Fall tracking.
//!
//! The [`CardMonitor`] keeps, per game, which cards each player holds and
//! which hand cards could fall each card waiting on the table. It is updated
//! incrementally from the [`MoveEffect`](crate::rules::MoveEffect) of every
//! committed move and is part of what a mock move snapshots and restores.

pub mod card_monitor;

pub use card_monitor::CardMonitor;

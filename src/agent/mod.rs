//! Players.
//!
//! A player is a [`Decider`] driven by [`run_player`] on its own thread. The
//! decider only chooses; the loop takes the lock, records decision points,
//! proposes and retries.

pub mod decider;
pub mod random;
pub mod runner;

pub use decider::{Decider, PlayerView};
pub use random::RandomDecider;
pub use runner::{build_move, run_player, take_turn};

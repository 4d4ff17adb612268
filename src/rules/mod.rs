//! The rules of Moska.
//!
//! - [`fall`]: which card beats which
//! - [`moves`]: the closed set of move kinds and their arguments
//! - [`engine`]: one validating, state-mutating handler per move
//! - [`legality`]: the move kinds a player may currently propose
//! - [`effect`]: the card transitions a committed move reports

pub mod effect;
pub mod engine;
pub mod fall;
pub mod legality;
pub mod moves;

pub use effect::MoveEffect;
pub use fall::check_can_fall_card;
pub use legality::legal_moves;
pub use moves::{Move, MoveKind, MoveSet};

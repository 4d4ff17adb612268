//! Core value types: cards, deck, hands, seats, turn pointer, RNG, configuration.
//!
//! Nothing in here knows about the rules of Moska or about locking; these are
//! the pieces the shared game state is assembled from.

pub mod card;
pub mod config;
pub mod deck;
pub mod hand;
pub mod player;
pub mod rng;
pub mod turn_cycle;

pub use card::{Card, Suit, DECK_SIZE, MAX_VALUE, MIN_VALUE};
pub use config::{GameConfig, MAX_PLAYERS, MIN_PLAYERS};
pub use deck::Deck;
pub use hand::Hand;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use turn_cycle::TurnCycle;

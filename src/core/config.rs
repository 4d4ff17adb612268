//! Game configuration.
//!
//! Everything a game run needs besides its decision-makers: seed, table
//! size, hand size and the timing knobs of the agent threads.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::card::DECK_SIZE;
use crate::error::{GameError, GameResult};

/// Fewest players at a table.
pub const MIN_PLAYERS: usize = 2;
/// Most players at a table.
pub const MAX_PLAYERS: usize = 7;

/// Configuration for one game run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the deck shuffle and the deck-lift fallback stream.
    pub seed: u64,

    /// Number of seats.
    pub player_count: usize,

    /// Cards dealt to each player, and the refill target.
    pub hand_size: usize,

    /// How long the coordinator waits for each agent to finish.
    pub join_timeout_ms: u64,

    /// Sleep before every lock acquisition, so one thread does not starve
    /// the others right after releasing.
    pub think_delay_us: u64,

    /// Consecutive rejected proposals an agent may make before it gives up.
    pub max_move_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            player_count: 4,
            hand_size: 6,
            join_timeout_ms: 3_000,
            think_delay_us: 1,
            max_move_attempts: 1_000,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_player_count(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    #[must_use]
    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_think_delay(mut self, delay: Duration) -> Self {
        self.think_delay_us = u64::try_from(delay.as_micros()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_max_move_attempts(mut self, attempts: u32) -> Self {
        self.max_move_attempts = attempts;
        self
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }

    pub fn think_delay(&self) -> Duration {
        Duration::from_micros(self.think_delay_us)
    }

    /// Check that a game with this config can be dealt.
    pub fn validate(&self) -> GameResult<()> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(GameError::InvalidConfig(format!(
                "player count must be {MIN_PLAYERS}-{MAX_PLAYERS}, got {}",
                self.player_count
            )));
        }
        if self.hand_size == 0 {
            return Err(GameError::InvalidConfig("hand size must be positive".into()));
        }
        if self.player_count * self.hand_size + 1 > DECK_SIZE {
            return Err(GameError::InvalidConfig(format!(
                "{} hands of {} do not fit in one deck",
                self.player_count, self.hand_size
            )));
        }
        if self.max_move_attempts == 0 {
            return Err(GameError::InvalidConfig(
                "max move attempts must be positive".into(),
            ));
        }
        Ok(())
    }
}

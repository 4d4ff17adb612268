//! The shared game, its lock and its coordinator.
//!
//! All mutable state lives in one [`GameCore`] behind a single mutex. A
//! [`GameGuard`] is the only way to reach it: acquiring one binds the lock to
//! a [`LockHolder`], and moves can only be proposed through the guard for the
//! player it was acquired for. Dropping the guard releases the lock.
//!
//! ```
//! use moska::core::{GameConfig, PlayerId};
//! use moska::game::{Game, LockHolder};
//! use moska::rules::MoveKind;
//!
//! let game = Game::new(GameConfig::default().with_seed(1)).unwrap();
//! let guard = game.acquire(LockHolder::Player(PlayerId::new(3))).unwrap();
//! // The last seat opens the first turn.
//! let legal = guard.legal_moves(PlayerId::new(3)).unwrap();
//! assert_eq!(legal.as_slice(), &[MoveKind::InitialPlay]);
//! ```

pub mod coordinator;
pub mod state;
pub mod snapshot;

pub use self::coordinator::{Coordinator, GameReport};
pub use self::state::{GameCore, Seat, TableSetup};
pub use self::snapshot::{GameStateSnapshot, StateSnapshot};

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::core::{GameConfig, PlayerId};
use crate::error::{GameError, GameResult};
use crate::monitor::CardMonitor;
use crate::rules::{engine, legal_moves, Move, MoveEffect, MoveSet};

/// Who holds the game lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LockHolder {
    /// Setup, tallying and any out-of-turn administration.
    Coordinator,
    Player(PlayerId),
}

impl std::fmt::Display for LockHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockHolder::Coordinator => f.write_str("Coordinator"),
            LockHolder::Player(p) => write!(f, "{p}"),
        }
    }
}

/// One game shared between player threads.
#[derive(Debug)]
pub struct Game {
    core: Mutex<GameCore>,
    exit: AtomicBool,
    config: GameConfig,
}

impl Game {
    /// Deal a new game.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        let core = GameCore::deal(&config)?;
        Ok(Self::with_core(core, config))
    }

    /// Start from an explicit table layout.
    pub fn from_setup(setup: TableSetup) -> GameResult<Self> {
        let config = GameConfig::default()
            .with_seed(setup.seed)
            .with_player_count(setup.hands.len())
            .with_hand_size(setup.hand_size);
        let core = GameCore::from_setup(setup)?;
        Ok(Self::with_core(core, config))
    }

    fn with_core(core: GameCore, config: GameConfig) -> Self {
        Self {
            core: Mutex::new(core),
            exit: AtomicBool::new(false),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Block until the lock is free and take it for `holder`.
    ///
    /// Returns `None` once the exit flag is set.
    pub fn acquire(&self, holder: LockHolder) -> Option<GameGuard<'_>> {
        if self.exit_requested() {
            return None;
        }
        let core = self.core.lock();
        if self.exit_requested() {
            return None;
        }
        let table_on_entry = core.cards_to_fall().len() + core.fell_cards().len();
        Some(GameGuard {
            core,
            holder,
            table_on_entry,
        })
    }

    /// Ask every player loop to stop at its next acquisition.
    pub fn request_exit(&self) {
        self.exit.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn exit_requested(&self) -> bool {
        self.exit.load(Ordering::SeqCst)
    }
}

/// Exclusive access to the game, bound to one holder.
///
/// Derefs to [`GameCore`] for reading. Mutation happens only through
/// [`propose`](Self::propose) and [`mock`](Self::mock), which refuse to act
/// for anyone but the holder; the coordinator may act for any player.
pub struct GameGuard<'a> {
    core: MutexGuard<'a, GameCore>,
    holder: LockHolder,
    table_on_entry: usize,
}

impl std::fmt::Debug for GameGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameGuard")
            .field("holder", &self.holder)
            .finish_non_exhaustive()
    }
}

impl Deref for GameGuard<'_> {
    type Target = GameCore;

    fn deref(&self) -> &GameCore {
        &self.core
    }
}

impl GameGuard<'_> {
    #[must_use]
    pub fn holder(&self) -> LockHolder {
        self.holder
    }

    fn authorize(&self, player: PlayerId) -> GameResult<()> {
        match self.holder {
            LockHolder::Coordinator => Ok(()),
            LockHolder::Player(p) if p == player => Ok(()),
            LockHolder::Player(_) => Err(GameError::LockViolation {
                holder: self.holder.to_string(),
                player,
            }),
        }
    }

    /// Move kinds `player` may propose now.
    pub fn legal_moves(&self, player: PlayerId) -> GameResult<MoveSet> {
        self.authorize(player)?;
        legal_moves(&self.core, player)
    }

    /// Validate and commit `mv` for `player`.
    ///
    /// A rejected move leaves the state untouched apart from clearing the
    /// player's readiness. After a commit the monitor is advanced, ranks are
    /// settled and the card invariants are checked.
    pub fn propose(&mut self, player: PlayerId, mv: &Move) -> GameResult<MoveEffect> {
        self.authorize(player)?;
        let core = &mut *self.core;
        match engine::apply(core, player, mv) {
            Ok(effect) => {
                core.monitor.update_from_move(&effect);
                core.moves_committed += 1;
                debug!(%player, ?mv, "move committed");
                core.update_ranks();
                core.check_invariants()?;
                Ok(effect)
            }
            Err(err) => {
                if err.is_recoverable() {
                    warn!(%player, error = %err, "move rejected");
                    core.seats[player].ready = false;
                }
                Err(err)
            }
        }
    }

    /// Play `mv` for `player`, capture the resulting position, then roll back.
    ///
    /// # Errors
    ///
    /// The proposal's own error if it was rejected (after rolling back), or
    /// [`GameError::MockMoveInconsistency`] if the rollback did not reproduce
    /// the prior state.
    pub fn mock(&mut self, player: PlayerId, mv: &Move) -> GameResult<GameStateSnapshot> {
        self.authorize(player)?;
        let saved = StateSnapshot::capture(&self.core);
        let view_before = GameStateSnapshot::from_core(&self.core);

        let outcome = self
            .propose(player, mv)
            .map(|_| GameStateSnapshot::from_core(&self.core));
        saved.restore(&mut self.core);

        if let Some(field) = saved.diff(&StateSnapshot::capture(&self.core)) {
            return Err(GameError::MockMoveInconsistency { field });
        }
        let core = &*self.core;
        let rebuilt = CardMonitor::rebuild(
            core.players().map(|p| core.hand(p)),
            core.cards_to_fall(),
            core.triumph(),
        );
        if rebuilt != core.monitor {
            return Err(GameError::MockMoveInconsistency { field: "monitor" });
        }
        if GameStateSnapshot::from_core(core) != view_before {
            return Err(GameError::MockMoveInconsistency {
                field: "state_vector",
            });
        }
        outcome
    }

    /// Record `player`'s current feature vector as a decision point.
    pub fn record_decision_point(&mut self, player: PlayerId) -> GameResult<bool> {
        self.authorize(player)?;
        let vector = GameStateSnapshot::from_core(&self.core).as_vector(player, true);
        Ok(self.core.record_state_vector(player, vector))
    }
}

impl Drop for GameGuard<'_> {
    fn drop(&mut self) {
        let on_table = self.core.cards_to_fall().len() + self.core.fell_cards().len();
        if on_table != self.table_on_entry {
            let board: Vec<String> = self
                .core
                .cards_to_fall()
                .iter()
                .map(ToString::to_string)
                .collect();
            info!(holder = %self.holder, board = %board.join(" "), "new board");
        }
    }
}

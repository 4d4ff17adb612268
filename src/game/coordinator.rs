//! Runs one game with one thread per player.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span};

use super::{Game, LockHolder};
use crate::agent::{run_player, Decider};
use crate::core::{Card, GameConfig, GameRng, PlayerId};
use crate::error::{GameError, GameResult};
use crate::training::{balanced_samples, TrainingSample};

/// Outcome of a finished game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameReport {
    /// Players by finishing position.
    pub ranking: Vec<(PlayerId, u8)>,
    /// Balanced decision-point samples.
    pub samples: Vec<TrainingSample>,
    pub triumph_card: Card,
    pub moves_committed: u64,
}

impl GameReport {
    /// The player who finished last.
    #[must_use]
    pub fn loser(&self) -> Option<PlayerId> {
        self.ranking.last().map(|(p, _)| *p)
    }
}

/// Starts the player threads and tallies the result.
#[derive(Debug, Default)]
pub struct Coordinator;

impl Coordinator {
    /// Deal a game for `config` and play it to the end with `deciders`, one
    /// per seat in seat order.
    ///
    /// # Errors
    ///
    /// [`GameError::AgentTimeout`] if a player does not finish within the
    /// join timeout (the exit flag is raised and no ranking is produced), or
    /// the first fatal error any player reported.
    pub fn run(config: GameConfig, deciders: Vec<Box<dyn Decider>>) -> GameResult<GameReport> {
        if deciders.len() != config.player_count {
            return Err(GameError::InvalidConfig(format!(
                "{} deciders for {} seats",
                deciders.len(),
                config.player_count
            )));
        }
        let game = Arc::new(Game::new(config)?);
        Self::run_game(game, deciders)
    }

    /// Play an already set-up game to the end.
    pub fn run_game(game: Arc<Game>, deciders: Vec<Box<dyn Decider>>) -> GameResult<GameReport> {
        let config = game.config().clone();
        let span = info_span!("game", seed = config.seed);
        let _enter = span.enter();
        info!(players = deciders.len(), "starting game");

        let (tx, rx) = mpsc::channel();
        for (seat, mut decider) in deciders.into_iter().enumerate() {
            let player = PlayerId::new(seat as u8);
            let shared = Arc::clone(&game);
            let tx = tx.clone();
            let parent = span.clone();
            thread::Builder::new()
                .name(format!("moska-{}-{}", config.seed, seat))
                .spawn(move || {
                    let _enter = parent.enter();
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        run_player(&shared, player, decider.as_mut())
                    }))
                    .unwrap_or(Err(GameError::AgentPanicked { player }));
                    // The coordinator may have stopped listening after a timeout.
                    let _ = tx.send((player, result));
                })
                .map_err(|e| {
                    error!(%player, error = %e, "cannot spawn player thread");
                    abort(
                        &game,
                        GameError::InvariantViolation(format!("cannot spawn {player}: {e}")),
                    )
                })?;
        }
        drop(tx);

        let mut pending: Vec<PlayerId> = PlayerId::all(config.player_count).collect();
        while !pending.is_empty() {
            match rx.recv_timeout(config.join_timeout()) {
                Ok((player, result)) => {
                    pending.retain(|p| *p != player);
                    if let Err(err) = result {
                        error!(%player, error = %err, "player failed");
                        return Err(abort(&game, err));
                    }
                }
                Err(_) => {
                    let player = pending[0];
                    error!(%player, timeout_ms = config.join_timeout_ms, "player timed out");
                    return Err(abort(
                        &game,
                        GameError::AgentTimeout {
                            player,
                            timeout_ms: config.join_timeout_ms,
                        },
                    ));
                }
            }
        }

        let guard = game.acquire(LockHolder::Coordinator).ok_or_else(|| {
            GameError::InvariantViolation("game was stopped before tallying".into())
        })?;
        let mut ranking = Vec::with_capacity(guard.player_count());
        for player in guard.players() {
            let rank = guard.rank(player).ok_or_else(|| {
                GameError::InvariantViolation(format!("{player} finished without a rank"))
            })?;
            ranking.push((player, rank));
        }
        ranking.sort_by_key(|(_, rank)| *rank);
        for (player, rank) in &ranking {
            info!(%player, rank, "final ranking");
        }

        let mut rng = GameRng::new(config.seed).for_context("samples");
        Ok(GameReport {
            ranking,
            samples: balanced_samples(&guard, &mut rng),
            triumph_card: guard.triumph_card(),
            moves_committed: guard.moves_committed(),
        })
    }
}

/// Stop every player thread that is already running and hand back `err`.
fn abort(game: &Game, err: GameError) -> GameError {
    game.request_exit();
    err
}

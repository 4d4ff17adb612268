//! The per-player control loop.

use tracing::{debug, info, info_span, warn};

use super::decider::{Decider, PlayerView};
use crate::core::PlayerId;
use crate::error::{GameError, GameResult};
use crate::game::{Game, GameGuard, LockHolder};
use crate::rules::{Move, MoveKind};

/// Play as `player` until finished or told to exit.
///
/// Each round sleeps for the think delay, takes the lock, records the
/// decision point and commits exactly one move, retrying rejected proposals
/// up to the configured limit. A player that finishes while being the target
/// ends its turn before leaving.
pub fn run_player(game: &Game, player: PlayerId, decider: &mut dyn Decider) -> GameResult<()> {
    let span = info_span!("player", %player, name = decider.name());
    let _enter = span.enter();
    let config = game.config();

    loop {
        std::thread::sleep(config.think_delay());
        let Some(mut guard) = game.acquire(LockHolder::Player(player)) else {
            debug!("exit requested");
            return Ok(());
        };

        if !take_turn(&mut guard, player, decider, config.max_move_attempts)? {
            info!(rank = ?guard.rank(player), "finished");
            return Ok(());
        }
    }
}

/// Let `decider` commit one move for `player` on a held guard.
///
/// Returns `false` without playing if `player` has already finished, after
/// closing the turn if it is still the target.
pub fn take_turn(
    guard: &mut GameGuard<'_>,
    player: PlayerId,
    decider: &mut dyn Decider,
    max_attempts: u32,
) -> GameResult<bool> {
    if guard.rank(player).is_some() {
        close_finished_turn(guard, player)?;
        return Ok(false);
    }
    guard.record_decision_point(player)?;
    play_one_move(guard, player, decider, max_attempts)?;
    close_finished_turn(guard, player)?;
    Ok(true)
}

fn close_finished_turn(guard: &mut GameGuard<'_>, player: PlayerId) -> GameResult<()> {
    if guard.rank(player).is_some() && guard.target() == player && guard.active_count() > 1 {
        guard.propose(player, &Move::EndTurn { pick: Vec::new() })?;
    }
    Ok(())
}

fn play_one_move(
    guard: &mut GameGuard<'_>,
    player: PlayerId,
    decider: &mut dyn Decider,
    max_attempts: u32,
) -> GameResult<()> {
    for attempt in 1..=max_attempts {
        let legal = guard.legal_moves(player)?;
        let mut view = PlayerView::new(guard, player);
        let kind = decider.choose_move(&mut view, &legal);
        let outcome = match build_move(kind, &mut view, decider) {
            Ok(mv) => guard.propose(player, &mv),
            Err(err) => Err(err),
        };
        match outcome {
            Ok(_) => return Ok(()),
            Err(err) if err.is_recoverable() => {
                debug!(attempt, error = %err, "retrying");
            }
            Err(err) => return Err(err),
        }
    }
    warn!(attempts = max_attempts, "giving up");
    Err(GameError::MoveAttemptsExhausted {
        player,
        attempts: max_attempts,
    })
}

/// Ask the decider for the arguments of `kind`.
pub fn build_move(
    kind: MoveKind,
    view: &mut PlayerView<'_, '_>,
    decider: &mut dyn Decider,
) -> GameResult<Move> {
    let mv = match kind {
        MoveKind::InitialPlay => Move::InitialPlay {
            target: view.target(),
            cards: decider.play_initial(view),
        },
        MoveKind::PlayToOther => Move::PlayToOther {
            target: view.target(),
            cards: decider.play_to_target(view),
        },
        MoveKind::PlayToSelf => Move::PlayToSelf {
            cards: decider.play_to_self(view),
        },
        MoveKind::PlayFallFromHand => Move::PlayFallFromHand {
            pairs: decider.play_fall_card_from_hand(view),
        },
        MoveKind::PlayFallFromDeck => {
            let fall = match view.deck_top() {
                Some(card) => decider.deck_lift_fall_method(view, card),
                None => None,
            };
            Move::PlayFallFromDeck { fall }
        }
        MoveKind::EndTurn => Move::EndTurn {
            pick: decider.end_turn(view),
        },
        MoveKind::Skip => Move::Skip,
        MoveKind::PlayToSelfFromDeck => {
            return Err(GameError::rejected(
                kind,
                "deciders cannot build this move",
            ))
        }
    };
    Ok(mv)
}

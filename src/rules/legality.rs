//! Which move kinds a player may currently propose.

use tracing::trace;

use super::moves::{MoveKind, MoveSet};
use crate::core::PlayerId;
use crate::error::{GameError, GameResult};
use crate::game::GameCore;

/// Legal move kinds for `player` in the current state.
///
/// Starts from every agent-facing kind and strips what the player's role
/// (target, other, finished) and the table forbid. When the target has
/// nothing left but to end the turn, the result is exactly `{EndTurn}`.
///
/// # Errors
///
/// [`GameError::NoLegalMoves`] if nothing is left, and
/// [`GameError::InvariantViolation`] if a forced end of turn leaves anything
/// but `EndTurn`. Both indicate a rule-engine bug.
pub fn legal_moves(core: &GameCore, player: PlayerId) -> GameResult<MoveSet> {
    let target = core.target();
    let mut moves = MoveSet::agent_moves();

    if !core.is_active(player) {
        let only = if player == target {
            MoveKind::EndTurn
        } else {
            MoveKind::Skip
        };
        moves = MoveSet::from_kinds([only]);
    } else if player == target {
        moves.remove(MoveKind::PlayToOther);
        moves.remove(MoveKind::InitialPlay);
        if !core.can_end_turn(player) {
            moves.remove(MoveKind::EndTurn);
        }
        if !core.has_playable_values(player) || core.deck().is_empty() {
            moves.remove(MoveKind::PlayToSelf);
        }
        if !core.can_fall_cards(player) {
            moves.remove(MoveKind::PlayFallFromHand);
        }
        if core.has_kopled() || core.deck().is_empty() || core.cards_to_fall().is_empty() {
            moves.remove(MoveKind::PlayFallFromDeck);
        }
        if core.must_end_turn(player) {
            moves.remove(MoveKind::Skip);
            if moves.as_slice() != [MoveKind::EndTurn] {
                return Err(GameError::InvariantViolation(format!(
                    "{player} must end the turn but may play {moves}"
                )));
            }
        }
    } else {
        moves.remove(MoveKind::PlayFallFromDeck);
        moves.remove(MoveKind::PlayFallFromHand);
        moves.remove(MoveKind::EndTurn);
        moves.remove(MoveKind::PlayToSelf);
        if !core.has_playable_values(player) || core.fits_to_table() <= 0 {
            moves.remove(MoveKind::PlayToOther);
        }
        let initiates = core.initiating_player() == Some(player);
        if initiates && !core.is_initiated() {
            moves.remove(MoveKind::Skip);
        }
        if core.is_initiated() || !initiates {
            moves.remove(MoveKind::InitialPlay);
        }
    }

    if moves.is_empty() {
        return Err(GameError::NoLegalMoves { player });
    }
    trace!(%player, %moves, "legal moves");
    Ok(moves)
}

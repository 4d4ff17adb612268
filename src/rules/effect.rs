//! What a committed move did to the cards.
//!
//! Handlers report every card that crossed a hand or table boundary; the card
//! monitor replays exactly these transitions instead of rescanning the game.

use serde::{Deserialize, Serialize};

use super::moves::MoveKind;
use crate::core::{Card, PlayerId};

/// Card transitions caused by one committed move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEffect {
    pub kind: MoveKind,
    pub mover: PlayerId,
    /// Cards that left a hand.
    pub left_hands: Vec<(PlayerId, Card)>,
    /// Cards that entered a hand (draws and pick-ups).
    pub entered_hands: Vec<(PlayerId, Card)>,
    /// Cards that left `cards_to_fall`.
    pub left_table: Vec<Card>,
    /// Cards that entered `cards_to_fall`.
    pub entered_table: Vec<Card>,
}

impl MoveEffect {
    #[must_use]
    pub fn new(kind: MoveKind, mover: PlayerId) -> Self {
        Self {
            kind,
            mover,
            left_hands: Vec::new(),
            entered_hands: Vec::new(),
            left_table: Vec::new(),
            entered_table: Vec::new(),
        }
    }

    /// True when no card moved (Skip).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left_hands.is_empty()
            && self.entered_hands.is_empty()
            && self.left_table.is_empty()
            && self.entered_table.is_empty()
    }

    pub(crate) fn left_hand(&mut self, player: PlayerId, cards: impl IntoIterator<Item = Card>) {
        self.left_hands.extend(cards.into_iter().map(|c| (player, c)));
    }

    pub(crate) fn entered_hand(&mut self, player: PlayerId, cards: impl IntoIterator<Item = Card>) {
        self.entered_hands.extend(cards.into_iter().map(|c| (player, c)));
    }
}

//! The shared draw pile.
//!
//! The top of the deck is the back of the sequence. Storage is an
//! `im::Vector` so snapshots taken by mock moves share structure with the
//! live deck instead of copying it.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::Card;
use super::rng::GameRng;
use crate::error::{GameError, GameResult};

/// Ordered draw pile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
}

impl Deck {
    /// Standard 52-card deck shuffled with the given seed.
    ///
    /// Identical seeds give identical draw order.
    #[must_use]
    pub fn shuffled(seed: u64) -> Self {
        let mut cards = Card::standard_deck();
        GameRng::new(seed).for_context("deck").shuffle(&mut cards);
        Self::from_cards(cards)
    }

    /// Deck with an explicit order; the last card is the top.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Cards left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The next card to be drawn, if any.
    #[must_use]
    pub fn peek_top(&self) -> Option<&Card> {
        self.cards.back()
    }

    /// The next `n` cards in draw order, fewer if the deck is short.
    #[must_use]
    pub fn peek_top_n(&self, n: usize) -> Vec<Card> {
        self.cards.iter().rev().take(n).copied().collect()
    }

    /// Remove and return the top `n` cards in draw order.
    pub fn pop_cards(&mut self, n: usize) -> GameResult<Vec<Card>> {
        if n > self.cards.len() {
            return Err(GameError::InsufficientCards {
                requested: n,
                available: self.cards.len(),
            });
        }
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            if let Some(card) = self.cards.pop_back() {
                out.push(card);
            }
        }
        Ok(out)
    }

    /// Draw up to `n` cards, stopping early when the deck runs out.
    pub fn draw_up_to(&mut self, n: usize) -> Vec<Card> {
        let take = n.min(self.cards.len());
        let mut out = Vec::with_capacity(take);
        for _ in 0..take {
            if let Some(card) = self.cards.pop_back() {
                out.push(card);
            }
        }
        out
    }

    /// Put a card under the deck. Used once, for the triumph card.
    pub fn place_to_bottom(&mut self, card: Card) {
        self.cards.push_front(card);
    }

    /// Iterate from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

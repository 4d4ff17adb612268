//! Playing cards.
//!
//! A [`Card`] is identified by its suit and value alone. The `kopled` flag and
//! the evaluation `score` are tags that ride along with a card but never take
//! part in equality, hashing or ordering, so a kopled card on the table still
//! compares equal to the same card in a hand.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Lowest card value (the 2).
pub const MIN_VALUE: u8 = 2;
/// Highest card value (the ace).
pub const MAX_VALUE: u8 = 14;
/// Cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// The four suits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    /// All suits in index order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// 0-based index, stable across runs.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
        }
    }

    /// The suit symbol used in logs.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A playing card.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    /// 2..=14, ace high.
    pub value: u8,
    /// Placed on the table by a deck draw that could not fall anything.
    #[serde(default)]
    pub kopled: bool,
    /// Ephemeral score assigned by evaluators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
}

impl Card {
    /// Create an untagged card.
    #[must_use]
    pub fn new(suit: Suit, value: u8) -> Self {
        debug_assert!(
            (MIN_VALUE..=MAX_VALUE).contains(&value),
            "card value {value} out of range"
        );
        Self {
            suit,
            value,
            kopled: false,
            score: None,
        }
    }

    /// Slot of this card in a 52-wide one-hot encoding.
    #[must_use]
    pub fn index(&self) -> usize {
        self.suit.index() * 13 + usize::from(self.value - MIN_VALUE)
    }

    /// Copy of this card with the kopled tag set.
    #[must_use]
    pub fn into_kopled(mut self) -> Self {
        self.kopled = true;
        self
    }

    /// Copy of this card with both tags cleared.
    #[must_use]
    pub fn untagged(self) -> Self {
        Self::new(self.suit, self.value)
    }

    /// All 52 cards, suit-major, ascending value.
    #[must_use]
    pub fn standard_deck() -> Vec<Card> {
        Suit::ALL
            .iter()
            .flat_map(|&suit| (MIN_VALUE..=MAX_VALUE).map(move |value| Card::new(suit, value)))
            .collect()
    }

    fn key(&self) -> (Suit, u8) {
        (self.suit, self.value)
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.suit, self.value)?;
        if self.kopled {
            write!(f, "*")?;
        }
        Ok(())
    }
}

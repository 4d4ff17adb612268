//! A player's hand.

use serde::{Deserialize, Serialize};

use super::card::Card;

/// Ordered multiset of cards owned by one player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    #[must_use]
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Append cards at the end.
    pub fn add(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards.into_iter().map(Card::untagged));
    }

    /// Remove and return every card matching `pred`, keeping the rest in order.
    pub fn remove(&mut self, mut pred: impl FnMut(&Card) -> bool) -> Vec<Card> {
        let mut removed = Vec::new();
        self.cards.retain(|c| {
            if pred(c) {
                removed.push(*c);
                false
            } else {
                true
            }
        });
        removed
    }

    #[must_use]
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    /// True when every card of `cards` is in the hand and none repeats.
    #[must_use]
    pub fn contains_all(&self, cards: &[Card]) -> bool {
        cards.iter().enumerate().all(|(i, c)| self.contains(c) && !cards[..i].contains(c))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

impl<'a> IntoIterator for &'a Hand {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Suit;

    fn c(suit: Suit, value: u8) -> Card {
        Card::new(suit, value)
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut hand = Hand::new([
            c(Suit::Clubs, 2),
            c(Suit::Hearts, 7),
            c(Suit::Spades, 9),
            c(Suit::Hearts, 8),
        ]);

        let removed = hand.remove(|card| card.suit == Suit::Hearts);

        assert_eq!(removed, vec![c(Suit::Hearts, 7), c(Suit::Hearts, 8)]);
        assert_eq!(hand.cards(), &[c(Suit::Clubs, 2), c(Suit::Spades, 9)]);
    }

    #[test]
    fn test_add_clears_tags() {
        let mut hand = Hand::default();
        hand.add([c(Suit::Clubs, 5).into_kopled()]);

        assert!(!hand.cards()[0].kopled);
    }

    #[test]
    fn test_contains_all_rejects_repeats() {
        let hand = Hand::new([c(Suit::Clubs, 2), c(Suit::Hearts, 7)]);

        assert!(hand.contains_all(&[c(Suit::Hearts, 7), c(Suit::Clubs, 2)]));
        assert!(!hand.contains_all(&[c(Suit::Hearts, 7), c(Suit::Hearts, 7)]));
        assert!(!hand.contains_all(&[c(Suit::Hearts, 8)]));
    }
}

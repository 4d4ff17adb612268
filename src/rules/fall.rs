//! The fall rule.

use crate::core::{Card, Suit};

/// Whether `hand_card` falls `table_card` under the given triumph suit.
///
/// Same suit and higher value falls; a triumph card falls any non-triumph
/// card. Two triumph cards compare by value through the same-suit branch.
#[must_use]
pub fn check_can_fall_card(hand_card: &Card, table_card: &Card, triumph: Suit) -> bool {
    (hand_card.suit == table_card.suit && hand_card.value > table_card.value)
        || (hand_card.suit == triumph && table_card.suit != triumph)
}

/// Table cards that `card` can fall, in table order.
pub fn fallable_by<'a>(
    card: &'a Card,
    table: &'a [Card],
    triumph: Suit,
) -> impl Iterator<Item = &'a Card> + 'a {
    table
        .iter()
        .filter(move |t| check_can_fall_card(card, t, triumph))
}

/// True if any card of `hand` falls any card of `table`.
#[must_use]
pub fn any_falls(hand: &[Card], table: &[Card], triumph: Suit) -> bool {
    hand.iter()
        .any(|h| table.iter().any(|t| check_can_fall_card(h, t, triumph)))
}

//! Fall-tracking monitor.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::core::{Card, Hand, PlayerId, PlayerMap, Suit};
use crate::rules::fall::check_can_fall_card;
use crate::rules::MoveEffect;

/// Ledger of the cards each player holds and of which hand cards can fall
/// each card waiting on the table.
///
/// Built once when play starts, then advanced by
/// [`update_from_move`](Self::update_from_move) after every committed move.
/// Since all game state is shared the ledger is exact, so
/// [`rebuild`](Self::rebuild) from the canonical state must always agree
/// with the incrementally maintained one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardMonitor {
    triumph: Suit,
    player_cards: PlayerMap<FxHashSet<Card>>,
    cards_fall: FxHashMap<Card, FxHashSet<Card>>,
}

impl CardMonitor {
    /// Build the ledger from scratch.
    pub fn rebuild<'a>(
        hands: impl IntoIterator<Item = &'a Hand>,
        cards_to_fall: &[Card],
        triumph: Suit,
    ) -> Self {
        let player_cards: Vec<FxHashSet<Card>> = hands
            .into_iter()
            .map(|h| h.iter().map(|c| c.untagged()).collect())
            .collect();
        let mut monitor = Self {
            triumph,
            player_cards: PlayerMap::from_vec(player_cards),
            cards_fall: FxHashMap::default(),
        };
        for card in cards_to_fall {
            monitor.track_table_card(*card);
        }
        monitor
    }

    /// Cards known to be in `player`'s hand.
    #[must_use]
    pub fn player_cards(&self, player: PlayerId) -> &FxHashSet<Card> {
        &self.player_cards[player]
    }

    /// Hand cards (any player) that can fall `table_card`, if it is on the table.
    #[must_use]
    pub fn fallers_of(&self, table_card: &Card) -> Option<&FxHashSet<Card>> {
        self.cards_fall.get(table_card)
    }

    /// Table cards currently tracked.
    pub fn table_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards_fall.keys()
    }

    /// True if `player` holds a card that falls some table card.
    #[must_use]
    pub fn can_fall_any(&self, player: PlayerId) -> bool {
        let hand = &self.player_cards[player];
        self.cards_fall
            .values()
            .any(|fallers| fallers.iter().any(|c| hand.contains(c)))
    }

    /// Apply the card transitions of one committed move.
    pub fn update_from_move(&mut self, effect: &MoveEffect) {
        trace!(kind = %effect.kind, mover = %effect.mover, "monitor update");

        for card in &effect.left_table {
            self.cards_fall.remove(card);
        }
        for (player, card) in &effect.left_hands {
            self.player_cards[*player].remove(card);
            for fallers in self.cards_fall.values_mut() {
                fallers.remove(card);
            }
        }
        for (player, card) in &effect.entered_hands {
            let card = card.untagged();
            self.player_cards[*player].insert(card);
            for (table_card, fallers) in &mut self.cards_fall {
                if check_can_fall_card(&card, table_card, self.triumph) {
                    fallers.insert(card);
                }
            }
        }
        for card in &effect.entered_table {
            self.track_table_card(*card);
        }
    }

    fn track_table_card(&mut self, table_card: Card) {
        let fallers = self
            .player_cards
            .values()
            .flat_map(|cards| cards.iter())
            .filter(|c| check_can_fall_card(c, &table_card, self.triumph))
            .copied()
            .collect();
        self.cards_fall.insert(table_card.untagged(), fallers);
    }
}

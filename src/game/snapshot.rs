//! Snapshots of the shared state.
//!
//! [`StateSnapshot`] is the rollback record of a mock move: the value fields
//! a move can change, captured before and written back after. Comparing a
//! fresh capture against the saved one names the first field that did not
//! come back.
//!
//! [`GameStateSnapshot`] is the derived, read-only view a mock move returns
//! and the source of the decision-point feature vectors.

use serde::{Deserialize, Serialize};

use super::state::{GameCore, Seat};
use crate::core::{Card, Deck, GameRng, GameRngState, PlayerId, PlayerMap, Suit, TurnCycle, DECK_SIZE};
use crate::monitor::CardMonitor;

/// Everything a move may mutate.
#[derive(Clone, Debug)]
pub struct StateSnapshot {
    seats: PlayerMap<Seat>,
    deck: Deck,
    cards_to_fall: Vec<Card>,
    fell_cards: Vec<Card>,
    discard: Vec<Card>,
    turn_cycle: TurnCycle,
    monitor: CardMonitor,
    lift_rng: GameRngState,
    moves_committed: u64,
}

impl StateSnapshot {
    #[must_use]
    pub fn capture(core: &GameCore) -> Self {
        Self {
            seats: core.seats.clone(),
            deck: core.deck.clone(),
            cards_to_fall: core.cards_to_fall.clone(),
            fell_cards: core.fell_cards.clone(),
            discard: core.discard.clone(),
            turn_cycle: core.turn_cycle,
            monitor: core.monitor.clone(),
            lift_rng: core.lift_rng.state(),
            moves_committed: core.moves_committed,
        }
    }

    /// Write every captured field back.
    pub fn restore(&self, core: &mut GameCore) {
        core.seats = self.seats.clone();
        core.deck = self.deck.clone();
        core.cards_to_fall = self.cards_to_fall.clone();
        core.fell_cards = self.fell_cards.clone();
        core.discard = self.discard.clone();
        core.turn_cycle = self.turn_cycle;
        core.monitor = self.monitor.clone();
        core.lift_rng = GameRng::from_state(&self.lift_rng);
        core.moves_committed = self.moves_committed;
    }

    /// Name of the first field that differs from `other`, if any.
    #[must_use]
    pub fn diff(&self, other: &StateSnapshot) -> Option<&'static str> {
        if self.seats.iter().zip(other.seats.iter()).any(|((_, a), (_, b))| a.hand != b.hand) {
            return Some("hands");
        }
        if self.seats.iter().zip(other.seats.iter()).any(|((_, a), (_, b))| a.rank != b.rank) {
            return Some("ranks");
        }
        if self.seats.iter().zip(other.seats.iter()).any(|((_, a), (_, b))| a.ready != b.ready) {
            return Some("readiness");
        }
        if self.deck != other.deck {
            return Some("deck");
        }
        if !same_table(&self.cards_to_fall, &other.cards_to_fall) {
            return Some("cards_to_fall");
        }
        if self.fell_cards != other.fell_cards {
            return Some("fell_cards");
        }
        if self.discard != other.discard {
            return Some("discard");
        }
        if self.turn_cycle != other.turn_cycle {
            return Some("turn_cycle");
        }
        if self.monitor != other.monitor {
            return Some("monitor");
        }
        if self.lift_rng != other.lift_rng {
            return Some("lift_rng");
        }
        if self.moves_committed != other.moves_committed {
            return Some("moves_committed");
        }
        None
    }
}

/// Card equality ignores the kopled tag; the table must keep it.
fn same_table(a: &[Card], b: &[Card]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y && x.kopled == y.kopled)
}

/// Derived view of a game position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub deck_left: usize,
    pub hand_sizes: Vec<usize>,
    /// Cards the monitor knows each player holds, sorted.
    pub known_cards: Vec<Vec<Card>>,
    pub cards_to_fall: Vec<Card>,
    pub fell_cards: Vec<Card>,
    pub target: PlayerId,
    pub ranks: Vec<Option<u8>>,
    pub triumph: Suit,
}

impl GameStateSnapshot {
    #[must_use]
    pub fn from_core(core: &GameCore) -> Self {
        let known_cards = core
            .players()
            .map(|p| {
                let mut cards: Vec<Card> = core.monitor().player_cards(p).iter().copied().collect();
                cards.sort();
                cards
            })
            .collect();
        Self {
            deck_left: core.deck().len(),
            hand_sizes: core.players().map(|p| core.hand(p).len()).collect(),
            known_cards,
            cards_to_fall: core.cards_to_fall().to_vec(),
            fell_cards: core.fell_cards().to_vec(),
            target: core.target(),
            ranks: core.ranks(),
            triumph: core.triumph(),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.hand_sizes.len()
    }

    /// Length of [`as_vector`](Self::as_vector) for `player_count` players.
    #[must_use]
    pub fn vector_len(player_count: usize) -> usize {
        1 + player_count + DECK_SIZE * (2 + player_count) + 4
    }

    /// Feature vector seen from `perspective`.
    ///
    /// Layout: deck size, hand sizes starting at `perspective`, one-hot
    /// blocks for `cards_to_fall` and `fell_cards`, one block of known cards
    /// per player starting at `perspective`, and the triumph suit one-hot.
    /// With `normalize` the counts are divided by the deck size.
    #[must_use]
    pub fn as_vector(&self, perspective: PlayerId, normalize: bool) -> Vec<f32> {
        let n = self.player_count();
        let scale = if normalize { DECK_SIZE as f32 } else { 1.0 };
        let seats = (0..n).map(|k| (perspective.index() + k) % n);

        let mut out = Vec::with_capacity(Self::vector_len(n));
        out.push(self.deck_left as f32 / scale);
        out.extend(seats.clone().map(|i| self.hand_sizes[i] as f32 / scale));
        push_one_hot(&mut out, &self.cards_to_fall);
        push_one_hot(&mut out, &self.fell_cards);
        for i in seats {
            push_one_hot(&mut out, &self.known_cards[i]);
        }
        out.extend(Suit::ALL.iter().map(|s| if *s == self.triumph { 1.0 } else { 0.0 }));
        out
    }
}

fn push_one_hot(out: &mut Vec<f32>, cards: &[Card]) {
    let start = out.len();
    out.resize(start + DECK_SIZE, 0.0);
    for card in cards {
        out[start + card.index()] = 1.0;
    }
}

//! Move kinds, move arguments and move sets.
//!
//! [`MoveKind`] is the closed set of eight move names. [`Move`] pairs a kind
//! with its arguments; dispatch is an exhaustive `match` on `Move`, so an
//! unregistered move can only appear when a kind is parsed from its name.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::str::FromStr;

use crate::core::{Card, PlayerId};
use crate::error::GameError;

/// The eight kinds of move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoveKind {
    InitialPlay,
    PlayToOther,
    PlayToSelf,
    PlayFallFromHand,
    PlayFallFromDeck,
    EndTurn,
    Skip,
    PlayToSelfFromDeck,
}

impl MoveKind {
    /// Every registered kind.
    pub const ALL: [MoveKind; 8] = [
        MoveKind::InitialPlay,
        MoveKind::PlayToOther,
        MoveKind::PlayToSelf,
        MoveKind::PlayFallFromHand,
        MoveKind::PlayFallFromDeck,
        MoveKind::EndTurn,
        MoveKind::Skip,
        MoveKind::PlayToSelfFromDeck,
    ];

    /// Kinds a decision-maker can build arguments for.
    pub const AGENT_MOVES: [MoveKind; 7] = [
        MoveKind::InitialPlay,
        MoveKind::PlayToOther,
        MoveKind::PlayToSelf,
        MoveKind::PlayFallFromHand,
        MoveKind::PlayFallFromDeck,
        MoveKind::EndTurn,
        MoveKind::Skip,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            MoveKind::InitialPlay => "InitialPlay",
            MoveKind::PlayToOther => "PlayToOther",
            MoveKind::PlayToSelf => "PlayToSelf",
            MoveKind::PlayFallFromHand => "PlayFallFromHand",
            MoveKind::PlayFallFromDeck => "PlayFallFromDeck",
            MoveKind::EndTurn => "EndTurn",
            MoveKind::Skip => "Skip",
            MoveKind::PlayToSelfFromDeck => "PlayToSelfFromDeck",
        }
    }
}

impl std::fmt::Display for MoveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MoveKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| GameError::UnknownMove(s.to_string()))
    }
}

/// A move with its arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Open an empty table against `target`.
    InitialPlay { target: PlayerId, cards: Vec<Card> },
    /// Add cards of values already on the table against `target`.
    PlayToOther { target: PlayerId, cards: Vec<Card> },
    /// Target adds cards of values already on the table against itself.
    PlayToSelf { cards: Vec<Card> },
    /// Target falls table cards with hand cards, as (hand, table) pairs.
    PlayFallFromHand { pairs: Vec<(Card, Card)> },
    /// Target draws from the deck and tries to fall with the drawn card.
    ///
    /// `fall` is the preferred (deck card, table card) pairing for the
    /// card on top of the deck.
    PlayFallFromDeck { fall: Option<(Card, Card)> },
    /// Target closes the turn, picking up `pick` from the table.
    EndTurn { pick: Vec<Card> },
    /// Pass.
    Skip,
    /// Target moves the top deck cards onto the table against itself.
    PlayToSelfFromDeck { cards: Vec<Card> },
}

impl Move {
    #[must_use]
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::InitialPlay { .. } => MoveKind::InitialPlay,
            Move::PlayToOther { .. } => MoveKind::PlayToOther,
            Move::PlayToSelf { .. } => MoveKind::PlayToSelf,
            Move::PlayFallFromHand { .. } => MoveKind::PlayFallFromHand,
            Move::PlayFallFromDeck { .. } => MoveKind::PlayFallFromDeck,
            Move::EndTurn { .. } => MoveKind::EndTurn,
            Move::Skip => MoveKind::Skip,
            Move::PlayToSelfFromDeck { .. } => MoveKind::PlayToSelfFromDeck,
        }
    }
}

/// A set of move kinds, kept in [`MoveKind::ALL`] order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSet {
    kinds: SmallVec<[MoveKind; 8]>,
}

impl MoveSet {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The moves a decision-maker starts from before any removal.
    #[must_use]
    pub fn agent_moves() -> Self {
        Self::from_kinds(MoveKind::AGENT_MOVES)
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = MoveKind>) -> Self {
        let mut set = Self::empty();
        for kind in kinds {
            set.insert(kind);
        }
        set
    }

    pub fn insert(&mut self, kind: MoveKind) {
        if let Err(pos) = self.kinds.binary_search(&kind) {
            self.kinds.insert(pos, kind);
        }
    }

    pub fn remove(&mut self, kind: MoveKind) {
        self.kinds.retain(|k| *k != kind);
    }

    #[must_use]
    pub fn contains(&self, kind: MoveKind) -> bool {
        self.kinds.contains(&kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[MoveKind] {
        &self.kinds
    }

    pub fn iter(&self) -> impl Iterator<Item = MoveKind> + '_ {
        self.kinds.iter().copied()
    }
}

impl std::fmt::Display for MoveSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.kinds.iter().map(|k| k.name()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

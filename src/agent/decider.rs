//! The decision-making capability a player plugs into the engine.

use rustc_hash::FxHashSet;

use crate::core::{Card, Hand, PlayerId, Suit};
use crate::error::GameResult;
use crate::game::{GameCore, GameGuard, GameStateSnapshot};
use crate::rules::{Move, MoveKind, MoveSet};

/// A player's decision policy.
///
/// The engine asks for a move kind from the legal set, then for the
/// arguments of that kind. Every call happens while the player holds the
/// game lock, so the [`PlayerView`] is consistent for the whole decision.
pub trait Decider: Send {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Pick one of `legal`.
    fn choose_move(&mut self, view: &mut PlayerView<'_, '_>, legal: &MoveSet) -> MoveKind;

    /// Cards to pick up when ending the turn: the cards still to fall, or
    /// every card on the table.
    fn end_turn(&mut self, view: &mut PlayerView<'_, '_>) -> Vec<Card>;

    /// (hand card, table card) pairs to fall.
    fn play_fall_card_from_hand(&mut self, view: &mut PlayerView<'_, '_>) -> Vec<(Card, Card)>;

    /// Preferred table card for `card`, the top card of the deck.
    fn deck_lift_fall_method(
        &mut self,
        view: &mut PlayerView<'_, '_>,
        card: Card,
    ) -> Option<(Card, Card)>;

    /// Cards of table values to play against oneself.
    fn play_to_self(&mut self, view: &mut PlayerView<'_, '_>) -> Vec<Card>;

    /// Cards to open an empty table with.
    fn play_initial(&mut self, view: &mut PlayerView<'_, '_>) -> Vec<Card>;

    /// Cards of table values to play against the target.
    fn play_to_target(&mut self, view: &mut PlayerView<'_, '_>) -> Vec<Card>;
}

/// What a player sees and may try while deciding.
pub struct PlayerView<'g, 'a> {
    guard: &'g mut GameGuard<'a>,
    player: PlayerId,
}

impl<'g, 'a> PlayerView<'g, 'a> {
    pub fn new(guard: &'g mut GameGuard<'a>, player: PlayerId) -> Self {
        Self { guard, player }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Full read access to the game.
    #[must_use]
    pub fn game(&self) -> &GameCore {
        &**self.guard
    }

    #[must_use]
    pub fn hand(&self) -> &Hand {
        self.guard.hand(self.player)
    }

    #[must_use]
    pub fn target(&self) -> PlayerId {
        self.guard.target()
    }

    #[must_use]
    pub fn is_target(&self) -> bool {
        self.guard.target() == self.player
    }

    #[must_use]
    pub fn cards_to_fall(&self) -> &[Card] {
        self.guard.cards_to_fall()
    }

    #[must_use]
    pub fn fell_cards(&self) -> &[Card] {
        self.guard.fell_cards()
    }

    #[must_use]
    pub fn table_values(&self) -> FxHashSet<u8> {
        self.guard.table_values()
    }

    #[must_use]
    pub fn triumph(&self) -> Suit {
        self.guard.triumph()
    }

    #[must_use]
    pub fn deck_len(&self) -> usize {
        self.guard.deck().len()
    }

    #[must_use]
    pub fn deck_top(&self) -> Option<Card> {
        self.guard.deck().peek_top().copied()
    }

    /// How many more cards the target can be made to answer.
    #[must_use]
    pub fn fits_to_table(&self) -> isize {
        self.guard.fits_to_table()
    }

    pub fn legal_moves(&self) -> GameResult<MoveSet> {
        self.guard.legal_moves(self.player)
    }

    /// Evaluate `mv` without committing it.
    pub fn mock(&mut self, mv: &Move) -> GameResult<GameStateSnapshot> {
        self.guard.mock(self.player, mv)
    }
}

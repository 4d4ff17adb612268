//! The shared game state guarded by the game lock.

use rustc_hash::FxHashSet;
use tracing::info;

use crate::core::{
    Card, Deck, GameConfig, GameRng, Hand, PlayerId, PlayerMap, Suit, TurnCycle, MIN_VALUE,
};
use crate::error::{GameError, GameResult};
use crate::monitor::CardMonitor;
use crate::rules::fall::any_falls;

/// One player's seat at the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Seat {
    pub hand: Hand,
    /// Finishing position, fixed once set.
    pub rank: Option<u8>,
    /// Has nothing more to add to the current turn.
    pub ready: bool,
}

/// Everything the lock protects.
///
/// Read access is public; mutation goes through the move handlers in
/// [`rules::engine`](crate::rules::engine), reached via
/// [`GameGuard`](super::GameGuard).
#[derive(Clone, Debug)]
pub struct GameCore {
    pub(crate) seats: PlayerMap<Seat>,
    pub(crate) deck: Deck,
    pub(crate) cards_to_fall: Vec<Card>,
    pub(crate) fell_cards: Vec<Card>,
    pub(crate) discard: Vec<Card>,
    pub(crate) turn_cycle: TurnCycle,
    pub(crate) monitor: CardMonitor,
    pub(crate) lift_rng: GameRng,
    pub(crate) moves_committed: u64,
    pub(crate) state_vectors: PlayerMap<Vec<Vec<f32>>>,
    triumph_card: Card,
    triumph_swapped_with: Option<PlayerId>,
    hand_size: usize,
    card_total: usize,
}

/// Explicit table layout for building a game mid-play.
///
/// Used to set up concrete positions; [`GameCore::deal`] is the normal entry.
#[derive(Clone, Debug)]
pub struct TableSetup {
    pub hands: Vec<Vec<Card>>,
    /// Bottom to top.
    pub deck: Vec<Card>,
    pub cards_to_fall: Vec<Card>,
    pub fell_cards: Vec<Card>,
    pub triumph_card: Card,
    pub target: PlayerId,
    pub ranks: Vec<Option<u8>>,
    pub ready: Vec<bool>,
    pub hand_size: usize,
    pub seed: u64,
}

impl TableSetup {
    /// Empty table and deck, seat 0 targeted, nobody ready or ranked.
    #[must_use]
    pub fn new(hands: Vec<Vec<Card>>, triumph_card: Card) -> Self {
        let n = hands.len();
        Self {
            hands,
            deck: Vec::new(),
            cards_to_fall: Vec::new(),
            fell_cards: Vec::new(),
            triumph_card,
            target: PlayerId::new(0),
            ranks: vec![None; n],
            ready: vec![false; n],
            hand_size: 6,
            seed: 0,
        }
    }

    #[must_use]
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = deck;
        self
    }

    #[must_use]
    pub fn with_cards_to_fall(mut self, cards: Vec<Card>) -> Self {
        self.cards_to_fall = cards;
        self
    }

    #[must_use]
    pub fn with_fell_cards(mut self, cards: Vec<Card>) -> Self {
        self.fell_cards = cards;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: PlayerId) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_ready(mut self, player: PlayerId) -> Self {
        self.ready[player.index()] = true;
        self
    }

    #[must_use]
    pub fn with_rank(mut self, player: PlayerId, rank: u8) -> Self {
        self.ranks[player.index()] = Some(rank);
        self
    }

    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl GameCore {
    /// Shuffle, deal and pick the triumph card.
    ///
    /// The top card after dealing names the triumph suit. A player holding
    /// the 2 of that suit trades it for the drawn card, and the resulting
    /// triumph card goes under the deck.
    pub fn deal(config: &GameConfig) -> GameResult<Self> {
        config.validate()?;

        let mut deck = Deck::shuffled(config.seed);
        let mut hands = Vec::with_capacity(config.player_count);
        for _ in 0..config.player_count {
            hands.push(Hand::new(deck.pop_cards(config.hand_size)?));
        }

        let mut triumph_card = deck
            .pop_cards(1)?
            .into_iter()
            .next()
            .ok_or(GameError::InsufficientCards {
                requested: 1,
                available: 0,
            })?;
        let two = Card::new(triumph_card.suit, MIN_VALUE);
        let mut swapped = None;
        if let Some(idx) = hands.iter().position(|h| h.contains(&two)) {
            let holder = PlayerId::new(idx as u8);
            hands[idx].add([triumph_card]);
            hands[idx].remove(|c| *c == two);
            info!(player = %holder, drawn = %triumph_card, "swapped triumph 2 into the triumph slot");
            triumph_card = two;
            swapped = Some(holder);
        }
        deck.place_to_bottom(triumph_card);
        info!(triumph = %triumph_card, "placed triumph card at the bottom of the deck");

        let seats = hands
            .into_iter()
            .map(|hand| Seat {
                hand,
                ..Seat::default()
            })
            .collect();
        Ok(Self::assemble(
            PlayerMap::from_vec(seats),
            deck,
            Vec::new(),
            Vec::new(),
            TurnCycle::new(config.player_count),
            triumph_card,
            swapped,
            config.hand_size,
            config.seed,
        ))
    }

    /// Build a game from an explicit layout.
    pub fn from_setup(setup: TableSetup) -> GameResult<Self> {
        let n = setup.hands.len();
        if !(2..=crate::core::MAX_PLAYERS).contains(&n) {
            return Err(GameError::InvalidConfig(format!(
                "player count must be 2..={}, got {n}",
                crate::core::MAX_PLAYERS
            )));
        }
        if setup.ranks.len() != n || setup.ready.len() != n || setup.target.index() >= n {
            return Err(GameError::InvalidConfig(
                "seat data does not match the number of hands".into(),
            ));
        }

        let seats = setup
            .hands
            .into_iter()
            .zip(setup.ranks)
            .zip(setup.ready)
            .map(|((cards, rank), ready)| Seat {
                hand: Hand::new(cards),
                rank,
                ready,
            })
            .collect();
        let core = Self::assemble(
            PlayerMap::from_vec(seats),
            Deck::from_cards(setup.deck),
            setup.cards_to_fall,
            setup.fell_cards,
            TurnCycle::with_pointer(n, setup.target.index()),
            setup.triumph_card,
            None,
            setup.hand_size,
            setup.seed,
        );
        core.check_invariants()?;
        Ok(core)
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        seats: PlayerMap<Seat>,
        deck: Deck,
        cards_to_fall: Vec<Card>,
        fell_cards: Vec<Card>,
        turn_cycle: TurnCycle,
        triumph_card: Card,
        triumph_swapped_with: Option<PlayerId>,
        hand_size: usize,
        seed: u64,
    ) -> Self {
        let monitor = CardMonitor::rebuild(
            seats.values().map(|s| &s.hand),
            &cards_to_fall,
            triumph_card.suit,
        );
        let player_count = seats.player_count();
        let mut core = Self {
            seats,
            deck,
            cards_to_fall,
            fell_cards,
            discard: Vec::new(),
            turn_cycle,
            monitor,
            lift_rng: GameRng::new(seed).for_context("deck-lift"),
            moves_committed: 0,
            state_vectors: PlayerMap::with_default(player_count),
            triumph_card,
            triumph_swapped_with,
            hand_size,
            card_total: 0,
        };
        core.card_total = core.all_cards().count();
        core
    }

    // === Read access ===

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.player_count()
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerId> {
        self.seats.player_ids()
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &Hand {
        &self.seats[player].hand
    }

    #[must_use]
    pub fn rank(&self, player: PlayerId) -> Option<u8> {
        self.seats[player].rank
    }

    #[must_use]
    pub fn is_ready(&self, player: PlayerId) -> bool {
        self.seats[player].ready
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn cards_to_fall(&self) -> &[Card] {
        &self.cards_to_fall
    }

    #[must_use]
    pub fn fell_cards(&self) -> &[Card] {
        &self.fell_cards
    }

    /// Cards taken out of play at the end of a turn.
    #[must_use]
    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    #[must_use]
    pub fn triumph(&self) -> Suit {
        self.triumph_card.suit
    }

    #[must_use]
    pub fn triumph_card(&self) -> Card {
        self.triumph_card
    }

    /// Player who traded the triumph 2 during setup.
    #[must_use]
    pub fn triumph_swapped_with(&self) -> Option<PlayerId> {
        self.triumph_swapped_with
    }

    #[must_use]
    pub fn turn_cycle(&self) -> &TurnCycle {
        &self.turn_cycle
    }

    #[must_use]
    pub fn monitor(&self) -> &CardMonitor {
        &self.monitor
    }

    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand_size
    }

    #[must_use]
    pub fn moves_committed(&self) -> u64 {
        self.moves_committed
    }

    /// State vectors recorded at `player`'s decision points.
    #[must_use]
    pub fn state_vectors(&self, player: PlayerId) -> &[Vec<f32>] {
        &self.state_vectors[player]
    }

    // === Table queries ===

    /// The player cards are played to.
    #[must_use]
    pub fn target(&self) -> PlayerId {
        self.turn_cycle.current()
    }

    /// The nearest unranked player before the target, if any.
    #[must_use]
    pub fn initiating_player(&self) -> Option<PlayerId> {
        let target = self.target();
        self.turn_cycle
            .peek_prev(|p| p != target && self.seats[p].rank.is_none())
    }

    #[must_use]
    pub fn is_active(&self, player: PlayerId) -> bool {
        self.seats[player].rank.is_none()
    }

    /// Players without a rank.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.seats.values().filter(|s| s.rank.is_none()).count()
    }

    /// Ranking so far, in seat order.
    #[must_use]
    pub fn ranks(&self) -> Vec<Option<u8>> {
        self.seats.values().map(|s| s.rank).collect()
    }

    /// True once any card of the turn is on the table.
    #[must_use]
    pub fn is_initiated(&self) -> bool {
        !self.cards_to_fall.is_empty() || !self.fell_cards.is_empty()
    }

    /// Values present in `cards_to_fall` or `fell_cards`.
    #[must_use]
    pub fn table_values(&self) -> FxHashSet<u8> {
        self.cards_to_fall
            .iter()
            .chain(&self.fell_cards)
            .map(|c| c.value)
            .collect()
    }

    /// True if `player` holds a card whose value is on the table.
    #[must_use]
    pub fn has_playable_values(&self, player: PlayerId) -> bool {
        let values = self.table_values();
        self.hand(player).iter().any(|c| values.contains(&c.value))
    }

    /// How many more cards the target can be made to answer.
    #[must_use]
    pub fn fits_to_table(&self) -> isize {
        self.hand(self.target()).len() as isize - self.cards_to_fall.len() as isize
    }

    /// True if a kopled card is waiting on the table.
    #[must_use]
    pub fn has_kopled(&self) -> bool {
        self.cards_to_fall.iter().any(|c| c.kopled)
    }

    /// True if `player` can fall some table card from hand.
    #[must_use]
    pub fn can_fall_cards(&self, player: PlayerId) -> bool {
        any_falls(self.hand(player).cards(), &self.cards_to_fall, self.triumph())
    }

    /// Every other unranked player is ready and cards were played.
    #[must_use]
    pub fn can_end_turn(&self, player: PlayerId) -> bool {
        let others_ready = self
            .seats
            .iter()
            .filter(|(p, s)| *p != player && s.rank.is_none())
            .all(|(_, s)| s.ready);
        others_ready && self.is_initiated()
    }

    /// `player` can end the turn and has nothing else to do.
    #[must_use]
    pub fn must_end_turn(&self, player: PlayerId) -> bool {
        self.can_end_turn(player)
            && !self.can_fall_cards(player)
            && !self.has_playable_values(player)
            && (self.deck.is_empty() || self.has_kopled())
    }

    // === Bookkeeping ===

    /// Fix the rank of every player who just finished.
    ///
    /// A player finishes with an empty hand once the deck is empty, or by
    /// being the last unranked player. Returns the newly ranked players.
    pub(crate) fn update_ranks(&mut self) -> Vec<(PlayerId, u8)> {
        let mut ranked = Vec::new();
        loop {
            let before = ranked.len();
            for player in self.seats.player_ids() {
                if self.seats[player].rank.is_some() {
                    continue;
                }
                let out_of_cards = self.seats[player].hand.is_empty() && self.deck.is_empty();
                if out_of_cards || self.active_count() <= 1 {
                    let rank = (self.player_count() - self.active_count() + 1) as u8;
                    self.seats[player].rank = Some(rank);
                    info!(%player, rank, "player finished");
                    ranked.push((player, rank));
                }
            }
            if ranked.len() == before {
                return ranked;
            }
        }
    }

    /// Draw `player` back up to the hand size from the deck.
    pub(crate) fn refill(&mut self, player: PlayerId) -> Vec<Card> {
        let missing = self.hand_size.saturating_sub(self.seats[player].hand.len());
        let drawn = self.deck.draw_up_to(missing);
        self.seats[player].hand.add(drawn.iter().copied());
        drawn
    }

    /// Record a decision-point vector unless it repeats the previous one.
    pub(crate) fn record_state_vector(&mut self, player: PlayerId, vector: Vec<f32>) -> bool {
        let log = &mut self.state_vectors[player];
        if log.last() == Some(&vector) {
            return false;
        }
        log.push(vector);
        true
    }

    fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.deck
            .iter()
            .chain(self.seats.values().flat_map(|s| s.hand.iter()))
            .chain(&self.cards_to_fall)
            .chain(&self.fell_cards)
            .chain(&self.discard)
    }

    /// No duplicate table card, and every card is in exactly one place.
    pub fn check_invariants(&self) -> GameResult<()> {
        let mut on_table = FxHashSet::default();
        for card in &self.cards_to_fall {
            if !on_table.insert(*card) {
                return Err(GameError::InvariantViolation(format!(
                    "duplicate card {card} on the table"
                )));
            }
        }
        if let Some(card) = self.fell_cards.iter().find(|c| on_table.contains(*c)) {
            return Err(GameError::InvariantViolation(format!(
                "{card} is both waiting and fallen"
            )));
        }

        let mut seen = FxHashSet::default();
        let mut count = 0;
        for card in self.all_cards() {
            count += 1;
            if !seen.insert(*card) {
                return Err(GameError::InvariantViolation(format!(
                    "{card} is in play twice"
                )));
            }
        }
        if count != self.card_total {
            return Err(GameError::InvariantViolation(format!(
                "{count} cards in play, expected {}",
                self.card_total
            )));
        }
        Ok(())
    }
}

//! A seeded random policy.

use crate::core::{Card, GameRng, PlayerId};
use crate::rules::fall::{check_can_fall_card, fallable_by};
use crate::rules::{MoveKind, MoveSet};

use super::decider::{Decider, PlayerView};

/// Plays uniformly random legal moves, skipping only when nothing else is
/// legal. Always builds arguments its chosen kind accepts.
#[derive(Clone, Debug)]
pub struct RandomDecider {
    name: String,
    rng: GameRng,
}

impl RandomDecider {
    #[must_use]
    pub fn new(seed: u64, player: PlayerId) -> Self {
        Self {
            name: format!("random-{}", player.index()),
            rng: GameRng::new(seed).for_context(&format!("decider-{}", player.index())),
        }
    }

    fn pick_one(&mut self, cards: &[Card]) -> Vec<Card> {
        self.rng.choose(cards).copied().into_iter().collect()
    }

    fn playable(view: &PlayerView<'_, '_>) -> Vec<Card> {
        let values = view.table_values();
        view.hand()
            .iter()
            .filter(|c| values.contains(&c.value))
            .copied()
            .collect()
    }
}

impl Decider for RandomDecider {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, _view: &mut PlayerView<'_, '_>, legal: &MoveSet) -> MoveKind {
        let active: Vec<MoveKind> = legal.iter().filter(|k| *k != MoveKind::Skip).collect();
        self.rng.choose(&active).copied().unwrap_or(MoveKind::Skip)
    }

    fn end_turn(&mut self, view: &mut PlayerView<'_, '_>) -> Vec<Card> {
        view.cards_to_fall().to_vec()
    }

    fn play_fall_card_from_hand(&mut self, view: &mut PlayerView<'_, '_>) -> Vec<(Card, Card)> {
        let triumph = view.triumph();
        let pairs: Vec<(Card, Card)> = view
            .hand()
            .iter()
            .flat_map(|h| {
                view.cards_to_fall()
                    .iter()
                    .filter(move |t| check_can_fall_card(h, t, triumph))
                    .map(move |t| (*h, *t))
            })
            .collect();
        self.rng.choose(&pairs).copied().into_iter().collect()
    }

    fn deck_lift_fall_method(
        &mut self,
        view: &mut PlayerView<'_, '_>,
        card: Card,
    ) -> Option<(Card, Card)> {
        fallable_by(&card, view.cards_to_fall(), view.triumph())
            .next()
            .map(|t| (card, *t))
    }

    fn play_to_self(&mut self, view: &mut PlayerView<'_, '_>) -> Vec<Card> {
        let playable = Self::playable(view);
        self.pick_one(&playable)
    }

    fn play_initial(&mut self, view: &mut PlayerView<'_, '_>) -> Vec<Card> {
        let hand = view.hand().cards().to_vec();
        self.pick_one(&hand)
    }

    fn play_to_target(&mut self, view: &mut PlayerView<'_, '_>) -> Vec<Card> {
        let playable = Self::playable(view);
        self.pick_one(&playable)
    }
}

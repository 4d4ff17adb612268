//! The move registry: one handler per [`Move`] variant.
//!
//! Every handler validates all of its preconditions before touching the
//! state, so a rejected move leaves the game exactly as it was. On success it
//! returns the [`MoveEffect`] the card monitor replays.

use rustc_hash::FxHashSet;
use tracing::debug;

use super::effect::MoveEffect;
use super::fall::{check_can_fall_card, fallable_by};
use super::moves::{Move, MoveKind};
use crate::core::{Card, PlayerId};
use crate::error::{GameError, GameResult};
use crate::game::GameCore;

/// Apply `mv` for `mover`, or reject it without side effects.
pub(crate) fn apply(core: &mut GameCore, mover: PlayerId, mv: &Move) -> GameResult<MoveEffect> {
    match mv {
        Move::InitialPlay { target, cards } => initial_play(core, mover, *target, cards),
        Move::PlayToOther { target, cards } => play_to_other(core, mover, *target, cards),
        Move::PlayToSelf { cards } => play_to_self(core, mover, cards),
        Move::PlayFallFromHand { pairs } => play_fall_from_hand(core, mover, pairs),
        Move::PlayFallFromDeck { fall } => play_fall_from_deck(core, mover, *fall),
        Move::EndTurn { pick } => end_turn(core, mover, pick),
        Move::Skip => skip(core, mover),
        Move::PlayToSelfFromDeck { cards } => play_to_self_from_deck(core, mover, cards),
    }
}

fn ensure(cond: bool, kind: MoveKind, reason: impl FnOnce() -> String) -> GameResult<()> {
    if cond {
        Ok(())
    } else {
        Err(GameError::rejected(kind, reason()))
    }
}

fn ensure_active(core: &GameCore, mover: PlayerId, kind: MoveKind) -> GameResult<()> {
    ensure(core.is_active(mover), kind, || {
        format!("{mover} has already finished")
    })
}

fn ensure_target(core: &GameCore, mover: PlayerId, kind: MoveKind) -> GameResult<()> {
    ensure(core.target() == mover, kind, || {
        format!("{mover} is not the target ({} is)", core.target())
    })
}

fn ensure_in_hand(core: &GameCore, mover: PlayerId, cards: &[Card], kind: MoveKind) -> GameResult<()> {
    ensure(!cards.is_empty(), kind, || "no cards selected".into())?;
    ensure(core.hand(mover).contains_all(cards), kind, || {
        format!("{mover} does not hold {}", fmt_cards(cards))
    })
}

fn ensure_values_on_table(core: &GameCore, cards: &[Card], kind: MoveKind) -> GameResult<()> {
    let values = core.table_values();
    match cards.iter().find(|c| !values.contains(&c.value)) {
        Some(card) => Err(GameError::rejected(
            kind,
            format!("value of {card} is not on the table"),
        )),
        None => Ok(()),
    }
}

/// Same cards regardless of order, with no repeats.
fn same_cards(a: &[Card], b: impl IntoIterator<Item = Card>) -> bool {
    let a_set: FxHashSet<Card> = a.iter().copied().collect();
    let b_set: FxHashSet<Card> = b.into_iter().collect();
    a_set.len() == a.len() && a_set == b_set
}

fn fmt_cards(cards: &[Card]) -> String {
    let names: Vec<String> = cards.iter().map(ToString::to_string).collect();
    format!("[{}]", names.join(", "))
}

/// Move `cards` from `mover`'s hand onto the table and refill.
fn hand_to_table(core: &mut GameCore, mover: PlayerId, cards: &[Card], effect: &mut MoveEffect) {
    let removed = core.seats[mover].hand.remove(|c| cards.contains(c));
    core.cards_to_fall.extend(removed.iter().copied());
    effect.left_hand(mover, removed.iter().copied());
    effect.entered_table.extend(removed);
    let drawn = core.refill(mover);
    effect.entered_hand(mover, drawn);
}

fn initial_play(
    core: &mut GameCore,
    mover: PlayerId,
    target: PlayerId,
    cards: &[Card],
) -> GameResult<MoveEffect> {
    let kind = MoveKind::InitialPlay;
    ensure_active(core, mover, kind)?;
    ensure(!core.is_initiated(), kind, || "the table is not empty".into())?;
    ensure(core.initiating_player() == Some(mover), kind, || {
        format!("{mover} is not the initiating player")
    })?;
    ensure(target == core.target(), kind, || {
        format!("{target} is not the target")
    })?;
    ensure_in_hand(core, mover, cards, kind)?;
    let singles_or_sets = cards.len() == 1
        || cards
            .iter()
            .all(|c| cards.iter().filter(|o| o.value == c.value).count() >= 2);
    ensure(singles_or_sets, kind, || {
        "an opening is one card or only values played at least twice".into()
    })?;
    ensure(core.hand(target).len() >= cards.len(), kind, || {
        format!("{target} cannot answer {} cards", cards.len())
    })?;

    let mut effect = MoveEffect::new(kind, mover);
    hand_to_table(core, mover, cards, &mut effect);
    core.seats[mover].ready = true;
    Ok(effect)
}

fn play_to_other(
    core: &mut GameCore,
    mover: PlayerId,
    target: PlayerId,
    cards: &[Card],
) -> GameResult<MoveEffect> {
    let kind = MoveKind::PlayToOther;
    ensure_active(core, mover, kind)?;
    ensure(mover != core.target(), kind, || {
        "the target cannot play to itself this way".into()
    })?;
    ensure(target == core.target(), kind, || {
        format!("{target} is not the target")
    })?;
    ensure_in_hand(core, mover, cards, kind)?;
    ensure_values_on_table(core, cards, kind)?;
    ensure(core.fits_to_table() >= cards.len() as isize, kind, || {
        format!("only {} more cards fit to the table", core.fits_to_table().max(0))
    })?;

    let mut effect = MoveEffect::new(kind, mover);
    hand_to_table(core, mover, cards, &mut effect);
    core.seats[mover].ready = true;
    Ok(effect)
}

fn play_to_self(core: &mut GameCore, mover: PlayerId, cards: &[Card]) -> GameResult<MoveEffect> {
    let kind = MoveKind::PlayToSelf;
    ensure_active(core, mover, kind)?;
    ensure_target(core, mover, kind)?;
    ensure(!core.deck.is_empty(), kind, || "the deck is empty".into())?;
    ensure_in_hand(core, mover, cards, kind)?;
    ensure_values_on_table(core, cards, kind)?;

    let mut effect = MoveEffect::new(kind, mover);
    hand_to_table(core, mover, cards, &mut effect);
    Ok(effect)
}

fn play_fall_from_hand(
    core: &mut GameCore,
    mover: PlayerId,
    pairs: &[(Card, Card)],
) -> GameResult<MoveEffect> {
    let kind = MoveKind::PlayFallFromHand;
    ensure_active(core, mover, kind)?;
    ensure_target(core, mover, kind)?;
    ensure(!pairs.is_empty(), kind, || "no cards selected".into())?;

    let hand_cards: Vec<Card> = pairs.iter().map(|(h, _)| *h).collect();
    let table_cards: Vec<Card> = pairs.iter().map(|(_, t)| *t).collect();
    ensure_in_hand(core, mover, &hand_cards, kind)?;
    let table_set: FxHashSet<Card> = table_cards.iter().copied().collect();
    ensure(table_set.len() == table_cards.len(), kind, || {
        "a table card can only be fallen once".into()
    })?;
    if let Some(card) = table_cards.iter().find(|t| !core.cards_to_fall.contains(t)) {
        return Err(GameError::rejected(kind, format!("{card} is not waiting on the table")));
    }
    let triumph = core.triumph();
    if let Some((h, t)) = pairs.iter().find(|(h, t)| !check_can_fall_card(h, t, triumph)) {
        return Err(GameError::rejected(kind, format!("{h} cannot fall {t}")));
    }

    let mut effect = MoveEffect::new(kind, mover);
    let removed = core.seats[mover].hand.remove(|c| hand_cards.contains(c));
    effect.left_hand(mover, removed);
    core.cards_to_fall.retain(|c| !table_set.contains(c));
    for (h, t) in pairs {
        core.fell_cards.push(t.untagged());
        core.fell_cards.push(h.untagged());
        effect.left_table.push(*t);
    }
    Ok(effect)
}

fn play_fall_from_deck(
    core: &mut GameCore,
    mover: PlayerId,
    fall: Option<(Card, Card)>,
) -> GameResult<MoveEffect> {
    let kind = MoveKind::PlayFallFromDeck;
    ensure_active(core, mover, kind)?;
    ensure_target(core, mover, kind)?;
    ensure(!core.deck.is_empty(), kind, || "the deck is empty".into())?;
    ensure(!core.cards_to_fall.is_empty(), kind, || "nothing to fall".into())?;
    ensure(!core.has_kopled(), kind, || "a kopled card is already on the table".into())?;

    let Some(drawn) = core.deck.peek_top().copied() else {
        return Err(GameError::InsufficientCards {
            requested: 1,
            available: 0,
        });
    };

    let mut effect = MoveEffect::new(kind, mover);
    let candidates: Vec<Card> = fallable_by(&drawn, &core.cards_to_fall, core.triumph())
        .copied()
        .collect();
    if candidates.is_empty() {
        debug!(card = %drawn, "lifted card cannot fall anything, leaving it kopled");
        core.deck.pop_cards(1)?;
        let kopled = drawn.into_kopled();
        core.cards_to_fall.push(kopled);
        effect.entered_table.push(kopled);
        return Ok(effect);
    }

    let chosen = match fall {
        Some((deck_card, table_card)) if deck_card == drawn && candidates.contains(&table_card) => {
            table_card
        }
        _ => {
            let pick = core.lift_rng.choose(&candidates).copied();
            debug!(card = %drawn, supplied = ?fall, chosen = ?pick, "invalid lift pairing, using fallback");
            pick.ok_or_else(|| {
                GameError::InvariantViolation("no fallback pairing for a fallable card".into())
            })?
        }
    };
    core.deck.pop_cards(1)?;
    core.cards_to_fall.retain(|c| *c != chosen);
    core.fell_cards.push(chosen.untagged());
    core.fell_cards.push(drawn);
    effect.left_table.push(chosen);
    Ok(effect)
}

fn play_to_self_from_deck(
    core: &mut GameCore,
    mover: PlayerId,
    cards: &[Card],
) -> GameResult<MoveEffect> {
    let kind = MoveKind::PlayToSelfFromDeck;
    ensure_active(core, mover, kind)?;
    ensure_target(core, mover, kind)?;
    ensure(!cards.is_empty(), kind, || "no cards selected".into())?;
    ensure(core.deck.peek_top_n(cards.len()) == cards, kind, || {
        format!("{} are not the top cards of the deck", fmt_cards(cards))
    })?;
    ensure_values_on_table(core, cards, kind)?;

    let mut effect = MoveEffect::new(kind, mover);
    let lifted = core.deck.pop_cards(cards.len())?;
    core.cards_to_fall.extend(lifted.iter().copied());
    effect.entered_table.extend(lifted);
    Ok(effect)
}

fn end_turn(core: &mut GameCore, mover: PlayerId, pick: &[Card]) -> GameResult<MoveEffect> {
    let kind = MoveKind::EndTurn;
    ensure_target(core, mover, kind)?;
    let mut effect = MoveEffect::new(kind, mover);

    if !core.is_active(mover) {
        ensure(pick.is_empty(), kind, || "a finished player picks nothing".into())?;
        let left = std::mem::take(&mut core.cards_to_fall);
        effect.left_table.extend(left.iter().copied());
        core.discard.extend(left.into_iter().map(Card::untagged));
        let fell = std::mem::take(&mut core.fell_cards);
        core.discard.extend(fell);
        finish_turn(core, false);
        return Ok(effect);
    }

    ensure(core.can_end_turn(mover), kind, || {
        "other players are not ready or nothing was played".into()
    })?;
    let picks_table = same_cards(pick, core.cards_to_fall.iter().copied());
    let picks_all = same_cards(
        pick,
        core.cards_to_fall.iter().chain(&core.fell_cards).copied(),
    );
    ensure(picks_table || picks_all, kind, || {
        format!(
            "must pick the cards to fall or every card on the table, not {}",
            fmt_cards(pick)
        )
    })?;

    let left = std::mem::take(&mut core.cards_to_fall);
    effect.left_table.extend(left.iter().copied());
    let fell = std::mem::take(&mut core.fell_cards);
    let mut lifted = left;
    if picks_all && !picks_table {
        lifted.extend(fell);
    } else {
        core.discard.extend(fell);
    }
    let lifted: Vec<Card> = lifted.into_iter().map(Card::untagged).collect();
    core.seats[mover].hand.add(lifted.iter().copied());
    effect.entered_hand(mover, lifted.iter().copied());
    let drawn = core.refill(mover);
    effect.entered_hand(mover, drawn);

    finish_turn(core, !lifted.is_empty());
    Ok(effect)
}

/// Clear readiness and move the target on; a lifter loses the initiative.
fn finish_turn(core: &mut GameCore, lifted: bool) {
    for (_, seat) in core.seats.iter_mut() {
        seat.ready = false;
    }
    let ranks = core.ranks();
    let unranked = |p: PlayerId| ranks[p.index()].is_none();
    core.turn_cycle.advance_to(unranked, true);
    if lifted {
        core.turn_cycle.advance_to(unranked, true);
    }
    debug!(target = %core.target(), "turn passed");
}

fn skip(core: &mut GameCore, mover: PlayerId) -> GameResult<MoveEffect> {
    let kind = MoveKind::Skip;
    let target = core.target();
    if !core.is_active(mover) {
        ensure(mover != target, kind, || "a finished target must end the turn".into())?;
    } else if mover == target {
        ensure(!core.must_end_turn(mover), kind, || "the target must end the turn".into())?;
    } else {
        ensure(
            core.is_initiated() || core.initiating_player() != Some(mover),
            kind,
            || "the initiating player must open the table".into(),
        )?;
        core.seats[mover].ready = true;
    }
    Ok(MoveEffect::new(kind, mover))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Suit;
    use crate::game::{Game, GameStateSnapshot, LockHolder, StateSnapshot, TableSetup};
    use crate::monitor::CardMonitor;

    fn c(suit: Suit, value: u8) -> Card {
        Card::new(suit, value)
    }

    fn p(i: u8) -> PlayerId {
        PlayerId::new(i)
    }

    /// Three seats, seat 0 targeted by seat 2, spades triumph.
    fn three_seats(hands: Vec<Vec<Card>>) -> TableSetup {
        TableSetup::new(hands, c(Suit::Spades, 14))
    }

    #[test]
    fn test_initial_play_moves_cards_and_refills() {
        let setup = three_seats(vec![
            vec![c(Suit::Hearts, 2), c(Suit::Hearts, 3)],
            vec![c(Suit::Clubs, 4)],
            vec![c(Suit::Hearts, 7), c(Suit::Clubs, 7), c(Suit::Diamonds, 9)],
        ])
        .with_deck(vec![c(Suit::Diamonds, 10), c(Suit::Diamonds, 11)])
        .with_hand_size(3);
        let mut core = GameCore::from_setup(setup).unwrap();

        let mv = Move::InitialPlay {
            target: p(0),
            cards: vec![c(Suit::Hearts, 7), c(Suit::Clubs, 7)],
        };
        let effect = apply(&mut core, p(2), &mv).unwrap();

        assert_eq!(core.cards_to_fall(), &[c(Suit::Hearts, 7), c(Suit::Clubs, 7)]);
        assert_eq!(core.hand(p(2)).len(), 3);
        assert!(core.deck().is_empty());
        assert!(core.is_ready(p(2)));
        assert_eq!(effect.entered_table.len(), 2);
        assert_eq!(effect.entered_hands.len(), 2);
    }

    #[test]
    fn test_initial_play_rejects_unpaired_values() {
        let setup = three_seats(vec![
            vec![c(Suit::Hearts, 2), c(Suit::Hearts, 3)],
            vec![],
            vec![c(Suit::Hearts, 7), c(Suit::Clubs, 8)],
        ]);
        let mut core = GameCore::from_setup(setup).unwrap();
        let before = core.clone();

        let mv = Move::InitialPlay {
            target: p(0),
            cards: vec![c(Suit::Hearts, 7), c(Suit::Clubs, 8)],
        };
        let err = apply(&mut core, p(2), &mv).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(core.cards_to_fall(), before.cards_to_fall());
        assert_eq!(core.hand(p(2)), before.hand(p(2)));
    }

    #[test]
    fn test_initial_play_only_by_initiator() {
        let setup = three_seats(vec![
            vec![c(Suit::Hearts, 2)],
            vec![c(Suit::Clubs, 4)],
            vec![c(Suit::Hearts, 7)],
        ]);
        let mut core = GameCore::from_setup(setup).unwrap();

        let mv = Move::InitialPlay {
            target: p(0),
            cards: vec![c(Suit::Clubs, 4)],
        };
        assert!(matches!(
            apply(&mut core, p(1), &mv),
            Err(GameError::MoveRejected { kind: MoveKind::InitialPlay, .. })
        ));
    }

    #[test]
    fn test_play_to_other_respects_capacity() {
        let setup = three_seats(vec![
            vec![c(Suit::Hearts, 2)],
            vec![c(Suit::Clubs, 7), c(Suit::Diamonds, 7)],
            vec![],
        ])
        .with_cards_to_fall(vec![c(Suit::Hearts, 7)]);
        let mut core = GameCore::from_setup(setup).unwrap();

        let too_many = Move::PlayToOther {
            target: p(0),
            cards: vec![c(Suit::Clubs, 7)],
        };
        assert!(apply(&mut core, p(1), &too_many).is_err());
        assert_eq!(core.cards_to_fall().len(), 1);
    }

    #[test]
    fn test_play_to_other_needs_table_value() {
        let setup = three_seats(vec![
            vec![c(Suit::Hearts, 2), c(Suit::Hearts, 3), c(Suit::Hearts, 4)],
            vec![c(Suit::Clubs, 7), c(Suit::Diamonds, 8)],
            vec![],
        ])
        .with_cards_to_fall(vec![c(Suit::Hearts, 7)]);
        let mut core = GameCore::from_setup(setup).unwrap();

        let wrong = Move::PlayToOther {
            target: p(0),
            cards: vec![c(Suit::Diamonds, 8)],
        };
        assert!(apply(&mut core, p(1), &wrong).is_err());

        let right = Move::PlayToOther {
            target: p(0),
            cards: vec![c(Suit::Clubs, 7)],
        };
        apply(&mut core, p(1), &right).unwrap();
        assert_eq!(core.cards_to_fall(), &[c(Suit::Hearts, 7), c(Suit::Clubs, 7)]);
        assert!(core.is_ready(p(1)));
    }

    #[test]
    fn test_fall_from_hand_with_triumph() {
        let setup = three_seats(vec![
            vec![c(Suit::Spades, 10), c(Suit::Clubs, 3)],
            vec![],
            vec![],
        ])
        .with_cards_to_fall(vec![c(Suit::Hearts, 5)]);
        let mut core = GameCore::from_setup(setup).unwrap();

        let mv = Move::PlayFallFromHand {
            pairs: vec![(c(Suit::Spades, 10), c(Suit::Hearts, 5))],
        };
        let effect = apply(&mut core, p(0), &mv).unwrap();

        assert!(core.cards_to_fall().is_empty());
        assert!(core.fell_cards().contains(&c(Suit::Hearts, 5)));
        assert!(!core.hand(p(0)).contains(&c(Suit::Spades, 10)));
        assert_eq!(effect.left_table, vec![c(Suit::Hearts, 5)]);
    }

    #[test]
    fn test_fall_from_hand_rejects_bad_pair() {
        let setup = three_seats(vec![vec![c(Suit::Hearts, 3)], vec![], vec![]])
            .with_cards_to_fall(vec![c(Suit::Hearts, 5)]);
        let mut core = GameCore::from_setup(setup).unwrap();

        let mv = Move::PlayFallFromHand {
            pairs: vec![(c(Suit::Hearts, 3), c(Suit::Hearts, 5))],
        };
        assert!(apply(&mut core, p(0), &mv).is_err());
        assert_eq!(core.cards_to_fall(), &[c(Suit::Hearts, 5)]);
        assert!(core.fell_cards().is_empty());
    }

    #[test]
    fn test_fall_from_deck_uses_supplied_pairing() {
        let setup = three_seats(vec![vec![c(Suit::Clubs, 2)], vec![], vec![]])
            .with_cards_to_fall(vec![c(Suit::Hearts, 5), c(Suit::Hearts, 6)])
            .with_deck(vec![c(Suit::Hearts, 9)]);
        let mut core = GameCore::from_setup(setup).unwrap();

        let mv = Move::PlayFallFromDeck {
            fall: Some((c(Suit::Hearts, 9), c(Suit::Hearts, 6))),
        };
        apply(&mut core, p(0), &mv).unwrap();
        assert_eq!(core.cards_to_fall(), &[c(Suit::Hearts, 5)]);
        assert_eq!(core.fell_cards(), &[c(Suit::Hearts, 6), c(Suit::Hearts, 9)]);
    }

    #[test]
    fn test_fall_from_deck_fallback_is_seeded() {
        let run = || {
            let setup = three_seats(vec![vec![c(Suit::Clubs, 2)], vec![], vec![]])
                .with_cards_to_fall(vec![c(Suit::Hearts, 5), c(Suit::Hearts, 6)])
                .with_deck(vec![c(Suit::Hearts, 9)])
                .with_seed(11);
            let mut core = GameCore::from_setup(setup).unwrap();
            let mv = Move::PlayFallFromDeck { fall: None };
            apply(&mut core, p(0), &mv).unwrap();
            core.cards_to_fall().to_vec()
        };
        let first = run();
        assert_eq!(first.len(), 1);
        assert_eq!(first, run());
    }

    #[test]
    fn test_fall_from_deck_wrong_deck_card_falls_back() {
        let run = |fall| {
            let setup = three_seats(vec![vec![c(Suit::Clubs, 2)], vec![], vec![]])
                .with_cards_to_fall(vec![c(Suit::Hearts, 5), c(Suit::Hearts, 6)])
                .with_deck(vec![c(Suit::Hearts, 9)])
                .with_seed(11);
            let mut core = GameCore::from_setup(setup).unwrap();
            apply(&mut core, p(0), &Move::PlayFallFromDeck { fall }).unwrap();
            core
        };

        // The pairing names a card that is not on top of the deck.
        let core = run(Some((c(Suit::Hearts, 10), c(Suit::Hearts, 6))));
        assert!(core.deck().is_empty());
        assert_eq!(core.cards_to_fall().len(), 1);
        assert_eq!(core.fell_cards().len(), 2);
        assert_eq!(core.fell_cards()[1], c(Suit::Hearts, 9));
        assert!(!core.has_kopled());
        assert_eq!(core.cards_to_fall(), run(None).cards_to_fall());
    }

    #[test]
    fn test_fall_from_deck_kopled_when_nothing_falls() {
        let setup = three_seats(vec![vec![c(Suit::Clubs, 2)], vec![], vec![]])
            .with_cards_to_fall(vec![c(Suit::Hearts, 5)])
            .with_deck(vec![c(Suit::Diamonds, 3)]);
        let mut core = GameCore::from_setup(setup).unwrap();

        apply(&mut core, p(0), &Move::PlayFallFromDeck { fall: None }).unwrap();
        assert_eq!(core.cards_to_fall().len(), 2);
        assert!(core.cards_to_fall()[1].kopled);
        assert!(core.has_kopled());

        let again = apply(&mut core, p(0), &Move::PlayFallFromDeck { fall: None });
        assert!(again.is_err());
    }

    #[test]
    fn test_end_turn_pick_rules_and_advance() {
        let setup = three_seats(vec![
            vec![c(Suit::Clubs, 2)],
            vec![c(Suit::Clubs, 3)],
            vec![c(Suit::Clubs, 4)],
        ])
        .with_cards_to_fall(vec![c(Suit::Hearts, 5)])
        .with_fell_cards(vec![c(Suit::Hearts, 3), c(Suit::Hearts, 9)])
        .with_ready(p(1))
        .with_ready(p(2))
        .with_hand_size(1);
        let mut core = GameCore::from_setup(setup).unwrap();

        let partial = Move::EndTurn {
            pick: vec![c(Suit::Hearts, 3)],
        };
        assert!(apply(&mut core, p(0), &partial).is_err());

        let mv = Move::EndTurn {
            pick: vec![c(Suit::Hearts, 5)],
        };
        apply(&mut core, p(0), &mv).unwrap();
        assert!(core.hand(p(0)).contains(&c(Suit::Hearts, 5)));
        assert_eq!(core.discard().len(), 2);
        assert!(!core.is_initiated());
        // Lifted: seat 1 is skipped and seat 2 becomes the target.
        assert_eq!(core.target(), p(2));
        assert!(core.players().all(|pl| !core.is_ready(pl)));
    }

    fn pick_all_setup() -> TableSetup {
        three_seats(vec![
            vec![c(Suit::Clubs, 2)],
            vec![c(Suit::Clubs, 3)],
            vec![c(Suit::Clubs, 4)],
        ])
        .with_cards_to_fall(vec![c(Suit::Hearts, 5)])
        .with_fell_cards(vec![c(Suit::Hearts, 3), c(Suit::Hearts, 9)])
        .with_ready(p(1))
        .with_ready(p(2))
        .with_hand_size(1)
    }

    fn pick_all() -> Move {
        Move::EndTurn {
            pick: vec![c(Suit::Hearts, 9), c(Suit::Hearts, 5), c(Suit::Hearts, 3)],
        }
    }

    #[test]
    fn test_end_turn_pick_all_lifts_fell_cards() {
        let game = Game::from_setup(pick_all_setup()).unwrap();
        let mut guard = game.acquire(LockHolder::Player(p(0))).unwrap();

        guard.propose(p(0), &pick_all()).unwrap();

        let hand = guard.hand(p(0));
        assert_eq!(hand.len(), 4);
        for card in [c(Suit::Hearts, 3), c(Suit::Hearts, 5), c(Suit::Hearts, 9)] {
            assert!(hand.contains(&card), "{card} not lifted");
        }
        assert!(guard.discard().is_empty());
        assert!(!guard.is_initiated());
        assert_eq!(guard.target(), p(2));

        let rebuilt = CardMonitor::rebuild(
            guard.players().map(|pl| guard.hand(pl)),
            guard.cards_to_fall(),
            guard.triumph(),
        );
        assert_eq!(guard.monitor(), &rebuilt);
    }

    #[test]
    fn test_mock_end_turn_pick_all() {
        let mocked = Game::from_setup(pick_all_setup()).unwrap();
        let committed = Game::from_setup(pick_all_setup()).unwrap();

        let mut guard = mocked.acquire(LockHolder::Player(p(0))).unwrap();
        let before = StateSnapshot::capture(&guard);
        let predicted = guard.mock(p(0), &pick_all()).unwrap();
        assert_eq!(StateSnapshot::capture(&guard).diff(&before), None);

        let mut real = committed.acquire(LockHolder::Player(p(0))).unwrap();
        real.propose(p(0), &pick_all()).unwrap();
        assert_eq!(predicted, GameStateSnapshot::from_core(&real));
    }

    #[test]
    fn test_end_turn_without_pick_passes_to_next() {
        let setup = three_seats(vec![vec![c(Suit::Clubs, 2)], vec![], vec![c(Suit::Clubs, 4)]])
            .with_fell_cards(vec![c(Suit::Hearts, 3), c(Suit::Hearts, 9)])
            .with_rank(p(1), 1)
            .with_ready(p(2));
        let mut core = GameCore::from_setup(setup).unwrap();

        apply(&mut core, p(0), &Move::EndTurn { pick: vec![] }).unwrap();
        assert_eq!(core.target(), p(2));
    }

    #[test]
    fn test_end_turn_requires_ready_players() {
        let setup = three_seats(vec![vec![c(Suit::Clubs, 2)], vec![c(Suit::Clubs, 3)], vec![]])
            .with_cards_to_fall(vec![c(Suit::Hearts, 5)])
            .with_ready(p(2))
            .with_rank(p(2), 1);
        let mut core = GameCore::from_setup(setup).unwrap();
        assert!(apply(&mut core, p(0), &Move::EndTurn { pick: vec![c(Suit::Hearts, 5)] }).is_err());
    }

    #[test]
    fn test_finished_target_discards_table() {
        let setup = three_seats(vec![vec![], vec![c(Suit::Clubs, 3)], vec![c(Suit::Clubs, 4)]])
            .with_cards_to_fall(vec![c(Suit::Hearts, 5)])
            .with_rank(p(0), 1);
        let mut core = GameCore::from_setup(setup).unwrap();

        assert!(apply(&mut core, p(0), &Move::Skip).is_err());
        apply(&mut core, p(0), &Move::EndTurn { pick: vec![] }).unwrap();
        assert_eq!(core.discard(), &[c(Suit::Hearts, 5)]);
        assert_eq!(core.target(), p(1));
    }

    #[test]
    fn test_initiator_cannot_skip_empty_table() {
        let setup = three_seats(vec![vec![c(Suit::Clubs, 2)], vec![c(Suit::Clubs, 3)], vec![c(Suit::Clubs, 4)]]);
        let mut core = GameCore::from_setup(setup).unwrap();

        assert!(apply(&mut core, p(2), &Move::Skip).is_err());
        apply(&mut core, p(1), &Move::Skip).unwrap();
        assert!(core.is_ready(p(1)));
    }

    #[test]
    fn test_play_to_self_from_deck_takes_top_cards() {
        let setup = three_seats(vec![vec![c(Suit::Clubs, 2)], vec![], vec![]])
            .with_cards_to_fall(vec![c(Suit::Hearts, 5)])
            .with_deck(vec![c(Suit::Diamonds, 9), c(Suit::Diamonds, 5)]);
        let mut core = GameCore::from_setup(setup).unwrap();

        let wrong = Move::PlayToSelfFromDeck {
            cards: vec![c(Suit::Diamonds, 9)],
        };
        assert!(apply(&mut core, p(0), &wrong).is_err());

        let mv = Move::PlayToSelfFromDeck {
            cards: vec![c(Suit::Diamonds, 5)],
        };
        apply(&mut core, p(0), &mv).unwrap();
        assert_eq!(core.cards_to_fall(), &[c(Suit::Hearts, 5), c(Suit::Diamonds, 5)]);
        assert_eq!(core.deck().len(), 1);
    }
}

//! Weighted feature scoring of a single candidate move.
//!
//! Scores are plain weighted sums over the [`Feature`](crate::Feature) set.
//! The tableau shape terms (`StackHeightBonus`, `SpreadPenalty`) are
//! computed arithmetically from pile lengths; nothing here clones the
//! board.

use rusbank_engine::{Card, GameState, Move, PileLocation, PlayerId, Rank, foundation_suit};

use crate::weights::{Feature, Weights};

/// Scores `mv` for the player to move. Higher is better; penalties are
/// carried by negative weights.
#[must_use]
pub fn score_move(state: &GameState, mv: &Move, weights: &Weights) -> i32 {
    let player = state.current_turn();
    let mut score = 0;

    score += destination_score(mv, player, weights);
    score += source_score(state, mv, player, weights);

    if let PileLocation::Tableau(owner, _) = mv.to {
        if owner == player {
            let (height_gain, spread_delta) = tableau_shape_delta(state, mv, player);
            if height_gain > 0 {
                score += weights[Feature::StackHeightBonus] * height_gain;
            }
            score += weights[Feature::SpreadPenalty] * spread_delta;
        }
    }

    score
}

fn destination_score(mv: &Move, player: PlayerId, weights: &Weights) -> i32 {
    match mv.to {
        PileLocation::Foundation(_) => {
            let mut score = weights[Feature::ToFoundation];
            if mv.card.rank() == Rank::ACE {
                score += weights[Feature::PlaysAce];
            } else if mv.card.rank().value() == 2 {
                score += weights[Feature::PlaysTwo];
            }
            score
        }
        PileLocation::Reserve(owner) if owner != player => weights[Feature::AttackReserve],
        PileLocation::Waste(owner) if owner != player => weights[Feature::AttackWaste],
        PileLocation::Tableau(owner, _) => {
            if owner == player {
                weights[Feature::ToOwnTableau]
            } else {
                weights[Feature::ToOpponentTableau]
            }
        }
        _ => 0,
    }
}

fn source_score(state: &GameState, mv: &Move, player: PlayerId, weights: &Weights) -> i32 {
    match mv.from {
        PileLocation::Reserve(owner) if owner == player => {
            let mut score = weights[Feature::FromReserve];
            if state.player(player).reserve().len() == 1 {
                score += weights[Feature::EmptiesReserve];
            }
            score
        }
        PileLocation::Drawn(_) => weights[Feature::FromWaste],
        PileLocation::Tableau(owner, index) => {
            let mut score = weights[Feature::FromTableau];
            let source = &state.player(owner).tableau()[index];
            if source.len() == 1 {
                score += singleton_source_score(state, mv, weights);
            } else if let Some(exposed) = source.under_top() {
                if !exposed_card_has_play(state, mv, exposed) {
                    score += weights[Feature::TableauMoveNoBenefit];
                }
            }
            score
        }
        _ => 0,
    }
}

fn singleton_source_score(state: &GameState, mv: &Move, weights: &Weights) -> i32 {
    match mv.to {
        PileLocation::Tableau(owner, index) => {
            if state.player(owner).tableau()[index].is_empty() {
                weights[Feature::PointlessTableauShuffle]
            } else {
                weights[Feature::CreatesUsefulEmpty]
            }
        }
        PileLocation::Foundation(_) => weights[Feature::CreatesEmptyTableau],
        _ if is_attack_destination(state, mv) => weights[Feature::CreatesEmptyTableau],
        _ => 0,
    }
}

/// Whether the card uncovered by a multi-card tableau move would itself
/// have a foundation or attack play, accounting for the top the candidate
/// move leaves behind on its destination.
fn exposed_card_has_play(state: &GameState, mv: &Move, exposed: Card) -> bool {
    for i in 0..state.foundations().len() {
        if exposed.suit() != foundation_suit(i) {
            continue;
        }
        let playable = match effective_top(state, PileLocation::Foundation(i), mv) {
            None => exposed.rank() == Rank::ACE,
            Some(top) => {
                top.suit() == exposed.suit() && Some(top.rank()) == exposed.rank().pred()
            }
        };
        if playable {
            return true;
        }
    }

    let opponent = state.current_turn().opponent();
    for location in [PileLocation::Waste(opponent), PileLocation::Reserve(opponent)] {
        if let Some(top) = effective_top(state, location, mv) {
            if top.suit() == exposed.suit() && top.rank().is_adjacent_to(exposed.rank()) {
                return true;
            }
        }
    }

    false
}

fn effective_top(state: &GameState, location: PileLocation, mv: &Move) -> Option<Card> {
    if mv.to == location {
        Some(mv.card)
    } else {
        state.top_card(location)
    }
}

/// Net change in the player's tallest tableau height and in the number of
/// occupied tableau piles, were `mv` applied.
fn tableau_shape_delta(state: &GameState, mv: &Move, player: PlayerId) -> (i32, i32) {
    let tableau = state.player(player).tableau();
    let before: Vec<i32> = tableau
        .iter()
        .map(|p| i32::try_from(p.len()).unwrap_or(i32::MAX))
        .collect();
    let mut after = before.clone();

    if let PileLocation::Tableau(owner, index) = mv.from {
        if owner == player {
            after[index] -= 1;
        }
    }
    if let PileLocation::Tableau(owner, index) = mv.to {
        if owner == player {
            after[index] += 1;
        }
    }

    let max_before = before.iter().copied().max().unwrap_or(0);
    let max_after = after.iter().copied().max().unwrap_or(0);
    let occupied_before = i32::try_from(before.iter().filter(|&&l| l > 0).count()).unwrap_or(0);
    let occupied_after = i32::try_from(after.iter().filter(|&&l| l > 0).count()).unwrap_or(0);

    (max_after - max_before, occupied_after - occupied_before)
}

/// An attack: the destination is the opponent's waste or reserve.
#[must_use]
pub fn is_attack_destination(state: &GameState, mv: &Move) -> bool {
    let opponent = state.current_turn().opponent();
    matches!(
        mv.to,
        PileLocation::Waste(owner) | PileLocation::Reserve(owner) if owner == opponent
    )
}

/// A lone tableau card headed for an empty tableau: legal, but pure noise.
#[must_use]
pub fn is_pointless_shuffle(state: &GameState, mv: &Move) -> bool {
    is_singleton_tableau_source(state, mv)
        && matches!(
            mv.to,
            PileLocation::Tableau(owner, index)
                if state.player(owner).tableau()[index].is_empty()
        )
}

/// A lone tableau card consolidating onto a non-empty tableau, freeing a
/// slot for later use.
#[must_use]
pub fn is_empty_creating_consolidation(state: &GameState, mv: &Move) -> bool {
    is_singleton_tableau_source(state, mv)
        && matches!(
            mv.to,
            PileLocation::Tableau(owner, index)
                if !state.player(owner).tableau()[index].is_empty()
        )
}

fn is_singleton_tableau_source(state: &GameState, mv: &Move) -> bool {
    matches!(
        mv.from,
        PileLocation::Tableau(owner, index)
            if state.player(owner).tableau()[index].len() == 1
    )
}

#[cfg(test)]
mod tests {
    use rusbank_engine::{Pile, PlayerState, Suit, TABLEAU_COUNT};

    use super::*;

    fn card(suit: Suit, rank: u8, origin: PlayerId) -> Card {
        Card::new(suit, Rank::new(rank).unwrap(), origin)
    }

    fn empty_tableau() -> [Pile; TABLEAU_COUNT] {
        std::array::from_fn(|_| Pile::new())
    }

    fn basic_player(origin: PlayerId) -> PlayerState {
        PlayerState::from_piles(
            Pile::from_cards(vec![card(Suit::Clubs, 9, origin)]),
            Pile::new(),
            empty_tableau(),
            Pile::from_cards(vec![card(Suit::Diamonds, 8, origin)]),
            None,
        )
    }

    fn state_with(p1: PlayerState, p2: PlayerState) -> GameState {
        let foundations = std::array::from_fn(|_| Pile::new());
        GameState::from_parts([p1, p2], foundations, PlayerId::One, 0)
    }

    #[test]
    fn test_foundation_play_outscores_tableau_play() {
        let ace = card(Suit::Hearts, 1, PlayerId::One);
        let weights = Weights::reference();
        let state = state_with(basic_player(PlayerId::One), basic_player(PlayerId::Two));

        let to_foundation = Move::new(
            PileLocation::Reserve(PlayerId::One),
            PileLocation::Foundation(0),
            ace,
        );
        let to_tableau = Move::new(
            PileLocation::Reserve(PlayerId::One),
            PileLocation::Tableau(PlayerId::One, 0),
            ace,
        );

        let foundation_score = score_move(&state, &to_foundation, &weights);
        let tableau_score = score_move(&state, &to_tableau, &weights);
        assert!(foundation_score > tableau_score);
        // Ace bonus stacks on top of the plain foundation weight; the
        // one-card reserve adds the emptying bonus on both moves.
        assert_eq!(
            foundation_score,
            weights[Feature::ToFoundation]
                + weights[Feature::PlaysAce]
                + weights[Feature::FromReserve]
                + weights[Feature::EmptiesReserve]
        );
    }

    #[test]
    fn test_emptying_reserve_adds_bonus() {
        let weights = Weights::reference();
        let state = state_with(basic_player(PlayerId::One), basic_player(PlayerId::Two));
        // basic_player holds exactly one reserve card
        let mv = Move::new(
            PileLocation::Reserve(PlayerId::One),
            PileLocation::Tableau(PlayerId::One, 0),
            card(Suit::Clubs, 9, PlayerId::One),
        );
        let score = score_move(&state, &mv, &weights);
        assert_eq!(
            score,
            weights[Feature::ToOwnTableau]
                + weights[Feature::FromReserve]
                + weights[Feature::EmptiesReserve]
                + weights[Feature::SpreadPenalty] // occupies a previously empty pile
                + weights[Feature::StackHeightBonus] // tallest pile grows 0 -> 1
        );
    }

    #[test]
    fn test_pointless_shuffle_scores_negative_weight() {
        let weights = Weights::reference();
        let lone = card(Suit::Spades, 6, PlayerId::One);
        let mut tableau = empty_tableau();
        tableau[0].push(lone);
        let p1 = PlayerState::from_piles(
            Pile::from_cards(vec![card(Suit::Clubs, 9, PlayerId::One)]),
            Pile::new(),
            tableau,
            Pile::from_cards(vec![card(Suit::Diamonds, 8, PlayerId::One)]),
            None,
        );
        let state = state_with(p1, basic_player(PlayerId::Two));

        let mv = Move::new(
            PileLocation::Tableau(PlayerId::One, 0),
            PileLocation::Tableau(PlayerId::One, 1),
            lone,
        );
        assert!(is_pointless_shuffle(&state, &mv));
        assert!(!is_empty_creating_consolidation(&state, &mv));
        let score = score_move(&state, &mv, &weights);
        // Shape terms cancel: max height and occupied count are unchanged.
        assert_eq!(
            score,
            weights[Feature::ToOwnTableau]
                + weights[Feature::FromTableau]
                + weights[Feature::PointlessTableauShuffle]
        );
    }

    #[test]
    fn test_consolidation_scores_useful_empty_and_spread_bonus() {
        let weights = Weights::reference();
        let lone = card(Suit::Spades, 6, PlayerId::One);
        let seven = card(Suit::Hearts, 7, PlayerId::One);
        let mut tableau = empty_tableau();
        tableau[0].push(lone);
        tableau[1].push(seven);
        let p1 = PlayerState::from_piles(
            Pile::from_cards(vec![card(Suit::Clubs, 9, PlayerId::One)]),
            Pile::new(),
            tableau,
            Pile::from_cards(vec![card(Suit::Diamonds, 8, PlayerId::One)]),
            None,
        );
        let state = state_with(p1, basic_player(PlayerId::Two));

        let mv = Move::new(
            PileLocation::Tableau(PlayerId::One, 0),
            PileLocation::Tableau(PlayerId::One, 1),
            lone,
        );
        assert!(is_empty_creating_consolidation(&state, &mv));
        let score = score_move(&state, &mv, &weights);
        // Occupied piles drop from two to one, so the spread weight flips
        // into a consolidation bonus; the tallest pile grows one step.
        assert_eq!(
            score,
            weights[Feature::ToOwnTableau]
                + weights[Feature::FromTableau]
                + weights[Feature::CreatesUsefulEmpty]
                + weights[Feature::StackHeightBonus]
                - weights[Feature::SpreadPenalty]
        );
    }

    #[test]
    fn test_attack_features() {
        let weights = Weights::reference();
        let six = card(Suit::Diamonds, 6, PlayerId::One);
        let p1 = PlayerState::from_piles(
            Pile::from_cards(vec![six]),
            Pile::new(),
            empty_tableau(),
            Pile::from_cards(vec![card(Suit::Clubs, 2, PlayerId::One)]),
            None,
        );
        let p2 = PlayerState::from_piles(
            Pile::from_cards(vec![card(Suit::Diamonds, 5, PlayerId::Two)]),
            Pile::from_cards(vec![card(Suit::Diamonds, 7, PlayerId::Two)]),
            empty_tableau(),
            Pile::from_cards(vec![card(Suit::Clubs, 3, PlayerId::Two)]),
            None,
        );
        let state = state_with(p1, p2);

        let waste_attack = Move::new(
            PileLocation::Reserve(PlayerId::One),
            PileLocation::Waste(PlayerId::Two),
            six,
        );
        let reserve_attack = Move::new(
            PileLocation::Reserve(PlayerId::One),
            PileLocation::Reserve(PlayerId::Two),
            six,
        );
        assert!(is_attack_destination(&state, &waste_attack));
        assert_eq!(
            score_move(&state, &waste_attack, &weights),
            weights[Feature::AttackWaste]
                + weights[Feature::FromReserve]
                + weights[Feature::EmptiesReserve]
        );
        assert_eq!(
            score_move(&state, &reserve_attack, &weights),
            weights[Feature::AttackReserve]
                + weights[Feature::FromReserve]
                + weights[Feature::EmptiesReserve]
        );
    }

    #[test]
    fn test_no_benefit_penalty_on_buried_exposure() {
        let weights = Weights::reference();
        // Tableau pile 0 holds 9C under 8H; moving the 8H exposes the 9C,
        // which has no foundation or attack play anywhere.
        let nine = card(Suit::Clubs, 9, PlayerId::One);
        let eight = card(Suit::Hearts, 8, PlayerId::One);
        let mut tableau = empty_tableau();
        tableau[0].push(nine);
        tableau[0].push(eight);
        tableau[1].push(card(Suit::Spades, 9, PlayerId::One));
        let p1 = PlayerState::from_piles(
            Pile::from_cards(vec![card(Suit::Clubs, 4, PlayerId::One)]),
            Pile::new(),
            tableau,
            Pile::from_cards(vec![card(Suit::Diamonds, 2, PlayerId::One)]),
            None,
        );
        let state = state_with(p1, basic_player(PlayerId::Two));

        let mv = Move::new(
            PileLocation::Tableau(PlayerId::One, 0),
            PileLocation::Tableau(PlayerId::One, 1),
            eight,
        );
        let score = score_move(&state, &mv, &weights);
        // Max height and occupied-pile count are unchanged, so no shape
        // terms fire.
        assert_eq!(
            score,
            weights[Feature::ToOwnTableau]
                + weights[Feature::FromTableau]
                + weights[Feature::TableauMoveNoBenefit]
        );
    }

    #[test]
    fn test_exposed_card_with_foundation_play_avoids_penalty() {
        let weights = Weights::reference();
        // Tableau pile 0 holds AD under 2S; moving the 2S exposes the ace,
        // which always has a foundation play.
        let ace = card(Suit::Diamonds, 1, PlayerId::One);
        let two = card(Suit::Spades, 2, PlayerId::One);
        let mut tableau = empty_tableau();
        tableau[0].push(ace);
        tableau[0].push(two);
        tableau[1].push(card(Suit::Hearts, 3, PlayerId::One));
        let p1 = PlayerState::from_piles(
            Pile::from_cards(vec![card(Suit::Clubs, 4, PlayerId::One)]),
            Pile::new(),
            tableau,
            Pile::from_cards(vec![card(Suit::Diamonds, 9, PlayerId::One)]),
            None,
        );
        let state = state_with(p1, basic_player(PlayerId::Two));

        let mv = Move::new(
            PileLocation::Tableau(PlayerId::One, 0),
            PileLocation::Tableau(PlayerId::One, 1),
            two,
        );
        let score = score_move(&state, &mv, &weights);
        assert_eq!(
            score,
            weights[Feature::ToOwnTableau] + weights[Feature::FromTableau]
        );
    }
}

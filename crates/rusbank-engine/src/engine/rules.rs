use arrayvec::ArrayVec;

use crate::core::{Card, Move, Pile, PileLocation, Rank, foundation_suit};

use super::state::GameState;

/// Upper bound on destinations for one card: two same-suit foundation
/// slots, eight tableau piles, two attack targets.
const MAX_DESTINATIONS: usize = 12;

/// Whether `card` may be placed on foundation pile `index`.
///
/// Foundations build up by suit from Ace to King. Either of a suit's two
/// foundation slots accepts that suit's Aces; the engine does not track
/// which deck started which slot.
#[must_use]
pub fn can_play_on_foundation(card: Card, index: usize, pile: &Pile) -> bool {
    if card.suit() != foundation_suit(index) {
        return false;
    }
    match pile.top() {
        None => card.rank() == Rank::ACE,
        Some(top) => top.suit() == card.suit() && Some(top.rank()) == card.rank().pred(),
    }
}

/// Whether `card` may be placed on a tableau pile. Empty piles accept any
/// card; otherwise the top must be the opposite color and one rank higher.
#[must_use]
pub fn can_play_on_tableau(card: Card, pile: &Pile) -> bool {
    match pile.top() {
        None => true,
        Some(top) => top.color() != card.color() && Some(top.rank()) == card.rank().succ(),
    }
}

/// Whether `card` may attack an opponent's waste or reserve: the pile must
/// be non-empty with a same-suit top whose rank differs by exactly one.
#[must_use]
pub fn can_play_on_opponent_pile(card: Card, pile: &Pile) -> bool {
    match pile.top() {
        None => false,
        Some(top) => top.suit() == card.suit() && top.rank().is_adjacent_to(card.rank()),
    }
}

/// All moves the current player may make.
///
/// While a drawn card is pending it is the only legal source (the
/// immediate-play rule). Otherwise sources are the top of the player's own
/// reserve and the top of every tableau pile on the board. Singleton
/// tableau piles may legally move onto empty tableaus; suppressing those
/// shuffles is a decision-maker concern, not an engine one.
#[must_use]
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    if state.phase().is_ended() {
        return Vec::new();
    }

    let player = state.current_turn();
    if let Some(card) = state.player(player).drawn_card() {
        return destinations_for(state, card, PileLocation::Drawn(player))
            .into_iter()
            .collect();
    }

    let mut moves = Vec::new();
    if let Some(card) = state.player(player).reserve().top() {
        moves.extend(destinations_for(state, card, PileLocation::Reserve(player)));
    }
    for owner in [player, player.opponent()] {
        for (i, pile) in state.player(owner).tableau().iter().enumerate() {
            if let Some(card) = pile.top() {
                moves.extend(destinations_for(
                    state,
                    card,
                    PileLocation::Tableau(owner, i),
                ));
            }
        }
    }
    moves
}

/// Every legal destination for `card` taken from `from`, in a fixed
/// enumeration order: foundations, own tableaus, opponent tableaus,
/// attacks on the opponent's waste then reserve.
pub(super) fn destinations_for(
    state: &GameState,
    card: Card,
    from: PileLocation,
) -> ArrayVec<Move, MAX_DESTINATIONS> {
    let player = state.current_turn();
    let opponent = player.opponent();
    let mut moves = ArrayVec::new();

    for (i, pile) in state.foundations().iter().enumerate() {
        if can_play_on_foundation(card, i, pile) {
            moves.push(Move::new(from, PileLocation::Foundation(i), card));
        }
    }

    for owner in [player, opponent] {
        for (i, pile) in state.player(owner).tableau().iter().enumerate() {
            let to = PileLocation::Tableau(owner, i);
            if to != from && can_play_on_tableau(card, pile) {
                moves.push(Move::new(from, to, card));
            }
        }
    }

    if can_play_on_opponent_pile(card, state.player(opponent).waste()) {
        moves.push(Move::new(from, PileLocation::Waste(opponent), card));
    }
    if can_play_on_opponent_pile(card, state.player(opponent).reserve()) {
        moves.push(Move::new(from, PileLocation::Reserve(opponent), card));
    }

    moves
}

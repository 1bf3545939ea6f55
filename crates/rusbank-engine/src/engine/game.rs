use rand::Rng as _;

use crate::{
    DrawError, InvalidMoveError, NoCardsToDrawError,
    core::{Card, Move, Pile, PileLocation, PlayerId, TABLEAU_COUNT},
};

use super::{
    rng::Lcg,
    rules::{self, legal_moves},
    state::{GameState, PlayerState},
};

/// Cards dealt to each player's reserve at the start of the game.
pub const RESERVE_SIZE: usize = 12;
/// Cards dealt face down to each player's hand (52 minus reserve and the
/// four tableau starters).
pub const HAND_SIZE: usize = 52 - RESERVE_SIZE - TABLEAU_COUNT;

/// Result of a successful [`GameState::draw_from_hand`] call.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    /// The snapshot after the draw.
    pub state: GameState,
    /// The card that was drawn (now on the waste).
    pub card: Card,
    /// True when the drawn card had no legal destination and play passed
    /// to the opponent (or the game ended).
    pub turn_ended: bool,
}

impl GameState {
    /// Deals a fresh game.
    ///
    /// Both 52-card decks are shuffled with the seeded generator, then each
    /// player receives 12 reserve cards, four one-card tableau piles, and
    /// 36 hand cards. One further generator draw picks the starting player.
    /// When `seed` is `None` a system random seed is drawn and recorded so
    /// the game stays reproducible.
    #[must_use]
    pub fn new(seed: Option<u32>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Lcg::new(seed);

        let players = [
            deal_player(PlayerId::One, &mut rng),
            deal_player(PlayerId::Two, &mut rng),
        ];
        let current_turn = if rng.next_f32() < 0.5 {
            PlayerId::One
        } else {
            PlayerId::Two
        };

        let foundations = std::array::from_fn(|_| Pile::new());
        GameState::from_parts(players, foundations, current_turn, seed)
    }

    /// Applies `mv`, returning the successor snapshot.
    ///
    /// The move is validated against [`legal_moves`]; anything else fails
    /// with [`InvalidMoveError`] and leaves no observable change. Applying
    /// a move never ends the turn: the same player keeps moving until a
    /// draw resolves unplayable.
    pub fn apply_move(&self, mv: &Move) -> Result<GameState, InvalidMoveError> {
        if !legal_moves(self).contains(mv) {
            return Err(InvalidMoveError);
        }

        let mut next = self.clone();
        let card = next.pop_source(mv.from);
        debug_assert_eq!(card, Some(mv.card));
        let Some(card) = card else {
            return Err(InvalidMoveError);
        };
        next.push_destination(mv.to, card);
        next.increment_move_count();
        next.log_move(mv);
        next.check_termination();
        Ok(next)
    }

    /// Draws the top card of the hand onto the waste.
    ///
    /// An exhausted hand first recycles: the waste is reversed back into
    /// the hand (waste bottom becomes hand bottom) and emptied. If both are
    /// empty the draw fails with [`NoCardsToDrawError`]. The drawn card
    /// becomes the pending `drawn_card`; if it has no legal destination it
    /// stays on the waste, the pending slot clears, and the turn passes.
    pub fn draw_from_hand(&self) -> Result<DrawOutcome, DrawError> {
        if self.phase().is_ended() || self.current_player().drawn_card().is_some() {
            return Err(DrawError::InvalidDraw(InvalidMoveError));
        }

        let mut next = self.clone();
        let player = next.current_turn();

        if next.player(player).hand().is_empty() {
            let mut cards = next.player_mut(player).waste_mut().take_all();
            cards.reverse();
            *next.player_mut(player).hand_mut() = Pile::from_cards(cards);
        }

        let Some(card) = next.player_mut(player).hand_mut().pop() else {
            return Err(DrawError::NoCardsToDraw(NoCardsToDrawError));
        };
        next.player_mut(player).waste_mut().push(card);
        next.player_mut(player).set_drawn_card(Some(card));
        next.increment_move_count();
        next.log_draw(player);
        next.check_termination();

        let playable = !next.phase().is_ended()
            && !rules::destinations_for(&next, card, PileLocation::Drawn(player)).is_empty();
        let mut turn_ended = next.phase().is_ended();
        if !playable {
            next.player_mut(player).set_drawn_card(None);
            if !next.phase().is_ended() {
                next.set_current_turn(player.opponent());
            }
            turn_ended = true;
        }

        Ok(DrawOutcome {
            state: next,
            card,
            turn_ended,
        })
    }

    fn pop_source(&mut self, from: PileLocation) -> Option<Card> {
        match from {
            PileLocation::Reserve(owner) => self.player_mut(owner).reserve_mut().pop(),
            PileLocation::Tableau(owner, i) => self.player_mut(owner).tableau_mut(i).pop(),
            PileLocation::Drawn(owner) => {
                self.player_mut(owner).set_drawn_card(None);
                self.player_mut(owner).waste_mut().pop()
            }
            PileLocation::Foundation(_) | PileLocation::Waste(_) => None,
        }
    }

    fn push_destination(&mut self, to: PileLocation, card: Card) {
        match to {
            PileLocation::Foundation(i) => self.foundation_mut(i).push(card),
            PileLocation::Tableau(owner, i) => self.player_mut(owner).tableau_mut(i).push(card),
            PileLocation::Reserve(owner) => self.player_mut(owner).reserve_mut().push(card),
            PileLocation::Waste(owner) => self.player_mut(owner).waste_mut().push(card),
            PileLocation::Drawn(_) => {
                debug_assert!(false, "not a legal destination");
            }
        }
    }
}

fn deal_player(owner: PlayerId, rng: &mut Lcg) -> PlayerState {
    let mut deck: Vec<Card> = Card::deck(owner).collect();
    rng.shuffle(&mut deck);

    let mut cards = deck.into_iter();
    let reserve: Pile = cards.by_ref().take(RESERVE_SIZE).collect();
    let tableau: [Pile; TABLEAU_COUNT] =
        std::array::from_fn(|_| cards.by_ref().take(1).collect());
    let hand: Pile = cards.collect();

    PlayerState::from_piles(reserve, Pile::new(), tableau, hand, None)
}

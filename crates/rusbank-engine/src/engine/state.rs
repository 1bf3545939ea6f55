use crate::core::{
    Card, FOUNDATION_COUNT, Move, Pile, PileLocation, PlayerId, TABLEAU_COUNT,
};

/// A game ends in a draw once this many operations have been applied.
pub const MOVE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Phase {
    Playing,
    Ended,
}

/// One player's side of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    reserve: Pile,
    waste: Pile,
    tableau: [Pile; TABLEAU_COUNT],
    hand: Pile,
    drawn_card: Option<Card>,
}

impl PlayerState {
    /// Assembles a player state from explicit piles, for fixtures and
    /// replays. A drawn card, when present, must sit on top of the waste.
    #[must_use]
    pub fn from_piles(
        reserve: Pile,
        waste: Pile,
        tableau: [Pile; TABLEAU_COUNT],
        hand: Pile,
        drawn_card: Option<Card>,
    ) -> Self {
        if let Some(card) = drawn_card {
            debug_assert_eq!(waste.top(), Some(card), "drawn card must top the waste");
        }
        Self {
            reserve,
            waste,
            tableau,
            hand,
            drawn_card,
        }
    }

    #[must_use]
    pub fn reserve(&self) -> &Pile {
        &self.reserve
    }

    #[must_use]
    pub fn waste(&self) -> &Pile {
        &self.waste
    }

    #[must_use]
    pub fn tableau(&self) -> &[Pile; TABLEAU_COUNT] {
        &self.tableau
    }

    #[must_use]
    pub fn hand(&self) -> &Pile {
        &self.hand
    }

    #[must_use]
    pub fn drawn_card(&self) -> Option<Card> {
        self.drawn_card
    }

    /// Number of cards the player still has to get rid of. Reaching zero
    /// wins the game.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.reserve.len() + self.waste.len() + self.hand.len()
    }

    #[must_use]
    pub fn has_won(&self) -> bool {
        self.cards_remaining() == 0
    }

    pub(super) fn reserve_mut(&mut self) -> &mut Pile {
        &mut self.reserve
    }

    pub(super) fn waste_mut(&mut self) -> &mut Pile {
        &mut self.waste
    }

    pub(super) fn tableau_mut(&mut self, index: usize) -> &mut Pile {
        &mut self.tableau[index]
    }

    pub(super) fn hand_mut(&mut self) -> &mut Pile {
        &mut self.hand
    }

    pub(super) fn set_drawn_card(&mut self, card: Option<Card>) {
        self.drawn_card = card;
    }
}

/// A full board snapshot. Mutating operations (`apply_move`,
/// `draw_from_hand`) clone the snapshot and return a new one; old snapshots
/// stay valid for undo and cycle detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    players: [PlayerState; 2],
    foundations: [Pile; FOUNDATION_COUNT],
    current_turn: PlayerId,
    phase: Phase,
    move_count: u32,
    winner: Option<PlayerId>,
    seed: u32,
    notation_log: Vec<String>,
}

impl GameState {
    /// Assembles a state from explicit parts, for fixtures and tests.
    /// Regular games start from [`GameState::new`](Self::new).
    #[must_use]
    pub fn from_parts(
        players: [PlayerState; 2],
        foundations: [Pile; FOUNDATION_COUNT],
        current_turn: PlayerId,
        seed: u32,
    ) -> Self {
        Self {
            players,
            foundations,
            current_turn,
            phase: Phase::Playing,
            move_count: 0,
            winner: None,
            seed,
            notation_log: Vec::new(),
        }
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    #[must_use]
    pub fn current_player(&self) -> &PlayerState {
        self.player(self.current_turn)
    }

    #[must_use]
    pub fn foundations(&self) -> &[Pile; FOUNDATION_COUNT] {
        &self.foundations
    }

    #[must_use]
    pub fn foundation(&self, index: usize) -> &Pile {
        &self.foundations[index]
    }

    #[must_use]
    pub fn current_turn(&self) -> PlayerId {
        self.current_turn
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[must_use]
    pub fn notation_log(&self) -> &[String] {
        &self.notation_log
    }

    /// Total number of cards placed on foundations, a monotone measure of
    /// game progress.
    #[must_use]
    pub fn foundation_progress(&self) -> usize {
        self.foundations.iter().map(Pile::len).sum()
    }

    /// The card on top of the referenced pile. For the drawn slot this is
    /// the drawn card itself.
    #[must_use]
    pub fn top_card(&self, location: PileLocation) -> Option<Card> {
        match location {
            PileLocation::Foundation(i) => self.foundations[i].top(),
            PileLocation::Tableau(owner, i) => self.player(owner).tableau[i].top(),
            PileLocation::Reserve(owner) => self.player(owner).reserve.top(),
            PileLocation::Waste(owner) => self.player(owner).waste.top(),
            PileLocation::Drawn(owner) => self.player(owner).drawn_card,
        }
    }

    /// Total card population across every pile. Conserved at 104 by every
    /// legal operation.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        let player_cards: usize = self
            .players
            .iter()
            .map(|p| p.cards_remaining() + p.tableau.iter().map(Pile::len).sum::<usize>())
            .sum();
        player_cards + self.foundation_progress()
    }

    /// All cards on the board in a fixed traversal order.
    pub fn all_cards(&self) -> impl Iterator<Item = Card> + '_ {
        let player_cards = self.players.iter().flat_map(|p| {
            p.reserve
                .iter()
                .chain(p.waste.iter())
                .chain(p.tableau.iter().flat_map(Pile::iter))
                .chain(p.hand.iter())
        });
        player_cards
            .chain(self.foundations.iter().flat_map(Pile::iter))
            .copied()
    }

    pub(super) fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id.index()]
    }

    pub(super) fn foundation_mut(&mut self, index: usize) -> &mut Pile {
        &mut self.foundations[index]
    }

    pub(super) fn set_current_turn(&mut self, player: PlayerId) {
        self.current_turn = player;
    }

    pub(super) fn increment_move_count(&mut self) {
        self.move_count += 1;
    }

    pub(super) fn log_move(&mut self, mv: &Move) {
        self.notation_log.push(mv.notation());
    }

    pub(super) fn log_draw(&mut self, player: PlayerId) {
        self.notation_log.push(format!("D{}", player.digit()));
    }

    /// Win and move-limit checks, run after every mutation. A win takes
    /// precedence over the move limit.
    pub(super) fn check_termination(&mut self) {
        for id in PlayerId::BOTH {
            if self.player(id).has_won() {
                self.winner = Some(id);
                self.phase = Phase::Ended;
                return;
            }
        }
        if self.move_count >= MOVE_LIMIT {
            self.phase = Phase::Ended;
        }
    }
}

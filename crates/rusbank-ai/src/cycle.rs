//! Anti-cycling machinery.
//!
//! Two complementary filters keep a turn from looping: a set of
//! `(card, location)` pairs that have already been seen on top of a pile
//! this turn, and a set of canonical board hashes of every position
//! visited this turn. Both reset after a successful draw, since drawing
//! makes genuine progress.
//!
//! The shuffle penalty uses a third structure, a bounded sliding window of
//! recent move patterns (source and destination piles, card identity
//! excluded) that survives across turns.

use std::collections::{HashSet, VecDeque};
use std::hash::{DefaultHasher, Hash, Hasher};

use rusbank_engine::{Card, GameState, Move, PileLocation, PlayerId};

/// Tops already observed this turn, keyed by `(card, location)`.
#[derive(Debug, Clone, Default)]
pub struct PositionSet {
    seen: HashSet<(Card, PileLocation)>,
}

impl PositionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the top of every accessible pile in `state`.
    pub fn record_state(&mut self, state: &GameState) {
        for location in accessible_locations() {
            if let Some(card) = state.top_card(location) {
                self.seen.insert((card, location));
            }
        }
    }

    /// Whether applying `mv` would recreate an already-seen top.
    #[must_use]
    pub fn contains_destination(&self, mv: &Move) -> bool {
        self.seen.contains(&(mv.card, mv.to))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

fn accessible_locations() -> impl Iterator<Item = PileLocation> {
    let per_player = PlayerId::BOTH.into_iter().flat_map(|owner| {
        [
            PileLocation::Reserve(owner),
            PileLocation::Waste(owner),
            PileLocation::Drawn(owner),
        ]
        .into_iter()
        .chain((0..rusbank_engine::TABLEAU_COUNT).map(move |i| PileLocation::Tableau(owner, i)))
    });
    per_player.chain((0..rusbank_engine::FOUNDATION_COUNT).map(PileLocation::Foundation))
}

/// Canonical hash of a board position.
///
/// Enumerates each player's reserve, waste, tableau piles, and drawn card,
/// then the foundations, in a fixed order. The observable contract is
/// equality of hashes, not their numeric value.
#[must_use]
pub fn canonical_hash(state: &GameState) -> u64 {
    let mut hasher = DefaultHasher::new();
    for id in PlayerId::BOTH {
        let player = state.player(id);
        hash_pile(&mut hasher, player.reserve().cards());
        hash_pile(&mut hasher, player.waste().cards());
        for pile in player.tableau() {
            hash_pile(&mut hasher, pile.cards());
        }
        player.drawn_card().hash(&mut hasher);
    }
    for pile in state.foundations() {
        hash_pile(&mut hasher, pile.cards());
    }
    hasher.finish()
}

fn hash_pile(hasher: &mut DefaultHasher, cards: &[Card]) {
    // length prefix keeps adjacent piles from blending together
    cards.len().hash(hasher);
    cards.hash(hasher);
}

/// Canonical hashes of the positions visited this turn.
#[derive(Debug, Clone, Default)]
pub struct StateSet {
    seen: HashSet<u64>,
}

impl StateSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, hash: u64) {
        self.seen.insert(hash);
    }

    #[must_use]
    pub fn contains(&self, hash: u64) -> bool {
        self.seen.contains(&hash)
    }
}

/// A move shape: which pile fed which pile, ignoring the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovePattern {
    pub from: PileLocation,
    pub to: PileLocation,
}

impl MovePattern {
    #[must_use]
    pub fn of(mv: &Move) -> Self {
        Self {
            from: mv.from,
            to: mv.to,
        }
    }
}

/// Bounded sliding window of recent move patterns. The oldest entry falls
/// out when the window is full.
#[derive(Debug, Clone)]
pub struct PatternWindow {
    capacity: usize,
    buf: VecDeque<MovePattern>,
}

impl PatternWindow {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buf: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, pattern: MovePattern) {
        if self.capacity == 0 {
            return;
        }
        if self.buf.len() >= self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(pattern);
    }

    /// How many entries in the window equal `pattern`.
    #[must_use]
    pub fn count_matches(&self, pattern: &MovePattern) -> usize {
        self.buf.iter().filter(|p| *p == pattern).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusbank_engine::{Rank, Suit, legal_moves};

    use super::*;

    fn pattern(from: PileLocation, to: PileLocation) -> MovePattern {
        MovePattern { from, to }
    }

    #[test]
    fn test_pattern_window_bounds_and_counts() {
        let mut window = PatternWindow::new(3);
        let a = pattern(
            PileLocation::Tableau(PlayerId::One, 0),
            PileLocation::Tableau(PlayerId::One, 1),
        );
        let b = pattern(
            PileLocation::Tableau(PlayerId::One, 1),
            PileLocation::Tableau(PlayerId::One, 0),
        );

        window.push(a);
        window.push(b);
        window.push(a);
        assert_eq!(window.count_matches(&a), 2);
        assert_eq!(window.count_matches(&b), 1);

        // Fourth push evicts the oldest entry (an `a`).
        window.push(b);
        assert_eq!(window.len(), 3);
        assert_eq!(window.count_matches(&a), 1);
        assert_eq!(window.count_matches(&b), 2);
    }

    #[test]
    fn test_pattern_window_zero_capacity() {
        let mut window = PatternWindow::new(0);
        window.push(pattern(
            PileLocation::Reserve(PlayerId::One),
            PileLocation::Foundation(0),
        ));
        assert!(window.is_empty());
    }

    #[test]
    fn test_pattern_ignores_card_identity() {
        let from = PileLocation::Tableau(PlayerId::One, 2);
        let to = PileLocation::Tableau(PlayerId::Two, 1);
        let a = Move::new(
            from,
            to,
            Card::new(Suit::Hearts, Rank::ACE, PlayerId::One),
        );
        let b = Move::new(from, to, Card::new(Suit::Spades, Rank::KING, PlayerId::Two));
        assert_eq!(MovePattern::of(&a), MovePattern::of(&b));
    }

    #[test]
    fn test_canonical_hash_stable_and_discriminating() {
        let a = GameState::new(Some(5));
        let b = GameState::new(Some(5));
        assert_eq!(canonical_hash(&a), canonical_hash(&b));

        if let Some(mv) = legal_moves(&a).first() {
            let next = a.apply_move(mv).unwrap();
            assert_ne!(canonical_hash(&next), canonical_hash(&a));
        }
    }

    #[test]
    fn test_position_set_flags_seen_destination() {
        let state = GameState::new(Some(11));
        let mut set = PositionSet::new();
        set.record_state(&state);
        assert!(!set.is_empty());

        // Moving any tableau top back onto its current spot would recreate
        // a seen pair; fabricate such a move directly.
        let location = PileLocation::Tableau(PlayerId::One, 0);
        let card = state.top_card(location).unwrap();
        let mv = Move::new(PileLocation::Reserve(PlayerId::One), location, card);
        assert!(set.contains_destination(&mv));

        // A pair never observed passes the filter.
        let unseen = Move::new(
            PileLocation::Reserve(PlayerId::One),
            PileLocation::Tableau(PlayerId::Two, 0),
            card,
        );
        assert!(!set.contains_destination(&unseen));
    }
}

use std::fmt;

use super::card::{Card, PlayerId, Suit};

/// Number of tableau piles per player.
pub const TABLEAU_COUNT: usize = 4;
/// Number of shared foundation piles.
pub const FOUNDATION_COUNT: usize = 8;

/// Suit required by foundation pile `index`. Indices 0..4 and 4..8 are
/// paired by suit.
#[must_use]
pub fn foundation_suit(index: usize) -> Suit {
    Suit::ALL[index % Suit::ALL.len()]
}

/// A reference to one pile (or the drawn slot) a move can touch.
///
/// Hands have no location: they release cards only through the draw
/// operation, never as a move source or destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PileLocation {
    Foundation(usize),
    Tableau(PlayerId, usize),
    Reserve(PlayerId),
    Waste(PlayerId),
    /// The ephemeral slot holding a just-drawn card. The card physically
    /// sits on top of the owner's waste.
    Drawn(PlayerId),
}

impl PileLocation {
    #[must_use]
    pub fn owner(self) -> Option<PlayerId> {
        match self {
            PileLocation::Foundation(_) => None,
            PileLocation::Tableau(owner, _)
            | PileLocation::Reserve(owner)
            | PileLocation::Waste(owner)
            | PileLocation::Drawn(owner) => Some(owner),
        }
    }

    #[must_use]
    pub fn is_tableau(self) -> bool {
        matches!(self, PileLocation::Tableau(..))
    }

    #[must_use]
    pub fn is_foundation(self) -> bool {
        matches!(self, PileLocation::Foundation(_))
    }

    /// Compact notation: `R1`, `W2`, `T1c`, `G2`, `F5`.
    #[must_use]
    pub fn notation(self) -> String {
        match self {
            PileLocation::Foundation(i) => format!("F{}", i + 1),
            PileLocation::Tableau(owner, i) => {
                let slot = char::from(b'a' + u8::try_from(i).unwrap_or(0));
                format!("T{}{slot}", owner.digit())
            }
            PileLocation::Reserve(owner) => format!("R{}", owner.digit()),
            PileLocation::Waste(owner) => format!("W{}", owner.digit()),
            PileLocation::Drawn(owner) => format!("G{}", owner.digit()),
        }
    }

    #[must_use]
    pub fn from_notation(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let kind = chars.next()?;
        match kind {
            'F' => {
                let rest: String = chars.collect();
                let index: usize = rest.parse().ok()?;
                (1..=FOUNDATION_COUNT)
                    .contains(&index)
                    .then(|| PileLocation::Foundation(index - 1))
            }
            'T' => {
                let owner = PlayerId::from_digit(chars.next()?)?;
                let slot = chars.next()?;
                chars.next().is_none().then_some(())?;
                let index = (slot as usize).checked_sub('a' as usize)?;
                (index < TABLEAU_COUNT).then(|| PileLocation::Tableau(owner, index))
            }
            'R' | 'W' | 'G' => {
                let owner = PlayerId::from_digit(chars.next()?)?;
                chars.next().is_none().then_some(())?;
                Some(match kind {
                    'R' => PileLocation::Reserve(owner),
                    'W' => PileLocation::Waste(owner),
                    _ => PileLocation::Drawn(owner),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for PileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

/// A single card movement. `card` is redundant with the source top but kept
/// for logging and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: PileLocation,
    pub to: PileLocation,
    pub card: Card,
}

impl Move {
    #[must_use]
    pub fn new(from: PileLocation, to: PileLocation, card: Card) -> Self {
        Self { from, to, card }
    }

    /// Log notation: `<card>:<from>-<to>`, e.g. `AH1:R1-F1`.
    #[must_use]
    pub fn notation(&self) -> String {
        format!("{}:{}-{}", self.card.notation(), self.from, self.to)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Rank;

    #[test]
    fn test_foundation_suit_pairing() {
        assert_eq!(foundation_suit(0), Suit::Hearts);
        assert_eq!(foundation_suit(1), Suit::Diamonds);
        assert_eq!(foundation_suit(2), Suit::Clubs);
        assert_eq!(foundation_suit(3), Suit::Spades);
        for i in 0..4 {
            assert_eq!(foundation_suit(i), foundation_suit(i + 4));
        }
    }

    #[test]
    fn test_location_notation_roundtrip() {
        let locations = [
            PileLocation::Foundation(0),
            PileLocation::Foundation(7),
            PileLocation::Tableau(PlayerId::One, 0),
            PileLocation::Tableau(PlayerId::Two, 3),
            PileLocation::Reserve(PlayerId::One),
            PileLocation::Waste(PlayerId::Two),
            PileLocation::Drawn(PlayerId::Two),
        ];
        for loc in locations {
            assert_eq!(PileLocation::from_notation(&loc.notation()), Some(loc));
        }
    }

    #[test]
    fn test_location_notation_examples() {
        assert_eq!(PileLocation::Foundation(4).notation(), "F5");
        assert_eq!(PileLocation::Tableau(PlayerId::One, 2).notation(), "T1c");
        assert_eq!(PileLocation::Drawn(PlayerId::Two).notation(), "G2");
    }

    #[test]
    fn test_location_notation_rejects_garbage() {
        // H1 is not a location: hands never appear in move notation.
        for s in ["", "X1", "H1", "T1e", "T3a", "F0", "F9", "R3", "R1x"] {
            assert_eq!(PileLocation::from_notation(s), None, "{s}");
        }
    }

    #[test]
    fn test_move_notation() {
        let mv = Move::new(
            PileLocation::Reserve(PlayerId::One),
            PileLocation::Foundation(0),
            Card::new(Suit::Hearts, Rank::ACE, PlayerId::One),
        );
        assert_eq!(mv.notation(), "AH1:R1-F1");
    }
}

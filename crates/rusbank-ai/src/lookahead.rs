//! Shallow look-ahead bonus.
//!
//! Foundation plays need no encouragement, so the bonus only applies to
//! other candidates: the candidate is simulated, the follow-up moves it
//! unlocks are counted by kind, and the counts are weighted. Deeper levels
//! follow a few priority-ordered branches and contribute at half value per
//! level. The simulation works on private clones; nothing the caller can
//! see changes.

use rusbank_engine::{GameState, Move, legal_moves};

use crate::{
    config::DecisionConfig,
    score::{is_attack_destination, is_empty_creating_consolidation},
};

/// Look-ahead contribution for a candidate move, zero when disabled or
/// when the candidate already plays to a foundation.
#[must_use]
pub fn look_ahead_bonus(state: &GameState, mv: &Move, config: &DecisionConfig) -> f32 {
    if config.look_ahead_depth == 0 || mv.to.is_foundation() {
        return 0.0;
    }
    let Ok(next) = state.apply_move(mv) else {
        return 0.0;
    };
    bonus_from(&next, config, config.look_ahead_depth)
}

fn bonus_from(state: &GameState, config: &DecisionConfig, depth: u32) -> f32 {
    let moves = legal_moves(state);

    let mut foundation_plays = 0;
    let mut empty_creating = 0;
    let mut attacks = 0;
    for mv in &moves {
        if mv.to.is_foundation() {
            foundation_plays += 1;
        } else if is_attack_destination(state, mv) {
            attacks += 1;
        } else if is_empty_creating_consolidation(state, mv) {
            empty_creating += 1;
        }
    }

    #[expect(clippy::cast_precision_loss)]
    let mut bonus = (foundation_plays * config.look_ahead_foundation_bonus
        + empty_creating * config.look_ahead_empty_bonus
        + attacks * config.look_ahead_attack_bonus) as f32;

    if depth > 1 {
        for mv in prioritized(state, moves)
            .into_iter()
            .take(config.look_ahead_branch_factor)
        {
            if let Ok(next) = state.apply_move(&mv) {
                bonus += 0.5 * bonus_from(&next, config, depth - 1);
            }
        }
    }

    bonus
}

/// Orders follow-up moves foundation first, then attacks, then the rest,
/// keeping enumeration order within each class.
fn prioritized(state: &GameState, mut moves: Vec<Move>) -> Vec<Move> {
    moves.sort_by_key(|mv| {
        if mv.to.is_foundation() {
            0
        } else if is_attack_destination(state, mv) {
            1
        } else {
            2
        }
    });
    moves
}

#[cfg(test)]
mod tests {
    use rusbank_engine::{Card, Pile, PileLocation, PlayerId, PlayerState, Rank, Suit};

    use super::*;

    fn card(suit: Suit, rank: u8, origin: PlayerId) -> Card {
        Card::new(suit, Rank::new(rank).unwrap(), origin)
    }

    fn player(reserve: Vec<Card>, hand: Vec<Card>) -> PlayerState {
        PlayerState::from_piles(
            Pile::from_cards(reserve),
            Pile::new(),
            std::array::from_fn(|_| Pile::new()),
            Pile::from_cards(hand),
            None,
        )
    }

    fn state_with(p1: PlayerState, p2: PlayerState) -> GameState {
        let foundations = std::array::from_fn(|_| Pile::new());
        GameState::from_parts([p1, p2], foundations, PlayerId::One, 0)
    }

    #[test]
    fn test_foundation_candidates_get_no_bonus() {
        let ace = card(Suit::Hearts, 1, PlayerId::One);
        let state = state_with(
            player(vec![ace], vec![card(Suit::Clubs, 5, PlayerId::One)]),
            player(
                vec![card(Suit::Spades, 9, PlayerId::Two)],
                vec![card(Suit::Clubs, 6, PlayerId::Two)],
            ),
        );
        let mv = Move::new(
            PileLocation::Reserve(PlayerId::One),
            PileLocation::Foundation(0),
            ace,
        );
        let config = DecisionConfig::default();
        assert_eq!(look_ahead_bonus(&state, &mv, &config), 0.0);
    }

    #[test]
    fn test_unlocked_foundation_play_earns_bonus() {
        // Reserve: 2H over AH. Moving the two to a tableau exposes the
        // ace, whose foundation plays show up in the follow-up count.
        let two = card(Suit::Hearts, 2, PlayerId::One);
        let ace = card(Suit::Hearts, 1, PlayerId::One);
        let state = state_with(
            player(vec![ace, two], vec![card(Suit::Clubs, 5, PlayerId::One)]),
            player(
                vec![card(Suit::Spades, 9, PlayerId::Two)],
                vec![card(Suit::Clubs, 6, PlayerId::Two)],
            ),
        );
        let mv = Move::new(
            PileLocation::Reserve(PlayerId::One),
            PileLocation::Tableau(PlayerId::One, 0),
            two,
        );
        let config = DecisionConfig {
            look_ahead_depth: 1,
            ..DecisionConfig::default()
        };
        let bonus = look_ahead_bonus(&state, &mv, &config);
        // The exposed ace can reach both hearts foundations.
        #[expect(clippy::cast_precision_loss)]
        let expected_min = (2 * config.look_ahead_foundation_bonus) as f32;
        assert!(bonus >= expected_min, "bonus {bonus} < {expected_min}");
    }

    #[test]
    fn test_disabled_depth_returns_zero() {
        let state = GameState::new(Some(8));
        let config = DecisionConfig {
            look_ahead_depth: 0,
            ..DecisionConfig::default()
        };
        for mv in legal_moves(&state) {
            assert_eq!(look_ahead_bonus(&state, &mv, &config), 0.0);
        }
    }

    #[test]
    fn test_deeper_levels_never_lower_the_bonus() {
        let state = GameState::new(Some(77));
        let shallow = DecisionConfig {
            look_ahead_depth: 1,
            ..DecisionConfig::default()
        };
        let deep = DecisionConfig {
            look_ahead_depth: 2,
            ..DecisionConfig::default()
        };
        for mv in legal_moves(&state) {
            let a = look_ahead_bonus(&state, &mv, &shallow);
            let b = look_ahead_bonus(&state, &mv, &deep);
            assert!(b >= a, "deeper bonus {b} < shallow {a} for {mv}");
        }
    }

    #[test]
    fn test_look_ahead_leaves_state_untouched() {
        let state = GameState::new(Some(90));
        let before = state.clone();
        let config = DecisionConfig {
            look_ahead_depth: 3,
            ..DecisionConfig::default()
        };
        for mv in legal_moves(&state) {
            let _ = look_ahead_bonus(&state, &mv, &config);
        }
        assert_eq!(state, before);
    }
}

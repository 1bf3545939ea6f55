//! Whole-turn planning.
//!
//! [`compute_turn`] drives one player's entire turn: filter the legal
//! moves, score the survivors, pick one (usually the best, occasionally a
//! seeded-random exploration pick), apply it, and repeat until the turn
//! passes, the game ends, the engine reports nothing to draw, or the
//! operation cap trips. The returned steps carry every intermediate
//! snapshot, so a consumer can animate one move per tick or hand the final
//! snapshot straight to the opponent's turn.
//!
//! The cross-turn pattern window is the only state that outlives a call,
//! and it flows through the explicit `recent_patterns` parameter.

use rusbank_engine::{GameState, Lcg, Move, legal_moves};

use crate::{
    config::DecisionConfig,
    cycle::{MovePattern, PatternWindow, PositionSet, StateSet, canonical_hash},
    lookahead::look_ahead_bonus,
    score::{is_empty_creating_consolidation, is_pointless_shuffle, score_move},
    weights::Weights,
};

/// Hard cap on operations (moves plus draws) a single turn may emit.
pub const TURN_OPERATION_CAP: usize = 100;

/// One decision of a turn, with a human-readable justification.
#[derive(Debug, Clone)]
pub enum Decision {
    Move { mv: Move, reasoning: String },
    Draw { reasoning: String },
}

/// One step of a computed turn: the decision taken and the snapshot it
/// produced.
#[derive(Debug, Clone)]
pub struct Step {
    pub state: GameState,
    pub decision: Decision,
}

/// Plans and plays out the current player's whole turn.
///
/// Deterministic for fixed inputs: the exploration generator is seeded
/// from the snapshot's seed plus its move count.
#[must_use]
pub fn compute_turn(
    initial: &GameState,
    weights: &Weights,
    config: &DecisionConfig,
    recent_patterns: &mut PatternWindow,
) -> Vec<Step> {
    let mut planner = TurnPlanner::new(initial);
    let mut steps = Vec::new();
    let mut state = initial.clone();

    for _ in 0..TURN_OPERATION_CAP {
        let Some((decision, next)) = planner.plan_operation(&state, weights, config, recent_patterns)
        else {
            break;
        };
        steps.push(Step {
            state: next.clone(),
            decision,
        });
        state = next;
    }
    steps
}

/// Single-step convenience for consumers that only want the next decision
/// (hints, previews). Returns `None` when the game is over or the player
/// can neither move nor draw.
#[must_use]
pub fn get_best_decision(
    state: &GameState,
    weights: &Weights,
    config: &DecisionConfig,
) -> Option<Decision> {
    let mut window = PatternWindow::new(config.pattern_memory);
    let mut planner = TurnPlanner::new(state);
    planner
        .plan_operation(state, weights, config, &mut window)
        .map(|(decision, _)| decision)
}

/// Per-turn working state: cycle filters and the exploration generator.
#[derive(Debug)]
struct TurnPlanner {
    player: rusbank_engine::PlayerId,
    positions: PositionSet,
    states: StateSet,
    rng: Lcg,
}

impl TurnPlanner {
    fn new(initial: &GameState) -> Self {
        let mut positions = PositionSet::new();
        positions.record_state(initial);
        let mut states = StateSet::new();
        states.record(canonical_hash(initial));
        Self {
            player: initial.current_turn(),
            positions,
            states,
            rng: Lcg::new(initial.seed().wrapping_add(initial.move_count())),
        }
    }

    /// Plans and applies one operation. `None` ends the turn sequence.
    fn plan_operation(
        &mut self,
        state: &GameState,
        weights: &Weights,
        config: &DecisionConfig,
        recent_patterns: &mut PatternWindow,
    ) -> Option<(Decision, GameState)> {
        if state.phase().is_ended() || state.current_turn() != self.player {
            return None;
        }

        let legal = legal_moves(state);
        let candidates = self.filter_candidates(state, &legal);
        let scored = self.score_candidates(state, candidates, weights, config, recent_patterns);

        if scored.is_empty() {
            return self.fall_back(state, &legal, recent_patterns);
        }

        let (mv, score, pool) = self.select(scored, config);
        let next = state.apply_move(&mv).ok()?;
        self.observe(&next);
        recent_patterns.push(MovePattern::of(&mv));
        let reasoning = format!("best of {pool} candidates (score {score:.1})");
        Some((Decision::Move { mv, reasoning }, next))
    }

    /// Fixed filter order: pointless shuffles always go; the cycle filters
    /// are disabled while a drawn card is pending, because that card must
    /// be played regardless.
    fn filter_candidates(&self, state: &GameState, legal: &[Move]) -> Vec<Move> {
        let drawn_pending = state.current_player().drawn_card().is_some();
        let mut candidates: Vec<Move> = legal
            .iter()
            .filter(|mv| !is_pointless_shuffle(state, mv))
            .copied()
            .collect();

        if !drawn_pending {
            candidates.retain(|mv| !self.positions.contains_destination(mv));
            candidates.retain(|mv| match state.apply_move(mv) {
                Ok(next) => !self.states.contains(canonical_hash(&next)),
                Err(_) => false,
            });
        }
        candidates
    }

    fn score_candidates(
        &self,
        state: &GameState,
        candidates: Vec<Move>,
        weights: &Weights,
        config: &DecisionConfig,
        recent_patterns: &PatternWindow,
    ) -> Vec<(Move, f32)> {
        candidates
            .into_iter()
            .map(|mv| {
                #[expect(clippy::cast_precision_loss)]
                let mut score = score_move(state, &mv, weights) as f32;
                if mv.from.is_tableau() && mv.to.is_tableau() {
                    let repeats =
                        i32::try_from(recent_patterns.count_matches(&MovePattern::of(&mv)))
                            .unwrap_or(i32::MAX);
                    #[expect(clippy::cast_precision_loss)]
                    let penalty = (config.shuffle_penalty * repeats) as f32;
                    score -= penalty;
                }
                score += look_ahead_bonus(state, &mv, config);
                (mv, score)
            })
            .collect()
    }

    /// Stable score-descending sort, then the top pick or (rarely) a
    /// uniform exploration pick.
    fn select(
        &mut self,
        mut scored: Vec<(Move, f32)>,
        config: &DecisionConfig,
    ) -> (Move, f32, usize) {
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        let pool = scored.len();
        let pick = if self.rng.next_f32() < config.exploration_rate {
            self.rng.next_index(pool)
        } else {
            0
        };
        let (mv, score) = scored[pick];
        (mv, score, pool)
    }

    /// Every candidate was filtered away. Prefer an empty-creating
    /// consolidation from the unfiltered legal moves over drawing; only
    /// then draw.
    fn fall_back(
        &mut self,
        state: &GameState,
        legal: &[Move],
        recent_patterns: &mut PatternWindow,
    ) -> Option<(Decision, GameState)> {
        if let Some(mv) = legal
            .iter()
            .find(|mv| is_empty_creating_consolidation(state, mv))
        {
            let next = state.apply_move(mv).ok()?;
            self.observe(&next);
            recent_patterns.push(MovePattern::of(mv));
            let decision = Decision::Move {
                mv: *mv,
                reasoning: "consolidating a lone pile instead of drawing".to_owned(),
            };
            return Some((decision, next));
        }

        match state.draw_from_hand() {
            Ok(outcome) => {
                // drawing is progress; the cycle filters start over
                self.positions = PositionSet::new();
                self.states = StateSet::new();
                self.observe(&outcome.state);
                let reasoning = if outcome.turn_ended {
                    format!("drew {}, no play available, turn passes", outcome.card)
                } else {
                    format!("no scored candidates, drew {}", outcome.card)
                };
                Some((Decision::Draw { reasoning }, outcome.state))
            }
            Err(_) => None,
        }
    }

    fn observe(&mut self, state: &GameState) {
        self.positions.record_state(state);
        self.states.record(canonical_hash(state));
    }
}

//! Self-play match running and the stagnation adapter.
//!
//! A training game is two decision makers driving one engine instance to
//! completion. Fairness across individuals comes from seed discipline:
//! every individual in a generation plays the same seeds, once per side,
//! with a fixed offset distinguishing the swapped-sides game.

use rusbank_ai::{Decision, DecisionConfig, PatternWindow, Step, Weights, compute_turn};
use rusbank_engine::{GameState, PlayerId};

/// Seed offset for the side-swapped game of a pair.
pub const SEED_SIDE_OFFSET: u32 = 1_000_000;

/// Cumulative moves without foundation progress before the adapter starts
/// raising exploration.
pub const STAGNATION_THRESHOLD: u32 = 50;

/// Moves past the threshold at which the adaptation reaches full strength.
const STAGNATION_RAMP: f32 = 450.0;
/// Exploration rate gain at full stagnation.
const MAX_EXPLORATION_BOOST: f32 = 0.45;
/// Shuffle penalty multiplier at full stagnation.
const MAX_SHUFFLE_PENALTY_FACTOR: f32 = 3.0;

/// Wraps the decision configuration with stagnation tracking.
///
/// Once the cumulative count of moves since the last foundation play
/// exceeds [`STAGNATION_THRESHOLD`], exploration scales linearly up to
/// +0.45 and the shuffle penalty up to three times its base value. This
/// adaptation belongs to the trainer's call pattern; the decision maker
/// itself stays stateless.
#[derive(Debug, Clone)]
pub struct StagnationAdapter {
    base: DecisionConfig,
    moves_since_progress: u32,
}

impl StagnationAdapter {
    #[must_use]
    pub fn new(base: DecisionConfig) -> Self {
        Self {
            base,
            moves_since_progress: 0,
        }
    }

    /// The configuration to use for the next turn.
    #[must_use]
    pub fn current_config(&self) -> DecisionConfig {
        let excess = self.moves_since_progress.saturating_sub(STAGNATION_THRESHOLD);
        if excess == 0 {
            return self.base.clone();
        }
        #[expect(clippy::cast_precision_loss)]
        let ramp = (excess as f32 / STAGNATION_RAMP).min(1.0);
        let mut config = self.base.clone();
        config.exploration_rate = (config.exploration_rate + MAX_EXPLORATION_BOOST * ramp).min(1.0);
        #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let penalty = (config.shuffle_penalty as f32
            * (1.0 + (MAX_SHUFFLE_PENALTY_FACTOR - 1.0) * ramp))
            .round() as i32;
        config.shuffle_penalty = penalty;
        config
    }

    /// Feeds one computed turn back into the tracker.
    pub fn observe_steps(&mut self, steps: &[Step]) {
        for step in steps {
            match &step.decision {
                Decision::Move { mv, .. } if mv.to.is_foundation() => {
                    self.moves_since_progress = 0;
                }
                Decision::Move { .. } | Decision::Draw { .. } => {
                    self.moves_since_progress += 1;
                }
            }
        }
    }

    #[must_use]
    pub fn moves_since_progress(&self) -> u32 {
        self.moves_since_progress
    }
}

/// Result of one completed training game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Option<PlayerId>,
    pub turns: u32,
    pub moves: u32,
}

/// Plays one full game between two weight vectors.
///
/// Each side keeps its own cross-turn pattern window and stagnation
/// adapter. The engine's move limit ends runaway games on its own;
/// `max_turns` adds the trainer's outer cap on alternations.
#[must_use]
pub fn play_game(
    seed: u32,
    player_one: &Weights,
    player_two: &Weights,
    config: &DecisionConfig,
    max_turns: u32,
) -> GameOutcome {
    let mut state = GameState::new(Some(seed));
    let mut windows = [
        PatternWindow::new(config.pattern_memory),
        PatternWindow::new(config.pattern_memory),
    ];
    let mut adapters = [
        StagnationAdapter::new(config.clone()),
        StagnationAdapter::new(config.clone()),
    ];

    let mut turns = 0;
    while !state.phase().is_ended() && turns < max_turns {
        let side = state.current_turn().index();
        let weights = if side == 0 { player_one } else { player_two };
        let turn_config = adapters[side].current_config();

        let steps = compute_turn(&state, weights, &turn_config, &mut windows[side]);
        let Some(last) = steps.last() else {
            // nothing to play and nothing to draw: the game cannot advance
            break;
        };
        adapters[side].observe_steps(&steps);
        state = last.state.clone();
        turns += 1;
    }

    GameOutcome {
        winner: state.winner(),
        turns,
        moves: state.move_count(),
    }
}

/// Aggregate result of paired games from the candidate's perspective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl MatchRecord {
    pub fn record(&mut self, winner: Option<PlayerId>, candidate_side: PlayerId) {
        match winner {
            Some(side) if side == candidate_side => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
    }

    #[must_use]
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

/// Plays `seeds.len()` game pairs between `candidate` and `baseline`,
/// alternating sides: seed `s` with the candidate as player one, then
/// `s + SEED_SIDE_OFFSET` with the candidate as player two.
#[must_use]
pub fn play_paired_games(
    candidate: &Weights,
    baseline: &Weights,
    seeds: &[u32],
    config: &DecisionConfig,
    max_turns: u32,
) -> MatchRecord {
    let mut record = MatchRecord::default();
    for &seed in seeds {
        let outcome = play_game(seed, candidate, baseline, config, max_turns);
        record.record(outcome.winner, PlayerId::One);

        let outcome = play_game(
            seed.wrapping_add(SEED_SIDE_OFFSET),
            baseline,
            candidate,
            config,
            max_turns,
        );
        record.record(outcome.winner, PlayerId::Two);
    }
    record
}

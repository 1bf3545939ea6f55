//! Evolutionary training for the decision maker's feature weights.
//!
//! The trainer optimizes weight vectors by self-play: each candidate plays
//! paired games against the fixed reference baseline (alternating sides on
//! shared seeds for fairness), its win rate becomes its fitness, and a
//! genetic algorithm produces the next generation from the best performers.
//!
//! # How Training Works
//!
//! 1. **Bootstrap** - One baseline individual plus randomized variants
//! 2. **Evaluation** - Every individual plays the same seeded game pairs
//!    against the baseline, in parallel
//! 3. **Selection** - Elites carry over unchanged; the rest reproduce via
//!    tournament selection, crossover, and bounded mutation
//! 4. **Checkpointing** - The whole training state persists atomically at
//!    a configurable interval and on graceful shutdown
//!
//! # Architecture
//!
//! ```text
//! Trainer (generation loop, history, shutdown flag)
//!     ↓ evaluates via
//! Self-play match runner (engine + decision maker, paired seeds)
//!     ↓ scores
//! Population (individuals, parallel fitness evaluation)
//!     ↓ reproduced by
//! PopulationEvolver (elitism, tournament, crossover, mutation)
//! ```
//!
//! Fitness evaluation is embarrassingly parallel: individuals only share
//! immutable inputs (baseline weights, seed vector, configuration), so
//! each gets a scoped worker thread. The coordinator touches shared state
//! only after the scope joins.

pub mod checkpoint;
pub mod genetic;
pub mod selfplay;
pub mod stats;
pub mod trainer;

pub use self::{checkpoint::*, genetic::*, selfplay::*, stats::*, trainer::*};

//! Heuristic decision maker for the Russian Bank engine.
//!
//! The decision maker consumes engine snapshots and produces a full turn of
//! play: a sequence of moves ending when the turn passes, the game ends, or
//! a safety cap is reached. Candidate moves are scored by a weighted sum of
//! closed-set features ([`weights`]), pruned by anti-cycling filters
//! ([`cycle`]), optionally boosted by shallow look-ahead ([`lookahead`]),
//! and selected with a small seeded exploration rate ([`turn`]).
//!
//! Everything is deterministic given its inputs: the internal generator is
//! seeded from the snapshot's seed and move count, so training runs and
//! replays agree move for move.

pub use self::{config::*, cycle::*, score::*, turn::*, weights::*};

pub mod config;
pub mod cycle;
pub mod lookahead;
pub mod score;
pub mod turn;
pub mod weights;

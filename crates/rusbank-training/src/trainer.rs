//! The generation loop.
//!
//! [`Trainer`] owns the whole mutable training state: population, history,
//! all-time best, counters. One call to [`Trainer::run`] plays out the
//! configured number of generations, checkpointing along the way and
//! honoring a graceful-shutdown flag at generation boundaries.

use std::{
    collections::BTreeMap,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use chrono::{DateTime, Utc};
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use rusbank_ai::{DecisionConfig, Weights};

use crate::{
    checkpoint::{CHECKPOINT_VERSION, Checkpoint},
    genetic::{Individual, Population, PopulationEvolver},
};

/// All training parameters. Embedded in every checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub generations: u32,
    pub population_size: usize,
    /// Game pairs per individual per generation (each pair is one game per
    /// side).
    pub games_per_evaluation: usize,
    pub elite_count: usize,
    pub tournament_size: usize,
    pub mutation_rate: f64,
    pub mutation_strength: f64,
    /// Checkpoint every this many generations.
    pub checkpoint_interval: u32,
    /// Outer cap on turn alternations per training game.
    pub max_turns_per_game: u32,
    pub decision: DecisionConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            generations: 50,
            population_size: 24,
            games_per_evaluation: 12,
            elite_count: 2,
            tournament_size: 3,
            mutation_rate: 0.15,
            mutation_strength: 0.3,
            checkpoint_interval: 5,
            max_turns_per_game: 300,
            decision: DecisionConfig::default(),
        }
    }
}

/// One line of training history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub number: u32,
    pub best_fitness: f32,
    pub avg_fitness: f32,
    /// The generation best's weights that differ from the reference
    /// baseline, by feature name.
    pub best_weights_diff: BTreeMap<String, i32>,
}

/// The training loop and its state.
#[derive(Debug)]
pub struct Trainer {
    config: TrainerConfig,
    population: Population,
    history: Vec<GenerationSummary>,
    best_individual: Individual,
    all_time_best: Individual,
    current_generation: u32,
    total_games_played: u64,
    start_time: DateTime<Utc>,
    checkpoint_path: Option<PathBuf>,
    shutdown: Arc<AtomicBool>,
    verbose: bool,
}

impl Trainer {
    /// Starts a fresh run with a bootstrapped population.
    #[must_use]
    pub fn new(config: TrainerConfig) -> Self {
        let mut rng = rand::rng();
        let population = Population::bootstrap(config.population_size, &mut rng);
        let baseline = Individual::reference();
        Self {
            config,
            population,
            history: Vec::new(),
            best_individual: baseline.clone(),
            all_time_best: baseline,
            current_generation: 0,
            total_games_played: 0,
            start_time: Utc::now(),
            checkpoint_path: None,
            shutdown: Arc::new(AtomicBool::new(false)),
            verbose: false,
        }
    }

    /// Resumes a run from a loaded checkpoint. The checkpoint's embedded
    /// configuration wins over whatever the caller parsed.
    #[must_use]
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Self {
        Self {
            config: checkpoint.config,
            population: Population::from_individuals(checkpoint.population),
            history: checkpoint.generation_history,
            best_individual: checkpoint.best_individual,
            all_time_best: checkpoint.all_time_best,
            current_generation: checkpoint.current_generation,
            total_games_played: checkpoint.total_games_played,
            start_time: checkpoint.start_time,
            checkpoint_path: None,
            shutdown: Arc::new(AtomicBool::new(false)),
            verbose: false,
        }
    }

    pub fn set_checkpoint_path(&mut self, path: PathBuf) {
        self.checkpoint_path = Some(path);
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// The flag a signal handler should set to request a graceful stop.
    #[must_use]
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    #[must_use]
    pub fn all_time_best(&self) -> &Individual {
        &self.all_time_best
    }

    #[must_use]
    pub fn history(&self) -> &[GenerationSummary] {
        &self.history
    }

    #[must_use]
    pub fn current_generation(&self) -> u32 {
        self.current_generation
    }

    /// Runs the generation loop until the configured generation count or a
    /// shutdown request, whichever comes first.
    pub fn run(&mut self) {
        let baseline = Weights::reference();
        let evolver = PopulationEvolver {
            elite_count: self.config.elite_count,
            tournament_size: self.config.tournament_size,
            mutation_rate: self.config.mutation_rate,
            mutation_strength: self.config.mutation_strength,
        };

        while self.current_generation < self.config.generations {
            let generation = self.current_generation;
            eprintln!("Generation #{generation}:");

            // One seed vector per generation, shared by every individual.
            let mut rng = rand::rng();
            let seeds: Vec<u32> = (0..self.config.games_per_evaluation)
                .map(|_| rng.random())
                .collect();

            self.population.evaluate_fitness(
                &baseline,
                &seeds,
                &self.config.decision,
                self.config.max_turns_per_game,
            );
            self.total_games_played +=
                (self.population.len() * 2 * self.config.games_per_evaluation) as u64;

            self.record_generation(generation);
            self.print_summary();

            self.current_generation += 1;
            let shutdown_requested = self.shutdown.load(Ordering::Relaxed);
            let finished = self.current_generation >= self.config.generations;

            if shutdown_requested
                || finished
                || self.current_generation % self.config.checkpoint_interval.max(1) == 0
            {
                self.save_checkpoint();
            }
            if shutdown_requested {
                eprintln!("Shutdown requested; stopping after generation #{generation}.");
                break;
            }
            if !finished {
                let mut rng = rand::rng();
                self.population = evolver.evolve(&self.population, &mut rng);
            }
        }
    }

    fn record_generation(&mut self, number: u32) {
        let best = self.population.best().clone();
        if best.fitness > self.all_time_best.fitness || self.history.is_empty() {
            self.all_time_best = best.clone();
        }

        let avg_fitness = self
            .population
            .fitness_stats()
            .map_or(0.0, |stats| stats.mean);
        self.history.push(GenerationSummary {
            number,
            best_fitness: best.fitness,
            avg_fitness,
            best_weights_diff: best.weights.diff(&Weights::reference()),
        });
        self.best_individual = best;
    }

    fn print_summary(&self) {
        let Some(summary) = self.history.last() else {
            return;
        };
        eprintln!(
            "  best {:.3} ({} wins / {} games), avg {:.3}, all-time best {:.3}",
            summary.best_fitness,
            self.best_individual.wins,
            self.best_individual.games_played,
            summary.avg_fitness,
            self.all_time_best.fitness,
        );
        if self.verbose {
            eprintln!("  individuals:");
            for (i, ind) in self.population.individuals().iter().enumerate() {
                eprintln!(
                    "  {i:2}: fitness {:.3} ({}-{}-{})",
                    ind.fitness, ind.wins, ind.losses, ind.draws
                );
            }
            eprintln!("  best diff vs reference: {:?}", summary.best_weights_diff);
        }
    }

    /// Persists the current state. A failed save is reported and skipped;
    /// the next interval retries.
    pub fn save_checkpoint(&self) {
        let Some(path) = &self.checkpoint_path else {
            return;
        };
        let checkpoint = Checkpoint {
            version: CHECKPOINT_VERSION,
            config: self.config.clone(),
            current_generation: self.current_generation,
            best_individual: self.best_individual.clone(),
            all_time_best: self.all_time_best.clone(),
            population: self.population.individuals().to_vec(),
            generation_history: self.history.clone(),
            start_time: self.start_time,
            total_games_played: self.total_games_played,
        };
        match checkpoint.save(path) {
            Ok(()) => eprintln!("  checkpoint saved to {}", path.display()),
            Err(err) => eprintln!("  checkpoint save failed (will retry later): {err}"),
        }
    }
}

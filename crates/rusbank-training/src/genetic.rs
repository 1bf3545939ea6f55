//! Genetic algorithm over weight vectors.
//!
//! The population evolves by elitism plus tournament-selected reproduction.
//! Crossover picks each gene from a parent or their rounded mean; mutation
//! perturbs genes by a bounded uniform step scaled to each feature's clamp
//! interval. Every produced weight stays inside its feature's interval, so
//! downstream scoring never needs overflow handling.

use std::thread;

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use rusbank_ai::{DecisionConfig, Feature, Weights};

use crate::{
    selfplay::{self, MatchRecord},
    stats::DescriptiveStats,
};

/// A candidate weight vector with its evaluation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    pub weights: Weights,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_played: u32,
    pub fitness: f32,
}

impl Individual {
    #[must_use]
    pub fn with_weights(weights: Weights) -> Self {
        Self {
            weights,
            wins: 0,
            losses: 0,
            draws: 0,
            games_played: 0,
            fitness: 0.0,
        }
    }

    /// The baseline individual holding the reference weights verbatim.
    #[must_use]
    pub fn reference() -> Self {
        Self::with_weights(Weights::reference())
    }

    /// A randomized individual: every weight is the reference value scaled
    /// by a uniform factor in `[0.7, 1.3]`, rounded, and clamped.
    #[must_use]
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let weights = Weights::from_fn(|feature| {
            let factor: f64 = rng.random_range(0.7..=1.3);
            #[expect(clippy::cast_possible_truncation)]
            let value = (f64::from(feature.reference_weight()) * factor).round() as i32;
            feature.clamp(value)
        });
        Self::with_weights(weights)
    }

    pub fn reset_counters(&mut self) {
        self.wins = 0;
        self.losses = 0;
        self.draws = 0;
        self.games_played = 0;
        self.fitness = 0.0;
    }

    pub(crate) fn absorb_record(&mut self, record: MatchRecord) {
        self.wins = record.wins;
        self.losses = record.losses;
        self.draws = record.draws;
        self.games_played = record.games();
        #[expect(clippy::cast_precision_loss)]
        let fitness = self.wins as f32 / self.games_played.max(1) as f32;
        self.fitness = fitness;
    }
}

/// The population of one generation.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Bootstraps a population: the baseline individual first, randomized
    /// individuals for the remaining slots.
    #[must_use]
    pub fn bootstrap<R>(size: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(size > 0, "population cannot be empty");
        let mut individuals = vec![Individual::reference()];
        while individuals.len() < size {
            individuals.push(Individual::random(rng));
        }
        Self { individuals }
    }

    #[must_use]
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        assert!(!individuals.is_empty(), "population cannot be empty");
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The best individual of the most recent evaluation.
    ///
    /// # Panics
    ///
    /// Panics if the population is empty, which `bootstrap` and
    /// `from_individuals` rule out.
    #[must_use]
    pub fn best(&self) -> &Individual {
        self.individuals.first().expect("population is not empty")
    }

    /// Evaluates every individual against the baseline in parallel, then
    /// sorts the population by fitness descending.
    ///
    /// All individuals share `seeds`, so differences in fitness reflect
    /// weight differences rather than deal luck.
    pub fn evaluate_fitness(
        &mut self,
        baseline: &Weights,
        seeds: &[u32],
        config: &DecisionConfig,
        max_turns: u32,
    ) {
        thread::scope(|s| {
            for ind in &mut self.individuals {
                s.spawn(move || {
                    let record = selfplay::play_paired_games(
                        &ind.weights,
                        baseline,
                        seeds,
                        config,
                        max_turns,
                    );
                    ind.absorb_record(record);
                });
            }
        });

        self.individuals
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    }

    /// Fitness distribution of the current population.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(|ind| ind.fitness))
    }
}

/// Reproduction parameters for one generation step.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Top individuals copied unchanged (with zeroed counters).
    pub elite_count: usize,
    /// Individuals sampled per tournament pick.
    pub tournament_size: usize,
    /// Per-gene probability of mutating.
    pub mutation_rate: f64,
    /// Mutation step size as a fraction of each feature's interval width.
    pub mutation_strength: f64,
}

impl PopulationEvolver {
    /// Produces the next generation. The input population must already be
    /// sorted by fitness descending (as `evaluate_fitness` leaves it).
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let individuals = population.individuals();
        assert!(individuals.is_sorted_by(|a, b| a.fitness >= b.fitness));

        let elite_count = self.elite_count.min(individuals.len());
        let mut next: Vec<Individual> = individuals[..elite_count]
            .iter()
            .map(|elite| {
                let mut carried = elite.clone();
                carried.reset_counters();
                carried
            })
            .collect();

        while next.len() < individuals.len() {
            let p1 = tournament_select(individuals, self.tournament_size, rng);
            let p2 = tournament_select(individuals, self.tournament_size, rng);

            let mut child = crossover(&p1.weights, &p2.weights, rng);
            mutate(&mut child, self.mutation_rate, self.mutation_strength, rng);
            next.push(Individual::with_weights(child));
        }

        Population::from_individuals(next)
    }
}

/// Per-gene crossover: under 0.4 take parent one, under 0.8 take parent
/// two, otherwise the rounded mean.
pub fn crossover<R>(p1: &Weights, p2: &Weights, rng: &mut R) -> Weights
where
    R: Rng + ?Sized,
{
    Weights::from_fn(|feature| {
        let r: f64 = rng.random();
        if r < 0.4 {
            p1[feature]
        } else if r < 0.8 {
            p2[feature]
        } else {
            let mean = f64::from(p1[feature] + p2[feature]) / 2.0;
            #[expect(clippy::cast_possible_truncation)]
            let value = mean.round() as i32;
            feature.clamp(value)
        }
    })
}

/// Per-gene mutation: with probability `rate`, add a uniform step in
/// `[-1, 1]` scaled by the feature's interval width and `strength`, then
/// round and clamp.
pub fn mutate<R>(weights: &mut Weights, rate: f64, strength: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for feature in Feature::ALL {
        if rng.random_bool(rate) {
            let step = rng.random_range(-1.0..=1.0) * f64::from(feature.range_width()) * strength;
            #[expect(clippy::cast_possible_truncation)]
            let value = (f64::from(weights[feature]) + step).round() as i32;
            weights[feature] = feature.clamp(value);
        }
    }
}

/// Tournament selection: sample `tournament_size` individuals, keep the
/// fittest.
fn tournament_select<'a, R>(
    individuals: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    individuals
        .choose_multiple(rng, tournament_size)
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .expect("population is not empty")
}

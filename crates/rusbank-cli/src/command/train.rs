use std::{
    fs,
    path::PathBuf,
    process,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyhow::Context as _;
use rusbank_training::{Checkpoint, Trainer, TrainerConfig};

use crate::{model::WeightsFile, output::Output};

const CHECKPOINT_FILE: &str = "checkpoint.json";
const WEIGHTS_FILE: &str = "best-weights.json";

#[derive(Debug, Clone, clap::Args)]
pub struct TrainArg {
    /// Number of generations to run
    #[arg(long, default_value_t = TrainerConfig::default().generations)]
    generations: u32,
    /// Population size
    #[arg(long, default_value_t = TrainerConfig::default().population_size)]
    population: usize,
    /// Game pairs per individual per generation (one game per side)
    #[arg(long, default_value_t = TrainerConfig::default().games_per_evaluation)]
    evaluations: usize,
    /// Per-gene mutation probability
    #[arg(long, default_value_t = TrainerConfig::default().mutation_rate)]
    mutation: f64,
    /// Mutation step size as a fraction of each weight's interval
    #[arg(long, default_value_t = TrainerConfig::default().mutation_strength)]
    strength: f64,
    /// Generations between checkpoints
    #[arg(long, default_value_t = TrainerConfig::default().checkpoint_interval)]
    checkpoint: u32,
    /// Output directory for the checkpoint and trained weights
    #[arg(long, default_value = "training-output")]
    output: PathBuf,
    /// Print per-individual results every generation
    #[arg(long)]
    verbose: bool,
    /// Small smoke-test run (overrides generations/population/evaluations)
    #[arg(long, conflicts_with = "overnight")]
    quick: bool,
    /// Long unattended run (overrides generations/population/evaluations)
    #[arg(long)]
    overnight: bool,
}

impl TrainArg {
    fn to_config(&self) -> TrainerConfig {
        let mut config = TrainerConfig {
            generations: self.generations,
            population_size: self.population,
            games_per_evaluation: self.evaluations,
            mutation_rate: self.mutation,
            mutation_strength: self.strength,
            checkpoint_interval: self.checkpoint,
            ..TrainerConfig::default()
        };
        if self.quick {
            config.generations = 5;
            config.population_size = 8;
            config.games_per_evaluation = 3;
        }
        if self.overnight {
            config.generations = 500;
            config.population_size = 32;
            config.games_per_evaluation = 20;
        }
        config
    }
}

pub fn run(arg: &TrainArg) -> anyhow::Result<()> {
    fs::create_dir_all(&arg.output)
        .with_context(|| format!("Failed to create output directory {}", arg.output.display()))?;
    let checkpoint_path = arg.output.join(CHECKPOINT_FILE);

    // A checkpoint in the output directory means resume; a version mismatch
    // is fatal and left for the operator to delete or migrate.
    let mut trainer = if checkpoint_path.exists() {
        let checkpoint = Checkpoint::load(&checkpoint_path).with_context(|| {
            format!("Failed to load checkpoint {}", checkpoint_path.display())
        })?;
        eprintln!(
            "Resuming from {} at generation #{}",
            checkpoint_path.display(),
            checkpoint.current_generation
        );
        Trainer::from_checkpoint(checkpoint)
    } else {
        Trainer::new(arg.to_config())
    };
    trainer.set_checkpoint_path(checkpoint_path);
    trainer.set_verbose(arg.verbose);

    install_signal_handler(&trainer)?;

    trainer.run();

    let best = trainer.all_time_best();
    let weights_path = arg.output.join(WEIGHTS_FILE);
    let weights_file = WeightsFile::new(best.fitness, best.weights.clone());
    Output::save_json(&weights_file, Some(weights_path.clone()))?;

    eprintln!();
    eprintln!("Training complete after {} generations", trainer.current_generation());
    eprintln!("  All-time best fitness: {:.3}", best.fitness);
    eprintln!("  Weights saved to: {}", weights_path.display());

    Ok(())
}

/// First signal requests a graceful stop at the generation boundary; a
/// second one exits immediately.
fn install_signal_handler(trainer: &Trainer) -> anyhow::Result<()> {
    let flag = trainer.shutdown_flag();
    let signal_count = Arc::new(AtomicUsize::new(0));
    ctrlc::set_handler(move || {
        let count = signal_count.fetch_add(1, Ordering::SeqCst);
        if count == 0 {
            eprintln!("\nFinishing current generation, then checkpointing; press again to abort.");
            flag.store(true, Ordering::Relaxed);
        } else {
            process::exit(1);
        }
    })
    .context("Failed to install signal handler")
}

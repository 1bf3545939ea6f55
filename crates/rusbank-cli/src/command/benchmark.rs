use std::path::PathBuf;

use rand::Rng as _;
use rusbank_ai::Weights;
use rusbank_training::{self as training, TrainerConfig};

use crate::model::WeightsFile;

#[derive(Debug, Clone, clap::Args)]
pub struct BenchmarkArg {
    /// Trained weights file to evaluate
    #[arg(long)]
    weights: PathBuf,
    /// Number of game pairs to play (one game per side per pair)
    #[arg(long, default_value_t = 20)]
    games: usize,
    /// Seed for the game deals; random when omitted
    #[arg(long)]
    seed: Option<u32>,
}

pub fn run(arg: &BenchmarkArg) -> anyhow::Result<()> {
    let loaded = WeightsFile::load(&arg.weights)?;
    eprintln!(
        "Benchmarking {} (trained {}, fitness {:.3}) over {} game pairs...",
        arg.weights.display(),
        loaded.timestamp,
        loaded.fitness,
        arg.games
    );

    let mut rng = rand::rng();
    let base_seed = arg.seed.unwrap_or_else(|| rng.random());
    let seeds: Vec<u32> = (0..arg.games)
        .map(|i| base_seed.wrapping_add(u32::try_from(i).unwrap_or(u32::MAX)))
        .collect();

    let config = TrainerConfig::default();
    let record = training::play_paired_games(
        &loaded.weights,
        &Weights::reference(),
        &seeds,
        &config.decision,
        config.max_turns_per_game,
    );

    let win_rate = f64::from(record.wins) / f64::from(record.games().max(1));
    println!("Results vs reference weights (base seed {base_seed}):");
    println!("  Games:  {}", record.games());
    println!("  Wins:   {}", record.wins);
    println!("  Losses: {}", record.losses);
    println!("  Draws:  {}", record.draws);
    println!("  Win rate: {win_rate:.3}");

    Ok(())
}

use clap::{Parser, Subcommand};

mod command;
mod model;
mod output;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Russian Bank decision-maker training", long_about = None)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve decision weights by self-play against the reference baseline
    Train(command::train::TrainArg),
    /// Play a saved weights file against the reference baseline
    Benchmark(command::benchmark::BenchmarkArg),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.mode {
        Mode::Train(arg) => command::train::run(&arg),
        Mode::Benchmark(arg) => command::benchmark::run(&arg),
    }
}

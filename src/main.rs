use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use codemap::cli::commands;
use codemap::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Analyze { ref path } => {
            commands::run_analyze(&resolve_root(path), &cli, &cli.format)?
        }
        Commands::Graph { ref path } => {
            commands::run_graph(&resolve_root(path), &cli, &cli.format)?
        }
        Commands::Cycles { ref path } => {
            commands::run_cycles(&resolve_root(path), &cli, &cli.format)?
        }
        Commands::Duplicates { ref path } => {
            commands::run_duplicates(&resolve_root(path), &cli, &cli.format)?
        }
        Commands::DeadCode { ref path } => {
            commands::run_dead_code(&resolve_root(path), &cli, &cli.format)?
        }
    };
    println!("{}", output);

    Ok(())
}

fn resolve_root(path: &str) -> PathBuf {
    PathBuf::from(path)
        .canonicalize()
        .unwrap_or_else(|_| PathBuf::from(path))
}

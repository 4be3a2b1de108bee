use clap::{Parser, Subcommand, ValueEnum};

pub mod commands;
pub mod output;

#[derive(Parser)]
#[command(
    name = "codemap",
    version,
    about = "Structural codebase analysis: entities, dependencies, cycles, duplicates, dead code"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Include only files matching this glob
    #[arg(long, global = true)]
    pub include: Vec<String>,

    /// Exclude files matching this glob
    #[arg(long, global = true)]
    pub exclude: Vec<String>,

    /// Filter to a specific language
    #[arg(long, global = true)]
    pub lang: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full analysis and print a project summary
    Analyze {
        /// Project path (default: current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Print the file dependency graph with coupling scores
    Graph {
        #[arg(default_value = ".")]
        path: String,
    },

    /// Detect circular imports
    Cycles {
        #[arg(default_value = ".")]
        path: String,
    },

    /// Find structurally duplicated functions
    Duplicates {
        #[arg(default_value = ".")]
        path: String,
    },

    /// Find dead code (unused exports, orphaned files)
    DeadCode {
        #[arg(default_value = ".")]
        path: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Compact,
}

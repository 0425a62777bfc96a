//! CLI argument parsing for the regional-dispatch binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::services::vrp::SolverConfig;

#[derive(Parser)]
#[command(name = "regional-dispatch", about = "Regional hub dispatch planner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sweep dispatch times and write per-cluster reports (default if no subcommand given)
    Plan {
        /// Only plan the cluster headed by this hub
        #[arg(long)]
        cluster: Option<String>,
        /// Solver effort preset
        #[arg(long, value_enum)]
        solver: Option<SolverPreset>,
        /// Override OUTPUT_DIR
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print clusters, demand and windows without solving
    Inspect {
        /// Only inspect the cluster headed by this hub
        #[arg(long)]
        cluster: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SolverPreset {
    Instant,
    Fast,
    Default,
    Quality,
}

impl SolverPreset {
    pub fn config(self) -> SolverConfig {
        match self {
            SolverPreset::Instant => SolverConfig::instant(),
            SolverPreset::Fast => SolverConfig::fast(),
            SolverPreset::Default => SolverConfig::default(),
            SolverPreset::Quality => SolverConfig::quality(),
        }
    }
}

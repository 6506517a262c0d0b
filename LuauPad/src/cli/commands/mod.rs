use clap::Subcommand;
use std::path::PathBuf;

use crate::config::AppConfig;

pub mod exec;
pub mod highlight;
pub mod shell;

#[derive(Subcommand)]
pub enum Commands {
    /// Print a script with syntax highlighting and line numbers
    Highlight {
        /// Script to highlight
        file: PathBuf,

        /// Print the token stream as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Print the number of lines in a script
    Lines {
        /// Script to count
        file: PathBuf,
    },

    /// Send a script to the execution endpoint
    Exec {
        /// Script to send
        file: PathBuf,
    },

    /// Check that the execution endpoint answers
    Probe,

    /// Interactive multi-document session
    Shell {
        /// Files to open at start
        files: Vec<PathBuf>,
    },
}

impl Commands {
    pub fn execute(&self, config: &AppConfig) -> anyhow::Result<()> {
        match self {
            Commands::Highlight { file, json } => highlight::execute(file, *json),
            Commands::Lines { file } => highlight::lines(file),
            Commands::Exec { file } => exec::execute(file, config),
            Commands::Probe => exec::probe(config),
            Commands::Shell { files } => shell::execute(files, config),
        }
    }
}

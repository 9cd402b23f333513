//! Runtime configuration.
//!
//! Values come from the command line first, then from the environment
//! (including a `.env` file loaded by `main`), then from built-in defaults.

use crate::error::{AppError, Result};
use clap::Parser;
use std::env::{self, VarError};
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_QUIZ_FILE: &str = "quizzes.json";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Interactive quiz manager
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Quiz file to load and save (env: QUIZ_FILE, default: quizzes.json)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Keep changes in memory only; never write the quiz file
    #[arg(long)]
    pub no_save: bool,

    /// Seed for the random question order in `play` (env: QUIZ_SEED)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for log files (env: QUIZ_LOG_DIR, default: logs)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub quiz_file: PathBuf,
    pub save: bool,
    pub seed: Option<u64>,
    pub log_dir: PathBuf,
}

impl Config {
    /// Resolves `args` against the process environment.
    pub fn load(args: Args) -> Result<Self> {
        let quiz_file = match args.file {
            Some(path) => path,
            None => env_var("QUIZ_FILE")?
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_QUIZ_FILE)),
        };

        let log_dir = match args.log_dir {
            Some(path) => path,
            None => env_var("QUIZ_LOG_DIR")?
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
        };

        let seed = match args.seed {
            Some(seed) => Some(seed),
            None => env_var("QUIZ_SEED")?
                .map(|raw| {
                    raw.trim().parse::<u64>().map_err(|_| {
                        AppError::Cli(format!("QUIZ_SEED must be an unsigned integer, got {:?}", raw))
                    })
                })
                .transpose()?,
        };

        let config = Self {
            quiz_file,
            save: !args.no_save,
            seed,
            log_dir,
        };
        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }
}

/// Reads an optional environment variable. Unset is `None`; set but not
/// valid unicode is an error.
fn env_var(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

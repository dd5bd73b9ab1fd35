//! Command-line argument definitions.
//!
//! ```text
//! fast-fisher [--log-level L] [--threads N] [--chunk-size N] [--tolerance T] <COMMAND>
//!
//! fast-fisher exact <input.csv> [--alternative A] [--odds-ratios] [-o out.csv]
//! fast-fisher all   <input.csv> [-o out.csv]
//! ```

use crate::error::{CliError, Result};
use clap::{Parser, Subcommand};
use fast_fisher::config::{ExactConfig, DEFAULT_CHUNK_SIZE};
use fast_fisher::kernels::DEFAULT_TWO_SIDED_TOLERANCE;
use fast_fisher::Alternative;

/// Fisher's exact test for CSV files of 2x2 contingency tables.
#[derive(Parser, Debug)]
#[command(name = "fast-fisher")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log verbosity on stderr.
    #[arg(
        long,
        global = true,
        default_value = "warn",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log_level: String,

    /// Worker threads (0 = one per core).
    #[arg(long, global = true, default_value_t = 0)]
    pub threads: usize,

    /// Tables handed to a worker at a time.
    #[arg(long, global = true, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Relative tolerance for ties in the two-sided test.
    #[arg(long, global = true, default_value_t = DEFAULT_TWO_SIDED_TOLERANCE)]
    pub tolerance: f64,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "p-values under one alternative, optionally with odds ratios")]
    Exact {
        /// Input CSV with columns a, b, c, d
        input: String,

        /// less, greater or two-sided
        #[arg(short, long, default_value = "two-sided")]
        alternative: String,

        /// Also write the sample odds ratio of each table
        #[arg(long)]
        odds_ratios: bool,

        /// Output CSV path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    #[command(about = "p-values under all three alternatives")]
    All {
        /// Input CSV with columns a, b, c, d
        input: String,

        /// Output CSV path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    pub fn input_path(&self) -> &str {
        match &self.command {
            Command::Exact { input, .. } | Command::All { input, .. } => input,
        }
    }

    pub fn output_path(&self) -> Option<&str> {
        match &self.command {
            Command::Exact { output, .. } | Command::All { output, .. } => output.as_deref(),
        }
    }

    /// Builds and validates the engine configuration from the global flags.
    pub fn exact_config(&self) -> Result<ExactConfig> {
        let config = ExactConfig::new()
            .num_threads(self.threads)
            .chunk_size(self.chunk_size)
            .two_sided_tolerance(self.tolerance);
        config.validate().map_err(|err| match err {
            fast_fisher::Error::InvalidConfig { parameter, reason } => CliError::InvalidArgument {
                argument: parameter.replace('_', "-"),
                reason: reason.to_string(),
                suggestion: None,
            },
            other => other.into(),
        })?;
        Ok(config)
    }
}

/// Parses an alternative token.
pub fn parse_alternative(token: &str) -> Result<Alternative> {
    token
        .trim()
        .parse::<Alternative>()
        .map_err(|_| CliError::InvalidArgument {
            argument: "alternative".to_string(),
            reason: format!("unknown alternative '{token}'"),
            suggestion: Some("Use one of: less, greater, two-sided".to_string()),
        })
}

pub mod commands;
pub mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nwalign_bio::{GapPenalty, SubstitutionMatrix};
use nwalign_core::{load_config, Config, NwError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "nwalign",
    version = nwalign_core::VERSION,
    about = "Global pairwise alignment with affine gap penalties",
    long_about = "nwalign computes optimal Needleman-Wunsch alignments between sequences \
                  under a substitution matrix (BLOSUM62 by default) and an affine gap \
                  penalty, and ranks comparison targets by similarity to a reference."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (TOML); command-line flags take precedence
    #[arg(long, global = true, value_name = "FILE", env = "NWALIGN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Gap opening penalty (must be negative) [default: -10]
    #[arg(long, global = true, allow_negative_numbers = true, value_name = "SCORE")]
    pub gap_open: Option<f64>,

    /// Gap extension penalty (must be negative) [default: -1]
    #[arg(long, global = true, allow_negative_numbers = true, value_name = "SCORE")]
    pub gap_extend: Option<f64>,

    /// Substitution matrix: a bundled name or a path to a matrix table [default: BLOSUM62]
    #[arg(short, long, global = true, value_name = "NAME|FILE")]
    pub matrix: Option<String>,

    /// Output format (text, json)
    #[arg(long, global = true, value_name = "FORMAT")]
    pub format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Align two sequences and print the alignment
    Align(commands::align::AlignArgs),

    /// Align targets against a reference and order them by score
    Rank(commands::rank::RankArgs),

    /// Inspect a substitution matrix
    Matrix(commands::matrix::MatrixArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Effective parameters after merging the config file and flags.
pub struct Settings {
    pub matrix_name: String,
    pub matrix: SubstitutionMatrix,
    pub gaps: GapPenalty,
    pub format: OutputFormat,
}

impl Cli {
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(open) = self.gap_open {
            config.alignment.gap_open = open;
        }
        if let Some(extend) = self.gap_extend {
            config.alignment.gap_extend = extend;
        }
        if let Some(matrix) = &self.matrix {
            config.alignment.matrix = matrix.clone();
        }
        if let Some(format) = &self.format {
            config.output.format = format.to_lowercase();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        let config = self.resolve_config()?;

        let matrix = SubstitutionMatrix::resolve(&config.alignment.matrix).with_context(|| {
            format!("Failed to load substitution matrix '{}'", config.alignment.matrix)
        })?;
        let gaps = GapPenalty::new(config.alignment.gap_open, config.alignment.gap_extend)?;
        let format = config
            .output
            .format
            .parse::<OutputFormat>()
            .map_err(NwError::Configuration)?;

        tracing::debug!(
            "Using matrix {} with gap open {} / extend {}",
            config.alignment.matrix,
            gaps.open,
            gaps.extend
        );

        Ok(Settings {
            matrix_name: config.alignment.matrix,
            matrix,
            gaps,
            format,
        })
    }
}

//! CLI argument parsing using clap.
//!
//! This module defines the command-line interface for nexus,
//! including all subcommands and their arguments.

mod config;

pub use config::{
    AnalyzeCliConfig, CliConfigError, CointegrateCliConfig, JohansenCliConfig, ScreenCliConfig,
};

use crate::analysis::{Significance, DEFAULT_CRITICAL_VALUE};
use crate::types::PriceField;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// nexus - mean-reversion and cointegration statistics for price series
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Set the verbosity level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub verbose: String,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Descriptive statistics, Hurst, half-life, ADF and band signal for each file
    Analyze {
        /// Bar files (JSON arrays of bars)
        #[arg(long, required = true, num_args = 1..)]
        bars: Vec<PathBuf>,
        /// Price field: open, high, low or close
        #[arg(long, default_value = "close")]
        field: PriceField,
        /// Bollinger window
        #[arg(long, default_value_t = 20)]
        window: usize,
        /// Bollinger band width in standard deviations
        #[arg(long, default_value_t = 2.0)]
        num_std: f64,
        /// Lagged differences in the ADF regression
        #[arg(long, default_value_t = 1)]
        lag: usize,
        /// ADF significance level: 1%, 5% or 10%
        #[arg(long, default_value = "5%")]
        significance: Significance,
    },

    /// Pairwise cointegration test in both orderings
    Cointegrate {
        /// Bar file for the first leg
        #[arg(long)]
        left: PathBuf,
        /// Bar file for the second leg
        #[arg(long)]
        right: PathBuf,
        /// Price field: open, high, low or close
        #[arg(long, default_value = "close")]
        field: PriceField,
        /// Lagged differences in the ADF regression
        #[arg(long, default_value_t = 1)]
        lag: usize,
        /// ADF significance level: 1%, 5% or 10%
        #[arg(long, default_value = "5%")]
        significance: Significance,
    },

    /// Johansen trace test across two or more files
    Johansen {
        /// Bar files, one per series (at least two)
        #[arg(long, required = true, num_args = 1..)]
        bars: Vec<PathBuf>,
        /// Price field: open, high, low or close
        #[arg(long, default_value = "close")]
        field: PriceField,
        /// Lagged differences in the VECM
        #[arg(long, default_value_t = 1)]
        lag: usize,
        /// Trace critical value for the r = 0 decision
        #[arg(long, default_value_t = DEFAULT_CRITICAL_VALUE)]
        critical_value: f64,
    },

    /// Screen every pair of files for tradable cointegration
    Screen {
        /// Bar files; each file stem is used as the symbol
        #[arg(long, required = true, num_args = 1..)]
        bars: Vec<PathBuf>,
        /// Price field: open, high, low or close
        #[arg(long, default_value = "close")]
        field: PriceField,
        /// Screening config (JSON); defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file for the screened pairs (JSON)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

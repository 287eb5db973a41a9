//! Command-line argument parsing for tetrate
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::report::NumberFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tetrate - fractional tetration over arbitrary-precision complex numbers
#[derive(Parser, Debug)]
#[command(name = "tetrate")]
#[command(version)]
#[command(about = "Compute T_b(h) = b^b^...^b (h times) for complex b and h", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve T_b(h), e.g. `tetrate solve 0.5 1.5 2048`
    Solve {
        /// Complex base, e.g. "0.5", "2+1e-100i" or "(2 1e-100)"
        #[arg(value_name = "BASE", allow_hyphen_values = true)]
        base: String,

        /// Complex height
        #[arg(value_name = "HEIGHT", allow_hyphen_values = true)]
        height: String,

        /// Working precision in bits
        #[arg(value_name = "BITS")]
        bits: u32,

        /// Printed digits (default: derived from precision)
        #[arg(long)]
        digits: Option<usize>,

        /// Output format for the result
        #[arg(long, value_enum)]
        format: Option<NumberFormat>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute z^n with principal-branch semantics
    Pow {
        /// Complex base
        #[arg(long, default_value = "2+1e-100i", allow_hyphen_values = true)]
        base: String,

        /// Complex exponent
        #[arg(long, default_value = "2-1e-100i", allow_hyphen_values = true)]
        exp: String,

        /// Working precision in bits
        #[arg(long, default_value_t = 8192)]
        prec: u32,

        /// Printed digits (default: derived from precision)
        #[arg(long)]
        digits: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value = "sci")]
        out: NumberFormat,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Solve over evenly spaced heights FROM..=TO
    Sweep {
        /// Complex base
        #[arg(value_name = "BASE", allow_hyphen_values = true)]
        base: String,

        /// First height
        #[arg(value_name = "FROM", allow_hyphen_values = true)]
        from: String,

        /// Last height
        #[arg(value_name = "TO", allow_hyphen_values = true)]
        to: String,

        /// Number of intervals (STEPS + 1 heights)
        #[arg(value_name = "STEPS")]
        steps: usize,

        /// Working precision in bits
        #[arg(value_name = "BITS")]
        bits: u32,

        /// Printed digits per value
        #[arg(long)]
        digits: Option<usize>,

        /// Concurrent solves (default: from config, 0 = CPU count)
        #[arg(long)]
        parallel: Option<usize>,

        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default tracing filter for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "tetration=info",
            Verbosity::VeryVerbose => "tetration=debug",
        }
    }

    /// Check if should show progress bars
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show solver diagnostics
    pub fn show_diagnostics(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}

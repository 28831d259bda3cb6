//! Command-line interface for match-diff.
//!
//! ## Usage
//!
//! ```text
//! # Compare candidate results against reference results (min score 181)
//! match-diff allall_results/ cluster_results/
//!
//! # Lower the score threshold and print JSON
//! match-diff allall_results/ cluster_results/ --minscore 150 --format json
//! ```
//!
//! The run writes `missed.txt` into the candidate directory and
//! `hist-<candidate dir name>.svg` into `--plot-dir`.

use clap::Parser;

pub mod compare;

#[derive(Parser)]
#[command(name = "match-diff")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Compare two all-against-all match result directories")]
#[command(
    long_about = "match-diff compares a candidate set of pairwise match results against a reference set.\n\nBoth directories hold one sub-directory per genome with one (optionally gzipped) RefinedMatches file per paired genome. It reports:\n- Matches reported by both sets\n- Matches missed by the candidate (also written to missed.txt)\n- Extra matches reported only by the candidate\n- Extra matches that look like re-scored versions of missed ones"
)]
pub struct Cli {
    #[command(flatten)]
    pub compare: compare::CompareArgs,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

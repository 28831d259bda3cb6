use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::collection::{load_matches, LoaderConfig, DEFAULT_MIN_SCORE};
use crate::core::types::{GenomePairKey, Source};
use crate::matching::engine::{compare_collections, CompareError, ComparisonReport, ComparisonTotals};
use crate::matching::summary::MissedScoreStats;
use crate::report::histogram::write_histogram;
use crate::report::missed::write_missed_file;

#[derive(Args)]
pub struct CompareArgs {
    /// Directory with the reference (all-against-all) results
    #[arg(required = true)]
    pub reference_dir: PathBuf,

    /// Directory with the candidate results; missed.txt is written here
    #[arg(required = true)]
    pub candidate_dir: PathBuf,

    /// Minimum score for a match to be counted (inclusive)
    #[arg(short = 's', long = "minscore", default_value_t = DEFAULT_MIN_SCORE)]
    pub min_score: f64,

    /// Directory to write the missed-score histogram into
    #[arg(long, default_value = ".")]
    pub plot_dir: PathBuf,

    /// Do not write the missed-score histogram
    #[arg(long)]
    pub no_plot: bool,
}

/// Everything printed at the end of a run
#[derive(Debug, Serialize)]
struct RunSummary {
    dataset: String,
    totals: ComparisonTotals,
    percent_both: Option<f64>,
    percent_reference_only: Option<f64>,
    percent_candidate_only: Option<f64>,
    missed: Option<MissedScoreStats>,
    modifications: usize,
    duplicate_pairs: Vec<GenomePairKey>,
    missed_file: PathBuf,
    histogram_file: Option<PathBuf>,
}

/// Execute a comparison run
///
/// # Errors
///
/// Returns an error if either directory cannot be loaded, any match file fails
/// to parse, the two sides cover different genome pairs, or an output file
/// cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CompareArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = LoaderConfig::new(args.min_score);

    let candidate = load_matches(&args.candidate_dir, Source::Candidate, &config)
        .with_context(|| format!("Loading candidate results from {}", args.candidate_dir.display()))?;

    // Only genome pairs the candidate reports are read from the reference
    let reference_config = config.clone().with_allowed_pairs(candidate.key_set());
    let reference = load_matches(&args.reference_dir, Source::Reference, &reference_config)
        .with_context(|| format!("Loading reference results from {}", args.reference_dir.display()))?;

    if verbose {
        eprintln!(
            "Reference: {} genome pairs, {} matches",
            reference.len(),
            reference.record_count()
        );
        eprintln!(
            "Candidate: {} genome pairs, {} matches",
            candidate.len(),
            candidate.record_count()
        );
    }

    let report = match compare_collections(&reference, &candidate) {
        Ok(report) => report,
        Err(err) => {
            print_key_mismatch(&err);
            return Err(err.into());
        }
    };

    if verbose {
        log_differences(&report);
    }

    let dataset = dataset_name(&args.candidate_dir);
    let missed_file = write_missed_file(&args.candidate_dir, &dataset, &report)?;

    let missed_scores = report.missed_scores();
    debug!(scores = ?missed_scores.descending(), "Missed scores");
    let histogram_file = if args.no_plot {
        None
    } else {
        write_histogram(&args.plot_dir, &dataset, &missed_scores)?
    };

    let summary = RunSummary {
        dataset,
        totals: report.totals,
        percent_both: report.totals.percent_both(),
        percent_reference_only: report.totals.percent_reference_only(),
        percent_candidate_only: report.totals.percent_candidate_only(),
        missed: missed_scores.stats(),
        modifications: report.modification_count(),
        duplicate_pairs: report.duplicate_pairs().into_iter().cloned().collect(),
        missed_file,
        histogram_file,
    };

    match format {
        OutputFormat::Text => print_text_summary(&summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => print_tsv_summary(&summary),
    }

    Ok(())
}

/// Base name of the candidate directory, used to label output rows and files
fn dataset_name(dir: &Path) -> String {
    dir.file_name()
        .map(ToOwned::to_owned)
        .or_else(|| {
            dir.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(ToOwned::to_owned))
        })
        .map_or_else(|| "dataset".to_string(), |n| n.to_string_lossy().to_string())
}

fn print_key_mismatch(err: &CompareError) {
    let CompareError::KeySetMismatch {
        reference_count,
        candidate_count,
        symmetric_difference,
        reference_only,
        candidate_only,
    } = err;

    eprintln!("Genome pairs: {reference_count} in reference, {candidate_count} in candidate");
    for key in reference_only {
        eprintln!("  only in reference: {key}");
    }
    for key in candidate_only {
        eprintln!("  only in candidate: {key}");
    }
    eprintln!("  {} pairs differ", symmetric_difference.len());
}

fn log_differences(report: &ComparisonReport) {
    for pair in &report.pairs {
        if !pair.extra.is_empty() {
            debug!(pair = %pair.key, records = ?pair.extra, "Additional in candidate");
        }
        if !pair.missed.is_empty() {
            debug!(pair = %pair.key, records = ?pair.missed, "Additional in reference");
        }
    }
}

fn format_percent(percent: Option<f64>) -> String {
    percent.map_or_else(|| "n/a".to_string(), |p| format!("{p:.5}%"))
}

fn print_text_summary(summary: &RunSummary) {
    let totals = &summary.totals;

    println!(
        "Reported by both: {} ({})",
        totals.reported_by_both,
        format_percent(summary.percent_both)
    );
    println!(
        "Reported by reference only: {} ({})",
        totals.reference_only,
        format_percent(summary.percent_reference_only)
    );
    println!(
        "Reported by candidate only: {} ({})",
        totals.candidate_only,
        format_percent(summary.percent_candidate_only)
    );
    println!("Total reported significands: {}", totals.total_in_candidate);
    println!("Total in reference: {}", totals.total_in_reference);
    println!("Total in candidate: {}", totals.total_in_candidate);

    match &summary.missed {
        Some(stats) => {
            println!("Average missed score: {}", stats.average);
            println!("Median missed score: {}", stats.median);
        }
        None => println!("No missed matches to summarize"),
    }

    if summary.modifications > 0 {
        println!(
            "Candidate-only matches with a modified reference counterpart: {}",
            summary.modifications
        );
    }
    if !summary.duplicate_pairs.is_empty() {
        println!(
            "Warning: duplicate matches in {} genome pairs (counted once)",
            summary.duplicate_pairs.len()
        );
    }

    println!("Missed matches written to {}", summary.missed_file.display());
    if let Some(path) = &summary.histogram_file {
        println!("Histogram written to {}", path.display());
    }
}

fn print_tsv_summary(summary: &RunSummary) {
    let totals = &summary.totals;
    let stat = |f: fn(&MissedScoreStats) -> u64| {
        summary
            .missed
            .as_ref()
            .map_or_else(String::new, |s| f(s).to_string())
    };

    println!(
        "dataset\treported_by_both\treference_only\tcandidate_only\ttotal_in_reference\ttotal_in_candidate\taverage_missed_score\tmedian_missed_score"
    );
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        summary.dataset,
        totals.reported_by_both,
        totals.reference_only,
        totals.candidate_only,
        totals.total_in_reference,
        totals.total_in_candidate,
        stat(|s| s.average),
        stat(|s| s.median),
    );
}

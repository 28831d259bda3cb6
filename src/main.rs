use clap::Parser;
use tracing_subscriber::EnvFilter;

use match_diff::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("match_diff=debug,info")
    } else {
        EnvFilter::new("match_diff=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    cli::compare::run(cli.compare, cli.format, cli.verbose)
}

//! nuget-tree - NuGet dependency tree CLI tool
//!
//! Reads a solution file, resolves every project's package references
//! against a NuGet v3 feed and prints the selected reports to stdout.
//! Logs and warnings go to stderr.

use nuget_tree::cli::CliArgs;
use nuget_tree::diagnostics::TracingSink;
use nuget_tree::error::AppError;
use nuget_tree::manifest::XmlProjectReader;
use nuget_tree::orchestrator::SolutionProcessor;
use nuget_tree::output::ReportWriter;
use nuget_tree::resolve::RegistryProjectReader;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::fmt;

/// Exit status for invalid invocations
const USAGE_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse_args();

    fmt()
        .with_max_level(args.log_level())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    if !args.color() {
        colored::control::set_override(false);
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            let usage = e
                .downcast_ref::<AppError>()
                .is_some_and(AppError::is_usage_error);
            if usage {
                ExitCode::from(USAGE_ERROR)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    let (solution, formats) = args.validate().map_err(AppError::from)?;

    if args.verbose {
        eprintln!("nuget-tree v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Solution: {}", solution.display());
        eprintln!("Source: {}", args.source);
    }

    let registry = args.registry_config().build().map_err(AppError::from)?;
    let reader = RegistryProjectReader::new(
        XmlProjectReader::new(),
        Arc::new(registry),
        Arc::new(TracingSink),
    )
    .with_config(args.resolver_config());

    let processor = SolutionProcessor::new(reader, ReportWriter::with_color(args.color()))
        .with_progress(args.show_progress());

    let mut stdout = io::stdout().lock();
    processor.process(&solution, &formats, &mut stdout).await?;
    Ok(())
}

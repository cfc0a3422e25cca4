use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use guest_session_report::cli::{Args, session_prompt};
use guest_session_report::constants::DEFAULT_OUTPUT_NAME;
use guest_session_report::{DateRange, ReportPipeline, ReportWriter, SessionLog};
use std::io::{self, Write};
use std::process;
use tracing::debug;

fn main() {
    let args = Args::parse();

    setup_logging(&args);

    if let Err(error) = run(&args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Set up structured logging on stderr
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directives()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

fn run(args: &Args) -> Result<()> {
    let config = args.to_config()?;
    let bounds = args.date_bounds()?;

    println!(
        "{} {}",
        "Loading connection log:".bright_cyan(),
        args.input.display()
    );
    let log = SessionLog::from_csv(&args.input, &config.columns)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    println!("  {} {}", "Rows loaded:".bright_cyan(), log.len());

    let pipeline = ReportPipeline::new(config.clone());
    let writer = ReportWriter::new(&args.output_dir, config);

    if let Some((start, end)) = bounds {
        let range = DateRange::parse(start, end)?;
        let name = args.output.as_deref().unwrap_or(DEFAULT_OUTPUT_NAME);
        return generate(&pipeline, &writer, &log, &range, name);
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    loop {
        println!();
        let range = session_prompt::prompt_date_range(&mut input, &mut output)?;
        let name = match &args.output {
            Some(name) => name.clone(),
            None => session_prompt::prompt_output_name(&mut input, &mut output)?,
        };

        generate(&pipeline, &writer, &log, &range, &name)?;

        if !session_prompt::prompt_run_again(&mut input, &mut output)? {
            break;
        }
    }

    output.flush()?;
    Ok(())
}

/// Run one report and write both tables
fn generate(
    pipeline: &ReportPipeline,
    writer: &ReportWriter,
    log: &SessionLog,
    range: &DateRange,
    name: &str,
) -> Result<()> {
    println!(
        "\n{} {} to {}",
        "Generating report for".bright_yellow(),
        range.start(),
        range.end()
    );

    let report = pipeline.run(log.rows(), range);
    let written = writer
        .write(&report, name)
        .context("Failed to write report tables")?;

    let stats = report.stats();
    println!("\n{}", "Report Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Sessions in range:".bright_cyan(),
        stats.in_scope
    );
    println!(
        "  {} {}",
        "Valid clients:".bright_cyan(),
        stats.clients.to_string().bright_green()
    );
    println!(
        "  {} {}",
        "Rejected records:".bright_cyan(),
        stats.rejected_rows.to_string().bright_red()
    );
    println!(
        "  {} {:.1}%",
        "Acceptance rate:".bright_cyan(),
        stats.acceptance_rate()
    );
    println!(
        "  {} {}",
        "Validated table:".bright_cyan(),
        written.validated_path.display()
    );
    println!(
        "  {} {}",
        "Rejected table:".bright_cyan(),
        written.rejected_path.display()
    );

    Ok(())
}

//! Command-line interface components.

use crate::config::{CompressionAlgorithm, OutputFormat, ReportConfig};
use crate::constants::DEFAULT_INPUT_FILE;
use crate::error::{ReportError, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "guest-report")]
#[command(about = "Validate guest connection sessions and aggregate traffic per client for a date range")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Path to the connection log CSV
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,

    /// First day of the report (YYYY-MM-DD). Prompted for when omitted
    #[arg(long)]
    pub start: Option<String>,

    /// Last day of the report, inclusive (YYYY-MM-DD). Prompted for when omitted
    #[arg(long)]
    pub end: Option<String>,

    /// Base name of the output tables
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory the output tables are written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Output format (csv, parquet)
    #[arg(long, default_value = "csv")]
    pub format: String,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Username whose sessions are counted
    #[arg(long)]
    pub guest_login: Option<String>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Default `EnvFilter` directives: the library and the binary log at the
    /// same level
    pub fn log_directives(&self) -> String {
        let level = self.get_log_level();
        format!("guest_session_report={level},guest_report={level}")
    }

    /// Both range bounds when given on the command line.
    ///
    /// Giving only one of them is an error since the other would have to be
    /// prompted for in a run that is otherwise non-interactive.
    pub fn date_bounds(&self) -> Result<Option<(&str, &str)>> {
        match (self.start.as_deref(), self.end.as_deref()) {
            (Some(start), Some(end)) => Ok(Some((start, end))),
            (None, None) => Ok(None),
            _ => Err(ReportError::Configuration {
                message: "--start and --end must be given together".to_string(),
            }),
        }
    }

    /// Build the report configuration from the parsed flags
    pub fn to_config(&self) -> Result<ReportConfig> {
        let output_format = match self.format.to_lowercase().as_str() {
            "csv" => OutputFormat::Csv,
            "parquet" => OutputFormat::Parquet,
            other => {
                return Err(ReportError::Configuration {
                    message: format!("Unknown output format '{}' (expected csv or parquet)", other),
                });
            }
        };

        let compression = match self.compression.to_lowercase().as_str() {
            "snappy" => CompressionAlgorithm::Snappy,
            "zstd" => CompressionAlgorithm::Zstd,
            "lz4" => CompressionAlgorithm::Lz4,
            "none" | "uncompressed" => CompressionAlgorithm::Uncompressed,
            other => {
                return Err(ReportError::Configuration {
                    message: format!(
                        "Unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                        other
                    ),
                });
            }
        };

        let mut config = ReportConfig::default()
            .with_output_format(output_format)
            .with_compression(compression);

        if let Some(login) = &self.guest_login {
            config = config.with_guest_login(login.clone());
        }
        if self.no_progress {
            config = config.without_progress();
        }

        Ok(config)
    }
}

/// Interactive prompts for the report loop
pub mod session_prompt {
    use crate::constants::DEFAULT_OUTPUT_NAME;
    use crate::pipeline::DateRange;
    use crate::pipeline::date_range::parse_day;
    use anyhow::{Context, Result};
    use chrono::NaiveDate;
    use colored::*;
    use std::io::{BufRead, Write};

    /// Read one trimmed line, failing once the input is exhausted
    fn read_answer<R: BufRead>(input: &mut R) -> Result<String> {
        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Failed to read user input")?;
        if read == 0 {
            anyhow::bail!("Input closed before an answer was given");
        }
        Ok(line.trim().to_string())
    }

    fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> Result<String> {
        write!(output, "{}", message.bright_white())?;
        output.flush().context("Failed to flush stdout")?;
        read_answer(input)
    }

    /// Ask for a day until the answer is a `YYYY-MM-DD` calendar date
    pub fn prompt_date<R: BufRead, W: Write>(
        input: &mut R,
        output: &mut W,
        message: &str,
    ) -> Result<NaiveDate> {
        loop {
            let answer = ask(input, output, message)?;
            match parse_day(&answer) {
                Ok(day) => return Ok(day),
                Err(_) => writeln!(
                    output,
                    "{}",
                    "Invalid date. Use YYYY-MM-DD with a year from 2019 to 2023.".bright_red()
                )?,
            }
        }
    }

    /// Ask for both bounds, starting over while start is after end
    pub fn prompt_date_range<R: BufRead, W: Write>(
        input: &mut R,
        output: &mut W,
    ) -> Result<DateRange> {
        loop {
            let start = prompt_date(input, output, "Start date (YYYY-MM-DD): ")?;
            let end = prompt_date(input, output, "End date (YYYY-MM-DD): ")?;

            match DateRange::new(start, end) {
                Ok(range) => return Ok(range),
                Err(_) => writeln!(
                    output,
                    "{}",
                    "The start date cannot be after the end date.".bright_red()
                )?,
            }
        }
    }

    /// Base name for the output tables; empty falls back to the default name
    pub fn prompt_output_name<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
        let message = format!("Output file name [{}]: ", DEFAULT_OUTPUT_NAME);
        let answer = ask(input, output, &message)?;
        if answer.is_empty() {
            Ok(DEFAULT_OUTPUT_NAME.to_string())
        } else {
            Ok(answer)
        }
    }

    /// Whether to produce another report. Only `n` or `no` stops the loop.
    pub fn prompt_run_again<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
        let answer = ask(input, output, "Generate another report? [Y/n]: ")?;
        Ok(!matches!(answer.to_lowercase().as_str(), "n" | "no"))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Cursor;

        fn answers(text: &str) -> Cursor<Vec<u8>> {
            Cursor::new(text.as_bytes().to_vec())
        }

        #[test]
        fn test_prompt_date_retries_until_valid() {
            let mut input = answers("yesterday\n2024-01-01\n2021-02-30\n2021-02-28\n");
            let mut output = Vec::new();

            let day = prompt_date(&mut input, &mut output, "Start: ").unwrap();
            assert_eq!(day, NaiveDate::from_ymd_opt(2021, 2, 28).unwrap());

            let printed = String::from_utf8(output).unwrap();
            assert_eq!(printed.matches("Invalid date").count(), 3);
        }

        #[test]
        fn test_prompt_date_range_restarts_on_reversed_bounds() {
            let mut input = answers("2021-03-10\n2021-03-01\n2021-03-01\n2021-03-10\n");
            let mut output = Vec::new();

            let range = prompt_date_range(&mut input, &mut output).unwrap();
            assert_eq!(range.start(), NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
            assert_eq!(range.end(), NaiveDate::from_ymd_opt(2021, 3, 10).unwrap());

            let printed = String::from_utf8(output).unwrap();
            assert!(printed.contains("cannot be after"));
        }

        #[test]
        fn test_prompt_date_fails_when_input_closes() {
            let mut input = answers("not a date\n");
            let mut output = Vec::new();
            assert!(prompt_date(&mut input, &mut output, "Start: ").is_err());
        }

        #[test]
        fn test_prompt_output_name() {
            let mut output = Vec::new();
            assert_eq!(
                prompt_output_name(&mut answers("  march  \n"), &mut output).unwrap(),
                "march"
            );
            assert_eq!(
                prompt_output_name(&mut answers("\n"), &mut output).unwrap(),
                DEFAULT_OUTPUT_NAME
            );
        }

        #[test]
        fn test_prompt_run_again() {
            let mut output = Vec::new();
            assert!(!prompt_run_again(&mut answers("n\n"), &mut output).unwrap());
            assert!(!prompt_run_again(&mut answers("No\n"), &mut output).unwrap());
            assert!(prompt_run_again(&mut answers("y\n"), &mut output).unwrap());
            assert!(prompt_run_again(&mut answers("\n"), &mut output).unwrap());
            assert!(prompt_run_again(&mut answers("maybe\n"), &mut output).unwrap());
        }
    }
}

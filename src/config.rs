use crate::library::DateRange;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

const DEFAULT_INPUT_PATH: &str = "My Clippings.txt";
const DEFAULT_OUTPUT_DIR: &str = ".";

#[derive(Parser, Debug)]
#[command(name = "kindle-clippings")]
#[command(about = "Convert Kindle clippings into one Markdown note per book")]
pub struct CliArgs {
    /// Clippings file, or a directory to search for "My Clippings.txt"
    pub input: Option<String>,

    /// Directory the Markdown files are written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Only keep highlights added on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Only keep highlights added on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub date_range: Option<DateRange>,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    InvalidDateFormat(String),
    InvalidDateRange,
    MissingFromDate,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidDateFormat(s) => {
                write!(f, "Invalid date format: '{}'. Expected YYYY-MM-DD", s)
            }
            ConfigError::InvalidDateRange => {
                write!(f, "Invalid date range: --from must be before or equal to --to")
            }
            ConfigError::MissingFromDate => {
                write!(f, "Use --from together with --to")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let cli = CliArgs::parse();
        Self::from_args(cli, |key| std::env::var(key).ok())
    }

    fn from_args(cli: CliArgs, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let date_range = resolve_dates(&cli)?;

        let input_path = cli
            .input
            .or_else(|| env("CLIPPINGS_PATH"))
            .unwrap_or_else(|| DEFAULT_INPUT_PATH.to_string());

        let output_dir = cli
            .output_dir
            .or_else(|| env("OUTPUT_DIR"))
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

        Ok(Config {
            input_path: PathBuf::from(input_path),
            output_dir: PathBuf::from(output_dir),
            date_range,
        })
    }
}

fn resolve_dates(cli: &CliArgs) -> Result<Option<DateRange>, ConfigError> {
    let Some(ref from_str) = cli.from else {
        if cli.to.is_some() {
            return Err(ConfigError::MissingFromDate);
        }
        return Ok(None);
    };

    let from = parse_date(from_str)?;
    let to = cli.to.as_deref().map(parse_date).transpose()?;

    if to.is_some_and(|to| from > to) {
        return Err(ConfigError::InvalidDateRange);
    }

    Ok(Some(DateRange { from, to }))
}

fn parse_date(s: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidDateFormat(s.to_string()))
}

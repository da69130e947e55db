use crate::cache::DEFAULT_TTL;
use crate::chart::DEFAULT_WIDTH;
use crate::types::DeltaPolicy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_FILE: &str = "data/monthly-costs-2024.csv";
pub const DATA_ENV: &str = "COST_DASHBOARD_DATA";

#[derive(Parser, Debug)]
#[command(author, version, about = "Per-user compute cost dashboard", long_about = None)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the dashboard once for the given selection.
    Show(ShowArgs),
    /// Menu-driven dashboard; every change re-renders.
    Interactive(DataArgs),
    /// Date slider demo.
    Slider(SliderArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Monthly cost export (CSV, one column per month).
    #[arg(long, env = DATA_ENV, default_value = DEFAULT_DATA_FILE)]
    pub data: PathBuf,

    /// Seconds before the loaded table is read again.
    #[arg(long, default_value_t = DEFAULT_TTL.as_secs())]
    pub cache_ttl_secs: u64,

    /// Users selected when none are given.
    #[arg(long = "default-user", value_delimiter = ',')]
    pub default_users: Vec<String>,

    /// Flag cost increases instead of decreases.
    #[arg(long)]
    pub invert_delta: bool,

    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub chart_width: usize,
}

impl DataArgs {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn delta_policy(&self) -> DeltaPolicy {
        if self.invert_delta {
            DeltaPolicy::IncreaseIsBad
        } else {
            DeltaPolicy::IncreaseIsGood
        }
    }
}

impl Default for DataArgs {
    fn default() -> Self {
        Self {
            data: std::env::var_os(DATA_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            default_users: Vec::new(),
            invert_delta: false,
            chart_width: DEFAULT_WIDTH,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ShowArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// First month of the range (defaults to the earliest month).
    #[arg(long)]
    pub from: Option<u32>,

    /// Last month of the range (defaults to the latest month).
    #[arg(long)]
    pub to: Option<u32>,

    /// Users to show, comma separated or repeated.
    #[arg(long = "user", value_delimiter = ',')]
    pub users: Vec<String>,

    /// Write the filtered view and metrics here.
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SliderArgs {
    /// Date to select, `YYYY-MM-DD`.
    #[arg(long)]
    pub value: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub step_days: i64,

    /// Display format, `YYYY`, `MM` and `DD` tokens.
    #[arg(long, default_value = "YYYY-MM")]
    pub format: String,
}

//! CLI command definitions.

use clap::{Args, Parser, Subcommand};

/// Store an authored event goes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreArg {
    /// CSV files: singular events to `singular-events.csv`, annual ones to `events.csv`
    #[default]
    Standard,
    /// The `SQLite` database
    Sqlite,
}

/// today - Shows events from history and annual observances.
#[derive(Debug, Parser)]
#[command(name = "today")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run; today's events when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List registered event providers
    Providers,

    /// List events for a date, optionally narrowed by category and provider
    Events(EventsArgs),

    /// Add an event to a CSV file or the database
    Add(AddArgs),

    /// List rule-based observances and when they fall
    Rules(RulesArgs),
}

/// Arguments of `today events`.
#[derive(Debug, Clone, Args)]
pub struct EventsArgs {
    /// Date in MM-DD form (default: today)
    #[arg(short = 'd', long = "date")]
    pub date: Option<String>,

    /// Category, `primary` or `primary/secondary`
    #[arg(short = 'c', long = "category")]
    pub category: Option<String>,

    /// Provider identifier; `standard` queries every provider
    #[arg(short = 'p', long = "provider", default_value = "standard")]
    pub provider: String,
}

impl Default for EventsArgs {
    fn default() -> Self {
        Self {
            date: None,
            category: None,
            provider: "standard".to_string(),
        }
    }
}

/// Arguments of `today add`.
#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// YYYY-MM-DD for a singular event, MM-DD for an annual one
    #[arg(short = 'd', long = "date")]
    pub date: String,

    /// Event description
    #[arg(short = 'D', long = "description")]
    pub description: String,

    /// Category, `primary` or `primary/secondary`
    #[arg(short = 'c', long = "category")]
    pub category: String,

    /// Where to store the event
    #[arg(short = 'p', long = "provider", value_enum, default_value_t = StoreArg::Standard)]
    pub provider: StoreArg,
}

/// Arguments of `today rules`.
#[derive(Debug, Clone, Default, Args)]
pub struct RulesArgs {
    /// Year to resolve the rules in (default: this year)
    #[arg(long)]
    pub year: Option<i32>,
}

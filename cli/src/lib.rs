//! # today
//!
//! Command-line front end of the event engine: reads configuration from the
//! environment, registers the local and remote providers and prints events
//! for a date.
//!
//! [`execute`] returns the text a command prints so commands can be tested
//! against temporary data directories; the binary only prints it.

use anyhow::{Context as _, bail};
use chrono::Datelike;
use today_core::factory::make_event;
use today_core::file::CsvEventProvider;
use today_core::filter::{CategoryFilter, EventFilter};
use today_core::{Category, Event, MonthDay};

pub mod bootstrap;
pub mod commands;
pub mod config;
pub mod output;

pub use bootstrap::{App, bootstrap};
pub use commands::{AddArgs, Cli, Commands, EventsArgs, RulesArgs, StoreArg};
pub use config::{ConfigError, TodayConfig};

/// Provider name that selects every registered provider.
pub const ALL_PROVIDERS: &str = bootstrap::STANDARD;

/// Run `command` against `app` and return what it prints.
///
/// No command means `events` for today from every provider.
///
/// # Errors
///
/// Returns error for malformed dates or categories, an unknown provider, or
/// an event that cannot be stored.
pub async fn execute(app: &App, command: Option<Commands>) -> anyhow::Result<String> {
    match command.unwrap_or_else(|| Commands::Events(EventsArgs::default())) {
        Commands::Providers => Ok(output::render_providers(&app.manager)),
        Commands::Events(args) => events(app, &args).await,
        Commands::Add(args) => add(app, &args).await,
        Commands::Rules(args) => rules(app, &args).await,
    }
}

async fn events(app: &App, args: &EventsArgs) -> anyhow::Result<String> {
    let today = app.clock.today();
    let month_day = match &args.date {
        Some(text) => MonthDay::parse(text)?,
        None => MonthDay::from_date(today),
    };
    let category = args.category.as_deref().map(Category::parse).transpose()?;

    let found = if args.provider.eq_ignore_ascii_case(ALL_PROVIDERS) {
        app.manager.events_of_date(month_day).await
    } else {
        let Some(provider) = app.manager.provider(&args.provider) else {
            bail!("No event provider found with identifier: {}", args.provider);
        };
        provider.events_of_date(month_day).await
    };

    let found = match category {
        Some(category) => {
            let filter = CategoryFilter::new(category);
            found.into_iter().filter(|event| filter.accepts(event)).collect()
        }
        None => found,
    };

    tracing::debug!(date = %month_day, provider = %args.provider, events = found.len(), "Events collected");
    Ok(output::render_events(found, today.year()))
}

async fn add(app: &App, args: &AddArgs) -> anyhow::Result<String> {
    let event = make_event(&args.date, &args.description, &args.category)?;

    match args.provider {
        StoreArg::Sqlite => {
            let Some(database) = &app.sqlite else {
                bail!("Failed to add event to SQLite database.");
            };
            database
                .try_add_event(&event)
                .await
                .context("Failed to add event to SQLite database.")?;
            Ok(format!("Event added to SQLite database: {event}\n"))
        }
        StoreArg::Standard => {
            let path = match event {
                Event::Singular(_) => app.config.singular_csv(),
                _ => app.config.events_csv(),
            };
            CsvEventProvider::append_record(&path, &event)
                .await
                .with_context(|| format!("Failed to add event to {}", path.display()))?;
            Ok(format!("Event added to {}: {event}\n", path.display()))
        }
    }
}

async fn rules(app: &App, args: &RulesArgs) -> anyhow::Result<String> {
    let today = app.clock.today();
    let year = args.year.unwrap_or_else(|| today.year());

    let events = match app.manager.provider(bootstrap::RULES) {
        Some(provider) => provider.events().await,
        None => bootstrap::builtin_rule_events()?,
    };
    Ok(output::render_rules(&events, year, today))
}

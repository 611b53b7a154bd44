//! Data directory setup and provider registration.

use crate::config::TodayConfig;
use anyhow::Context as _;
use std::path::Path;
use std::sync::Arc;
use today_core::environment::Clock;
use today_core::factory::make_rule_event;
use today_core::file::CsvEventProvider;
use today_core::memory::StaticEventProvider;
use today_core::{Event, EventManager, Result};
use today_remote::RemoteEventProvider;
use today_sqlite::SqliteEventProvider;

/// Identifier of the annual events CSV provider.
pub const STANDARD: &str = "standard";
/// Identifier of the singular events CSV provider.
pub const SINGULAR: &str = "singular";
/// Identifier of the built-in rule-based observances.
pub const RULES: &str = "rules";

/// Everything a command needs.
pub struct App {
    /// Loaded configuration
    pub config: TodayConfig,
    /// Registered providers
    pub manager: EventManager,
    /// Database provider, `None` if the database could not be opened
    pub sqlite: Option<SqliteEventProvider>,
    /// Source of "today"
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("manager", &self.manager)
            .field("sqlite", &self.sqlite.is_some())
            .finish_non_exhaustive()
    }
}

/// The observances every installation knows about.
///
/// # Errors
///
/// Never in practice; the rules are fixed.
pub fn builtin_rule_events() -> Result<Vec<Event>> {
    Ok(vec![
        make_rule_event("fourth thursday in november", "Thanksgiving (U.S.A.)", "usa/holiday")?,
        make_rule_event("second sunday in may", "Äitienpäivä (Suomi)", "finland/flagday")?,
    ])
}

/// Prepare the data directory and register every provider.
///
/// The CSV files are created empty if missing, and the database is created
/// and migrated. A database that cannot be opened is logged and left out;
/// so is a remote server URL that does not parse.
///
/// # Errors
///
/// Returns error if the data directory or the CSV files cannot be created.
pub async fn bootstrap(config: TodayConfig, clock: Arc<dyn Clock>) -> anyhow::Result<App> {
    tokio::fs::create_dir_all(config.home())
        .await
        .with_context(|| format!("Unable to create data directory {}", config.home().display()))?;
    touch(&config.events_csv()).await?;
    touch(&config.singular_csv()).await?;

    let mut manager = EventManager::new();

    let standard = Arc::new(
        CsvEventProvider::open_with_clock(config.events_csv(), STANDARD, Arc::clone(&clock)).await,
    );
    manager.add_event_provider(standard.clone());
    if let Err(e) = manager.try_add_event_provider(standard) {
        eprintln!("{e}");
    }

    manager.add_event_provider(Arc::new(
        CsvEventProvider::open_with_clock(config.singular_csv(), SINGULAR, Arc::clone(&clock)).await,
    ));

    let sqlite = open_database(&config.sqlite_path()).await;
    if let Some(provider) = &sqlite {
        manager.add_event_provider(Arc::new(provider.clone()));
    }

    manager.add_event_provider(Arc::new(StaticEventProvider::with_clock(
        RULES,
        builtin_rule_events()?,
        Arc::clone(&clock),
    )));

    if let Some(url) = &config.server_url {
        match RemoteEventProvider::with_clock(url, Arc::clone(&clock)) {
            Ok(provider) => {
                manager.add_event_provider(Arc::new(provider));
            }
            Err(e) => eprintln!("Error creating web event provider: {e}"),
        }
    }

    tracing::debug!(providers = manager.len(), home = %config.home().display(), "Bootstrap complete");
    Ok(App {
        config,
        manager,
        sqlite,
        clock,
    })
}

async fn touch(path: &Path) -> anyhow::Result<()> {
    tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("Unable to create events file {}", path.display()))?;
    Ok(())
}

async fn open_database(path: &Path) -> Option<SqliteEventProvider> {
    let opened = match SqliteEventProvider::open(path).await {
        Ok(provider) => provider,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Database unavailable");
            return None;
        }
    };
    if let Err(e) = opened.migrate().await {
        tracing::warn!(path = %path.display(), error = %e, "Database unavailable");
        return None;
    }
    Some(opened)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use today_testing::test_clock_at;

    fn config(home: &Path) -> TodayConfig {
        TodayConfig {
            home: home.join("data"),
            server_url: None,
            log_level: "warn".to_string(),
        }
    }

    #[tokio::test]
    async fn creates_files_and_registers_local_providers() {
        let dir = tempfile::tempdir().unwrap();
        let app = bootstrap(config(dir.path()), test_clock_at(2024, 11, 28)).await.unwrap();

        assert!(app.config.events_csv().exists());
        assert!(app.config.singular_csv().exists());
        assert!(app.config.sqlite_path().exists());
        assert!(app.sqlite.is_some());

        let identifiers: Vec<&str> = app.manager.providers().iter().map(|p| p.identifier()).collect();
        assert_eq!(identifiers, vec!["standard", "singular", "sqlite", "rules"]);
    }

    #[tokio::test]
    async fn registers_web_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.server_url = Some("http://127.0.0.1:1/".to_string());

        let app = bootstrap(config, test_clock_at(2024, 11, 28)).await.unwrap();
        assert_eq!(app.manager.len(), 5);
        assert!(app.manager.provider("WEB").is_some());
    }

    #[tokio::test]
    async fn existing_files_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::create_dir_all(config.home()).unwrap();
        std::fs::write(config.events_csv(), "--12-24,Christmas Eve,holiday\n").unwrap();

        let app = bootstrap(config, test_clock_at(2024, 12, 24)).await.unwrap();
        let standard = app.manager.provider(STANDARD).unwrap();
        assert_eq!(standard.events().await.len(), 1);
    }

    #[tokio::test]
    async fn rules_provider_resolves_in_clock_year() {
        let dir = tempfile::tempdir().unwrap();
        let app = bootstrap(config(dir.path()), test_clock_at(2024, 11, 28)).await.unwrap();
        let found = app
            .manager
            .events_of_date(today_core::MonthDay::new(11, 28).unwrap())
            .await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description(), "Thanksgiving (U.S.A.)");
    }
}

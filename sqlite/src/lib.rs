//! `SQLite` event provider for the today event browser.
//!
//! Unlike the CSV provider, nothing is loaded up front: every query is a
//! read against the database, and each row goes through the same date
//! classification as a CSV record. A failed query is logged and answered
//! with an empty list.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE events (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     event_date TEXT NOT NULL,          -- YYYY-MM-DD or --MM-DD
//!     description TEXT NOT NULL,
//!     category_primary TEXT NOT NULL,
//!     category_secondary TEXT
//! );
//! ```
//!
//! # Example
//!
//! ```ignore
//! use today_sqlite::SqliteEventProvider;
//!
//! let provider = SqliteEventProvider::open("/home/me/.today/events.sqlite3").await?;
//! provider.migrate().await?;
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use today_core::factory::{make_event_with_category, storage_date};
use today_core::provider::{EventProvider, ProviderFuture};
use today_core::{Category, Event, EventError, MonthDay, Result};

/// Identifier the provider registers under unless told otherwise.
pub const DEFAULT_IDENTIFIER: &str = "sqlite";

const SELECT_EVENTS: &str = r"
    SELECT event_date, description, category_primary, category_secondary
    FROM events
";

/// An [`EventProvider`] querying a `SQLite` database on every call.
#[derive(Clone, Debug)]
pub struct SqliteEventProvider {
    pool: SqlitePool,
    identifier: String,
}

impl SqliteEventProvider {
    /// Create a provider using an existing connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            identifier: DEFAULT_IDENTIFIER.to_string(),
        }
    }

    /// Open the database file at `path`, creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::SourceUnavailable`] if the database cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| EventError::SourceUnavailable(format!("Failed to open database: {e}")))?;

        Ok(Self::new(pool))
    }

    /// Connect to a database URL such as `sqlite::memory:`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::SourceUnavailable`] if the URL is invalid or the
    /// connection fails.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| EventError::SourceUnavailable(format!("Invalid database URL: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| EventError::SourceUnavailable(format!("Failed to connect: {e}")))?;

        Ok(Self::new(pool))
    }

    /// Register under `identifier` instead of [`DEFAULT_IDENTIFIER`].
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Create the `events` table if it doesn't already exist.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::SourceUnavailable`] if migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| EventError::SourceUnavailable(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert `event`, returning whether it was stored.
    ///
    /// Failures are logged; use [`SqliteEventProvider::try_add_event`] to see them.
    pub async fn add_event(&self, event: &Event) -> bool {
        match self.try_add_event(event).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(provider = %self.identifier, error = %e, "Failed to add event");
                false
            }
        }
    }

    /// Insert `event`.
    ///
    /// Singular events are stored as `YYYY-MM-DD`, annual events as `--MM-DD`.
    ///
    /// # Errors
    ///
    /// - [`EventError::UnstorableEvent`] for rule-based events
    /// - [`EventError::SourceUnavailable`] if the insert fails
    pub async fn try_add_event(&self, event: &Event) -> Result<()> {
        let date = storage_date(event).ok_or_else(|| {
            EventError::UnstorableEvent(format!(
                "rule-based event '{}' has no fixed date",
                event.description()
            ))
        })?;
        let category = event.category();

        sqlx::query(
            r"
            INSERT INTO events (event_date, description, category_primary, category_secondary)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(date.as_str())
        .bind(event.description())
        .bind(category.primary())
        .bind(category.secondary())
        .execute(&self.pool)
        .await
        .map_err(|e| EventError::SourceUnavailable(format!("Failed to insert event: {e}")))?;

        tracing::info!(
            provider = %self.identifier,
            date = %date,
            description = event.description(),
            "Event added to database"
        );
        Ok(())
    }

    async fn query_events(&self, sql: &str, binds: &[&str]) -> Vec<Event> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(*value);
        }

        match query.fetch_all(&self.pool).await {
            Ok(rows) => rows.iter().filter_map(|row| self.row_to_event(row)).collect(),
            Err(e) => {
                tracing::warn!(provider = %self.identifier, error = %e, "Database query failed");
                metrics::counter!("today.provider.failures", "provider" => self.identifier.clone())
                    .increment(1);
                Vec::new()
            }
        }
    }

    fn row_to_event(&self, row: &SqliteRow) -> Option<Event> {
        match decode_row(row) {
            Ok(event) => Some(event),
            Err(reason) => {
                tracing::warn!(provider = %self.identifier, reason = %reason, "Skipping malformed database row");
                metrics::counter!("today.records.skipped", "provider" => self.identifier.clone())
                    .increment(1);
                None
            }
        }
    }
}

fn decode_row(row: &SqliteRow) -> std::result::Result<Event, String> {
    let date: String = row.try_get("event_date").map_err(|e| e.to_string())?;
    let description: String = row.try_get("description").map_err(|e| e.to_string())?;
    let primary: String = row.try_get("category_primary").map_err(|e| e.to_string())?;
    let secondary: Option<String> = row.try_get("category_secondary").map_err(|e| e.to_string())?;

    let category = Category::new(primary, secondary.as_deref());
    make_event_with_category(&date, &description, category).map_err(|e| e.to_string())
}

impl EventProvider for SqliteEventProvider {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn events(&self) -> ProviderFuture<'_> {
        Box::pin(async move {
            let sql = format!("{SELECT_EVENTS} ORDER BY id");
            self.query_events(&sql, &[]).await
        })
    }

    fn events_of_category<'a>(&'a self, category: &'a Category) -> ProviderFuture<'a> {
        Box::pin(async move {
            tracing::debug!(provider = %self.identifier, category = %category, "Querying events of category");
            match category.secondary() {
                None => {
                    let sql = format!(
                        "{SELECT_EVENTS} WHERE lower(category_primary) = lower(?) ORDER BY id"
                    );
                    self.query_events(&sql, &[category.primary()]).await
                }
                Some(secondary) => {
                    let sql = format!(
                        "{SELECT_EVENTS} WHERE lower(category_primary) = lower(?) \
                         AND lower(category_secondary) = lower(?) ORDER BY id"
                    );
                    self.query_events(&sql, &[category.primary(), secondary]).await
                }
            }
        })
    }

    fn events_of_date(&self, month_day: MonthDay) -> ProviderFuture<'_> {
        Box::pin(async move {
            tracing::debug!(provider = %self.identifier, date = %month_day, "Querying events of date");
            let sql = format!("{SELECT_EVENTS} WHERE substr(event_date, -5) = ? ORDER BY id");
            let param = month_day.query_param();
            self.query_events(&sql, &[param.as_str()]).await
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use today_core::factory::{make_event, make_rule_event};

    async fn provider() -> SqliteEventProvider {
        let provider = SqliteEventProvider::connect("sqlite::memory:").await.unwrap();
        provider.migrate().await.unwrap();
        provider
    }

    async fn seeded() -> SqliteEventProvider {
        let provider = provider().await;
        for (date, description, category) in [
            ("2024-09-16", "macOS 15 Sequoia released", "apple/macos"),
            ("2023-09-26", "macOS 14 Sonoma released", "apple/macos"),
            ("--09-16", "Annual observance", "misc"),
            ("1990-09-16", "Apple history", "apple"),
        ] {
            assert!(provider.add_event(&make_event(date, description, category).unwrap()).await);
        }
        provider
    }

    #[tokio::test]
    async fn insert_keeps_dated_and_yearless_apart() {
        let provider = provider().await;
        let singular = make_event("2020-11-12", "macOS 11 Big Sur released", "apple/macos").unwrap();
        let annual = make_event("12-24", "Christmas Eve", "holiday").unwrap();
        assert!(provider.add_event(&singular).await);
        assert!(provider.add_event(&annual).await);

        let dates: Vec<String> = sqlx::query_scalar("SELECT event_date FROM events ORDER BY id")
            .fetch_all(provider.pool())
            .await
            .unwrap();
        assert_eq!(dates, vec!["2020-11-12", "--12-24"]);

        assert_eq!(provider.events().await, vec![singular, annual]);
    }

    #[tokio::test]
    async fn date_query_matches_month_day_of_both_shapes() {
        let provider = seeded().await;
        let found = provider.events_of_date(MonthDay::new(9, 16).unwrap()).await;
        let descriptions: Vec<&str> = found.iter().map(Event::description).collect();
        assert_eq!(
            descriptions,
            vec!["macOS 15 Sequoia released", "Annual observance", "Apple history"]
        );
    }

    #[tokio::test]
    async fn category_query_without_secondary_matches_primary_only() {
        let provider = seeded().await;
        let found = provider.events_of_category(&Category::parse("APPLE").unwrap()).await;
        assert_eq!(found.len(), 3);
    }

    #[tokio::test]
    async fn category_query_with_secondary_requires_both() {
        let provider = seeded().await;
        let found = provider
            .events_of_category(&Category::parse("apple/macos").unwrap())
            .await;
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|e| e.category().secondary() == Some("macos")));
    }

    #[tokio::test]
    async fn rule_based_events_are_not_stored() {
        let provider = provider().await;
        let rule = make_rule_event("fourth thursday in november", "Thanksgiving", "usa/holiday").unwrap();
        assert!(matches!(
            provider.try_add_event(&rule).await,
            Err(EventError::UnstorableEvent(_))
        ));
        assert!(!provider.add_event(&rule).await);
        assert!(provider.events().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped() {
        let provider = seeded().await;
        sqlx::query(
            "INSERT INTO events (event_date, description, category_primary) VALUES ('13-45', 'Bad', 'misc')",
        )
        .execute(provider.pool())
        .await
        .unwrap();

        assert_eq!(provider.events().await.len(), 4);
    }

    #[tokio::test]
    async fn missing_table_answers_empty() {
        let provider = SqliteEventProvider::connect("sqlite::memory:").await.unwrap();
        assert!(provider.events().await.is_empty());
        assert!(provider.events_of_date(MonthDay::new(1, 1).unwrap()).await.is_empty());
        assert!(!provider.add_event(&make_event("--01-01", "New Year", "holiday").unwrap()).await);
    }

    #[tokio::test]
    async fn opens_file_database_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.sqlite3");

        let provider = SqliteEventProvider::open(&path).await.unwrap();
        provider.migrate().await.unwrap();
        assert!(provider.add_event(&make_event("--05-01", "May Day", "holiday").unwrap()).await);
        provider.pool().close().await;

        let reopened = SqliteEventProvider::open(&path).await.unwrap().with_identifier("db");
        assert_eq!(reopened.identifier(), "db");
        assert_eq!(reopened.events().await.len(), 1);
    }
}

//! CSV file-backed provider.
//!
//! The file is read once, eagerly, when the provider is opened. Each line is
//! one `date,description,category` record with no header and no quoting.
//! Records that fail to parse are logged and skipped; a missing or unreadable
//! file yields an empty provider. Neither ever fails the load.

use crate::category::Category;
use crate::environment::{Clock, SystemClock};
use crate::error::{EventError, Result};
use crate::event::Event;
use crate::factory::{make_event, storage_date};
use crate::memory::StaticEventProvider;
use crate::month_day::MonthDay;
use crate::provider::{EventProvider, ProviderFuture};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Number of fields in a record.
const FIELDS: usize = 3;

/// Characters no stored field may contain.
const SEPARATORS: [char; 3] = [',', '\n', '\r'];

/// An [`EventProvider`] over a CSV file loaded at construction time.
#[derive(Debug, Clone)]
pub struct CsvEventProvider {
    path: Option<PathBuf>,
    inner: StaticEventProvider,
    skipped: usize,
}

impl CsvEventProvider {
    /// Load `path` and serve its events under `identifier`.
    pub async fn open(path: impl AsRef<Path>, identifier: impl Into<String>) -> Self {
        Self::open_with_clock(path, identifier, Arc::new(SystemClock)).await
    }

    /// Like [`CsvEventProvider::open`] with an explicit clock.
    pub async fn open_with_clock(
        path: impl AsRef<Path>,
        identifier: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let path = path.as_ref();
        let identifier = identifier.into();

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(provider = %identifier, path = %path.display(), "CSV file not found");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(
                    provider = %identifier,
                    path = %path.display(),
                    error = %e,
                    "Error reading CSV file"
                );
                metrics::counter!("today.provider.failures", "provider" => identifier.clone())
                    .increment(1);
                Vec::new()
            }
        };

        let mut provider = Self::from_reader(bytes.as_slice(), identifier, clock);
        provider.path = Some(path.to_path_buf());
        tracing::debug!(
            provider = %provider.identifier(),
            events = provider.len(),
            skipped = provider.skipped,
            "CSV events loaded"
        );
        provider
    }

    /// Parse records from any reader.
    pub fn from_reader(reader: impl io::Read, identifier: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        let identifier = identifier.into();
        let (events, skipped) = parse_records(reader, &identifier);
        Self {
            path: None,
            inner: StaticEventProvider::with_clock(identifier, events, clock),
            skipped,
        }
    }

    /// The file this provider was loaded from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of events loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no events were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of records skipped because they did not parse.
    #[must_use]
    pub const fn skipped_records(&self) -> usize {
        self.skipped
    }

    /// Append `event` as one record at the end of `path`, creating the file if needed.
    ///
    /// Already loaded providers do not see the new record.
    ///
    /// # Errors
    ///
    /// - [`EventError::UnstorableEvent`] for rule-based events and for
    ///   descriptions containing commas or line breaks
    /// - [`EventError::SourceUnavailable`] if the file cannot be written
    pub async fn append_record(path: impl AsRef<Path>, event: &Event) -> Result<()> {
        let path = path.as_ref();
        let line = to_record(event)?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| EventError::SourceUnavailable(format!("{}: {e}", path.display())))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| EventError::SourceUnavailable(format!("{}: {e}", path.display())))?;
        file.flush()
            .await
            .map_err(|e| EventError::SourceUnavailable(format!("{}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), record = line.trim_end(), "Event appended to CSV file");
        Ok(())
    }
}

fn parse_records(reader: impl io::Read, identifier: &str) -> (Vec<Event>, usize) {
    let mut lines = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut events = Vec::new();
    let mut skipped = 0;

    for (index, record) in lines.records().enumerate() {
        let parsed = record
            .map_err(|e| e.to_string())
            .and_then(|record| parse_record(&record));

        match parsed {
            Ok(event) => events.push(event),
            Err(reason) => {
                skipped += 1;
                tracing::warn!(
                    provider = identifier,
                    record = index + 1,
                    reason = %reason,
                    "Skipping malformed CSV record"
                );
                metrics::counter!("today.records.skipped", "provider" => identifier.to_string())
                    .increment(1);
            }
        }
    }

    (events, skipped)
}

fn parse_record(record: &csv::StringRecord) -> std::result::Result<Event, String> {
    match (record.get(0), record.get(1), record.get(2)) {
        (Some(date), Some(description), Some(category)) if record.len() == FIELDS => {
            make_event(date, description, category).map_err(|e| e.to_string())
        }
        _ => Err(format!("expected {FIELDS} fields, found {}", record.len())),
    }
}

fn to_record(event: &Event) -> Result<String> {
    let date = storage_date(event).ok_or_else(|| {
        EventError::UnstorableEvent(format!("rule-based event '{}' has no fixed date", event.description()))
    })?;
    let description = event.description();
    let category = event.category().to_string();
    for (field, value) in [("description", description), ("category", category.as_str())] {
        if value.contains(SEPARATORS) {
            return Err(EventError::UnstorableEvent(format!(
                "{field} '{value}' contains a field or record separator"
            )));
        }
    }
    Ok(format!("{date},{description},{category}\n"))
}

impl EventProvider for CsvEventProvider {
    fn identifier(&self) -> &str {
        self.inner.identifier()
    }

    fn events(&self) -> ProviderFuture<'_> {
        self.inner.events()
    }

    fn events_of_category<'a>(&'a self, category: &'a Category) -> ProviderFuture<'a> {
        self.inner.events_of_category(category)
    }

    fn events_of_date(&self, month_day: MonthDay) -> ProviderFuture<'_> {
        self.inner.events_of_date(month_day)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::factory::make_rule_event;
    use std::io::Write;

    const MACOS: &str = "\
2024-09-16,macOS 15 Sequoia released,apple/macos
2023-09-26,macOS 14 Sonoma released,apple/macos
--09-16,Annual observance,misc
";

    fn load(text: &str) -> CsvEventProvider {
        CsvEventProvider::from_reader(text.as_bytes(), "standard", Arc::new(SystemClock))
    }

    #[tokio::test]
    async fn loads_every_valid_line() {
        let provider = load(MACOS);
        assert_eq!(provider.len(), 3);
        assert_eq!(provider.skipped_records(), 0);
        assert_eq!(provider.identifier(), "standard");
    }

    #[tokio::test]
    async fn malformed_line_is_skipped_not_fatal() {
        let provider = load(
            "2024-09-16,Sequoia,apple/macos\nnot-a-date,Broken,misc\n2023-09-26,Sonoma,apple/macos\n",
        );
        assert_eq!(provider.len(), 2);
        assert_eq!(provider.skipped_records(), 1);
        let descriptions: Vec<String> =
            provider.events().await.iter().map(|e| e.description().to_string()).collect();
        assert_eq!(descriptions, vec!["Sequoia", "Sonoma"]);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn each_skipped_record_logs_one_warning() {
        let logs = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let provider = tracing::subscriber::with_default(subscriber, || {
            load("2024-09-16,Sequoia,apple/macos\nnot-a-date,Broken,misc\n--01-01,New Year,holiday\n")
        });

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(provider.skipped_records(), 1);
        assert_eq!(text.matches("Skipping malformed CSV record").count(), 1);
        assert!(text.contains("WARN"));
        assert!(text.contains("record=2"));
    }

    #[tokio::test]
    async fn wrong_field_counts_are_skipped() {
        let provider = load("2024-09-16,Only two\n2024-09-16,a,b,c\n--01-01,New Year,holiday\n");
        assert_eq!(provider.len(), 1);
        assert_eq!(provider.skipped_records(), 2);
    }

    #[tokio::test]
    async fn quotes_are_literal() {
        let provider = load("--04-01,\"Fools\" day,misc\n");
        assert_eq!(provider.events().await[0].description(), "\"Fools\" day");
    }

    #[tokio::test]
    async fn date_query_ignores_year() {
        let provider = load(MACOS);
        let found = provider.events_of_date(MonthDay::new(9, 16).unwrap()).await;
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn category_query_matches_primary_only_when_asked() {
        let provider = load(MACOS);
        assert_eq!(provider.events_of_category(&Category::parse("apple").unwrap()).await.len(), 2);
        assert_eq!(provider.events_of_category(&Category::parse("misc/other").unwrap()).await.len(), 0);
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_provider() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvEventProvider::open(dir.path().join("absent.csv"), "standard").await;
        assert!(provider.is_empty());
        assert!(provider.events().await.is_empty());
    }

    #[tokio::test]
    async fn opens_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MACOS.as_bytes()).unwrap();
        let provider = CsvEventProvider::open(file.path(), "standard").await;
        assert_eq!(provider.len(), 3);
        assert_eq!(provider.path(), Some(file.path()));
    }

    #[tokio::test]
    async fn appended_records_load_back_with_their_variant() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");

        let singular = make_event("2020-11-12", "macOS 11 Big Sur released", "apple/macos").unwrap();
        let annual = make_event("12-24", "Christmas Eve", "holiday").unwrap();
        CsvEventProvider::append_record(&path, &singular).await.unwrap();
        CsvEventProvider::append_record(&path, &annual).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(
            text,
            "2020-11-12,macOS 11 Big Sur released,apple/macos\n--12-24,Christmas Eve,holiday\n"
        );

        let provider = CsvEventProvider::open(&path, "standard").await;
        assert_eq!(provider.events().await, vec![singular, annual]);
    }

    #[tokio::test]
    async fn rule_based_and_comma_descriptions_are_not_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");

        let rule = make_rule_event("last monday in may", "Memorial Day", "usa").unwrap();
        assert!(matches!(
            CsvEventProvider::append_record(&path, &rule).await,
            Err(EventError::UnstorableEvent(_))
        ));

        let comma = make_event("--01-01", "Hello, world", "misc").unwrap();
        assert!(matches!(
            CsvEventProvider::append_record(&path, &comma).await,
            Err(EventError::UnstorableEvent(_))
        ));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn comma_categories_are_not_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");

        let event = make_event("--12-24", "Christmas Eve", "holiday,extra").unwrap();
        assert!(matches!(
            CsvEventProvider::append_record(&path, &event).await,
            Err(EventError::UnstorableEvent(_))
        ));
        assert!(!path.exists());

        let stored = make_event("--12-24", "Christmas Eve", "holiday/eve").unwrap();
        CsvEventProvider::append_record(&path, &stored).await.unwrap();
        let provider = CsvEventProvider::open(&path, "standard").await;
        assert_eq!(provider.skipped_records(), 0);
        assert_eq!(provider.events().await, vec![stored]);
    }
}

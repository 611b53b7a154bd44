//! HTTP-backed event provider.

use crate::error::RemoteError;
use crate::record::EventRecord;
use reqwest::{Client, StatusCode, Url};
use std::sync::Arc;
use today_core::environment::{Clock, SystemClock};
use today_core::provider::{EventProvider, ProviderFuture};
use today_core::{Category, Event, MonthDay};

/// Identifier the provider registers under unless told otherwise.
pub const DEFAULT_IDENTIFIER: &str = "web";

const EVENTS_PATH: &str = "api/v1/events";

/// An [`EventProvider`] fetching events from the remote service on every call.
///
/// The service can only be queried by month-day, so [`EventProvider::events`]
/// and [`EventProvider::events_of_category`] work on today's events. Any
/// failure is logged and answered with an empty list.
#[derive(Clone)]
pub struct RemoteEventProvider {
    client: Client,
    endpoint: Url,
    identifier: String,
    clock: Arc<dyn Clock>,
}

impl RemoteEventProvider {
    /// Create a provider for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::InvalidUrl`] if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        Self::with_clock(base_url, Arc::new(SystemClock))
    }

    /// Like [`RemoteEventProvider::new`], reading "today" from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::InvalidUrl`] if `base_url` is not an absolute URL.
    pub fn with_clock(base_url: &str, clock: Arc<dyn Clock>) -> Result<Self, RemoteError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)
            .and_then(|url| url.join(EVENTS_PATH))
            .map_err(|e| RemoteError::InvalidUrl {
                url: base_url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client: Client::new(),
            endpoint,
            identifier: DEFAULT_IDENTIFIER.to_string(),
            clock,
        })
    }

    /// Register under `identifier` instead of [`DEFAULT_IDENTIFIER`].
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// The full events endpoint, without query.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the events of `month_day`.
    ///
    /// Records with a malformed date or category are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-200 responses, or a body that
    /// is not a JSON array of records.
    pub async fn fetch(&self, month_day: MonthDay) -> Result<Vec<Event>, RemoteError> {
        let date = month_day.query_param();
        tracing::debug!(provider = %self.identifier, url = %self.endpoint, date = %date, "Fetching remote events");

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("date", date.as_str())])
            .send()
            .await
            .map_err(|e| RemoteError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let records = response
                    .json::<Vec<EventRecord>>()
                    .await
                    .map_err(|e| RemoteError::ResponseParseFailed(e.to_string()))?;
                Ok(self.to_events(&records))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(RemoteError::Status {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }

    fn to_events(&self, records: &[EventRecord]) -> Vec<Event> {
        records
            .iter()
            .filter_map(|record| match record.to_event() {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!(provider = %self.identifier, error = %e, "Skipping malformed remote record");
                    metrics::counter!("today.records.skipped", "provider" => self.identifier.clone())
                        .increment(1);
                    None
                }
            })
            .collect()
    }

    async fn fetch_or_empty(&self, month_day: MonthDay) -> Vec<Event> {
        match self.fetch(month_day).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(provider = %self.identifier, error = %e, "Remote event query failed");
                metrics::counter!("today.provider.failures", "provider" => self.identifier.clone())
                    .increment(1);
                Vec::new()
            }
        }
    }

    fn today(&self) -> MonthDay {
        MonthDay::from_date(self.clock.today())
    }
}

impl std::fmt::Debug for RemoteEventProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteEventProvider")
            .field("endpoint", &self.endpoint.as_str())
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

impl EventProvider for RemoteEventProvider {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn events(&self) -> ProviderFuture<'_> {
        let today = self.today();
        Box::pin(async move { self.fetch_or_empty(today).await })
    }

    fn events_of_category<'a>(&'a self, category: &'a Category) -> ProviderFuture<'a> {
        let today = self.today();
        Box::pin(async move {
            self.fetch_or_empty(today)
                .await
                .into_iter()
                .filter(|event| category.matches(event.category()))
                .collect()
        })
    }

    fn events_of_date(&self, month_day: MonthDay) -> ProviderFuture<'_> {
        Box::pin(async move { self.fetch_or_empty(month_day).await })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use today_testing::test_clock_at;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> RemoteEventProvider {
        RemoteEventProvider::with_clock(&server.uri(), test_clock_at(2024, 12, 6)).unwrap()
    }

    async fn serve(server: &MockServer, date: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/v1/events"))
            .and(query_param("date", date))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[test]
    fn endpoint_is_resolved_against_base() {
        let provider = RemoteEventProvider::new("https://example.com").unwrap();
        assert_eq!(provider.endpoint().as_str(), "https://example.com/api/v1/events");

        let provider = RemoteEventProvider::new("https://example.com/today/").unwrap();
        assert_eq!(provider.endpoint().as_str(), "https://example.com/today/api/v1/events");
        assert_eq!(provider.identifier(), "web");
    }

    #[test]
    fn relative_base_is_rejected() {
        assert!(matches!(
            RemoteEventProvider::new("not a url"),
            Err(RemoteError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn date_query_maps_records() {
        let server = MockServer::start().await;
        serve(
            &server,
            "09-16",
            json!([
                {"date": "2024-09-16", "description": "macOS 15 Sequoia released", "category": "apple/macos"},
                {"date": "--09-16", "description": "Annual observance", "category": "misc"}
            ]),
        )
        .await;

        let events = provider(&server).events_of_date(MonthDay::new(9, 16).unwrap()).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::Singular(_)));
        assert!(matches!(events[1], Event::Annual(_)));
    }

    #[tokio::test]
    async fn malformed_record_is_skipped() {
        let server = MockServer::start().await;
        serve(
            &server,
            "09-16",
            json!([
                {"date": "someday", "description": "Broken", "category": "misc"},
                {"date": "--09-16", "description": "Fine", "category": "misc"}
            ]),
        )
        .await;

        let events = provider(&server).events_of_date(MonthDay::new(9, 16).unwrap()).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].description(), "Fine");
    }

    #[tokio::test]
    async fn server_error_answers_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/events"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let provider = provider(&server);
        let md = MonthDay::new(1, 1).unwrap();
        assert!(matches!(
            provider.fetch(md).await,
            Err(RemoteError::Status { status: 500, .. })
        ));
        assert!(provider.events_of_date(md).await.is_empty());
    }

    #[tokio::test]
    async fn non_json_body_answers_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/events"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let provider = provider(&server);
        let md = MonthDay::new(1, 1).unwrap();
        assert!(matches!(
            provider.fetch(md).await,
            Err(RemoteError::ResponseParseFailed(_))
        ));
        assert!(provider.events_of_date(md).await.is_empty());
    }

    #[tokio::test]
    async fn json_object_instead_of_array_is_a_parse_failure() {
        let server = MockServer::start().await;
        serve(&server, "01-01", json!({"date": "--01-01", "description": "New Year", "category": "holiday"})).await;

        let provider = provider(&server);
        let md = MonthDay::new(1, 1).unwrap();
        assert!(matches!(
            provider.fetch(md).await,
            Err(RemoteError::ResponseParseFailed(_))
        ));
        assert!(provider.events_of_date(md).await.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_answers_empty() {
        let provider =
            RemoteEventProvider::with_clock("http://127.0.0.1:1/", test_clock_at(2024, 12, 6)).unwrap();
        let md = MonthDay::new(1, 1).unwrap();
        assert!(matches!(provider.fetch(md).await, Err(RemoteError::RequestFailed(_))));
        assert!(provider.events_of_date(md).await.is_empty());
    }

    #[tokio::test]
    async fn events_and_category_use_today() {
        let server = MockServer::start().await;
        serve(
            &server,
            "12-06",
            json!([
                {"date": "--12-06", "description": "Itsenäisyyspäivä", "category": "finland/flagday"},
                {"date": "1917-12-06", "description": "Finland declares independence", "category": "finland/history"},
                {"date": "--12-06", "description": "Saint Nicholas Day", "category": "holiday"}
            ]),
        )
        .await;

        let provider = provider(&server);
        assert_eq!(provider.events().await.len(), 3);

        let finland = provider.events_of_category(&Category::parse("finland").unwrap()).await;
        assert_eq!(finland.len(), 2);

        let flagday = provider
            .events_of_category(&Category::parse("finland/flagday").unwrap())
            .await;
        assert_eq!(flagday.len(), 1);
        assert_eq!(flagday[0].description(), "Itsenäisyyspäivä");
    }
}

//! Provider over a fixed list of events.

use crate::category::Category;
use crate::environment::{Clock, SystemClock};
use crate::event::Event;
use crate::month_day::MonthDay;
use crate::provider::{EventProvider, ProviderFuture, select_of_category, select_of_date};
use chrono::Datelike;
use std::sync::Arc;

/// An [`EventProvider`] serving events held in memory.
///
/// Used for built-in observances and as a building block in tests. The list is
/// read-only after construction, so queries are safe to run concurrently.
///
/// # Example
///
/// ```
/// use today_core::factory::make_rule_event;
/// use today_core::memory::StaticEventProvider;
/// use today_core::provider::EventProvider;
///
/// # tokio_test::block_on(async {
/// let provider = StaticEventProvider::new(
///     "rules",
///     vec![make_rule_event("fourth thursday in november", "Thanksgiving", "usa/holiday").unwrap()],
/// );
/// assert_eq!(provider.events().await.len(), 1);
/// # });
/// ```
#[derive(Clone)]
pub struct StaticEventProvider {
    identifier: String,
    events: Vec<Event>,
    clock: Arc<dyn Clock>,
}

impl StaticEventProvider {
    /// Create a provider resolving rules against the system clock.
    #[must_use]
    pub fn new(identifier: impl Into<String>, events: Vec<Event>) -> Self {
        Self::with_clock(identifier, events, Arc::new(SystemClock))
    }

    /// Create a provider resolving rules against `clock`.
    #[must_use]
    pub fn with_clock(identifier: impl Into<String>, events: Vec<Event>, clock: Arc<dyn Clock>) -> Self {
        Self {
            identifier: identifier.into(),
            events,
            clock,
        }
    }

    /// Number of events held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl std::fmt::Debug for StaticEventProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticEventProvider")
            .field("identifier", &self.identifier)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl EventProvider for StaticEventProvider {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn events(&self) -> ProviderFuture<'_> {
        Box::pin(async move { self.events.clone() })
    }

    fn events_of_category<'a>(&'a self, category: &'a Category) -> ProviderFuture<'a> {
        Box::pin(async move { select_of_category(&self.events, category) })
    }

    fn events_of_date(&self, month_day: MonthDay) -> ProviderFuture<'_> {
        let year = self.clock.today().year();
        Box::pin(async move { select_of_date(&self.events, month_day, year) })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::factory::{make_event, make_rule_event};
    use chrono::{DateTime, TimeZone, Utc};

    struct At(DateTime<Utc>);

    impl Clock for At {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn provider(year: i32) -> StaticEventProvider {
        StaticEventProvider::with_clock(
            "rules",
            vec![
                make_rule_event("fourth thursday in november", "Thanksgiving", "usa/holiday").unwrap(),
                make_event("--11-28", "Annual", "misc").unwrap(),
                make_event("1990-11-28", "Historic", "usa/history").unwrap(),
            ],
            Arc::new(At(Utc.with_ymd_and_hms(year, 6, 1, 12, 0, 0).unwrap())),
        )
    }

    #[tokio::test]
    async fn date_query_resolves_rules_in_clock_year() {
        let md = MonthDay::new(11, 28).unwrap();
        assert_eq!(provider(2024).events_of_date(md).await.len(), 3);
        // Thanksgiving 2025 is the 27th
        assert_eq!(provider(2025).events_of_date(md).await.len(), 2);
    }

    #[tokio::test]
    async fn category_query_uses_partial_match() {
        let p = provider(2024);
        let usa = Category::parse("usa").unwrap();
        assert_eq!(p.events_of_category(&usa).await.len(), 2);
        let holiday = Category::parse("usa/holiday").unwrap();
        let found = p.events_of_category(&holiday).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description(), "Thanksgiving");
    }

    #[tokio::test]
    async fn events_returns_everything_in_order() {
        let descriptions: Vec<String> = provider(2024)
            .events()
            .await
            .iter()
            .map(|e| e.description().to_string())
            .collect();
        assert_eq!(descriptions, vec!["Thanksgiving", "Annual", "Historic"]);
    }
}

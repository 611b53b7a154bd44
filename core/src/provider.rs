//! The event provider contract.
//!
//! A provider exposes the events of one source (a CSV file, a database, a
//! remote service) behind a uniform query surface. Providers never fail a
//! query: an unreadable source is logged and reported as an empty result, so
//! one broken source cannot take down an aggregate query.
//!
//! # Implementations
//!
//! - [`StaticEventProvider`](crate::memory::StaticEventProvider): fixed in-memory list
//! - [`CsvEventProvider`](crate::file::CsvEventProvider): eagerly loaded CSV file
//! - `SqliteEventProvider` (in `today-sqlite`): per-call database queries
//! - `RemoteEventProvider` (in `today-remote`): per-call HTTP requests
//!
//! # Dyn Compatibility
//!
//! Methods return `Pin<Box<dyn Future>>` instead of using `async fn` so that
//! providers can be stored as `Arc<dyn EventProvider>` in the
//! [`EventManager`](crate::manager::EventManager).

use crate::category::Category;
use crate::event::Event;
use crate::month_day::MonthDay;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by provider queries.
pub type ProviderFuture<'a> = Pin<Box<dyn Future<Output = Vec<Event>> + Send + 'a>>;

/// A source of events.
pub trait EventProvider: Send + Sync {
    /// Identifier used for registration and provider selection.
    fn identifier(&self) -> &str;

    /// Every event this provider can offer.
    ///
    /// Sources that cannot enumerate everything (the remote service) return
    /// what they have for today.
    fn events(&self) -> ProviderFuture<'_>;

    /// Events whose category is matched by `category` (see [`Category::matches`]).
    fn events_of_category<'a>(&'a self, category: &'a Category) -> ProviderFuture<'a>;

    /// Events falling on `month_day` regardless of year.
    ///
    /// Rule-based events are resolved against the current year.
    fn events_of_date(&self, month_day: MonthDay) -> ProviderFuture<'_>;
}

/// In-memory category selection shared by list-backed providers.
#[must_use]
pub fn select_of_category(events: &[Event], category: &Category) -> Vec<Event> {
    events
        .iter()
        .filter(|event| category.matches(event.category()))
        .cloned()
        .collect()
}

/// In-memory date selection shared by list-backed providers.
#[must_use]
pub fn select_of_date(events: &[Event], month_day: MonthDay, year: i32) -> Vec<Event> {
    events
        .iter()
        .filter(|event| event.falls_on(month_day, year))
        .cloned()
        .collect()
}

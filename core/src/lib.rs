//! # Today Core
//!
//! Event model, date rules and provider aggregation for the `today` event
//! browser.
//!
//! Events come in three shapes: a [`SingularEvent`](event::SingularEvent)
//! happened on one full date, an [`AnnualEvent`](event::AnnualEvent) recurs on
//! the same month and day every year, and a
//! [`RuleBasedEvent`](event::RuleBasedEvent) recurs on a date computed from a
//! [`VerbalRule`](rule::VerbalRule) such as "fourth thursday in november".
//!
//! Sources of events implement [`EventProvider`](provider::EventProvider). An
//! [`EventManager`](manager::EventManager) holds the registered providers and
//! answers union queries across all of them.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use today_core::factory::make_event;
//! use today_core::manager::EventManager;
//! use today_core::memory::StaticEventProvider;
//! use today_core::month_day::MonthDay;
//!
//! # tokio_test::block_on(async {
//! let mut manager = EventManager::new();
//! manager.add_event_provider(Arc::new(StaticEventProvider::new(
//!     "standard",
//!     vec![make_event("2024-09-16", "macOS 15 Sequoia released", "apple/macos").unwrap()],
//! )));
//!
//! let found = manager.events_of_date(MonthDay::new(9, 16).unwrap()).await;
//! assert_eq!(found.len(), 1);
//! # });
//! ```

pub mod category;
pub mod error;
pub mod event;
pub mod factory;
pub mod file;
pub mod filter;
pub mod manager;
pub mod memory;
pub mod month_day;
pub mod ordering;
pub mod provider;
pub mod rule;

pub use category::Category;
pub use error::{EventError, Result};
pub use event::{AnnualEvent, Event, RuleBasedEvent, SingularEvent, TodayRelation};
pub use manager::EventManager;
pub use month_day::MonthDay;
pub use provider::EventProvider;
pub use rule::VerbalRule;

/// Injected dependencies.
///
/// Everything that reads the current date goes through [`Clock`](environment::Clock)
/// so rule resolution and "today" can be pinned in tests.
pub mod environment {
    use chrono::{DateTime, Local, NaiveDate, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{DateTime, TimeZone, Utc};
    /// use today_core::environment::Clock;
    ///
    /// struct FixedClock {
    ///     time: DateTime<Utc>,
    /// }
    ///
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    ///
    /// let time = Utc.with_ymd_and_hms(2024, 11, 28, 12, 0, 0).unwrap();
    /// let clock = FixedClock { time };
    /// assert_eq!(clock.now(), time);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;

        /// The current calendar date in the local time zone.
        fn today(&self) -> NaiveDate {
            self.now().with_timezone(&Local).date_naive()
        }
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

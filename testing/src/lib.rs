//! # Today Testing
//!
//! Testing utilities for the today event browser.
//!
//! This crate provides:
//! - A fixed [`Clock`] so "today" and rule resolution are deterministic
//! - Provider doubles for failure and call-count scenarios
//! - Event fixtures
//! - proptest strategies for dates and month-days
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use today_core::EventManager;
//! use today_testing::doubles::UnavailableProvider;
//! use today_testing::fixtures::macos_provider;
//!
//! # tokio_test::block_on(async {
//! let broken = Arc::new(UnavailableProvider::new("web"));
//! let mut manager = EventManager::new();
//! manager.add_event_provider(broken.clone());
//! manager.add_event_provider(Arc::new(macos_provider("standard")));
//!
//! assert_eq!(manager.events().await.len(), 4);
//! assert_eq!(broken.calls(), 1);
//! # });
//! ```

use chrono::{DateTime, Utc};
use today_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::{NaiveDate, TimeZone};
    use std::sync::Arc;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, and reports its UTC date as "today"
    /// regardless of the local time zone.
    ///
    /// # Example
    ///
    /// ```
    /// use today_testing::mocks::FixedClock;
    /// use today_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }

        fn today(&self) -> NaiveDate {
            self.time.date_naive()
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// A shared clock fixed at noon UTC on the given day.
    ///
    /// # Panics
    ///
    /// Panics if the date does not exist.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock_at(year: i32, month: u32, day: u32) -> Arc<dyn Clock> {
        let time = Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("test date should exist");
        Arc::new(FixedClock::new(time))
    }
}

/// Provider doubles.
pub mod doubles {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use today_core::provider::{EventProvider, ProviderFuture};
    use today_core::{Category, MonthDay};

    /// A provider whose source is always unavailable.
    ///
    /// Every query is logged as a failure and answered with an empty list,
    /// the way real providers degrade. Calls are counted.
    #[derive(Debug, Default)]
    pub struct UnavailableProvider {
        identifier: String,
        calls: AtomicUsize,
    }

    impl UnavailableProvider {
        /// Create a provider registered under `identifier`.
        #[must_use]
        pub fn new(identifier: impl Into<String>) -> Self {
            Self {
                identifier: identifier.into(),
                calls: AtomicUsize::new(0),
            }
        }

        /// Number of queries received so far.
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn fail(&self) -> ProviderFuture<'_> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                tracing::warn!(provider = %self.identifier, "Source unavailable");
                Vec::new()
            })
        }
    }

    impl EventProvider for UnavailableProvider {
        fn identifier(&self) -> &str {
            &self.identifier
        }

        fn events(&self) -> ProviderFuture<'_> {
            self.fail()
        }

        fn events_of_category<'a>(&'a self, _category: &'a Category) -> ProviderFuture<'a> {
            self.fail()
        }

        fn events_of_date(&self, _month_day: MonthDay) -> ProviderFuture<'_> {
            self.fail()
        }
    }
}

/// Event fixtures.
pub mod fixtures {
    use today_core::factory::{make_event, make_rule_event};
    use today_core::memory::StaticEventProvider;
    use today_core::Event;

    /// Build events from `(date, description, category)` triples.
    ///
    /// # Panics
    ///
    /// Panics if a triple does not describe a valid event.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn events(records: &[(&str, &str, &str)]) -> Vec<Event> {
        records
            .iter()
            .map(|(date, description, category)| {
                make_event(date, description, category).expect("fixture event should be valid")
            })
            .collect()
    }

    /// Four macOS releases, three of them on September dates.
    #[must_use]
    pub fn macos_releases() -> Vec<Event> {
        events(&[
            ("2024-09-16", "macOS 15 Sequoia released", "apple/macos"),
            ("2023-09-26", "macOS 14 Sonoma released", "apple/macos"),
            ("2022-10-24", "macOS 13 Ventura released", "apple/macos"),
            ("2021-10-25", "macOS 12 Monterey released", "apple/macos"),
        ])
    }

    /// A few annual observances.
    #[must_use]
    pub fn observances() -> Vec<Event> {
        events(&[
            ("--12-06", "Itsenäisyyspäivä", "finland/flagday"),
            ("--12-24", "Christmas Eve", "holiday"),
            ("--09-16", "Annual observance", "misc"),
        ])
    }

    /// Thanksgiving and Finnish Mother's Day as rule-based events.
    ///
    /// # Panics
    ///
    /// Never in practice; the rules are fixed.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn rule_events() -> Vec<Event> {
        vec![
            make_rule_event("fourth thursday in november", "Thanksgiving (U.S.A.)", "usa/holiday")
                .expect("fixture rule should parse"),
            make_rule_event("second sunday in may", "Äitienpäivä (Suomi)", "finland/flagday")
                .expect("fixture rule should parse"),
        ]
    }

    /// [`macos_releases`] served under `identifier`.
    #[must_use]
    pub fn macos_provider(identifier: &str) -> StaticEventProvider {
        StaticEventProvider::new(identifier, macos_releases())
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    /// Any valid month-day, including February 29th.
    pub fn month_day() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=12).prop_flat_map(|month| {
            let last = match month {
                2 => 29,
                4 | 6 | 9 | 11 => 30,
                _ => 31,
            };
            (Just(month), 1u32..=last)
        })
    }

    /// Any valid calendar date between years 1 and 9999.
    pub fn full_date() -> impl Strategy<Value = NaiveDate> {
        (1i32..=9999, month_day()).prop_filter_map("date must exist", |(year, (month, day))| {
            NaiveDate::from_ymd_opt(year, month, day)
        })
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock, test_clock_at};

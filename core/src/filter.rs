//! Predicates over events, used by
//! [`EventManager::filtered_events`](crate::manager::EventManager::filtered_events).

use crate::category::Category;
use crate::environment::{Clock, SystemClock};
use crate::event::Event;
use crate::month_day::MonthDay;
use chrono::Datelike;

/// A predicate deciding whether an event belongs in a result.
pub trait EventFilter: Send + Sync {
    /// Whether `event` passes this filter.
    fn accepts(&self, event: &Event) -> bool;
}

impl<F> EventFilter for F
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    fn accepts(&self, event: &Event) -> bool {
        self(event)
    }
}

/// Matches events on a month-day, optionally pinned to a year.
///
/// - Without a year, singular and annual events match on month-day alone.
///   Rule-based events are resolved in the rule year: the clock's current
///   year unless set with [`DateFilter::resolving_rules_in`].
/// - With a year, only singular events from that exact year match.
#[derive(Clone, Debug)]
pub struct DateFilter {
    month_day: MonthDay,
    year: Option<i32>,
    rule_year: i32,
}

impl DateFilter {
    /// Match any event on `month_day`, resolving rules in the system clock's year.
    #[must_use]
    pub fn new(month_day: MonthDay) -> Self {
        Self::with_clock(month_day, &SystemClock)
    }

    /// Match any event on `month_day`, resolving rules in `clock`'s current year.
    #[must_use]
    pub fn with_clock(month_day: MonthDay, clock: &dyn Clock) -> Self {
        Self {
            month_day,
            year: None,
            rule_year: clock.today().year(),
        }
    }

    /// Match only singular events on `month_day` of `year`.
    #[must_use]
    pub fn with_year(month_day: MonthDay, year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::new(month_day)
        }
    }

    /// Resolve rule-based events in `year` instead of the current year.
    #[must_use]
    pub const fn resolving_rules_in(mut self, year: i32) -> Self {
        self.rule_year = year;
        self
    }

    /// The month-day being matched.
    #[must_use]
    pub const fn month_day(&self) -> MonthDay {
        self.month_day
    }

    /// The pinned year, if any.
    #[must_use]
    pub const fn year(&self) -> Option<i32> {
        self.year
    }
}

impl EventFilter for DateFilter {
    fn accepts(&self, event: &Event) -> bool {
        match (self.year, event) {
            (Some(year), Event::Singular(e)) => e.year() == year && e.month_day() == self.month_day,
            (Some(_), Event::Annual(_) | Event::RuleBased(_)) => false,
            (None, _) => event.falls_on(self.month_day, self.rule_year),
        }
    }
}

/// Matches events by category using [`Category::matches`].
///
/// A filter category without a secondary accepts every secondary of the same
/// primary; otherwise both parts must match.
#[derive(Clone, Debug)]
pub struct CategoryFilter {
    category: Category,
}

impl CategoryFilter {
    /// Match events in `category`.
    #[must_use]
    pub const fn new(category: Category) -> Self {
        Self { category }
    }
}

impl EventFilter for CategoryFilter {
    fn accepts(&self, event: &Event) -> bool {
        self.category.matches(event.category())
    }
}

/// Conjunction of a [`DateFilter`] and a [`CategoryFilter`].
#[derive(Clone, Debug)]
pub struct DateCategoryFilter {
    date: DateFilter,
    category: CategoryFilter,
}

impl DateCategoryFilter {
    /// Match events on `month_day` in `category`.
    #[must_use]
    pub fn new(month_day: MonthDay, category: Category) -> Self {
        Self::from_parts(DateFilter::new(month_day), CategoryFilter::new(category))
    }

    /// Like [`DateCategoryFilter::new`], resolving rules in `clock`'s current year.
    #[must_use]
    pub fn with_clock(month_day: MonthDay, category: Category, clock: &dyn Clock) -> Self {
        Self::from_parts(DateFilter::with_clock(month_day, clock), CategoryFilter::new(category))
    }

    /// Combine already configured filters.
    #[must_use]
    pub const fn from_parts(date: DateFilter, category: CategoryFilter) -> Self {
        Self { date, category }
    }
}

impl EventFilter for DateCategoryFilter {
    fn accepts(&self, event: &Event) -> bool {
        self.date.accepts(event) && self.category.accepts(event)
    }
}

//! Presentation orderings.
//!
//! Query results are split by variant before display: annual observances are
//! listed in calendar order, historical events most recent first. Both sorts
//! are stable, so events with equal keys keep their provider order.

use crate::event::{AnnualEvent, Event, RuleBasedEvent, SingularEvent};
use std::cmp::Ordering;

/// Calendar order: month, then day, then description.
#[must_use]
pub fn compare_annual(a: &AnnualEvent, b: &AnnualEvent) -> Ordering {
    a.month_day()
        .cmp(&b.month_day())
        .then_with(|| a.description().cmp(b.description()))
}

/// Chronological order by full date.
#[must_use]
pub fn compare_singular(a: &SingularEvent, b: &SingularEvent) -> Ordering {
    a.date().cmp(&b.date())
}

/// A result list split by variant and sorted for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortedEvents {
    /// Annual events in calendar order.
    pub annual: Vec<AnnualEvent>,
    /// Singular events, most recent first.
    pub singular: Vec<SingularEvent>,
    /// Rule-based events by their date in the reference year; unresolvable last.
    pub rule_based: Vec<RuleBasedEvent>,
}

impl SortedEvents {
    /// Split and sort `events`, resolving rules in `year`.
    #[must_use]
    pub fn from_events(events: impl IntoIterator<Item = Event>, year: i32) -> Self {
        let mut sorted = Self::default();
        for event in events {
            match event {
                Event::Annual(e) => sorted.annual.push(e),
                Event::Singular(e) => sorted.singular.push(e),
                Event::RuleBased(e) => sorted.rule_based.push(e),
            }
        }

        sorted.annual.sort_by(compare_annual);
        sorted.singular.sort_by(|a, b| compare_singular(b, a));
        sorted
            .rule_based
            .sort_by_key(|e| e.date_in(year).map_or((1, None), |d| (0, Some(d))));
        sorted
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annual.is_empty() && self.singular.is_empty() && self.rule_based.is_empty()
    }
}

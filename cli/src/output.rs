//! Console rendering.
//!
//! Everything here returns the text to print so it can be checked in tests;
//! diagnostics go through `tracing` to stderr instead.

use chrono::NaiveDate;
use today_core::ordering::SortedEvents;
use today_core::{Event, EventManager, TodayRelation};

/// Events of a date: observances first, then history, newest first.
///
/// Renders nothing when `events` is empty.
#[must_use]
pub fn render_events(events: Vec<Event>, year: i32) -> String {
    let sorted = SortedEvents::from_events(events, year);
    let mut lines = Vec::new();

    if !sorted.annual.is_empty() || !sorted.rule_based.is_empty() {
        lines.push("Observed today:".to_string());
        for event in &sorted.annual {
            lines.push(format!("- {} ({})", event.description(), event.category()));
        }
        for event in &sorted.rule_based {
            lines.push(format!("- {} ({})", event.description(), event.category()));
        }
    }

    if !sorted.singular.is_empty() {
        lines.push("\nToday in history:".to_string());
        for event in &sorted.singular {
            lines.push(format!(
                "{}: {} ({})",
                event.year(),
                event.description(),
                event.category()
            ));
        }
    }

    join_lines(&lines)
}

/// Rule-based events with their date in `year` and distance from `today`.
#[must_use]
pub fn render_rules(events: &[Event], year: i32, today: NaiveDate) -> String {
    let mut lines = vec!["Rule-based events:".to_string()];

    for event in events {
        let Event::RuleBased(rule_event) = event else {
            continue;
        };
        let line = match rule_event.date_in(year) {
            Ok(date) => format!("{event} on {date}, {}", distance(date, today)),
            Err(e) => format!("{event}: {e}"),
        };
        lines.push(line);
    }

    join_lines(&lines)
}

/// Registered provider identifiers, one per line.
#[must_use]
pub fn render_providers(manager: &EventManager) -> String {
    let lines: Vec<String> = manager
        .providers()
        .iter()
        .map(|provider| format!("- {}", provider.identifier()))
        .collect();
    join_lines(&lines)
}

fn distance(date: NaiveDate, today: NaiveDate) -> String {
    let days = date.signed_duration_since(today).num_days();
    match TodayRelation::from_difference(days) {
        TodayRelation::Today => "today".to_string(),
        TodayRelation::AfterToday => format!("in {}", day_count(days)),
        TodayRelation::BeforeToday => format!("{} ago", day_count(-days)),
    }
}

fn day_count(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

fn join_lines(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

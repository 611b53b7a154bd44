//! Error taxonomy shared by every part of the event engine.

use thiserror::Error;

/// Errors produced while building, resolving or collecting events.
///
/// Only the parsing variants ever reach a caller directly. `SourceUnavailable`
/// is raised inside a provider and recovered there as an empty result, and
/// `DuplicateProviderIdentifier` is surfaced as a `false` from
/// [`EventManager::add_event_provider`](crate::manager::EventManager::add_event_provider).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The date string is neither `YYYY-MM-DD` nor a month-day.
    #[error("Malformed date: '{0}'")]
    MalformedDate(String),

    /// The category string is empty or has more than two parts.
    #[error("Malformed category: '{0}'")]
    MalformedCategory(String),

    /// The text is not of the form `<ordinal> <weekday> in <month>`.
    #[error("Unparsable rule: '{0}'")]
    UnparsableRule(String),

    /// The month has no occurrence for the requested ordinal (e.g. a fifth Monday).
    #[error("No {ordinal} {weekday} in {month} {year}")]
    OrdinalOutOfRange {
        /// Requested ordinal, as written in the rule.
        ordinal: String,
        /// Requested weekday, as written in the rule.
        weekday: String,
        /// Month the rule applies to.
        month: String,
        /// Year the rule was evaluated for.
        year: i32,
    },

    /// The event cannot be written to the requested store.
    #[error("Cannot store event: {0}")]
    UnstorableEvent(String),

    /// A backing store could not be read or written.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// A provider with the same identifier is already registered.
    #[error("Event provider '{0}' is already registered")]
    DuplicateProviderIdentifier(String),
}

/// Result type for event operations.
pub type Result<T> = std::result::Result<T, EventError>;

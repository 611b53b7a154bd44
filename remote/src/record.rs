//! Wire format of the remote event service.

use serde::{Deserialize, Serialize};
use today_core::factory::make_event;
use today_core::{Event, Result};

/// One element of the JSON array returned by `GET /api/v1/events`.
///
/// Fields use the same string conventions as a CSV record: `date` is
/// `YYYY-MM-DD` or `--MM-DD`, `category` is `primary` or `primary/secondary`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    /// Full date or month-day
    pub date: String,
    /// Event description
    pub description: String,
    /// Category string
    pub category: String,
}

impl EventRecord {
    /// Build the event this record describes.
    ///
    /// # Errors
    ///
    /// Returns the factory error for a malformed date or category.
    pub fn to_event(&self) -> Result<Event> {
        make_event(&self.date, &self.description, &self.category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_server_shape() {
        let records: Vec<EventRecord> = serde_json::from_str(
            r#"[{"date": "--12-06", "description": "Itsenäisyyspäivä", "category": "finland/flagday"}]"#,
        )
        .unwrap();
        let event = records[0].to_event().unwrap();
        assert!(matches!(event, Event::Annual(_)));
        assert_eq!(event.category().secondary(), Some("flagday"));
    }

    #[test]
    fn bad_date_is_reported() {
        let record = EventRecord {
            date: "yesterday".to_string(),
            description: "Nope".to_string(),
            category: "misc".to_string(),
        };
        assert!(record.to_event().is_err());
    }
}

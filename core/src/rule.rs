//! Verbal date rules such as "fourth thursday in november".
//!
//! A [`VerbalRule`] is parsed once and then resolved to a concrete date for
//! any year. Resolution enumerates every date of the month that falls on the
//! rule's weekday (there are always four or five) and picks one by position.
//!
//! ```
//! use chrono::NaiveDate;
//! use today_core::rule::VerbalRule;
//!
//! let thanksgiving = VerbalRule::parse("fourth thursday in november").unwrap();
//! assert_eq!(thanksgiving.resolve(2024).unwrap(), NaiveDate::from_ymd_opt(2024, 11, 28).unwrap());
//!
//! let memorial_day = VerbalRule::parse("last monday in may").unwrap();
//! assert_eq!(memorial_day.resolve(2024).unwrap(), NaiveDate::from_ymd_opt(2024, 5, 27).unwrap());
//! ```

use crate::error::{EventError, Result};
use chrono::{Datelike, Month, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;

/// Which occurrence of the weekday within the month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ordinal {
    /// 1st occurrence
    First,
    /// 2nd occurrence
    Second,
    /// 3rd occurrence
    Third,
    /// 4th occurrence
    Fourth,
    /// 5th occurrence; not every month has one
    Fifth,
    /// Final occurrence, whether 4th or 5th
    Last,
}

impl Ordinal {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "first" | "1st" => Some(Self::First),
            "second" | "2nd" => Some(Self::Second),
            "third" | "3rd" => Some(Self::Third),
            "fourth" | "4th" => Some(Self::Fourth),
            "fifth" | "5th" => Some(Self::Fifth),
            "last" => Some(Self::Last),
            _ => None,
        }
    }

    /// Zero-based position, `None` for [`Ordinal::Last`].
    const fn position(self) -> Option<usize> {
        match self {
            Self::First => Some(0),
            Self::Second => Some(1),
            Self::Third => Some(2),
            Self::Fourth => Some(3),
            Self::Fifth => Some(4),
            Self::Last => None,
        }
    }

    /// Lower-case word form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Fifth => "fifth",
            Self::Last => "last",
        }
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An "`<ordinal> <weekday> in <month>`" rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VerbalRule {
    ordinal: Ordinal,
    weekday: Weekday,
    month: Month,
}

impl VerbalRule {
    /// Build a rule from its parts.
    #[must_use]
    pub const fn new(ordinal: Ordinal, weekday: Weekday, month: Month) -> Self {
        Self {
            ordinal,
            weekday,
            month,
        }
    }

    /// Parse a phrase like `"second sunday in may"`.
    ///
    /// Matching is case-insensitive. Weekdays and months may be written in full
    /// or as three-letter abbreviations, and ordinals as words or `1st`..`5th`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnparsableRule`] if the phrase has the wrong shape
    /// or any token is not recognised.
    pub fn parse(text: &str) -> Result<Self> {
        let unparsable = || EventError::UnparsableRule(text.to_string());
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();

        let [ordinal, weekday, "in", month] = tokens.as_slice() else {
            return Err(unparsable());
        };

        let ordinal = Ordinal::parse(ordinal).ok_or_else(unparsable)?;
        let weekday = weekday.parse::<Weekday>().map_err(|_| unparsable())?;
        let month = month.parse::<Month>().map_err(|_| unparsable())?;

        Ok(Self::new(ordinal, weekday, month))
    }

    /// The ordinal part.
    #[must_use]
    pub const fn ordinal(&self) -> Ordinal {
        self.ordinal
    }

    /// The weekday part.
    #[must_use]
    pub const fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// The month part.
    #[must_use]
    pub const fn month(&self) -> Month {
        self.month
    }

    /// Every date in `year`'s month that falls on the rule's weekday, ascending.
    #[must_use]
    pub fn occurrences(&self, year: i32) -> Vec<NaiveDate> {
        let month = self.month.number_from_month();
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Vec::new();
        };

        first
            .iter_days()
            .take_while(|date| date.month() == month)
            .filter(|date| date.weekday() == self.weekday)
            .collect()
    }

    /// The concrete date this rule names in `year`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::OrdinalOutOfRange`] when the month has no such
    /// occurrence, e.g. the fifth Monday of a month with only four.
    pub fn resolve(&self, year: i32) -> Result<NaiveDate> {
        let occurrences = self.occurrences(year);

        let picked = match self.ordinal.position() {
            Some(index) => occurrences.get(index),
            None => occurrences.last(),
        };

        picked.copied().ok_or_else(|| EventError::OrdinalOutOfRange {
            ordinal: self.ordinal.to_string(),
            weekday: weekday_name(self.weekday).to_string(),
            month: self.month.name().to_lowercase(),
            year,
        })
    }
}

const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

impl FromStr for VerbalRule {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VerbalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} in {}",
            self.ordinal,
            weekday_name(self.weekday),
            self.month.name().to_lowercase()
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolve(rule: &str, year: i32) -> Result<NaiveDate> {
        VerbalRule::parse(rule).unwrap().resolve(year)
    }

    #[test]
    fn thanksgiving_2024() {
        assert_eq!(resolve("fourth thursday in november", 2024).unwrap(), date(2024, 11, 28));
    }

    #[test]
    fn last_monday_in_may_2024() {
        assert_eq!(resolve("last monday in may", 2024).unwrap(), date(2024, 5, 27));
    }

    #[test]
    fn finnish_mothers_day() {
        assert_eq!(resolve("second sunday in may", 2024).unwrap(), date(2024, 5, 12));
        assert_eq!(resolve("second sunday in may", 2025).unwrap(), date(2025, 5, 11));
    }

    #[test]
    fn first_weekday_on_the_first() {
        // 2024-09-01 is a Sunday
        assert_eq!(resolve("first sunday in september", 2024).unwrap(), date(2024, 9, 1));
    }

    #[test]
    fn last_picks_fifth_when_month_has_five() {
        // March 2024 has five Fridays: 1, 8, 15, 22, 29
        assert_eq!(resolve("last friday in march", 2024).unwrap(), date(2024, 3, 29));
        assert_eq!(resolve("fifth friday in march", 2024).unwrap(), date(2024, 3, 29));
    }

    #[test]
    fn last_picks_fourth_when_month_has_four() {
        // February 2023 has four Mondays: 6, 13, 20, 27
        assert_eq!(resolve("last monday in february", 2023).unwrap(), date(2023, 2, 27));
    }

    #[test]
    fn missing_fifth_occurrence_is_an_error() {
        let err = resolve("fifth monday in february", 2023).unwrap_err();
        assert_eq!(
            err,
            EventError::OrdinalOutOfRange {
                ordinal: "fifth".to_string(),
                weekday: "monday".to_string(),
                month: "february".to_string(),
                year: 2023,
            }
        );
    }

    #[test]
    fn leap_february_can_have_five() {
        // February 2024 starts on a Thursday and has 29 days
        assert_eq!(resolve("fifth thursday in february", 2024).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn every_month_has_four_or_five_occurrences() {
        for month in 1..=12u8 {
            let month = Month::try_from(month).unwrap();
            for weekday in [Weekday::Mon, Weekday::Wed, Weekday::Sun] {
                let rule = VerbalRule::new(Ordinal::First, weekday, month);
                let count = rule.occurrences(2025).len();
                assert!((4..=5).contains(&count), "{rule} had {count}");
            }
        }
    }

    #[test]
    fn resolved_dates_stay_in_month_and_weekday() {
        for month in 1..=12u8 {
            let month = Month::try_from(month).unwrap();
            let rule = VerbalRule::new(Ordinal::Last, Weekday::Sat, month);
            let resolved = rule.resolve(2026).unwrap();
            assert_eq!(resolved.month(), month.number_from_month());
            assert_eq!(resolved.weekday(), Weekday::Sat);
            assert!(resolved.day() > 21);
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_accepts_abbreviations() {
        let rule = VerbalRule::parse("  Fourth THU in Nov ").unwrap();
        assert_eq!(rule, VerbalRule::new(Ordinal::Fourth, Weekday::Thu, Month::November));
        assert_eq!(rule.to_string(), "fourth thursday in november");
        assert_eq!(VerbalRule::parse("2nd sunday in may").unwrap().ordinal(), Ordinal::Second);
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        for text in [
            "sixth monday in may",
            "fourth funday in november",
            "fourth thursday in novembruary",
            "fourth thursday of november",
            "fourth thursday",
            "",
        ] {
            assert!(
                matches!(VerbalRule::parse(text), Err(EventError::UnparsableRule(_))),
                "{text} should not parse"
            );
        }
    }
}

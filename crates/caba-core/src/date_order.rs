//! Ordering strategies for consolidated rows.
//!
//! Dates are opaque strings produced by extraction. The default strategy
//! compares them byte-wise, which is only chronological for ISO-like
//! `YYYY-MM-DD` strings. [`DateOrdering::Parsed`] is the opt-in alternative
//! for receipts that yield formats such as `05/01/2024`.

use std::cmp::Ordering;

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateOrdering {
    /// Raw string comparison.
    #[default]
    Lexical,
    /// Parse with the first matching `chrono` format; unparseable dates sort last.
    Parsed { formats: Vec<String> },
}

impl DateOrdering {
    /// Builds a strategy from a comma-separated list of `chrono` format strings.
    ///
    /// An empty or whitespace-only list yields [`DateOrdering::Lexical`].
    #[must_use]
    pub fn from_formats(list: &str) -> Self {
        let formats: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_owned)
            .collect();
        if formats.is_empty() {
            DateOrdering::Lexical
        } else {
            DateOrdering::Parsed { formats }
        }
    }

    /// Parses `date` with the configured formats. Always `None` for `Lexical`.
    #[must_use]
    pub fn parse(&self, date: &str) -> Option<NaiveDate> {
        match self {
            DateOrdering::Lexical => None,
            DateOrdering::Parsed { formats } => formats
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(date, f).ok()),
        }
    }

    /// Stable-sorts `items` by the date string returned from `key`.
    pub fn sort_by_date<T, F>(&self, items: &mut [T], key: F)
    where
        F: Fn(&T) -> &str,
    {
        match self {
            DateOrdering::Lexical => items.sort_by(|a, b| key(a).cmp(key(b))),
            DateOrdering::Parsed { .. } => {
                for item in items.iter() {
                    let date = key(item);
                    if self.parse(date).is_none() {
                        tracing::warn!(
                            date,
                            "date does not match any configured format; sorting it after parsed dates"
                        );
                    }
                }
                items.sort_by(|a, b| self.compare(key(a), key(b)));
            }
        }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.parse(a), self.parse(b)) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }
}

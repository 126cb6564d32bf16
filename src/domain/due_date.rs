use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored due date.
///
/// Text that does not parse as a date is kept verbatim so it survives
/// saves; it is labelled "Invalid date" and sorts with absent dates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DueDate {
    Date(NaiveDate),
    Invalid(String),
}

impl DueDate {
    /// Parses stored text, keeping it as `Invalid` when it is not a date
    pub fn parse(raw: &str) -> Self {
        match parse_due_date(raw) {
            Some(date) => Self::Date(date),
            None => Self::Invalid(raw.to_string()),
        }
    }

    /// The calendar date, `None` for unparseable text
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            Self::Invalid(_) => None,
        }
    }
}

impl From<NaiveDate> for DueDate {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

/// Visual emphasis attached to a due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Neutral,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neutral => write!(f, "neutral"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Display label and urgency for a task's due date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueLabel {
    pub label: String,
    pub urgency: Urgency,
}

impl DueLabel {
    fn new(label: impl Into<String>, urgency: Urgency) -> Self {
        Self {
            label: label.into(),
            urgency,
        }
    }

    /// Labels a parsed due date relative to `today`
    pub fn for_date(due: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(due) = due else {
            return Self::new("No due date", Urgency::Neutral);
        };

        if due == today {
            Self::new("Today", Urgency::Warning)
        } else if Some(due) == today.succ_opt() {
            Self::new("Tomorrow", Urgency::Info)
        } else if due < today {
            Self::new("Overdue", Urgency::Error)
        } else {
            Self::new(due.format("%b %-d, %Y").to_string(), Urgency::Neutral)
        }
    }

    /// Labels a task's stored due date
    pub fn for_due(due: Option<&DueDate>, today: NaiveDate) -> Self {
        match due {
            None => Self::for_date(None, today),
            Some(DueDate::Date(date)) => Self::for_date(Some(*date), today),
            Some(DueDate::Invalid(raw)) => Self::for_input(Some(raw.as_str()), today),
        }
    }

    /// Labels a raw date string. Blank input counts as absent and
    /// unparseable input yields "Invalid date".
    pub fn for_input(input: Option<&str>, today: NaiveDate) -> Self {
        match input.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::for_date(None, today),
            Some(raw) => match parse_due_date(raw) {
                Some(due) => Self::for_date(Some(due), today),
                None => Self::new("Invalid date", Urgency::Neutral),
            },
        }
    }
}

impl fmt::Display for DueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Parses `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

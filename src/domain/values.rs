use super::enums::TrackerType;
use super::task::DailyLog;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved stats key for the built-in global completion metric
pub const GLOBAL_COMPLETION: &str = "global_completion";

/// Day plans keyed by calendar date
pub type DailyLogs = BTreeMap<NaiveDate, DailyLog>;

/// Manual overrides: date -> tracker id (or `global_completion`) -> value
pub type StatsLog = BTreeMap<NaiveDate, BTreeMap<String, Option<TrackerValue>>>;

/// A tracker value for one day, either entered or derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackerValue {
    Flag(bool),
    Number(f64),
}

impl TrackerValue {
    /// Numeric reading; a flag counts as 1 or 0
    pub fn as_number(&self) -> f64 {
        match self {
            TrackerValue::Number(n) => *n,
            TrackerValue::Flag(true) => 1.0,
            TrackerValue::Flag(false) => 0.0,
        }
    }

    /// Boolean reading; a number counts as checked once it reaches 100
    pub fn as_flag(&self) -> bool {
        match self {
            TrackerValue::Flag(b) => *b,
            TrackerValue::Number(n) => *n >= 100.0,
        }
    }

    /// Parse user input for a tracker of the given type
    pub fn parse_for(kind: TrackerType, input: &str) -> Option<Self> {
        let input = input.trim();
        match kind {
            TrackerType::Check => match input.to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" | "x" => Some(TrackerValue::Flag(true)),
                "false" | "no" | "n" | "0" => Some(TrackerValue::Flag(false)),
                _ => None,
            },
            TrackerType::Percent | TrackerType::Count => {
                let n: f64 = input.trim_end_matches('%').parse().ok()?;
                n.is_finite().then_some(TrackerValue::Number(n))
            }
        }
    }
}

impl std::fmt::Display for TrackerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerValue::Flag(true) => f.write_str("yes"),
            TrackerValue::Flag(false) => f.write_str("no"),
            TrackerValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            TrackerValue::Number(n) => write!(f, "{:.1}", n),
        }
    }
}

use super::enums::TrackerType;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Category id that always exists and receives orphaned tasks
pub const UNCATEGORIZED: &str = "uncategorized";

/// `linkedCategoryId` value meaning "every category"
pub const ALL_CATEGORIES: &str = "all";

/// Day-of-week number, 0 = Sunday .. 6 = Saturday
pub fn weekday_number(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// A set of days of the week, stored as a list of 0 (Sunday) .. 6 (Saturday)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DaySet(u8);

impl DaySet {
    pub const fn empty() -> Self {
        DaySet(0)
    }

    /// Monday through Friday
    pub const fn weekdays() -> Self {
        DaySet(0b0011_1110)
    }

    /// Saturday and Sunday
    pub const fn weekend() -> Self {
        DaySet(0b0100_0001)
    }

    pub fn from_days(days: &[u8]) -> Result<Self, String> {
        let mut bits = 0u8;
        for &day in days {
            if day > 6 {
                return Err(format!("day of week {} out of range 0-6", day));
            }
            bits |= 1 << day;
        }
        Ok(DaySet(bits))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, day: u8) -> bool {
        day <= 6 && self.0 & (1 << day) != 0
    }

    /// Empty means "no restriction"
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.is_empty() || self.contains(weekday_number(date))
    }

    pub fn days(&self) -> Vec<u8> {
        (0..=6).filter(|d| self.contains(*d)).collect()
    }
}

impl TryFrom<Vec<u8>> for DaySet {
    type Error = String;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        DaySet::from_days(&days)
    }
}

impl From<DaySet> for Vec<u8> {
    fn from(set: DaySet) -> Self {
        set.days()
    }
}

impl std::fmt::Display for DaySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        if self.is_empty() {
            return f.write_str("every day");
        }
        let names: Vec<&str> = self.days().iter().map(|d| NAMES[*d as usize]).collect();
        f.write_str(&names.join(","))
    }
}

impl std::str::FromStr for DaySet {
    type Err = String;

    /// Parse "weekdays", "weekend", "every", or a comma list of day numbers
    /// or names like "1,3,5" / "mon,wed,fri"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "every" | "daily" => return Ok(DaySet::empty()),
            "weekdays" => return Ok(DaySet::weekdays()),
            "weekend" => return Ok(DaySet::weekend()),
            _ => {}
        }

        let mut days = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let day = match part.parse::<u8>() {
                Ok(n) => n,
                Err(_) => part
                    .parse::<Weekday>()
                    .map(|w| w.num_days_from_sunday() as u8)
                    .map_err(|_| format!("unknown day '{}'", part))?,
            };
            days.push(day);
        }
        DaySet::from_days(&days)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// A named preset selecting which categories' recurring tasks populate a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category_ids: BTreeSet<String>,
}

impl DayType {
    pub fn includes(&self, category_id: &str) -> bool {
        self.category_ids.contains(category_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringSubtaskTemplate {
    pub id: String,
    pub text: String,
    /// Empty or absent: included whenever the parent task is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_days: Option<DaySet>,
}

impl RecurringSubtaskTemplate {
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.recurrence_days.map_or(true, |days| days.matches(date))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTaskTemplate {
    pub id: String,
    pub text: String,
    pub category_id: String,
    /// Empty: every day
    #[serde(default)]
    pub days_of_week: DaySet,
    #[serde(default)]
    pub subtasks: Vec<RecurringSubtaskTemplate>,
}

impl RecurringTaskTemplate {
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.days_of_week.matches(date)
    }
}

/// What a linked tracker derives its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerLink<'a> {
    AllCategories,
    Category(&'a str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalTracker {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TrackerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_category_id: Option<String>,
}

impl GoalTracker {
    pub fn link(&self) -> Option<TrackerLink<'_>> {
        match self.linked_category_id.as_deref() {
            None | Some("") => None,
            Some(ALL_CATEGORIES) => Some(TrackerLink::AllCategories),
            Some(id) => Some(TrackerLink::Category(id)),
        }
    }
}

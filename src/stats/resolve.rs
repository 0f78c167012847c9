use crate::domain::{DailyLogs, GoalTracker, StatsLog, TrackerLink, TrackerValue, GLOBAL_COMPLETION};
use crate::planner::{completion_of, completion_percentage};
use chrono::NaiveDate;

/// What a statistics row measures
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric<'a> {
    /// Built-in task completion over all of a day's tasks
    Global,
    Tracker(&'a GoalTracker),
}

impl<'a> Metric<'a> {
    /// Key under which overrides for this metric are stored
    pub fn key(&self) -> &'a str {
        match self {
            Metric::Global => GLOBAL_COMPLETION,
            Metric::Tracker(tracker) => tracker.id.as_str(),
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Metric::Global => "Global Todos",
            Metric::Tracker(tracker) => tracker.name.as_str(),
        }
    }
}

/// Resolves a metric's value for a date: a stored override first, the value
/// derived from that day's tasks second
#[derive(Debug, Clone, Copy)]
pub struct ValueResolver<'a> {
    logs: &'a DailyLogs,
    overrides: &'a StatsLog,
}

impl<'a> ValueResolver<'a> {
    pub fn new(logs: &'a DailyLogs, overrides: &'a StatsLog) -> Self {
        Self { logs, overrides }
    }

    /// Non-null override for `(date, key)`, returned as stored
    pub fn override_value(&self, date: NaiveDate, key: &str) -> Option<TrackerValue> {
        self.overrides.get(&date)?.get(key).copied().flatten()
    }

    /// Value derived from task completion, ignoring overrides
    ///
    /// Global: completion of the day's log, `None` when no log exists.
    /// Linked tracker: completion of the day's tasks in the linked category,
    /// `None` without a log or without matching tasks. Unlinked tracker: `None`.
    pub fn derived_value(&self, date: NaiveDate, metric: Metric<'_>) -> Option<TrackerValue> {
        let log = self.logs.get(&date)?;
        match metric {
            Metric::Global => Some(TrackerValue::Number(completion_percentage(&log.tasks))),
            Metric::Tracker(tracker) => {
                let pct = match tracker.link()? {
                    TrackerLink::AllCategories if log.tasks.is_empty() => return None,
                    TrackerLink::AllCategories => completion_percentage(&log.tasks),
                    TrackerLink::Category(id) => {
                        let mut tasks = log.tasks_in_category(id).peekable();
                        tasks.peek()?;
                        completion_of(tasks)
                    }
                };
                Some(TrackerValue::Number(pct))
            }
        }
    }

    /// Effective value: override wins over the derived value
    pub fn resolve(&self, date: NaiveDate, metric: Metric<'_>) -> Option<TrackerValue> {
        self.override_value(date, metric.key())
            .or_else(|| self.derived_value(date, metric))
    }

    /// Global completion for a single table cell, 0 when nothing is known
    pub fn global_completion(&self, date: NaiveDate) -> f64 {
        self.resolve(date, Metric::Global)
            .map(|v| v.as_number())
            .unwrap_or(0.0)
    }
}

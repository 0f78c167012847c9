use super::files::{atomic_write, read_file};
use crate::domain::{
    Category, DailyLogs, DaySet, DayType, GoalTracker, RecurringTaskTemplate, StatsLog,
    TrackerType, UNCATEGORIZED,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Everything the planner persists, stored in state.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerData {
    pub categories: Vec<Category>,
    pub day_types: Vec<DayType>,
    pub recurring_tasks: Vec<RecurringTaskTemplate>,
    pub daily_logs: DailyLogs,
    #[serde(default = "default_trackers")]
    pub goal_trackers: Vec<GoalTracker>,
    #[serde(default)]
    pub stats_logs: StatsLog,
}

impl Default for PlannerData {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            day_types: default_day_types(),
            recurring_tasks: default_recurring_tasks(),
            daily_logs: DailyLogs::new(),
            goal_trackers: default_trackers(),
            stats_logs: StatsLog::new(),
        }
    }
}

fn category(id: &str, name: &str, color: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
    }
}

fn default_categories() -> Vec<Category> {
    vec![
        category("cat-1", "Work", "#3b82f6"),
        category("cat-2", "Personal", "#10b981"),
        category("cat-3", "Fitness", "#f97316"),
        category(UNCATEGORIZED, "Uncategorized", "#6b7280"),
    ]
}

fn recurring(id: &str, text: &str, category_id: &str, days: DaySet) -> RecurringTaskTemplate {
    RecurringTaskTemplate {
        id: id.to_string(),
        text: text.to_string(),
        category_id: category_id.to_string(),
        days_of_week: days,
        subtasks: Vec::new(),
    }
}

fn default_recurring_tasks() -> Vec<RecurringTaskTemplate> {
    vec![
        recurring("rt-1", "Check emails", "cat-1", DaySet::weekdays()),
        recurring("rt-2", "Daily Stand-up", "cat-1", DaySet::weekdays()),
        recurring("rt-3", "Read a book", "cat-2", DaySet::weekend()),
        recurring("rt-4", "Go for a walk", "cat-3", DaySet::weekend()),
    ]
}

fn default_day_types() -> Vec<DayType> {
    vec![
        DayType {
            id: "dt-1".to_string(),
            name: "Work Day".to_string(),
            category_ids: ["cat-1".to_string()].into_iter().collect(),
        },
        DayType {
            id: "dt-2".to_string(),
            name: "Rest Day".to_string(),
            category_ids: ["cat-2".to_string(), "cat-3".to_string()].into_iter().collect(),
        },
    ]
}

fn default_trackers() -> Vec<GoalTracker> {
    vec![GoalTracker {
        id: "gt-1".to_string(),
        name: "Fitness %".to_string(),
        kind: TrackerType::Percent,
        target: None,
        color: Some("#f97316".to_string()),
        linked_category_id: Some("cat-3".to_string()),
    }]
}

/// Load state.json, seeding default data when the file doesn't exist
pub fn load_state<P: AsRef<Path>>(path: P) -> Result<PlannerData> {
    let path = path.as_ref();

    let Some(content) = read_file(path)? else {
        info!(path = %path.display(), "no saved state, starting from defaults");
        return Ok(PlannerData::default());
    };

    let data: PlannerData = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse state file: {}", path.display()))?;
    debug!(
        path = %path.display(),
        days = data.daily_logs.len(),
        trackers = data.goal_trackers.len(),
        "loaded state"
    );
    Ok(data)
}

/// Save all collections to state.json
pub fn save_state<P: AsRef<Path>>(path: P, data: &PlannerData) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(data).context("Failed to serialize state")?;
    atomic_write(path, &json)?;
    debug!(path = %path.display(), "saved state");
    Ok(())
}

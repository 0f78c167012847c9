use crate::config::{Config, MAX_WEEKLY_COLUMNS};
use crate::domain::{
    new_id, Category, DailyLog, DaySet, DayType, GoalTracker, RecurringSubtaskTemplate,
    RecurringTaskTemplate, Task, TimeView, TrackerType, TrackerValue, ALL_CATEGORIES,
    GLOBAL_COMPLETION, UNCATEGORIZED,
};
use crate::error::{PlannerError, RefKind, Result};
use crate::persistence::{load_state, save_state, state_file, PlannerData};
use crate::planner::expand_day_type;
use crate::stats::{
    build_graph, build_table, graph_dates, navigate, Aggregator, DateRange, GraphData, Metric,
    StatsTable, ValueResolver,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Editable fields of a goal tracker
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerFields {
    pub name: String,
    pub kind: TrackerType,
    pub linked_category_id: Option<String>,
    pub target: Option<f64>,
    pub color: Option<String>,
}

/// Changes to a recurring task template; `None` leaves a field as is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateUpdate {
    pub text: Option<String>,
    pub category_id: Option<String>,
    pub days_of_week: Option<DaySet>,
}

/// Main application state: every collection plus the user configuration.
/// All mutations go through here, one at a time.
pub struct AppState {
    pub data: PlannerData,
    pub config: Config,
    pub needs_save: bool,
}

fn non_empty(text: &str, what: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PlannerError::InvalidValue(format!("{} cannot be empty", what)));
    }
    Ok(text.to_string())
}

impl AppState {
    pub fn new(data: PlannerData, config: Config) -> Self {
        Self {
            data,
            config,
            needs_save: false,
        }
    }

    /// Load state and config from a data directory
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let data = load_state(state_file(dir))?;
        let config = Config::load(dir)?;
        Ok(Self::new(data, config))
    }

    /// Save state to disk if anything changed
    pub fn save(&mut self, dir: &Path) -> anyhow::Result<()> {
        if self.needs_save {
            save_state(state_file(dir), &self.data)?;
            self.needs_save = false;
        }
        Ok(())
    }

    // ---- Day plans ----

    pub fn log(&self, date: NaiveDate) -> Option<&DailyLog> {
        self.data.daily_logs.get(&date)
    }

    /// The plan for `date`, created empty on first access
    pub fn log_for(&mut self, date: NaiveDate) -> &mut DailyLog {
        if !self.data.daily_logs.contains_key(&date) {
            debug!(%date, "creating empty day plan");
            self.needs_save = true;
        }
        self.data
            .daily_logs
            .entry(date)
            .or_insert_with(|| DailyLog::empty(date))
    }

    /// Existing plan for a task operation; a missing plan has no tasks to find
    fn log_with_task(&mut self, date: NaiveDate, task_id: &str) -> Result<&mut DailyLog> {
        self.data
            .daily_logs
            .get_mut(&date)
            .ok_or_else(|| PlannerError::unknown(RefKind::Task, task_id))
    }

    /// Apply a day type: manual tasks stay, recurring tasks are regenerated
    pub fn select_day_type(&mut self, date: NaiveDate, day_type_id: &str) -> Result<()> {
        let day_type = self
            .data
            .day_types
            .iter()
            .find(|dt| dt.id == day_type_id)
            .cloned()
            .ok_or_else(|| PlannerError::unknown(RefKind::DayType, day_type_id))?;

        let templates = self.data.recurring_tasks.clone();
        let log = self.log_for(date);
        let discarded = log.tasks.iter().filter(|t| t.is_recurring).count();
        log.tasks = expand_day_type(&day_type, date, &templates, &log.tasks);
        log.day_type_id = Some(day_type.id.clone());
        let generated = log.tasks.iter().filter(|t| t.is_recurring).count();

        if discarded > 0 {
            warn!(%date, discarded, day_type = %day_type.name, "recurring tasks regenerated, previous progress discarded");
        }
        info!(%date, generated, day_type = %day_type.name, "day type selected");
        self.needs_save = true;
        Ok(())
    }

    pub fn add_task(&mut self, date: NaiveDate, text: &str, category_id: &str) -> Result<String> {
        let text = non_empty(text, "Task text")?;
        self.category(category_id)?;
        let id = self.log_for(date).add_task(text, category_id);
        self.needs_save = true;
        Ok(id)
    }

    pub fn toggle_task(&mut self, date: NaiveDate, task_id: &str) -> Result<()> {
        self.log_with_task(date, task_id)?.toggle_task(task_id)?;
        self.needs_save = true;
        Ok(())
    }

    pub fn toggle_subtask(&mut self, date: NaiveDate, task_id: &str, subtask_id: &str) -> Result<()> {
        self.log_with_task(date, task_id)?
            .toggle_subtask(task_id, subtask_id)?;
        self.needs_save = true;
        Ok(())
    }

    pub fn delete_task(&mut self, date: NaiveDate, task_id: &str) -> Result<Task> {
        let task = self.log_with_task(date, task_id)?.delete_task(task_id)?;
        self.needs_save = true;
        Ok(task)
    }

    pub fn add_subtask(&mut self, date: NaiveDate, task_id: &str, text: &str) -> Result<String> {
        let text = non_empty(text, "Subtask text")?;
        let id = self.log_with_task(date, task_id)?.add_subtask(task_id, text)?;
        self.needs_save = true;
        Ok(id)
    }

    pub fn delete_subtask(&mut self, date: NaiveDate, task_id: &str, subtask_id: &str) -> Result<()> {
        self.log_with_task(date, task_id)?
            .delete_subtask(task_id, subtask_id)?;
        self.needs_save = true;
        Ok(())
    }

    /// Completion percentage of a day's tasks, 0 without a plan
    pub fn completion_for(&self, date: NaiveDate) -> f64 {
        self.log(date).map(DailyLog::completion).unwrap_or(0.0)
    }

    // ---- Categories ----

    pub fn category(&self, id: &str) -> Result<&Category> {
        self.data
            .categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| PlannerError::unknown(RefKind::Category, id))
    }

    /// Category id for an id or a case-insensitive name
    pub fn category_id_for(&self, key: &str) -> Result<String> {
        self.data
            .categories
            .iter()
            .find(|c| c.id == key)
            .or_else(|| self.data.categories.iter().find(|c| c.name.eq_ignore_ascii_case(key)))
            .map(|c| c.id.clone())
            .ok_or_else(|| PlannerError::unknown(RefKind::Category, key))
    }

    pub fn add_category(&mut self, name: &str, color: &str) -> Result<String> {
        let category = Category {
            id: new_id(),
            name: non_empty(name, "Category name")?,
            color: color.to_string(),
        };
        let id = category.id.clone();
        self.data.categories.push(category);
        self.needs_save = true;
        Ok(id)
    }

    pub fn update_category(&mut self, id: &str, name: Option<&str>, color: Option<&str>) -> Result<()> {
        let name = name.map(|n| non_empty(n, "Category name")).transpose()?;
        let category = self
            .data
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| PlannerError::unknown(RefKind::Category, id))?;
        if let Some(name) = name {
            category.name = name;
        }
        if let Some(color) = color {
            category.color = color.to_string();
        }
        self.needs_save = true;
        Ok(())
    }

    /// Delete a category: its templates go, its logged tasks move to uncategorized
    pub fn delete_category(&mut self, id: &str) -> Result<()> {
        if id == UNCATEGORIZED {
            return Err(PlannerError::ProtectedCategory(id.to_string()));
        }
        self.category(id)?;

        self.data.categories.retain(|c| c.id != id);
        self.data.recurring_tasks.retain(|rt| rt.category_id != id);
        for day_type in &mut self.data.day_types {
            day_type.category_ids.remove(id);
        }

        let mut moved = 0usize;
        for log in self.data.daily_logs.values_mut() {
            for task in log.tasks.iter_mut().filter(|t| t.category_id == id) {
                task.category_id = UNCATEGORIZED.to_string();
                moved += 1;
            }
        }
        info!(category = id, moved, "category deleted");
        self.needs_save = true;
        Ok(())
    }

    /// Move a category from one position to another; out-of-range is a no-op
    pub fn reorder_category(&mut self, from: usize, to: usize) -> bool {
        let len = self.data.categories.len();
        if from >= len || to >= len {
            return false;
        }
        let category = self.data.categories.remove(from);
        self.data.categories.insert(to, category);
        self.needs_save = true;
        true
    }

    // ---- Day types ----

    /// Day type id for an id or a case-insensitive name
    pub fn day_type_id_for(&self, key: &str) -> Result<String> {
        self.data
            .day_types
            .iter()
            .find(|dt| dt.id == key)
            .or_else(|| self.data.day_types.iter().find(|dt| dt.name.eq_ignore_ascii_case(key)))
            .map(|dt| dt.id.clone())
            .ok_or_else(|| PlannerError::unknown(RefKind::DayType, key))
    }

    pub fn add_day_type(&mut self, name: &str) -> Result<String> {
        let day_type = DayType {
            id: new_id(),
            name: non_empty(name, "Day type name")?,
            category_ids: BTreeSet::new(),
        };
        let id = day_type.id.clone();
        self.data.day_types.push(day_type);
        self.needs_save = true;
        Ok(id)
    }

    pub fn update_day_type(&mut self, id: &str, name: &str, category_ids: BTreeSet<String>) -> Result<()> {
        let name = non_empty(name, "Day type name")?;
        for category_id in &category_ids {
            self.category(category_id)?;
        }
        let day_type = self
            .data
            .day_types
            .iter_mut()
            .find(|dt| dt.id == id)
            .ok_or_else(|| PlannerError::unknown(RefKind::DayType, id))?;
        day_type.name = name;
        day_type.category_ids = category_ids;
        self.needs_save = true;
        Ok(())
    }

    /// Remove a day type; plans that used it keep their tasks
    pub fn delete_day_type(&mut self, id: &str) -> Result<()> {
        let before = self.data.day_types.len();
        self.data.day_types.retain(|dt| dt.id != id);
        if self.data.day_types.len() == before {
            return Err(PlannerError::unknown(RefKind::DayType, id));
        }
        self.needs_save = true;
        Ok(())
    }

    // ---- Recurring templates ----

    fn template_mut(&mut self, id: &str) -> Result<&mut RecurringTaskTemplate> {
        self.data
            .recurring_tasks
            .iter_mut()
            .find(|rt| rt.id == id)
            .ok_or_else(|| PlannerError::unknown(RefKind::Template, id))
    }

    pub fn add_template(&mut self, text: &str, category_id: &str, days_of_week: DaySet) -> Result<String> {
        let text = non_empty(text, "Task text")?;
        self.category(category_id)?;
        let template = RecurringTaskTemplate {
            id: new_id(),
            text,
            category_id: category_id.to_string(),
            days_of_week,
            subtasks: Vec::new(),
        };
        let id = template.id.clone();
        self.data.recurring_tasks.push(template);
        self.needs_save = true;
        Ok(id)
    }

    /// Update a template; tasks already generated from it are not touched
    pub fn update_template(&mut self, id: &str, update: TemplateUpdate) -> Result<()> {
        let text = update.text.as_deref().map(|t| non_empty(t, "Task text")).transpose()?;
        if let Some(category_id) = &update.category_id {
            self.category(category_id)?;
        }
        let template = self.template_mut(id)?;
        if let Some(text) = text {
            template.text = text;
        }
        if let Some(category_id) = update.category_id {
            template.category_id = category_id;
        }
        if let Some(days) = update.days_of_week {
            template.days_of_week = days;
        }
        self.needs_save = true;
        Ok(())
    }

    pub fn delete_template(&mut self, id: &str) -> Result<()> {
        let before = self.data.recurring_tasks.len();
        self.data.recurring_tasks.retain(|rt| rt.id != id);
        if self.data.recurring_tasks.len() == before {
            return Err(PlannerError::unknown(RefKind::Template, id));
        }
        self.needs_save = true;
        Ok(())
    }

    /// Add a subtask template; empty `days` means "whenever the parent occurs"
    pub fn add_template_subtask(&mut self, template_id: &str, text: &str, days: Option<DaySet>) -> Result<String> {
        let text = non_empty(text, "Subtask text")?;
        let subtask = RecurringSubtaskTemplate {
            id: new_id(),
            text,
            recurrence_days: days.filter(|d| !d.is_empty()),
        };
        let id = subtask.id.clone();
        self.template_mut(template_id)?.subtasks.push(subtask);
        self.needs_save = true;
        Ok(id)
    }

    pub fn delete_template_subtask(&mut self, template_id: &str, subtask_id: &str) -> Result<()> {
        let template = self.template_mut(template_id)?;
        let before = template.subtasks.len();
        template.subtasks.retain(|st| st.id != subtask_id);
        if template.subtasks.len() == before {
            return Err(PlannerError::unknown(RefKind::SubtaskTemplate, subtask_id));
        }
        self.needs_save = true;
        Ok(())
    }

    // ---- Goal trackers ----

    pub fn tracker(&self, id: &str) -> Result<&GoalTracker> {
        self.data
            .goal_trackers
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| PlannerError::unknown(RefKind::Tracker, id))
    }

    fn check_tracker_fields(&self, fields: &TrackerFields) -> Result<()> {
        non_empty(&fields.name, "Tracker name")?;
        match fields.linked_category_id.as_deref() {
            None | Some("") | Some(ALL_CATEGORIES) => {}
            Some(id) => {
                self.category(id)?;
            }
        }
        if let Some(target) = fields.target {
            if !target.is_finite() || target <= 0.0 {
                return Err(PlannerError::InvalidValue(format!("target must be positive, got {}", target)));
            }
        }
        Ok(())
    }

    pub fn add_tracker(&mut self, fields: TrackerFields) -> Result<String> {
        self.check_tracker_fields(&fields)?;
        let tracker = GoalTracker {
            id: new_id(),
            name: fields.name.trim().to_string(),
            kind: fields.kind,
            target: fields.target,
            color: fields.color,
            linked_category_id: fields.linked_category_id.filter(|id| !id.is_empty()),
        };
        let id = tracker.id.clone();
        self.data.goal_trackers.push(tracker);
        self.needs_save = true;
        Ok(id)
    }

    pub fn update_tracker(&mut self, id: &str, fields: TrackerFields) -> Result<()> {
        self.check_tracker_fields(&fields)?;
        let tracker = self
            .data
            .goal_trackers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| PlannerError::unknown(RefKind::Tracker, id))?;
        tracker.name = fields.name.trim().to_string();
        tracker.kind = fields.kind;
        tracker.target = fields.target;
        tracker.color = fields.color;
        tracker.linked_category_id = fields.linked_category_id.filter(|id| !id.is_empty());
        self.needs_save = true;
        Ok(())
    }

    /// Remove a tracker; its stored overrides stay in the stats log
    pub fn delete_tracker(&mut self, id: &str) -> Result<()> {
        let before = self.data.goal_trackers.len();
        self.data.goal_trackers.retain(|t| t.id != id);
        if self.data.goal_trackers.len() == before {
            return Err(PlannerError::unknown(RefKind::Tracker, id));
        }
        self.needs_save = true;
        Ok(())
    }

    // ---- Overrides ----

    /// Metric for a stats key: `global_completion` (or `global`), a tracker
    /// id, or a tracker name
    pub fn metric(&self, key: &str) -> Result<Metric<'_>> {
        if key == GLOBAL_COMPLETION || key.eq_ignore_ascii_case("global") {
            return Ok(Metric::Global);
        }
        self.data
            .goal_trackers
            .iter()
            .find(|t| t.id == key)
            .or_else(|| self.data.goal_trackers.iter().find(|t| t.name.eq_ignore_ascii_case(key)))
            .map(Metric::Tracker)
            .ok_or_else(|| PlannerError::unknown(RefKind::Tracker, key))
    }

    /// How values for a stats key are read; global completion is a percentage
    pub fn value_kind(&self, key: &str) -> Result<TrackerType> {
        Ok(match self.metric(key)? {
            Metric::Global => TrackerType::Percent,
            Metric::Tracker(tracker) => tracker.kind,
        })
    }

    /// Store a manual value for `(date, key)`; `None` clears it
    pub fn set_override(&mut self, date: NaiveDate, key: &str, value: Option<TrackerValue>) -> Result<()> {
        let Some(value) = value else {
            return self.clear_override(date, key);
        };
        let kind = self.value_kind(key)?;
        let stored_key = self.metric(key)?.key().to_string();

        if let TrackerValue::Number(n) = value {
            if !n.is_finite() {
                return Err(PlannerError::InvalidValue(format!("{} is not a number", n)));
            }
            if kind == TrackerType::Percent && !(0.0..=100.0).contains(&n) {
                return Err(PlannerError::InvalidValue(format!("{} is outside 0-100", n)));
            }
        }

        self.data
            .stats_logs
            .entry(date)
            .or_default()
            .insert(stored_key.clone(), Some(value));
        info!(%date, key = %stored_key, %value, "override set");
        self.needs_save = true;
        Ok(())
    }

    /// Remove a manual value so the derived value shows again
    pub fn clear_override(&mut self, date: NaiveDate, key: &str) -> Result<()> {
        let stored_key = self.metric(key)?.key().to_string();
        if let Some(entries) = self.data.stats_logs.get_mut(&date) {
            if entries.remove(&stored_key).is_some() {
                info!(%date, key = %stored_key, "override cleared");
                self.needs_save = true;
            }
            if entries.is_empty() {
                self.data.stats_logs.remove(&date);
            }
        }
        Ok(())
    }

    // ---- Statistics ----

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(
            ValueResolver::new(&self.data.daily_logs, &self.data.stats_logs),
            self.config.global_average,
        )
    }

    /// Table page around `reference`, moved `shift` pages back or forward
    pub fn stats_table(
        &self,
        view: TimeView,
        reference: NaiveDate,
        shift: i32,
        today: NaiveDate,
    ) -> Result<StatsTable> {
        let span = self.config.weekly_columns.clamp(1, MAX_WEEKLY_COLUMNS);
        let reference = navigate(view, reference, shift, span).ok_or_else(|| {
            PlannerError::InvalidDate(format!("cannot move {} {} pages from {}", view, shift, reference))
        })?;
        Ok(build_table(&self.aggregator(), &self.data.goal_trackers, view, reference, today, span))
    }

    /// Graph page for a metric key; check trackers have no trend line
    pub fn graph(
        &self,
        view: TimeView,
        today: NaiveDate,
        range: Option<DateRange>,
        metric_key: &str,
    ) -> Result<GraphData> {
        let metric = self.metric(metric_key)?;
        if let Metric::Tracker(tracker) = metric {
            if !tracker.kind.is_plottable() {
                return Err(PlannerError::InvalidValue(format!(
                    "check tracker '{}' cannot be plotted",
                    tracker.name
                )));
            }
        }
        if let Some(r) = range {
            if r.start > r.end {
                return Err(PlannerError::InvalidDate(format!("{} is after {}", r.start, r.end)));
            }
        }

        let dates = graph_dates(view, today, range);
        if dates.is_empty() {
            debug!(?view, %today, "graph window lies entirely before the floor");
        }
        Ok(build_graph(&self.aggregator(), &self.data.goal_trackers, &dates, view, metric))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Progress;
    use crate::stats::{Cell, Summary};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_app() -> AppState {
        AppState::new(PlannerData::default(), Config::default())
    }

    #[test]
    fn test_log_for_creates_empty_plan() {
        let mut app = create_test_app();
        let log = app.log_for(date(2025, 3, 12));
        assert_eq!(log.day_type_id, None);
        assert!(log.tasks.is_empty());
        assert!(app.needs_save);
    }

    #[test]
    fn test_select_work_day_on_wednesday() {
        let mut app = create_test_app();
        let wed = date(2025, 3, 12);
        app.select_day_type(wed, "dt-1").unwrap();

        let log = app.log(wed).unwrap();
        assert_eq!(log.day_type_id.as_deref(), Some("dt-1"));
        let texts: Vec<&str> = log.tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Check emails", "Daily Stand-up"]);
        assert!(log.tasks.iter().all(|t| t.is_recurring && !t.completed()));
    }

    #[test]
    fn test_select_rest_day_keeps_manual_tasks() {
        let mut app = create_test_app();
        let sat = date(2025, 3, 15);
        app.add_task(sat, "Call plumber", "cat-2").unwrap();
        app.select_day_type(sat, "dt-2").unwrap();

        let texts: Vec<&str> = app.log(sat).unwrap().tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Call plumber", "Read a book", "Go for a walk"]);
    }

    #[test]
    fn test_reselect_resets_recurring_progress() {
        let mut app = create_test_app();
        let wed = date(2025, 3, 12);
        app.select_day_type(wed, "dt-1").unwrap();
        let id = app.log(wed).unwrap().tasks[0].id.clone();
        app.toggle_task(wed, &id).unwrap();
        assert_eq!(app.completion_for(wed), 50.0);

        app.select_day_type(wed, "dt-1").unwrap();
        assert_eq!(app.log(wed).unwrap().tasks.len(), 2);
        assert_eq!(app.completion_for(wed), 0.0);
    }

    #[test]
    fn test_unknown_day_type_is_rejected() {
        let mut app = create_test_app();
        let wed = date(2025, 3, 12);
        let err = app.select_day_type(wed, "dt-x").unwrap_err();
        assert_eq!(err, PlannerError::unknown(RefKind::DayType, "dt-x"));
        assert!(app.log(wed).is_none());
    }

    #[test]
    fn test_task_actions() {
        let mut app = create_test_app();
        let day = date(2025, 3, 12);
        let id = app.add_task(day, "Write report", "cat-1").unwrap();
        let st = app.add_subtask(day, &id, "Outline").unwrap();
        app.add_subtask(day, &id, "Draft").unwrap();

        assert_eq!(
            app.toggle_task(day, &id),
            Err(PlannerError::DerivedCompletion(id.clone()))
        );
        app.toggle_subtask(day, &id, &st).unwrap();
        assert_eq!(app.completion_for(day), 50.0);

        app.delete_task(day, &id[..8]).unwrap();
        assert!(app.log(day).unwrap().tasks.is_empty());
    }

    #[test]
    fn test_delete_last_subtask_keeps_completion() {
        let mut app = create_test_app();
        let day = date(2025, 3, 12);
        let id = app.add_task(day, "Write report", "cat-1").unwrap();
        let st = app.add_subtask(day, &id, "Outline").unwrap();
        app.toggle_subtask(day, &id, &st).unwrap();
        app.delete_subtask(day, &id, &st).unwrap();

        let task = app.log(day).unwrap().task(&id).unwrap();
        assert_eq!(task.progress, Progress::Simple { completed: true });
    }

    #[test]
    fn test_task_action_without_plan() {
        let mut app = create_test_app();
        let err = app.toggle_task(date(2025, 3, 12), "abc").unwrap_err();
        assert_eq!(err, PlannerError::unknown(RefKind::Task, "abc"));
    }

    #[test]
    fn test_add_task_rejects_unknown_category_and_empty_text() {
        let mut app = create_test_app();
        let day = date(2025, 3, 12);
        assert!(matches!(
            app.add_task(day, "x", "nope"),
            Err(PlannerError::InvalidReference { kind: RefKind::Category, .. })
        ));
        assert!(matches!(app.add_task(day, "   ", "cat-1"), Err(PlannerError::InvalidValue(_))));
    }

    #[test]
    fn test_delete_category_cascades() {
        let mut app = create_test_app();
        let day = date(2025, 3, 12);
        app.select_day_type(day, "dt-1").unwrap();
        app.add_task(day, "Manual work", "cat-1").unwrap();

        app.delete_category("cat-1").unwrap();

        assert!(app.category("cat-1").is_err());
        assert!(app.data.recurring_tasks.iter().all(|rt| rt.category_id != "cat-1"));
        assert!(app.data.day_types[0].category_ids.is_empty());
        let log = app.log(day).unwrap();
        assert_eq!(log.tasks.len(), 3);
        assert!(log.tasks.iter().all(|t| t.category_id == UNCATEGORIZED));
    }

    #[test]
    fn test_uncategorized_is_protected() {
        let mut app = create_test_app();
        assert_eq!(
            app.delete_category(UNCATEGORIZED),
            Err(PlannerError::ProtectedCategory(UNCATEGORIZED.to_string()))
        );
        assert_eq!(app.data.categories.len(), 4);
    }

    #[test]
    fn test_reorder_categories() {
        let mut app = create_test_app();
        assert!(app.reorder_category(0, 2));
        let ids: Vec<&str> = app.data.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cat-2", "cat-3", "cat-1", UNCATEGORIZED]);

        assert!(!app.reorder_category(0, 9));
        assert!(!app.reorder_category(7, 0));
    }

    #[test]
    fn test_update_category() {
        let mut app = create_test_app();
        app.update_category("cat-1", Some("Job"), None).unwrap();
        let cat = app.category("cat-1").unwrap();
        assert_eq!(cat.name, "Job");
        assert_eq!(cat.color, "#3b82f6");
    }

    #[test]
    fn test_lookup_by_name() {
        let app = create_test_app();
        assert_eq!(app.category_id_for("fitness").unwrap(), "cat-3");
        assert_eq!(app.category_id_for("cat-1").unwrap(), "cat-1");
        assert_eq!(app.day_type_id_for("rest day").unwrap(), "dt-2");
        assert!(app.day_type_id_for("holiday").is_err());
    }

    #[test]
    fn test_day_type_lifecycle() {
        let mut app = create_test_app();
        let id = app.add_day_type("Travel Day").unwrap();
        assert!(app.data.day_types.last().unwrap().category_ids.is_empty());

        let cats: BTreeSet<String> = ["cat-3".to_string()].into_iter().collect();
        app.update_day_type(&id, "Travel", cats).unwrap();

        let sat = date(2025, 3, 15);
        app.select_day_type(sat, &id).unwrap();
        let texts: Vec<&str> = app.log(sat).unwrap().tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Go for a walk"]);

        app.delete_day_type(&id).unwrap();
        assert!(app.delete_day_type(&id).is_err());
        assert_eq!(app.log(sat).unwrap().tasks.len(), 1);
    }

    #[test]
    fn test_template_lifecycle() {
        let mut app = create_test_app();
        let id = app
            .add_template("Gym", "cat-3", DaySet::from_days(&[1, 3, 5]).unwrap())
            .unwrap();
        app.add_template_subtask(&id, "Stretch", None).unwrap();
        let legs = app
            .add_template_subtask(&id, "Legs", Some(DaySet::from_days(&[1]).unwrap()))
            .unwrap();

        let cats: BTreeSet<String> = ["cat-3".to_string()].into_iter().collect();
        let dt = app.add_day_type("Training").unwrap();
        app.update_day_type(&dt, "Training", cats).unwrap();

        let wed = date(2025, 3, 12);
        app.select_day_type(wed, &dt).unwrap();
        let task = &app.log(wed).unwrap().tasks[0];
        assert_eq!(task.text, "Gym");
        assert_eq!(task.subtasks().len(), 1);

        app.delete_template_subtask(&id, &legs).unwrap();
        app.update_template(
            &id,
            TemplateUpdate {
                text: Some("Gym session".to_string()),
                ..TemplateUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(app.data.recurring_tasks.last().unwrap().text, "Gym session");

        app.delete_template(&id).unwrap();
        assert!(app.delete_template(&id).is_err());
    }

    #[test]
    fn test_tracker_lifecycle() {
        let mut app = create_test_app();
        let fields = TrackerFields {
            name: "Pushups".to_string(),
            kind: TrackerType::Count,
            linked_category_id: None,
            target: Some(50.0),
            color: None,
        };
        let id = app.add_tracker(fields.clone()).unwrap();
        assert_eq!(app.tracker(&id).unwrap().target, Some(50.0));

        app.update_tracker(&id, TrackerFields { target: None, ..fields }).unwrap();
        assert_eq!(app.tracker(&id).unwrap().target, None);

        app.delete_tracker(&id).unwrap();
        assert!(app.tracker(&id).is_err());
    }

    #[test]
    fn test_tracker_link_must_exist() {
        let mut app = create_test_app();
        let fields = TrackerFields {
            name: "Linked".to_string(),
            kind: TrackerType::Percent,
            linked_category_id: Some("cat-9".to_string()),
            target: None,
            color: None,
        };
        assert!(app.add_tracker(fields.clone()).is_err());

        let all = TrackerFields {
            linked_category_id: Some(ALL_CATEGORIES.to_string()),
            ..fields
        };
        assert!(app.add_tracker(all).is_ok());
    }

    #[test]
    fn test_override_beats_derived_value() {
        let mut app = create_test_app();
        let sat = date(2025, 3, 15);
        app.select_day_type(sat, "dt-2").unwrap();
        let walk = app.log(sat).unwrap().tasks[1].id.clone();
        app.toggle_task(sat, &walk).unwrap();

        let resolver = ValueResolver::new(&app.data.daily_logs, &app.data.stats_logs);
        let fitness = Metric::Tracker(app.tracker("gt-1").unwrap());
        assert_eq!(resolver.resolve(sat, fitness), Some(TrackerValue::Number(100.0)));

        app.set_override(sat, "gt-1", Some(TrackerValue::Number(40.0))).unwrap();
        let resolver = ValueResolver::new(&app.data.daily_logs, &app.data.stats_logs);
        let fitness = Metric::Tracker(app.tracker("gt-1").unwrap());
        assert_eq!(resolver.resolve(sat, fitness), Some(TrackerValue::Number(40.0)));

        app.set_override(sat, "gt-1", None).unwrap();
        assert!(app.data.stats_logs.get(&sat).is_none());
    }

    #[test]
    fn test_global_override_key() {
        let mut app = create_test_app();
        let day = date(2025, 3, 12);
        app.set_override(day, "global", Some(TrackerValue::Number(80.0))).unwrap();
        assert_eq!(
            app.data.stats_logs[&day].get(GLOBAL_COMPLETION),
            Some(&Some(TrackerValue::Number(80.0)))
        );
        assert!(matches!(
            app.set_override(day, "global", Some(TrackerValue::Number(120.0))),
            Err(PlannerError::InvalidValue(_))
        ));
        assert!(app.set_override(day, "missing", Some(TrackerValue::Flag(true))).is_err());
    }

    #[test]
    fn test_stats_table_shift() {
        let mut app = create_test_app();
        let wed = date(2025, 3, 12);
        app.set_override(wed, "global", Some(TrackerValue::Number(70.0))).unwrap();

        let table = app.stats_table(TimeView::Daily, date(2025, 3, 11), 1, date(2025, 10, 1)).unwrap();
        assert_eq!(table.label, "Wednesday, March 12, 2025");
        assert_eq!(
            table.rows[0].cells[0],
            Cell::Entry {
                value: Some(TrackerValue::Number(70.0)),
                kind: TrackerType::Percent,
                target: None,
            }
        );
    }

    #[test]
    fn test_stats_table_shift_out_of_calendar() {
        let app = create_test_app();
        let today = date(2025, 3, 12);
        assert!(matches!(
            app.stats_table(TimeView::Daily, today, 200_000_000, today),
            Err(PlannerError::InvalidDate(_))
        ));
        assert!(matches!(
            app.stats_table(TimeView::Weekly, today, 50_000_000, today),
            Err(PlannerError::InvalidDate(_))
        ));
        let mut wide = create_test_app();
        wide.config.weekly_columns = 20_000_000;
        let table = wide.stats_table(TimeView::Weekly, today, 0, today).unwrap();
        assert_eq!(table.columns.len(), MAX_WEEKLY_COLUMNS as usize);

        // Yearly pages never move
        assert!(app.stats_table(TimeView::Yearly, today, i32::MAX, today).is_ok());
    }

    #[test]
    fn test_graph_rejects_check_tracker() {
        let mut app = create_test_app();
        let id = app
            .add_tracker(TrackerFields {
                name: "Meditated".to_string(),
                kind: TrackerType::Check,
                linked_category_id: None,
                target: None,
                color: None,
            })
            .unwrap();
        let today = date(2025, 3, 12);
        assert!(app.graph(TimeView::Daily, today, None, &id).is_err());

        let graph = app.graph(TimeView::Daily, today, None, "global").unwrap();
        assert_eq!(graph.metric, "Global Todos");
        // 2025-02-11 .. 2025-03-12
        assert_eq!(graph.trend.len(), 30);
        assert_eq!(graph.comparative.len(), 1);
    }

    #[test]
    fn test_monthly_aggregate_through_app() {
        let mut app = create_test_app();
        app.set_override(date(2025, 3, 3), "gt-1", Some(TrackerValue::Number(50.0))).unwrap();
        app.set_override(date(2025, 3, 4), "gt-1", Some(TrackerValue::Number(75.0))).unwrap();

        let table = app.stats_table(TimeView::Monthly, date(2025, 3, 1), 0, date(2025, 3, 31)).unwrap();
        let fitness = &table.rows[1];
        assert_eq!(fitness.name, "Fitness %");
        assert_eq!(
            fitness.cells[2],
            Cell::Summary {
                summary: Summary::Value(63),
                kind: TrackerType::Percent,
            }
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut app = create_test_app();
        let day = date(2025, 3, 12);
        app.select_day_type(day, "dt-1").unwrap();
        app.save(temp_dir.path()).unwrap();
        assert!(!app.needs_save);

        let loaded = AppState::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.data, app.data);
    }
}

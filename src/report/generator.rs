use super::markdown::{render_graph, render_table};
use crate::app::AppState;
use crate::domain::{DailyLog, TimeView, GLOBAL_COMPLETION};
use crate::persistence::atomic_write;
use crate::stats::round_half_up;
use anyhow::Result;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

fn render_day_plan(app: &AppState, log: Option<&DailyLog>) -> String {
    let mut out = String::from("## Day Plan\n\n");

    let Some(log) = log.filter(|l| !l.tasks.is_empty()) else {
        out.push_str("_Nothing planned._\n\n");
        return out;
    };

    if let Some(day_type) = log
        .day_type_id
        .as_deref()
        .and_then(|id| app.data.day_types.iter().find(|dt| dt.id == id))
    {
        out.push_str(&format!("- **Day Type:** {}\n", day_type.name));
    }
    out.push_str(&format!(
        "- **Completion:** {}%\n\n",
        round_half_up(log.completion())
    ));

    // Tasks grouped under categories, in category order
    for category in &app.data.categories {
        let mut tasks = log.tasks_in_category(&category.id).peekable();
        if tasks.peek().is_none() {
            continue;
        }
        out.push_str(&format!("### {}\n\n", category.name));
        for task in tasks {
            let mark = if task.completed() { "x" } else { " " };
            let recurring = if task.is_recurring { " (recurring)" } else { "" };
            out.push_str(&format!("- [{}] {}{}\n", mark, task.text, recurring));
            for subtask in task.subtasks() {
                let mark = if subtask.completed { "x" } else { " " };
                out.push_str(&format!("  - [{}] {}\n", mark, subtask.text));
            }
        }
        out.push('\n');
    }

    out
}

/// Build a markdown report: the day plan for `reference`, the statistics
/// table page containing it, and the global trend for the same view
pub fn generate_report(
    app: &AppState,
    view: TimeView,
    reference: NaiveDate,
    today: NaiveDate,
) -> Result<String> {
    let mut report = format!("# Daygrid Report - {}\n\n", reference);

    report.push_str(&render_day_plan(app, app.log(reference)));

    let table = app.stats_table(view, reference, 0, today)?;
    report.push_str(&render_table(&table));
    report.push('\n');

    let graph = app.graph(view, today, None, GLOBAL_COMPLETION)?;
    report.push_str(&render_graph(&graph));

    Ok(report)
}

/// Write the report to `output`, or return it untouched for stdout
pub fn write_report(report: &str, output: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(path) = output else {
        return Ok(None);
    };
    atomic_write(path, report)?;
    info!(path = %path.display(), "report written");
    Ok(Some(path.to_path_buf()))
}

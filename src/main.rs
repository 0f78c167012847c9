use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use daygrid::app::{AppState, TemplateUpdate, TrackerFields};
use daygrid::config::Config;
use daygrid::domain::{DailyLog, DaySet, TimeView, TrackerType, TrackerValue, UNCATEGORIZED};
use daygrid::logging;
use daygrid::persistence::{ensure_data_dir, init_local_data_dir};
use daygrid::report::{generate_report, render_graph, render_table, write_report};
use daygrid::stats::DateRange;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "daygrid")]
#[command(version, about = "A day planner and habit tracker with day types, recurring tasks and goal statistics", long_about = None)]
struct Cli {
    /// More log output on stderr (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .daygrid directory in the current directory
    Init,
    /// Show the plan for a day
    Day {
        /// Date (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Apply a day type, regenerating the day's recurring tasks
    Plan {
        /// Day type id or name
        day_type: String,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Add a task to a day
    Add {
        text: String,
        /// Category id or name
        #[arg(short, long, default_value = UNCATEGORIZED)]
        category: String,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Toggle a task, or one of its subtasks
    Toggle {
        /// Task id or unique id prefix
        task: String,
        #[arg(short, long)]
        subtask: Option<String>,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Remove a task, or one of its subtasks
    Remove {
        task: String,
        #[arg(short, long)]
        subtask: Option<String>,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Add a subtask to a task
    Subtask {
        task: String,
        text: String,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Show the statistics table
    Table {
        /// daily, weekly, monthly or yearly
        #[arg(long)]
        view: Option<TimeView>,
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Pages to move back (negative) or forward
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        shift: i32,
    },
    /// Show the trend and comparison charts
    Graph {
        /// daily, weekly, monthly, yearly or custom
        #[arg(long)]
        view: Option<TimeView>,
        /// Start of a custom range
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,
        /// End of a custom range
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
        /// "global" or a tracker id or name
        #[arg(short, long, default_value = "global")]
        metric: String,
    },
    /// Set a manual value for a tracker (or "global") on a day
    Set {
        key: String,
        value: String,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Clear a manual value so the derived value shows again
    Clear {
        key: String,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        view: Option<TimeView>,
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Output file path. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryCommand,
    },
    /// Manage day types
    Daytype {
        #[command(subcommand)]
        action: DayTypeCommand,
    },
    /// Manage recurring task templates
    Template {
        #[command(subcommand)]
        action: TemplateCommand,
    },
    /// Manage goal trackers
    Tracker {
        #[command(subcommand)]
        action: TrackerCommand,
    },
}

#[derive(Subcommand)]
enum CategoryCommand {
    Add {
        name: String,
        #[arg(short, long, default_value = "#6b7280")]
        color: String,
    },
    Update {
        category: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    Remove { category: String },
    /// Move a category from one position to another (0-based)
    Move { from: usize, to: usize },
    List,
}

#[derive(Subcommand)]
enum DayTypeCommand {
    Add { name: String },
    Update {
        day_type: String,
        #[arg(short, long)]
        name: Option<String>,
        /// Comma-separated category ids or names
        #[arg(short, long, value_delimiter = ',')]
        categories: Option<Vec<String>>,
    },
    Remove { day_type: String },
    List,
}

#[derive(Subcommand)]
enum TemplateCommand {
    Add {
        text: String,
        #[arg(short, long, default_value = UNCATEGORIZED)]
        category: String,
        /// "weekdays", "weekend", "mon,wed" or "1,3". Defaults to every day.
        #[arg(long, default_value = "every")]
        days: DaySet,
    },
    Update {
        template: String,
        #[arg(short, long)]
        text: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        days: Option<DaySet>,
    },
    Remove { template: String },
    /// Add a subtask template
    Subtask {
        template: String,
        text: String,
        /// Days the subtask appears on. Defaults to whenever the task does.
        #[arg(long)]
        days: Option<DaySet>,
    },
    /// Remove a subtask template
    RemoveSubtask { template: String, subtask: String },
    List,
}

#[derive(Subcommand)]
enum TrackerCommand {
    Add {
        name: String,
        /// percent, count or check
        #[arg(short, long, value_parser = parse_tracker_type, default_value = "percent")]
        kind: TrackerType,
        /// Category id or name to derive values from, or "all"
        #[arg(short, long)]
        link: Option<String>,
        #[arg(short, long)]
        target: Option<f64>,
        #[arg(long)]
        color: Option<String>,
    },
    Update {
        tracker: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, value_parser = parse_tracker_type)]
        kind: Option<TrackerType>,
        #[arg(short, long)]
        link: Option<String>,
        #[arg(short, long)]
        target: Option<f64>,
        #[arg(long)]
        color: Option<String>,
    },
    Remove { tracker: String },
    List,
}

fn parse_tracker_type(s: &str) -> Result<TrackerType, String> {
    TrackerType::from_tag(s).ok_or_else(|| format!("unknown tracker type '{}'", s))
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn print_day(app: &AppState, log: &DailyLog) {
    let day_type = log
        .day_type_id
        .as_deref()
        .and_then(|id| app.data.day_types.iter().find(|dt| dt.id == id))
        .map(|dt| dt.name.as_str())
        .unwrap_or("-");
    println!("{}  day type: {}  completion: {:.0}%", log.date.format("%A, %B %-d, %Y"), day_type, log.completion());

    if log.tasks.is_empty() {
        println!("  (no tasks)");
        return;
    }
    for task in &log.tasks {
        let category = app
            .category(&task.category_id)
            .map(|c| c.name.as_str())
            .unwrap_or("?");
        let mark = if task.completed() { "x" } else { " " };
        let recurring = if task.is_recurring { " ↻" } else { "" };
        println!("  [{}] {}  {}  ({}){}", mark, short_id(&task.id), task.text, category, recurring);
        for subtask in task.subtasks() {
            let mark = if subtask.completed { "x" } else { " " };
            println!("      [{}] {}  {}", mark, short_id(&subtask.id), subtask.text);
        }
    }
}

/// Resolve a category given by id or name, keeping "all" for trackers
fn tracker_link(app: &AppState, link: Option<String>) -> Result<Option<String>> {
    match link.as_deref() {
        None | Some("") => Ok(None),
        Some(daygrid::domain::ALL_CATEGORIES) => Ok(link),
        Some(key) => Ok(Some(app.category_id_for(key)?)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Commands::Init = cli.command {
        let current_dir = std::env::current_dir().context("Could not determine current directory")?;
        let data_dir = init_local_data_dir(&current_dir)?;
        Config::default().save(&data_dir)?;
        println!("Initialized daygrid directory: {}", data_dir.display());
        println!();
        println!("Daygrid will now use this local directory for its data.");
        return Ok(());
    }

    let data_dir = ensure_data_dir()?;
    tracing::debug!(dir = %data_dir.display(), "using data directory");
    let mut app = AppState::load(&data_dir)?;
    let today = Local::now().date_naive();

    run(&mut app, cli.command, today)?;
    app.save(&data_dir)?;
    Ok(())
}

fn run(app: &mut AppState, command: Commands, today: NaiveDate) -> Result<()> {
    match command {
        Commands::Init => unreachable!("handled before loading state"),
        Commands::Day { date } => {
            let date = date.unwrap_or(today);
            let log = app.log_for(date).clone();
            print_day(app, &log);
        }
        Commands::Plan { day_type, date } => {
            let date = date.unwrap_or(today);
            let id = app.day_type_id_for(&day_type)?;
            app.select_day_type(date, &id)?;
            let log = app.log_for(date).clone();
            print_day(app, &log);
        }
        Commands::Add { text, category, date } => {
            let category = app.category_id_for(&category)?;
            let id = app.add_task(date.unwrap_or(today), &text, &category)?;
            println!("Added task {}", short_id(&id));
        }
        Commands::Toggle { task, subtask, date } => {
            let date = date.unwrap_or(today);
            match subtask {
                Some(subtask) => app.toggle_subtask(date, &task, &subtask)?,
                None => app.toggle_task(date, &task)?,
            }
            println!("Completion: {:.0}%", app.completion_for(date));
        }
        Commands::Remove { task, subtask, date } => {
            let date = date.unwrap_or(today);
            match subtask {
                Some(subtask) => {
                    app.delete_subtask(date, &task, &subtask)?;
                    println!("Removed subtask");
                }
                None => {
                    let removed = app.delete_task(date, &task)?;
                    println!("Removed task \"{}\"", removed.text);
                }
            }
        }
        Commands::Subtask { task, text, date } => {
            let id = app.add_subtask(date.unwrap_or(today), &task, &text)?;
            println!("Added subtask {}", short_id(&id));
        }
        Commands::Table { view, date, shift } => {
            let view = view.unwrap_or(app.config.default_table_view);
            let table = app.stats_table(view, date.unwrap_or(today), shift, today)?;
            print!("{}", render_table(&table));
        }
        Commands::Graph { view, start, end, metric } => {
            let range = start.zip(end).map(|(s, e)| DateRange::new(s, e));
            let view = match (view, range) {
                (Some(v), _) => v,
                (None, Some(_)) => TimeView::Custom,
                (None, None) => app.config.default_graph_view,
            };
            let graph = app.graph(view, today, range, &metric)?;
            print!("{}", render_graph(&graph));
        }
        Commands::Set { key, value, date } => {
            let kind = app.value_kind(&key)?;
            let parsed = TrackerValue::parse_for(kind, &value)
                .with_context(|| format!("'{}' is not a valid {} value", value, kind.to_tag()))?;
            app.set_override(date.unwrap_or(today), &key, Some(parsed))?;
            println!("Set {} = {}", key, parsed);
        }
        Commands::Clear { key, date } => {
            app.clear_override(date.unwrap_or(today), &key)?;
            println!("Cleared {}", key);
        }
        Commands::Report { view, date, output } => {
            let view = view.unwrap_or(app.config.default_table_view);
            let report = generate_report(app, view, date.unwrap_or(today), today)?;
            match write_report(&report, output.as_deref())? {
                Some(path) => println!("Report generated: {}", path.display()),
                None => print!("{}", report),
            }
        }
        Commands::Category { action } => run_category(app, action)?,
        Commands::Daytype { action } => run_day_type(app, action)?,
        Commands::Template { action } => run_template(app, action)?,
        Commands::Tracker { action } => run_tracker(app, action)?,
    }
    Ok(())
}

fn run_category(app: &mut AppState, action: CategoryCommand) -> Result<()> {
    match action {
        CategoryCommand::Add { name, color } => {
            let id = app.add_category(&name, &color)?;
            println!("Added category {}", id);
        }
        CategoryCommand::Update { category, name, color } => {
            let id = app.category_id_for(&category)?;
            app.update_category(&id, name.as_deref(), color.as_deref())?;
        }
        CategoryCommand::Remove { category } => {
            let id = app.category_id_for(&category)?;
            app.delete_category(&id)?;
            println!("Removed category; its tasks moved to {}", UNCATEGORIZED);
        }
        CategoryCommand::Move { from, to } => {
            if !app.reorder_category(from, to) {
                println!("Nothing moved: positions must be below {}", app.data.categories.len());
            }
        }
        CategoryCommand::List => {
            for (idx, c) in app.data.categories.iter().enumerate() {
                println!("{:>2}  {:<14} {}  {}", idx, c.id, c.color, c.name);
            }
        }
    }
    Ok(())
}

fn run_day_type(app: &mut AppState, action: DayTypeCommand) -> Result<()> {
    match action {
        DayTypeCommand::Add { name } => {
            let id = app.add_day_type(&name)?;
            println!("Added day type {}", id);
        }
        DayTypeCommand::Update { day_type, name, categories } => {
            let id = app.day_type_id_for(&day_type)?;
            let current = app
                .data
                .day_types
                .iter()
                .find(|dt| dt.id == id)
                .cloned()
                .context("day type vanished")?;
            let category_ids = match categories {
                Some(keys) => keys
                    .iter()
                    .map(|k| app.category_id_for(k.trim()))
                    .collect::<daygrid::Result<BTreeSet<String>>>()?,
                None => current.category_ids,
            };
            app.update_day_type(&id, name.as_deref().unwrap_or(&current.name), category_ids)?;
        }
        DayTypeCommand::Remove { day_type } => {
            let id = app.day_type_id_for(&day_type)?;
            app.delete_day_type(&id)?;
        }
        DayTypeCommand::List => {
            for dt in &app.data.day_types {
                let names: Vec<&str> = dt
                    .category_ids
                    .iter()
                    .map(|id| app.category(id).map(|c| c.name.as_str()).unwrap_or(id.as_str()))
                    .collect();
                println!("{:<14} {:<16} [{}]", dt.id, dt.name, names.join(", "));
            }
        }
    }
    Ok(())
}

fn run_template(app: &mut AppState, action: TemplateCommand) -> Result<()> {
    match action {
        TemplateCommand::Add { text, category, days } => {
            let category = app.category_id_for(&category)?;
            let id = app.add_template(&text, &category, days)?;
            println!("Added recurring task {}", id);
        }
        TemplateCommand::Update { template, text, category, days } => {
            let category_id = category.map(|c| app.category_id_for(&c)).transpose()?;
            app.update_template(
                &template,
                TemplateUpdate {
                    text,
                    category_id,
                    days_of_week: days,
                },
            )?;
        }
        TemplateCommand::Remove { template } => app.delete_template(&template)?,
        TemplateCommand::Subtask { template, text, days } => {
            let id = app.add_template_subtask(&template, &text, days)?;
            println!("Added recurring subtask {}", id);
        }
        TemplateCommand::RemoveSubtask { template, subtask } => {
            app.delete_template_subtask(&template, &subtask)?
        }
        TemplateCommand::List => {
            for rt in &app.data.recurring_tasks {
                let category = app
                    .category(&rt.category_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or("?");
                println!("{:<14} {:<24} {:<12} {}", rt.id, rt.text, category, rt.days_of_week);
                for st in &rt.subtasks {
                    let days = st
                        .recurrence_days
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "with task".to_string());
                    println!("    {:<14} {:<20} {}", st.id, st.text, days);
                }
            }
        }
    }
    Ok(())
}

fn run_tracker(app: &mut AppState, action: TrackerCommand) -> Result<()> {
    match action {
        TrackerCommand::Add { name, kind, link, target, color } => {
            let linked_category_id = tracker_link(app, link)?;
            let id = app.add_tracker(TrackerFields {
                name,
                kind,
                linked_category_id,
                target,
                color,
            })?;
            println!("Added tracker {}", id);
        }
        TrackerCommand::Update { tracker, name, kind, link, target, color } => {
            let current = app.tracker(&tracker)?.clone();
            let linked_category_id = match link {
                Some(link) => tracker_link(app, Some(link))?,
                None => current.linked_category_id,
            };
            app.update_tracker(
                &current.id,
                TrackerFields {
                    name: name.unwrap_or(current.name),
                    kind: kind.unwrap_or(current.kind),
                    linked_category_id,
                    target: target.or(current.target),
                    color: color.or(current.color),
                },
            )?;
        }
        TrackerCommand::Remove { tracker } => app.delete_tracker(&tracker)?,
        TrackerCommand::List => {
            for t in &app.data.goal_trackers {
                let link = t.linked_category_id.as_deref().unwrap_or("-");
                let target = t.target.map(|v| TrackerValue::Number(v).to_string()).unwrap_or_else(|| "-".to_string());
                println!("{:<14} {:<16} {:<8} link: {:<14} target: {}", t.id, t.name, t.kind.to_tag(), link, target);
            }
        }
    }
    Ok(())
}

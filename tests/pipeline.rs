use chrono::NaiveDate;
use daygrid::app::{AppState, TrackerFields};
use daygrid::config::Config;
use daygrid::domain::{TimeView, TrackerType, TrackerValue};
use daygrid::persistence::PlannerData;
use daygrid::stats::{Cell, GlobalAverage, Summary};
use pretty_assertions::assert_eq;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn app() -> AppState {
    AppState::new(PlannerData::default(), Config::default())
}

/// Plan a work day and complete `done` of its recurring tasks
fn work_day(app: &mut AppState, day: NaiveDate, done: usize) {
    app.select_day_type(day, "dt-1").unwrap();
    let ids: Vec<String> = app.log(day).unwrap().tasks.iter().map(|t| t.id.clone()).collect();
    for id in ids.iter().take(done) {
        app.toggle_task(day, id).unwrap();
    }
}

#[test]
fn weekly_table_from_planned_days() {
    let mut app = app();
    work_day(&mut app, date(2025, 3, 10), 2);
    work_day(&mut app, date(2025, 3, 11), 1);
    work_day(&mut app, date(2025, 3, 12), 0);
    work_day(&mut app, date(2025, 3, 17), 2);

    let table = app.stats_table(TimeView::Weekly, date(2025, 3, 12), 0, date(2025, 3, 20)).unwrap();

    assert_eq!(table.label, "Mar 10 - Apr 13, 2025");
    let headers: Vec<&str> = table.columns.iter().map(|c| c.header.as_str()).collect();
    assert_eq!(
        headers,
        vec!["Mar 10 - 16", "Mar 17 - 23", "Mar 24 - 30", "Mar 31 - Apr 6", "Apr 7 - 13"]
    );

    let global = &table.rows[0];
    assert_eq!(global.name, "Global Todos");
    let shown: Vec<String> = global.cells.iter().map(|c| c.to_string()).collect();
    // (100 + 50 + 0) / 3 logged days
    assert_eq!(shown, vec!["50%", "100%", "0%", "0%", "0%"]);

    // Fitness has no cat-3 tasks on work days and no overrides
    let fitness = &table.rows[1];
    assert_eq!(fitness.cells[0].to_string(), "-");
}

#[test]
fn active_days_policy_skips_zero_days() {
    let mut app = app();
    app.config.global_average = GlobalAverage::ActiveDays;
    work_day(&mut app, date(2025, 3, 10), 2);
    work_day(&mut app, date(2025, 3, 11), 1);
    work_day(&mut app, date(2025, 3, 12), 0);

    let table = app.stats_table(TimeView::Weekly, date(2025, 3, 10), 0, date(2025, 3, 20)).unwrap();
    assert_eq!(
        table.rows[0].cells[0],
        Cell::Summary {
            summary: Summary::Value(75),
            kind: TrackerType::Percent,
        }
    );
}

#[test]
fn overrides_flow_into_monthly_and_yearly_views() {
    let mut app = app();
    let pushups = app
        .add_tracker(TrackerFields {
            name: "Pushups".to_string(),
            kind: TrackerType::Count,
            linked_category_id: None,
            target: Some(100.0),
            color: None,
        })
        .unwrap();
    let meditated = app
        .add_tracker(TrackerFields {
            name: "Meditated".to_string(),
            kind: TrackerType::Check,
            linked_category_id: None,
            target: None,
            color: None,
        })
        .unwrap();

    app.set_override(date(2025, 3, 3), &pushups, Some(TrackerValue::Number(20.0))).unwrap();
    app.set_override(date(2025, 3, 4), &pushups, Some(TrackerValue::Number(30.5))).unwrap();
    app.set_override(date(2025, 3, 3), &meditated, Some(TrackerValue::Flag(true))).unwrap();
    app.set_override(date(2025, 3, 4), &meditated, Some(TrackerValue::Flag(false))).unwrap();
    app.set_override(date(2025, 4, 1), &meditated, Some(TrackerValue::Flag(true))).unwrap();

    let monthly = app.stats_table(TimeView::Monthly, date(2025, 6, 1), 0, date(2025, 6, 1)).unwrap();
    assert_eq!(monthly.columns.len(), 12);
    let pushups_row = monthly.rows.iter().find(|r| r.key == pushups).unwrap();
    assert_eq!(pushups_row.cells[2].to_string(), "51");
    assert_eq!(pushups_row.cells[3].to_string(), "-");
    let meditated_row = monthly.rows.iter().find(|r| r.key == meditated).unwrap();
    assert_eq!(meditated_row.cells[2].to_string(), "1/2");
    assert_eq!(meditated_row.cells[3].to_string(), "1/1");

    let yearly = app.stats_table(TimeView::Yearly, date(2025, 6, 1), 0, date(2025, 6, 1)).unwrap();
    assert_eq!(yearly.label, "Yearly Overview");
    let years: Vec<&str> = yearly.columns.iter().map(|c| c.header.as_str()).collect();
    assert_eq!(years, vec!["2025", "2026"]);
    let meditated_row = yearly.rows.iter().find(|r| r.key == meditated).unwrap();
    assert_eq!(meditated_row.cells[0].to_string(), "2/3");
    assert_eq!(meditated_row.cells[1].to_string(), "-");
}

#[test]
fn daily_table_shows_editable_values() {
    let mut app = app();
    let pushups = app
        .add_tracker(TrackerFields {
            name: "Pushups".to_string(),
            kind: TrackerType::Count,
            linked_category_id: None,
            target: Some(50.0),
            color: None,
        })
        .unwrap();
    let day = date(2025, 3, 12);
    app.set_override(day, &pushups, Some(TrackerValue::Number(20.0))).unwrap();

    let table = app.stats_table(TimeView::Daily, day, 0, day).unwrap();
    let shown: Vec<String> = table.rows.iter().map(|r| r.cells[0].to_string()).collect();
    // Global with no plan is 0, the unlinked percent tracker is blank
    assert_eq!(shown, vec!["0%", "", "20/50"]);
}

#[test]
fn table_never_shows_columns_before_2025() {
    let app = app();
    let table = app.stats_table(TimeView::Weekly, date(2024, 12, 20), 0, date(2025, 1, 5)).unwrap();
    let first = table.columns.first().unwrap();
    // The week of Dec 30 starts before the floor and is dropped whole
    assert_eq!(first.header, "Jan 6 - 12");
    assert_eq!(table.columns.len(), 2);

    let daily = app.stats_table(TimeView::Daily, date(2024, 12, 31), 0, date(2025, 1, 5)).unwrap();
    assert!(daily.columns.is_empty());
}

#[test]
fn trend_graph_over_custom_range() {
    let mut app = app();
    work_day(&mut app, date(2025, 3, 10), 1);
    work_day(&mut app, date(2025, 3, 11), 2);
    app.set_override(date(2025, 3, 12), "global", Some(TrackerValue::Number(25.0))).unwrap();

    let range = daygrid::stats::DateRange::new(date(2025, 3, 10), date(2025, 3, 12));
    let graph = app.graph(TimeView::Custom, date(2025, 4, 1), Some(range), "global").unwrap();
    let values: Vec<(String, f64)> = graph.trend.iter().map(|p| (p.label.clone(), p.value)).collect();
    assert_eq!(
        values,
        vec![
            ("2025-03-10".to_string(), 50.0),
            ("2025-03-11".to_string(), 100.0),
            ("2025-03-12".to_string(), 25.0),
        ]
    );
}

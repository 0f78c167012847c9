use super::aggregate::{round_half_up, Aggregator, Summary};
use super::buckets::{table_columns, week_start, BucketKey};
use super::resolve::Metric;
use crate::domain::{GoalTracker, TimeView, TrackerType, TrackerValue};
use chrono::{Datelike, Duration, NaiveDate};

/// A table column: bucket plus its short header
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub key: BucketKey,
    pub header: String,
}

/// One table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Daily view: the resolved (editable) value for the day
    Entry {
        value: Option<TrackerValue>,
        kind: TrackerType,
        target: Option<f64>,
    },
    /// Grouped views: the reduction over the bucket
    Summary { summary: Summary, kind: TrackerType },
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Entry { value: None, .. } => f.write_str(""),
            Cell::Entry {
                value: Some(value),
                kind,
                target,
            } => match (kind, value) {
                (TrackerType::Percent, TrackerValue::Number(n)) => {
                    write!(f, "{}%", round_half_up(*n))
                }
                (TrackerType::Count, TrackerValue::Number(n)) => match target {
                    Some(t) => write!(f, "{}/{}", TrackerValue::Number(*n), TrackerValue::Number(*t)),
                    None => write!(f, "{}", value),
                },
                _ => write!(f, "{}", value),
            },
            Cell::Summary {
                summary: Summary::Value(v),
                kind: TrackerType::Percent,
            } => write!(f, "{}%", v),
            Cell::Summary { summary, .. } => write!(f, "{}", summary),
        }
    }
}

/// A table row: one metric across all columns
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: String,
    pub name: String,
    pub cells: Vec<Cell>,
}

/// The statistics table: metrics down, time buckets across
#[derive(Debug, Clone, PartialEq)]
pub struct StatsTable {
    pub view: TimeView,
    pub label: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

/// Title above the table for the current page
pub fn table_label(view: TimeView, reference: NaiveDate, weekly_span: u32) -> String {
    match view {
        TimeView::Daily => reference.format("%A, %B %-d, %Y").to_string(),
        TimeView::Weekly => {
            let start = week_start(reference);
            let end = start
                .checked_add_signed(Duration::days(7 * weekly_span as i64 - 1))
                .unwrap_or(NaiveDate::MAX);
            format!("{} - {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
        }
        TimeView::Monthly => reference.year().to_string(),
        TimeView::Yearly => "Yearly Overview".to_string(),
        TimeView::Custom => "Custom Range".to_string(),
    }
}

/// Short column header for a bucket
pub fn column_header(key: BucketKey) -> String {
    match key {
        BucketKey::Day(d) => d.format("%a %-d").to_string(),
        BucketKey::Week(start) => {
            let end = start.checked_add_signed(Duration::days(6)).unwrap_or(NaiveDate::MAX);
            if start.month() == end.month() {
                format!("{} {} - {}", start.format("%b"), start.day(), end.day())
            } else {
                format!("{} - {}", start.format("%b %-d"), end.format("%b %-d"))
            }
        }
        BucketKey::Month { .. } => key.first_day().format("%b").to_string(),
        BucketKey::Year(year) => year.to_string(),
    }
}

fn cell_for(aggregator: &Aggregator<'_>, view: TimeView, key: BucketKey, metric: Metric<'_>) -> Cell {
    let (kind, target) = match metric {
        Metric::Global => (TrackerType::Percent, None),
        Metric::Tracker(t) => (t.kind, t.target),
    };

    match key {
        BucketKey::Day(date) if !view.is_grouped() => {
            let value = match metric {
                Metric::Global => Some(TrackerValue::Number(aggregator.resolver().global_completion(date))),
                Metric::Tracker(_) => aggregator.resolver().resolve(date, metric),
            };
            Cell::Entry { value, kind, target }
        }
        _ => Cell::Summary {
            summary: aggregator.aggregate_bucket(key, metric),
            kind,
        },
    }
}

/// Build the table page for `reference`: the global row first, then one row
/// per tracker in order
pub fn build_table(
    aggregator: &Aggregator<'_>,
    trackers: &[GoalTracker],
    view: TimeView,
    reference: NaiveDate,
    today: NaiveDate,
    weekly_span: u32,
) -> StatsTable {
    let keys = table_columns(view, reference, today, weekly_span);
    let columns = keys
        .iter()
        .map(|key| Column {
            key: *key,
            header: column_header(*key),
        })
        .collect();

    let metrics = std::iter::once(Metric::Global).chain(trackers.iter().map(Metric::Tracker));
    let rows = metrics
        .map(|metric| Row {
            key: metric.key().to_string(),
            name: metric.name().to_string(),
            cells: keys
                .iter()
                .map(|key| cell_for(aggregator, view, *key, metric))
                .collect(),
        })
        .collect();

    StatsTable {
        view,
        label: table_label(view, reference, weekly_span),
        columns,
        rows,
    }
}

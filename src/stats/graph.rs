use super::aggregate::Aggregator;
use super::buckets::{group_dates, iso_week, BucketKey};
use super::resolve::Metric;
use crate::domain::{GoalTracker, TimeView, TrackerType};
use chrono::NaiveDate;

/// One point of the trend line
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

/// One bar of the comparative chart
#[derive(Debug, Clone, PartialEq)]
pub struct ComparativeBar {
    pub name: String,
    pub value: f64,
    pub kind: TrackerType,
    pub color: Option<String>,
}

/// Both charts for one graph page
#[derive(Debug, Clone, PartialEq)]
pub struct GraphData {
    pub view: TimeView,
    /// Name of the metric plotted by the trend
    pub metric: String,
    pub trend: Vec<TrendPoint>,
    pub comparative: Vec<ComparativeBar>,
}

/// Chart point label for a bucket
pub fn point_label(key: BucketKey) -> String {
    match key {
        BucketKey::Day(d) => d.format("%Y-%m-%d").to_string(),
        BucketKey::Week(monday) => {
            let (year, week) = iso_week(monday);
            format!("Week {}, {}", week, year)
        }
        BucketKey::Month { .. } => key.first_day().format("%b %Y").to_string(),
        BucketKey::Year(year) => year.to_string(),
    }
}

/// Metrics that can be plotted: global completion, then every non-check tracker
pub fn trend_metrics(trackers: &[GoalTracker]) -> Vec<Metric<'_>> {
    std::iter::once(Metric::Global)
        .chain(
            trackers
                .iter()
                .filter(|t| t.kind.is_plottable())
                .map(Metric::Tracker),
        )
        .collect()
}

/// Next index when cycling through `len` metrics, wrapping at both ends
pub fn cycle_index(current: usize, step: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as i64 + step as i64).rem_euclid(len as i64) as usize
}

/// Trend of one metric over `dates`, one point per bucket in date order
///
/// Buckets whose reduction is not numeric plot as 0.
pub fn trend_series(
    aggregator: &Aggregator<'_>,
    dates: &[NaiveDate],
    view: TimeView,
    metric: Metric<'_>,
) -> Vec<TrendPoint> {
    group_dates(dates, view)
        .into_iter()
        .map(|bucket| TrendPoint {
            label: point_label(bucket.key),
            value: aggregator
                .aggregate(&bucket.dates, metric)
                .as_number()
                .unwrap_or(0.0),
        })
        .collect()
}

/// Every plottable tracker reduced over the whole window
pub fn comparative_series(
    aggregator: &Aggregator<'_>,
    dates: &[NaiveDate],
    trackers: &[GoalTracker],
) -> Vec<ComparativeBar> {
    trackers
        .iter()
        .filter(|t| t.kind.is_plottable())
        .map(|t| ComparativeBar {
            name: t.name.clone(),
            value: aggregator
                .aggregate(dates, Metric::Tracker(t))
                .as_number()
                .unwrap_or(0.0),
            kind: t.kind,
            color: t.color.clone(),
        })
        .collect()
}

/// Trend of `metric` plus the comparative bars over the same dates
pub fn build_graph(
    aggregator: &Aggregator<'_>,
    trackers: &[GoalTracker],
    dates: &[NaiveDate],
    view: TimeView,
    metric: Metric<'_>,
) -> GraphData {
    GraphData {
        view,
        metric: metric.name().to_string(),
        trend: trend_series(aggregator, dates, view, metric),
        comparative: comparative_series(aggregator, dates, trackers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DailyLog, DailyLogs, StatsLog, TrackerValue};
    use crate::stats::aggregate::GlobalAverage;
    use crate::stats::buckets::dates_between;
    use crate::stats::resolve::ValueResolver;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tracker(id: &str, kind: TrackerType) -> GoalTracker {
        GoalTracker {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            target: None,
            color: Some("#f97316".to_string()),
            linked_category_id: None,
        }
    }

    #[test]
    fn test_point_labels() {
        assert_eq!(point_label(BucketKey::Week(date(2025, 3, 10))), "Week 11, 2025");
        assert_eq!(point_label(BucketKey::Month { year: 2025, month: 3 }), "Mar 2025");
        assert_eq!(point_label(BucketKey::Day(date(2025, 3, 10))), "2025-03-10");
        assert_eq!(point_label(BucketKey::Year(2025)), "2025");
    }

    #[test]
    fn test_trend_metrics_skip_check() {
        let trackers = vec![
            tracker("pct", TrackerType::Percent),
            tracker("flag", TrackerType::Check),
            tracker("num", TrackerType::Count),
        ];
        let keys: Vec<&str> = trend_metrics(&trackers).iter().map(|m| m.key()).collect();
        assert_eq!(keys, vec!["global_completion", "pct", "num"]);
    }

    #[test]
    fn test_cycle_index_wraps() {
        assert_eq!(cycle_index(0, -1, 3), 2);
        assert_eq!(cycle_index(2, 1, 3), 0);
        assert_eq!(cycle_index(1, 1, 3), 2);
        assert_eq!(cycle_index(0, 1, 0), 0);
    }

    #[test]
    fn test_weekly_trend_series() {
        let mut logs = DailyLogs::new();
        let mut log = DailyLog::empty(date(2025, 3, 18));
        let id = log.add_task("A", "cat-1");
        log.toggle_task(&id).unwrap();
        logs.insert(log.date, log);
        let stats = StatsLog::new();
        let agg = Aggregator::new(ValueResolver::new(&logs, &stats), GlobalAverage::LoggedDays);

        let dates = dates_between(date(2025, 3, 10), date(2025, 3, 23));
        let series = trend_series(&agg, &dates, TimeView::Weekly, Metric::Global);
        assert_eq!(
            series,
            vec![
                TrendPoint { label: "Week 11, 2025".to_string(), value: 0.0 },
                TrendPoint { label: "Week 12, 2025".to_string(), value: 100.0 },
            ]
        );
    }

    #[test]
    fn test_comparative_series() {
        let logs = DailyLogs::new();
        let mut stats = StatsLog::new();
        stats
            .entry(date(2025, 3, 10))
            .or_default()
            .insert("num".to_string(), Some(TrackerValue::Number(12.0)));
        let agg = Aggregator::new(ValueResolver::new(&logs, &stats), GlobalAverage::LoggedDays);
        let trackers = vec![
            tracker("num", TrackerType::Count),
            tracker("flag", TrackerType::Check),
            tracker("pct", TrackerType::Percent),
        ];

        let bars = comparative_series(&agg, &[date(2025, 3, 10)], &trackers);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].value, 12.0);
        assert_eq!(bars[1].name, "pct");
        assert_eq!(bars[1].value, 0.0);
    }
}

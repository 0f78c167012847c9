use super::buckets::BucketKey;
use super::resolve::{Metric, ValueResolver};
use crate::domain::TrackerType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which days enter the global completion average
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalAverage {
    /// Every day with a log or an override; a day with no tasks counts as 0
    #[default]
    LoggedDays,
    /// Only days whose value is above 0
    ActiveDays,
}

/// One reduced value for a set of dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summary {
    /// Rounded average (percent, global) or sum (count)
    Value(i64),
    /// Checked days out of days with an entry
    Ratio { hits: usize, total: usize },
    /// No date had a value
    NoData,
}

impl Summary {
    /// Plottable reading; ratios and missing data have none
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Summary::Value(v) => Some(*v as f64),
            Summary::Ratio { .. } | Summary::NoData => None,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Summary::Value(v) => write!(f, "{}", v),
            Summary::Ratio { hits, total } => write!(f, "{}/{}", hits, total),
            Summary::NoData => f.write_str("-"),
        }
    }
}

/// Round half up, the way the planner displays percentages
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Reduces per-date values into one summary per metric type
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    resolver: ValueResolver<'a>,
    policy: GlobalAverage,
}

impl<'a> Aggregator<'a> {
    pub fn new(resolver: ValueResolver<'a>, policy: GlobalAverage) -> Self {
        Self { resolver, policy }
    }

    pub fn resolver(&self) -> &ValueResolver<'a> {
        &self.resolver
    }

    /// Reduce the metric over `dates`
    ///
    /// Global: rounded average, 0 when no date has a value. Percent: rounded
    /// average of dates with a value. Count: rounded sum. Check: checked days
    /// over days with an entry. Trackers with no values give [`Summary::NoData`].
    pub fn aggregate(&self, dates: &[NaiveDate], metric: Metric<'_>) -> Summary {
        let values = dates
            .iter()
            .filter_map(|d| self.resolver.resolve(*d, metric));

        match metric {
            Metric::Global => {
                let mut sum = 0.0;
                let mut count = 0usize;
                for value in values.map(|v| v.as_number()) {
                    if self.policy == GlobalAverage::ActiveDays && value <= 0.0 {
                        continue;
                    }
                    sum += value;
                    count += 1;
                }
                if count == 0 {
                    Summary::Value(0)
                } else {
                    Summary::Value(round_half_up(sum / count as f64))
                }
            }
            Metric::Tracker(tracker) => match tracker.kind {
                TrackerType::Percent => {
                    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v.as_number(), c + 1));
                    if count == 0 {
                        Summary::NoData
                    } else {
                        Summary::Value(round_half_up(sum / count as f64))
                    }
                }
                TrackerType::Count => {
                    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v.as_number(), c + 1));
                    if count == 0 {
                        Summary::NoData
                    } else {
                        Summary::Value(round_half_up(sum))
                    }
                }
                TrackerType::Check => {
                    let (hits, total) = values.fold((0usize, 0usize), |(h, t), v| {
                        (h + usize::from(v.as_flag()), t + 1)
                    });
                    if total == 0 {
                        Summary::NoData
                    } else {
                        Summary::Ratio { hits, total }
                    }
                }
            },
        }
    }

    /// Reduce the metric over one bucket's floor-clamped member dates
    pub fn aggregate_bucket(&self, key: BucketKey, metric: Metric<'_>) -> Summary {
        self.aggregate(&key.member_dates(), metric)
    }
}

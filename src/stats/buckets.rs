//! Calendar arithmetic for grouping dates into day/week/month/year buckets.
//!
//! Everything here is pure: no date is mutated in place, every function
//! returns fresh values. Dates before [`min_date`] never appear in any output.

use crate::domain::TimeView;
use chrono::{Datelike, Duration, Months, NaiveDate};

/// Earliest date the statistics know about
pub fn min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(date.weekday().num_days_from_monday() as i64))
        .unwrap_or(NaiveDate::MIN)
}

/// ISO week `(year, week)` using the Thursday rule
///
/// The date is moved to the Thursday of its Monday-based week; the week
/// number counts 7-day blocks from January 1st of that Thursday's year.
pub fn iso_week(date: NaiveDate) -> (i32, u32) {
    let monday = week_start(date);
    let thursday = monday.checked_add_signed(Duration::days(3)).unwrap_or(monday);
    let jan1 = NaiveDate::from_ymd_opt(thursday.year(), 1, 1).unwrap_or(thursday);
    let days = (thursday - jan1).num_days();
    let week = (days + 1 + 6) / 7;
    (thursday.year(), week as u32)
}

/// First day of a month, `None` for an invalid month
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Every date from `start` to `end` inclusive, ascending
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Same as [`dates_between`], with the start moved up to [`min_date`]
pub fn clamped_dates_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    dates_between(start.max(min_date()), end)
}

/// Identifies one table column or chart point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketKey {
    Day(NaiveDate),
    /// Keyed by the week's Monday
    Week(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

impl BucketKey {
    /// Bucket containing `date` at the given granularity
    pub fn for_date(view: TimeView, date: NaiveDate) -> Self {
        match view {
            TimeView::Daily | TimeView::Custom => BucketKey::Day(date),
            TimeView::Weekly => BucketKey::Week(week_start(date)),
            TimeView::Monthly => BucketKey::Month {
                year: date.year(),
                month: date.month(),
            },
            TimeView::Yearly => BucketKey::Year(date.year()),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        match *self {
            BucketKey::Day(d) | BucketKey::Week(d) => d,
            BucketKey::Month { year, month } => month_start(year, month).unwrap_or(NaiveDate::MIN),
            BucketKey::Year(year) => NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN),
        }
    }

    pub fn last_day(&self) -> NaiveDate {
        match *self {
            BucketKey::Day(d) => d,
            BucketKey::Week(d) => d.checked_add_signed(Duration::days(6)).unwrap_or(NaiveDate::MAX),
            BucketKey::Month { .. } => self
                .first_day()
                .checked_add_months(Months::new(1))
                .and_then(|d| d.pred_opt())
                .unwrap_or(NaiveDate::MAX),
            BucketKey::Year(year) => NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX),
        }
    }

    /// Calendar days in the bucket on or after [`min_date`]
    pub fn member_dates(&self) -> Vec<NaiveDate> {
        clamped_dates_between(self.first_day(), self.last_day())
    }

    /// Whether the bucket starts on or after [`min_date`]
    pub fn is_on_or_after_floor(&self) -> bool {
        self.first_day() >= min_date()
    }
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BucketKey::Day(d) | BucketKey::Week(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            BucketKey::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            BucketKey::Year(year) => write!(f, "{}", year),
        }
    }
}

/// A bucket key with its member dates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: BucketKey,
    pub dates: Vec<NaiveDate>,
}

/// Inclusive date range for custom graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Column keys shown by the statistics table around `reference`
///
/// daily: the reference date; weekly: `weekly_span` weeks starting with the
/// reference week; monthly: the twelve months of the reference year; yearly:
/// every year from the floor's year through the year after `today`.
pub fn table_columns(
    view: TimeView,
    reference: NaiveDate,
    today: NaiveDate,
    weekly_span: u32,
) -> Vec<BucketKey> {
    let keys: Vec<BucketKey> = match view {
        TimeView::Daily | TimeView::Custom => vec![BucketKey::Day(reference)],
        TimeView::Weekly => {
            let start = week_start(reference);
            (0..weekly_span as i64)
                .map_while(|i| start.checked_add_signed(Duration::weeks(i)))
                .map(BucketKey::Week)
                .collect()
        }
        TimeView::Monthly => (1..=12)
            .map(|month| BucketKey::Month {
                year: reference.year(),
                month,
            })
            .collect(),
        TimeView::Yearly => (min_date().year()..=today.year() + 1)
            .map(BucketKey::Year)
            .collect(),
    };

    keys.into_iter().filter(BucketKey::is_on_or_after_floor).collect()
}

/// Move the table reference one page back (`steps < 0`) or forward
///
/// daily: one day per step; weekly: `weekly_span` weeks; monthly: one year.
/// The yearly view always shows every year and does not move. `None` when the
/// page would fall outside the representable calendar.
pub fn navigate(view: TimeView, reference: NaiveDate, steps: i32, weekly_span: u32) -> Option<NaiveDate> {
    match view {
        TimeView::Daily => reference.checked_add_signed(Duration::try_days(steps as i64)?),
        TimeView::Weekly => {
            let weeks = (steps as i64).checked_mul(weekly_span as i64)?;
            reference.checked_add_signed(Duration::try_weeks(weeks)?)
        }
        TimeView::Monthly => {
            let months = Months::new(12u32.checked_mul(steps.unsigned_abs())?);
            if steps >= 0 {
                reference.checked_add_months(months)
            } else {
                reference.checked_sub_months(months)
            }
        }
        TimeView::Yearly | TimeView::Custom => Some(reference),
    }
}

/// Dates plotted by a graph, ascending, clamped to the floor
///
/// Windows trail `today`: daily 30 days, weekly 12 weeks back, monthly the
/// last 12 months from the first of the month, yearly the last 3 years from
/// January 1st. Custom uses `range`, or the daily window when none is given.
pub fn graph_dates(view: TimeView, today: NaiveDate, range: Option<DateRange>) -> Vec<NaiveDate> {
    let (start, end) = match view {
        TimeView::Daily => (today - Duration::days(29), today),
        TimeView::Weekly => (today - Duration::weeks(12), today),
        TimeView::Monthly => {
            let first = month_start(today.year(), today.month()).unwrap_or(today);
            (first.checked_sub_months(Months::new(11)).unwrap_or(first), today)
        }
        TimeView::Yearly => {
            let jan1 = NaiveDate::from_ymd_opt(today.year() - 2, 1, 1).unwrap_or(today);
            (jan1, today)
        }
        TimeView::Custom => match range {
            Some(r) => (r.start, r.end),
            None => (today - Duration::days(29), today),
        },
    };
    clamped_dates_between(start, end)
}

/// Group ascending dates into buckets, keeping chronological order
///
/// Daily and custom views produce one bucket per date. Dates before the
/// floor are dropped.
pub fn group_dates(dates: &[NaiveDate], view: TimeView) -> Vec<Bucket> {
    let floor = min_date();
    let mut buckets: Vec<Bucket> = Vec::new();

    for &date in dates.iter().filter(|d| **d >= floor) {
        let key = BucketKey::for_date(view, date);
        match buckets.iter_mut().find(|b| b.key == key) {
            Some(bucket) => bucket.dates.push(date),
            None => buckets.push(Bucket {
                key,
                dates: vec![date],
            }),
        }
    }

    buckets
}

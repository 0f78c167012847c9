use serde::{Deserialize, Serialize};

/// How a goal tracker's values are interpreted and reduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerType {
    /// 0-100 value, reduced by average
    Percent,
    /// Numeric value, reduced by sum
    Count,
    /// Boolean value, reduced to "hits/total"
    Check,
}

impl TrackerType {
    /// Parse tracker type from its storage tag like "percent"
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "percent" => Some(Self::Percent),
            "count" => Some(Self::Count),
            "check" => Some(Self::Check),
            _ => None,
        }
    }

    /// Convert tracker type to its storage tag
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Count => "count",
            Self::Check => "check",
        }
    }

    /// Whether values of this type can be plotted on a numeric chart
    pub fn is_plottable(&self) -> bool {
        !matches!(self, Self::Check)
    }
}

/// Time granularity for statistics tables and graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeView {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Explicit start/end range, one bucket per day (graphs only)
    Custom,
}

impl TimeView {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
        }
    }

    /// Views offered by the statistics table
    pub fn table_views() -> &'static [TimeView] {
        &[TimeView::Daily, TimeView::Weekly, TimeView::Monthly, TimeView::Yearly]
    }

    /// Views offered by the graphs
    pub fn all() -> &'static [TimeView] {
        &[
            TimeView::Daily,
            TimeView::Weekly,
            TimeView::Monthly,
            TimeView::Yearly,
            TimeView::Custom,
        ]
    }

    /// Whether dates are grouped into multi-day buckets
    pub fn is_grouped(&self) -> bool {
        matches!(self, Self::Weekly | Self::Monthly | Self::Yearly)
    }
}

impl std::fmt::Display for TimeView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_tag())
    }
}

impl std::str::FromStr for TimeView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unknown view '{}'", s))
    }
}

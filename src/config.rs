//! User configuration stored as `config.json` in the data directory.

use crate::domain::TimeView;
use crate::persistence::{atomic_write, config_file, read_file};
use crate::stats::GlobalAverage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Upper bound for `weekly_columns`, one year of weeks
pub const MAX_WEEKLY_COLUMNS: u32 = 52;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Which days the global completion average counts
    #[serde(default)]
    pub global_average: GlobalAverage,
    /// Number of week columns in the weekly table
    #[serde(default = "default_weekly_columns")]
    pub weekly_columns: u32,
    #[serde(default = "default_table_view")]
    pub default_table_view: TimeView,
    #[serde(default = "default_graph_view")]
    pub default_graph_view: TimeView,
}

fn default_weekly_columns() -> u32 {
    5
}
fn default_table_view() -> TimeView {
    TimeView::Weekly
}
fn default_graph_view() -> TimeView {
    TimeView::Daily
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global_average: GlobalAverage::default(),
            weekly_columns: default_weekly_columns(),
            default_table_view: default_table_view(),
            default_graph_view: default_graph_view(),
        }
    }
}

impl Config {
    /// Load config.json from `dir`, falling back to defaults when absent
    pub fn load(dir: &Path) -> Result<Self> {
        let path = config_file(dir);
        let Some(content) = read_file(&path)? else {
            return Ok(Self::default());
        };

        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.weekly_columns = config.weekly_columns.clamp(1, MAX_WEEKLY_COLUMNS);
        debug!(?config, "loaded config");
        Ok(config)
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        atomic_write(config_file(dir), &json)
    }
}

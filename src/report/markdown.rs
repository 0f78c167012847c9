use crate::domain::TrackerType;
use crate::stats::{ComparativeBar, GraphData, StatsTable};

/// Width of the longest bar in a rendered chart
const BAR_WIDTH: usize = 30;

/// Render a bar of `value` against `max`, at least one block for non-zero values
fn bar(value: f64, max: f64) -> String {
    if value <= 0.0 || max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.clamp(1, BAR_WIDTH))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn format_value(value: f64, kind: TrackerType) -> String {
    let rounded = crate::stats::round_half_up(value);
    match kind {
        TrackerType::Percent => format!("{}%", rounded),
        _ => rounded.to_string(),
    }
}

/// Render the statistics table as a markdown table
pub fn render_table(table: &StatsTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("## {}\n\n", table.label));

    if table.columns.is_empty() {
        out.push_str("_No columns in range._\n");
        return out;
    }

    out.push_str("| Metric |");
    for column in &table.columns {
        out.push_str(&format!(" {} |", escape_cell(&column.header)));
    }
    out.push('\n');

    out.push_str("|---|");
    for _ in &table.columns {
        out.push_str("---:|");
    }
    out.push('\n');

    for row in &table.rows {
        out.push_str(&format!("| {} |", escape_cell(&row.name)));
        for cell in &row.cells {
            out.push_str(&format!(" {} |", cell));
        }
        out.push('\n');
    }

    out
}

fn render_comparative(bars: &[ComparativeBar]) -> String {
    let mut out = String::new();
    out.push_str("### Comparison\n\n");

    if bars.is_empty() {
        out.push_str("_No plottable trackers._\n");
        return out;
    }

    let max = bars.iter().map(|b| b.value).fold(0.0, f64::max).max(100.0);
    for b in bars {
        out.push_str(&format!(
            "- **{}:** {} {}\n",
            b.name,
            format_value(b.value, b.kind),
            bar(b.value, max)
        ));
    }
    out
}

/// Render the trend and comparative charts as markdown
pub fn render_graph(graph: &GraphData) -> String {
    let mut out = String::new();
    out.push_str(&format!("## {} ({})\n\n", graph.metric, graph.view));

    if graph.trend.is_empty() {
        out.push_str("_No data in range._\n\n");
    } else {
        let max = graph.trend.iter().map(|p| p.value).fold(0.0, f64::max).max(100.0);
        out.push_str("| Period | Value | |\n|---|---:|---|\n");
        for point in &graph.trend {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                point.label,
                crate::stats::round_half_up(point.value),
                bar(point.value, max)
            ));
        }
        out.push('\n');
    }

    out.push_str(&render_comparative(&graph.comparative));
    out
}

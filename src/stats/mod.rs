pub mod aggregate;
pub mod buckets;
pub mod graph;
pub mod resolve;
pub mod table;

pub use aggregate::{round_half_up, Aggregator, GlobalAverage, Summary};
pub use buckets::{
    graph_dates, group_dates, iso_week, min_date, navigate, table_columns,
    week_start, Bucket, BucketKey, DateRange,
};
pub use graph::{
    build_graph, comparative_series, cycle_index, point_label, trend_metrics, trend_series,
    ComparativeBar, GraphData, TrendPoint,
};
pub use resolve::{Metric, ValueResolver};
pub use table::{build_table, column_header, table_label, Cell, Column, Row, StatsTable};

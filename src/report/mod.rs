pub mod generator;
pub mod markdown;

pub use generator::{generate_report, write_report};
pub use markdown::{render_graph, render_table};

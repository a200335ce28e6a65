// =============================================================================
// Presentation
// =============================================================================
//
// Turns one request's bars, patterns and indicators into what the user sees:
// a Plotly figure, an on-screen table and a CSV export.

pub mod chart;
pub mod export;
pub mod table;

pub use chart::build_figure;
pub use export::write_csv;
pub use table::{export_table, results_table, Table};

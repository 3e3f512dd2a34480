pub mod format;
pub mod html;
pub mod view;

pub use view::{AnomalyRow, FinancialRow, ResultsView, TableBody};

/// Placeholder for any value the backend did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

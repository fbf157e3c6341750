pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{header, muted, section, status_badge, success, summary_row, warn};
pub use table::{bibliography_table, coverage_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};

pub use crate::features::report::{ReportError, render_report, write_report};

pub use crate::features::metrics::TraceSummary;

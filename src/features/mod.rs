pub mod metrics;
pub mod probe;
pub mod report;

mod stats;

use crate::probe::ReceiveTrace;
use serde::Serialize;

/// Packet-size statistics over the real reads of a trace.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceSummary {
    pub packets: usize,
    pub total_bytes: usize,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub median: Option<f64>,
    pub mode: Option<usize>,
    pub cumulative_bytes: Vec<usize>,
}

impl TraceSummary {
    pub fn empty() -> Self {
        Self {
            packets: 0,
            total_bytes: 0,
            min: None,
            max: None,
            median: None,
            mode: None,
            cumulative_bytes: Vec::new(),
        }
    }

    pub fn from_trace(trace: &ReceiveTrace) -> Self {
        stats::summarize(trace)
    }
}

use crate::probe::{ReceiveTrace, TraceEntry};
use std::collections::BTreeMap;

use super::TraceSummary;

pub(super) fn summarize(trace: &ReceiveTrace) -> TraceSummary {
    let reads = trace.reads();
    let sizes: Vec<usize> = reads.iter().map(|entry| entry.byte_count).collect();
    if sizes.is_empty() {
        return TraceSummary::empty();
    }

    let mut sorted = sizes.clone();
    sorted.sort_unstable();

    TraceSummary {
        packets: sizes.len(),
        total_bytes: sizes.iter().sum(),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        median: Some(median(&sorted)),
        mode: mode(&sizes),
        cumulative_bytes: cumulative(reads),
    }
}

/// Averages the two middle values when the count is even.
fn median(sorted: &[usize]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    }
}

/// Most frequent size; ties go to the smallest.
fn mode(values: &[usize]) -> Option<usize> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(*value).or_default() += 1;
    }
    let mut best: Option<(usize, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

fn cumulative(reads: &[TraceEntry]) -> Vec<usize> {
    reads
        .iter()
        .scan(0usize, |total, entry| {
            *total += entry.byte_count;
            Some(*total)
        })
        .collect()
}

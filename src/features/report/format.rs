use crate::config::{ProbeOptions, ProbeTarget};
use crate::features::metrics::TraceSummary;
use crate::probe::{KernelTcpStats, ProbeResult, ReceiveTrace};
use serde::Serialize;
use std::fmt::Display;

pub(super) fn round_ms(ms: f64) -> i64 {
    ms.round() as i64
}

pub(super) fn ping_line(result: &ProbeResult) -> String {
    format!(
        "{} RTT {} ms",
        result.peer_ip,
        round_ms(result.connect_rtt_ms)
    )
}

pub(super) fn packet_lines(trace: &ReceiveTrace) -> impl Iterator<Item = String> + '_ {
    trace
        .entries()
        .iter()
        .map(|entry| format!("{} bytes {} ms", entry.byte_count, round_ms(entry.elapsed_ms)))
}

pub(super) fn kernel_info_lines(stats: Option<&KernelTcpStats>) -> Vec<String> {
    match stats {
        Some(stats) => vec![
            format!("TCP_INFO: RTT {} ms", round_ms(stats.smoothed_rtt_ms)),
            format!("TCP_INFO: RTT_var {} ms", round_ms(stats.rtt_variance_ms)),
        ],
        None => vec!["TCP_INFO: unavailable".to_string()],
    }
}

fn or_none<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

fn join_list<T: Display>(values: impl Iterator<Item = T>) -> String {
    let items: Vec<String> = values.map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

pub(super) fn verbose_lines(
    target: &ProbeTarget,
    result: &ProbeResult,
    options: &ProbeOptions,
    summary: &TraceSummary,
) -> Vec<String> {
    let output_file = options
        .output_path
        .as_ref()
        .map(|path| path.display().to_string());
    let kernel = result.kernel_stats.map(|stats| {
        format!(
            "{} ms (var {} ms)",
            round_ms(stats.smoothed_rtt_ms),
            round_ms(stats.rtt_variance_ms)
        )
    });
    let packet_stats = match (summary.min, summary.max, summary.median, summary.mode) {
        (Some(min), Some(max), Some(median), Some(mode)) => {
            Some(format!("min {min} / max {max} / median {median} / mode {mode}"))
        }
        _ => None,
    };
    let entries = result.trace.entries();

    vec![
        "HTTP GET Request".to_string(),
        format!("  URL           : {}", target.url()),
        format!("  IP            : {}", result.peer_ip),
        format!("  Output File   : {}", or_none(output_file)),
        format!("  Status Code   : {}", or_none(result.status_code)),
        format!("  Reason        : {}", or_none(result.reason_phrase.as_deref())),
        format!("  DNS           : {} ms", round_ms(result.dns_ms)),
        format!("  RTT           : {} ms", round_ms(result.connect_rtt_ms)),
        format!("  TCP_INFO RTT  : {}", or_none(kernel)),
        format!("  Response Size : {} bytes", result.response_size()),
        format!("  Response Time : {} ms", round_ms(result.response_time_ms())),
        format!("  Packets       : {}", summary.packets),
        format!(
            "  Packet Sizes  : {}",
            join_list(entries.iter().map(|e| e.byte_count))
        ),
        format!(
            "  Packet Times  : {}",
            join_list(entries.iter().map(|e| round_ms(e.elapsed_ms)))
        ),
        format!("  Packet Stats  : {}", or_none(packet_stats)),
    ]
}

#[derive(Serialize)]
pub(super) struct JsonReport<'a> {
    pub url: String,
    pub target: &'a ProbeTarget,
    pub result: &'a ProbeResult,
    pub summary: &'a TraceSummary,
    pub response_time_ms: f64,
}

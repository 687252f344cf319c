mod format;

use crate::config::{ProbeOptions, ProbeTarget};
use crate::features::metrics::TraceSummary;
use crate::probe::ProbeResult;
use crate::storage::{StorageError, persist_response};
use self::format::{JsonReport, kernel_info_lines, packet_lines, ping_line, verbose_lines};
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
    #[error("failed to encode JSON report: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Maps a probe result to report lines: ping, packets, kernel info,
/// verbose block, then JSON, each only when enabled.
pub fn render_report(
    target: &ProbeTarget,
    result: &ProbeResult,
    options: &ProbeOptions,
) -> Result<Vec<String>, ReportError> {
    let mut lines = Vec::new();
    let summary = TraceSummary::from_trace(&result.trace);

    if options.emit_ping {
        lines.push(ping_line(result));
    }
    if options.emit_packets {
        lines.extend(packet_lines(&result.trace));
    }
    if options.emit_kernel_info {
        lines.extend(kernel_info_lines(result.kernel_stats.as_ref()));
    }
    if options.verbose {
        lines.extend(verbose_lines(target, result, options, &summary));
    }
    if options.json {
        let report = JsonReport {
            url: target.url(),
            target,
            result,
            summary: &summary,
            response_time_ms: result.response_time_ms(),
        };
        lines.push(serde_json::to_string_pretty(&report)?);
    }

    Ok(lines)
}

/// Writes the report to `out` and, when an output path is configured,
/// persists the decoded response there.
pub fn write_report<W: Write>(
    out: &mut W,
    target: &ProbeTarget,
    result: &ProbeResult,
    options: &ProbeOptions,
) -> Result<(), ReportError> {
    for line in render_report(target, result, options)? {
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    if let Some(path) = &options.output_path {
        persist_response(path, &result.response_text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{render_report, write_report};
    use crate::config::{ProbeOptions, ProbeTarget};
    use crate::probe::{KernelTcpStats, ProbeResult, ReceiveTrace};
    use std::fs;

    fn sample_result() -> ProbeResult {
        let mut trace = ReceiveTrace::new();
        trace.push(20, 1.2);
        trace.push(17, 101.6);
        ProbeResult {
            status_code: Some(200),
            reason_phrase: Some("OK".to_string()),
            peer_ip: "127.0.0.1".parse().expect("ip"),
            dns_ms: 0.1,
            connect_rtt_ms: 0.4,
            trace,
            kernel_stats: Some(KernelTcpStats {
                smoothed_rtt_ms: 15.0,
                rtt_variance_ms: 3.0,
            }),
            response_text: "HTTP/1.0 200 OK\r\n\r\nhello".to_string(),
        }
    }

    fn target() -> ProbeTarget {
        ProbeTarget::new("127.0.0.1", 8080, "/")
    }

    #[test]
    fn no_modes_render_nothing() {
        let lines = render_report(&target(), &sample_result(), &ProbeOptions::default())
            .expect("render");
        assert!(lines.is_empty());
    }

    #[test]
    fn modes_render_in_fixed_order() {
        let options = ProbeOptions {
            emit_ping: true,
            emit_packets: true,
            emit_kernel_info: true,
            ..ProbeOptions::default()
        };
        let lines = render_report(&target(), &sample_result(), &options).expect("render");
        assert_eq!(
            lines,
            vec![
                "127.0.0.1 RTT 0 ms",
                "0 bytes 0 ms",
                "20 bytes 1 ms",
                "17 bytes 102 ms",
                "TCP_INFO: RTT 15 ms",
                "TCP_INFO: RTT_var 3 ms",
            ]
        );
    }

    #[test]
    fn garbled_status_still_reports_other_fields() {
        let mut result = sample_result();
        result.status_code = None;
        result.reason_phrase = None;
        let options = ProbeOptions {
            emit_ping: true,
            verbose: true,
            ..ProbeOptions::default()
        };
        let lines = render_report(&target(), &result, &options).expect("render");
        assert_eq!(lines[0], "127.0.0.1 RTT 0 ms");
        assert!(lines.contains(&"  Status Code   : None".to_string()));
        assert!(lines.contains(&"  Reason        : None".to_string()));
        assert!(lines.contains(&"  Response Size : 37 bytes".to_string()));
    }

    #[test]
    fn verbose_block_lists_measurements() {
        let options = ProbeOptions {
            verbose: true,
            output_path: Some("./webout".into()),
            ..ProbeOptions::default()
        };
        let lines = render_report(&target(), &sample_result(), &options).expect("render");
        assert_eq!(lines[0], "HTTP GET Request");
        assert!(lines.contains(&"  URL           : http://127.0.0.1:8080/".to_string()));
        assert!(lines.contains(&"  Output File   : ./webout".to_string()));
        assert!(lines.contains(&"  Status Code   : 200".to_string()));
        assert!(lines.contains(&"  TCP_INFO RTT  : 15 ms (var 3 ms)".to_string()));
        assert!(lines.contains(&"  Response Time : 102 ms".to_string()));
        assert!(lines.contains(&"  Packets       : 2".to_string()));
        assert!(lines.contains(&"  Packet Sizes  : [0, 20, 17]".to_string()));
        assert!(lines.contains(&"  Packet Times  : [0, 1, 102]".to_string()));
        let stats = "  Packet Stats  : min 17 / max 20 / median 18.5 / mode 17";
        assert!(lines.contains(&stats.to_string()));
    }

    #[test]
    fn json_report_is_valid_json() {
        let options = ProbeOptions {
            json: true,
            ..ProbeOptions::default()
        };
        let lines = render_report(&target(), &sample_result(), &options).expect("render");
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&lines[0]).expect("json");
        assert_eq!(value["result"]["status_code"], 200);
        assert_eq!(value["summary"]["total_bytes"], 37);
        assert_eq!(value["url"], "http://127.0.0.1:8080/");
        assert!(value["result"].get("response_text").is_none());
    }

    #[test]
    fn write_report_persists_response_regardless_of_modes() {
        let path = std::env::temp_dir().join(format!("webprobe-report-{}", std::process::id()));
        let options = ProbeOptions {
            output_path: Some(path.clone()),
            ..ProbeOptions::default()
        };
        let mut out = Vec::new();
        write_report(&mut out, &target(), &sample_result(), &options).expect("write");

        assert!(out.is_empty());
        let saved = fs::read_to_string(&path).expect("saved file");
        assert_eq!(saved, "HTTP/1.0 200 OK\r\n\r\nhello");
        let _ = fs::remove_file(&path);
    }
}

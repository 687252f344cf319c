use serde::Serialize;
use std::io;
use std::net::IpAddr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TraceEntry {
    pub byte_count: usize,
    pub elapsed_ms: f64,
}

impl TraceEntry {
    pub const SENTINEL: TraceEntry = TraceEntry {
        byte_count: 0,
        elapsed_ms: 0.0,
    };
}

/// Per-read arrival trace. Entry 0 is always the sentinel marking the
/// instant the request was sent; it is not a network read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReceiveTrace {
    entries: Vec<TraceEntry>,
}

impl ReceiveTrace {
    pub fn new() -> Self {
        Self {
            entries: vec![TraceEntry::SENTINEL],
        }
    }

    /// Elapsed times are clamped so the trace stays non-decreasing.
    pub fn push(&mut self, byte_count: usize, elapsed_ms: f64) {
        let floor = self.last_elapsed_ms();
        self.entries.push(TraceEntry {
            byte_count,
            elapsed_ms: elapsed_ms.max(floor),
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn reads(&self) -> &[TraceEntry] {
        &self.entries[1..]
    }

    pub fn is_empty(&self) -> bool {
        self.reads().is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.reads().iter().map(|entry| entry.byte_count).sum()
    }

    pub fn last_elapsed_ms(&self) -> f64 {
        self.entries
            .last()
            .map(|entry| entry.elapsed_ms)
            .unwrap_or(0.0)
    }
}

impl Default for ReceiveTrace {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct KernelTcpStats {
    pub smoothed_rtt_ms: f64,
    pub rtt_variance_ms: f64,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StatusLine {
    pub code: u16,
    pub reason: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProbeResult {
    pub status_code: Option<u16>,
    pub reason_phrase: Option<String>,
    pub peer_ip: IpAddr,
    pub dns_ms: f64,
    pub connect_rtt_ms: f64,
    pub trace: ReceiveTrace,
    pub kernel_stats: Option<KernelTcpStats>,
    #[serde(skip)]
    pub response_text: String,
}

impl ProbeResult {
    pub fn response_size(&self) -> usize {
        self.trace.total_bytes()
    }

    pub fn response_time_ms(&self) -> f64 {
        self.connect_rtt_ms + self.trace.last_elapsed_ms()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum ProbePhase {
    Unconnected,
    Connected,
    RequestSent,
    Receiving,
    Drained,
    KernelQueried,
    Closed,
    Parsed,
    Reported,
    Aborted,
}

impl ProbePhase {
    pub fn label(&self) -> &'static str {
        match self {
            ProbePhase::Unconnected => "unconnected",
            ProbePhase::Connected => "connected",
            ProbePhase::RequestSent => "request_sent",
            ProbePhase::Receiving => "receiving",
            ProbePhase::Drained => "drained",
            ProbePhase::KernelQueried => "kernel_queried",
            ProbePhase::Closed => "closed",
            ProbePhase::Parsed => "parsed",
            ProbePhase::Reported => "reported",
            ProbePhase::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProbePhase::Reported | ProbePhase::Aborted)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ProbeErrorKind {
    Connection,
    Transport,
}

impl ProbeErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProbeErrorKind::Connection => "connection_error",
            ProbeErrorKind::Transport => "transport_error",
        }
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("could not connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("{stage} failed: {source}")]
    Transport {
        stage: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ProbeError {
    pub fn kind(&self) -> ProbeErrorKind {
        match self {
            ProbeError::Resolve { .. } | ProbeError::Connect { .. } => ProbeErrorKind::Connection,
            ProbeError::Transport { .. } => ProbeErrorKind::Transport,
        }
    }
}

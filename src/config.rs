use crate::common::net::{DEFAULT_HTTP_PORT, display_url, normalize_path};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "www.example.com";
pub const DEFAULT_PATH: &str = "/";
pub const DEFAULT_OUTPUT_FILE: &str = "./webout";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTarget")]
pub struct ProbeTarget {
    host: String,
    port: u16,
    path: String,
}

#[derive(Deserialize)]
struct RawTarget {
    host: String,
    port: u16,
    path: String,
}

impl From<RawTarget> for ProbeTarget {
    fn from(raw: RawTarget) -> Self {
        Self::new(raw.host, raw.port, &raw.path)
    }
}

impl ProbeTarget {
    pub fn new(host: impl Into<String>, port: u16, path: &str) -> Self {
        Self {
            host: host.into(),
            port,
            path: normalize_path(path),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn url(&self) -> String {
        display_url(&self.host, self.port, &self.path)
    }
}

impl Default for ProbeTarget {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_HTTP_PORT, DEFAULT_PATH)
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// Which report sections to emit. Every flag is independent.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProbeOptions {
    pub emit_ping: bool,
    pub emit_packets: bool,
    pub emit_kernel_info: bool,
    pub verbose: bool,
    pub json: bool,
    pub output_path: Option<PathBuf>,
}

impl ProbeOptions {
    pub fn any_report(&self) -> bool {
        self.emit_ping || self.emit_packets || self.emit_kernel_info || self.verbose || self.json
    }
}

/// Optional socket timeouts. `None` means block until the peer answers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Timeouts {
    pub connect: Option<Duration>,
    pub read: Option<Duration>,
}

use crate::config::{ProbeOptions, ProbeTarget, Timeouts};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub target: ProbeTarget,
    pub options: ProbeOptions,
    pub timeouts: Timeouts,
    pub debug: bool,
}

use super::helpers::{connect_any, resolve, transport};
use crate::common::time::{Clock, SystemClock, elapsed_ms};
use crate::config::{ProbeTarget, Timeouts};
use crate::features::probe::receive::{decode_lenient, receive_all};
use crate::features::probe::request::render_request;
use crate::features::probe::response::parse_status_line;
use crate::features::probe::tcp_info::fetch_tcp_info;
use crate::probe::{ProbeError, ProbePhase, ProbeResult};
use std::io::Write;

/// Runs one instrumented HTTP/1.0 GET per call to [`ProbeClient::probe`].
pub struct ProbeClient<C: Clock = SystemClock> {
    clock: C,
    timeouts: Timeouts,
    phase: ProbePhase,
}

impl ProbeClient<SystemClock> {
    pub fn new(timeouts: Timeouts) -> Self {
        Self::with_clock(SystemClock, timeouts)
    }
}

impl Default for ProbeClient<SystemClock> {
    fn default() -> Self {
        Self::new(Timeouts::default())
    }
}

impl<C: Clock> ProbeClient<C> {
    pub fn with_clock(clock: C, timeouts: Timeouts) -> Self {
        Self {
            clock,
            timeouts,
            phase: ProbePhase::Unconnected,
        }
    }

    pub fn phase(&self) -> ProbePhase {
        self.phase
    }

    /// Fatal failures leave the client in [`ProbePhase::Aborted`].
    pub fn probe(&mut self, target: &ProbeTarget) -> Result<ProbeResult, ProbeError> {
        self.phase = ProbePhase::Unconnected;
        match self.probe_once(target) {
            Ok(result) => Ok(result),
            Err(err) => {
                log::debug!("probe of {target} aborted ({}): {err}", err.kind().label());
                self.transition(ProbePhase::Aborted);
                Err(err)
            }
        }
    }

    pub fn mark_reported(&mut self) {
        self.transition(ProbePhase::Reported);
    }

    fn probe_once(&mut self, target: &ProbeTarget) -> Result<ProbeResult, ProbeError> {
        let dns_start = self.clock.now();
        let addrs = resolve(target.host(), target.port())?;
        let dns_ms = elapsed_ms(dns_start, self.clock.now());

        let connected = connect_any(target.host(), &addrs, self.timeouts.connect, &self.clock)?;
        let mut stream = connected.stream;
        self.transition(ProbePhase::Connected);
        log::debug!(
            "connected to {} in {:.3} ms",
            connected.peer,
            connected.connect_rtt_ms
        );

        stream
            .set_read_timeout(self.timeouts.read)
            .map_err(transport("configure"))?;

        let request = render_request(target);
        stream
            .write_all(request.as_bytes())
            .and_then(|()| stream.flush())
            .map_err(transport("send"))?;
        self.transition(ProbePhase::RequestSent);

        self.transition(ProbePhase::Receiving);
        let received = receive_all(&mut stream, &self.clock).map_err(transport("receive"))?;
        self.transition(ProbePhase::Drained);

        let kernel_stats = match fetch_tcp_info(&stream) {
            Ok(stats) => Some(stats),
            Err(err) => {
                log::warn!("kernel TCP stats unavailable: {err}");
                None
            }
        };
        self.transition(ProbePhase::KernelQueried);

        drop(stream);
        self.transition(ProbePhase::Closed);

        let response_text = decode_lenient(&received.bytes);
        let status = parse_status_line(&response_text);
        if status.is_none() {
            log::warn!("response from {target} has no recognizable status line");
        }
        self.transition(ProbePhase::Parsed);

        let (status_code, reason_phrase) = match status {
            Some(line) => (Some(line.code), Some(line.reason)),
            None => (None, None),
        };

        Ok(ProbeResult {
            status_code,
            reason_phrase,
            peer_ip: connected.peer.ip(),
            dns_ms,
            connect_rtt_ms: connected.connect_rtt_ms,
            trace: received.trace,
            kernel_stats,
            response_text,
        })
    }

    fn transition(&mut self, next: ProbePhase) {
        debug_assert!(
            next > self.phase && !self.phase.is_terminal(),
            "invalid probe transition {} -> {}",
            self.phase.label(),
            next.label()
        );
        log::debug!("probe phase {} -> {}", self.phase.label(), next.label());
        self.phase = next;
    }
}

use crate::common::time::{Clock, elapsed_ms};
use crate::probe::ProbeError;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

pub(super) struct Connected {
    pub stream: TcpStream,
    pub peer: SocketAddr,
    pub connect_rtt_ms: f64,
}

pub(super) fn resolve(host: &str, port: u16) -> Result<Vec<SocketAddr>, ProbeError> {
    let resolve_error = |source| ProbeError::Resolve {
        host: host.to_string(),
        port,
        source,
    };
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(resolve_error)?
        .collect();
    if addrs.is_empty() {
        return Err(resolve_error(io::Error::new(
            io::ErrorKind::NotFound,
            "no addresses found",
        )));
    }
    Ok(addrs)
}

/// Tries each address in order. The returned RTT covers only the attempt
/// that succeeded.
pub(super) fn connect_any<C: Clock + ?Sized>(
    host: &str,
    addrs: &[SocketAddr],
    timeout: Option<Duration>,
    clock: &C,
) -> Result<Connected, ProbeError> {
    let mut last_err = io::Error::new(io::ErrorKind::NotFound, "no addresses to connect to");
    let mut port = 0;

    for addr in addrs {
        port = addr.port();
        let before = clock.now();
        let attempt = match timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout),
            None => TcpStream::connect(addr),
        };
        let after = clock.now();

        match attempt {
            Ok(stream) => {
                let peer = stream.peer_addr().unwrap_or(*addr);
                return Ok(Connected {
                    stream,
                    peer,
                    connect_rtt_ms: elapsed_ms(before, after),
                });
            }
            Err(err) => {
                log::debug!("connect to {addr} failed: {err}");
                last_err = err;
            }
        }
    }

    Err(ProbeError::Connect {
        host: host.to_string(),
        port,
        source: last_err,
    })
}

pub(super) fn transport(stage: &'static str) -> impl FnOnce(io::Error) -> ProbeError {
    move |source| ProbeError::Transport { stage, source }
}

use crate::common::time::{Clock, elapsed_ms};
use crate::probe::ReceiveTrace;
use std::io::{self, Read};
use std::time::Instant;

pub const RECV_BUFFER_SIZE: usize = 10 * 1024;

#[derive(Clone, Debug)]
pub struct Received {
    pub bytes: Vec<u8>,
    pub trace: ReceiveTrace,
}

/// Reads until the peer closes the stream, recording one trace entry per
/// non-empty read. The reference instant is taken on entry, so call this
/// right after the request has been written.
pub fn receive_all<R, C>(reader: &mut R, clock: &C) -> io::Result<Received>
where
    R: Read + ?Sized,
    C: Clock + ?Sized,
{
    let started = clock.now();
    let mut bytes = Vec::new();
    let mut reads: Vec<(usize, Instant)> = Vec::new();
    let mut buf = vec![0u8; RECV_BUFFER_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        reads.push((n, clock.now()));
        bytes.extend_from_slice(&buf[..n]);
    }

    let mut trace = ReceiveTrace::new();
    for (n, at) in reads {
        trace.push(n, elapsed_ms(started, at));
    }

    Ok(Received { bytes, trace })
}

/// Decodes as UTF-8, silently dropping invalid sequences.
pub fn decode_lenient(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0usize;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        dropped += chunk.invalid().len();
    }
    if dropped > 0 {
        log::debug!("dropped {dropped} undecodable response bytes");
    }
    text
}

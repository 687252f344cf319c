//! Kernel TCP round-trip statistics.
//!
//! The kernel hands back a fixed-layout binary structure. Decoding goes
//! through a [`TcpInfoLayout`] table so that layout differences between
//! platforms and kernel versions stay in one place, and so tests can feed
//! synthetic buffers without a live socket.

use crate::probe::KernelTcpStats;
use std::io;
use thiserror::Error;

/// Location of one field inside the raw structure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

impl FieldSpec {
    fn read_u32(&self, buf: &[u8]) -> Option<u32> {
        if self.width != 4 {
            return None;
        }
        let raw = buf.get(self.offset..self.offset + self.width)?;
        let bytes: [u8; 4] = raw.try_into().ok()?;
        Some(u32::from_ne_bytes(bytes))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TcpInfoLayout {
    pub rtt: FieldSpec,
    pub rtt_var: FieldSpec,
}

/// Seven single-byte header fields (state and option flags), padded to the
/// 4-byte alignment of the 24 u32 fields that follow.
const BYTE_FIELDS: usize = 7;
const U32_FIELDS: usize = 24;
const U32_BASE: usize = BYTE_FIELDS.next_multiple_of(4);

/// Field at `index` in the unpacked record: bytes first, then u32s.
const fn record_field(name: &'static str, index: usize) -> FieldSpec {
    if index < BYTE_FIELDS {
        FieldSpec {
            name,
            offset: index,
            width: 1,
        }
    } else {
        FieldSpec {
            name,
            offset: U32_BASE + (index - BYTE_FIELDS) * 4,
            width: 4,
        }
    }
}

/// Smoothed RTT and its variance sit at record indices 22 and 23, which
/// are `tcpi_rtt` and `tcpi_rttvar` in the Linux uapi `struct tcp_info`.
pub const TCP_INFO_LAYOUT: TcpInfoLayout = TcpInfoLayout {
    rtt: record_field("tcpi_rtt", 22),
    rtt_var: record_field("tcpi_rttvar", 23),
};

pub const TCP_INFO_LEN: usize = U32_BASE + U32_FIELDS * 4;

#[derive(Debug, Error)]
pub enum KernelStatsError {
    #[error("TCP_INFO is not supported on this platform")]
    Unsupported,
    #[error("getsockopt(TCP_INFO) failed: {0}")]
    Query(#[source] io::Error),
    #[error("TCP_INFO returned {len} bytes, field {field} needs {needed}")]
    Truncated {
        field: &'static str,
        len: usize,
        needed: usize,
    },
}

/// Decodes the RTT estimate and its variance. The kernel reports both in
/// microseconds.
pub fn decode_tcp_info(
    buf: &[u8],
    layout: &TcpInfoLayout,
) -> Result<KernelTcpStats, KernelStatsError> {
    let read = |field: &FieldSpec| {
        field.read_u32(buf).ok_or(KernelStatsError::Truncated {
            field: field.name,
            len: buf.len(),
            needed: field.offset + field.width,
        })
    };
    let rtt_us = read(&layout.rtt)?;
    let rttvar_us = read(&layout.rtt_var)?;

    Ok(KernelTcpStats {
        smoothed_rtt_ms: rtt_us as f64 / 1000.0,
        rtt_variance_ms: rttvar_us as f64 / 1000.0,
    })
}

#[cfg(target_os = "linux")]
pub fn fetch_tcp_info<S: std::os::fd::AsRawFd>(
    socket: &S,
) -> Result<KernelTcpStats, KernelStatsError> {
    let buf = query_tcp_info(socket.as_raw_fd())?;
    decode_tcp_info(&buf, &TCP_INFO_LAYOUT)
}

#[cfg(not(target_os = "linux"))]
pub fn fetch_tcp_info<S>(socket: &S) -> Result<KernelTcpStats, KernelStatsError> {
    let _ = socket;
    Err(KernelStatsError::Unsupported)
}

#[cfg(target_os = "linux")]
fn query_tcp_info(fd: std::os::fd::RawFd) -> Result<Vec<u8>, KernelStatsError> {
    let capacity = TCP_INFO_LEN.max(std::mem::size_of::<libc::tcp_info>());
    let mut buf = vec![0u8; capacity];
    let mut len = capacity as libc::socklen_t;
    // SAFETY: `buf` is valid for `len` bytes and outlives the call.
    let rc = unsafe {
        libc::getsockopt(
            fd,
            libc::IPPROTO_TCP,
            libc::TCP_INFO,
            buf.as_mut_ptr() as *mut libc::c_void,
            &mut len,
        )
    };
    if rc != 0 {
        return Err(KernelStatsError::Query(io::Error::last_os_error()));
    }
    buf.truncate(len as usize);
    Ok(buf)
}

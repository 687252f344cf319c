pub use crate::common::time::{Clock, SystemClock};
pub use crate::features::probe::engine::ProbeClient;
pub use crate::features::probe::receive::{RECV_BUFFER_SIZE, Received, decode_lenient, receive_all};
pub use crate::features::probe::request::render_request;
pub use crate::features::probe::response::parse_status_line;
pub use crate::features::probe::tcp_info::{
    FieldSpec, KernelStatsError, TCP_INFO_LAYOUT, TCP_INFO_LEN, TcpInfoLayout, decode_tcp_info,
    fetch_tcp_info,
};

pub mod engine;
pub mod receive;
pub mod request;
pub mod response;
pub mod tcp_info;

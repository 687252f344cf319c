mod client;
mod helpers;

pub use client::ProbeClient;

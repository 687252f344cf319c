mod common;
mod features;

pub mod config;
pub mod data_model;
pub mod metrics;
pub mod probe;
pub mod probe_engine;
pub mod report;
pub mod settings;
pub mod storage;

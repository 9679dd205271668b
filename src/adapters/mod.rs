//! Concrete adapter implementations for ports.

pub mod csv_feed;
pub mod file_config_adapter;
pub mod memory_feed;
pub mod typst_report;

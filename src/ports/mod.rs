//! Port traits decoupling the domain from concrete adapters.

pub mod config_port;
pub mod data_feed;
pub mod report_port;

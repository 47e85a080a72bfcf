pub mod config;
pub mod error;
pub mod quota;
pub mod telemetry;

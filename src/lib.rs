pub mod app;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod snapshot;
pub mod telemetry;

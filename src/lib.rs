//! Occupational-health case engine: demand/capacity scoring, stepped form
//! completion, and follow-up chain management, exposed over HTTP and CLI.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

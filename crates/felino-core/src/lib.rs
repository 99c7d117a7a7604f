//! Shared service plumbing: config loading, tracing, middleware, health probes.

pub mod config;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;

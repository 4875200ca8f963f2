//! Node advisor HTTP service
//!
//! Exposes cluster analysis, history and the instance catalog over a JSON
//! API, alongside health probes and Prometheus metrics.

pub mod api;
pub mod config;

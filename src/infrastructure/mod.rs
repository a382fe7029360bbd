//! Infrastructure layer modules
//!
//! This module contains shared infrastructure components:
//! - `aws`: AWS SDK configuration and client construction
//! - `config`: Application configuration and settings
//! - `error`: Unified error types
//! - `metrics`: Prometheus metrics helpers

pub mod aws;
pub mod config;
pub mod error;
pub mod metrics;

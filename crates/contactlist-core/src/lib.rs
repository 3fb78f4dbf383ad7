//! Shared harness infrastructure: environment configuration and retry.

pub mod environment;
pub mod retry;
pub mod tracing;

//! Test utilities for the Contact List harness.
//!
//! Provides [`mock_api::MockApi`], an in-process stand-in for the remote
//! Contact List application, and test-data builders. Import from tests and
//! harness tooling only — never from client code paths.

pub mod data;
pub mod mock_api;

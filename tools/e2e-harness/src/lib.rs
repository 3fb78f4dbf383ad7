//! Library surface of the harness: the reporter and the scenario suites.
//! The binary in `main.rs` wires these to CLI arguments and environment
//! config; the crate's own tests wire them to an in-process mock API.

pub mod reporter;
pub mod suites;

//! Typed clients for the Contact List REST API.
//!
//! [`UserClient`] covers account endpoints (register, login, profile,
//! delete); [`ContactClient`] covers the owner-scoped contact CRUD
//! endpoints. Both are thin wrappers over `reqwest` with bearer-token
//! handling; all server-side behavior belongs to the remote application.

pub mod api;
pub mod contacts;
pub mod error;
pub mod types;
pub mod users;

pub use api::{ContactApi, UserApi};
pub use contacts::ContactClient;
pub use error::ApiError;
pub use users::UserClient;

//! Capability traits for the two API surfaces.
//!
//! Scenarios depend on these traits rather than the concrete clients, so a
//! suite can be driven against anything that can register/login users and
//! manage contacts.

use crate::error::ApiError;
use crate::types::{AuthResponse, Contact, ContactPatch, NewContact, NewUser, User, UserPatch};

/// Account operations: register, authenticate, read/update the profile,
/// and tear the account down.
pub trait UserApi {
    async fn register(&mut self, user: &NewUser) -> Result<AuthResponse, ApiError>;
    async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;
    async fn profile(&self) -> Result<User, ApiError>;
    async fn update_profile(&self, patch: &UserPatch) -> Result<User, ApiError>;
    async fn logout(&mut self) -> Result<(), ApiError>;
    async fn delete_account(&mut self) -> Result<(), ApiError>;
}

/// Contact CRUD, always scoped to the authenticated account's own contacts.
pub trait ContactApi {
    async fn create(&self, contact: &NewContact) -> Result<Contact, ApiError>;
    async fn list(&self) -> Result<Vec<Contact>, ApiError>;
    async fn get(&self, id: &str) -> Result<Contact, ApiError>;
    async fn update(&self, id: &str, contact: &NewContact) -> Result<Contact, ApiError>;
    async fn patch(&self, id: &str, patch: &ContactPatch) -> Result<Contact, ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

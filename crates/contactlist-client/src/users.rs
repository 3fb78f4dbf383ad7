//! Client for the `/users` endpoints.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::api::UserApi;
use crate::error::{ApiError, expect_status};
use crate::types::{AuthResponse, NewUser, User, UserPatch};

/// Wrapper over the account endpoints. Register and login capture the
/// bearer token; it is held until logout or account deletion.
pub struct UserClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl UserClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: None,
        })
    }

    /// The bearer token from the most recent register/login, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn bearer(&self) -> Result<&str, ApiError> {
        self.token.as_deref().ok_or(ApiError::NotAuthenticated)
    }
}

impl UserApi for UserClient {
    /// `POST /users` — create an account. On 201 the returned token is
    /// stored for subsequent authenticated calls.
    async fn register(&mut self, user: &NewUser) -> Result<AuthResponse, ApiError> {
        let response = self.http.post(self.url("/users")).json(user).send().await?;
        let auth: AuthResponse = expect_status(response, StatusCode::CREATED)
            .await?
            .json()
            .await?;
        self.token = Some(auth.token.clone());
        tracing::debug!(email = %auth.user.email, "registered test user");
        Ok(auth)
    }

    /// `POST /users/login` — authenticate and store the fresh token.
    async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .http
            .post(self.url("/users/login"))
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = expect_status(response, StatusCode::OK)
            .await?
            .json()
            .await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    /// `GET /users/me`
    async fn profile(&self) -> Result<User, ApiError> {
        let response = self
            .http
            .get(self.url("/users/me"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        Ok(expect_status(response, StatusCode::OK).await?.json().await?)
    }

    /// `PATCH /users/me`
    async fn update_profile(&self, patch: &UserPatch) -> Result<User, ApiError> {
        let response = self
            .http
            .patch(self.url("/users/me"))
            .bearer_auth(self.bearer()?)
            .json(patch)
            .send()
            .await?;
        Ok(expect_status(response, StatusCode::OK).await?.json().await?)
    }

    /// `POST /users/logout` — invalidates the token server-side; the local
    /// copy is dropped as well.
    async fn logout(&mut self) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("/users/logout"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        expect_status(response, StatusCode::OK).await?;
        self.token = None;
        Ok(())
    }

    /// `DELETE /users/me` — removes the account and its contacts.
    async fn delete_account(&mut self) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url("/users/me"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        expect_status(response, StatusCode::OK).await?;
        self.token = None;
        Ok(())
    }
}

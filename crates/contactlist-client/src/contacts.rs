//! Client for the `/contacts` endpoints.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::api::ContactApi;
use crate::error::{ApiError, expect_status};
use crate::types::{Contact, ContactPatch, NewContact};

/// Wrapper over the contact CRUD endpoints. Every call is authenticated, so
/// construction requires a token (take it from [`crate::UserClient::token`]).
pub struct ContactClient {
    http: Client,
    base_url: String,
    token: String,
}

impl ContactClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        token: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl ContactApi for ContactClient {
    /// `POST /contacts`
    async fn create(&self, contact: &NewContact) -> Result<Contact, ApiError> {
        let response = self
            .http
            .post(self.url("/contacts"))
            .bearer_auth(&self.token)
            .json(contact)
            .send()
            .await?;
        Ok(expect_status(response, StatusCode::CREATED)
            .await?
            .json()
            .await?)
    }

    /// `GET /contacts` — only the authenticated account's contacts.
    async fn list(&self) -> Result<Vec<Contact>, ApiError> {
        let response = self
            .http
            .get(self.url("/contacts"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(expect_status(response, StatusCode::OK).await?.json().await?)
    }

    /// `GET /contacts/{id}`
    async fn get(&self, id: &str) -> Result<Contact, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/contacts/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(expect_status(response, StatusCode::OK).await?.json().await?)
    }

    /// `PUT /contacts/{id}` — full replacement.
    async fn update(&self, id: &str, contact: &NewContact) -> Result<Contact, ApiError> {
        let response = self
            .http
            .put(self.url(&format!("/contacts/{id}")))
            .bearer_auth(&self.token)
            .json(contact)
            .send()
            .await?;
        Ok(expect_status(response, StatusCode::OK).await?.json().await?)
    }

    /// `PATCH /contacts/{id}` — partial update.
    async fn patch(&self, id: &str, patch: &ContactPatch) -> Result<Contact, ApiError> {
        let response = self
            .http
            .patch(self.url(&format!("/contacts/{id}")))
            .bearer_auth(&self.token)
            .json(patch)
            .send()
            .await?;
        Ok(expect_status(response, StatusCode::OK).await?.json().await?)
    }

    /// `DELETE /contacts/{id}`
    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/contacts/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        expect_status(response, StatusCode::OK).await?;
        Ok(())
    }
}

//! Scenario suites. Each suite registers fresh throwaway accounts per
//! scenario so reruns and retries never trip over leftover state, and
//! deletes them again on the way out (best-effort — the remote API also
//! reaps stale test data).

use std::time::Duration;

use anyhow::bail;
use contactlist_client::types::{AuthResponse, NewUser};
use contactlist_client::{ApiError, ContactClient, UserApi, UserClient};
use contactlist_testing::data;

pub mod contacts;
pub mod users;

/// Everything a scenario needs to talk to the environment under test.
pub struct SuiteContext {
    pub base_url: String,
    pub timeout: Duration,
    pub email_prefix: String,
    pub password: String,
}

/// How often a failing scenario is re-run, from the environment's
/// `RETRY_COUNT`.
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl SuiteContext {
    pub(crate) fn user_client(&self) -> Result<UserClient, ApiError> {
        UserClient::new(&self.base_url, self.timeout)
    }

    pub(crate) fn contact_client(&self, token: &str) -> Result<ContactClient, ApiError> {
        ContactClient::new(&self.base_url, self.timeout, token)
    }

    pub(crate) fn fresh_user(&self) -> NewUser {
        data::test_user(&self.email_prefix, &self.password)
    }

    /// Register a throwaway account; returns the authenticated client and
    /// the register response.
    pub(crate) async fn register_fresh(&self) -> anyhow::Result<(UserClient, AuthResponse)> {
        let mut client = self.user_client()?;
        let auth = client.register(&self.fresh_user()).await?;
        Ok((client, auth))
    }
}

/// Assert that `result` failed with the given HTTP status.
pub(crate) fn expect_api_status<T: std::fmt::Debug>(
    result: Result<T, ApiError>,
    status: u16,
) -> anyhow::Result<()> {
    match result {
        Err(ApiError::UnexpectedStatus { status: actual, .. }) if actual == status => Ok(()),
        Ok(value) => bail!("expected status {status}, got success: {value:?}"),
        Err(other) => bail!("expected status {status}, got: {other}"),
    }
}

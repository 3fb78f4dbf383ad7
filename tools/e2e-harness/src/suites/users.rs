//! User account scenarios: the register → use → tear down lifecycle.

use anyhow::{Result, ensure};
use contactlist_client::types::UserPatch;
use contactlist_client::{ContactApi, UserApi};
use contactlist_core::retry::run_with_retry;

use crate::reporter::Reporter;
use crate::suites::{RetryPolicy, SuiteContext, expect_api_status};

pub async fn run(ctx: &SuiteContext, retry: &RetryPolicy, reporter: &mut Reporter) {
    reporter.record(
        "users",
        "register and read profile",
        run_with_retry(|| register_and_profile(ctx), retry.max_attempts, retry.base_delay).await,
    );
    reporter.record(
        "users",
        "update profile",
        run_with_retry(|| update_profile(ctx), retry.max_attempts, retry.base_delay).await,
    );
    reporter.record(
        "users",
        "logout invalidates token, login issues a new one",
        run_with_retry(|| relogin_after_logout(ctx), retry.max_attempts, retry.base_delay).await,
    );
    reporter.record(
        "users",
        "deleted account can no longer log in",
        run_with_retry(|| delete_account(ctx), retry.max_attempts, retry.base_delay).await,
    );
}

async fn register_and_profile(ctx: &SuiteContext) -> Result<()> {
    let (mut client, auth) = ctx.register_fresh().await?;

    let profile = client.profile().await?;
    ensure!(profile == auth.user, "profile does not match registered user");

    client.delete_account().await?;
    Ok(())
}

async fn update_profile(ctx: &SuiteContext) -> Result<()> {
    let (mut client, _auth) = ctx.register_fresh().await?;

    let patch = UserPatch {
        first_name: Some("Renamed".to_owned()),
        ..Default::default()
    };
    let updated = client.update_profile(&patch).await?;
    ensure!(updated.first_name == "Renamed", "first name not updated");

    let profile = client.profile().await?;
    ensure!(profile == updated, "profile re-read does not match update");

    client.delete_account().await?;
    Ok(())
}

async fn relogin_after_logout(ctx: &SuiteContext) -> Result<()> {
    let (mut client, auth) = ctx.register_fresh().await?;
    let old_token = auth.token.clone();

    client.logout().await?;

    // The old token must be dead server-side.
    let contacts = ctx.contact_client(&old_token)?;
    expect_api_status(contacts.list().await, 401)?;

    let fresh = client.login(&auth.user.email, &ctx.password).await?;
    ensure!(fresh.token != old_token, "login reissued the old token");
    ensure!(fresh.user == auth.user, "login returned a different user");

    client.delete_account().await?;
    Ok(())
}

async fn delete_account(ctx: &SuiteContext) -> Result<()> {
    let (mut client, auth) = ctx.register_fresh().await?;

    client.delete_account().await?;

    expect_api_status(client.login(&auth.user.email, &ctx.password).await, 401)?;
    Ok(())
}

//! Contact CRUD scenarios.

use anyhow::{Result, ensure};
use contactlist_client::types::NewContact;
use contactlist_client::{ContactApi, UserApi};
use contactlist_core::retry::run_with_retry;
use contactlist_testing::data;

use crate::reporter::Reporter;
use crate::suites::{RetryPolicy, SuiteContext, expect_api_status};

pub async fn run(ctx: &SuiteContext, retry: &RetryPolicy, reporter: &mut Reporter) {
    reporter.record(
        "contacts",
        "create and fetch a contact",
        run_with_retry(|| create_and_fetch(ctx), retry.max_attempts, retry.base_delay).await,
    );
    reporter.record(
        "contacts",
        "listing is scoped to the owning account",
        run_with_retry(|| list_is_owner_scoped(ctx), retry.max_attempts, retry.base_delay).await,
    );
    reporter.record(
        "contacts",
        "full update replaces every field",
        run_with_retry(|| full_update(ctx), retry.max_attempts, retry.base_delay).await,
    );
    reporter.record(
        "contacts",
        "partial update leaves other fields alone",
        run_with_retry(|| partial_update(ctx), retry.max_attempts, retry.base_delay).await,
    );
    reporter.record(
        "contacts",
        "deleted contact is gone",
        run_with_retry(|| delete_contact(ctx), retry.max_attempts, retry.base_delay).await,
    );
}

async fn create_and_fetch(ctx: &SuiteContext) -> Result<()> {
    let (mut user, auth) = ctx.register_fresh().await?;
    let contacts = ctx.contact_client(&auth.token)?;

    let created = contacts.create(&data::sample_contact()).await?;
    ensure!(created.owner.is_some(), "created contact has no owner");

    let fetched = contacts.get(&created.id).await?;
    ensure!(fetched == created, "fetched contact differs from created");

    user.delete_account().await?;
    Ok(())
}

async fn list_is_owner_scoped(ctx: &SuiteContext) -> Result<()> {
    let (mut mine, my_auth) = ctx.register_fresh().await?;
    let (mut theirs, their_auth) = ctx.register_fresh().await?;
    let my_contacts = ctx.contact_client(&my_auth.token)?;
    let their_contacts = ctx.contact_client(&their_auth.token)?;

    let created = my_contacts.create(&data::sample_contact()).await?;
    their_contacts
        .create(&NewContact::named("Someone", "Else"))
        .await?;

    let listed = my_contacts.list().await?;
    ensure!(listed.len() == 1, "expected 1 contact, got {}", listed.len());
    ensure!(listed[0].id == created.id, "listed a foreign contact");

    // Foreign ids read as not-found, not forbidden.
    expect_api_status(their_contacts.get(&created.id).await, 404)?;

    mine.delete_account().await?;
    theirs.delete_account().await?;
    Ok(())
}

async fn full_update(ctx: &SuiteContext) -> Result<()> {
    let (mut user, auth) = ctx.register_fresh().await?;
    let contacts = ctx.contact_client(&auth.token)?;

    let created = contacts.create(&data::sample_contact()).await?;
    let replaced = contacts
        .update(&created.id, &NewContact::named("Renamed", "Entirely"))
        .await?;
    ensure!(replaced.id == created.id, "id changed on update");
    ensure!(replaced.first_name == "Renamed", "first name not replaced");
    ensure!(replaced.city.is_none(), "unset field survived a full update");

    user.delete_account().await?;
    Ok(())
}

async fn partial_update(ctx: &SuiteContext) -> Result<()> {
    let (mut user, auth) = ctx.register_fresh().await?;
    let contacts = ctx.contact_client(&auth.token)?;

    let created = contacts.create(&data::sample_contact()).await?;
    let patched = contacts
        .patch(&created.id, &data::sample_contact_patch())
        .await?;
    ensure!(patched.city.as_deref() == Some("Boston"), "city not patched");
    ensure!(
        patched.first_name == created.first_name,
        "untouched field changed"
    );

    user.delete_account().await?;
    Ok(())
}

async fn delete_contact(ctx: &SuiteContext) -> Result<()> {
    let (mut user, auth) = ctx.register_fresh().await?;
    let contacts = ctx.contact_client(&auth.token)?;

    let created = contacts.create(&data::sample_contact()).await?;
    contacts.delete(&created.id).await?;

    expect_api_status(contacts.get(&created.id).await, 404)?;
    let listed = contacts.list().await?;
    ensure!(listed.is_empty(), "deleted contact still listed");

    user.delete_account().await?;
    Ok(())
}

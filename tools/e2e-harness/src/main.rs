//! End-to-end harness — runs API scenario suites against a live
//! Contact List deployment.
//!
//! # Usage
//!
//! ```bash
//! # Run everything against the staging config
//! cargo run -p e2e-harness -- --env staging
//!
//! # Run only the contact suite against an explicit URL
//! cargo run -p e2e-harness -- --env qa --suite contacts --base-url http://localhost:3000
//! ```
//!
//! Exits 0 when every scenario passes, exits 1 when any fail.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;

use contactlist_core::environment::ConfigResolver;
use contactlist_core::tracing::init_tracing;
use e2e_harness::reporter::Reporter;
use e2e_harness::suites::{self, RetryPolicy, SuiteContext};

#[derive(Parser)]
#[command(about = "Run Contact List API scenarios against a live environment")]
struct Args {
    /// Environment name: local, qa, staging, or production
    #[arg(long, env = "CONTACT_LIST_ENV", default_value = "staging")]
    env: String,

    /// Override the environment's BASE_URL
    #[arg(long)]
    base_url: Option<String>,

    /// Run only one suite: users or contacts
    #[arg(long)]
    suite: Option<String>,

    /// Directory holding the per-environment `<name>.env` sources
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let (run_users, run_contacts) = match args.suite.as_deref() {
        None => (true, true),
        Some("users") => (true, false),
        Some("contacts") => (false, true),
        Some(other) => bail!("unknown suite `{other}` (expected users or contacts)"),
    };

    let mut resolver = ConfigResolver::new(&args.config_dir);
    let config = resolver.resolve(&args.env)?;

    let ctx = SuiteContext {
        base_url: args.base_url.unwrap_or_else(|| config.base_url.clone()),
        timeout: Duration::from_millis(config.api_timeout_ms),
        email_prefix: config.test_user_email_prefix.clone(),
        password: config.test_user_password.clone(),
    };
    // RETRY_COUNT is the number of re-runs after the first attempt.
    let retry = RetryPolicy {
        max_attempts: config.retry_count + 1,
        base_delay: Duration::from_secs(1),
    };

    println!(
        "Running against {} ({} environment)",
        ctx.base_url, config.environment
    );
    println!();

    let mut reporter = Reporter::new();
    if run_users {
        suites::users::run(&ctx, &retry, &mut reporter).await;
    }
    if run_contacts {
        suites::contacts::run(&ctx, &retry, &mut reporter).await;
    }

    reporter.print_summary(&config.report_title);

    if reporter.all_passed() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

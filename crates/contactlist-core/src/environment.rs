//! Environment configuration resolution.
//!
//! Each deployment target (`local`, `qa`, `staging`, `production`) has a
//! `KEY=VALUE` source file named `<environment>.env` under the resolver's
//! config directory. Resolution parses the source once, validates required
//! keys, and caches the result for the lifetime of the resolver.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

/// Applied when `API_TIMEOUT` is present but not a valid integer.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;

// ── Environment ──────────────────────────────────────────────────────────────

/// A named deployment target. The set is closed; anything else is either
/// rejected or mapped to [`Environment::Staging`] depending on the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Local,
    Qa,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Qa => "qa",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Lenient lookup used by [`ConfigResolver::resolve`]: an unrecognized
    /// name falls back to `staging` with a warning instead of failing, so a
    /// typo in CI selects a safe default rather than aborting the whole run.
    pub fn from_name_lenient(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(name, "unrecognized environment name, using staging");
            Self::Staging
        })
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "qa" => Ok(Self::Qa),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidName(s.to_owned())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Errors ───────────────────────────────────────────────────────────────────

/// Configuration resolution failures. `MissingSource` ("environment doesn't
/// exist") and `MissingKey` ("environment exists but is misconfigured") are
/// deliberately distinct variants so callers can tell them apart.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config source for environment `{environment}` at {}", path.display())]
    MissingSource {
        environment: Environment,
        path: PathBuf,
    },

    #[error("missing required key `{key}` in `{environment}` config")]
    MissingKey {
        key: &'static str,
        environment: Environment,
    },

    #[error("unrecognized environment name `{0}`")]
    InvalidName(String),

    #[error("cannot read config source at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── EnvironmentConfig ────────────────────────────────────────────────────────

/// Resolved settings for one environment. Built once per environment per
/// resolver and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    pub environment: Environment,
    pub base_url: String,
    pub api_timeout_ms: u64,
    pub retry_count: u32,
    pub headless: bool,
    pub slow_mo_ms: u64,
    pub test_user_email_prefix: String,
    pub test_user_password: String,
    pub report_title: String,
    pub slack_channel: String,
    pub enable_screenshots: bool,
    pub enable_videos: bool,
    pub enable_traces: bool,
}

// ── ConfigResolver ───────────────────────────────────────────────────────────

/// Maps environment names to validated [`EnvironmentConfig`]s.
///
/// The cache is an owned field rather than process-global state: each
/// resolver controls its own lifetime, which keeps tests independent of
/// each other.
pub struct ConfigResolver {
    config_dir: PathBuf,
    current: Environment,
    cache: HashMap<Environment, Arc<EnvironmentConfig>>,
}

impl ConfigResolver {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            current: Environment::Staging,
            cache: HashMap::new(),
        }
    }

    /// Resolve `name` to its configuration. Name matching is lenient (see
    /// [`Environment::from_name_lenient`]); a cached config is returned
    /// without re-reading the source.
    pub fn resolve(&mut self, name: &str) -> Result<Arc<EnvironmentConfig>, ConfigError> {
        let environment = Environment::from_name_lenient(name);
        self.resolve_environment(environment)
    }

    /// Resolve the currently selected environment (see [`Self::set_current`]).
    pub fn resolve_current(&mut self) -> Result<Arc<EnvironmentConfig>, ConfigError> {
        self.resolve_environment(self.current)
    }

    /// Switch the environment used by [`Self::resolve_current`]. Unlike
    /// `resolve`, an unrecognized name is rejected here: an explicit
    /// programmatic switch to a nonexistent environment is always a bug.
    pub fn set_current(&mut self, name: &str) -> Result<(), ConfigError> {
        self.current = name.parse()?;
        Ok(())
    }

    pub fn current(&self) -> Environment {
        self.current
    }

    fn resolve_environment(
        &mut self,
        environment: Environment,
    ) -> Result<Arc<EnvironmentConfig>, ConfigError> {
        if let Some(config) = self.cache.get(&environment) {
            return Ok(Arc::clone(config));
        }

        let path = self.config_dir.join(format!("{environment}.env"));
        if !path.exists() {
            return Err(ConfigError::MissingSource { environment, path });
        }
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        let pairs = parse_source(&raw);
        let config = Arc::new(build_config(environment, &pairs)?);
        self.cache.insert(environment, Arc::clone(&config));
        tracing::debug!(%environment, base_url = %config.base_url, "environment resolved");
        Ok(config)
    }
}

// ── Source parsing ───────────────────────────────────────────────────────────

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped; the
/// value is everything after the first `=`, trimmed; on duplicate keys the
/// last occurrence wins. No quoting or escaping is supported.
fn parse_source(raw: &str) -> HashMap<String, String> {
    let mut pairs = HashMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            pairs.insert(key.trim().to_owned(), value.trim().to_owned());
        }
    }
    pairs
}

fn build_config(
    environment: Environment,
    pairs: &HashMap<String, String>,
) -> Result<EnvironmentConfig, ConfigError> {
    let required = |key: &'static str| -> Result<&str, ConfigError> {
        match pairs.get(key).map(String::as_str) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ConfigError::MissingKey { key, environment }),
        }
    };
    // `true` unless the source explicitly says `false`.
    let opt_in_by_default = |key: &str| pairs.get(key).map(String::as_str) != Some("false");
    // `false` unless the source explicitly says `true`.
    let opt_out_by_default = |key: &str| pairs.get(key).map(String::as_str) == Some("true");

    Ok(EnvironmentConfig {
        environment,
        base_url: required("BASE_URL")?.to_owned(),
        api_timeout_ms: required("API_TIMEOUT")?
            .parse()
            .unwrap_or(DEFAULT_API_TIMEOUT_MS),
        retry_count: pairs
            .get("RETRY_COUNT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1),
        headless: opt_in_by_default("HEADLESS"),
        slow_mo_ms: pairs
            .get("SLOW_MO")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
        test_user_email_prefix: required("TEST_USER_EMAIL_PREFIX")?.to_owned(),
        test_user_password: required("TEST_USER_PASSWORD")?.to_owned(),
        report_title: pairs
            .get("REPORT_TITLE")
            .cloned()
            .unwrap_or_else(|| format!("{environment} Test Results")),
        slack_channel: pairs
            .get("SLACK_CHANNEL")
            .cloned()
            .unwrap_or_else(|| "#tests".to_owned()),
        enable_screenshots: opt_out_by_default("ENABLE_SCREENSHOTS"),
        enable_videos: opt_out_by_default("ENABLE_VIDEOS"),
        enable_traces: opt_out_by_default("ENABLE_TRACES"),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;

    const MINIMAL: &str = "BASE_URL=https://x.test\n\
                           API_TIMEOUT=5000\n\
                           TEST_USER_EMAIL_PREFIX=qa\n\
                           TEST_USER_PASSWORD=secret\n";

    fn write_source(dir: &Path, environment: &str, contents: &str) {
        fs::write(dir.join(format!("{environment}.env")), contents).unwrap();
    }

    // ── parse_source ─────────────────────────────────────────────────────────

    #[test]
    fn should_skip_blank_and_comment_lines() {
        let pairs = parse_source("BASE_URL=https://x.test\n# comment\n\nAPI_TIMEOUT=5000");
        assert_eq!(pairs["BASE_URL"], "https://x.test");
        assert_eq!(pairs["API_TIMEOUT"], "5000");
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn should_split_on_first_equals_and_trim_value() {
        let pairs = parse_source("SLACK_CHANNEL =  #qa=alerts  \n");
        assert_eq!(pairs["SLACK_CHANNEL"], "#qa=alerts");
    }

    #[test]
    fn should_let_last_duplicate_key_win() {
        let pairs = parse_source("RETRY_COUNT=1\nRETRY_COUNT=9");
        assert_eq!(pairs["RETRY_COUNT"], "9");
    }

    // ── build_config ─────────────────────────────────────────────────────────

    #[test]
    fn should_apply_documented_defaults() {
        let config = build_config(Environment::Qa, &parse_source(MINIMAL)).unwrap();
        assert_eq!(config.retry_count, 1);
        assert!(config.headless);
        assert_eq!(config.slow_mo_ms, 0);
        assert_eq!(config.report_title, "qa Test Results");
        assert_eq!(config.slack_channel, "#tests");
        assert!(!config.enable_screenshots);
        assert!(!config.enable_videos);
        assert!(!config.enable_traces);
    }

    #[test]
    fn should_only_flip_booleans_on_exact_literals() {
        let source = format!("{MINIMAL}HEADLESS=no\nENABLE_VIDEOS=yes\n");
        let config = build_config(Environment::Qa, &parse_source(&source)).unwrap();
        // "no"/"yes" are not the recognized literals, so defaults hold.
        assert!(config.headless);
        assert!(!config.enable_videos);

        let source = format!("{MINIMAL}HEADLESS=false\nENABLE_VIDEOS=true\n");
        let config = build_config(Environment::Qa, &parse_source(&source)).unwrap();
        assert!(!config.headless);
        assert!(config.enable_videos);
    }

    #[test]
    fn should_name_the_missing_key() {
        let source = "BASE_URL=https://x.test\nAPI_TIMEOUT=5000\nTEST_USER_EMAIL_PREFIX=qa\n";
        let result = build_config(Environment::Production, &parse_source(source));
        match result {
            Err(ConfigError::MissingKey { key, environment }) => {
                assert_eq!(key, "TEST_USER_PASSWORD");
                assert_eq!(environment, Environment::Production);
            }
            other => panic!("expected MissingKey, got {other:?}"),
        }
    }

    #[test]
    fn should_treat_empty_required_value_as_missing() {
        let source = format!("{MINIMAL}BASE_URL=\n");
        let result = build_config(Environment::Qa, &parse_source(&source));
        assert!(matches!(
            result,
            Err(ConfigError::MissingKey { key: "BASE_URL", .. })
        ));
    }

    #[test]
    fn should_fall_back_to_default_timeout_on_unparsable_value() {
        let source = MINIMAL.replace("API_TIMEOUT=5000", "API_TIMEOUT=fast");
        let config = build_config(Environment::Qa, &parse_source(&source)).unwrap();
        assert_eq!(config.api_timeout_ms, DEFAULT_API_TIMEOUT_MS);
    }

    // ── ConfigResolver ───────────────────────────────────────────────────────

    #[test]
    fn should_resolve_and_cache_per_environment() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "qa", MINIMAL);

        let mut resolver = ConfigResolver::new(dir.path());
        let first = resolver.resolve("qa").unwrap();
        assert_eq!(first.base_url, "https://x.test");
        assert_eq!(first.api_timeout_ms, 5000);

        // Remove the source; the cached config must still be served.
        fs::remove_file(dir.path().join("qa.env")).unwrap();
        let second = resolver.resolve("qa").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn should_normalize_name_case() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "qa", MINIMAL);

        let mut resolver = ConfigResolver::new(dir.path());
        let config = resolver.resolve("QA").unwrap();
        assert_eq!(config.environment, Environment::Qa);
    }

    #[test]
    fn should_fall_back_to_staging_for_unrecognized_name() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "staging", MINIMAL);

        let mut resolver = ConfigResolver::new(dir.path());
        let config = resolver.resolve("stagign").unwrap();
        assert_eq!(config.environment, Environment::Staging);
    }

    #[test]
    fn should_fail_with_missing_source_for_absent_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver = ConfigResolver::new(dir.path());
        let result = resolver.resolve("production");
        match result {
            Err(ConfigError::MissingSource { environment, path }) => {
                assert_eq!(environment, Environment::Production);
                assert!(path.ends_with("production.env"));
            }
            other => panic!("expected MissingSource, got {other:?}"),
        }
    }

    #[test]
    fn should_default_current_to_staging() {
        let resolver = ConfigResolver::new("config");
        assert_eq!(resolver.current(), Environment::Staging);
    }

    #[test]
    fn should_reject_unrecognized_name_in_set_current() {
        let mut resolver = ConfigResolver::new("config");
        let result = resolver.set_current("integration");
        assert!(matches!(result, Err(ConfigError::InvalidName(name)) if name == "integration"));
        assert_eq!(resolver.current(), Environment::Staging);
    }

    #[test]
    fn should_switch_current_environment() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "local", MINIMAL);

        let mut resolver = ConfigResolver::new(dir.path());
        resolver.set_current("local").unwrap();
        assert_eq!(resolver.current(), Environment::Local);
        let config = resolver.resolve_current().unwrap();
        assert_eq!(config.environment, Environment::Local);
    }
}

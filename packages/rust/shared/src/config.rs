//! Application configuration for shiftscope.
//!
//! User config lives at `~/.shiftscope/shiftscope.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiftscopeError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "shiftscope.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".shiftscope";

/// Hard cap imposed by the remote search API.
pub const MAX_PER_PAGE: u32 = 150;

// ---------------------------------------------------------------------------
// Config structs (matching shiftscope.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Remote support-platform API settings.
    #[serde(default)]
    pub intercom: IntercomConfig,

    /// Classification policies.
    #[serde(default)]
    pub classify: ClassifyPolicyConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory artifacts are written to by the CLI.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Reference timezone for the default reporting window.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// How many verbatim example summaries an insight document carries.
    #[serde(default = "default_example_summaries")]
    pub example_summaries: usize,

    /// How many keywords an insight document lists.
    #[serde(default = "default_keyword_limit")]
    pub keyword_limit: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            timezone: default_timezone(),
            example_summaries: default_example_summaries(),
            keyword_limit: default_keyword_limit(),
        }
    }
}

fn default_output_dir() -> String {
    "~/shiftscope-reports".into()
}
fn default_timezone() -> String {
    "America/New_York".into()
}
fn default_example_summaries() -> usize {
    5
}
fn default_keyword_limit() -> usize {
    10
}

/// `[intercom]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntercomConfig {
    /// API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Name of the env var holding the API token (never store the token itself).
    #[serde(default = "default_api_token_env")]
    pub api_token_env: String,

    /// Pinned API version sent with every request.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Search page size (capped at [`MAX_PER_PAGE`]).
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per request (first try + retries).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay for exponential backoff, in milliseconds.
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
}

impl Default for IntercomConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_token_env: default_api_token_env(),
            api_version: default_api_version(),
            per_page: default_per_page(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_base_ms: default_retry_base_ms(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.intercom.io".into()
}
fn default_api_token_env() -> String {
    "INTERCOM_PROD_KEY".into()
}
fn default_api_version() -> String {
    "2.10".into()
}
fn default_per_page() -> u32 {
    MAX_PER_PAGE
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_attempts() -> u32 {
    4
}
fn default_retry_base_ms() -> u64 {
    2000
}

/// What to do with an area attribute value that matches no known area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownAreaPolicy {
    /// Leave the conversation without an area; it appears only in
    /// ALL-area buckets.
    #[default]
    Unassigned,
    /// Coerce into the `Other` catch-all area.
    Other,
}

/// `[classify]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyPolicyConfig {
    /// Custom-attribute key carrying the product area.
    #[serde(default = "default_area_attribute")]
    pub area_attribute: String,

    /// Custom-attribute key carrying the team name, checked before the
    /// assignee-id fallback.
    #[serde(default = "default_team_attribute")]
    pub team_attribute: String,

    /// Policy for unrecognized area values.
    #[serde(default)]
    pub unknown_area_policy: UnknownAreaPolicy,

    /// Additional stop words merged into the built-in keyword filter.
    #[serde(default)]
    pub extra_stop_words: Vec<String>,
}

impl Default for ClassifyPolicyConfig {
    fn default() -> Self {
        Self {
            area_attribute: default_area_attribute(),
            team_attribute: default_team_attribute(),
            unknown_area_policy: UnknownAreaPolicy::default(),
            extra_stop_words: Vec::new(),
        }
    }
}

fn default_area_attribute() -> String {
    "MetaMask area".into()
}
fn default_team_attribute() -> String {
    "Team".into()
}

// ---------------------------------------------------------------------------
// Fetch config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime fetch configuration handed to the search client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub api_base: String,
    pub api_version: String,
    pub per_page: u32,
    pub timeout: Duration,
    pub max_attempts: u32,
    pub retry_base: Duration,
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_base: config.intercom.api_base.clone(),
            api_version: config.intercom.api_version.clone(),
            per_page: config.intercom.per_page.min(MAX_PER_PAGE),
            timeout: Duration::from_secs(config.intercom.timeout_secs),
            max_attempts: config.intercom.max_attempts.max(1),
            retry_base: Duration::from_millis(config.intercom.retry_base_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.shiftscope/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ShiftscopeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.shiftscope/shiftscope.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ShiftscopeError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ShiftscopeError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ShiftscopeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ShiftscopeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ShiftscopeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Parse the configured reference timezone.
pub fn reference_timezone(config: &AppConfig) -> Result<Tz> {
    config.defaults.timezone.parse().map_err(|_| {
        ShiftscopeError::config(format!("unknown timezone: {}", config.defaults.timezone))
    })
}

/// Read the API token from the configured env var. The token itself is
/// never written to config or logs.
pub fn api_token(config: &AppConfig) -> Result<String> {
    let var_name = &config.intercom.api_token_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(ShiftscopeError::config(format!(
            "API token not found. Set the {var_name} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("INTERCOM_PROD_KEY"));
        assert!(toml_str.contains("America/New_York"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.intercom.per_page, 150);
        assert_eq!(parsed.classify.area_attribute, "MetaMask area");
        assert_eq!(
            parsed.classify.unknown_area_policy,
            UnknownAreaPolicy::Unassigned
        );
    }

    #[test]
    fn fetch_config_caps_page_size() {
        let mut app = AppConfig::default();
        app.intercom.per_page = 500;
        let fetch = FetchConfig::from(&app);
        assert_eq!(fetch.per_page, MAX_PER_PAGE);
        assert_eq!(fetch.timeout, Duration::from_secs(30));
    }

    #[test]
    fn unknown_area_policy_parses() {
        let config: AppConfig = toml::from_str(
            r#"
[classify]
unknown_area_policy = "other"
"#,
        )
        .expect("parse");
        assert_eq!(config.classify.unknown_area_policy, UnknownAreaPolicy::Other);
    }

    #[test]
    fn bad_timezone_rejected() {
        let mut config = AppConfig::default();
        config.defaults.timezone = "Mars/Olympus_Mons".into();
        assert!(reference_timezone(&config).is_err());
    }

    #[test]
    fn api_token_validation() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.intercom.api_token_env = "SS_TEST_NONEXISTENT_KEY_12345".into();
        let result = api_token(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API token not found"));
    }
}

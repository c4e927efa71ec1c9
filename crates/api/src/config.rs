//! Connection settings for the n8n instance.
//!
//! Settings come from a `KEY=VALUE` file (default `.env`) layered over the
//! process environment: a value present in the file wins. The resulting
//! [`Config`] is built once at startup and handed to [`crate::N8nClient`]; no
//! other component reads the environment.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use n8nctl_util::mask_secret;
use thiserror::Error;
use tracing::{debug, warn};

/// Base URL of the instance, for example `https://n8n.example.com`.
pub const HOST_URL_VAR: &str = "N8N_HOST_URL";
/// API key created in the instance settings.
pub const API_KEY_VAR: &str = "N8N_API_KEY";
/// Both settings every API-backed command needs.
pub const REQUIRED_VARS: [&str; 2] = [HOST_URL_VAR, API_KEY_VAR];
/// File read when no `--env-file` is given.
pub const DEFAULT_ENV_FILE: &str = ".env";
/// Keys shorter than this are almost certainly truncated copies.
pub const MIN_API_KEY_LENGTH: usize = 10;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<String>),

    #[error("{HOST_URL_VAR} must start with http:// or https://; got '{0}'")]
    InvalidHostUrl(String),

    #[error("{API_KEY_VAR} looks too short ({0} characters); check that it was copied completely")]
    ApiKeyTooShort(usize),
}

/// A line of the env file that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFileWarning {
    /// 1-based line number.
    pub line: usize,
    pub content: String,
}

/// Parsed contents of an env file.
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    pub path: PathBuf,
    pub entries: IndexMap<String, String>,
    pub warnings: Vec<EnvFileWarning>,
}

impl EnvFile {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

/// Parse `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are skipped, the line is split on the first
/// `=`, key and value are trimmed and one pair of matching surrounding quotes
/// is removed from the value. Lines without `=` are returned as warnings.
pub fn parse_env_file(content: &str) -> (IndexMap<String, String>, Vec<EnvFileWarning>) {
    let mut entries = IndexMap::new();
    let mut warnings = Vec::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            warnings.push(EnvFileWarning {
                line: index + 1,
                content: line.to_string(),
            });
            continue;
        };

        entries.insert(key.trim().to_string(), strip_matching_quotes(value.trim()).to_string());
    }

    (entries, warnings)
}

fn strip_matching_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Read and parse an env file. A missing file is `Ok(None)`.
pub fn load_env_file(path: &Path) -> Result<Option<EnvFile>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "env file not found");
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let (entries, warnings) = parse_env_file(&content);
    for warning in &warnings {
        warn!(path = %path.display(), line = warning.line, "ignoring malformed env file line");
    }
    debug!(path = %path.display(), entries = entries.len(), "loaded env file");

    Ok(Some(EnvFile {
        path: path.to_path_buf(),
        entries,
        warnings,
    }))
}

/// Host URL and API key for one n8n instance.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    host_url: String,
    api_key: String,
}

impl Config {
    /// Build from explicit values. Trailing `/` characters are removed from the host.
    pub fn new(host_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let host_url = host_url.into();
        Self {
            host_url: host_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.into().trim().to_string(),
        }
    }

    /// Read both settings from `path` layered over the process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let env_file = load_env_file(path)?;
        Self::from_sources(env_file.as_ref())
    }

    /// Resolve both settings, preferring the env file over the process environment.
    ///
    /// Empty values count as missing; every missing key is reported at once.
    pub fn from_sources(env_file: Option<&EnvFile>) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut resolved = Vec::with_capacity(REQUIRED_VARS.len());

        for key in REQUIRED_VARS {
            match lookup(key, env_file) {
                Some(value) => resolved.push(value),
                None => missing.push(key.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let api_key = resolved.pop().unwrap_or_default();
        let host_url = resolved.pop().unwrap_or_default();
        Ok(Self::new(host_url, api_key))
    }

    /// Check the host scheme and the API key length.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.host_url.starts_with("http://") || self.host_url.starts_with("https://")) {
            return Err(ConfigError::InvalidHostUrl(self.host_url.clone()));
        }
        let key_length = self.api_key.chars().count();
        if key_length < MIN_API_KEY_LENGTH {
            return Err(ConfigError::ApiKeyTooShort(key_length));
        }
        Ok(())
    }

    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// First characters of the key followed by `...`, for display.
    pub fn masked_api_key(&self) -> String {
        mask_secret(&self.api_key, 10)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host_url", &self.host_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

fn lookup(key: &str, env_file: Option<&EnvFile>) -> Option<String> {
    env_file
        .and_then(|file| file.get(key))
        .map(str::to_string)
        .filter(|value| !value.is_empty())
        .or_else(|| env::var(key).ok().filter(|value| !value.is_empty()))
}

/// Snapshot of where the settings stand, for the env check command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvStatus {
    pub env_file: PathBuf,
    pub file_exists: bool,
    /// Each required key with its display value; sensitive values are masked.
    pub vars: Vec<(&'static str, Option<String>)>,
}

impl EnvStatus {
    pub fn is_complete(&self) -> bool {
        self.vars.iter().all(|(_, value)| value.is_some())
    }
}

/// Report whether the env file exists and which required keys resolve.
pub fn env_status(path: &Path) -> Result<EnvStatus, ConfigError> {
    let env_file = load_env_file(path)?;
    let vars = REQUIRED_VARS
        .iter()
        .map(|key| {
            let display = lookup(key, env_file.as_ref()).map(|value| {
                if is_sensitive_key(key) {
                    mask_secret(&value, 10)
                } else {
                    value
                }
            });
            (*key, display)
        })
        .collect();

    Ok(EnvStatus {
        env_file: path.to_path_buf(),
        file_exists: env_file.is_some(),
        vars,
    })
}

fn is_sensitive_key(key: &str) -> bool {
    ["KEY", "TOKEN", "SECRET"].iter().any(|marker| key.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_comments_quotes_and_malformed_lines() {
        let content = "# n8n connection\n\nN8N_HOST_URL = \"https://n8n.local/\"\nN8N_API_KEY='dummy_abc=def=ghi'\nnot a pair\nEMPTY=\n";

        let (entries, warnings) = parse_env_file(content);

        assert_eq!(entries.get("N8N_HOST_URL").map(String::as_str), Some("https://n8n.local/"));
        assert_eq!(entries.get("N8N_API_KEY").map(String::as_str), Some("dummy_abc=def=ghi"));
        assert_eq!(entries.get("EMPTY").map(String::as_str), Some(""));
        assert_eq!(
            warnings,
            vec![EnvFileWarning {
                line: 5,
                content: "not a pair".into()
            }]
        );
    }

    #[test]
    fn mismatched_quotes_are_kept() {
        let (entries, _) = parse_env_file("A=\"half\nB='x\"\nC=\"");
        assert_eq!(entries["A"], "\"half");
        assert_eq!(entries["B"], "'x\"");
        assert_eq!(entries["C"], "\"");
    }

    #[test]
    fn env_file_values_override_process_environment() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        fs::write(&path, "N8N_HOST_URL=https://from-file.example/\n").expect("write env file");

        temp_env::with_vars(
            [
                (HOST_URL_VAR, Some("https://from-env.example")),
                (API_KEY_VAR, Some("env-api-key-1234")),
            ],
            || {
                let config = Config::load(&path).expect("config loads");
                assert_eq!(config.host_url(), "https://from-file.example");
                assert_eq!(config.api_key(), "env-api-key-1234");
            },
        );
    }

    #[test]
    fn missing_settings_are_all_reported() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("absent.env");

        temp_env::with_vars_unset([HOST_URL_VAR, API_KEY_VAR], || {
            let error = Config::load(&path).expect_err("both settings missing");
            match error {
                ConfigError::MissingVars(keys) => assert_eq!(keys, vec![HOST_URL_VAR, API_KEY_VAR]),
                other => panic!("unexpected error: {other}"),
            }
        });
    }

    #[test]
    fn empty_values_count_as_missing() {
        let (entries, warnings) = parse_env_file("N8N_HOST_URL=\nN8N_API_KEY=abcdefghijkl\n");
        let env_file = EnvFile {
            path: PathBuf::from(".env"),
            entries,
            warnings,
        };

        temp_env::with_vars_unset([HOST_URL_VAR, API_KEY_VAR], || {
            let error = Config::from_sources(Some(&env_file)).expect_err("host missing");
            assert!(matches!(error, ConfigError::MissingVars(keys) if keys == vec![HOST_URL_VAR.to_string()]));
        });
    }

    #[test]
    fn validation_checks_scheme_and_key_length() {
        assert!(Config::new("https://n8n.local", "abcdefghij").validate().is_ok());
        assert!(matches!(
            Config::new("n8n.local", "abcdefghij").validate(),
            Err(ConfigError::InvalidHostUrl(_))
        ));
        assert!(matches!(
            Config::new("http://n8n.local", "short").validate(),
            Err(ConfigError::ApiKeyTooShort(5))
        ));
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        let config = Config::new("https://n8n.local", "super-secret-key");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-key"));
        assert_eq!(config.masked_api_key(), "super-secr...");
    }

    #[test]
    fn env_status_masks_the_api_key() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        fs::write(&path, "N8N_HOST_URL=https://n8n.local\nN8N_API_KEY=abcdefghijklmnop\n").expect("write env file");

        temp_env::with_vars_unset([HOST_URL_VAR, API_KEY_VAR], || {
            let status = env_status(&path).expect("status");
            assert!(status.file_exists);
            assert!(status.is_complete());
            assert_eq!(
                status.vars,
                vec![
                    (HOST_URL_VAR, Some("https://n8n.local".to_string())),
                    (API_KEY_VAR, Some("abcdefghij...".to_string())),
                ]
            );
        });
    }
}

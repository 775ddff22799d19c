//! Configuration file management for zimed.
//!
//! Provides a TOML-based config file at `~/.config/zimed/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use zimed_core::backend::GeminiConfig;
use zimed_core::backend::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "ZIMED_MODEL";
pub const BASE_URL_ENV: &str = "ZIMED_GEMINI_BASE_URL";
pub const TIMEOUT_ENV: &str = "ZIMED_TIMEOUT_SECS";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub gemini: GeminiSection,
    #[serde(default, skip_serializing_if = "ProfileSection::is_empty")]
    pub profile: ProfileSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GeminiSection {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds. Absent means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Defaults for the form screens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
}

impl ProfileSection {
    fn is_empty(&self) -> bool {
        self.teacher_name.is_none() && self.school_name.is_none()
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the zimed config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/zimed` or `~/.config/zimed`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("zimed");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("zimed")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// The file holds an API key, so it is made owner-only on Unix.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(path)
}

/// Show the first and last four characters of a key.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Form defaults read from the config file. Never fails.
pub fn load_profile() -> ProfileSection {
    load_config().map(|c| c.profile).unwrap_or_default()
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(non_empty)
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct ZimedConfig {
    pub gemini: GeminiConfig,
    pub model: String,
}

impl ZimedConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `cli_api_key` > `GEMINI_API_KEY` > `gemini.api_key` > error
    /// - Model: `cli_model` > `ZIMED_MODEL` > `gemini.model` > `DEFAULT_MODEL`
    /// - Base URL: `ZIMED_GEMINI_BASE_URL` > `gemini.base_url` > `DEFAULT_BASE_URL`
    /// - Timeout: `ZIMED_TIMEOUT_SECS` > `gemini.timeout_secs` > none
    pub fn resolve(cli_api_key: Option<&str>, cli_model: Option<&str>) -> Result<Self> {
        let file = load_config().ok().map(|c| c.gemini);

        let api_key = cli_api_key
            .map(str::to_string)
            .and_then(non_empty)
            .or_else(|| env_var(API_KEY_ENV))
            .or_else(|| file.as_ref().and_then(|f| non_empty(f.api_key.clone())));
        let Some(api_key) = api_key else {
            bail!(
                "Gemini API key not found; set {API_KEY_ENV} or run `zimed init --api-key <KEY>` to create a config file"
            );
        };

        let model = cli_model
            .map(str::to_string)
            .and_then(non_empty)
            .or_else(|| env_var(MODEL_ENV))
            .or_else(|| file.as_ref().and_then(|f| f.model.clone()).and_then(non_empty))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = env_var(BASE_URL_ENV)
            .or_else(|| file.as_ref().and_then(|f| f.base_url.clone()).and_then(non_empty))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match env_var(TIMEOUT_ENV) {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .with_context(|| format!("{TIMEOUT_ENV} is not a whole number of seconds"))?,
            ),
            None => file.as_ref().and_then(|f| f.timeout_secs),
        };

        let mut gemini = GeminiConfig::new(api_key);
        gemini.base_url = base_url;
        gemini.timeout = timeout_secs.filter(|s| *s > 0).map(Duration::from_secs);

        Ok(Self { gemini, model })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    /// Point the config dir at an empty temp dir and clear zimed env vars.
    fn isolated_env() -> tempfile::TempDir {
        let tmp = tempfile::TempDir::new().unwrap();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        for name in [API_KEY_ENV, MODEL_ENV, BASE_URL_ENV, TIMEOUT_ENV] {
            unsafe { std::env::remove_var(name) };
        }
        tmp
    }

    fn restore_env() {
        unsafe { std::env::remove_var("XDG_CONFIG_HOME") };
        for name in [API_KEY_ENV, MODEL_ENV, BASE_URL_ENV, TIMEOUT_ENV] {
            unsafe { std::env::remove_var(name) };
        }
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let _lock = lock_env();
        let _tmp = isolated_env();

        let original = ConfigFile {
            gemini: GeminiSection {
                api_key: "key-123".into(),
                model: Some("gemini-test".into()),
                base_url: None,
                timeout_secs: Some(30),
            },
            profile: ProfileSection {
                teacher_name: Some("Mrs. Moyo".into()),
                school_name: None,
            },
        };
        let path = save_config(&original).unwrap();
        let loaded = load_config().unwrap();
        restore_env();

        assert!(path.ends_with("zimed/config.toml"));
        assert_eq!(loaded.gemini.api_key, "key-123");
        assert_eq!(loaded.gemini.model.as_deref(), Some("gemini-test"));
        assert_eq!(loaded.gemini.timeout_secs, Some(30));
        assert_eq!(loaded.profile.teacher_name.as_deref(), Some("Mrs. Moyo"));
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let _lock = lock_env();
        let _tmp = isolated_env();

        let path = save_config(&ConfigFile::default()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        restore_env();

        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn resolve_with_cli_flags_overrides_all() {
        let _lock = lock_env();
        let _tmp = isolated_env();
        unsafe { std::env::set_var(API_KEY_ENV, "env-key") };
        unsafe { std::env::set_var(MODEL_ENV, "env-model") };

        let config = ZimedConfig::resolve(Some("cli-key"), Some("cli-model"));
        restore_env();

        let config = config.unwrap();
        assert_eq!(config.gemini.api_key, "cli-key");
        assert_eq!(config.model, "cli-model");
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();
        let _tmp = isolated_env();
        save_config(&ConfigFile {
            gemini: GeminiSection {
                api_key: "file-key".into(),
                model: Some("file-model".into()),
                base_url: Some("http://file.example".into()),
                timeout_secs: Some(10),
            },
            profile: ProfileSection::default(),
        })
        .unwrap();
        unsafe { std::env::set_var(API_KEY_ENV, "env-key") };
        unsafe { std::env::set_var(BASE_URL_ENV, "http://127.0.0.1:1") };

        let config = ZimedConfig::resolve(None, None);
        restore_env();

        let config = config.unwrap();
        assert_eq!(config.gemini.api_key, "env-key");
        assert_eq!(config.model, "file-model");
        assert_eq!(config.gemini.base_url, "http://127.0.0.1:1");
        assert_eq!(config.gemini.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn resolve_defaults_model_and_base_url() {
        let _lock = lock_env();
        let _tmp = isolated_env();
        unsafe { std::env::set_var(API_KEY_ENV, "env-key") };

        let config = ZimedConfig::resolve(None, None);
        restore_env();

        let config = config.unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.gemini.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.gemini.timeout, None);
    }

    #[test]
    fn resolve_errors_when_no_api_key() {
        let _lock = lock_env();
        let _tmp = isolated_env();

        let result = ZimedConfig::resolve(Some("   "), None);
        restore_env();

        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("Gemini API key not found"), "unexpected error: {msg}");
    }

    #[test]
    fn resolve_rejects_bad_timeout() {
        let _lock = lock_env();
        let _tmp = isolated_env();
        unsafe { std::env::set_var(API_KEY_ENV, "env-key") };
        unsafe { std::env::set_var(TIMEOUT_ENV, "soon") };

        let result = ZimedConfig::resolve(None, None);
        restore_env();

        assert!(result.is_err());
    }

    #[test]
    fn mask_key_hides_the_middle() {
        assert_eq!(mask_key("AIzaSyA-1234567890-abcd"), "AIza...abcd");
        assert_eq!(mask_key("short"), "*****");
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let _guard = lock_env();
        let path = config_path();
        assert!(
            path.ends_with("zimed/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}

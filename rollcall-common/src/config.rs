//! Backend endpoint configuration
//!
//! Base URL resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Compiled default backend base URL (development deployment)
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable consulted when no command-line argument is given
pub const BASE_URL_ENV: &str = "ROLLCALL_BASE_URL";

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// On-disk shape of config.toml; every key is optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Resolve the client configuration for this process.
///
/// A missing config file falls through to the next tier; a malformed one
/// is a hard [`Error::Config`], not a silent fallback.
pub fn resolve_config(cli_base_url: Option<&str>) -> Result<ClientConfig> {
    let file = match default_config_path() {
        Some(path) => load_config_file(&path)?,
        None => ConfigFile::default(),
    };
    let env_url = std::env::var(BASE_URL_ENV).ok();
    Ok(build_config(cli_base_url, env_url.as_deref(), &file))
}

fn build_config(cli: Option<&str>, env: Option<&str>, file: &ConfigFile) -> ClientConfig {
    // Priority 1: command-line argument
    // Priority 2: environment variable
    // Priority 3: TOML config file
    // Priority 4: compiled default
    let raw = cli
        .map(str::to_string)
        .or_else(|| env.map(str::to_string))
        .or_else(|| file.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    ClientConfig {
        base_url: normalize_base_url(&raw),
        timeout_secs: file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
    }
}

/// Strip trailing slashes so endpoint paths join predictably.
fn normalize_base_url(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}

/// Per-user config file location (`~/.config/rollcall/config.toml` on Linux).
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rollcall").join("config.toml"))
}

/// Read and parse one config file. Missing file yields an empty config.
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&text)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_argument_beats_everything() {
        let file = ConfigFile {
            base_url: Some("http://file.example/api".to_string()),
            timeout_secs: None,
        };
        let config = build_config(
            Some("http://cli.example/api"),
            Some("http://env.example/api"),
            &file,
        );
        assert_eq!(config.base_url, "http://cli.example/api");
    }

    #[test]
    fn test_env_beats_file_and_default() {
        let file = ConfigFile {
            base_url: Some("http://file.example/api".to_string()),
            timeout_secs: None,
        };
        let config = build_config(None, Some("http://env.example/api"), &file);
        assert_eq!(config.base_url, "http://env.example/api");
    }

    #[test]
    fn test_file_beats_default() {
        let file = ConfigFile {
            base_url: Some("http://file.example/api".to_string()),
            timeout_secs: Some(5),
        };
        let config = build_config(None, None, &file);
        assert_eq!(config.base_url, "http://file.example/api");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_compiled_default_when_nothing_set() {
        let config = build_config(None, None, &ConfigFile::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_trailing_slashes_trimmed() {
        let config = build_config(Some("http://cli.example/api///"), None, &ConfigFile::default());
        assert_eq!(config.base_url, "http://cli.example/api");
    }

    #[test]
    fn test_missing_config_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let file = load_config_file(&dir.path().join("config.toml")).unwrap();
        assert!(file.base_url.is_none());
        assert!(file.timeout_secs.is_none());
    }

    #[test]
    fn test_config_file_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "base_url = \"http://school.example/api\"").unwrap();
        writeln!(f, "timeout_secs = 10").unwrap();

        let file = load_config_file(&path).unwrap();
        assert_eq!(file.base_url.as_deref(), Some("http://school.example/api"));
        assert_eq!(file.timeout_secs, Some(10));
    }

    #[test]
    fn test_malformed_config_file_is_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = [not toml").unwrap();

        let result = load_config_file(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}

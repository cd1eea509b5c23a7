//! Configuration Management
//!
//! Persistent settings live in `~/.spinup.json` (or `~/.spinup.yaml`).
//! Effective values are layered: command line > environment > file.

use crate::error::{Result, SpinupError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_URL: &str = "SPINUP_URL";
pub const ENV_TOKEN: &str = "SPINUP_TOKEN";
pub const ENV_USERNAME: &str = "SPINUP_USERNAME";
pub const ENV_PASSWORD: &str = "SPINUP_PASSWORD";
pub const ENV_SPACES: &str = "SPINUP_SPACES";
pub const ENV_CAS_URL: &str = "SPINUP_CAS_URL";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Base url of the Spinup service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// API token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// CAS server for username/password login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cas_url: Option<String>,
    /// Default spaces searched for bare resource names
    #[serde(default)]
    pub spaces: Vec<String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub token: Option<String>,
    pub spaces: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Format {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Format::Yaml,
        _ => Format::Json,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl Config {
    /// Default config file: the first existing `~/.spinup.{json,yaml,yml}`,
    /// else `~/.spinup.json`
    pub fn default_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        let candidates = [".spinup.json", ".spinup.yaml", ".spinup.yml"];
        candidates
            .iter()
            .map(|name| home.join(name))
            .find(|p| p.exists())
            .or_else(|| Some(home.join(".spinup.json")))
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SpinupError::Config(format!("failed to read {}: {}", path.display(), e)))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let parsed = match format_of(path) {
            Format::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|e| SpinupError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to `path`, in the format its extension names
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SpinupError::Config(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let content = match format_of(path) {
            Format::Json => serde_json::to_string_pretty(self).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::to_string(self).map_err(|e| e.to_string()),
        }
        .map_err(SpinupError::Config)?;

        std::fs::write(path, content)
            .map_err(|e| SpinupError::Config(format!("failed to write {}: {}", path.display(), e)))?;
        tracing::info!("saved configuration to {}", path.display());
        Ok(())
    }

    /// Layer environment variables over the file values
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = non_empty(lookup(ENV_URL)) {
            self.url = Some(v);
        }
        if let Some(v) = non_empty(lookup(ENV_TOKEN)) {
            self.token = Some(v);
        }
        if let Some(v) = non_empty(lookup(ENV_USERNAME)) {
            self.username = Some(v);
        }
        if let Some(v) = non_empty(lookup(ENV_PASSWORD)) {
            self.password = Some(v);
        }
        if let Some(v) = non_empty(lookup(ENV_CAS_URL)) {
            self.cas_url = Some(v);
        }
        if let Some(v) = non_empty(lookup(ENV_SPACES)) {
            self.spaces = split_list(&v);
        }
    }

    /// Layer command-line values over everything else
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(v) = non_empty(overrides.url.clone()) {
            self.url = Some(v);
        }
        if let Some(v) = non_empty(overrides.token.clone()) {
            self.token = Some(v);
        }
        if !overrides.spaces.is_empty() {
            self.spaces = overrides
                .spaces
                .iter()
                .flat_map(|s| split_list(s))
                .collect();
        }
    }

    /// Effective configuration: file at `path`, then env, then overrides
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::default(),
        };
        config.apply_env(|k| std::env::var(k).ok());
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn effective_url(&self) -> Result<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                SpinupError::Config(format!(
                    "spinup url required; run `spinup configure`, set {} or pass --url",
                    ENV_URL
                ))
            })
    }

    pub fn effective_cas_url(&self) -> &str {
        self.cas_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(crate::spinup::auth::DEFAULT_CAS_URL)
    }

    /// Username and password when both are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }

    /// Copy safe to print
    pub fn masked(&self) -> Self {
        let mask = |v: &Option<String>| {
            v.as_ref().map(|s| {
                if s.chars().count() <= 8 {
                    "********".to_string()
                } else {
                    format!("{}********", s.chars().take(4).collect::<String>())
                }
            })
        };
        Self {
            token: mask(&self.token),
            password: self.password.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join(".spinup.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".spinup.json");
        let config = Config {
            url: Some("https://spinup.example.edu".to_string()),
            spaces: vec!["teamA".to_string(), "teamB".to_string()],
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".spinup.yaml");
        std::fs::write(&path, "url: https://spinup.example.edu\nspaces:\n  - teamA\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.url.as_deref(), Some("https://spinup.example.edu"));
        assert_eq!(config.spaces, vec!["teamA"]);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".spinup.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(SpinupError::Config(_))
        ));
    }

    #[test]
    fn test_precedence() {
        let mut config = Config {
            url: Some("file".to_string()),
            token: Some("file-token".to_string()),
            spaces: vec!["fileSpace".to_string()],
            ..Default::default()
        };
        let env: HashMap<&str, &str> =
            [(ENV_URL, "env"), (ENV_SPACES, "a, b,,c")].into_iter().collect();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.url.as_deref(), Some("env"));
        assert_eq!(config.token.as_deref(), Some("file-token"));
        assert_eq!(config.spaces, vec!["a", "b", "c"]);

        config.apply_overrides(&Overrides {
            url: Some("cli".to_string()),
            token: None,
            spaces: vec!["x,y".to_string()],
        });
        assert_eq!(config.url.as_deref(), Some("cli"));
        assert_eq!(config.spaces, vec!["x", "y"]);
    }

    #[test]
    fn test_effective_url_required() {
        assert!(Config::default().effective_url().is_err());
    }

    #[test]
    fn test_masked() {
        let config = Config {
            token: Some("abcdefghijklmnop".to_string()),
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let masked = config.masked();
        assert_eq!(masked.token.as_deref(), Some("abcd********"));
        assert_eq!(masked.password.as_deref(), Some("********"));
    }
}

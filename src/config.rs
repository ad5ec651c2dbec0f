//! Forge configuration.
//!
//! Loaded from `<forge home>/config.toml`, where the forge home is
//! `FORGE_HOME` or `~/.forge`. A missing file means defaults, but nothing can
//! be generated until a gateway is configured:
//!
//! ```toml
//! [gateway]
//! url = "https://agents.example.com/chat"   # or: command = ["my-agent", "--json"]
//! api-key-env = "FORGE_API_KEY"
//! timeout-secs = 120
//!
//! [capabilities]
//! generate = "addon-manager"
//! refine = "iteration-feedback"
//! deliver = "github-delivery"
//! package = "addon-packager"
//! ```

use std::{env, fs, io, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::workflow::Stage;

/// Errors loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHome,

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Forge configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub gateway: GatewayConfig,
    pub capabilities: Capabilities,
}

/// How to reach the agent gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GatewayConfig {
    /// Program and arguments for a local gateway process.
    pub command: Vec<String>,

    /// HTTP endpoint. Takes precedence over `command`.
    pub url: Option<String>,

    /// Environment variable holding a bearer token for `url`.
    pub api_key_env: Option<String>,

    /// Per call, for either transport.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            url: None,
            api_key_env: None,
            timeout_secs: 120,
        }
    }
}

/// Gateway capability identifiers, one per pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub generate: String,
    pub refine: String,
    pub deliver: String,
    pub package: String,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            generate: "addon-manager".to_string(),
            refine: "iteration-feedback".to_string(),
            deliver: "github-delivery".to_string(),
            package: "addon-packager".to_string(),
        }
    }
}

impl Capabilities {
    pub fn for_stage(&self, stage: Stage) -> &str {
        match stage {
            Stage::Generate => &self.generate,
            Stage::Refine => &self.refine,
            Stage::Deliver => &self.deliver,
            Stage::Package => &self.package,
        }
    }
}

impl Config {
    /// Loads `<forge home>/config.toml`, applying environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let home = forge_home().ok_or(ConfigError::NoHome)?;
        let mut config = Self::load_from(&home.join("config.toml"))?;
        if let Ok(url) = env::var("FORGE_GATEWAY_URL") {
            if !url.is_empty() {
                config.gateway.url = Some(url);
            }
        }
        Ok(config)
    }

    /// Loads a config file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The forge home directory: `FORGE_HOME`, else `~/.forge`.
pub fn forge_home() -> Option<PathBuf> {
    match env::var_os("FORGE_HOME") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::home_dir().map(|h| h.join(".forge")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert!(config.gateway.url.is_none());
        assert_eq!(config.gateway.timeout_secs, 120);
        assert_eq!(config.capabilities, Capabilities::default());
    }

    #[test]
    fn parses_kebab_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[gateway]
command = ["agent", "--json"]
api-key-env = "KEY"

[capabilities]
refine = "custom-refiner"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.gateway.command, ["agent", "--json"]);
        assert_eq!(config.gateway.api_key_env.as_deref(), Some("KEY"));
        assert_eq!(config.capabilities.for_stage(Stage::Refine), "custom-refiner");
        assert_eq!(config.capabilities.for_stage(Stage::Generate), "addon-manager");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[gateway\nurl = 1").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

//! CLI configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::PortalClient;

/// Raw `gridlogin.toml` contents. Every field is optional; missing values
/// resolve to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the stored account and matrix live.
    pub data_dir: Option<PathBuf>,

    /// Portal base URL override. The fixed production portal is the default;
    /// this mainly exists for testing against a local server.
    pub portal_base_url: Option<String>,
}

/// Configuration with all defaults applied.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub portal_base_url: String,
}

impl ResolvedConfig {
    /// Load the config file if it exists, falling back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path:?}"))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {path:?}"))?
        } else {
            Config::default()
        };
        Ok(Self::resolve(config))
    }

    fn resolve(config: Config) -> Self {
        Self {
            data_dir: config.data_dir.unwrap_or_else(default_data_dir),
            portal_base_url: config
                .portal_base_url
                .unwrap_or_else(|| PortalClient::DEFAULT_BASE_URL.to_string()),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("gridlogin"))
        .unwrap_or_else(|| PathBuf::from("gridlogin-data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let resolved = ResolvedConfig::resolve(Config::default());
        assert_eq!(resolved.portal_base_url, PortalClient::DEFAULT_BASE_URL);
    }

    #[test]
    fn overrides_are_kept() {
        let config: Config = toml::from_str(
            r#"
            data_dir = "/tmp/gridlogin-test"
            portal_base_url = "http://localhost:9000"
            "#,
        )
        .unwrap();
        let resolved = ResolvedConfig::resolve(config);
        assert_eq!(resolved.data_dir, PathBuf::from("/tmp/gridlogin-test"));
        assert_eq!(resolved.portal_base_url, "http://localhost:9000");
    }
}

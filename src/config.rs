use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_sort")]
    pub default_sort: String,
    #[serde(default = "default_difficulty_filter")]
    pub default_difficulty: String,
    #[serde(default)]
    pub top: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_refresh_secs")]
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend_url: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/upskill-advisor/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(backend_url) = overrides.backend_url {
            self.backend.url = backend_url;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[backend]
url = "http://127.0.0.1:8000"
request_timeout_secs = 12
connect_timeout_secs = 6

[display]
default_sort = "score"
default_difficulty = "all"
# top = 3

[dashboard]
refresh_interval_secs = 30
"#;
        template.to_string()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort(),
            default_difficulty: default_difficulty_filter(),
            top: None,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_secs(),
        }
    }
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_request_timeout() -> u64 {
    12
}

fn default_connect_timeout() -> u64 {
    6
}

fn default_sort() -> String {
    "score".to_string()
}

fn default_difficulty_filter() -> String {
    "all".to_string()
}

fn default_refresh_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigOverrides};

    #[test]
    fn template_round_trips_through_toml() {
        let parsed: Config =
            toml::from_str(&Config::default_template()).expect("template must parse");
        assert_eq!(parsed.backend.url, "http://127.0.0.1:8000");
        assert_eq!(parsed.display.default_sort, "score");
        assert_eq!(parsed.dashboard.refresh_interval_secs, 30);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[backend]\nurl = \"http://advisor:9000\"\n")
            .expect("partial config must parse");
        assert_eq!(parsed.backend.url, "http://advisor:9000");
        assert_eq!(parsed.backend.request_timeout_secs, 12);
        assert_eq!(parsed.display.default_difficulty, "all");
    }

    #[test]
    fn overrides_replace_backend_url() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            backend_url: Some("http://other:8000".to_string()),
        });
        assert_eq!(config.backend.url, "http://other:8000");
    }
}

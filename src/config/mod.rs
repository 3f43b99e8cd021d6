// ABOUTME: Configuration management for dockdeck
// Layers TOML config files and owns the client-local persisted state store

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::table::{DEFAULT_PAGE_SIZE, PAGE_SIZES};

pub mod store;

pub use store::{ClientState, ClientStore, FileStore, MemoryStore};

pub const APP_DIR: &str = ".dockdeck";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub terminal: TerminalConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Backend root, without the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows per table page (10, 20, 50 or 100)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Seconds between automatic reloads of the current table; 0 disables
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(default = "default_shell")]
    pub default_shell: String,

    /// Lines of history kept by the exec terminal emulator
    #[serde(default = "default_scrollback")]
    pub scrollback: usize,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            default_shell: default_shell(),
            scrollback: default_scrollback(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_shell() -> String {
    "sh".to_string()
}

fn default_scrollback() -> usize {
    2000
}

fn default_connect_timeout() -> u64 {
    5
}

impl AppConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_paths())
    }

    /// Files are given highest precedence first. Every key a file sets wins over
    /// the same key in any later file, even when it equals the built-in default.
    pub fn load_from(paths: &[PathBuf]) -> Result<Self> {
        let mut merged = toml::Table::new();

        for path in paths.iter().rev() {
            if let Some(table) = Self::read_table(path)? {
                merge_tables(&mut merged, table);
            }
        }

        let mut config: Self = toml::Value::Table(merged)
            .try_into()
            .context("Invalid configuration")?;
        config.normalize();
        Ok(config)
    }

    fn read_table(path: &Path) -> Result<Option<toml::Table>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let table: toml::Table = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(Some(table))
    }

    pub fn read_file(path: &Path) -> Result<Option<Self>> {
        let Some(table) = Self::read_table(path)? else {
            return Ok(None);
        };
        let config = toml::Value::Table(table)
            .try_into()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(Some(config))
    }

    /// Save configuration to user config directory
    pub fn save(&self) -> Result<()> {
        let config_dir = user_dir()?;
        self.save_to(&config_dir.join(CONFIG_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Get configuration file paths in order of precedence
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        // 1. Local project config
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(APP_DIR).join(CONFIG_FILE));
        }

        // 2. User config (~/.dockdeck/config.toml)
        if let Ok(dir) = user_dir() {
            paths.push(dir.join(CONFIG_FILE));
        }

        paths
    }

    fn normalize(&mut self) {
        if !PAGE_SIZES.contains(&self.ui.page_size) {
            warn!(
                "Unsupported page size {} in config, using {}",
                self.ui.page_size, DEFAULT_PAGE_SIZE
            );
            self.ui.page_size = DEFAULT_PAGE_SIZE;
        }
        self.server.base_url = self.server.base_url.trim_end_matches('/').to_string();
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.terminal.connect_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.ui.refresh_interval_secs > 0)
            .then(|| Duration::from_secs(self.ui.refresh_interval_secs))
    }
}

/// Overlays `upper` onto `base`, descending into sections so sibling keys survive.
fn merge_tables(base: &mut toml::Table, upper: toml::Table) {
    for (key, value) in upper {
        match value {
            toml::Value::Table(section) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, section);
                    continue;
                }
                base.insert(key, toml::Value::Table(section));
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// `~/.dockdeck`, home of the user config, state file and logs
pub fn user_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().context("Failed to get home directory")?;
    Ok(home_dir.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.base_url, "http://localhost:8080");
        assert_eq!(config.ui.page_size, 20);
        assert_eq!(config.terminal.default_shell, "sh");
    }

    #[test]
    fn test_project_file_wins_over_user_file() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("project.toml");
        let user = temp_dir.path().join("user.toml");
        fs::write(&project, "[server]\nbase_url = \"https://deck.internal/\"\n").unwrap();
        fs::write(
            &user,
            "[server]\nbase_url = \"http://other:9000\"\n[terminal]\ndefault_shell = \"bash\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&[project, user]).unwrap();
        assert_eq!(config.server.base_url, "https://deck.internal");
        assert_eq!(config.terminal.default_shell, "bash");
    }

    #[test]
    fn test_project_file_can_restore_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("project.toml");
        let user = temp_dir.path().join("user.toml");
        fs::write(
            &project,
            "[ui]\npage_size = 20\n[terminal]\ndefault_shell = \"sh\"\n",
        )
        .unwrap();
        fs::write(
            &user,
            "[ui]\npage_size = 50\nrefresh_interval_secs = 10\n[terminal]\ndefault_shell = \"bash\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&[project, user]).unwrap();
        assert_eq!(config.terminal.default_shell, "sh");
        assert_eq!(config.ui.page_size, 20);
        assert_eq!(config.ui.refresh_interval_secs, 10);
    }

    #[test]
    fn test_unsupported_page_size_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[ui]\npage_size = 33\n").unwrap();

        let config = AppConfig::load_from(&[path]).unwrap();
        assert_eq!(config.ui.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_unparsable_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[ui\npage_size = ").unwrap();
        assert!(AppConfig::load_from(&[path]).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.ui.page_size = 50;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::read_file(&path).unwrap().unwrap();
        assert_eq!(loaded, config);
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::timer::MAX_CUSTOM_MINUTES;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_timer_default_minutes")]
    pub timer_default_minutes: u32,
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
    #[serde(default = "default_next_exercise_delay_ms")]
    pub next_exercise_delay_ms: u64,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    /// Catalog JSON to use instead of the bundled one.
    #[serde(default)]
    pub catalog_path: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_timer_default_minutes() -> u32 {
    25
}
fn default_reply_delay_ms() -> u64 {
    1500
}
fn default_next_exercise_delay_ms() -> u64 {
    2000
}
fn default_tick_rate_ms() -> u64 {
    100
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            timer_default_minutes: default_timer_default_minutes(),
            reply_delay_ms: default_reply_delay_ms(),
            next_exercise_delay_ms: default_next_exercise_delay_ms(),
            tick_rate_ms: default_tick_rate_ms(),
            catalog_path: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("motqen")
            .join("config.toml")
    }

    /// Pull out-of-range values back to their defaults.
    pub fn normalize(&mut self) {
        if self.timer_default_minutes == 0 || self.timer_default_minutes > MAX_CUSTOM_MINUTES {
            self.timer_default_minutes = default_timer_default_minutes();
        }
        if self.tick_rate_ms == 0 {
            self.tick_rate_ms = default_tick_rate_ms();
        }
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn next_exercise_delay(&self) -> Duration {
        Duration::from_millis(self.next_exercise_delay_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.reply_delay(), Duration::from_millis(1500));
        assert_eq!(config.next_exercise_delay(), Duration::from_millis(2000));
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
theme = "gruvbox-light"
timer_default_minutes = 45
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "gruvbox-light");
        assert_eq!(config.timer_default_minutes, 45);
        assert_eq!(config.reply_delay_ms, 1500);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.catalog_path = Some("/tmp/catalog.json".to_string());
        config.reply_delay_ms = 10;
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_out_of_range_timer_is_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timer_default_minutes = 500\ntick_rate_ms = 0\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.timer_default_minutes, 25);
        assert_eq!(config.tick_rate_ms, 100);
    }
}

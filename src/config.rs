use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODULE: &str = "KJV";
pub const DEFAULT_VERBOSE_LEVEL: i64 = 1;
pub const DEFAULT_COLOR_LEVEL: i64 = 3;

/// Startup configuration.
///
/// Loaded once before any search runs and read-only afterwards; the
/// pipeline threads it through explicitly instead of going back to the
/// file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bible module to search and display.
    pub module: String,

    /// Where module files and indexes live.
    pub data_dir: Option<PathBuf>,

    /// 0 quiet through 4 debug.
    pub verbose_level: i64,

    /// 0 references only, 1 adds italics, 2 adds attribute markers,
    /// 3 adds search-term highlighting.
    pub color_level: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            module: DEFAULT_MODULE.to_string(),
            data_dir: None,
            verbose_level: DEFAULT_VERBOSE_LEVEL,
            color_level: DEFAULT_COLOR_LEVEL,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_path()?;
        let mut config = if let Some(path) = config_path {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&content).with_context(|| "Failed to parse config file")?
        } else {
            Self::default()
        };
        config.clamp_levels();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;
        config.clamp_levels();
        Ok(config)
    }

    fn find_config_path() -> Result<Option<PathBuf>> {
        if let Some(xdg_config) = dirs::config_dir() {
            let xdg_path = xdg_config.join("versegrep/config.toml");
            if xdg_path.exists() {
                return Ok(Some(xdg_path));
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(".versegrep.toml");
            if home_path.exists() {
                return Ok(Some(home_path));
            }
        }

        let current_path = Path::new(".versegrep.toml");
        if current_path.exists() {
            return Ok(Some(current_path.to_path_buf()));
        }

        Ok(None)
    }

    /// Out-of-range levels fall back to the defaults instead of aborting.
    pub fn clamp_levels(&mut self) {
        if !(0..=4).contains(&self.verbose_level) {
            warn!(
                "Verbose level {} is out of range, using {}",
                self.verbose_level, DEFAULT_VERBOSE_LEVEL
            );
            self.verbose_level = DEFAULT_VERBOSE_LEVEL;
        }
        if !(0..=3).contains(&self.color_level) {
            warn!(
                "Color level {} is out of range, using {}",
                self.color_level, DEFAULT_COLOR_LEVEL
            );
            self.color_level = DEFAULT_COLOR_LEVEL;
        }
    }

    /// The data directory, defaulting to the platform data dir.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("versegrep")
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.module, "KJV");
        assert_eq!(config.verbose_level, 1);
        assert_eq!(config.color_level, 3);
    }

    #[test]
    fn out_of_range_levels_fall_back() {
        let mut config = Config {
            verbose_level: 99,
            color_level: -2,
            ..Default::default()
        };
        config.clamp_levels();
        assert_eq!(config.verbose_level, DEFAULT_VERBOSE_LEVEL);
        assert_eq!(config.color_level, DEFAULT_COLOR_LEVEL);
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            module: "WEB".to_string(),
            color_level: 2,
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.module, "WEB");
        assert_eq!(loaded.color_level, 2);
    }
}

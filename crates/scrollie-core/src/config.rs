use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Scroll animation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animation duration in milliseconds (0 = jump instantly)
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Easing curve
    #[serde(default)]
    pub easing: EasingKind,
    /// Frame source: native per-frame callbacks or the timer fallback
    #[serde(default)]
    pub frames: FrameMode,
    /// Platform identifier fed to defective-platform detection
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            easing: EasingKind::default(),
            frames: FrameMode::default(),
            user_agent: None,
        }
    }
}

/// Named easing presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingKind {
    Linear,
    /// Quadratic ease-in-out
    #[default]
    Quad,
    Cubic,
    Quintic,
    /// Exponential ease-out
    EaseOut,
}

impl std::str::FromStr for EasingKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(EasingKind::Linear),
            "quad" => Ok(EasingKind::Quad),
            "cubic" => Ok(EasingKind::Cubic),
            "quintic" => Ok(EasingKind::Quintic),
            "ease-out" | "easeout" => Ok(EasingKind::EaseOut),
            other => Err(crate::Error::Config(format!("unknown easing '{}'", other))),
        }
    }
}

/// Which frame source a host should expose to the scheduler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameMode {
    /// Expose native per-frame callbacks; the scheduler still falls back
    /// to timers on defective platforms
    #[default]
    Auto,
    /// Expose no native entry points, forcing the timer fallback
    Timer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll interval in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Number of lines in the demo document
    #[serde(default = "default_lines")]
    pub lines: usize,
    /// Lines moved per step key press
    #[serde(default = "default_step_lines")]
    pub step_lines: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            lines: default_lines(),
            step_lines: default_step_lines(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scrollie")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_duration_ms() -> u64 {
    400
}

fn default_tick_rate() -> u64 {
    16 // ~60fps
}

fn default_lines() -> usize {
    200
}

fn default_step_lines() -> u16 {
    20
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text; missing keys take defaults
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollie/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollie")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("scrollie.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scroll.duration_ms, 400);
        assert_eq!(config.scroll.easing, EasingKind::Quad);
        assert_eq!(config.scroll.frames, FrameMode::Auto);
        assert!(config.scroll.user_agent.is_none());
        assert_eq!(config.ui.tick_rate_ms, 16);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [scroll]
            easing = "ease-out"
            frames = "timer"
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.easing, EasingKind::EaseOut);
        assert_eq!(config.scroll.frames, FrameMode::Timer);
        assert_eq!(config.scroll.duration_ms, 400);
        assert_eq!(config.ui.step_lines, 20);
    }

    #[test]
    fn test_invalid_easing_is_config_error() {
        let err = AppConfig::from_toml("[scroll]\neasing = \"bouncy\"\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_saved_text_loads_back() {
        let mut config = AppConfig::default();
        config.scroll.duration_ms = 250;
        config.scroll.user_agent = Some("iPhone OS 6".to_string());
        let text = config.to_toml().unwrap();
        let loaded = AppConfig::from_toml(&text).unwrap();
        assert_eq!(loaded.scroll.duration_ms, 250);
        assert_eq!(loaded.scroll.user_agent.as_deref(), Some("iPhone OS 6"));
    }

    #[test]
    fn test_easing_from_str() {
        assert_eq!("Cubic".parse::<EasingKind>().unwrap(), EasingKind::Cubic);
        assert_eq!("easeout".parse::<EasingKind>().unwrap(), EasingKind::EaseOut);
        assert!("spring".parse::<EasingKind>().is_err());
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        let path = PathBuf::from("/var/lib/scrollie");
        assert_eq!(expand_tilde(&path), path);
    }
}

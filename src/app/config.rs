//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use super::input::RepeatConfig;

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width
    pub width: f64,
    /// Window height
    pub height: f64,
    /// Whether the window should be fullscreen
    pub fullscreen: bool,
    /// Whether the window should be resizable
    pub resizable: bool,
    /// Whether the window should be decorated (has title bar, borders, etc.)
    pub decorated: bool,
    /// Frame rate cap for the render loop, 0 for uncapped
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Onion Engine".to_string(),
            width: 800.0,
            height: 600.0,
            fullscreen: false,
            resizable: true,
            decorated: true,
            target_fps: 60,
        }
    }
}

/// Default key timing, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Delay before a held key starts repeating
    pub repeat_delay: f64,
    /// Interval between repeats once repeating
    pub repeat_interval: f64,
    /// Maximum gap between two presses counted as a double press
    pub double_press_window: f64,
}

impl InputConfig {
    /// Converts to the timing record used by the input manager
    pub fn repeat_config(&self) -> Result<RepeatConfig, ConfigError> {
        Ok(RepeatConfig::new(
            seconds("input.repeat_delay", self.repeat_delay)?,
            seconds("input.repeat_interval", self.repeat_interval)?,
            seconds("input.double_press_window", self.double_press_window)?,
        ))
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        let defaults = RepeatConfig::default();
        Self {
            repeat_delay: defaults.repeat_delay().as_secs_f64(),
            repeat_interval: defaults.repeat_interval().as_secs_f64(),
            double_press_window: defaults.double_press_window().as_secs_f64(),
        }
    }
}

fn seconds(key: &str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| ConfigError::Message(format!("{key} = {value}: {e}")))
}

/// Fly camera tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position in world units
    pub start_position: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Movement speed in world units per second
    pub movement_speed: f32,
    /// Speed multiplier while Shift is held
    pub fast_multiplier: f32,
    /// Degrees of rotation per pixel of mouse movement
    pub mouse_sensitivity: f32,
    /// Degrees of field of view per scroll line
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, 0.0, 3.0],
            fov_degrees: 45.0,
            movement_speed: 2.5,
            fast_multiplier: 4.0,
            mouse_sensitivity: 0.1,
            zoom_step: 2.0,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Default key timing
    #[serde(default)]
    pub input: InputConfig,
    /// Camera tuning
    #[serde(default)]
    pub camera: CameraConfig,
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Profiles are loaded from config files in the following order:
    /// 1. config/{profile}.toml (profile-specific configuration)
    /// 2. Environment variables with prefix APP_ (e.g., APP_INPUT__REPEAT_DELAY=0.3)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let config_dir = Self::find_config_dir();
        Self::load_from(config_dir.as_deref(), profile)
    }

    /// Loads a profile from an explicit config directory
    pub fn load_from_dir(dir: &Path, profile: &str) -> Result<Self, ConfigError> {
        Self::load_from(Some(dir), profile)
    }

    fn load_from(config_dir: Option<&Path>, profile: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(dir) = config_dir {
            let profile_path = dir.join(profile);
            builder = builder.add_source(File::from(profile_path.as_path()).required(false));
        } else {
            builder =
                builder.add_source(File::with_name(&format!("config/{}", profile)).required(false));
        }

        // Use __ as separator for nested fields (e.g., APP_WINDOW__WIDTH)
        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .set_override("profile", profile)?
            .build()?
            .try_deserialize()?;

        // Reject timings that cannot become durations before anything runs.
        config.input.repeat_config()?;
        Ok(config)
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the APP_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }

    /// Built-in configuration, used when no profile can be loaded
    pub fn fallback(profile: &str) -> Self {
        Self {
            profile: profile.to_string(),
            window: WindowConfig::default(),
            input: InputConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load("release").unwrap_or_else(|_| Self::fallback("release"))
    }
}

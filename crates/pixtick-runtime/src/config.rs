//! Runtime configuration loaded from TOML.

use std::path::PathBuf;
use std::time::Duration;

use pixtick_input::sources::JoystickThresholds;
use pixtick_input::Thresholds;
use pixtick_render::Clip;
use pixtick_types::{Rotation, Size};
use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub joystick: JoystickConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

/// Loop timing and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Stop cleanly after this many ticks.
    #[serde(default)]
    pub max_ticks: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            log_level: default_log_level(),
            max_ticks: None,
        }
    }
}

/// Physical panel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Degrees: 0, 90, 180 or 270.
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub clip: Clip,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            rotation: Rotation::default(),
            clip: Clip::default(),
        }
    }
}

/// Debounce settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_debounce_ticks")]
    pub debounce_ticks: u32,
    /// Threshold for the rotary rotation pulse keys.
    #[serde(default)]
    pub pulse_debounce_ticks: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ticks: default_debounce_ticks(),
            pulse_debounce_ticks: 0,
        }
    }
}

/// Analog joystick deflection thresholds (16-bit ADC levels).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoystickConfig {
    #[serde(default = "default_low_threshold")]
    pub low_threshold: u16,
    #[serde(default = "default_high_threshold")]
    pub high_threshold: u16,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            low_threshold: default_low_threshold(),
            high_threshold: default_high_threshold(),
        }
    }
}

/// Sprite assets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory asset paths are resolved against.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.runtime.tick_ms)
    }

    pub fn display_size(&self) -> Size {
        Size::new(self.display.width, self.display.height)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.input.debounce_ticks, self.input.pulse_debounce_ticks)
    }

    pub fn joystick_thresholds(&self) -> JoystickThresholds {
        JoystickThresholds {
            low: self.joystick.low_threshold,
            high: self.joystick.high_threshold,
        }
    }

    /// Reject settings the loop cannot run with.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.runtime.tick_ms == 0 {
            return Err(RuntimeError::Config("tick_ms must be at least 1".into()));
        }
        if self.display_size().is_empty() {
            return Err(RuntimeError::Config(format!(
                "display size {} has no pixels",
                self.display_size()
            )));
        }
        if self.joystick.low_threshold >= self.joystick.high_threshold {
            return Err(RuntimeError::Config(format!(
                "joystick low_threshold {:#06x} must be below high_threshold {:#06x}",
                self.joystick.low_threshold, self.joystick.high_threshold
            )));
        }
        Ok(())
    }
}

fn default_tick_ms() -> u64 {
    32
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_width() -> u32 {
    128
}

fn default_height() -> u32 {
    64
}

fn default_debounce_ticks() -> u32 {
    2
}

fn default_low_threshold() -> u16 {
    0x4800
}

fn default_high_threshold() -> u16 {
    0xB800
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const MIN_OPACITY: f64 = 0.2;
pub const MAX_OPACITY: f64 = 1.0;
pub const OPACITY_STEP: f64 = 0.05;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Foreground opacity, 0.2 – 1.0
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// How long a first Ctrl+W stays armed on a non-empty tab
    #[serde(default = "default_confirm_close_secs")]
    pub confirm_close_secs: u64,
    /// Kitty keyboard protocol: true = force on, false = force off, absent = on (default).
    /// Needed for Ctrl+Enter; disable if your terminal misbehaves.
    #[serde(default)]
    pub kitty_keyboard: Option<bool>,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            opacity: default_opacity(),
            confirm_close_secs: default_confirm_close_secs(),
            kitty_keyboard: None,
            colors: HashMap::new(),
        }
    }
}

impl UiConfig {
    /// Opacity clamped into its valid range
    pub fn effective_opacity(&self) -> f64 {
        clamp_opacity(self.opacity)
    }

    /// Close-confirm window, at least one second so a second Ctrl+W can land
    pub fn confirm_window(&self) -> Duration {
        Duration::from_secs(self.confirm_close_secs.max(1))
    }
}

fn default_opacity() -> f64 {
    MAX_OPACITY
}

fn default_confirm_close_secs() -> u64 {
    3
}

/// Clamp to 0.2 – 1.0 and snap to the nearest 0.05 step.
/// Non-finite input (and the legacy "unset" value 0) becomes fully opaque.
pub fn clamp_opacity(value: f64) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return MAX_OPACITY;
    }
    let snapped = (value / OPACITY_STEP).round() * OPACITY_STEP;
    let clamped = snapped.clamp(MIN_OPACITY, MAX_OPACITY);
    // Drop float noise such as 0.30000000000000004
    (clamped * 100.0).round() / 100.0
}

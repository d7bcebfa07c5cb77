use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

use crate::icon::{ClockStyle, Rgb};

pub const DEFAULT_CLOCK_PACKAGES: [&str; 4] = [
    "com.android.deskclock",
    "com.google.android.deskclock",
    "com.mobitobi.android.gentlealarmtrial",
    "com.mobitobi.android.gentlealarm",
];

/// Presentation values handed to every render and restyle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IconConfig {
    pub clock_style: ClockStyle,
    pub clock_color: Rgb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserSettings {
    #[serde(rename = "pref_clock_style", default = "default_style_pref")]
    clock_style: String,
    #[serde(rename = "pref_clock_color", default = "default_color_pref")]
    clock_color: i32,
    #[serde(default = "default_packages")]
    clock_packages: Vec<String>,
}

fn default_style_pref() -> String {
    ClockStyle::default().as_pref().to_string()
}

fn default_color_pref() -> i32 {
    Rgb::WHITE.to_argb()
}

fn default_packages() -> Vec<String> {
    DEFAULT_CLOCK_PACKAGES.iter().map(|p| p.to_string()).collect()
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            clock_style: default_style_pref(),
            clock_color: default_color_pref(),
            clock_packages: default_packages(),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Ignoring malformed settings in {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn icon_config(&self) -> IconConfig {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        IconConfig {
            clock_style: ClockStyle::from_pref(&guard.clock_style),
            clock_color: Rgb::from_argb(guard.clock_color),
        }
    }

    pub fn clock_packages(&self) -> Vec<String> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clock_packages
            .clone()
    }

    pub fn update_clock_color(&self, color: Rgb) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.clock_color = color.to_argb();
        self.persist(&guard)
    }

    pub fn update_clock_style(&self, style: ClockStyle) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.clock_style = style.as_pref().to_string();
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: UserSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed settings in {}", self.path.display()))?;
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = data;
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

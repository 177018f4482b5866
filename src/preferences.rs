mod store;
mod theme;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumIter, EnumString};

pub use store::{PreferenceSync, PreferencesStore};
pub use theme::{
    FOCUS_OUTLINE_NORMAL, FOCUS_OUTLINE_VOICE, RenderSurface, StyleSheet, THEME_VARIABLES,
    apply_preferences, palette,
};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ta,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    HighContrast,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InteractionMode {
    #[default]
    Normal,
    Voice,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub language: Language,
    pub theme: Theme,
    pub mode: InteractionMode,
}

/// A partial change; absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesUpdate {
    pub language: Option<Language>,
    pub theme: Option<Theme>,
    pub mode: Option<InteractionMode>,
}

fn field<T: FromStr>(object: &serde_json::Map<String, Value>, key: &str) -> Option<T> {
    let raw = object.get(key)?.as_str()?;
    T::from_str(raw)
        .inspect_err(|_| log::warn!("Ignoring unknown {key} preference {raw:?}"))
        .ok()
}

impl Preferences {
    /// Reads a loosely typed preference object. Missing or unknown values
    /// fall back to the defaults.
    pub fn from_json(value: &Value) -> Self {
        let mut preferences = Self::default();
        preferences.overlay(value);
        preferences
    }

    /// Copies every recognised field of `value` over `self`; anything else
    /// (other keys, `null`, non-objects) is ignored.
    pub fn overlay(&mut self, value: &Value) {
        let Some(object) = value.as_object() else {
            return;
        };

        if let Some(language) = field(object, "language") {
            self.language = language;
        }
        if let Some(theme) = field(object, "theme") {
            self.theme = theme;
        }
        if let Some(mode) = field(object, "mode") {
            self.mode = mode;
        }
    }

    pub fn merged(self, update: &PreferencesUpdate) -> Self {
        Self {
            language: update.language.unwrap_or(self.language),
            theme: update.theme.unwrap_or(self.theme),
            mode: update.mode.unwrap_or(self.mode),
        }
    }
}

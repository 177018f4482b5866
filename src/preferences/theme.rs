use std::fmt::Write;

use super::{InteractionMode, Language, Preferences, Theme};

pub const THEME_VARIABLES: [&str; 9] = [
    "--bg-primary",
    "--bg-secondary",
    "--text-primary",
    "--text-secondary",
    "--accent-color",
    "--border-color",
    "--shadow",
    "--card-bg",
    "--nav-bg",
];

pub const FOCUS_OUTLINE_VOICE: &str = "3px solid #ff6b6b";
pub const FOCUS_OUTLINE_NORMAL: &str = "2px solid #1976d2";

const VOICE_MODE_CLASS: &str = "voice-mode";

/// Values for `THEME_VARIABLES`, in the same order.
pub fn palette(theme: Theme) -> [&'static str; 9] {
    match theme {
        Theme::Light => [
            "linear-gradient(135deg, #f5f7fa 0%, #c3cfe2 100%)",
            "#ffffff",
            "#333333",
            "#666666",
            "#1976d2",
            "#e0e0e0",
            "0 4px 20px rgba(0,0,0,0.08)",
            "#ffffff",
            "#ffffff",
        ],
        Theme::Dark => [
            "linear-gradient(135deg, #1a1a1a 0%, #2d2d2d 100%)",
            "#2d2d2d",
            "#ffffff",
            "#b0b0b0",
            "#42a5f5",
            "#404040",
            "0 4px 20px rgba(0,0,0,0.3)",
            "#333333",
            "#2d2d2d",
        ],
        Theme::HighContrast => [
            "#000000",
            "#000000",
            "#ffffff",
            "#ffff00",
            "#00ff00",
            "#ffffff",
            "0 4px 20px rgba(255,255,255,0.3)",
            "#000000",
            "#000000",
        ],
    }
}

fn theme_class(theme: Theme) -> String {
    format!("theme-{theme}")
}

/// Whatever draws the interface: it takes style variables, classes and
/// document attributes.
pub trait RenderSurface {
    fn set_property(&mut self, name: &str, value: &str);
    fn add_class(&mut self, class: &str);
    fn remove_class(&mut self, class: &str);
    fn set_attribute(&mut self, name: &str, value: &str);
}

/// Puts `preferences` on `surface`: the theme class and variables, the
/// focus outline of the interaction mode, and the document language.
pub fn apply_preferences(preferences: &Preferences, surface: &mut impl RenderSurface) {
    for theme in [Theme::Light, Theme::Dark, Theme::HighContrast] {
        surface.remove_class(&theme_class(theme));
    }
    surface.add_class(&theme_class(preferences.theme));

    for (name, value) in THEME_VARIABLES.iter().zip(palette(preferences.theme)) {
        surface.set_property(name, value);
    }

    surface.set_attribute("lang", &preferences.language.to_string());
    // Both supported scripts run left to right.
    let direction = match preferences.language {
        Language::En | Language::Ta => "ltr",
    };
    surface.set_attribute("dir", direction);

    match preferences.mode {
        InteractionMode::Voice => {
            surface.add_class(VOICE_MODE_CLASS);
            surface.set_property("--focus-outline", FOCUS_OUTLINE_VOICE);
        }
        InteractionMode::Normal => {
            surface.remove_class(VOICE_MODE_CLASS);
            surface.set_property("--focus-outline", FOCUS_OUTLINE_NORMAL);
        }
    }
}

/// Collects what is applied to it and renders it as CSS.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    properties: Vec<(String, String)>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
}

impl StyleSheet {
    pub fn for_preferences(preferences: &Preferences) -> Self {
        let mut sheet = Self::default();
        apply_preferences(preferences, &mut sheet);
        sheet
    }

    // Getters/Setters

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    // Functions

    /// A `:root` rule with every property in the order it was first set.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.properties {
            // Writing to a String does not fail.
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push_str("}\n");
        css
    }
}

fn upsert(entries: &mut Vec<(String, String)>, name: &str, value: &str) {
    match entries.iter_mut().find(|(n, _)| n == name) {
        Some(entry) => entry.1 = value.to_string(),
        None => entries.push((name.to_string(), value.to_string())),
    }
}

impl RenderSurface for StyleSheet {
    fn set_property(&mut self, name: &str, value: &str) {
        upsert(&mut self.properties, name, value);
    }

    fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        upsert(&mut self.attributes, name, value);
    }
}

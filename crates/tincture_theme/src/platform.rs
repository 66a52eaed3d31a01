//! System preference detection
//!
//! The sync controller reads the desktop's light/dark mode, accent color and
//! high-contrast setting through [`SystemPreferences`].

use std::sync::RwLock;

use tincture_core::Color;

use crate::lock;
use crate::theme::{BASE_COLOR_DARK, BASE_COLOR_LIGHT};

/// Source of the OS-level appearance settings
pub trait SystemPreferences: Send + Sync {
    /// Base color scheme the OS asks applications to use
    fn base_color_scheme(&self) -> Option<String>;

    /// OS accent color, if the platform exposes one
    fn accent_color(&self) -> Option<Color>;

    fn is_high_contrast(&self) -> bool;
}

/// Preferences read from the desktop environment
///
/// Follows the `GTK_THEME` conventions: a `:dark` variant or a `-dark` theme
/// name selects the dark base color scheme, and `HighContrast` theme names
/// turn on high contrast. No accent color is exposed unless one is
/// configured.
#[derive(Clone, Debug, Default)]
pub struct DesktopPreferences {
    accent: Option<Color>,
}

impl DesktopPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a fixed accent color
    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = Some(accent);
        self
    }

    fn gtk_theme() -> Option<String> {
        std::env::var("GTK_THEME").ok().filter(|t| !t.is_empty())
    }
}

impl SystemPreferences for DesktopPreferences {
    fn base_color_scheme(&self) -> Option<String> {
        Self::gtk_theme().map(|t| base_color_scheme_for_gtk_theme(&t).to_string())
    }

    fn accent_color(&self) -> Option<Color> {
        self.accent
    }

    fn is_high_contrast(&self) -> bool {
        Self::gtk_theme().is_some_and(|t| is_high_contrast_gtk_theme(&t))
    }
}

/// Detect the system base color scheme, if the desktop reports one
pub fn detect_system_base_color_scheme() -> Option<&'static str> {
    DesktopPreferences::gtk_theme().map(|t| base_color_scheme_for_gtk_theme(&t))
}

fn base_color_scheme_for_gtk_theme(theme: &str) -> &'static str {
    let lower = theme.to_ascii_lowercase();
    if lower.ends_with(":dark") || lower.ends_with("-dark") || lower.contains("-dark:") {
        BASE_COLOR_DARK
    } else {
        BASE_COLOR_LIGHT
    }
}

fn is_high_contrast_gtk_theme(theme: &str) -> bool {
    theme.to_ascii_lowercase().contains("highcontrast")
}

/// Preferences set in code
///
/// Useful for applications that read settings from their own source and
/// for driving the sync controller in tests.
#[derive(Debug, Default)]
pub struct StaticPreferences {
    base_color_scheme: RwLock<Option<String>>,
    accent_color: RwLock<Option<Color>>,
    high_contrast: RwLock<bool>,
}

impl StaticPreferences {
    pub fn new(base_color_scheme: &str, accent_color: Option<Color>) -> Self {
        Self {
            base_color_scheme: RwLock::new(Some(base_color_scheme.to_string())),
            accent_color: RwLock::new(accent_color),
            high_contrast: RwLock::new(false),
        }
    }

    pub fn set_base_color_scheme(&self, base_color_scheme: Option<&str>) {
        *lock::write(&self.base_color_scheme) = base_color_scheme.map(str::to_string);
    }

    pub fn set_accent_color(&self, accent_color: Option<Color>) {
        *lock::write(&self.accent_color) = accent_color;
    }

    pub fn set_high_contrast(&self, high_contrast: bool) {
        *lock::write(&self.high_contrast) = high_contrast;
    }
}

impl SystemPreferences for StaticPreferences {
    fn base_color_scheme(&self) -> Option<String> {
        lock::read(&self.base_color_scheme).clone()
    }

    fn accent_color(&self) -> Option<Color> {
        *lock::read(&self.accent_color)
    }

    fn is_high_contrast(&self) -> bool {
        *lock::read(&self.high_contrast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gtk_theme_names() {
        assert_eq!(base_color_scheme_for_gtk_theme("Adwaita"), "Light");
        assert_eq!(base_color_scheme_for_gtk_theme("Adwaita:dark"), "Dark");
        assert_eq!(base_color_scheme_for_gtk_theme("Yaru-dark"), "Dark");
        assert_eq!(base_color_scheme_for_gtk_theme("Arc-Dark:compact"), "Dark");
        assert_eq!(base_color_scheme_for_gtk_theme("Darkroom"), "Light");

        assert!(is_high_contrast_gtk_theme("HighContrast"));
        assert!(is_high_contrast_gtk_theme("HighContrastInverse"));
        assert!(!is_high_contrast_gtk_theme("Adwaita"));
    }

    #[test]
    fn static_preferences_can_change() {
        let prefs = StaticPreferences::new("Light", None);
        assert_eq!(prefs.base_color_scheme().as_deref(), Some("Light"));
        assert_eq!(prefs.accent_color(), None);

        prefs.set_base_color_scheme(Some("Dark"));
        prefs.set_accent_color(Some(Color::from_hex(0x40A02B)));
        prefs.set_high_contrast(true);

        assert_eq!(prefs.base_color_scheme().as_deref(), Some("Dark"));
        assert_eq!(prefs.accent_color(), Some(Color::from_hex(0x40A02B)));
        assert!(prefs.is_high_contrast());
    }
}

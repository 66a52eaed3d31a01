//! Built-in library
//!
//! Catppuccin-derived Light/Dark themes in Blue, Green and Mauve, plus
//! Light/Dark high-contrast fallbacks.

use indexmap::IndexMap;

use crate::generator::RuntimeThemeColorValues;
use crate::provider::{EmbeddedResource, LibraryThemeProvider};

pub const LIBRARY_NAME: &str = "tincture_theme";

macro_rules! embed {
    ($path:literal) => {
        EmbeddedResource::new(
            concat!("tincture_theme/", $path),
            include_str!(concat!("../resources/", $path)),
        )
    };
}

static MANIFEST: &[EmbeddedResource] = &[
    embed!("themes/Light.Blue.toml"),
    embed!("themes/Dark.Blue.toml"),
    embed!("themes/Light.Green.toml"),
    embed!("themes/Dark.Green.toml"),
    embed!("themes/Light.Mauve.toml"),
    embed!("themes/Dark.Mauve.toml"),
    embed!("themes/Light.Generic.toml"),
    embed!("themes/Dark.Generic.toml"),
    embed!("themes/shared.toml"),
    embed!("themes/generic.toml"),
    embed!("GeneratorParameters.json"),
    embed!("Theme.Template.toml"),
];

/// The library shipped with this crate
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinProvider;

impl LibraryThemeProvider for BuiltinProvider {
    fn name(&self) -> &str {
        LIBRARY_NAME
    }

    fn manifest(&self) -> &[EmbeddedResource] {
        MANIFEST
    }

    fn fill_color_scheme_values(
        &self,
        values: &mut IndexMap<String, String>,
        colors: &RuntimeThemeColorValues,
    ) {
        for (key, color) in [
            ("AccentBaseColor", colors.accent_base_color),
            ("AccentColor80", colors.accent_color_80),
            ("AccentColor60", colors.accent_color_60),
            ("AccentColor40", colors.accent_color_40),
            ("AccentColor20", colors.accent_color_20),
            ("HighlightColor", colors.highlight_color),
            ("IdealForegroundColor", colors.ideal_foreground_color),
        ] {
            values.insert(key.to_string(), color.to_string());
        }
    }
}

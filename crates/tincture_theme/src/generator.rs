//! Runtime theme generation
//!
//! When no built-in library theme fits, themes are synthesized from a single
//! accent color. [`ThemeGenerator`] is the seam; [`TemplateThemeGenerator`]
//! is the default implementation, filling a provider's TOML template with
//! values from its `GeneratorParameters.json` and the accent shades computed
//! by an [`AccentShades`] strategy.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tincture_core::{Color, HslColor};

use crate::library_theme::LibraryTheme;
use crate::platform::SystemPreferences;
use crate::provider::LibraryThemeProvider;
use crate::resources::ResourceDictionary;
use crate::theme::Theme;

// ─────────────────────────────────────────────────────────────────────────────
// Generation request and computed colors
// ─────────────────────────────────────────────────────────────────────────────

/// A generation request
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeThemeOptions {
    /// Derive shades with HSL tinting instead of alpha blending
    pub use_hsl: bool,
    pub is_high_contrast: bool,
    pub base_color_scheme: String,
    pub accent_color: Color,
}

/// Colors computed for a generation request
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeThemeColorValues {
    pub options: RuntimeThemeOptions,
    pub accent_base_color: Color,
    pub accent_color_80: Color,
    pub accent_color_60: Color,
    pub accent_color_40: Color,
    pub accent_color_20: Color,
    pub highlight_color: Color,
    pub ideal_foreground_color: Color,
}

/// Strategy that derives accent shades from a request
pub trait AccentShades: Send + Sync {
    fn color_values(&self, options: RuntimeThemeOptions) -> RuntimeThemeColorValues;
}

/// Default shades: HSL tints toward white, or alpha steps in RGB mode
#[derive(Clone, Copy, Debug, Default)]
pub struct TintShades;

impl AccentShades for TintShades {
    fn color_values(&self, options: RuntimeThemeOptions) -> RuntimeThemeColorValues {
        let accent = options.accent_color;
        let hsl = HslColor::from_color(accent);

        let [c80, c60, c40, c20] = if options.use_hsl {
            [0.2, 0.4, 0.6, 0.8].map(|tint| hsl.tinted(tint))
        } else {
            [0.8, 0.6, 0.4, 0.2].map(|alpha| accent.with_alpha(accent.a * alpha))
        };

        RuntimeThemeColorValues {
            accent_base_color: accent,
            accent_color_80: c80,
            accent_color_60: c60,
            accent_color_40: c40,
            accent_color_20: c20,
            highlight_color: hsl.tinted(-0.3),
            ideal_foreground_color: ideal_foreground(accent),
            options,
        }
    }
}

/// WCAG relative luminance
fn relative_luminance(color: Color) -> f64 {
    fn linear(channel: f32) -> f64 {
        let c = f64::from(channel.clamp(0.0, 1.0));
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * linear(color.r) + 0.7152 * linear(color.g) + 0.0722 * linear(color.b)
}

/// Black or white, whichever contrasts more with `background`
pub fn ideal_foreground(background: Color) -> Color {
    let l = relative_luminance(background);
    let against_white = 1.05 / (l + 0.05);
    let against_black = (l + 0.05) / 0.05;
    if against_black > against_white {
        Color::BLACK
    } else {
        Color::WHITE
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generator seam
// ─────────────────────────────────────────────────────────────────────────────

/// Synthesizes themes from an accent color
pub trait ThemeGenerator: Send + Sync {
    /// One provider's library theme for the request, or `None` if the
    /// provider cannot generate one
    fn generate_runtime_library_theme(
        &self,
        base_color_scheme: &str,
        accent_color: Color,
        is_high_contrast: bool,
        provider: &dyn LibraryThemeProvider,
    ) -> Option<Arc<LibraryTheme>>;

    /// A theme holding every provider's generated library theme
    ///
    /// Providers that refuse are skipped; `None` only if all of them refuse.
    fn generate_runtime_theme(
        &self,
        base_color_scheme: &str,
        accent_color: Color,
        is_high_contrast: bool,
        providers: &[Arc<dyn LibraryThemeProvider>],
    ) -> Option<Arc<Theme>> {
        let mut theme: Option<Arc<Theme>> = None;
        for provider in providers {
            let Some(library_theme) = self.generate_runtime_library_theme(
                base_color_scheme,
                accent_color,
                is_high_contrast,
                provider.as_ref(),
            ) else {
                tracing::debug!("{} refused to generate {base_color_scheme}.{accent_color}", provider.name());
                continue;
            };

            if let Some(existing) = theme.as_ref() {
                existing.add_library_theme(library_theme);
                continue;
            }
            theme = Some(Theme::from_library_theme(library_theme));
        }
        theme
    }

    /// A theme for the system accent color, or `None` if the system has none
    fn generate_runtime_theme_from_system(
        &self,
        base_color_scheme: &str,
        is_high_contrast: bool,
        providers: &[Arc<dyn LibraryThemeProvider>],
        preferences: &dyn SystemPreferences,
    ) -> Option<Arc<Theme>> {
        let accent = preferences.accent_color()?;
        self.generate_runtime_theme(base_color_scheme, accent, is_high_contrast, providers)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generator parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Named set of template values
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SchemeValues {
    pub name: String,
    #[serde(default)]
    pub values: IndexMap<String, String>,
}

/// Contents of a provider's `GeneratorParameters.json`
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeneratorParameters {
    #[serde(default)]
    pub default_values: IndexMap<String, String>,
    #[serde(default)]
    pub base_color_schemes: Vec<SchemeValues>,
    #[serde(default)]
    pub color_schemes: Vec<SchemeValues>,
}

impl GeneratorParameters {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn base_color_scheme(&self, name: &str) -> Option<&SchemeValues> {
        self.base_color_schemes.iter().find(|s| s.name == name)
    }

    pub fn color_scheme(&self, name: &str) -> Option<&SchemeValues> {
        self.color_schemes.iter().find(|s| s.name == name)
    }

    /// Accent color of a named color scheme (its `PrimaryAccentColor` value)
    pub fn color_scheme_accent(&self, name: &str) -> Option<Color> {
        self.color_scheme(name)?
            .values
            .get("PrimaryAccentColor")?
            .parse()
            .ok()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Template generator
// ─────────────────────────────────────────────────────────────────────────────

/// `[generator]` configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Derive accent shades with HSL tinting instead of alpha steps
    pub use_hsl: bool,
}

/// Fills a provider's template from its generator parameters
#[derive(Clone)]
pub struct TemplateThemeGenerator {
    options: GeneratorOptions,
    shades: Arc<dyn AccentShades>,
}

impl TemplateThemeGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            shades: Arc::new(TintShades),
        }
    }

    /// Replace the shade strategy
    pub fn with_shades(mut self, shades: impl AccentShades + 'static) -> Self {
        self.shades = Arc::new(shades);
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn color_values(
        &self,
        base_color_scheme: &str,
        accent_color: Color,
        is_high_contrast: bool,
    ) -> RuntimeThemeColorValues {
        self.shades.color_values(RuntimeThemeOptions {
            use_hsl: self.options.use_hsl,
            is_high_contrast,
            base_color_scheme: base_color_scheme.to_string(),
            accent_color,
        })
    }
}

impl Default for TemplateThemeGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

impl std::fmt::Debug for TemplateThemeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateThemeGenerator")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Replace every `{{Key}}` placeholder
fn substitute(template: &str, values: &IndexMap<String, String>) -> String {
    let mut text = template.to_string();
    for (key, value) in values {
        text = text.replace(&format!("{{{{{key}}}}}"), value);
    }
    text
}

impl ThemeGenerator for TemplateThemeGenerator {
    fn generate_runtime_library_theme(
        &self,
        base_color_scheme: &str,
        accent_color: Color,
        is_high_contrast: bool,
        provider: &dyn LibraryThemeProvider,
    ) -> Option<Arc<LibraryTheme>> {
        let library = provider.name();
        if base_color_scheme.is_empty() {
            tracing::warn!("{library}: cannot generate a theme without a base color scheme");
            return None;
        }

        let Some(parameters) = provider.generator_parameters_content() else {
            tracing::debug!("{library}: no {}", provider.generator_parameters_name());
            return None;
        };
        let parameters = match GeneratorParameters::from_json(parameters) {
            Ok(parameters) => parameters,
            Err(err) => {
                tracing::warn!("{library}: invalid {}: {err}", provider.generator_parameters_name());
                return None;
            }
        };
        let Some(base_values) = parameters.base_color_scheme(base_color_scheme) else {
            tracing::warn!("{library}: unknown base color scheme `{base_color_scheme}`");
            return None;
        };
        let Some(template) = provider.theme_template_content() else {
            tracing::debug!("{library}: no {}", provider.theme_template_name());
            return None;
        };

        let colors = self.color_values(base_color_scheme, accent_color, is_high_contrast);
        let color_scheme = accent_color.to_string();
        let name = format!("{base_color_scheme}.{color_scheme}");
        let display_name = if is_high_contrast {
            format!("Runtime {color_scheme} ({base_color_scheme}, high contrast)")
        } else {
            format!("Runtime {color_scheme} ({base_color_scheme})")
        };

        let mut values = parameters.default_values.clone();
        values.extend(base_values.values.clone());
        provider.fill_color_scheme_values(&mut values, &colors);
        for (key, value) in [
            ("ThemeName", name.clone()),
            ("ThemeOrigin", library.to_string()),
            ("ThemeDisplayName", display_name),
            ("BaseColorScheme", base_color_scheme.to_string()),
            ("ColorScheme", color_scheme.clone()),
            ("AlternativeColorScheme", color_scheme.clone()),
            ("PrimaryAccentColor", color_scheme.clone()),
            ("ShowcaseColor", color_scheme),
            ("IsHighContrast", is_high_contrast.to_string()),
        ] {
            values.insert(key.to_string(), value);
        }

        let text = substitute(template, &values);
        if let Some(start) = text.find("{{") {
            let rest = &text[start..];
            let placeholder = rest.find("}}").map_or(rest, |end| &rest[..end + 2]);
            tracing::warn!("{library}: template placeholder {placeholder} has no value");
            return None;
        }

        let source = format!("{library}/runtime/{name}.toml");
        let dictionary = match ResourceDictionary::from_toml_str(&source, &text) {
            Ok(dictionary) => dictionary,
            Err(err) => {
                tracing::warn!("{library}: generated template is invalid: {err}");
                return None;
            }
        };

        match LibraryTheme::from_dictionary(dictionary, provider.key(), true) {
            Ok(library_theme) => {
                tracing::debug!("{library}: generated {name}");
                Some(library_theme)
            }
            Err(err) => {
                tracing::warn!("{library}: generated theme is incomplete: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(use_hsl: bool) -> RuntimeThemeOptions {
        RuntimeThemeOptions {
            use_hsl,
            is_high_contrast: false,
            base_color_scheme: "Light".into(),
            accent_color: Color::from_hex(0x0078D7),
        }
    }

    #[test]
    fn hsl_shades_get_lighter() {
        let values = TintShades.color_values(options(true));
        let l = |c: Color| HslColor::from_color(c).l;
        assert!(l(values.accent_color_80) < l(values.accent_color_60));
        assert!(l(values.accent_color_60) < l(values.accent_color_40));
        assert!(l(values.accent_color_40) < l(values.accent_color_20));
        assert!(l(values.highlight_color) < l(values.accent_base_color));
    }

    #[test]
    fn rgb_shades_step_alpha() {
        let values = TintShades.color_values(options(false));
        assert_eq!(values.accent_color_80.to_rgba8()[3], 204);
        assert_eq!(values.accent_color_20.to_rgba8()[3], 51);
        assert!(values.accent_color_60.same_rgba8(&Color::from_hex(0x0078D7).with_alpha(0.6)));
    }

    #[test]
    fn ideal_foreground_picks_contrast() {
        assert_eq!(ideal_foreground(Color::from_hex(0x1E66F5)), Color::WHITE);
        assert_eq!(ideal_foreground(Color::from_hex(0xF9E2AF)), Color::BLACK);
        assert_eq!(ideal_foreground(Color::BLACK), Color::WHITE);
        assert_eq!(ideal_foreground(Color::WHITE), Color::BLACK);
    }

    #[test]
    fn placeholders_are_replaced() {
        let mut values = IndexMap::new();
        values.insert("Accent".to_string(), "#FF0078D7".to_string());
        assert_eq!(
            substitute("a = \"{{Accent}}\"\nb = \"{{Accent}}\"", &values),
            "a = \"#FF0078D7\"\nb = \"#FF0078D7\""
        );
    }

    #[test]
    fn parameters_parse_pascal_case() {
        let parameters = GeneratorParameters::from_json(
            r##"{
                "DefaultValues": { "Error": "#FFD20F39" },
                "BaseColorSchemes": [ { "Name": "Light", "Values": { "Background": "#FFEFF1F5" } } ],
                "ColorSchemes": [ { "Name": "Blue", "Values": { "PrimaryAccentColor": "#FF1E66F5" } } ]
            }"##,
        )
        .unwrap();

        assert_eq!(parameters.default_values["Error"], "#FFD20F39");
        assert!(parameters.base_color_scheme("Light").is_some());
        assert!(parameters.base_color_scheme("Dark").is_none());
        assert_eq!(
            parameters.color_scheme_accent("Blue"),
            Some(Color::from_hex(0x1E66F5))
        );
    }
}

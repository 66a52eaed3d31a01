mod common;

use std::sync::Arc;

use common::{ControlsProvider, IconsProvider};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use tincture_core::Color;
use tincture_theme::{
    keys, AccentShades, BuiltinProvider, EmbeddedResource, GeneratorOptions, GeneratorParameters,
    LibraryThemeProvider, RuntimeThemeColorValues, RuntimeThemeOptions, StaticPreferences,
    TemplateThemeGenerator, ThemeGenerator,
};

const PEACH: u32 = 0xFE640B;

fn providers() -> Vec<Arc<dyn LibraryThemeProvider>> {
    vec![
        Arc::new(BuiltinProvider),
        Arc::new(ControlsProvider),
        Arc::new(IconsProvider),
    ]
}

fn argb(theme: &tincture_theme::LibraryTheme, key: &str) -> Option<u32> {
    theme.resources().color(key).map(|c| c.to_argb())
}

// ========== Library themes ==========

#[test]
fn generated_library_themes_carry_metadata() {
    common::init_tracing();
    let generator = TemplateThemeGenerator::default();
    let theme = generator
        .generate_runtime_library_theme("Light", Color::from_hex(PEACH), false, &BuiltinProvider)
        .unwrap();

    assert_eq!(theme.name(), "Light.#FFFE640B");
    assert_eq!(theme.origin(), Some("tincture_theme"));
    assert_eq!(theme.display_name(), "Runtime #FFFE640B (Light)");
    assert_eq!(theme.base_color_scheme(), "Light");
    assert_eq!(theme.color_scheme(), "#FFFE640B");
    assert_eq!(theme.alternative_color_scheme(), "#FFFE640B");
    assert_eq!(theme.showcase_color().to_argb(), 0xFFFE640B);
    assert!(theme.is_runtime_generated());
    assert!(!theme.is_high_contrast());
    assert_eq!(theme.provider(), &BuiltinProvider.key());
    assert_eq!(theme.resources().source(), Some("tincture_theme/runtime/Light.#FFFE640B.toml"));
}

#[test]
fn parameter_layers_override_defaults() {
    let generator = TemplateThemeGenerator::default();
    let light = generator
        .generate_runtime_library_theme("Light", Color::from_hex(PEACH), false, &BuiltinProvider)
        .unwrap();
    let dark = generator
        .generate_runtime_library_theme("Dark", Color::from_hex(PEACH), false, &BuiltinProvider)
        .unwrap();

    assert_eq!(argb(&light, "Colors.Error"), Some(0xFFD20F39));
    assert_eq!(argb(&dark, "Colors.Error"), Some(0xFFF38BA8));
    assert_eq!(argb(&light, "Colors.Background"), Some(0xFFEFF1F5));
    assert_eq!(
        light.resources().get("Metrics.CornerRadius").and_then(|v| v.as_number()),
        Some(6.0)
    );
}

#[test]
fn rgb_mode_steps_alpha() {
    let generator = TemplateThemeGenerator::default();
    let theme = generator
        .generate_runtime_library_theme("Dark", Color::from_hex(PEACH), false, &BuiltinProvider)
        .unwrap();

    assert_eq!(argb(&theme, "Colors.Accent"), Some(0xFFFE640B));
    assert_eq!(argb(&theme, "Colors.Accent80"), Some(0xCCFE640B));
    assert_eq!(argb(&theme, "Colors.Accent20"), Some(0x33FE640B));
}

#[test]
fn hsl_mode_keeps_shades_opaque() {
    let generator = TemplateThemeGenerator::new(GeneratorOptions { use_hsl: true });
    let theme = generator
        .generate_runtime_library_theme("Dark", Color::from_hex(PEACH), false, &BuiltinProvider)
        .unwrap();

    for key in ["Colors.Accent80", "Colors.Accent60", "Colors.Accent40", "Colors.Accent20"] {
        let shade = theme.resources().color(key).unwrap();
        assert_eq!(shade.to_rgba8()[3], 255, "{key}");
        assert!(!shade.same_rgba8(&Color::from_hex(PEACH)), "{key}");
    }
}

struct FlatShades(Color);

impl AccentShades for FlatShades {
    fn color_values(&self, options: RuntimeThemeOptions) -> RuntimeThemeColorValues {
        RuntimeThemeColorValues {
            accent_base_color: options.accent_color,
            accent_color_80: self.0,
            accent_color_60: self.0,
            accent_color_40: self.0,
            accent_color_20: self.0,
            highlight_color: self.0,
            ideal_foreground_color: self.0,
            options,
        }
    }
}

#[test]
fn shade_strategy_is_replaceable() {
    let generator =
        TemplateThemeGenerator::default().with_shades(FlatShades(Color::from_hex(0x123456)));
    let theme = generator
        .generate_runtime_library_theme("Light", Color::from_hex(PEACH), false, &BuiltinProvider)
        .unwrap();

    assert_eq!(argb(&theme, "Colors.Accent"), Some(0xFFFE640B));
    assert_eq!(argb(&theme, "Colors.Accent60"), Some(0xFF123456));
    assert_eq!(argb(&theme, "Colors.Highlight"), Some(0xFF123456));
}

#[test]
fn provider_templates_use_their_own_parameters() {
    let generator = TemplateThemeGenerator::default();
    let theme = generator
        .generate_runtime_library_theme("Dark", Color::from_hex(PEACH), false, &ControlsProvider)
        .unwrap();

    let resources = theme.resources();
    assert_eq!(resources.color("Controls.Button.Background").map(|c| c.to_argb()), Some(0xFFFE640B));
    assert_eq!(resources.color("Controls.Button.Foreground").map(|c| c.to_argb()), Some(0xFFCDD6F4));
    assert_eq!(
        resources.get("Controls.Button.Radius").and_then(|v| v.as_number()),
        Some(4.0)
    );
    assert!(resources.get("Colors.Background").is_none());
}

#[test]
fn high_contrast_requests_are_flagged() {
    let generator = TemplateThemeGenerator::default();
    let theme = generator
        .generate_runtime_library_theme("Light", Color::from_hex(PEACH), true, &BuiltinProvider)
        .unwrap();

    assert!(theme.is_high_contrast());
    assert_eq!(theme.resources().flag(keys::THEME_IS_HIGH_CONTRAST), Some(true));
    assert!(theme.display_name().contains("high contrast"));
}

// ========== Refusals ==========

#[test]
fn providers_without_generator_documents_refuse() {
    let generator = TemplateThemeGenerator::default();
    assert!(generator
        .generate_runtime_library_theme("Light", Color::from_hex(PEACH), false, &IconsProvider)
        .is_none());
    assert!(generator
        .generate_runtime_library_theme("", Color::from_hex(PEACH), false, &BuiltinProvider)
        .is_none());
    assert!(generator
        .generate_runtime_library_theme("Sepia", Color::from_hex(PEACH), false, &ControlsProvider)
        .is_none());
}

static UNFILLED_MANIFEST: &[EmbeddedResource] = &[
    EmbeddedResource::new(
        "unfilled/GeneratorParameters.json",
        r#"{ "BaseColorSchemes": [ { "Name": "Light" } ] }"#,
    ),
    EmbeddedResource::new(
        "unfilled/Theme.Template.toml",
        "\"Theme.Name\" = \"{{ThemeName}}\"\n\"Unfilled.Value\" = \"{{NotProvided}}\"\n",
    ),
];

static BAD_JSON_MANIFEST: &[EmbeddedResource] = &[
    EmbeddedResource::new("badjson/GeneratorParameters.json", "{ \"BaseColorSchemes\": ["),
    EmbeddedResource::new("badjson/Theme.Template.toml", "\"Theme.Name\" = \"{{ThemeName}}\"\n"),
];

struct ManifestProvider {
    name: &'static str,
    manifest: &'static [EmbeddedResource],
}

impl LibraryThemeProvider for ManifestProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn manifest(&self) -> &[EmbeddedResource] {
        self.manifest
    }

    fn fill_color_scheme_values(&self, _: &mut IndexMap<String, String>, _: &RuntimeThemeColorValues) {}
}

#[test]
fn unfilled_placeholders_and_bad_parameters_refuse() {
    common::init_tracing();
    let generator = TemplateThemeGenerator::default();
    let unfilled = ManifestProvider {
        name: "unfilled",
        manifest: UNFILLED_MANIFEST,
    };
    let bad_json = ManifestProvider {
        name: "badjson",
        manifest: BAD_JSON_MANIFEST,
    };

    assert!(generator
        .generate_runtime_library_theme("Light", Color::from_hex(PEACH), false, &unfilled)
        .is_none());
    assert!(generator
        .generate_runtime_library_theme("Light", Color::from_hex(PEACH), false, &bad_json)
        .is_none());
}

// ========== Themes ==========

#[test]
fn themes_skip_refusing_providers() {
    let generator = TemplateThemeGenerator::default();
    let theme = generator
        .generate_runtime_theme("Dark", Color::from_hex(PEACH), false, &providers())
        .unwrap();

    let contributors: Vec<String> = theme
        .library_themes()
        .iter()
        .map(|lt| lt.provider().name().to_string())
        .collect();
    assert_eq!(contributors, vec!["tincture_theme", "controls"]);
    assert_eq!(theme.name(), "Dark.#FFFE640B");
    assert!(theme.is_runtime_generated());

    let icons_only: Vec<Arc<dyn LibraryThemeProvider>> = vec![Arc::new(IconsProvider)];
    assert!(generator
        .generate_runtime_theme("Dark", Color::from_hex(PEACH), false, &icons_only)
        .is_none());
}

#[test]
fn system_generation_needs_an_accent() {
    let generator = TemplateThemeGenerator::default();
    let with_accent = StaticPreferences::new("Dark", Some(Color::from_hex(0x179299)));
    let without_accent = StaticPreferences::new("Dark", None);

    let theme = generator
        .generate_runtime_theme_from_system("Dark", false, &providers(), &with_accent)
        .unwrap();
    assert_eq!(theme.primary_accent_color().to_argb(), 0xFF179299);
    assert!(generator
        .generate_runtime_theme_from_system("Dark", false, &providers(), &without_accent)
        .is_none());
}

#[test]
fn builtin_parameters_name_their_accents() {
    let parameters =
        GeneratorParameters::from_json(BuiltinProvider.generator_parameters_content().unwrap())
            .unwrap();
    assert_eq!(
        parameters.color_scheme_accent("Peach").map(|c| c.to_argb()),
        Some(0xFFFE640B)
    );
    assert!(parameters.color_scheme_accent("Sepia").is_none());
    assert_eq!(parameters.base_color_schemes.len(), 2);
}

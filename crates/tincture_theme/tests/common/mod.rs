//! Fixture providers shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::thread;
use std::time::Duration;

use indexmap::IndexMap;
use tincture_theme::{
    EmbeddedResource, LibraryThemeProvider, RuntimeThemeColorValues, ThemeRegistry,
};

macro_rules! bundle {
    ($name:literal, $base:literal, $scheme:literal, $accent:literal) => {
        concat!(
            "\"Theme.Name\" = \"", $name, "\"\n",
            "\"Theme.BaseColorScheme\" = \"", $base, "\"\n",
            "\"Theme.ColorScheme\" = \"", $scheme, "\"\n",
            "\"Theme.PrimaryAccentColor\" = \"", $accent, "\"\n",
            "\"Controls.Button.Background\" = \"", $accent, "\"\n",
        )
    };
}

const CONTROLS_PARAMETERS: &str = r##"{
  "DefaultValues": { "ButtonRadius": "4.0" },
  "BaseColorSchemes": [
    { "Name": "Light", "Values": { "ButtonForeground": "#FF4C4F69" } },
    { "Name": "Dark", "Values": { "ButtonForeground": "#FFCDD6F4" } }
  ]
}"##;

const CONTROLS_TEMPLATE: &str = r##"
"Theme.Name" = "{{ThemeName}}"
"Theme.DisplayName" = "{{ThemeDisplayName}}"
"Theme.BaseColorScheme" = "{{BaseColorScheme}}"
"Theme.ColorScheme" = "{{ColorScheme}}"
"Theme.PrimaryAccentColor" = "{{PrimaryAccentColor}}"
"Theme.IsHighContrast" = {{IsHighContrast}}
"Theme.IsRuntimeGenerated" = true
"Controls.Button.Background" = "{{AccentBaseColor}}"
"Controls.Button.Pressed" = "{{HighlightColor}}"
"Controls.Button.Foreground" = "{{ButtonForeground}}"
"Controls.Button.Radius" = {{ButtonRadius}}
"##;

static CONTROLS_MANIFEST: &[EmbeddedResource] = &[
    EmbeddedResource::new(
        "controls/themes/Light.Blue.toml",
        bundle!("Light.Blue", "Light", "Blue", "#FF1E66F5"),
    ),
    EmbeddedResource::new(
        "controls/themes/Dark.Blue.toml",
        bundle!("Dark.Blue", "Dark", "Blue", "#FF89B4FA"),
    ),
    EmbeddedResource::new(
        "controls/themes/Light.Purple.toml",
        bundle!("Light.Purple", "Light", "Purple", "#FF7D3AE0"),
    ),
    EmbeddedResource::new("controls/GeneratorParameters.json", CONTROLS_PARAMETERS),
    EmbeddedResource::new("controls/Theme.Template.toml", CONTROLS_TEMPLATE),
];

/// A second library: Light/Dark Blue and Light Purple, can generate
#[derive(Debug, Default)]
pub struct ControlsProvider;

impl LibraryThemeProvider for ControlsProvider {
    fn name(&self) -> &str {
        "controls"
    }

    fn manifest(&self) -> &[EmbeddedResource] {
        CONTROLS_MANIFEST
    }

    fn fill_color_scheme_values(
        &self,
        values: &mut IndexMap<String, String>,
        colors: &RuntimeThemeColorValues,
    ) {
        values.insert("AccentBaseColor".into(), colors.accent_base_color.to_string());
        values.insert("HighlightColor".into(), colors.highlight_color.to_string());
    }
}

static ICONS_MANIFEST: &[EmbeddedResource] = &[EmbeddedResource::new(
    "icons/themes/Light.Blue.toml",
    bundle!("Light.Blue", "Light", "Blue", "#FF1E66F5"),
)];

/// A library that ships one theme and cannot generate
#[derive(Debug, Default)]
pub struct IconsProvider;

impl LibraryThemeProvider for IconsProvider {
    fn name(&self) -> &str {
        "icons"
    }

    fn manifest(&self) -> &[EmbeddedResource] {
        ICONS_MANIFEST
    }

    fn fill_color_scheme_values(&self, _: &mut IndexMap<String, String>, _: &RuntimeThemeColorValues) {}
}

static BROKEN_MANIFEST: &[EmbeddedResource] = &[
    EmbeddedResource::new(
        "broken/themes/Light.Blue.toml",
        bundle!("Light.Blue", "Light", "Blue", "#FF1E66F5"),
    ),
    EmbeddedResource::new("broken/themes/Light.Red.toml", "\"Theme.Name\" = "),
];

/// A library with a malformed bundle
#[derive(Debug, Default)]
pub struct BrokenProvider;

impl LibraryThemeProvider for BrokenProvider {
    fn name(&self) -> &str {
        "broken"
    }

    fn manifest(&self) -> &[EmbeddedResource] {
        BROKEN_MANIFEST
    }

    fn fill_color_scheme_values(&self, _: &mut IndexMap<String, String>, _: &RuntimeThemeColorValues) {}
}

/// A library whose first enumeration stalls for a while
#[derive(Debug, Default)]
pub struct SlowProvider {
    pub entered: AtomicBool,
}

impl LibraryThemeProvider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    fn manifest(&self) -> &[EmbeddedResource] {
        if !self.entered.swap(true, Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(200));
        }
        ICONS_MANIFEST
    }

    fn fill_color_scheme_values(&self, _: &mut IndexMap<String, String>, _: &RuntimeThemeColorValues) {}
}

/// A library that calls back into the registry while it is enumerated
#[derive(Default)]
pub struct ReentrantProvider {
    pub registry: OnceLock<Weak<ThemeRegistry>>,
    pub observed_theme_counts: Mutex<Vec<usize>>,
}

impl LibraryThemeProvider for ReentrantProvider {
    fn name(&self) -> &str {
        "reentrant"
    }

    fn manifest(&self) -> &[EmbeddedResource] {
        if let Some(registry) = self.registry.get().and_then(Weak::upgrade) {
            let count = registry.themes().map(|t| t.len()).unwrap_or(usize::MAX);
            self.observed_theme_counts.lock().unwrap().push(count);
            registry.register_provider(Arc::new(IconsProvider)).unwrap();
        }
        ICONS_MANIFEST
    }

    fn fill_color_scheme_values(&self, _: &mut IndexMap<String, String>, _: &RuntimeThemeColorValues) {}
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

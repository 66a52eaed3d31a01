//! Command implementations
//!
//! Each command writes to the given output so it can be exercised without a
//! terminal.

use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tincture_core::{Color, HslColor};
use tincture_theme::{
    BuiltinProvider, DesktopPreferences, ImmediateDispatcher, LibraryTheme, ResourceScope,
    StaticPreferences, SystemPreferences, TemplateThemeGenerator, Theme, ThemeRegistry, ThemeSync,
    ThemeSyncMode, ThemeSyncSettings,
};

use crate::config::TinctureConfig;

/// Registry with the built-in library and the configured generator
pub fn registry(config: &TinctureConfig) -> Result<Arc<ThemeRegistry>> {
    let generator = TemplateThemeGenerator::new(config.generator.clone());
    let registry = Arc::new(ThemeRegistry::new(Arc::new(generator)));
    registry.register_provider(Arc::new(BuiltinProvider))?;
    Ok(registry)
}

fn flags(theme: &Theme) -> String {
    let mut flags = Vec::new();
    if theme.is_high_contrast() {
        flags.push("high-contrast");
    }
    if theme.is_runtime_generated() {
        flags.push("runtime");
    }
    flags.join(",")
}

fn find_theme(registry: &ThemeRegistry, name: &str, high_contrast: bool) -> Result<Arc<Theme>> {
    registry
        .get_theme(name, high_contrast)?
        .with_context(|| format!("No theme named `{name}`"))
}

pub fn list(config: &TinctureConfig, high_contrast_only: bool, out: &mut impl Write) -> Result<()> {
    let registry = registry(config)?;
    for theme in registry.themes()? {
        if high_contrast_only && !theme.is_high_contrast() {
            continue;
        }
        writeln!(
            out,
            "{:<16} {:<28} {}  {}",
            theme.name(),
            theme.display_name(),
            theme.primary_accent_color(),
            flags(&theme)
        )?;
    }
    Ok(())
}

pub fn schemes(config: &TinctureConfig, out: &mut impl Write) -> Result<()> {
    let registry = registry(config)?;
    writeln!(out, "base color schemes: {}", registry.base_colors()?.join(", "))?;
    writeln!(out, "color schemes: {}", registry.color_schemes()?.join(", "))?;
    Ok(())
}

fn write_library_theme(library_theme: &LibraryTheme, out: &mut impl Write) -> Result<()> {
    writeln!(out, "[{}]", library_theme.provider())?;
    for (key, value) in library_theme.resources().entries() {
        writeln!(out, "{key} = {value}")?;
    }
    Ok(())
}

fn write_theme(theme: &Theme, with_resources: bool, out: &mut impl Write) -> Result<()> {
    writeln!(out, "name: {}", theme.name())?;
    writeln!(out, "display name: {}", theme.display_name())?;
    if let Some(origin) = theme.origin() {
        writeln!(out, "origin: {origin}")?;
    }
    writeln!(out, "base color scheme: {}", theme.base_color_scheme())?;
    writeln!(out, "color scheme: {}", theme.color_scheme())?;
    writeln!(out, "accent: {}", theme.primary_accent_color())?;
    writeln!(out, "showcase: {}", theme.showcase_color())?;
    writeln!(out, "high contrast: {}", theme.is_high_contrast())?;
    writeln!(out, "runtime generated: {}", theme.is_runtime_generated())?;

    let library_themes = theme.library_themes();
    let providers: Vec<String> = library_themes
        .iter()
        .map(|lt| lt.provider().to_string())
        .collect();
    writeln!(out, "libraries: {}", providers.join(", "))?;

    if with_resources {
        for library_theme in &library_themes {
            writeln!(out)?;
            write_library_theme(library_theme, out)?;
        }
    }
    Ok(())
}

pub fn show(
    config: &TinctureConfig,
    name: &str,
    high_contrast: bool,
    with_resources: bool,
    out: &mut impl Write,
) -> Result<()> {
    let registry = registry(config)?;
    let theme = find_theme(&registry, name, high_contrast)?;
    write_theme(&theme, with_resources, out)
}

pub fn inverse(
    config: &TinctureConfig,
    name: &str,
    high_contrast: bool,
    out: &mut impl Write,
) -> Result<()> {
    let registry = registry(config)?;
    let theme = find_theme(&registry, name, high_contrast)?;
    match registry.get_inverse_theme(&theme)? {
        Some(inverse) => writeln!(out, "{}", inverse.name())?,
        None => anyhow::bail!("{} has no inverse theme", theme.name()),
    }
    Ok(())
}

pub fn generate(
    config: &TinctureConfig,
    base_color_scheme: &str,
    accent: Color,
    high_contrast: bool,
    out: &mut impl Write,
) -> Result<()> {
    let registry = registry(config)?;
    let theme = registry
        .generate_runtime_theme(base_color_scheme, accent, high_contrast)
        .with_context(|| format!("Could not generate a {base_color_scheme} theme for {accent}"))?;
    write_theme(&theme, true, out)
}

pub fn tint(color: Color, amount: f64, out: &mut impl Write) -> Result<()> {
    let hsl = HslColor::from_color(color);
    let tinted = hsl.tinted_hsl(amount);
    writeln!(out, "{}", tinted.to_color())?;
    writeln!(
        out,
        "h {:.1}  s {:.3}  l {:.3} -> {:.3}",
        tinted.h, tinted.s, hsl.l, tinted.l
    )?;
    Ok(())
}

/// Overrides for the OS settings; unset fields come from the desktop
#[derive(Debug, Default)]
pub struct SyncOverrides {
    pub mode: Option<ThemeSyncMode>,
    pub base_color_scheme: Option<String>,
    pub accent: Option<Color>,
    pub high_contrast: bool,
}

pub fn sync(config: &TinctureConfig, overrides: SyncOverrides, out: &mut impl Write) -> Result<()> {
    let registry = registry(config)?;

    let desktop = DesktopPreferences::new();
    let preferences = StaticPreferences::default();
    preferences.set_base_color_scheme(
        overrides
            .base_color_scheme
            .or_else(|| desktop.base_color_scheme())
            .as_deref(),
    );
    preferences.set_accent_color(overrides.accent.or_else(|| desktop.accent_color()));
    preferences.set_high_contrast(overrides.high_contrast || desktop.is_high_contrast());

    let settings = ThemeSyncSettings {
        mode: overrides.mode.unwrap_or(config.sync.mode),
        ..config.sync.clone()
    };

    let scope = Arc::new(Mutex::new(ResourceScope::new("cli")));
    let start = registry
        .get_theme_by_scheme(
            &config.theme.base_color_scheme,
            &config.theme.color_scheme,
            config.theme.high_contrast,
        )?
        .with_context(|| {
            format!(
                "No starting theme {}.{}",
                config.theme.base_color_scheme, config.theme.color_scheme
            )
        })?;
    {
        let mut scope = scope.lock().map_err(|_| anyhow::anyhow!("scope lock poisoned"))?;
        registry.change_theme(&mut scope, &start)?;
    }
    writeln!(out, "start: {}", start.name())?;

    let sync = ThemeSync::new(
        registry,
        Arc::new(preferences),
        Arc::new(ImmediateDispatcher),
        scope,
        settings,
    );
    writeln!(out, "mode: {}", sync.mode())?;

    match sync.sync_now()? {
        Some(theme) => writeln!(out, "applied: {}", theme.name())?,
        None => writeln!(out, "unchanged")?,
    }
    Ok(())
}

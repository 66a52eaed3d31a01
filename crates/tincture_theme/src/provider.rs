//! Library theme providers
//!
//! A provider is a component library that ships resources for a set of
//! themes. Providers embed their bundles at compile time and describe them
//! with a manifest of [`EmbeddedResource`]s.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::Result;
use crate::generator::{RuntimeThemeColorValues, ThemeGenerator};
use crate::library_theme::{is_theme_dictionary, LibraryTheme, MatchTier};
use crate::resources::ResourceDictionary;
use crate::theme::Theme;

pub const DEFAULT_GENERATOR_PARAMETERS_NAME: &str = "GeneratorParameters.json";
pub const DEFAULT_THEME_TEMPLATE_NAME: &str = "Theme.Template.toml";

const THEMES_DIRECTORY: &str = "/themes/";
const BUNDLE_EXTENSION: &str = ".toml";
const GENERIC_BUNDLE: &str = "generic.toml";

/// A resource compiled into a provider
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmbeddedResource {
    /// Logical path, e.g. `tincture_theme/themes/Light.Blue.toml`
    pub name: &'static str,
    pub contents: &'static str,
}

impl EmbeddedResource {
    pub const fn new(name: &'static str, contents: &'static str) -> Self {
        Self { name, contents }
    }
}

/// Identity of a provider: its name plus its concrete type
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProviderKey {
    name: Arc<str>,
    kind: TypeId,
}

impl ProviderKey {
    pub fn new(name: &str, kind: TypeId) -> Self {
        Self {
            name: Arc::from(name),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeId {
        self.kind
    }

    #[cfg(test)]
    pub(crate) fn for_tests(name: &str) -> Self {
        struct TestKind;
        Self::new(name, TypeId::of::<TestKind>())
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A component library that contributes resources to themes
pub trait LibraryThemeProvider: Send + Sync + 'static {
    /// Library name; embedded resource names start with it
    fn name(&self) -> &str;

    /// Every resource embedded in the library
    fn manifest(&self) -> &[EmbeddedResource];

    /// Add this library's color placeholders for a generated theme
    fn fill_color_scheme_values(
        &self,
        values: &mut IndexMap<String, String>,
        colors: &RuntimeThemeColorValues,
    );

    fn key(&self) -> ProviderKey {
        ProviderKey::new(self.name(), TypeId::of::<Self>())
    }

    fn generator_parameters_name(&self) -> &str {
        DEFAULT_GENERATOR_PARAMETERS_NAME
    }

    fn theme_template_name(&self) -> &str {
        DEFAULT_THEME_TEMPLATE_NAME
    }

    /// Contents of the generator parameter document, if embedded
    fn generator_parameters_content(&self) -> Option<&'static str> {
        find_embedded_resource(self.name(), self.manifest(), self.generator_parameters_name())
    }

    /// Contents of the theme template, if embedded
    fn theme_template_content(&self) -> Option<&'static str> {
        find_embedded_resource(self.name(), self.manifest(), self.theme_template_name())
    }

    /// The library's built-in themes
    ///
    /// Each call starts a fresh enumeration. Malformed bundles surface as
    /// errors; non-theme bundles are skipped.
    fn library_themes(&self) -> LibraryThemes<'_> {
        LibraryThemes {
            provider: self.key(),
            resources: self.manifest().iter(),
        }
    }
}

impl dyn LibraryThemeProvider {
    /// Find or generate this provider's contribution to `target`
    ///
    /// Built-in library themes are tried against each of the target's
    /// existing library themes, one matching tier at a time. If nothing
    /// matches, a library theme is generated from the target's metadata.
    pub fn provide_missing_library_theme(
        &self,
        target: &Theme,
        generator: &dyn ThemeGenerator,
    ) -> Result<Option<Arc<LibraryTheme>>> {
        let existing = target.library_themes();
        let candidates = self.library_themes().collect::<Result<Vec<_>>>()?;

        for tier in MatchTier::ALL {
            for theme in &existing {
                if let Some(found) = candidates.iter().find(|c| tier.probe(theme, c)) {
                    tracing::debug!(
                        "{}: {:?} match {} for theme {}",
                        self.name(),
                        tier,
                        found.name(),
                        target.name()
                    );
                    return Ok(Some(found.clone()));
                }
            }
        }

        let generated = generator.generate_runtime_library_theme(
            target.base_color_scheme(),
            target.primary_accent_color(),
            target.is_high_contrast(),
            self,
        );
        if generated.is_none() {
            tracing::warn!(
                "{}: no library theme matches {} and none could be generated",
                self.name(),
                target.name()
            );
        }
        Ok(generated)
    }
}

impl fmt::Debug for dyn LibraryThemeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryThemeProvider")
            .field("name", &self.name())
            .field("resources", &self.manifest().len())
            .finish()
    }
}

/// Look up an embedded resource by exact name, or by the library prefix and
/// the name as a suffix
pub fn find_embedded_resource(
    library: &str,
    manifest: &[EmbeddedResource],
    name: &str,
) -> Option<&'static str> {
    manifest
        .iter()
        .find(|r| r.name == name)
        .or_else(|| {
            manifest
                .iter()
                .find(|r| r.name.starts_with(library) && r.name.ends_with(name))
        })
        .map(|r| r.contents)
}

/// True for `*/themes/*.toml` bundles other than `generic.toml`
pub fn is_theme_bundle_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    let file = lower.rsplit('/').next().unwrap_or(&lower);
    lower.contains(THEMES_DIRECTORY) && lower.ends_with(BUNDLE_EXTENSION) && file != GENERIC_BUNDLE
}

/// Lazy enumeration of a provider's built-in library themes
pub struct LibraryThemes<'a> {
    provider: ProviderKey,
    resources: std::slice::Iter<'a, EmbeddedResource>,
}

impl Iterator for LibraryThemes<'_> {
    type Item = Result<Arc<LibraryTheme>>;

    fn next(&mut self) -> Option<Self::Item> {
        for resource in self.resources.by_ref() {
            if !is_theme_bundle_name(resource.name) {
                continue;
            }

            let dict = match ResourceDictionary::from_toml_str(resource.name, resource.contents) {
                Ok(dict) => dict,
                Err(err) => return Some(Err(err)),
            };
            if dict.is_empty() || !is_theme_dictionary(&dict) {
                tracing::trace!("{}: {} is not a theme bundle", self.provider, resource.name);
                continue;
            }

            return Some(LibraryTheme::from_dictionary(dict, self.provider.clone(), false));
        }
        None
    }
}

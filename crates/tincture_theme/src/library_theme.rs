//! Library themes
//!
//! A [`LibraryTheme`] is one provider's contribution to a [`Theme`]: a
//! resource dictionary plus the metadata needed to match it against library
//! themes of other providers.
//!
//! [`Theme`]: crate::Theme

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, Weak};

use tincture_core::Color;

use crate::error::{Result, ThemeError};
use crate::provider::ProviderKey;
use crate::resources::{ResourceDictionary, ResourceTag, ResourceValue};
use crate::theme::{Theme, ThemeId};

/// Metadata keys every theme bundle carries
pub mod keys {
    pub const THEME_NAME: &str = "Theme.Name";
    pub const THEME_ORIGIN: &str = "Theme.Origin";
    pub const THEME_DISPLAY_NAME: &str = "Theme.DisplayName";
    pub const THEME_BASE_COLOR_SCHEME: &str = "Theme.BaseColorScheme";
    pub const THEME_COLOR_SCHEME: &str = "Theme.ColorScheme";
    pub const THEME_ALTERNATIVE_COLOR_SCHEME: &str = "Theme.AlternativeColorScheme";
    pub const THEME_PRIMARY_ACCENT_COLOR: &str = "Theme.PrimaryAccentColor";
    pub const THEME_SHOWCASE_COLOR: &str = "Theme.ShowcaseColor";
    pub const THEME_IS_HIGH_CONTRAST: &str = "Theme.IsHighContrast";
    pub const THEME_IS_RUNTIME_GENERATED: &str = "Theme.IsRuntimeGenerated";
}

/// True if the dictionary (or one of its merged dictionaries) declares a
/// theme name
pub fn is_theme_dictionary(dictionary: &ResourceDictionary) -> bool {
    dictionary.contains_key(keys::THEME_NAME)
}

/// Text form of a metadata value. Color-derived identifiers such as
/// `#FF0078D7` are stored as colors and formatted back.
fn text_of(value: &ResourceValue) -> Option<String> {
    match value {
        ResourceValue::Text(s) => Some(s.clone()),
        ResourceValue::Color(c) => Some(c.to_string()),
        _ => None,
    }
}

struct MetadataReader<'a> {
    dictionary: &'a ResourceDictionary,
    resource: &'a str,
}

impl MetadataReader<'_> {
    fn invalid(&self, key: &str) -> ThemeError {
        ThemeError::InvalidValue {
            resource: self.resource.to_string(),
            key: key.to_string(),
        }
    }

    fn optional_text(&self, key: &'static str) -> Result<Option<String>> {
        match self.dictionary.get(key) {
            None => Ok(None),
            Some(value) => text_of(value).map(Some).ok_or_else(|| self.invalid(key)),
        }
    }

    fn required_text(&self, key: &'static str) -> Result<String> {
        match self.optional_text(key)? {
            Some(s) if !s.is_empty() => Ok(s),
            Some(_) => Err(self.invalid(key)),
            None => Err(ThemeError::MissingKey {
                resource: self.resource.to_string(),
                key,
            }),
        }
    }

    fn optional_color(&self, key: &'static str) -> Result<Option<Color>> {
        match self.dictionary.get(key) {
            None => Ok(None),
            Some(value) => value.as_color().map(Some).ok_or_else(|| self.invalid(key)),
        }
    }

    fn flag(&self, key: &'static str) -> Result<bool> {
        match self.dictionary.get(key) {
            None => Ok(false),
            Some(value) => value.as_bool().ok_or_else(|| self.invalid(key)),
        }
    }
}

/// One provider's bundle of resources for a theme
#[derive(Debug)]
pub struct LibraryTheme {
    name: String,
    origin: Option<String>,
    display_name: String,
    base_color_scheme: String,
    color_scheme: String,
    alternative_color_scheme: String,
    primary_accent_color: Color,
    showcase_color: Color,
    is_high_contrast: bool,
    is_runtime_generated: bool,
    resources: Arc<ResourceDictionary>,
    provider: ProviderKey,
    parent: OnceLock<ThemeId>,
    /// Ad-hoc theme standing in for a missing parent
    wrapper: Mutex<Weak<Theme>>,
}

impl LibraryTheme {
    /// Build a library theme from a bundle dictionary
    ///
    /// Requires `Theme.Name`, `Theme.BaseColorScheme`, `Theme.ColorScheme`
    /// and `Theme.PrimaryAccentColor`. The display name defaults to the name,
    /// the alternative color scheme to the color scheme and the showcase
    /// color to the primary accent color.
    pub fn from_dictionary(
        dictionary: ResourceDictionary,
        provider: ProviderKey,
        is_runtime_generated: bool,
    ) -> Result<Arc<Self>> {
        let resource = dictionary.source().unwrap_or("<anonymous>").to_string();
        let reader = MetadataReader {
            dictionary: &dictionary,
            resource: &resource,
        };

        let name = reader.required_text(keys::THEME_NAME)?;
        let origin = reader.optional_text(keys::THEME_ORIGIN)?;
        let display_name = reader
            .optional_text(keys::THEME_DISPLAY_NAME)?
            .unwrap_or_else(|| name.clone());
        let base_color_scheme = reader.required_text(keys::THEME_BASE_COLOR_SCHEME)?;
        let color_scheme = reader.required_text(keys::THEME_COLOR_SCHEME)?;
        let alternative_color_scheme = reader
            .optional_text(keys::THEME_ALTERNATIVE_COLOR_SCHEME)?
            .unwrap_or_else(|| color_scheme.clone());
        let primary_accent_color = reader
            .optional_color(keys::THEME_PRIMARY_ACCENT_COLOR)?
            .ok_or_else(|| ThemeError::MissingKey {
                resource: resource.clone(),
                key: keys::THEME_PRIMARY_ACCENT_COLOR,
            })?;
        let showcase_color = reader
            .optional_color(keys::THEME_SHOWCASE_COLOR)?
            .unwrap_or(primary_accent_color);
        let is_high_contrast = reader.flag(keys::THEME_IS_HIGH_CONTRAST)?;
        let is_runtime_generated =
            is_runtime_generated || reader.flag(keys::THEME_IS_RUNTIME_GENERATED)?;

        Ok(Arc::new_cyclic(|this| {
            let mut dictionary = dictionary;
            dictionary.set_tag(ResourceTag::LibraryTheme(this.clone()));

            LibraryTheme {
                name,
                origin,
                display_name,
                base_color_scheme,
                color_scheme,
                alternative_color_scheme,
                primary_accent_color,
                showcase_color,
                is_high_contrast,
                is_runtime_generated,
                resources: Arc::new(dictionary),
                provider,
                parent: OnceLock::new(),
                wrapper: Mutex::new(Weak::new()),
            }
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn base_color_scheme(&self) -> &str {
        &self.base_color_scheme
    }

    pub fn color_scheme(&self) -> &str {
        &self.color_scheme
    }

    pub fn alternative_color_scheme(&self) -> &str {
        &self.alternative_color_scheme
    }

    pub fn primary_accent_color(&self) -> Color {
        self.primary_accent_color
    }

    pub fn showcase_color(&self) -> Color {
        self.showcase_color
    }

    pub fn is_high_contrast(&self) -> bool {
        self.is_high_contrast
    }

    pub fn is_runtime_generated(&self) -> bool {
        self.is_runtime_generated
    }

    pub fn resources(&self) -> &Arc<ResourceDictionary> {
        &self.resources
    }

    /// The provider that produced this library theme
    pub fn provider(&self) -> &ProviderKey {
        &self.provider
    }

    /// The theme this library theme was folded into, if any
    pub fn parent(&self) -> Option<ThemeId> {
        self.parent.get().copied()
    }

    /// Record the owning theme. Only the first call has an effect.
    pub(crate) fn attach_to(&self, theme: ThemeId) -> bool {
        self.parent.set(theme).is_ok()
    }

    pub(crate) fn wrapper_slot(&self) -> &Mutex<Weak<Theme>> {
        &self.wrapper
    }

    /// Same base color scheme, color scheme and contrast mode
    pub fn matches(&self, other: &LibraryTheme) -> bool {
        self.base_color_scheme == other.base_color_scheme
            && self.color_scheme == other.color_scheme
            && self.is_high_contrast == other.is_high_contrast
    }

    /// Same base color scheme and contrast mode, and this color scheme equals
    /// the other's alternative color scheme
    pub fn matches_second_try(&self, other: &LibraryTheme) -> bool {
        self.base_color_scheme == other.base_color_scheme
            && self.color_scheme == other.alternative_color_scheme
            && self.is_high_contrast == other.is_high_contrast
    }

    /// Same base color scheme, contrast mode and showcase color
    pub fn matches_third_try(&self, other: &LibraryTheme) -> bool {
        self.base_color_scheme == other.base_color_scheme
            && self.showcase_color.to_string() == other.showcase_color.to_string()
            && self.is_high_contrast == other.is_high_contrast
    }
}

impl fmt::Display for LibraryTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.provider)
    }
}

/// The three matching tiers, strictest first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchTier {
    /// [`LibraryTheme::matches`]
    Exact,
    /// [`LibraryTheme::matches_second_try`]
    Alternative,
    /// [`LibraryTheme::matches_third_try`]
    Showcase,
}

impl MatchTier {
    pub const ALL: [MatchTier; 3] = [MatchTier::Exact, MatchTier::Alternative, MatchTier::Showcase];

    /// Directional check: does `a` match `b` at this tier?
    pub fn check(self, a: &LibraryTheme, b: &LibraryTheme) -> bool {
        match self {
            MatchTier::Exact => a.matches(b),
            MatchTier::Alternative => a.matches_second_try(b),
            MatchTier::Showcase => a.matches_third_try(b),
        }
    }

    /// Bidirectional check; either side may declare the match
    pub fn probe(self, a: &LibraryTheme, b: &LibraryTheme) -> bool {
        self.check(a, b) || self.check(b, a)
    }
}

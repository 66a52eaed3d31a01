//! Themes
//!
//! A [`Theme`] is the user-facing unit of theming. It aggregates one
//! [`LibraryTheme`] per provider and exposes them as a single merged
//! resource dictionary.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use tincture_core::Color;

use crate::error::{Result, ThemeError};
use crate::generator::ThemeGenerator;
use crate::library_theme::{keys, LibraryTheme};
use crate::lock;
use crate::provider::{LibraryThemeProvider, ProviderKey};
use crate::resources::{ResourceDictionary, ResourceTag};

pub const BASE_COLOR_LIGHT: &str = "Light";
pub const BASE_COLOR_DARK: &str = "Dark";

/// Color scheme used by the high-contrast fallback themes
pub const GENERIC_COLOR_SCHEME: &str = "Generic";

/// The opposite base color scheme, for the two well-known ones
pub fn inverse_base_color_scheme(base_color_scheme: &str) -> Option<&'static str> {
    match base_color_scheme {
        BASE_COLOR_LIGHT => Some(BASE_COLOR_DARK),
        BASE_COLOR_DARK => Some(BASE_COLOR_LIGHT),
        _ => None,
    }
}

static NEXT_THEME_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a theme instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThemeId(u64);

impl ThemeId {
    fn next() -> Self {
        Self(NEXT_THEME_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) fn for_tests(raw: u64) -> Self {
        Self(raw)
    }
}

/// A theme: metadata plus one library theme per provider
pub struct Theme {
    id: ThemeId,
    name: String,
    origin: Option<String>,
    display_name: String,
    base_color_scheme: String,
    color_scheme: String,
    primary_accent_color: Color,
    showcase_color: Color,
    is_high_contrast: bool,
    is_runtime_generated: bool,
    library_themes: RwLock<Vec<Arc<LibraryTheme>>>,
    resources: RwLock<Option<Arc<ResourceDictionary>>>,
    this: Weak<Theme>,
}

impl Theme {
    /// Create a theme from its first library theme, which becomes a child
    /// owned by the new theme
    pub fn from_library_theme(library_theme: Arc<LibraryTheme>) -> Arc<Theme> {
        let theme = Self::wrap(library_theme.clone());
        if !library_theme.attach_to(theme.id) {
            tracing::trace!(
                "library theme {} already belongs to another theme",
                library_theme
            );
        }
        theme
    }

    /// The shared ad-hoc wrapper for a library theme without a parent
    ///
    /// Callers get the same theme for as long as any of them holds it.
    pub(crate) fn wrapper_for(library_theme: Arc<LibraryTheme>) -> Arc<Theme> {
        let mut slot = lock::lock(library_theme.wrapper_slot());
        if let Some(theme) = slot.upgrade() {
            return theme;
        }
        let theme = Self::wrap(library_theme.clone());
        *slot = Arc::downgrade(&theme);
        theme
    }

    /// Ad-hoc wrapper around a library theme that leaves its parent unset
    pub(crate) fn wrap(library_theme: Arc<LibraryTheme>) -> Arc<Theme> {
        Arc::new_cyclic(|this| Theme {
            id: ThemeId::next(),
            name: library_theme.name().to_string(),
            origin: library_theme.origin().map(str::to_string),
            display_name: library_theme.display_name().to_string(),
            base_color_scheme: library_theme.base_color_scheme().to_string(),
            color_scheme: library_theme.color_scheme().to_string(),
            primary_accent_color: library_theme.primary_accent_color(),
            showcase_color: library_theme.showcase_color(),
            is_high_contrast: library_theme.is_high_contrast(),
            is_runtime_generated: library_theme.is_runtime_generated(),
            library_themes: RwLock::new(vec![library_theme]),
            resources: RwLock::new(None),
            this: this.clone(),
        })
    }

    pub fn id(&self) -> ThemeId {
        self.id
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

    /// Snapshot of the library themes, in the order they were added
    pub fn library_themes(&self) -> Vec<Arc<LibraryTheme>> {
        lock::read(&self.library_themes).clone()
    }

    /// The library theme contributed by a provider, if any
    pub fn library_theme_for(&self, provider: &ProviderKey) -> Option<Arc<LibraryTheme>> {
        lock::read(&self.library_themes)
            .iter()
            .find(|lt| lt.provider() == provider)
            .cloned()
    }

    /// Add a library theme from a provider this theme has no contribution
    /// from yet. Returns false if the provider is already covered.
    pub fn add_library_theme(&self, library_theme: Arc<LibraryTheme>) -> bool {
        {
            let mut children = lock::write(&self.library_themes);
            if children.iter().any(|lt| lt.provider() == library_theme.provider()) {
                tracing::trace!(
                    "theme {} already has a library theme from {}",
                    self.name,
                    library_theme.provider()
                );
                return false;
            }
            library_theme.attach_to(self.id);
            children.push(library_theme);
        }
        *lock::write(&self.resources) = None;
        true
    }

    /// The merged resources of this theme
    ///
    /// Built on first use and after each [`add_library_theme`]. The returned
    /// dictionary carries the theme's metadata keys and merges every library
    /// theme's dictionary in order.
    ///
    /// [`add_library_theme`]: Theme::add_library_theme
    pub fn resources(&self) -> Arc<ResourceDictionary> {
        if let Some(resources) = lock::read(&self.resources).as_ref() {
            return resources.clone();
        }

        let mut cache = lock::write(&self.resources);
        if let Some(resources) = cache.as_ref() {
            return resources.clone();
        }

        let mut dict = ResourceDictionary::new()
            .with_source(format!("theme:{}", self.name))
            .with_entry(keys::THEME_NAME, self.name.as_str())
            .with_entry(keys::THEME_DISPLAY_NAME, self.display_name.as_str())
            .with_entry(keys::THEME_BASE_COLOR_SCHEME, self.base_color_scheme.as_str())
            .with_entry(keys::THEME_COLOR_SCHEME, self.color_scheme.as_str())
            .with_entry(keys::THEME_PRIMARY_ACCENT_COLOR, self.primary_accent_color)
            .with_entry(keys::THEME_SHOWCASE_COLOR, self.showcase_color)
            .with_entry(keys::THEME_IS_HIGH_CONTRAST, self.is_high_contrast)
            .with_entry(keys::THEME_IS_RUNTIME_GENERATED, self.is_runtime_generated);
        if let Some(origin) = &self.origin {
            dict.insert(keys::THEME_ORIGIN, origin.as_str());
        }
        for library_theme in lock::read(&self.library_themes).iter() {
            dict.merge(library_theme.resources().clone());
        }
        dict.set_tag(ResourceTag::Theme(self.this.clone()));

        let resources = Arc::new(dict);
        *cache = Some(resources.clone());
        resources
    }

    /// Make sure every provider has contributed a library theme
    ///
    /// For each provider without a contribution, asks it for a matching
    /// built-in library theme, falling back to runtime generation. Fails on
    /// the first provider that can supply neither.
    pub fn ensure_all_library_theme_providers_provided(
        &self,
        providers: &[Arc<dyn LibraryThemeProvider>],
        generator: &dyn ThemeGenerator,
    ) -> Result<()> {
        for provider in providers {
            let key = provider.key();
            if self.library_theme_for(&key).is_some() {
                continue;
            }

            match provider.provide_missing_library_theme(self, generator)? {
                Some(library_theme) => {
                    tracing::debug!("theme {}: {} provided {}", self.name, key, library_theme.name());
                    self.add_library_theme(library_theme);
                }
                None => {
                    return Err(ThemeError::MissingLibraryTheme {
                        theme: self.name.clone(),
                        provider: key.to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for Theme {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Theme {}

impl fmt::Debug for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Theme")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("is_high_contrast", &self.is_high_contrast)
            .field("is_runtime_generated", &self.is_runtime_generated)
            .field("library_themes", &lock::read(&self.library_themes).len())
            .finish()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_theme(provider: &str, name: &str) -> Arc<LibraryTheme> {
        let (base, scheme) = name.split_once('.').unwrap();
        let dict = ResourceDictionary::new()
            .with_source(format!("{provider}/themes/{name}.toml"))
            .with_entry(keys::THEME_NAME, name)
            .with_entry(keys::THEME_BASE_COLOR_SCHEME, base)
            .with_entry(keys::THEME_COLOR_SCHEME, scheme)
            .with_entry(keys::THEME_PRIMARY_ACCENT_COLOR, Color::from_hex(0x1E66F5))
            .with_entry(format!("{provider}.Marker"), provider);
        LibraryTheme::from_dictionary(dict, ProviderKey::for_tests(provider), false).unwrap()
    }

    #[test]
    fn copies_metadata_and_claims_the_library_theme() {
        let lt = library_theme("core", "Light.Blue");
        let theme = Theme::from_library_theme(lt.clone());

        assert_eq!(theme.name(), "Light.Blue");
        assert_eq!(theme.base_color_scheme(), BASE_COLOR_LIGHT);
        assert_eq!(theme.color_scheme(), "Blue");
        assert_eq!(lt.parent(), Some(theme.id()));
        assert_eq!(theme.library_themes().len(), 1);
    }

    #[test]
    fn wrapper_does_not_claim_the_library_theme() {
        let lt = library_theme("core", "Light.Blue");
        let _wrapper = Theme::wrap(lt.clone());
        assert_eq!(lt.parent(), None);
    }

    #[test]
    fn wrapper_is_shared_while_held() {
        let lt = library_theme("core", "Light.Blue");
        let first = Theme::wrapper_for(lt.clone());
        assert_eq!(*Theme::wrapper_for(lt.clone()), *first);

        let id = first.id();
        drop(first);
        assert_ne!(Theme::wrapper_for(lt.clone()).id(), id);
        assert_eq!(lt.parent(), None);
    }

    #[test]
    fn one_library_theme_per_provider() {
        let theme = Theme::from_library_theme(library_theme("core", "Light.Blue"));
        assert!(!theme.add_library_theme(library_theme("core", "Light.Blue")));
        assert!(theme.add_library_theme(library_theme("controls", "Light.Blue")));
        assert_eq!(theme.library_themes().len(), 2);
    }

    #[test]
    fn resources_merge_children_and_refresh_after_adding() {
        let theme = Theme::from_library_theme(library_theme("core", "Dark.Blue"));
        let first = theme.resources();
        assert_eq!(first.text(keys::THEME_NAME), Some("Dark.Blue"));
        assert_eq!(first.text("core.Marker"), Some("core"));
        assert!(first.get("controls.Marker").is_none());
        assert!(Arc::ptr_eq(&first, &theme.resources()));

        theme.add_library_theme(library_theme("controls", "Dark.Blue"));
        let second = theme.resources();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.merged().len(), 2);
        assert_eq!(second.text("controls.Marker"), Some("controls"));
    }

    #[test]
    fn resources_are_tagged_with_the_theme() {
        let theme = Theme::from_library_theme(library_theme("core", "Light.Green"));
        match theme.resources().tag() {
            Some(ResourceTag::Theme(weak)) => assert_eq!(*weak.upgrade().unwrap(), *theme),
            other => panic!("unexpected tag {other:?}"),
        }
    }

    #[test]
    fn equality_is_identity() {
        let a = Theme::from_library_theme(library_theme("core", "Light.Blue"));
        let b = Theme::from_library_theme(library_theme("core", "Light.Blue"));
        assert_eq!(*a, *a);
        assert_ne!(*a, *b);
    }

    #[test]
    fn inverse_base_colors() {
        assert_eq!(inverse_base_color_scheme("Light"), Some("Dark"));
        assert_eq!(inverse_base_color_scheme("Dark"), Some("Light"));
        assert_eq!(inverse_base_color_scheme("Sepia"), None);
    }
}

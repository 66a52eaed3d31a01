//! Theme registry
//!
//! [`ThemeRegistry`] is the catalog of themes. It owns provider
//! registration, keeps the base color and color scheme indices in step with
//! the theme list, detects which theme a scope shows, and swaps themes on a
//! scope.
//!
//! Themes are enumerated lazily: the registry starts un-ensured and reads
//! every provider's built-in library themes the first time the catalog is
//! queried. Providers registered after that are folded in immediately.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tincture_theme::{BuiltinProvider, ResourceScope, ThemeRegistry};
//!
//! let registry = ThemeRegistry::default();
//! registry.register_provider(Arc::new(BuiltinProvider)).unwrap();
//!
//! let mut scope = ResourceScope::new("main-window");
//! let light = registry.get_theme_by_scheme("Light", "Blue", false).unwrap().unwrap();
//! registry.change_theme(&mut scope, &light).unwrap();
//!
//! let dark = registry.get_inverse_theme(&light).unwrap().unwrap();
//! assert_eq!(dark.name(), "Dark.Blue");
//! ```

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, ThreadId};

use indexmap::IndexSet;
use tincture_core::{Color, Observers, SubscriptionId};

use crate::error::{Result, ThemeError};
use crate::generator::{TemplateThemeGenerator, ThemeGenerator};
use crate::library_theme::{keys, LibraryTheme};
use crate::lock;
use crate::provider::LibraryThemeProvider;
use crate::resources::{DictionaryId, ResourceDictionary, ResourceScope, ResourceTag, ScopeId};
use crate::theme::{inverse_base_color_scheme, Theme, GENERIC_COLOR_SCHEME};

static GLOBAL: OnceLock<ThemeRegistry> = OnceLock::new();

/// Fired once per successful theme swap on a scope
#[derive(Clone, Debug)]
pub struct ThemeChanged {
    pub scope: ScopeId,
    pub scope_name: String,
    /// The scope's top-level dictionaries after the swap
    pub resources: Vec<Arc<ResourceDictionary>>,
    pub old_theme: Option<Arc<Theme>>,
    pub new_theme: Arc<Theme>,
}

enum IndexChange<'a> {
    Added(&'a Theme),
    Removed(&'a Theme),
    Reset,
}

#[derive(Default)]
struct Catalog {
    themes: Vec<Arc<Theme>>,
    providers: Vec<Arc<dyn LibraryThemeProvider>>,
    base_colors: IndexSet<String>,
    color_schemes: IndexSet<String>,
    ensured: bool,
}

impl Catalog {
    fn find(&self, name: &str, high_contrast: bool) -> Option<&Arc<Theme>> {
        self.themes
            .iter()
            .find(|t| t.name() == name && t.is_high_contrast() == high_contrast)
    }

    fn find_by_scheme(&self, base: &str, scheme: &str, high_contrast: bool) -> Option<&Arc<Theme>> {
        self.themes.iter().find(|t| {
            t.base_color_scheme() == base
                && t.color_scheme() == scheme
                && t.is_high_contrast() == high_contrast
        })
    }

    fn insert_library_theme(&mut self, library_theme: Arc<LibraryTheme>) -> Arc<Theme> {
        if let Some(theme) = self
            .find(library_theme.name(), library_theme.is_high_contrast())
            .cloned()
        {
            theme.add_library_theme(library_theme);
            return theme;
        }

        let theme = Theme::from_library_theme(library_theme);
        self.push(theme.clone());
        theme
    }

    fn push(&mut self, theme: Arc<Theme>) {
        self.themes.push(theme.clone());
        self.update_indices(IndexChange::Added(&theme));
    }

    fn remove(&mut self, theme: &Theme) -> bool {
        let Some(index) = self.themes.iter().position(|t| **t == *theme) else {
            return false;
        };
        let removed = self.themes.remove(index);
        self.update_indices(IndexChange::Removed(&removed));
        true
    }

    fn clear(&mut self) {
        self.themes.clear();
        self.update_indices(IndexChange::Reset);
    }

    fn update_indices(&mut self, change: IndexChange<'_>) {
        match change {
            IndexChange::Added(theme) => {
                self.base_colors.insert(theme.base_color_scheme().to_string());
                self.color_schemes.insert(theme.color_scheme().to_string());
            }
            IndexChange::Removed(theme) => {
                let base = theme.base_color_scheme();
                if !self.themes.iter().any(|t| t.base_color_scheme() == base) {
                    self.base_colors.shift_remove(base);
                }
                let scheme = theme.color_scheme();
                if !self.themes.iter().any(|t| t.color_scheme() == scheme) {
                    self.color_schemes.shift_remove(scheme);
                }
            }
            IndexChange::Reset => {
                self.base_colors = self
                    .themes
                    .iter()
                    .map(|t| t.base_color_scheme().to_string())
                    .collect();
                self.color_schemes = self
                    .themes
                    .iter()
                    .map(|t| t.color_scheme().to_string())
                    .collect();
            }
        }
    }
}

/// Catalog of themes and the providers that contribute to them
pub struct ThemeRegistry {
    catalog: RwLock<Catalog>,
    /// Thread running the first enumeration, if one is running
    enumerator: Mutex<Option<ThreadId>>,
    enumerated: Condvar,
    generator: RwLock<Arc<dyn ThemeGenerator>>,
    observers: RwLock<Observers<ThemeChanged>>,
}

impl ThemeRegistry {
    pub fn new(generator: Arc<dyn ThemeGenerator>) -> Self {
        Self {
            catalog: RwLock::new(Catalog::default()),
            enumerator: Mutex::new(None),
            enumerated: Condvar::new(),
            generator: RwLock::new(generator),
            observers: RwLock::new(Observers::new()),
        }
    }

    /// Process-wide default registry, built on first use
    pub fn global() -> &'static ThemeRegistry {
        GLOBAL.get_or_init(ThemeRegistry::default)
    }

    fn catalog(&self) -> RwLockReadGuard<'_, Catalog> {
        lock::read(&self.catalog)
    }

    fn catalog_mut(&self) -> RwLockWriteGuard<'_, Catalog> {
        lock::write(&self.catalog)
    }

    // ========== Generator ==========

    pub fn generator(&self) -> Arc<dyn ThemeGenerator> {
        lock::read(&self.generator).clone()
    }

    pub fn set_generator(&self, generator: Arc<dyn ThemeGenerator>) {
        *lock::write(&self.generator) = generator;
    }

    // ========== Providers ==========

    /// Register a provider
    ///
    /// Returns `Ok(false)` if a provider of the same type is already
    /// registered. If the catalog was already enumerated, the provider's
    /// built-in themes are folded in right away.
    pub fn register_provider(&self, provider: Arc<dyn LibraryThemeProvider>) -> Result<bool> {
        let key = provider.key();
        let ensured = {
            let mut catalog = self.catalog_mut();
            if catalog.providers.iter().any(|p| p.key().kind() == key.kind()) {
                tracing::debug!("provider {key} is already registered");
                return Ok(false);
            }
            catalog.providers.push(provider.clone());
            catalog.ensured
        };

        tracing::debug!("registered provider {key}");
        if ensured {
            self.fold_provider(provider.as_ref())?;
        }
        Ok(true)
    }

    /// Registered providers, in registration order
    pub fn providers(&self) -> Vec<Arc<dyn LibraryThemeProvider>> {
        self.catalog().providers.clone()
    }

    fn enumerate(provider: &dyn LibraryThemeProvider) -> Result<Vec<Arc<LibraryTheme>>> {
        provider
            .library_themes()
            .collect::<Result<Vec<_>>>()
            .map_err(|err| ThemeError::Enumeration {
                provider: provider.name().to_string(),
                source: Box::new(err),
            })
    }

    fn fold_provider(&self, provider: &dyn LibraryThemeProvider) -> Result<()> {
        let library_themes = Self::enumerate(provider)?;
        let count = library_themes.len();

        let mut catalog = self.catalog_mut();
        for library_theme in library_themes {
            catalog.insert_library_theme(library_theme);
        }
        tracing::debug!("{}: folded {count} library themes", provider.name());
        Ok(())
    }

    // ========== Enumeration ==========

    /// True once every registered provider has been enumerated
    pub fn is_ensured(&self) -> bool {
        self.catalog().ensured
    }

    /// Enumerate every registered provider's built-in themes, once
    ///
    /// Re-entrant calls from the enumerating thread return immediately;
    /// other threads wait for the enumeration to finish. Providers
    /// registered while the enumeration runs are picked up before it
    /// finishes.
    pub fn ensure_themes(&self) -> Result<()> {
        if self.catalog().ensured {
            return Ok(());
        }

        let current = thread::current().id();
        {
            let mut enumerator = lock::lock(&self.enumerator);
            loop {
                let owner = *enumerator;
                match owner {
                    Some(owner) if owner == current => {
                        tracing::trace!("ensure_themes re-entered; enumeration already running");
                        return Ok(());
                    }
                    Some(_) => enumerator = lock::wait(&self.enumerated, enumerator),
                    None => break,
                }
            }
            if self.catalog().ensured {
                return Ok(());
            }
            *enumerator = Some(current);
        }

        let _guard = EnumerationGuard(self);
        self.enumerate_pending()
    }

    fn enumerate_pending(&self) -> Result<()> {
        let mut done = 0;
        loop {
            let pending = {
                let mut catalog = self.catalog_mut();
                if catalog.providers.len() == done {
                    catalog.ensured = true;
                    tracing::debug!(
                        "theme catalog ready: {} themes from {} providers",
                        catalog.themes.len(),
                        done
                    );
                    return Ok(());
                }
                catalog.providers[done..].to_vec()
            };

            for provider in &pending {
                self.fold_provider(provider.as_ref())?;
            }
            done += pending.len();
        }
    }

    // ========== Catalog ==========

    /// Every theme, in the order it was added
    pub fn themes(&self) -> Result<Vec<Arc<Theme>>> {
        self.ensure_themes()?;
        Ok(self.catalog().themes.clone())
    }

    /// Distinct base color schemes over all themes
    pub fn base_colors(&self) -> Result<Vec<String>> {
        self.ensure_themes()?;
        Ok(self.catalog().base_colors.iter().cloned().collect())
    }

    /// Distinct color schemes over all themes
    pub fn color_schemes(&self) -> Result<Vec<String>> {
        self.ensure_themes()?;
        Ok(self.catalog().color_schemes.iter().cloned().collect())
    }

    /// Attach a library theme to the theme with the same name and contrast
    /// mode, creating that theme if needed
    pub fn add_library_theme(&self, library_theme: Arc<LibraryTheme>) -> Arc<Theme> {
        self.catalog_mut().insert_library_theme(library_theme)
    }

    /// Add a theme unless one with the same name and contrast mode exists;
    /// returns the registered theme either way
    pub fn add_theme(&self, theme: Arc<Theme>) -> Arc<Theme> {
        let mut catalog = self.catalog_mut();
        if let Some(existing) = catalog.find(theme.name(), theme.is_high_contrast()) {
            return existing.clone();
        }
        catalog.push(theme.clone());
        theme
    }

    pub fn remove_theme(&self, theme: &Theme) -> bool {
        self.catalog_mut().remove(theme)
    }

    /// Drop every theme; the next query enumerates the providers again
    pub fn clear_themes(&self) {
        let mut catalog = self.catalog_mut();
        catalog.clear();
        catalog.ensured = false;
    }

    // ========== Lookup ==========

    /// Theme by name
    pub fn get_theme(&self, name: &str, high_contrast: bool) -> Result<Option<Arc<Theme>>> {
        if name.is_empty() {
            return Err(ThemeError::empty_argument("name"));
        }
        self.ensure_themes()?;
        Ok(self.catalog().find(name, high_contrast).cloned())
    }

    /// Theme by base color scheme and color scheme
    ///
    /// A high-contrast request with no exact match falls back to the
    /// `Generic` high-contrast theme for the base, then to any high-contrast
    /// theme for the base.
    pub fn get_theme_by_scheme(
        &self,
        base_color_scheme: &str,
        color_scheme: &str,
        high_contrast: bool,
    ) -> Result<Option<Arc<Theme>>> {
        if base_color_scheme.is_empty() {
            return Err(ThemeError::empty_argument("base_color_scheme"));
        }
        if color_scheme.is_empty() {
            return Err(ThemeError::empty_argument("color_scheme"));
        }
        self.ensure_themes()?;

        let catalog = self.catalog();
        let exact = catalog.find_by_scheme(base_color_scheme, color_scheme, high_contrast);
        if exact.is_some() || !high_contrast {
            return Ok(exact.cloned());
        }

        let fallback = catalog
            .find_by_scheme(base_color_scheme, GENERIC_COLOR_SCHEME, true)
            .or_else(|| {
                catalog
                    .themes
                    .iter()
                    .find(|t| t.base_color_scheme() == base_color_scheme && t.is_high_contrast())
            });
        if let Some(theme) = fallback {
            tracing::debug!(
                "no high contrast {base_color_scheme}.{color_scheme}; using {}",
                theme.name()
            );
        }
        Ok(fallback.cloned())
    }

    /// Theme by base color scheme and accent color
    pub fn get_theme_by_accent(
        &self,
        base_color_scheme: &str,
        accent_color: Color,
        high_contrast: bool,
    ) -> Result<Option<Arc<Theme>>> {
        if base_color_scheme.is_empty() {
            return Err(ThemeError::empty_argument("base_color_scheme"));
        }
        self.ensure_themes()?;
        Ok(self
            .catalog()
            .themes
            .iter()
            .find(|t| {
                t.base_color_scheme() == base_color_scheme
                    && t.primary_accent_color().same_rgba8(&accent_color)
                    && t.is_high_contrast() == high_contrast
            })
            .cloned())
    }

    /// The theme a dictionary belongs to
    ///
    /// Tried in order: the theme tag set when the dictionary was built, the
    /// `Theme.Name` metadata, and for runtime-generated dictionaries the
    /// library theme tags of nested dictionaries.
    pub fn get_theme_for_dictionary(
        &self,
        dictionary: &ResourceDictionary,
    ) -> Result<Option<Arc<Theme>>> {
        if let Some(ResourceTag::Theme(theme)) = dictionary.tag() {
            if let Some(theme) = theme.upgrade() {
                return Ok(Some(theme));
            }
        }

        if let Some(name) = dictionary
            .get_own(keys::THEME_NAME)
            .and_then(|v| v.as_text())
            .filter(|name| !name.is_empty())
        {
            let high_contrast = dictionary
                .get_own(keys::THEME_IS_HIGH_CONTRAST)
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if let Some(theme) = self.get_theme(name, high_contrast)? {
                return Ok(Some(theme));
            }
        }

        let is_runtime_generated = dictionary
            .get_own(keys::THEME_IS_RUNTIME_GENERATED)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if is_runtime_generated {
            return Ok(self.find_tagged_theme(dictionary));
        }
        Ok(None)
    }

    fn find_tagged_theme(&self, dictionary: &ResourceDictionary) -> Option<Arc<Theme>> {
        match dictionary.tag() {
            Some(ResourceTag::Theme(theme)) => {
                if let Some(theme) = theme.upgrade() {
                    return Some(theme);
                }
            }
            Some(ResourceTag::LibraryTheme(library_theme)) => {
                if let Some(library_theme) = library_theme.upgrade() {
                    return Some(
                        self.parent_of(&library_theme)
                            .unwrap_or_else(|| Theme::wrapper_for(library_theme)),
                    );
                }
            }
            None => {}
        }
        dictionary
            .merged()
            .iter()
            .find_map(|child| self.find_tagged_theme(child))
    }

    fn parent_of(&self, library_theme: &LibraryTheme) -> Option<Arc<Theme>> {
        let parent = library_theme.parent()?;
        self.catalog()
            .themes
            .iter()
            .find(|t| t.id() == parent)
            .cloned()
    }

    /// The theme currently shown by a scope
    ///
    /// Top-level dictionaries are checked last-added first, recursing into
    /// nested dictionaries, so the most recently applied theme wins.
    pub fn detect_theme(&self, scope: &ResourceScope) -> Result<Option<Arc<Theme>>> {
        for dictionary in scope.merged_dictionaries().iter().rev() {
            if let Some(theme) = scope.applied_theme(dictionary.id()) {
                return Ok(Some(theme.clone()));
            }
            if let Some(theme) = self.detect_in_dictionary(dictionary)? {
                return Ok(Some(theme));
            }
        }
        Ok(None)
    }

    fn detect_in_dictionary(&self, dictionary: &ResourceDictionary) -> Result<Option<Arc<Theme>>> {
        if let Some(theme) = self.get_theme_for_dictionary(dictionary)? {
            return Ok(Some(theme));
        }
        for child in dictionary.merged().iter().rev() {
            if let Some(theme) = self.detect_in_dictionary(child)? {
                return Ok(Some(theme));
            }
        }
        Ok(None)
    }

    /// The same theme with the opposite base color scheme
    ///
    /// Runtime-generated themes are regenerated for the other base; catalog
    /// themes resolve to the sibling with the same color scheme. `None` if
    /// the base color scheme has no known opposite.
    pub fn get_inverse_theme(&self, theme: &Theme) -> Result<Option<Arc<Theme>>> {
        let Some(inverse_base) = inverse_base_color_scheme(theme.base_color_scheme()) else {
            tracing::debug!("{} has no inverse base color scheme", theme.name());
            return Ok(None);
        };

        if theme.is_runtime_generated() {
            return Ok(self.generate_runtime_theme(
                inverse_base,
                theme.primary_accent_color(),
                theme.is_high_contrast(),
            ));
        }

        self.ensure_themes()?;
        Ok(self
            .catalog()
            .find_by_scheme(inverse_base, theme.color_scheme(), theme.is_high_contrast())
            .cloned())
    }

    /// Generate a theme for an accent color with every registered provider
    /// and add it to the catalog
    ///
    /// If a theme with the generated name is already registered, that theme
    /// is returned.
    pub fn generate_runtime_theme(
        &self,
        base_color_scheme: &str,
        accent_color: Color,
        high_contrast: bool,
    ) -> Option<Arc<Theme>> {
        let providers = self.providers();
        let generated = self.generator().generate_runtime_theme(
            base_color_scheme,
            accent_color,
            high_contrast,
            &providers,
        );
        match generated {
            Some(theme) => Some(self.add_theme(theme)),
            None => {
                tracing::warn!(
                    "could not generate a runtime theme for {base_color_scheme}.{accent_color}"
                );
                None
            }
        }
    }

    // ========== Theme changes ==========

    /// Show `theme` on `scope`
    ///
    /// Does nothing if the scope already shows the theme. Otherwise fills
    /// in missing library themes, adds the new resources, removes the old
    /// theme's resources and notifies subscribers, all inside one batched
    /// update. The new resources are added before the old ones are removed.
    pub fn change_theme(&self, scope: &mut ResourceScope, theme: &Arc<Theme>) -> Result<Arc<Theme>> {
        let old_theme = self.detect_theme(scope)?;
        if old_theme.as_ref() == Some(theme) {
            tracing::trace!("{} already shows {}", scope.name(), theme.name());
            return Ok(theme.clone());
        }

        let providers = self.providers();
        let generator = self.generator();
        {
            let mut batch = scope.batch();
            theme.ensure_all_library_theme_providers_provided(&providers, generator.as_ref())?;

            let resources = theme.resources();
            let new_id = resources.id();
            batch.add_for_theme(resources, theme.clone());

            if let Some(old_theme) = &old_theme {
                let mut stale: Vec<DictionaryId> = Vec::new();
                for dictionary in batch.merged_dictionaries() {
                    if dictionary.id() != new_id && self.shows(&batch, dictionary, old_theme)? {
                        stale.push(dictionary.id());
                    }
                }
                for id in stale {
                    batch.remove(id);
                }
            }
        }

        tracing::debug!(
            "{}: theme changed from {} to {}",
            scope.name(),
            old_theme.as_ref().map_or("<none>", |t| t.name()),
            theme.name()
        );

        let event = ThemeChanged {
            scope: scope.id(),
            scope_name: scope.name().to_string(),
            resources: scope.merged_dictionaries().to_vec(),
            old_theme,
            new_theme: theme.clone(),
        };
        lock::read(&self.observers).notify(&event);

        Ok(theme.clone())
    }

    fn shows(
        &self,
        scope: &ResourceScope,
        dictionary: &ResourceDictionary,
        theme: &Theme,
    ) -> Result<bool> {
        if let Some(applied) = scope.applied_theme(dictionary.id()) {
            return Ok(**applied == *theme);
        }
        Ok(self
            .detect_in_dictionary(dictionary)?
            .is_some_and(|detected| *detected == *theme))
    }

    /// Show the named theme on `scope`; `None` if no such theme exists
    pub fn change_theme_by_name(
        &self,
        scope: &mut ResourceScope,
        name: &str,
        high_contrast: bool,
    ) -> Result<Option<Arc<Theme>>> {
        match self.get_theme(name, high_contrast)? {
            Some(theme) => self.change_theme(scope, &theme).map(Some),
            None => {
                tracing::error!("could not find a theme named `{name}`");
                Ok(None)
            }
        }
    }

    /// Show the theme with the given base color scheme and color scheme
    ///
    /// Keeps the contrast mode of the scope's current theme. A failed lookup
    /// is logged and returns `None`.
    pub fn change_theme_by_scheme(
        &self,
        scope: &mut ResourceScope,
        base_color_scheme: &str,
        color_scheme: &str,
    ) -> Result<Option<Arc<Theme>>> {
        if base_color_scheme.is_empty() {
            return Err(ThemeError::empty_argument("base_color_scheme"));
        }
        if color_scheme.is_empty() {
            return Err(ThemeError::empty_argument("color_scheme"));
        }

        let high_contrast = self
            .detect_theme(scope)?
            .is_some_and(|t| t.is_high_contrast());
        match self.get_theme_by_scheme(base_color_scheme, color_scheme, high_contrast)? {
            Some(theme) => self.change_theme(scope, &theme).map(Some),
            None => {
                tracing::error!(
                    "could not find a theme for base color scheme `{base_color_scheme}` \
                     and color scheme `{color_scheme}`"
                );
                Ok(None)
            }
        }
    }

    /// Switch the scope's current theme to another base color scheme
    ///
    /// Runtime-generated themes are regenerated for the new base.
    pub fn change_theme_base_color(
        &self,
        scope: &mut ResourceScope,
        base_color_scheme: &str,
    ) -> Result<Option<Arc<Theme>>> {
        if base_color_scheme.is_empty() {
            return Err(ThemeError::empty_argument("base_color_scheme"));
        }
        let Some(current) = self.detect_theme(scope)? else {
            tracing::error!("{} shows no theme to change the base color of", scope.name());
            return Ok(None);
        };

        let target = if current.is_runtime_generated() {
            self.generate_runtime_theme(
                base_color_scheme,
                current.primary_accent_color(),
                current.is_high_contrast(),
            )
        } else {
            self.get_theme_by_scheme(
                base_color_scheme,
                current.color_scheme(),
                current.is_high_contrast(),
            )?
        };

        match target {
            Some(theme) => self.change_theme(scope, &theme).map(Some),
            None => {
                tracing::error!(
                    "could not find a {base_color_scheme} variant of {}",
                    current.name()
                );
                Ok(None)
            }
        }
    }

    /// Switch the scope's current theme to another color scheme, keeping
    /// its base color scheme
    pub fn change_theme_color_scheme(
        &self,
        scope: &mut ResourceScope,
        color_scheme: &str,
    ) -> Result<Option<Arc<Theme>>> {
        if color_scheme.is_empty() {
            return Err(ThemeError::empty_argument("color_scheme"));
        }
        let Some(current) = self.detect_theme(scope)? else {
            tracing::error!("{} shows no theme to change the color scheme of", scope.name());
            return Ok(None);
        };

        let base_color_scheme = current.base_color_scheme().to_string();
        self.change_theme_by_scheme(scope, &base_color_scheme, color_scheme)
    }

    // ========== Notifications ==========

    /// Subscribe to theme changes
    ///
    /// Handlers run on the thread that changed the theme and must not
    /// subscribe or unsubscribe from inside the callback.
    pub fn subscribe_theme_changed<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ThemeChanged) + Send + Sync + 'static,
    {
        lock::write(&self.observers).subscribe(handler)
    }

    pub fn unsubscribe_theme_changed(&self, id: SubscriptionId) -> bool {
        lock::write(&self.observers).unsubscribe(id)
    }
}

/// Releases enumeration ownership and wakes waiting threads, also on unwind
struct EnumerationGuard<'a>(&'a ThemeRegistry);

impl Drop for EnumerationGuard<'_> {
    fn drop(&mut self) {
        *lock::lock(&self.0.enumerator) = None;
        self.0.enumerated.notify_all();
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new(Arc::new(TemplateThemeGenerator::default()))
    }
}

impl fmt::Debug for ThemeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let catalog = self.catalog();
        let providers: Vec<String> = catalog.providers.iter().map(|p| p.name().to_string()).collect();
        f.debug_struct("ThemeRegistry")
            .field("themes", &catalog.themes.len())
            .field("providers", &providers)
            .field("ensured", &catalog.ensured)
            .finish_non_exhaustive()
    }
}

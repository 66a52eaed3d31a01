//! Tincture Theme
//!
//! A theme registry that assembles themes from per-library contributions,
//! resolves which theme a scope shows, generates themes from an accent color
//! at runtime and follows the OS appearance settings.
//!
//! # Overview
//!
//! - **Providers**: each component library implements
//!   [`LibraryThemeProvider`] and ships its built-in themes as embedded TOML
//!   bundles
//! - **Library themes**: one provider's bundle for one theme, with the
//!   metadata used to match bundles across providers
//! - **Themes**: one library theme per provider, exposed as a single merged
//!   [`ResourceDictionary`]
//! - **Registry**: the catalog, its base color / color scheme indices and
//!   flicker-free theme swaps on a [`ResourceScope`]
//! - **Generation**: runtime themes from an accent color via
//!   [`ThemeGenerator`]
//! - **Sync**: [`ThemeSync`] re-applies the theme matching the OS settings
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tincture_core::Color;
//! use tincture_theme::{BuiltinProvider, ResourceScope, ThemeRegistry};
//!
//! let registry = ThemeRegistry::default();
//! registry.register_provider(Arc::new(BuiltinProvider)).unwrap();
//!
//! let mut window = ResourceScope::new("window");
//! registry
//!     .change_theme_by_scheme(&mut window, "Dark", "Green")
//!     .unwrap();
//! assert_eq!(
//!     registry.detect_theme(&window).unwrap().unwrap().name(),
//!     "Dark.Green"
//! );
//!
//! // No built-in theme uses this accent, so one is generated
//! let peach = registry
//!     .generate_runtime_theme("Dark", Color::from_hex(0xFE640B), false)
//!     .unwrap();
//! registry.change_theme(&mut window, &peach).unwrap();
//! ```

pub mod builtin;
pub mod error;
pub mod generator;
pub mod library_theme;
mod lock;
pub mod platform;
pub mod provider;
pub mod registry;
pub mod resources;
pub mod sync;
pub mod theme;

// Re-export commonly used types
pub use builtin::BuiltinProvider;
pub use error::{Result, ThemeError};
pub use generator::{
    ideal_foreground, AccentShades, GeneratorOptions, GeneratorParameters,
    RuntimeThemeColorValues, RuntimeThemeOptions, TemplateThemeGenerator, ThemeGenerator,
    TintShades,
};
pub use library_theme::{is_theme_dictionary, keys, LibraryTheme, MatchTier};
pub use platform::{
    detect_system_base_color_scheme, DesktopPreferences, StaticPreferences, SystemPreferences,
};
pub use provider::{EmbeddedResource, LibraryThemeProvider, ProviderKey};
pub use registry::{ThemeChanged, ThemeRegistry};
pub use resources::{
    DictionaryId, ResourceDictionary, ResourceScope, ResourceTag, ResourceValue, ScopeBatch,
    ScopeId, ScopeMutation,
};
pub use sync::{
    Dispatcher, ImmediateDispatcher, PreferenceChange, QueueDispatcher, ThemeSync,
    ThemeSyncMode, ThemeSyncSettings,
};
pub use theme::{
    inverse_base_color_scheme, Theme, ThemeId, BASE_COLOR_DARK, BASE_COLOR_LIGHT,
    GENERIC_COLOR_SCHEME,
};

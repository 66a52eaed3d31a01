//! Theme error types

use thiserror::Error;

/// Theme-related errors
#[derive(Error, Debug)]
pub enum ThemeError {
    /// A required argument was empty or otherwise unusable
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },

    /// A resource bundle is not valid TOML
    #[error("failed to parse resource bundle `{resource}`: {source}")]
    BundleParse {
        resource: String,
        #[source]
        source: toml::de::Error,
    },

    /// A theme bundle lacks one of the `Theme.*` metadata keys
    #[error("resource bundle `{resource}` is missing required key `{key}`")]
    MissingKey { resource: String, key: &'static str },

    /// A theme bundle has a metadata key with the wrong value type
    #[error("resource bundle `{resource}` has an invalid value for `{key}`")]
    InvalidValue { resource: String, key: String },

    /// Enumerating a provider's built-in themes failed
    #[error(
        "provider `{provider}` could not enumerate its built-in themes; \
         an embedded bundle under `/themes/` is most likely malformed or was \
         embedded with the wrong contents"
    )]
    Enumeration {
        provider: String,
        #[source]
        source: Box<ThemeError>,
    },

    /// No library theme could be found or generated for a provider
    #[error("theme `{theme}` has no library theme for provider `{provider}` and none could be generated")]
    MissingLibraryTheme { theme: String, provider: String },
}

impl ThemeError {
    pub(crate) fn empty_argument(name: &'static str) -> Self {
        ThemeError::InvalidArgument {
            name,
            reason: "must not be empty",
        }
    }
}

/// Result type for theme operations
pub type Result<T> = std::result::Result<T, ThemeError>;

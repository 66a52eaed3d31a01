//! Following the operating system's appearance settings
//!
//! [`ThemeSync`] listens for preference-change notifications and re-applies
//! the theme that matches the OS light/dark mode, accent color and high
//! contrast setting, as selected by a [`ThemeSyncMode`].
//!
//! Notifications may arrive on any thread. Each one that the current mode
//! cares about schedules a single sync on the scope's [`Dispatcher`]; further
//! notifications are dropped until that sync runs, and the sync reads the
//! preferences at the time it runs.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tincture_core::Color;

use crate::error::Result;
use crate::lock;
use crate::platform::SystemPreferences;
use crate::registry::ThemeRegistry;
use crate::resources::ResourceScope;
use crate::theme::{Theme, BASE_COLOR_LIGHT};

// ─────────────────────────────────────────────────────────────────────────────
// Sync mode
// ─────────────────────────────────────────────────────────────────────────────

bitflags! {
    /// Which OS settings the theme follows
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ThemeSyncMode: u8 {
        const SYNC_WITH_APP_MODE = 1;
        const SYNC_WITH_ACCENT = 1 << 1;
        const SYNC_WITH_HIGH_CONTRAST = 1 << 2;
        const SYNC_ALL = Self::SYNC_WITH_APP_MODE.bits()
            | Self::SYNC_WITH_ACCENT.bits()
            | Self::SYNC_WITH_HIGH_CONTRAST.bits();
    }
}

const MODE_NAMES: [(&str, ThemeSyncMode); 5] = [
    ("DoNotSync", ThemeSyncMode::DO_NOT_SYNC),
    ("SyncWithAppMode", ThemeSyncMode::SYNC_WITH_APP_MODE),
    ("SyncWithAccent", ThemeSyncMode::SYNC_WITH_ACCENT),
    ("SyncWithHighContrast", ThemeSyncMode::SYNC_WITH_HIGH_CONTRAST),
    ("SyncAll", ThemeSyncMode::SYNC_ALL),
];

impl ThemeSyncMode {
    pub const DO_NOT_SYNC: Self = Self::empty();
}

impl Default for ThemeSyncMode {
    fn default() -> Self {
        Self::DO_NOT_SYNC
    }
}

/// An unknown sync mode name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown theme sync mode `{0}`")]
pub struct ThemeSyncModeParseError(pub String);

impl FromStr for ThemeSyncMode {
    type Err = ThemeSyncModeParseError;

    /// Parse `SyncAll`, `SyncWithAppMode | SyncWithAccent`, ... (names are
    /// case-insensitive; `|` or `,` separate them)
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut mode = ThemeSyncMode::empty();
        for part in s.split(|c: char| c == '|' || c == ',').map(str::trim).filter(|p| !p.is_empty()) {
            let (_, flag) = MODE_NAMES
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(part))
                .ok_or_else(|| ThemeSyncModeParseError(part.to_string()))?;
            mode |= *flag;
        }
        Ok(mode)
    }
}

impl fmt::Display for ThemeSyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("DoNotSync");
        }
        if *self == Self::SYNC_ALL {
            return f.write_str("SyncAll");
        }
        let names: Vec<&str> = MODE_NAMES[1..4]
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        f.write_str(&names.join(" | "))
    }
}

impl Serialize for ThemeSyncMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ThemeSyncMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

mod color_text {
    use serde::{Deserialize, Deserializer, Serializer};
    use tincture_core::Color;

    pub fn serialize<S: Serializer>(color: &Option<Color>, serializer: S) -> Result<S::Ok, S::Error> {
        match color {
            Some(color) => serializer.collect_str(color),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Color>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| text.parse().map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// `[sync]` configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeSyncSettings {
    pub mode: ThemeSyncMode,
    /// Base color scheme when neither the OS nor the current theme has one
    pub default_base_color_scheme: String,
    /// Accent color when neither the OS nor the current theme has one
    #[serde(with = "color_text", skip_serializing_if = "Option::is_none")]
    pub fallback_accent_color: Option<Color>,
}

impl Default for ThemeSyncSettings {
    fn default() -> Self {
        Self {
            mode: ThemeSyncMode::default(),
            default_base_color_scheme: BASE_COLOR_LIGHT.to_string(),
            fallback_accent_color: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

pub type Task = Box<dyn FnOnce() + Send>;

/// Runs work on the thread that owns a scope
pub trait Dispatcher: Send + Sync {
    fn post(&self, task: Task);
}

/// Runs tasks inline on the posting thread
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateDispatcher;

impl Dispatcher for ImmediateDispatcher {
    fn post(&self, task: Task) {
        task();
    }
}

/// Holds tasks until the owning loop calls [`run_pending`]
///
/// [`run_pending`]: QueueDispatcher::run_pending
#[derive(Default)]
pub struct QueueDispatcher {
    queue: Mutex<VecDeque<Task>>,
}

impl QueueDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run queued tasks, including ones they post, and return how many ran
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = lock::lock(&self.queue).pop_front();
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    pub fn len(&self) -> usize {
        lock::lock(&self.queue).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Dispatcher for QueueDispatcher {
    fn post(&self, task: Task) {
        lock::lock(&self.queue).push_back(task);
    }
}

impl fmt::Debug for QueueDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueDispatcher")
            .field("pending", &self.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Controller
// ─────────────────────────────────────────────────────────────────────────────

/// Kind of OS notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PreferenceChange {
    /// Any user preference, including app mode and accent color
    General,
    /// The high contrast setting
    HighContrast,
}

/// Notifications a sync mode listens to
pub fn interests_for(mode: ThemeSyncMode) -> Vec<PreferenceChange> {
    let mut interests = Vec::new();
    if mode.intersects(ThemeSyncMode::SYNC_WITH_APP_MODE | ThemeSyncMode::SYNC_WITH_ACCENT) {
        interests.push(PreferenceChange::General);
    }
    if mode.contains(ThemeSyncMode::SYNC_WITH_HIGH_CONTRAST) {
        interests.push(PreferenceChange::HighContrast);
    }
    interests
}

struct SyncShared {
    registry: Arc<ThemeRegistry>,
    preferences: Arc<dyn SystemPreferences>,
    dispatcher: Arc<dyn Dispatcher>,
    scope: Arc<Mutex<ResourceScope>>,
    settings: RwLock<ThemeSyncSettings>,
    interests: RwLock<Vec<PreferenceChange>>,
    pending: AtomicBool,
}

impl SyncShared {
    fn sync_now(&self) -> Result<Option<Arc<Theme>>> {
        let settings = lock::read(&self.settings).clone();
        let mode = settings.mode;
        if mode.is_empty() {
            return Ok(None);
        }

        let mut scope = lock::lock(&self.scope);
        let current = self.registry.detect_theme(&scope)?;

        let from_theme_base = current.as_ref().map(|t| t.base_color_scheme().to_string());
        let base_color_scheme = if mode.contains(ThemeSyncMode::SYNC_WITH_APP_MODE) {
            self.preferences.base_color_scheme().or(from_theme_base)
        } else {
            from_theme_base
        }
        .unwrap_or(settings.default_base_color_scheme);

        let from_theme_accent = current.as_ref().map(|t| t.primary_accent_color());
        let accent_color = if mode.contains(ThemeSyncMode::SYNC_WITH_ACCENT) {
            self.preferences.accent_color().or(from_theme_accent)
        } else {
            from_theme_accent.or_else(|| self.preferences.accent_color())
        }
        .or(settings.fallback_accent_color);
        let Some(accent_color) = accent_color else {
            tracing::debug!("theme sync: no accent color available");
            return Ok(None);
        };

        let high_contrast = mode.contains(ThemeSyncMode::SYNC_WITH_HIGH_CONTRAST)
            && self.preferences.is_high_contrast();

        let target = match self
            .registry
            .get_theme_by_accent(&base_color_scheme, accent_color, high_contrast)?
        {
            Some(theme) => theme,
            None => {
                match self
                    .registry
                    .generate_runtime_theme(&base_color_scheme, accent_color, high_contrast)
                {
                    Some(theme) => theme,
                    None => return Ok(None),
                }
            }
        };

        if current.as_ref() == Some(&target) {
            tracing::trace!("theme sync: {} is already applied", target.name());
            return Ok(None);
        }

        tracing::debug!("theme sync: applying {}", target.name());
        self.registry.change_theme(&mut scope, &target).map(Some)
    }
}

/// Keeps a scope's theme in line with the OS settings
#[derive(Clone)]
pub struct ThemeSync {
    shared: Arc<SyncShared>,
}

impl ThemeSync {
    pub fn new(
        registry: Arc<ThemeRegistry>,
        preferences: Arc<dyn SystemPreferences>,
        dispatcher: Arc<dyn Dispatcher>,
        scope: Arc<Mutex<ResourceScope>>,
        settings: ThemeSyncSettings,
    ) -> Self {
        let interests = interests_for(settings.mode);
        Self {
            shared: Arc::new(SyncShared {
                registry,
                preferences,
                dispatcher,
                scope,
                settings: RwLock::new(settings),
                interests: RwLock::new(interests),
                pending: AtomicBool::new(false),
            }),
        }
    }

    pub fn settings(&self) -> ThemeSyncSettings {
        lock::read(&self.shared.settings).clone()
    }

    pub fn mode(&self) -> ThemeSyncMode {
        lock::read(&self.shared.settings).mode
    }

    /// Change the mode and the notifications it listens to
    pub fn set_mode(&self, mode: ThemeSyncMode) {
        lock::write(&self.shared.settings).mode = mode;
        *lock::write(&self.shared.interests) = interests_for(mode);
        tracing::debug!("theme sync mode set to {mode}");
    }

    pub fn set_settings(&self, settings: ThemeSyncSettings) {
        let mode = settings.mode;
        *lock::write(&self.shared.settings) = settings;
        *lock::write(&self.shared.interests) = interests_for(mode);
    }

    pub fn interests(&self) -> Vec<PreferenceChange> {
        lock::read(&self.shared.interests).clone()
    }

    /// True while a scheduled sync has not run yet
    pub fn is_pending(&self) -> bool {
        self.shared.pending.load(Ordering::Acquire)
    }

    /// Handle an OS notification
    ///
    /// Returns true if a sync was scheduled; false if the mode ignores this
    /// notification or a sync is already pending.
    pub fn notify(&self, change: PreferenceChange) -> bool {
        if !lock::read(&self.shared.interests).contains(&change) {
            tracing::trace!("theme sync ignores {change:?}");
            return false;
        }
        if self.shared.pending.swap(true, Ordering::AcqRel) {
            tracing::trace!("theme sync already pending; dropping {change:?}");
            return false;
        }

        let shared = self.shared.clone();
        self.shared.dispatcher.post(Box::new(move || {
            shared.pending.store(false, Ordering::Release);
            if let Err(err) = shared.sync_now() {
                tracing::error!("theme sync failed: {err}");
            }
        }));
        true
    }

    /// Apply the theme matching the OS settings now
    ///
    /// Returns the theme that was applied, or `None` if nothing changed.
    pub fn sync_now(&self) -> Result<Option<Arc<Theme>>> {
        self.shared.sync_now()
    }
}

impl fmt::Debug for ThemeSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeSync")
            .field("mode", &self.mode())
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mode_names() {
        assert_eq!("SyncAll".parse(), Ok(ThemeSyncMode::SYNC_ALL));
        assert_eq!("DoNotSync".parse(), Ok(ThemeSyncMode::DO_NOT_SYNC));
        assert_eq!(
            "SyncWithAppMode | syncwithaccent".parse(),
            Ok(ThemeSyncMode::SYNC_WITH_APP_MODE | ThemeSyncMode::SYNC_WITH_ACCENT)
        );
        assert_eq!(
            "SyncWithHighContrast,SyncWithAppMode".parse(),
            Ok(ThemeSyncMode::SYNC_WITH_HIGH_CONTRAST | ThemeSyncMode::SYNC_WITH_APP_MODE)
        );
        assert_eq!(
            "SyncWithEverything".parse::<ThemeSyncMode>(),
            Err(ThemeSyncModeParseError("SyncWithEverything".into()))
        );
    }

    #[test]
    fn displays_mode_names() {
        assert_eq!(ThemeSyncMode::DO_NOT_SYNC.to_string(), "DoNotSync");
        assert_eq!(ThemeSyncMode::SYNC_ALL.to_string(), "SyncAll");
        assert_eq!(
            (ThemeSyncMode::SYNC_WITH_APP_MODE | ThemeSyncMode::SYNC_WITH_HIGH_CONTRAST).to_string(),
            "SyncWithAppMode | SyncWithHighContrast"
        );
    }

    #[test]
    fn interests_follow_mode() {
        assert!(interests_for(ThemeSyncMode::DO_NOT_SYNC).is_empty());
        assert_eq!(
            interests_for(ThemeSyncMode::SYNC_WITH_ACCENT),
            vec![PreferenceChange::General]
        );
        assert_eq!(
            interests_for(ThemeSyncMode::SYNC_WITH_HIGH_CONTRAST),
            vec![PreferenceChange::HighContrast]
        );
        assert_eq!(
            interests_for(ThemeSyncMode::SYNC_ALL),
            vec![PreferenceChange::General, PreferenceChange::HighContrast]
        );
    }

    #[test]
    fn settings_from_toml() {
        let settings: ThemeSyncSettings = toml::from_str(
            r##"
            mode = "SyncWithAppMode | SyncWithAccent"
            fallback_accent_color = "#FF179299"
            "##,
        )
        .unwrap();

        assert_eq!(
            settings.mode,
            ThemeSyncMode::SYNC_WITH_APP_MODE | ThemeSyncMode::SYNC_WITH_ACCENT
        );
        assert_eq!(settings.default_base_color_scheme, "Light");
        assert_eq!(
            settings.fallback_accent_color.map(|c| c.to_argb()),
            Some(0xFF179299)
        );
    }

    #[test]
    fn queue_dispatcher_runs_nested_posts() {
        let queue = Arc::new(QueueDispatcher::new());
        let counter = Arc::new(std::sync::atomic::AtomicUsize::new(0));

        let inner_queue = queue.clone();
        let inner_counter = counter.clone();
        queue.post(Box::new(move || {
            inner_counter.fetch_add(1, Ordering::SeqCst);
            let counter = inner_counter.clone();
            inner_queue.post(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }));

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.run_pending(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(queue.is_empty());
    }
}

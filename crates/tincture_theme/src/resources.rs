//! Resource dictionaries and scopes
//!
//! This is the minimal resource model themes are applied to:
//!
//! - [`ResourceDictionary`]: an ordered key/value store with nested merged
//!   dictionaries. Dictionaries are shared behind `Arc` and never change once
//!   shared.
//! - [`ResourceScope`]: the mutable target of a theme change (a window, the
//!   whole application). It owns a list of merged dictionaries plus a side
//!   table recording which [`Theme`] each top-level dictionary was applied for.
//!
//! Dictionaries built by a theme or library theme carry a [`ResourceTag`]
//! pointing back at their owner, which is how detection recognizes them
//! without inspecting values.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tincture_core::Color;

use crate::error::{Result, ThemeError};
use crate::library_theme::LibraryTheme;
use crate::theme::Theme;

static NEXT_DICTIONARY_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a dictionary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DictionaryId(u64);

impl DictionaryId {
    fn next() -> Self {
        Self(NEXT_DICTIONARY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Unique identifier for a scope
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

// ─────────────────────────────────────────────────────────────────────────────
// Values
// ─────────────────────────────────────────────────────────────────────────────

/// A single resource value
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceValue {
    Color(Color),
    Text(String),
    Bool(bool),
    Number(f64),
}

impl ResourceValue {
    pub fn as_color(&self) -> Option<Color> {
        match self {
            ResourceValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResourceValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ResourceValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResourceValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Convert a TOML value. Strings starting with `#` that parse as colors
    /// become [`ResourceValue::Color`]; arrays, tables and datetimes are not
    /// resource values.
    fn from_toml(value: toml::Value) -> Option<Self> {
        match value {
            toml::Value::String(s) => {
                if s.starts_with('#') {
                    if let Ok(color) = s.parse::<Color>() {
                        return Some(ResourceValue::Color(color));
                    }
                }
                Some(ResourceValue::Text(s))
            }
            toml::Value::Boolean(b) => Some(ResourceValue::Bool(b)),
            toml::Value::Integer(i) => Some(ResourceValue::Number(i as f64)),
            toml::Value::Float(f) => Some(ResourceValue::Number(f)),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceValue::Color(c) => write!(f, "{c}"),
            ResourceValue::Text(s) => f.write_str(s),
            ResourceValue::Bool(b) => write!(f, "{b}"),
            ResourceValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<Color> for ResourceValue {
    fn from(c: Color) -> Self {
        ResourceValue::Color(c)
    }
}

impl From<&str> for ResourceValue {
    fn from(s: &str) -> Self {
        ResourceValue::Text(s.to_string())
    }
}

impl From<String> for ResourceValue {
    fn from(s: String) -> Self {
        ResourceValue::Text(s)
    }
}

impl From<bool> for ResourceValue {
    fn from(b: bool) -> Self {
        ResourceValue::Bool(b)
    }
}

impl From<f64> for ResourceValue {
    fn from(n: f64) -> Self {
        ResourceValue::Number(n)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dictionaries
// ─────────────────────────────────────────────────────────────────────────────

/// Back-reference from a dictionary to the theme object that built it
#[derive(Clone)]
pub enum ResourceTag {
    Theme(Weak<Theme>),
    LibraryTheme(Weak<LibraryTheme>),
}

impl fmt::Debug for ResourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceTag::Theme(w) => match w.upgrade() {
                Some(t) => write!(f, "Theme({})", t.name()),
                None => f.write_str("Theme(<dropped>)"),
            },
            ResourceTag::LibraryTheme(w) => match w.upgrade() {
                Some(t) => write!(f, "LibraryTheme({})", t.name()),
                None => f.write_str("LibraryTheme(<dropped>)"),
            },
        }
    }
}

/// Ordered key/value resource store with nested merged dictionaries
#[derive(Debug)]
pub struct ResourceDictionary {
    id: DictionaryId,
    source: Option<String>,
    entries: IndexMap<String, ResourceValue>,
    merged: Vec<Arc<ResourceDictionary>>,
    tag: Option<ResourceTag>,
}

impl ResourceDictionary {
    pub fn new() -> Self {
        Self {
            id: DictionaryId::next(),
            source: None,
            entries: IndexMap::new(),
            merged: Vec::new(),
            tag: None,
        }
    }

    /// Parse a flat TOML table into a dictionary
    ///
    /// `source` is the logical resource name, kept for diagnostics.
    pub fn from_toml_str(source: &str, text: &str) -> Result<Self> {
        let table: toml::Table = text.parse().map_err(|e| ThemeError::BundleParse {
            resource: source.to_string(),
            source: e,
        })?;

        let mut dict = Self::new().with_source(source);
        for (key, value) in table {
            match ResourceValue::from_toml(value) {
                Some(v) => {
                    dict.entries.insert(key, v);
                }
                None => tracing::trace!("{source}: skipping non-scalar resource `{key}`"),
            }
        }
        Ok(dict)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<ResourceValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn id(&self) -> DictionaryId {
        self.id
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ResourceValue>,
    ) -> Option<ResourceValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Append a merged dictionary; later dictionaries win on lookup
    pub fn merge(&mut self, dictionary: Arc<ResourceDictionary>) {
        self.merged.push(dictionary);
    }

    pub fn merged(&self) -> &[Arc<ResourceDictionary>] {
        &self.merged
    }

    /// Look up a key in this dictionary, then in merged dictionaries
    /// (last merged first)
    pub fn get(&self, key: &str) -> Option<&ResourceValue> {
        self.entries
            .get(key)
            .or_else(|| self.merged.iter().rev().find_map(|d| d.get(key)))
    }

    /// Look up a key in this dictionary only
    pub fn get_own(&self, key: &str) -> Option<&ResourceValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ResourceValue::as_text)
    }

    pub fn color(&self, key: &str) -> Option<Color> {
        self.get(key).and_then(ResourceValue::as_color)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ResourceValue::as_bool)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &ResourceValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of own entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the dictionary has no entries and no merged dictionaries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.merged.is_empty()
    }

    pub fn tag(&self) -> Option<&ResourceTag> {
        self.tag.as_ref()
    }

    pub(crate) fn set_tag(&mut self, tag: ResourceTag) {
        self.tag = Some(tag);
    }
}

impl Default for ResourceDictionary {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scopes
// ─────────────────────────────────────────────────────────────────────────────

/// A change made to a [`ResourceScope`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeMutation {
    BeginUpdate,
    Added(DictionaryId),
    Removed(DictionaryId),
    EndUpdate,
}

/// Listener invoked after every scope mutation with the resulting number of
/// top-level dictionaries
pub type MutationListener = Box<dyn FnMut(ScopeMutation, usize) + Send>;

/// The target of theme application
pub struct ResourceScope {
    id: ScopeId,
    name: String,
    merged: Vec<Arc<ResourceDictionary>>,
    applied: FxHashMap<DictionaryId, Arc<Theme>>,
    update_depth: u32,
    listener: Option<MutationListener>,
}

impl ResourceScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ScopeId(NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            merged: Vec::new(),
            applied: FxHashMap::default(),
            update_depth: 0,
            listener: None,
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level dictionaries in merge order
    pub fn merged_dictionaries(&self) -> &[Arc<ResourceDictionary>] {
        &self.merged
    }

    pub fn len(&self) -> usize {
        self.merged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// Resolve a key against the scope; the most recently merged dictionary wins
    pub fn get(&self, key: &str) -> Option<&ResourceValue> {
        self.merged.iter().rev().find_map(|d| d.get(key))
    }

    pub fn contains(&self, id: DictionaryId) -> bool {
        self.merged.iter().any(|d| d.id() == id)
    }

    pub fn add(&mut self, dictionary: Arc<ResourceDictionary>) {
        let id = dictionary.id();
        self.merged.push(dictionary);
        self.emit(ScopeMutation::Added(id));
    }

    /// Remove a top-level dictionary by id
    pub fn remove(&mut self, id: DictionaryId) -> Option<Arc<ResourceDictionary>> {
        let index = self.merged.iter().position(|d| d.id() == id)?;
        let removed = self.merged.remove(index);
        self.applied.remove(&id);
        self.emit(ScopeMutation::Removed(id));
        Some(removed)
    }

    /// The theme a top-level dictionary was applied for, if it was applied by
    /// a theme change
    pub fn applied_theme(&self, id: DictionaryId) -> Option<&Arc<Theme>> {
        self.applied.get(&id)
    }

    pub(crate) fn add_for_theme(&mut self, dictionary: Arc<ResourceDictionary>, theme: Arc<Theme>) {
        self.applied.insert(dictionary.id(), theme);
        self.add(dictionary);
    }

    pub fn begin_update(&mut self) {
        self.update_depth += 1;
        self.emit(ScopeMutation::BeginUpdate);
    }

    pub fn end_update(&mut self) {
        if self.update_depth == 0 {
            tracing::warn!("ResourceScope::end_update on `{}` without begin_update", self.name);
            return;
        }
        self.update_depth -= 1;
        self.emit(ScopeMutation::EndUpdate);
    }

    pub fn is_updating(&self) -> bool {
        self.update_depth > 0
    }

    /// Begin a batched update that ends when the returned guard drops
    pub fn batch(&mut self) -> ScopeBatch<'_> {
        self.begin_update();
        ScopeBatch { scope: self }
    }

    pub fn set_mutation_listener<F>(&mut self, listener: F)
    where
        F: FnMut(ScopeMutation, usize) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_mutation_listener(&mut self) {
        self.listener = None;
    }

    fn emit(&mut self, mutation: ScopeMutation) {
        let count = self.merged.len();
        if let Some(listener) = self.listener.as_mut() {
            listener(mutation, count);
        }
    }
}

impl fmt::Debug for ResourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceScope")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("merged", &self.merged.len())
            .field("update_depth", &self.update_depth)
            .finish()
    }
}

/// Guard for a batched scope update; ends the update on drop
pub struct ScopeBatch<'a> {
    scope: &'a mut ResourceScope,
}

impl Deref for ScopeBatch<'_> {
    type Target = ResourceScope;

    fn deref(&self) -> &ResourceScope {
        self.scope
    }
}

impl DerefMut for ScopeBatch<'_> {
    fn deref_mut(&mut self) -> &mut ResourceScope {
        self.scope
    }
}

impl Drop for ScopeBatch<'_> {
    fn drop(&mut self) {
        self.scope.end_update();
    }
}

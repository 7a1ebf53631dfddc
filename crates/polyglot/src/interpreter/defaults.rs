//! Literal fallback strings used when resolution fails.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
#[cfg(feature = "global-defaults")]
use std::sync::{Arc, LazyLock};

/// Registry of default messages, keyed by message id.
///
/// A default message is returned verbatim, without interpolation, when a
/// message cannot be resolved in any candidate language. Defaults are not
/// scoped to a language.
///
/// # Example
///
/// ```
/// use polyglot::DefaultMessages;
///
/// let defaults = DefaultMessages::new();
/// defaults.set("greeting", "Hello");
/// assert_eq!(defaults.get("greeting").as_deref(), Some("Hello"));
/// assert_eq!(defaults.get("farewell"), None);
/// ```
#[derive(Debug, Default)]
pub struct DefaultMessages {
    messages: RwLock<HashMap<String, String>>,
}

impl DefaultMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default message for an id, replacing any earlier one.
    pub fn set(&self, id: impl Into<String>, text: impl Into<String>) {
        let mut messages = self.messages.write().unwrap_or_else(PoisonError::into_inner);
        messages.insert(id.into(), text.into());
    }

    pub fn get(&self, id: &str) -> Option<String> {
        let messages = self.messages.read().unwrap_or_else(PoisonError::into_inner);
        messages.get(id).cloned()
    }

    /// Remove the default message for an id, returning it.
    pub fn remove(&self, id: &str) -> Option<String> {
        let mut messages = self.messages.write().unwrap_or_else(PoisonError::into_inner);
        messages.remove(id)
    }

    pub fn len(&self) -> usize {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set several default messages under one lock.
    pub fn extend<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut messages = self.messages.write().unwrap_or_else(PoisonError::into_inner);
        messages.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

#[cfg(feature = "global-defaults")]
static GLOBAL_DEFAULTS: LazyLock<Arc<DefaultMessages>> =
    LazyLock::new(|| Arc::new(DefaultMessages::new()));

/// The process-wide default message registry.
///
/// Every [`I18n`](crate::I18n) built without explicit defaults shares this
/// registry when the `global-defaults` feature is enabled.
#[cfg(feature = "global-defaults")]
pub fn global_defaults() -> Arc<DefaultMessages> {
    Arc::clone(&GLOBAL_DEFAULTS)
}

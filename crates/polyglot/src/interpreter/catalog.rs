//! Message catalog for storing and looking up messages per language.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use icu_locale_core::LanguageIdentifier;
use tracing::debug;

use crate::interpreter::error::{LoadError, LoadWarning};
use crate::interpreter::plural::plural_forms;
use crate::parser::{UnmarshalFn, builtin_formats, file_format, file_language, parse_messages};
use crate::types::Message;

type Messages = HashMap<String, Arc<Message>>;

/// Parse a language tag, reporting failures as [`LoadError::InvalidLanguageTag`].
pub fn parse_language(tag: &str) -> Result<LanguageIdentifier, LoadError> {
    LanguageIdentifier::try_from_str(tag).map_err(|source| LoadError::InvalidLanguageTag {
        tag: tag.to_string(),
        source,
    })
}

/// Messages registered per language, shared between localizers.
///
/// The catalog is the only state mutated after construction. Registration
/// takes a write lock; lookups take a read lock. Records are stored behind
/// `Arc` and replaced whole, so a lookup racing a registration sees either
/// the old or the new record.
///
/// # Example
///
/// ```
/// use icu_locale_core::langid;
/// use polyglot::{Catalog, Message};
///
/// let catalog = Catalog::new(langid!("en"));
/// catalog
///     .register_str("en", [Message::builder().id("hello").other("Hello!").build()])
///     .unwrap();
///
/// let message = catalog.lookup(&langid!("en"), "hello").unwrap();
/// assert_eq!(message.other, "Hello!");
/// assert!(catalog.lookup(&langid!("fr"), "hello").is_none());
/// ```
pub struct Catalog {
    default_language: LanguageIdentifier,
    /// Per-language message maps.
    languages: RwLock<HashMap<LanguageIdentifier, Messages>>,
    /// Unmarshal functions keyed by file extension.
    formats: RwLock<HashMap<String, UnmarshalFn>>,
}

impl Catalog {
    /// Create an empty catalog with the built-in file formats registered.
    pub fn new(default_language: LanguageIdentifier) -> Self {
        let formats = builtin_formats()
            .into_iter()
            .map(|(format, unmarshal)| (format.to_string(), unmarshal))
            .collect();
        Self {
            default_language,
            languages: RwLock::new(HashMap::new()),
            formats: RwLock::new(formats),
        }
    }

    /// The language used when no preferred language has a message.
    pub fn default_language(&self) -> &LanguageIdentifier {
        &self.default_language
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register messages for a language.
    ///
    /// Every record is validated before any is stored, so a failure leaves the
    /// catalog unchanged. A record with an id already registered for the
    /// language replaces the earlier one. Returns the number of records.
    pub fn register(
        &self,
        language: &LanguageIdentifier,
        messages: impl IntoIterator<Item = Message>,
    ) -> Result<usize, LoadError> {
        let messages: Vec<Message> = messages.into_iter().collect();
        for message in &messages {
            message.validate()?;
        }

        let count = messages.len();
        if count == 0 {
            return Ok(0);
        }
        let mut languages = self.languages.write().unwrap_or_else(PoisonError::into_inner);
        let registered = languages.entry(language.clone()).or_default();
        for message in messages {
            registered.insert(message.id.clone(), Arc::new(message));
        }
        debug!(language = %language, count, "registered messages");
        Ok(count)
    }

    /// Register messages for a language given as a string tag.
    pub fn register_str(
        &self,
        language: &str,
        messages: impl IntoIterator<Item = Message>,
    ) -> Result<usize, LoadError> {
        let language = parse_language(language)?;
        self.register(&language, messages)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Look up a message by exact language and id.
    pub fn lookup(&self, language: &LanguageIdentifier, id: &str) -> Option<Arc<Message>> {
        let languages = self.languages.read().unwrap_or_else(PoisonError::into_inner);
        languages.get(language)?.get(id).cloned()
    }

    /// Languages with at least one message, sorted by tag.
    pub fn registered_tags(&self) -> Vec<LanguageIdentifier> {
        let languages = self.languages.read().unwrap_or_else(PoisonError::into_inner);
        let mut tags: Vec<LanguageIdentifier> = languages
            .iter()
            .filter(|(_, messages)| !messages.is_empty())
            .map(|(tag, _)| tag.clone())
            .collect();
        tags.sort_by_cached_key(ToString::to_string);
        tags
    }

    /// Ids registered for a language, sorted.
    pub fn message_ids(&self, language: &LanguageIdentifier) -> Vec<String> {
        let languages = self.languages.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<String> = languages
            .get(language)
            .map(|messages| messages.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Number of messages registered for a language.
    pub fn len(&self, language: &LanguageIdentifier) -> usize {
        let languages = self.languages.read().unwrap_or_else(PoisonError::into_inner);
        languages.get(language).map_or(0, HashMap::len)
    }

    // =========================================================================
    // Message Files
    // =========================================================================

    /// Register an unmarshal function for a file extension.
    ///
    /// Replaces any function registered for the same extension.
    pub fn register_unmarshal_fn(&self, format: &str, unmarshal: UnmarshalFn) {
        let mut formats = self.formats.write().unwrap_or_else(PoisonError::into_inner);
        formats.insert(format.to_ascii_lowercase(), unmarshal);
    }

    /// The unmarshal function for a file extension, if registered.
    pub fn unmarshal_fn(&self, format: &str) -> Option<UnmarshalFn> {
        let formats = self.formats.read().unwrap_or_else(PoisonError::into_inner);
        formats.get(&format.to_ascii_lowercase()).cloned()
    }

    /// Load a message file from disk.
    ///
    /// The language and format come from the file name (`active.en.json`).
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.load_file_bytes(path, &content)
    }

    /// Load message file content that was read elsewhere.
    ///
    /// `path` is only used for its name. This is the entry point for embedded
    /// files, such as content from `include_bytes!`.
    pub fn load_file_bytes(
        &self,
        path: impl AsRef<Path>,
        content: &[u8],
    ) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let language = file_language(path).ok_or_else(|| LoadError::MissingLanguage {
            path: path.to_path_buf(),
        })?;
        let format = file_format(path).unwrap_or_default();
        let unmarshal = self
            .unmarshal_fn(&format)
            .ok_or_else(|| LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: format.clone(),
            })?;

        let messages = unmarshal(content)
            .and_then(parse_messages)
            .map_err(|e| LoadError::parse(path.to_path_buf(), e))?;
        debug!(path = %path.display(), language = %language, "loaded message file");
        self.register(&language, messages)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate a target language against a source language.
    ///
    /// Checks for:
    /// - Messages in the target language that do not exist in the source
    /// - Pluralized target messages missing a form the target language uses
    ///
    /// Returns an empty vector if the target language has no messages.
    pub fn validate(
        &self,
        source_language: &LanguageIdentifier,
        target_language: &LanguageIdentifier,
    ) -> Vec<LoadWarning> {
        let languages = self.languages.read().unwrap_or_else(PoisonError::into_inner);
        let Some(target) = languages.get(target_language) else {
            return Vec::new();
        };
        let source = languages.get(source_language);
        let required = plural_forms(target_language);
        let language = target_language.to_string();

        let mut ids: Vec<&String> = target.keys().collect();
        ids.sort();

        let mut warnings = Vec::new();
        for id in ids {
            if !source.is_some_and(|source| source.contains_key(id)) {
                warnings.push(LoadWarning::UnknownMessage {
                    id: id.clone(),
                    language: language.clone(),
                });
            }
            let Some(message) = target.get(id) else {
                continue;
            };
            if !message.is_pluralized() {
                continue;
            }
            for form in &required {
                if message.template(*form).is_empty() {
                    warnings.push(LoadWarning::MissingPluralForm {
                        id: id.clone(),
                        language: language.clone(),
                        form: *form,
                    });
                }
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use icu_locale_core::langid;

    use super::*;

    #[test]
    fn registration_is_all_or_nothing() {
        let catalog = Catalog::new(langid!("en"));
        let result = catalog.register(
            &langid!("en"),
            [
                Message::builder().id("ok").other("fine").build(),
                Message::builder().id("broken").build(),
            ],
        );
        assert!(matches!(result, Err(LoadError::InvalidMessage { .. })));
        assert!(catalog.lookup(&langid!("en"), "ok").is_none());
        assert!(catalog.registered_tags().is_empty());
    }

    #[test]
    fn registered_tags_are_sorted() {
        let catalog = Catalog::new(langid!("en"));
        for tag in ["zh", "en-US", "de", "en"] {
            catalog
                .register_str(tag, [Message::builder().id("x").other(tag).build()])
                .unwrap();
        }
        let tags: Vec<String> = catalog
            .registered_tags()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(tags, ["de", "en", "en-US", "zh"]);
    }

    #[test]
    fn empty_batch_leaves_no_language_entry() {
        let catalog = Catalog::new(langid!("en"));
        assert_eq!(catalog.register_str("ja", Vec::new()).unwrap(), 0);
        assert!(!catalog.languages.read().unwrap().contains_key(&langid!("ja")));
        assert!(catalog.registered_tags().is_empty());
        assert!(catalog.message_ids(&langid!("ja")).is_empty());
    }

    #[test]
    fn registered_tags_skip_languages_without_messages() {
        let catalog = Catalog::new(langid!("en"));
        catalog
            .register_str("fr", [Message::builder().id("x").other("X").build()])
            .unwrap();
        catalog.register_str("de", Vec::new()).unwrap();
        assert_eq!(catalog.registered_tags(), vec![langid!("fr")]);
    }

    #[test]
    fn unmarshal_functions_are_case_insensitive() {
        let catalog = Catalog::new(langid!("en"));
        assert!(catalog.unmarshal_fn("JSON").is_some());
        assert!(catalog.unmarshal_fn("ini").is_none());
    }
}

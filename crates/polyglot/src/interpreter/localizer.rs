//! Message resolution against an ordered list of preferred languages.

use std::sync::Arc;

use icu_locale_core::LanguageIdentifier;
use icu_locale_core::subtags::Variants;
use tracing::{debug, warn};

use crate::interpreter::catalog::Catalog;
use crate::interpreter::defaults::DefaultMessages;
use crate::interpreter::error::{EvalError, InterpolationError};
use crate::interpreter::interpolate::render;
use crate::interpreter::plural::plural_form;
use crate::parser::parse_template;
use crate::types::{Message, PluralCount, PluralForm, TemplateData};

/// Resolves messages for one ordered list of candidate languages.
///
/// The candidate list holds each preferred language followed by its less
/// specific forms, then the catalog's default language. A localizer never
/// mutates the catalog and is cheap to clone.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use icu_locale_core::langid;
/// use polyglot::{Catalog, DefaultMessages, Localizer, Message, TemplateData, args};
///
/// let catalog = Arc::new(Catalog::new(langid!("en")));
/// catalog
///     .register_str("en", [Message::builder().id("hi").other("Hi {{0}}{{1}}{{2}}").build()])
///     .unwrap();
///
/// let localizer = Localizer::new(catalog, Arc::new(DefaultMessages::new()), ["fr-CA"]);
/// assert_eq!(localizer.localize("hi", None, &args!["a", "b", "c"]), "Hi abc");
/// assert_eq!(localizer.localize("bye", None, &TemplateData::None), "bye");
/// ```
#[derive(Clone)]
pub struct Localizer {
    catalog: Arc<Catalog>,
    defaults: Arc<DefaultMessages>,
    languages: Vec<LanguageIdentifier>,
}

impl Localizer {
    /// Create a localizer from preferred language tags, most preferred first.
    ///
    /// Tags that fail to parse are skipped with a warning.
    pub fn new<I, S>(catalog: Arc<Catalog>, defaults: Arc<DefaultMessages>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let preferred: Vec<LanguageIdentifier> = tags
            .into_iter()
            .filter_map(|tag| {
                let tag = tag.as_ref();
                LanguageIdentifier::try_from_str(tag)
                    .inspect_err(|e| warn!(tag, error = %e, "skipping invalid language tag"))
                    .ok()
            })
            .collect();
        Self::with_languages(catalog, defaults, preferred)
    }

    /// Create a localizer from already parsed languages.
    pub fn with_languages(
        catalog: Arc<Catalog>,
        defaults: Arc<DefaultMessages>,
        preferred: impl IntoIterator<Item = LanguageIdentifier>,
    ) -> Self {
        let languages = candidate_languages(preferred, catalog.default_language());
        Self {
            catalog,
            defaults,
            languages,
        }
    }

    /// The candidate languages, in lookup order. Never empty.
    pub fn languages(&self) -> &[LanguageIdentifier] {
        &self.languages
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn defaults(&self) -> &Arc<DefaultMessages> {
        &self.defaults
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve a message by id, reporting why resolution failed.
    pub fn resolve(
        &self,
        id: &str,
        count: Option<&PluralCount>,
        data: &TemplateData,
    ) -> Result<String, EvalError> {
        let (language, message) = self.find(id).ok_or_else(|| self.not_found(id))?;
        render_message(&language, &message, count, data)
    }

    /// Resolve a message by id, falling back to its default message or id.
    pub fn localize(&self, id: &str, count: Option<&PluralCount>, data: &TemplateData) -> String {
        self.resolve(id, count, data)
            .unwrap_or_else(|e| self.fallback(id, &e))
    }

    /// Resolve a message, using the supplied record when no candidate
    /// language has one with the same id.
    ///
    /// The supplied record is rendered with the default language's plural
    /// rules.
    pub fn resolve_message(
        &self,
        message: &Message,
        count: Option<&PluralCount>,
        data: &TemplateData,
    ) -> Result<String, EvalError> {
        match self.find(&message.id) {
            Some((language, found)) => render_message(&language, &found, count, data),
            None => render_message(self.catalog.default_language(), message, count, data),
        }
    }

    /// Like [`Localizer::resolve_message`], with the fallback of
    /// [`Localizer::localize`].
    pub fn localize_message(
        &self,
        message: &Message,
        count: Option<&PluralCount>,
        data: &TemplateData,
    ) -> String {
        self.resolve_message(message, count, data)
            .unwrap_or_else(|e| self.fallback(&message.id, &e))
    }

    /// The first candidate language holding `id`, with its record.
    fn find(&self, id: &str) -> Option<(LanguageIdentifier, Arc<Message>)> {
        self.languages.iter().find_map(|language| {
            self.catalog
                .lookup(language, id)
                .map(|message| (language.clone(), message))
        })
    }

    fn not_found(&self, id: &str) -> EvalError {
        EvalError::MessageNotFound {
            id: id.to_string(),
            languages: self.languages.iter().map(ToString::to_string).collect(),
        }
    }

    fn fallback(&self, id: &str, error: &EvalError) -> String {
        match self.defaults.get(id) {
            Some(text) => {
                debug!(id, %error, "using default message");
                text
            }
            None => {
                debug!(id, %error, "using message id");
                id.to_string()
            }
        }
    }
}

/// Render one record for a language.
fn render_message(
    language: &LanguageIdentifier,
    message: &Message,
    count: Option<&PluralCount>,
    data: &TemplateData,
) -> Result<String, EvalError> {
    let form = match count {
        Some(count) => plural_form(language, count)?,
        None => PluralForm::Other,
    };
    let template = match message.template(form) {
        "" => message.template(PluralForm::Other),
        template => template,
    };
    if template.is_empty() {
        return Err(EvalError::EmptyTemplate {
            id: message.id.clone(),
            form,
        });
    }

    let interpolation = |source: InterpolationError| EvalError::Interpolation {
        id: message.id.clone(),
        source,
    };
    let parsed = parse_template(template, message.delimiters())
        .map_err(|e| interpolation(e.into()))?;
    render(&parsed, data).map_err(interpolation)
}

/// Expand preferred languages into the lookup order.
///
/// Each language is followed by its less specific forms
/// (`zh-Hant-TW`, `zh-Hant`, `zh`); the default language comes last.
/// Duplicates keep their first position.
fn candidate_languages(
    preferred: impl IntoIterator<Item = LanguageIdentifier>,
    default_language: &LanguageIdentifier,
) -> Vec<LanguageIdentifier> {
    let mut candidates: Vec<LanguageIdentifier> = Vec::new();
    let mut push = |language: LanguageIdentifier| {
        if !candidates.contains(&language) {
            candidates.push(language);
        }
    };
    for language in preferred {
        let mut current = language;
        push(current.clone());
        if !current.variants.is_empty() {
            current.variants = Variants::new();
            push(current.clone());
        }
        if current.region.take().is_some() {
            push(current.clone());
        }
        if current.script.take().is_some() {
            push(current);
        }
    }
    push(default_language.clone());
    candidates
}

#[cfg(test)]
mod tests {
    use icu_locale_core::langid;

    use super::*;

    fn tags(languages: &[LanguageIdentifier]) -> Vec<String> {
        languages.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn candidates_truncate_then_end_with_default() {
        let candidates = candidate_languages([langid!("zh-Hant-TW")], &langid!("en"));
        assert_eq!(tags(&candidates), ["zh-Hant-TW", "zh-Hant", "zh", "en"]);
    }

    #[test]
    fn candidates_drop_duplicates() {
        let candidates =
            candidate_languages([langid!("en-US"), langid!("en-GB")], &langid!("en"));
        assert_eq!(tags(&candidates), ["en-US", "en", "en-GB"]);
    }

    #[test]
    fn no_preferences_use_default() {
        let candidates = candidate_languages([], &langid!("de"));
        assert_eq!(tags(&candidates), ["de"]);
    }

    #[test]
    fn absent_form_uses_other() {
        let message = Message::builder().id("x").one("one").other("other").build();
        let rendered =
            render_message(&langid!("en"), &message, Some(&5.into()), &TemplateData::None);
        assert_eq!(rendered.unwrap(), "other");
    }

    #[test]
    fn empty_other_with_unselected_form_is_an_error() {
        let message = Message::builder().id("x").one("one").build();
        let err = render_message(&langid!("en"), &message, Some(&2.into()), &TemplateData::None)
            .unwrap_err();
        assert!(matches!(
            err,
            EvalError::EmptyTemplate {
                form: PluralForm::Other,
                ..
            }
        ));
    }
}

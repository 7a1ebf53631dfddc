//! The translation facade.

use std::path::Path;
use std::sync::Arc;

use bon::Builder;
use icu_locale_core::LanguageIdentifier;
#[cfg(feature = "remote")]
use reqwest::blocking::Request;
use serde_json::Value as JsonValue;

#[cfg(feature = "global-defaults")]
use crate::interpreter::global_defaults;
use crate::interpreter::{Catalog, DefaultMessages, LoadError, Localizer, parse_language};
use crate::loader::{Loader, Parser};
#[cfg(feature = "remote")]
use crate::loader::{ClientOption, RemoteLoader};
use crate::parser::ParseError;
use crate::types::{Message, PluralCount, TemplateData};

/// Configuration for [`I18n::with_options`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use polyglot::{DefaultMessages, I18n, I18nOptions};
///
/// let defaults = Arc::new(DefaultMessages::new());
/// let i18n = I18n::with_options(
///     I18nOptions::builder()
///         .default_language("de")
///         .languages(vec!["de-AT".to_string()])
///         .defaults(Arc::clone(&defaults))
///         .build(),
/// )
/// .unwrap();
///
/// defaults.set("missing", "Fehlt");
/// assert_eq!(i18n.t("missing", ()), "Fehlt");
/// ```
#[derive(Debug, Builder)]
pub struct I18nOptions {
    /// Language consulted after every preferred language.
    #[builder(default = "en".to_string(), into)]
    pub default_language: String,

    /// Initial preferred languages, most preferred first.
    #[builder(default)]
    pub languages: Vec<String>,

    /// Default message registry to share. A new registry is created when
    /// absent (or the process-wide one, with the `global-defaults` feature).
    pub defaults: Option<Arc<DefaultMessages>>,
}

/// Translates messages for a list of preferred languages.
///
/// An `I18n` is a handle: clones and the handles returned by
/// [`I18n::locale`] share one catalog and one default message registry.
/// Registering messages through any handle is visible to all of them.
///
/// Translation never fails. A message that cannot be resolved degrades to
/// its default message, then to its id.
///
/// # Example
///
/// ```
/// use polyglot::{I18n, Message, args, data};
///
/// let i18n = I18n::new("en").unwrap();
/// i18n.add_messages("en", [
///     Message::builder().id("hello").other("Hello {{name}}!").build(),
///     Message::builder().id("cards").one("{{count}} card").other("{{count}} cards").build(),
/// ])
/// .unwrap();
///
/// assert_eq!(i18n.t("hello", data! { "name" => "Ada" }), "Hello Ada!");
/// assert_eq!(i18n.p("cards", 1, args!["count", 1]), "1 card");
/// assert_eq!(i18n.p("cards", 3, args!["count", 3]), "3 cards");
/// assert_eq!(i18n.t("unknown", ()), "unknown");
/// ```
#[derive(Clone)]
pub struct I18n {
    localizer: Localizer,
}

impl I18n {
    /// Create a translator with a default language.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidLanguageTag`] if the tag does not parse.
    pub fn new(default_language: &str) -> Result<Self, LoadError> {
        Self::with_options(
            I18nOptions::builder()
                .default_language(default_language)
                .build(),
        )
    }

    /// Create a translator from options.
    pub fn with_options(options: I18nOptions) -> Result<Self, LoadError> {
        let default_language = parse_language(&options.default_language)?;
        let defaults = options.defaults.unwrap_or_else(default_registry);
        let catalog = Arc::new(Catalog::new(default_language));
        let localizer = Localizer::new(catalog, defaults, &options.languages);
        Ok(Self { localizer })
    }

    // =========================================================================
    // Translation
    // =========================================================================

    /// Translate a message.
    pub fn t(&self, id: &str, data: impl Into<TemplateData>) -> String {
        self.localizer.localize(id, None, &data.into())
    }

    /// Translate a message, choosing the plural form for `count`.
    pub fn p(
        &self,
        id: &str,
        count: impl Into<PluralCount>,
        data: impl Into<TemplateData>,
    ) -> String {
        self.localizer.localize(id, Some(&count.into()), &data.into())
    }

    /// Translate a message, using `message` itself if no candidate language
    /// has a translation for its id.
    pub fn m(
        &self,
        message: &Message,
        count: Option<PluralCount>,
        data: impl Into<TemplateData>,
    ) -> String {
        self.localizer.localize_message(message, count.as_ref(), &data.into())
    }

    /// A translator for other preferred languages.
    ///
    /// The returned handle shares this translator's catalog and default
    /// messages. This handle is unchanged.
    pub fn locale<I, S>(&self, tags: I) -> I18n
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let localizer = Localizer::new(
            Arc::clone(self.localizer.catalog()),
            Arc::clone(self.localizer.defaults()),
            tags,
        );
        I18n { localizer }
    }

    /// The candidate languages, in lookup order.
    pub fn languages(&self) -> &[LanguageIdentifier] {
        self.localizer.languages()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register messages for a language tag.
    pub fn add_messages(
        &self,
        tag: &str,
        messages: impl IntoIterator<Item = Message>,
    ) -> Result<usize, LoadError> {
        self.catalog().register_str(tag, messages)
    }

    /// Register messages for a parsed language.
    pub fn add_messages_by_tag(
        &self,
        language: &LanguageIdentifier,
        messages: impl IntoIterator<Item = Message>,
    ) -> Result<usize, LoadError> {
        self.catalog().register(language, messages)
    }

    /// Languages with at least one message, sorted by tag.
    pub fn registered_tags(&self) -> Vec<LanguageIdentifier> {
        self.catalog().registered_tags()
    }

    /// Register a decoder for message files with the extension `format`.
    pub fn register_unmarshal_fn<F>(&self, format: &str, unmarshal: F)
    where
        F: Fn(&[u8]) -> Result<JsonValue, ParseError> + Send + Sync + 'static,
    {
        self.catalog().register_unmarshal_fn(format, Arc::new(unmarshal));
    }

    /// Load and register messages from any source.
    ///
    /// # Example
    ///
    /// ```
    /// use icu_locale_core::langid;
    /// use polyglot::I18n;
    /// use polyglot::loader::{FormatParser, loader_fn};
    ///
    /// let i18n = I18n::new("en").unwrap();
    /// let loader = loader_fn(|| Ok(br#"{"hi": "Hi"}"#.to_vec()));
    /// i18n.load_messages(&loader, &FormatParser::json(langid!("en"))).unwrap();
    /// assert_eq!(i18n.t("hi", ()), "Hi");
    ///
    /// let failing = loader_fn(|| Err("load failed".into()));
    /// let err = i18n.load_messages(&failing, &FormatParser::json(langid!("en"))).unwrap_err();
    /// assert!(err.to_string().contains("load failed"));
    /// ```
    pub fn load_messages(
        &self,
        loader: &impl Loader,
        parser: &impl Parser,
    ) -> Result<usize, LoadError> {
        let content = loader.load().map_err(LoadError::Loader)?;
        let pack = parser.parse(&content).map_err(LoadError::Parser)?;
        self.catalog().register(&pack.language, pack.messages)
    }

    /// Load a message file, taking its language and format from its name.
    pub fn load_message_file(&self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        self.catalog().load_file(path)
    }

    /// Load message file content from an embedded file system.
    pub fn load_message_file_bytes(
        &self,
        path: impl AsRef<Path>,
        content: &[u8],
    ) -> Result<usize, LoadError> {
        self.catalog().load_file_bytes(path, content)
    }

    /// Fetch and register messages with a `GET` of `url`.
    #[cfg(feature = "remote")]
    pub fn load_message_remote(&self, url: &str, parser: &impl Parser) -> Result<usize, LoadError> {
        let loader = RemoteLoader::get(url, Vec::new()).map_err(LoadError::Loader)?;
        self.load_messages(&loader, parser)
    }

    /// Fetch and register messages with a prepared request and client options.
    #[cfg(feature = "remote")]
    pub fn load_message_remote_request(
        &self,
        request: Request,
        parser: &impl Parser,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> Result<usize, LoadError> {
        let loader = RemoteLoader::new(request, options).map_err(LoadError::Loader)?;
        self.load_messages(&loader, parser)
    }

    // =========================================================================
    // Shared State
    // =========================================================================

    /// Set the text returned when `id` cannot be resolved.
    pub fn set_default_message(&self, id: impl Into<String>, text: impl Into<String>) {
        self.default_messages().set(id, text);
    }

    pub fn default_messages(&self) -> &Arc<DefaultMessages> {
        self.localizer.defaults()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.localizer.catalog()
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }
}

#[cfg(feature = "global-defaults")]
fn default_registry() -> Arc<DefaultMessages> {
    global_defaults()
}

#[cfg(not(feature = "global-defaults"))]
fn default_registry() -> Arc<DefaultMessages> {
    Arc::new(DefaultMessages::new())
}

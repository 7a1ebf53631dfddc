//! Runtime message translation.
//!
//! Messages are registered per language in a [`Catalog`] and resolved by id
//! for an ordered list of preferred languages. Resolution picks a CLDR plural
//! form for an optional count, renders the form's template against
//! [`TemplateData`], and falls back to a registered default message, then to
//! the id itself. Translating never fails.
//!
//! ```
//! use polyglot::{I18n, Message, data};
//!
//! let i18n = I18n::new("en").unwrap();
//! i18n.add_messages("en", [Message::builder().id("hi").other("Hi {{name}}").build()])
//!     .unwrap();
//! i18n.add_messages("fr", [Message::builder().id("hi").other("Salut {{name}}").build()])
//!     .unwrap();
//!
//! let fr = i18n.locale(["fr-CA"]);
//! assert_eq!(fr.t("hi", data! { "name" => "Zoé" }), "Salut Zoé");
//! assert_eq!(i18n.t("hi", data! { "name" => "Zoe" }), "Hi Zoe");
//! ```

pub mod interpreter;
pub mod loader;
pub mod parser;
mod translator;
pub mod types;

pub use icu_locale_core::LanguageIdentifier;
#[cfg(feature = "global-defaults")]
pub use interpreter::global_defaults;
pub use interpreter::{
    Catalog, DefaultMessages, EvalError, InterpolationError, LoadError, LoadWarning, Localizer,
    compute_suggestions,
};
pub use parser::ParseError;
pub use translator::{I18n, I18nOptions};
pub use types::{Message, MessagePack, PluralCount, PluralForm, TemplateData, Value};

/// Creates [`TemplateData::Named`] from key-value pairs.
///
/// Values are converted via `Into<Value>`, so integers, floats, strings, and
/// nested values can be mixed.
///
/// # Example
///
/// ```
/// use polyglot::{TemplateData, data};
///
/// let data = data! { "count" => 3, "name" => "Alice" };
/// let TemplateData::Named(map) = data else { unreachable!() };
/// assert_eq!(map["count"].as_number(), Some(3));
/// assert_eq!(map["name"].as_str(), Some("Alice"));
/// ```
#[macro_export]
macro_rules! data {
    {} => {
        $crate::TemplateData::Named(::std::collections::BTreeMap::new())
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::BTreeMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            $crate::TemplateData::Named(map)
        }
    };
}

/// Creates [`TemplateData`] from a flat argument list.
///
/// Applies [`TemplateData::from_args`]: one argument is a single value, an
/// even number are key/value pairs, and an odd number above one are
/// positional.
///
/// # Example
///
/// ```
/// use polyglot::{TemplateData, args};
///
/// assert!(args![].is_none());
/// assert!(matches!(args!["k", 1], TemplateData::Named(_)));
/// assert!(matches!(args![1, 2, 3], TemplateData::Positional(_)));
/// ```
#[macro_export]
macro_rules! args {
    [] => {
        $crate::TemplateData::None
    };
    [ $($value:expr),+ $(,)? ] => {
        $crate::TemplateData::from_args([
            $(::std::convert::Into::<$crate::Value>::into($value)),+
        ])
    };
}

//! Message file decoding.
//!
//! A message file is unmarshaled into a JSON value tree by a format-specific
//! function, then read into [`Message`] records. The document is either a list
//! of message objects or a map where:
//! - a string value is a message whose `other` form is the string,
//! - a map holding any reserved message key is a message (its id defaults to
//!   the map key),
//! - any other map is a group whose key prefixes its children (`group.child`).
//!
//! The language of a file comes from its name: `active.en-US.json` holds
//! `en-US` messages in the `json` format.

use std::path::Path;
use std::str;
use std::sync::Arc;

use icu_locale_core::LanguageIdentifier;
use serde_json::{Map, Value as JsonValue};

use super::error::ParseError;
use crate::types::Message;

/// Decodes raw file content into a value tree.
pub type UnmarshalFn = Arc<dyn Fn(&[u8]) -> Result<JsonValue, ParseError> + Send + Sync>;

/// Keys that mark a map as a message rather than a group.
const RESERVED_KEYS: &[&str] = &[
    "id",
    "description",
    "hash",
    "leftDelim",
    "rightDelim",
    "zero",
    "one",
    "two",
    "few",
    "many",
    "other",
    "translation",
];

/// Unmarshal functions compiled into this build, keyed by file extension.
pub fn builtin_formats() -> Vec<(&'static str, UnmarshalFn)> {
    let json: UnmarshalFn = Arc::new(unmarshal_json);
    let mut formats = vec![("json", json)];
    #[cfg(feature = "toml")]
    {
        let toml: UnmarshalFn = Arc::new(unmarshal_toml);
        formats.push(("toml", toml));
    }
    #[cfg(feature = "yaml")]
    {
        let yaml: UnmarshalFn = Arc::new(unmarshal_yaml);
        formats.push(("yaml", Arc::clone(&yaml)));
        formats.push(("yml", yaml));
    }
    formats
}

pub fn unmarshal_json(content: &[u8]) -> Result<JsonValue, ParseError> {
    serde_json::from_slice(content).map_err(|e| ParseError::Syntax {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })
}

#[cfg(feature = "toml")]
pub fn unmarshal_toml(content: &[u8]) -> Result<JsonValue, ParseError> {
    let text = str::from_utf8(content).map_err(|_| ParseError::InvalidUtf8)?;
    toml::from_str(text).map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| line_column(text, span.start))
            .unwrap_or((0, 0));
        ParseError::Syntax {
            line,
            column,
            message: e.message().to_string(),
        }
    })
}

#[cfg(feature = "yaml")]
pub fn unmarshal_yaml(content: &[u8]) -> Result<JsonValue, ParseError> {
    serde_yaml::from_slice(content).map_err(|e| {
        let (line, column) = e
            .location()
            .map(|location| (location.line(), location.column()))
            .unwrap_or((0, 0));
        ParseError::Syntax {
            line,
            column,
            message: e.to_string(),
        }
    })
}

/// Convert a byte offset into a 1-based line and column.
#[cfg(feature = "toml")]
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset.min(text.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(before.len() + 1, |pos| before.len() - pos);
    (line, column)
}

/// Read messages out of an unmarshaled document.
///
/// # Example
///
/// ```
/// use polyglot::parser::parse_messages;
///
/// let doc = serde_json::json!({
///     "hello": "Hello!",
///     "menu": { "open": "Open", "close": { "other": "Close" } },
/// });
/// let messages = parse_messages(doc).unwrap();
/// let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
/// assert_eq!(ids, ["hello", "menu.close", "menu.open"]);
/// ```
pub fn parse_messages(document: JsonValue) -> Result<Vec<Message>, ParseError> {
    let mut messages = Vec::new();
    match document {
        JsonValue::Array(items) => {
            for item in items {
                messages.push(message_from_value(None, item)?);
            }
        }
        JsonValue::Object(map) => collect_group("", map, &mut messages)?,
        other => {
            return Err(ParseError::InvalidStructure {
                message: format!("expected a map or list of messages, found {}", kind(&other)),
            });
        }
    }
    Ok(messages)
}

fn collect_group(
    prefix: &str,
    map: Map<String, JsonValue>,
    messages: &mut Vec<Message>,
) -> Result<(), ParseError> {
    for (key, value) in map {
        let id = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            JsonValue::String(other) => {
                messages.push(Message::builder().id(id).other(other).build());
            }
            JsonValue::Object(inner) if is_message(&inner) => {
                messages.push(message_from_value(Some(id), JsonValue::Object(inner))?);
            }
            JsonValue::Object(inner) => collect_group(&id, inner, messages)?,
            other => {
                return Err(ParseError::InvalidStructure {
                    message: format!("'{id}': expected a string or a map, found {}", kind(&other)),
                });
            }
        }
    }
    Ok(())
}

fn is_message(map: &Map<String, JsonValue>) -> bool {
    RESERVED_KEYS
        .iter()
        .any(|key| map.get(*key).is_some_and(JsonValue::is_string))
}

fn message_from_value(default_id: Option<String>, value: JsonValue) -> Result<Message, ParseError> {
    let mut message: Message =
        serde_json::from_value(value).map_err(|e| ParseError::InvalidStructure {
            message: match &default_id {
                Some(id) => format!("'{id}': {e}"),
                None => e.to_string(),
            },
        })?;
    if message.id.is_empty()
        && let Some(id) = default_id
    {
        message.id = id;
    }
    Ok(message)
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "a map",
    }
}

/// The lowercase extension of a message file, used to pick its format.
pub fn file_format(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// The language tag named in a message file's name.
///
/// The dot-separated parts of the file stem are searched from the end, so
/// `menu.fr-CA.json` and `fr-CA.json` both yield `fr-CA`. Only two and three
/// letter language subtags count, so words like `messages` are skipped.
pub fn file_language(path: &Path) -> Option<LanguageIdentifier> {
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit('.')
        .filter_map(|part| LanguageIdentifier::try_from_str(part).ok())
        .find(|language| language.language.as_str().len() <= 3)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn language_and_format_come_from_file_name() {
        let path = PathBuf::from("locales/active.en-US.JSON");
        assert_eq!(file_format(&path).as_deref(), Some("json"));
        assert_eq!(
            file_language(&path).map(|l| l.to_string()).as_deref(),
            Some("en-US")
        );
        assert_eq!(file_language(&PathBuf::from("messages.json")), None);
    }

    #[test]
    fn list_documents_hold_full_records() {
        let doc = serde_json::json!([
            {"id": "a", "one": "one a", "other": "many a"},
            {"id": "b", "translation": "b"},
        ]);
        let messages = parse_messages(doc).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].one, "one a");
        assert_eq!(messages[1].other, "b");
    }

    #[test]
    fn explicit_id_wins_over_map_key() {
        let doc = serde_json::json!({"key": {"id": "explicit", "other": "x"}});
        let messages = parse_messages(doc).unwrap();
        assert_eq!(messages[0].id, "explicit");
    }

    #[test]
    fn scalars_are_rejected() {
        let err = parse_messages(serde_json::json!({"n": 3})).unwrap_err();
        assert!(err.to_string().contains("'n'"));
        assert!(parse_messages(serde_json::json!("text")).is_err());
    }

    #[test]
    fn json_syntax_errors_carry_position() {
        let err = unmarshal_json(b"{\n  \"a\": }").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 2, .. }), "{err}");
    }

    #[cfg(feature = "toml")]
    #[test]
    fn toml_documents_decode() {
        let doc = unmarshal_toml(b"hello = \"Hello\"\n[cards]\none = \"card\"\nother = \"cards\"\n")
            .unwrap();
        let messages = parse_messages(doc).unwrap();
        assert_eq!(messages[0].id, "cards");
        assert_eq!(messages[0].one, "card");
        assert_eq!(messages[1].id, "hello");
    }
}

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::PluralForm;
use crate::interpreter::LoadError;
use crate::parser::Delimiters;

/// A translatable message with one template per plural form.
///
/// Messages are immutable once registered. An empty form string means the
/// form is absent; resolution falls back to `other` for absent forms.
///
/// # Example
///
/// ```
/// use polyglot::{Message, PluralForm};
///
/// let message = Message::builder()
///     .id("cards")
///     .one("{{count}} card")
///     .other("{{count}} cards")
///     .build();
///
/// assert_eq!(message.template(PluralForm::One), "{{count}} card");
/// assert_eq!(message.template(PluralForm::Few), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    /// Lookup key, unique within one language.
    #[builder(into)]
    pub id: String,

    /// Note for translators. Not used in resolution.
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Content fingerprint, opaque to the engine.
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Left variable marker, overriding `{{`.
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_delim: Option<String>,

    /// Right variable marker, overriding `}}`.
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_delim: Option<String>,

    #[builder(default, into)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub zero: String,

    #[builder(default, into)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub one: String,

    #[builder(default, into)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub two: String,

    #[builder(default, into)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub few: String,

    #[builder(default, into)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub many: String,

    #[builder(default, into)]
    #[serde(alias = "translation", skip_serializing_if = "String::is_empty")]
    pub other: String,
}

impl Message {
    /// Returns the template for a plural form, or `""` if the form is absent.
    pub fn template(&self, form: PluralForm) -> &str {
        match form {
            PluralForm::Zero => &self.zero,
            PluralForm::One => &self.one,
            PluralForm::Two => &self.two,
            PluralForm::Few => &self.few,
            PluralForm::Many => &self.many,
            PluralForm::Other => &self.other,
        }
    }

    /// Plural forms that carry a non-empty template, in CLDR order.
    pub fn forms(&self) -> impl Iterator<Item = PluralForm> + '_ {
        PluralForm::ALL
            .into_iter()
            .filter(|form| !self.template(*form).is_empty())
    }

    /// True if any form other than `other` is present.
    pub fn is_pluralized(&self) -> bool {
        self.forms().any(|form| form != PluralForm::Other)
    }

    /// The variable markers used to parse this message's templates.
    pub fn delimiters(&self) -> Delimiters<'_> {
        Delimiters::new(
            self.left_delim.as_deref().unwrap_or_default(),
            self.right_delim.as_deref().unwrap_or_default(),
        )
    }

    /// Checks that the record can be registered.
    ///
    /// A record needs a non-empty id and at least one non-empty form.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.id.is_empty() {
            return Err(LoadError::InvalidMessage {
                id: String::new(),
                reason: "message id is empty".to_string(),
            });
        }
        if self.forms().next().is_none() {
            return Err(LoadError::InvalidMessage {
                id: self.id.clone(),
                reason: "all plural forms are empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_translation_alias_and_camel_case_delimiters() {
        let message: Message = serde_json::from_str(
            r#"{"id": "x", "translation": "X <<name>>", "leftDelim": "<<", "rightDelim": ">>"}"#,
        )
        .unwrap();
        assert_eq!(message.other, "X <<name>>");
        assert_eq!(message.left_delim.as_deref(), Some("<<"));
        assert_eq!(message.delimiters(), Delimiters::new("<<", ">>"));
    }

    #[test]
    fn serializes_only_present_fields() {
        let message = Message::builder().id("x").other("y").build();
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"id":"x","other":"y"}"#);
    }

    #[test]
    fn validate_rejects_empty_id_and_empty_forms() {
        let no_id = Message::builder().id("").other("y").build();
        assert!(no_id.validate().is_err());

        let no_forms = Message::builder().id("x").description("d").build();
        assert!(no_forms.validate().is_err());

        let only_one = Message::builder().id("x").one("y").build();
        assert!(only_one.validate().is_ok());
    }
}

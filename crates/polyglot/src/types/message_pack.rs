use icu_locale_core::LanguageIdentifier;

use super::Message;

/// A batch of messages for one language, as produced by a parser.
#[derive(Debug, Clone, PartialEq)]
pub struct MessagePack {
    pub language: LanguageIdentifier,
    pub messages: Vec<Message>,
}

impl MessagePack {
    pub fn new(language: LanguageIdentifier, messages: Vec<Message>) -> Self {
        Self { language, messages }
    }
}

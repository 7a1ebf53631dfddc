//! Message sources and parsers.
//!
//! A [`Loader`] produces raw bytes and a [`Parser`] turns them into a
//! [`MessagePack`]. Both are single-method traits with closure adapters
//! ([`loader_fn`], [`parser_fn`]) and struct implementations for the common
//! sources: files on disk, embedded bytes, and (with the `remote` feature)
//! HTTP.

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use icu_locale_core::LanguageIdentifier;

use crate::interpreter::{BoxError, LoadError};
use crate::parser::{UnmarshalFn, parse_messages, unmarshal_json};
use crate::types::MessagePack;

/// Produces the raw content of a message source.
pub trait Loader {
    fn load(&self) -> Result<Vec<u8>, BoxError>;
}

/// Turns raw content into messages for one language.
pub trait Parser {
    fn parse(&self, content: &[u8]) -> Result<MessagePack, BoxError>;
}

/// A [`Loader`] backed by a closure. Built with [`loader_fn`].
pub struct FnLoader<F>(F);

impl<F> Loader for FnLoader<F>
where
    F: Fn() -> Result<Vec<u8>, BoxError>,
{
    fn load(&self) -> Result<Vec<u8>, BoxError> {
        (self.0)()
    }
}

/// Use a closure as a [`Loader`].
///
/// # Example
///
/// ```
/// use polyglot::loader::{Loader, loader_fn};
///
/// let loader = loader_fn(|| Ok(b"{}".to_vec()));
/// assert_eq!(loader.load().unwrap(), b"{}");
/// ```
pub fn loader_fn<F>(f: F) -> FnLoader<F>
where
    F: Fn() -> Result<Vec<u8>, BoxError>,
{
    FnLoader(f)
}

/// A [`Parser`] backed by a closure. Built with [`parser_fn`].
pub struct FnParser<F>(F);

impl<F> Parser for FnParser<F>
where
    F: Fn(&[u8]) -> Result<MessagePack, BoxError>,
{
    fn parse(&self, content: &[u8]) -> Result<MessagePack, BoxError> {
        (self.0)(content)
    }
}

/// Use a closure as a [`Parser`].
pub fn parser_fn<F>(f: F) -> FnParser<F>
where
    F: Fn(&[u8]) -> Result<MessagePack, BoxError>,
{
    FnParser(f)
}

/// Reads a message file from disk.
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Loader for FileLoader {
    fn load(&self) -> Result<Vec<u8>, BoxError> {
        fs::read(&self.path).map_err(|source| {
            LoadError::Io {
                path: self.path.clone(),
                source,
            }
            .into()
        })
    }
}

/// Serves content compiled into the binary, such as `include_bytes!` output.
#[derive(Debug, Clone)]
pub struct StaticLoader {
    content: Cow<'static, [u8]>,
}

impl StaticLoader {
    pub fn new(content: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl Loader for StaticLoader {
    fn load(&self) -> Result<Vec<u8>, BoxError> {
        Ok(self.content.to_vec())
    }
}

/// Parses one message file format for a fixed language.
///
/// # Example
///
/// ```
/// use icu_locale_core::langid;
/// use polyglot::loader::{FormatParser, Parser};
///
/// let parser = FormatParser::json(langid!("de"));
/// let pack = parser.parse(br#"{"hello": "Hallo"}"#).unwrap();
/// assert_eq!(pack.language, langid!("de"));
/// assert_eq!(pack.messages[0].other, "Hallo");
/// ```
#[derive(Clone)]
pub struct FormatParser {
    language: LanguageIdentifier,
    unmarshal: UnmarshalFn,
}

impl FormatParser {
    pub fn new(language: LanguageIdentifier, unmarshal: UnmarshalFn) -> Self {
        Self {
            language,
            unmarshal,
        }
    }

    pub fn json(language: LanguageIdentifier) -> Self {
        Self::new(language, Arc::new(unmarshal_json))
    }

    pub fn language(&self) -> &LanguageIdentifier {
        &self.language
    }
}

impl Parser for FormatParser {
    fn parse(&self, content: &[u8]) -> Result<MessagePack, BoxError> {
        let document = (self.unmarshal)(content)?;
        let messages = parse_messages(document)?;
        Ok(MessagePack::new(self.language.clone(), messages))
    }
}

#[cfg(feature = "remote")]
pub use remote::{ClientOption, RemoteError, RemoteLoader, client_option, timeout, user_agent};

#[cfg(feature = "remote")]
mod remote {
    use std::time::Duration;

    use reqwest::StatusCode;
    use reqwest::blocking::{Client, ClientBuilder, Request};
    use thiserror::Error;
    use tracing::debug;

    use super::Loader;
    use crate::interpreter::BoxError;

    /// Configures the HTTP client of a [`RemoteLoader`].
    ///
    /// Options are applied in order; the first error aborts client creation.
    pub type ClientOption = Box<dyn FnOnce(ClientBuilder) -> Result<ClientBuilder, BoxError>>;

    /// Errors from fetching a remote message file.
    #[derive(Debug, Error)]
    pub enum RemoteError {
        #[error("request failed: {0}")]
        Request(#[from] reqwest::Error),

        /// The server answered with a non-success status.
        #[error("{url} returned {status}")]
        Status { url: String, status: StatusCode },

        /// The request has a streaming body and cannot be sent twice.
        #[error("request body cannot be cloned")]
        UnclonableRequest,
    }

    /// Wrap a closure as a [`ClientOption`].
    pub fn client_option<F>(f: F) -> ClientOption
    where
        F: FnOnce(ClientBuilder) -> Result<ClientBuilder, BoxError> + 'static,
    {
        Box::new(f)
    }

    /// Set a total request timeout.
    pub fn timeout(duration: Duration) -> ClientOption {
        client_option(move |builder| Ok(builder.timeout(duration)))
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(agent: impl Into<String>) -> ClientOption {
        let agent = agent.into();
        client_option(move |builder| Ok(builder.user_agent(agent)))
    }

    /// Fetches a message file over HTTP with a blocking client.
    ///
    /// The client is built once from the options. Each [`Loader::load`] call
    /// sends a copy of the request.
    #[derive(Debug)]
    pub struct RemoteLoader {
        client: Client,
        request: Request,
    }

    impl RemoteLoader {
        /// Create a loader for a prepared request.
        pub fn new(
            request: Request,
            options: impl IntoIterator<Item = ClientOption>,
        ) -> Result<Self, BoxError> {
            let client = build_client(options)?;
            Ok(Self { client, request })
        }

        /// Create a loader for a `GET` of `url`.
        pub fn get(
            url: &str,
            options: impl IntoIterator<Item = ClientOption>,
        ) -> Result<Self, BoxError> {
            let client = build_client(options)?;
            let request = client.get(url).build().map_err(RemoteError::Request)?;
            Ok(Self { client, request })
        }

        pub fn url(&self) -> &str {
            self.request.url().as_str()
        }
    }

    impl Loader for RemoteLoader {
        fn load(&self) -> Result<Vec<u8>, BoxError> {
            let request = self
                .request
                .try_clone()
                .ok_or(RemoteError::UnclonableRequest)?;
            let url = request.url().to_string();
            debug!(url, "fetching remote messages");

            let response = self.client.execute(request).map_err(RemoteError::Request)?;
            let status = response.status();
            if !status.is_success() {
                return Err(RemoteError::Status { url, status }.into());
            }
            let body = response.bytes().map_err(RemoteError::Request)?;
            Ok(body.to_vec())
        }
    }

    fn build_client(options: impl IntoIterator<Item = ClientOption>) -> Result<Client, BoxError> {
        let mut builder = Client::builder();
        for option in options {
            builder = option(builder)?;
        }
        Ok(builder.build().map_err(RemoteError::Request)?)
    }
}

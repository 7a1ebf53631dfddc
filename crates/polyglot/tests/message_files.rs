//! Tests for loading messages from files, loaders, and parsers.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::str;

use icu_locale_core::langid;
use polyglot::loader::{FileLoader, FormatParser, StaticLoader, loader_fn, parser_fn};
use polyglot::parser::ParseError;
use polyglot::{I18n, LoadError, Message, MessagePack, args, data};
use serde_json::Value as JsonValue;
use tempfile::{NamedTempFile, TempDir};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// =========================================================================
// Message Files
// =========================================================================

#[test]
fn load_message_file_takes_language_from_name() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "active.fr-CA.json",
        r#"{"hello": "Bonjour {{name}}", "cards": {"one": "une carte", "other": "{{n}} cartes"}}"#,
    );

    let i18n = I18n::new("en").unwrap();
    assert_eq!(i18n.load_message_file(&path).unwrap(), 2);

    let fr = i18n.locale(["fr-CA"]);
    assert_eq!(fr.t("hello", data! { "name" => "Zoé" }), "Bonjour Zoé");
    assert_eq!(fr.p("cards", 1, ()), "une carte");
    assert_eq!(fr.p("cards", 4, data! { "n" => 4 }), "4 cartes");
}

#[test]
fn nested_groups_flatten_to_dotted_ids() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "menu.en.json",
        r#"{"menu": {"file": {"open": "Open", "save": {"description": "Save button", "other": "Save"}}}}"#,
    );

    let i18n = I18n::new("en").unwrap();
    i18n.load_message_file(&path).unwrap();
    assert_eq!(
        i18n.catalog().message_ids(&langid!("en")),
        ["menu.file.open", "menu.file.save"]
    );
    assert_eq!(i18n.t("menu.file.save", ()), "Save");
}

#[test]
fn list_documents_keep_explicit_ids_and_delimiters() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "de.json",
        r#"[{"id": "greet", "leftDelim": "<<", "rightDelim": ">>", "translation": "Hallo <<name>> {{literal}}"}]"#,
    );

    let i18n = I18n::new("de").unwrap();
    i18n.load_message_file(&path).unwrap();
    assert_eq!(
        i18n.t("greet", data! { "name" => "Jo" }),
        "Hallo Jo {{literal}}"
    );
}

#[cfg(feature = "toml")]
#[test]
fn toml_files_load() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "active.es.toml",
        "hello = \"Hola\"\n\n[apples]\none = \"una manzana\"\nother = \"{{.}} manzanas\"\n",
    );

    let i18n = I18n::new("es").unwrap();
    i18n.load_message_file(&path).unwrap();
    assert_eq!(i18n.t("hello", ()), "Hola");
    assert_eq!(i18n.p("apples", 3, args![3]), "3 manzanas");
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_files_load() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "it.yml", "ciao: Ciao\ngroup:\n  bye: Arrivederci\n");

    let i18n = I18n::new("it").unwrap();
    i18n.load_message_file(&path).unwrap();
    assert_eq!(i18n.t("group.bye", ()), "Arrivederci");
}

#[test]
fn missing_file_is_io_error() {
    let i18n = I18n::new("en").unwrap();
    let err = i18n.load_message_file("/nonexistent/en.json").unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "{err}");
}

#[test]
fn syntax_error_reports_position() {
    let mut file = NamedTempFile::with_suffix(".en.json").unwrap();
    file.write_all(b"{\n  \"a\": \"A\",\n  \"b\": \n}").unwrap();

    let i18n = I18n::new("en").unwrap();
    let err = i18n.load_message_file(file.path()).unwrap_err();
    match err {
        LoadError::Parse { line, .. } => assert_eq!(line, 4),
        other => panic!("expected parse error, got {other}"),
    }
    assert!(i18n.registered_tags().is_empty());
}

#[test]
fn file_without_language_is_rejected() {
    let i18n = I18n::new("en").unwrap();
    let err = i18n
        .load_message_file_bytes("messages.json", b"{}")
        .unwrap_err();
    assert!(matches!(err, LoadError::MissingLanguage { .. }), "{err}");
}

#[test]
fn unknown_extension_is_unsupported() {
    let i18n = I18n::new("en").unwrap();
    let err = i18n
        .load_message_file_bytes("active.en.ini", b"hello=Hello")
        .unwrap_err();
    assert!(
        matches!(err, LoadError::UnsupportedFormat { ref format, .. } if format == "ini"),
        "{err}"
    );
}

#[test]
fn registered_unmarshal_fn_handles_new_extension() {
    let i18n = I18n::new("en").unwrap();
    i18n.register_unmarshal_fn("lines", |content| {
        let text = str::from_utf8(content).map_err(|_| ParseError::InvalidUtf8)?;
        let map = text
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), JsonValue::from(v.trim())))
            .collect();
        Ok(JsonValue::Object(map))
    });

    i18n.load_message_file_bytes("pack.en.lines", b"hello = Hello\nbye = Bye\n")
        .unwrap();
    assert_eq!(i18n.t("bye", ()), "Bye");
}

#[test]
fn embedded_bytes_load_like_files() {
    const EMBEDDED: &[u8] = br#"{"title": "Polyglot"}"#;
    let i18n = I18n::new("en").unwrap();
    i18n.load_message_file_bytes("locales/active.en.json", EMBEDDED)
        .unwrap();
    assert_eq!(i18n.t("title", ()), "Polyglot");
}

#[test]
fn invalid_record_in_file_is_rejected_whole() {
    let i18n = I18n::new("en").unwrap();
    let err = i18n
        .load_message_file_bytes("en.json", br#"{"ok": "fine", "empty": {"description": "no forms"}}"#)
        .unwrap_err();
    assert!(matches!(err, LoadError::InvalidMessage { .. }), "{err}");
    assert_eq!(i18n.t("ok", ()), "ok");
}

// =========================================================================
// Loaders and Parsers
// =========================================================================

#[test]
fn load_messages_with_closures() {
    let i18n = I18n::new("en").unwrap();
    let loader = loader_fn(|| Ok("pt:Olá".as_bytes().to_vec()));
    let parser = parser_fn(|content: &[u8]| {
        let text = String::from_utf8(content.to_vec())?;
        let (tag, hello) = text.split_once(':').ok_or("missing separator")?;
        Ok(MessagePack::new(
            tag.parse()?,
            vec![Message::builder().id("hello").other(hello).build()],
        ))
    });

    assert_eq!(i18n.load_messages(&loader, &parser).unwrap(), 1);
    assert_eq!(i18n.locale(["pt"]).t("hello", ()), "Olá");
}

#[test]
fn loader_error_is_preserved() {
    let i18n = I18n::new("en").unwrap();
    let loader = loader_fn(|| Err("load failed".into()));
    let err = i18n
        .load_messages(&loader, &FormatParser::json(langid!("en")))
        .unwrap_err();
    assert!(matches!(err, LoadError::Loader(_)));
    assert!(err.to_string().contains("load failed"), "{err}");
}

#[test]
fn parser_error_is_reported() {
    let i18n = I18n::new("en").unwrap();
    let loader = StaticLoader::new(&b"not json"[..]);
    let err = i18n
        .load_messages(&loader, &FormatParser::json(langid!("en")))
        .unwrap_err();
    assert!(matches!(err, LoadError::Parser(_)), "{err}");
}

#[test]
fn file_loader_reads_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "anything.txt", r#"{"k": "v"}"#);

    let i18n = I18n::new("en").unwrap();
    i18n.load_messages(&FileLoader::new(&path), &FormatParser::json(langid!("nl")))
        .unwrap();
    assert_eq!(i18n.locale(["nl"]).t("k", ()), "v");

    let missing = FileLoader::new(dir.path().join("missing.json"));
    let err = i18n
        .load_messages(&missing, &FormatParser::json(langid!("nl")))
        .unwrap_err();
    assert!(err.to_string().contains("missing.json"), "{err}");
}

//! Tests for the process-wide default message registry.

#![cfg(feature = "global-defaults")]

use std::sync::Arc;

use polyglot::{I18n, global_defaults};

#[test]
fn translators_share_the_global_registry() {
    let first = I18n::new("en").unwrap();
    let second = I18n::new("de").unwrap();
    assert!(Arc::ptr_eq(first.default_messages(), &global_defaults()));

    first.set_default_message("global.shared", "shared text");
    assert_eq!(second.t("global.shared", ()), "shared text");
}

//! CLDR plural form resolution.
//!
//! Plural rules come from ICU's compiled CLDR data for the full tag, so
//! regional rule sets apply (`pt-PT` differs from `pt`) and tags without
//! their own rules fall back to their parents (`ru-RU` uses `ru`). English
//! has "one" and "other", Russian has "one", "few", "many", and "other", and
//! Arabic uses all six forms.
//!
//! Plural rules are cached per thread per language to avoid re-creating
//! `PluralRules` instances on every call. The cache is initialized lazily
//! on first access within each thread.

use std::cell::RefCell;

use fixed_decimal::Decimal;
use icu_locale_core::{LanguageIdentifier, Locale};
use icu_plurals::{PluralOperands, PluralRuleType, PluralRules};

use crate::interpreter::EvalError;
use crate::types::{PluralCount, PluralForm};

thread_local! {
    /// Per-thread cache of `PluralRules` keyed by language tag.
    ///
    /// `None` records a language without CLDR plural data.
    static PLURAL_RULES_CACHE: RefCell<Vec<(LanguageIdentifier, Option<PluralRules>)>> =
        const { RefCell::new(Vec::new()) };
}

/// Build cardinal `PluralRules` for a language tag.
fn build_rules(language: &LanguageIdentifier) -> Option<PluralRules> {
    let locale = Locale::from(language.clone());
    PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into()).ok()
}

/// Run `f` with the cached rules for `language`.
fn with_rules<T>(language: &LanguageIdentifier, f: impl FnOnce(Option<&PluralRules>) -> T) -> T {
    PLURAL_RULES_CACHE.with_borrow_mut(|cache| {
        let index = match cache.iter().position(|(tag, _)| tag == language) {
            Some(index) => index,
            None => {
                cache.push((language.clone(), build_rules(language)));
                cache.len() - 1
            }
        };
        f(cache[index].1.as_ref())
    })
}

/// Normalize a count into ICU plural operands.
///
/// Integers are used as-is. Floats and strings go through their decimal text,
/// which keeps visible fraction digits (`"1.0"` is not `1`). The sign is
/// dropped, as plural rules only look at magnitude.
pub fn plural_operands(count: &PluralCount) -> Result<PluralOperands, EvalError> {
    let invalid = || EvalError::InvalidPluralCount {
        count: count.to_string(),
    };
    match count {
        PluralCount::Integer(n) => Ok(PluralOperands::from(*n)),
        PluralCount::Float(n) if !n.is_finite() => Err(invalid()),
        PluralCount::Float(n) => decimal_operands(&n.to_string()).ok_or_else(invalid),
        PluralCount::Text(s) => decimal_operands(s.trim()).ok_or_else(invalid),
    }
}

fn decimal_operands(text: &str) -> Option<PluralOperands> {
    let magnitude = text.strip_prefix('-').unwrap_or(text);
    if magnitude.is_empty()
        || !magnitude
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }
    let decimal = Decimal::try_from_str(magnitude).ok()?;
    Some(PluralOperands::from(&decimal))
}

/// Get the plural form for a count in a language.
///
/// Languages without CLDR plural data always resolve to `Other`.
///
/// # Examples
///
/// ```
/// use icu_locale_core::langid;
/// use polyglot::PluralForm;
/// use polyglot::interpreter::plural_form;
///
/// // English: 1 = "one", everything else = "other"
/// assert_eq!(plural_form(&langid!("en"), &1.into()).unwrap(), PluralForm::One);
/// assert_eq!(plural_form(&langid!("en"), &2.into()).unwrap(), PluralForm::Other);
///
/// // Russian: modulo rules for "one", "few", "many"
/// assert_eq!(plural_form(&langid!("ru"), &21.into()).unwrap(), PluralForm::One);
/// assert_eq!(plural_form(&langid!("ru"), &3.into()).unwrap(), PluralForm::Few);
/// assert_eq!(plural_form(&langid!("ru"), &5.into()).unwrap(), PluralForm::Many);
/// ```
pub fn plural_form(
    language: &LanguageIdentifier,
    count: &PluralCount,
) -> Result<PluralForm, EvalError> {
    let operands = plural_operands(count)?;
    Ok(with_rules(language, |rules| {
        rules.map_or(PluralForm::Other, |rules| {
            PluralForm::from(rules.category_for(operands))
        })
    }))
}

/// The plural forms a language distinguishes, in CLDR order.
pub fn plural_forms(language: &LanguageIdentifier) -> Vec<PluralForm> {
    with_rules(language, |rules| {
        let mut forms: Vec<PluralForm> = rules.map_or_else(
            || vec![PluralForm::Other],
            |rules| rules.categories().map(PluralForm::from).collect(),
        );
        forms.sort();
        forms
    })
}

#[cfg(test)]
mod tests {
    use icu_locale_core::langid;

    use super::*;

    fn form(language: &LanguageIdentifier, count: impl Into<PluralCount>) -> PluralForm {
        plural_form(language, &count.into()).unwrap()
    }

    #[test]
    fn english_one_and_other() {
        let en = langid!("en");
        assert_eq!(form(&en, 0), PluralForm::Other);
        assert_eq!(form(&en, 1), PluralForm::One);
        assert_eq!(form(&en, -1), PluralForm::One);
        assert_eq!(form(&en, 2), PluralForm::Other);
    }

    #[test]
    fn visible_fraction_digits_matter() {
        let en = langid!("en");
        assert_eq!(form(&en, "1"), PluralForm::One);
        assert_eq!(form(&en, "1.0"), PluralForm::Other);
        assert_eq!(form(&en, 1.5), PluralForm::Other);
        assert_eq!(form(&en, 1.0), PluralForm::One);
    }

    #[test]
    fn regional_tags_fall_back_to_parent_rules() {
        assert_eq!(form(&langid!("ru-RU"), 22), PluralForm::Few);
        assert_eq!(form(&langid!("sr-Latn"), 11), PluralForm::Other);
    }

    #[test]
    fn regional_rules_override_language_rules() {
        assert_eq!(form(&langid!("pt"), 0), PluralForm::One);
        assert_eq!(form(&langid!("pt-PT"), 0), PluralForm::Other);
        assert_eq!(form(&langid!("pt-PT"), 1), PluralForm::One);
    }

    #[test]
    fn arabic_uses_all_six_forms() {
        let ar = langid!("ar");
        assert_eq!(form(&ar, 0), PluralForm::Zero);
        assert_eq!(form(&ar, 1), PluralForm::One);
        assert_eq!(form(&ar, 2), PluralForm::Two);
        assert_eq!(form(&ar, 3), PluralForm::Few);
        assert_eq!(form(&ar, 11), PluralForm::Many);
        assert_eq!(form(&ar, 100), PluralForm::Other);
        assert_eq!(plural_forms(&ar), PluralForm::ALL.to_vec());
    }

    #[test]
    fn languages_without_plurals_use_other() {
        assert_eq!(form(&langid!("ja"), 1), PluralForm::Other);
        assert_eq!(plural_forms(&langid!("zh")), vec![PluralForm::Other]);
    }

    #[test]
    fn invalid_counts_are_rejected() {
        let en = langid!("en");
        for count in [
            PluralCount::from("abc"),
            PluralCount::from(""),
            PluralCount::from("1e3"),
            PluralCount::from(f64::NAN),
            PluralCount::from(f64::INFINITY),
        ] {
            assert!(
                matches!(
                    plural_form(&en, &count),
                    Err(EvalError::InvalidPluralCount { .. })
                ),
                "{count}"
            );
        }
    }
}

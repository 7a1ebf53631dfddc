//! Template rendering.
//!
//! Substitutes each variable reference of a parsed template with a value from
//! the [`TemplateData`]. Named references look into maps, positional
//! references look into sequences; crossing the two is a missing variable.

use crate::interpreter::error::InterpolationError;
use crate::parser::ast::{Reference, Segment, Template};
use crate::types::{TemplateData, Value};

/// Render a parsed template against template data.
///
/// # Errors
///
/// Returns [`InterpolationError::MissingVariable`] if a reference has no value
/// in `data`.
///
/// # Example
///
/// ```
/// use polyglot::interpreter::render;
/// use polyglot::parser::{parse_template, Delimiters};
/// use polyglot::{TemplateData, Value};
///
/// let template = parse_template("{{0}} and {{2}}", Delimiters::default()).unwrap();
/// let data = TemplateData::from_args(["a", "b", "c"]);
/// assert_eq!(render(&template, &data).unwrap(), "a and c");
/// ```
pub fn render(template: &Template, data: &TemplateData) -> Result<String, InterpolationError> {
    let mut output = String::new();
    for segment in &template.segments {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Variable(reference) => {
                let value =
                    resolve(reference, data).ok_or_else(|| InterpolationError::MissingVariable {
                        reference: reference.clone(),
                    })?;
                output.push_str(&value.to_string());
            }
        }
    }
    Ok(output)
}

/// Look a reference up in the data.
fn resolve<'d>(reference: &Reference, data: &'d TemplateData) -> Option<&'d Value> {
    match (reference, data) {
        (_, TemplateData::None) => None,
        (Reference::Current, TemplateData::Single(value)) => Some(value),
        (Reference::Current, _) => None,
        (Reference::Field(path), _) => {
            let (first, rest) = path.split_first()?;
            let root = match data {
                TemplateData::Named(map) => map.get(first),
                TemplateData::Single(value) => value.get(first),
                _ => None,
            }?;
            rest.iter().try_fold(root, |value, key| value.get(key))
        }
        (Reference::Index(index), TemplateData::Positional(items)) => items.get(*index),
        (Reference::Index(index), TemplateData::Single(value)) => value.get_index(*index),
        (Reference::Index(_), _) => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::parser::{Delimiters, parse_template};

    fn render_str(template: &str, data: &TemplateData) -> Result<String, InterpolationError> {
        let template = parse_template(template, Delimiters::default())?;
        render(&template, data)
    }

    #[test]
    fn literal_templates_need_no_data() {
        assert_eq!(render_str("plain", &TemplateData::None).unwrap(), "plain");
    }

    #[test]
    fn any_reference_without_data_is_missing() {
        let err = render_str("{{name}}", &TemplateData::None).unwrap_err();
        assert_eq!(err.to_string(), "no value for 'name'");
    }

    #[test]
    fn single_scalar_is_the_current_value() {
        let data = TemplateData::Single(Value::from(7));
        assert_eq!(render_str("n={{.}}", &data).unwrap(), "n=7");
        assert!(render_str("{{name}}", &data).is_err());
    }

    #[test]
    fn single_map_is_addressed_by_name() {
        let user = Value::from(BTreeMap::from([("name".to_string(), "Ada")]));
        let data = TemplateData::Single(Value::from(BTreeMap::from([("user".to_string(), user)])));
        assert_eq!(render_str("{{.user.name}}", &data).unwrap(), "Ada");
        assert!(render_str("{{.user.age}}", &data).is_err());
    }

    #[test]
    fn named_data_rejects_positions() {
        let data = TemplateData::from_args(["k1", "v1", "k2", "v2"]);
        assert_eq!(render_str("{{k1}}-{{k2}}", &data).unwrap(), "v1-v2");
        assert!(render_str("{{0}}", &data).is_err());
    }

    #[test]
    fn positional_data_rejects_names() {
        let data = TemplateData::from_args(["a", "b", "c"]);
        assert_eq!(render_str("{{index . 1}}{{2}}", &data).unwrap(), "bc");
        assert!(render_str("{{a}}", &data).is_err());
        assert!(render_str("{{3}}", &data).is_err());
    }

    #[test]
    fn single_list_is_addressed_by_position() {
        let data = TemplateData::Single(Value::from(vec!["x", "y"]));
        assert_eq!(render_str("{{1}}", &data).unwrap(), "y");
    }
}

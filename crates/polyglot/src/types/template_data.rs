use std::collections::{BTreeMap, HashMap};

use super::Value;

/// The data a message template is rendered against.
///
/// Callers state the shape of their data directly. [`TemplateData::from_args`]
/// reproduces the argument-counting convention for call sites that pass a
/// flat list of extras.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TemplateData {
    /// No data. Any variable reference fails to render.
    #[default]
    None,

    /// One opaque value, exposed to the template as-is.
    Single(Value),

    /// Named values, referenced as `{{name}}`.
    Named(BTreeMap<String, Value>),

    /// Positional values, referenced as `{{0}}`.
    Positional(Vec<Value>),
}

impl TemplateData {
    /// Classify a flat list of extra arguments.
    ///
    /// - no arguments: [`TemplateData::None`]
    /// - one argument: [`TemplateData::Single`]
    /// - an even number: alternating key/value pairs, [`TemplateData::Named`]
    /// - an odd number above one: [`TemplateData::Positional`]
    ///
    /// # Example
    ///
    /// ```
    /// use polyglot::{TemplateData, Value};
    ///
    /// let named = TemplateData::from_args(["k1", "v1", "k2", "v2"]);
    /// assert!(matches!(named, TemplateData::Named(_)));
    ///
    /// let positional = TemplateData::from_args(["a", "b", "c"]);
    /// assert!(matches!(positional, TemplateData::Positional(_)));
    /// ```
    pub fn from_args<I, V>(args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut args: Vec<Value> = args.into_iter().map(Into::into).collect();
        match args.len() {
            0 => TemplateData::None,
            1 => TemplateData::Single(args.remove(0)),
            n if n % 2 == 0 => {
                let mut named = BTreeMap::new();
                let mut iter = args.into_iter();
                while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
                    named.insert(key.to_string(), value);
                }
                TemplateData::Named(named)
            }
            _ => TemplateData::Positional(args),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TemplateData::None)
    }
}

impl From<()> for TemplateData {
    fn from((): ()) -> Self {
        TemplateData::None
    }
}

impl From<Value> for TemplateData {
    fn from(value: Value) -> Self {
        TemplateData::Single(value)
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for TemplateData {
    fn from(map: BTreeMap<String, V>) -> Self {
        TemplateData::Named(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for TemplateData {
    fn from(map: HashMap<String, V>) -> Self {
        TemplateData::Named(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<V: Into<Value>> From<Vec<V>> for TemplateData {
    fn from(items: Vec<V>) -> Self {
        TemplateData::Positional(items.into_iter().map(Into::into).collect())
    }
}

impl From<&TemplateData> for TemplateData {
    fn from(data: &TemplateData) -> Self {
        data.clone()
    }
}

use std::fmt::{Display, Formatter, Result as FmtResult};

/// A count used to pick a plural form.
///
/// Counts arrive as integers, floats, or strings (for example a decimal read
/// from user input). They are normalized when the plural rule is applied, so
/// `"1.0"` and `1` may select different forms, as CLDR prescribes.
#[derive(Debug, Clone, PartialEq)]
pub enum PluralCount {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Display for PluralCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PluralCount::Integer(n) => write!(f, "{n}"),
            PluralCount::Float(n) => write!(f, "{n}"),
            PluralCount::Text(s) => f.write_str(s),
        }
    }
}

impl From<i32> for PluralCount {
    fn from(n: i32) -> Self {
        PluralCount::Integer(i64::from(n))
    }
}

impl From<i64> for PluralCount {
    fn from(n: i64) -> Self {
        PluralCount::Integer(n)
    }
}

impl From<u32> for PluralCount {
    fn from(n: u32) -> Self {
        PluralCount::Integer(i64::from(n))
    }
}

impl From<u64> for PluralCount {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or_else(|_| PluralCount::Text(n.to_string()), PluralCount::Integer)
    }
}

impl From<usize> for PluralCount {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or_else(|_| PluralCount::Text(n.to_string()), PluralCount::Integer)
    }
}

impl From<f32> for PluralCount {
    fn from(n: f32) -> Self {
        PluralCount::Float(f64::from(n))
    }
}

impl From<f64> for PluralCount {
    fn from(n: f64) -> Self {
        PluralCount::Float(n)
    }
}

impl From<&str> for PluralCount {
    fn from(s: &str) -> Self {
        PluralCount::Text(s.to_string())
    }
}

impl From<String> for PluralCount {
    fn from(s: String) -> Self {
        PluralCount::Text(s)
    }
}

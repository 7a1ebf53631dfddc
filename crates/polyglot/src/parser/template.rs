//! Template string parser using winnow.
//!
//! Parses message templates into an AST. Handles:
//! - Literal text segments
//! - Variable references between configurable delimiters (`{{` `}}` by default)
//! - Named references (`name`, `.name`, `.user.name`)
//! - Positional references (`0`, `index . 0`) and the current value (`.`)

use super::ast::*;
use super::error::ParseError;
use winnow::ascii::{digit1, multispace0, multispace1};
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::stream::Stream;
use winnow::token::{literal, take_while};

const DEFAULT_LEFT: &str = "{{";
const DEFAULT_RIGHT: &str = "}}";

/// The pair of markers that open and close a variable reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters<'a> {
    left: &'a str,
    right: &'a str,
}

impl Default for Delimiters<'_> {
    fn default() -> Self {
        Delimiters {
            left: DEFAULT_LEFT,
            right: DEFAULT_RIGHT,
        }
    }
}

impl<'a> Delimiters<'a> {
    /// Create delimiters. An empty side keeps its default marker.
    pub fn new(left: &'a str, right: &'a str) -> Self {
        Delimiters {
            left: if left.is_empty() { DEFAULT_LEFT } else { left },
            right: if right.is_empty() { DEFAULT_RIGHT } else { right },
        }
    }

    pub fn left(&self) -> &'a str {
        self.left
    }

    pub fn right(&self) -> &'a str {
        self.right
    }
}

/// Parse a template string into an AST.
///
/// # Example
///
/// ```
/// use polyglot::parser::{parse_template, Delimiters, Reference, Segment};
///
/// let template = parse_template("Hello, {{.name}}!", Delimiters::default()).unwrap();
/// assert_eq!(
///     template.segments[1],
///     Segment::Variable(Reference::Field(vec!["name".to_string()]))
/// );
/// ```
pub fn parse_template(input: &str, delimiters: Delimiters<'_>) -> Result<Template, ParseError> {
    let mut remaining = input;
    match template(&mut remaining, delimiters) {
        Ok(t) => {
            if remaining.is_empty() {
                Ok(t)
            } else {
                let (line, column) = calculate_position(input, remaining);
                Err(ParseError::Syntax {
                    line,
                    column,
                    message: format!(
                        "unexpected '{}' without a matching '{}'",
                        delimiters.right(),
                        delimiters.left()
                    ),
                })
            }
        }
        Err(_) => {
            let (line, column) = calculate_position(input, remaining);
            Err(ParseError::Syntax {
                line,
                column,
                message: format!(
                    "expected a variable reference closed by '{}'",
                    delimiters.right()
                ),
            })
        }
    }
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let last_newline = consumed_str.rfind('\n');
    let column = match last_newline {
        Some(pos) => consumed - pos,
        None => consumed + 1,
    };
    (line, column)
}

/// Parse a complete template into segments.
fn template(input: &mut &str, delimiters: Delimiters<'_>) -> ModalResult<Template> {
    let segments: Vec<Segment> =
        repeat(0.., |i: &mut &str| segment(i, delimiters)).parse_next(input)?;
    Ok(Template { segments })
}

/// Parse a single segment (variable or literal run).
fn segment(input: &mut &str, delimiters: Delimiters<'_>) -> ModalResult<Segment> {
    alt((
        |i: &mut &str| variable(i, delimiters),
        |i: &mut &str| text(i, delimiters),
    ))
    .parse_next(input)
}

/// Parse literal text up to the next delimiter of either kind.
fn text(input: &mut &str, delimiters: Delimiters<'_>) -> ModalResult<Segment> {
    let end = [input.find(delimiters.left()), input.find(delimiters.right())]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(input.len());
    if end == 0 {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    Ok(Segment::Literal(input.next_slice(end).to_string()))
}

/// Parse a variable: left reference right. Commits after the left marker.
fn variable(input: &mut &str, delimiters: Delimiters<'_>) -> ModalResult<Segment> {
    literal(delimiters.left()).parse_next(input)?;
    let reference = cut_err(delimited(multispace0, reference, multispace0)).parse_next(input)?;
    cut_err(literal(delimiters.right())).parse_next(input)?;
    Ok(Segment::Variable(reference))
}

/// Parse a reference in any of its spellings.
fn reference(input: &mut &str) -> ModalResult<Reference> {
    alt((index_call, position, dotted, field)).parse_next(input)
}

/// Parse `index . N`.
fn index_call(input: &mut &str) -> ModalResult<Reference> {
    preceded(("index", multispace1, '.', multispace1), number)
        .map(Reference::Index)
        .parse_next(input)
}

/// Parse a bare position: `N`.
fn position(input: &mut &str) -> ModalResult<Reference> {
    number.map(Reference::Index).parse_next(input)
}

/// Parse `.` or `.path`.
fn dotted(input: &mut &str) -> ModalResult<Reference> {
    preceded('.', opt(path))
        .map(|path| path.map_or(Reference::Current, Reference::Field))
        .parse_next(input)
}

/// Parse a bare path: `name` or `a.b`.
fn field(input: &mut &str) -> ModalResult<Reference> {
    path.map(Reference::Field).parse_next(input)
}

/// Parse dot-separated identifiers.
fn path(input: &mut &str) -> ModalResult<Vec<String>> {
    separated(1.., identifier.map(str::to_string), '.').parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<usize> {
    digit1.try_map(|s: &str| s.parse::<usize>()).parse_next(input)
}

/// Parse an identifier (alphanumeric with underscores).
fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Template, ParseError> {
        parse_template(input, Delimiters::default())
    }

    #[test]
    fn literal_only() {
        let t = parse("plain text").unwrap();
        assert_eq!(t.segments, vec![Segment::Literal("plain text".to_string())]);
        assert!(t.is_literal());
    }

    #[test]
    fn empty_template_has_no_segments() {
        assert!(parse("").unwrap().segments.is_empty());
    }

    #[test]
    fn reference_spellings() {
        let cases = [
            ("{{name}}", Reference::Field(vec!["name".to_string()])),
            ("{{ .name }}", Reference::Field(vec!["name".to_string()])),
            (
                "{{.user.name}}",
                Reference::Field(vec!["user".to_string(), "name".to_string()]),
            ),
            ("{{.}}", Reference::Current),
            ("{{1}}", Reference::Index(1)),
            ("{{index . 2}}", Reference::Index(2)),
            ("{{index}}", Reference::Field(vec!["index".to_string()])),
        ];
        for (input, expected) in cases {
            let t = parse(input).unwrap();
            assert_eq!(t.segments, vec![Segment::Variable(expected)], "{input}");
        }
    }

    #[test]
    fn unclosed_left_delimiter_is_an_error() {
        let err = parse("hello {{name").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }), "{err}");
    }

    #[test]
    fn stray_right_delimiter_is_an_error() {
        let err = parse("hello }} there").unwrap_err();
        let ParseError::Syntax { column, .. } = err else {
            panic!("expected syntax error");
        };
        assert_eq!(column, 7);
    }

    #[test]
    fn custom_delimiters() {
        let t = parse_template("<<a>> {{b}}", Delimiters::new("<<", ">>")).unwrap();
        assert_eq!(
            t.segments,
            vec![
                Segment::Variable(Reference::Field(vec!["a".to_string()])),
                Segment::Literal(" {{b}}".to_string()),
            ]
        );
    }

    #[test]
    fn custom_right_delimiter_must_close_variable() {
        let delimiters = Delimiters::new("<<", ">>");
        let err = parse_template("<<a}} tail", delimiters).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }), "{err}");
        let t = parse_template("x << a >>", delimiters).unwrap();
        assert_eq!(t.segments.len(), 2);
    }

    #[test]
    fn position_reports_line_and_column() {
        assert_eq!(calculate_position("ab\ncd", "d"), (2, 2));
    }
}

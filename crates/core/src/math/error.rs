//! Math parsing error types

use core::fmt;

/// Errors from parsing delimited vector/matrix/quaternion text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Input contained no numbers
    Empty,
    /// A field could not be parsed as a number
    InvalidNumber,
    /// Wrong number of fields for the target type
    WrongComponentCount {
        /// Components the target type needs
        expected: usize,
        /// Components found in the input
        found: usize,
    },
}

impl ParseError {
    /// Return variant name as a static string (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseError::Empty => "Empty",
            ParseError::InvalidNumber => "InvalidNumber",
            ParseError::WrongComponentCount { .. } => "WrongComponentCount",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "no components in input"),
            ParseError::InvalidNumber => write!(f, "component is not a number"),
            ParseError::WrongComponentCount { expected, found } => {
                write!(f, "expected {} components, found {}", expected, found)
            }
        }
    }
}

/// Parse exactly `N` numbers separated by `,`, `;`, `|` or whitespace.
///
/// Surrounding parentheses are ignored so `(1|2|3)` and `1, 2, 3` both parse.
pub(crate) fn parse_components<const N: usize>(s: &str) -> Result<[f64; N], ParseError> {
    let trimmed = s
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')');

    let mut out = [0.0; N];
    let mut found = 0;
    for field in trimmed
        .split(|c: char| c == ',' || c == ';' || c == '|' || c.is_whitespace())
        .filter(|f| !f.is_empty())
    {
        let value: f64 = field.parse().map_err(|_| ParseError::InvalidNumber)?;
        if found < N {
            out[found] = value;
        }
        found += 1;
    }

    if found == 0 {
        return Err(ParseError::Empty);
    }
    if found != N {
        return Err(ParseError::WrongComponentCount { expected: N, found });
    }
    Ok(out)
}

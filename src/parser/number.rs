//! Probability literals.

use std::sync::LazyLock;

use regex::Regex;

/// An unsigned decimal, optionally in scientific notation.
static PROBABILITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:0(?:\.[0-9]+)?|[1-9][0-9]*(?:\.[0-9]+)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .unwrap()
});

/// An error related to the parsing of a probability.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The text is not a number in the expected format.
    Format(String),

    /// The number is not within `0 < p < 1`.
    Range(f64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Format(_) => write!(f, "Number does not match expected format."),
            Error::Range(_) => write!(f, "Number is not in expected range 0 < p < 1"),
        }
    }
}

impl std::error::Error for Error {}

/// Parses a probability, which must lie strictly between zero and one.
///
/// # Examples
///
/// ```
/// use bgfile::parser::number;
///
/// assert_eq!(number::parse("0.25"), Ok(0.25));
/// assert_eq!(number::parse("2.5e-1"), Ok(0.25));
/// assert!(number::parse("1").is_err());
/// assert!(number::parse("-0.25").is_err());
/// ```
pub fn parse(s: &str) -> Result<f64, Error> {
    if !PROBABILITY.is_match(s) {
        return Err(Error::Format(s.to_string()));
    }

    let value = s
        .parse::<f64>()
        .map_err(|_| Error::Format(s.to_string()))?;

    if value <= 0.0 || value >= 1.0 {
        return Err(Error::Range(value));
    }

    Ok(value)
}

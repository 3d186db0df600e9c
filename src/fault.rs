//! Faults found while parsing a background file.

use nonempty::NonEmpty;

use crate::decoder;
use crate::sniff::Format;

/// The location of a fault within the input.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Position {
    /// The byte offset.
    offset: u64,

    /// The 0-based line.
    line: u64,

    /// The 0-based column.
    column: u64,
}

impl Position {
    /// Creates a new [`Position`].
    pub fn new(offset: u64, line: u64, column: u64) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Gets the byte offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Gets the 0-based line.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Gets the 0-based column.
    pub fn column(&self) -> u64 {
        self.column
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line + 1, self.column + 1)
    }
}

/// The kind of a fault, along with any data describing it.
#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    /// The file is in a format that is not plain text.
    Format(Format),

    /// The file is not valid UTF-8.
    Encoding(decoder::Code),

    /// A letter that does not belong to the established alphabet.
    AlphabetMismatch(char),

    /// A number at the start of a line.
    NumberBeforeChain,

    /// A character that has no place where it was found.
    Junk,

    /// A number directly following a chain without whitespace between.
    NoGap,

    /// A chain that was already given a probability.
    Duplicate,

    /// Chains that were never given a probability, by slot.
    MissingChain(NonEmpty<usize>),

    /// The probabilities of all chains of one length do not sum to one.
    IncorrectSum {
        /// The length of the chains.
        chain_length: usize,
        /// The sum that was found.
        total: f64,
    },

    /// A probability that is malformed or outside of `0 < p < 1`.
    BadProbability,

    /// A chain without a probability.
    MissingProbability,
}

impl Kind {
    /// Returns whether the fault stops the scan immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::decoder::Code;
    /// use bgfile::fault::Kind;
    ///
    /// assert!(Kind::Encoding(Code::NulByte).is_fatal());
    /// assert!(!Kind::Junk.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        matches!(self, Kind::Format(_) | Kind::Encoding(_))
    }

    /// Returns whether the fault is a syntax error.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Kind::NumberBeforeChain
                | Kind::Junk
                | Kind::NoGap
                | Kind::BadProbability
                | Kind::MissingProbability
        )
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Format(format) => write!(f, "format ({format})"),
            Kind::Encoding(code) => write!(f, "encoding ({code})"),
            Kind::AlphabetMismatch(letter) => write!(f, "alphabet mismatch ('{letter}')"),
            Kind::NumberBeforeChain => write!(f, "number before chain"),
            Kind::Junk => write!(f, "junk"),
            Kind::NoGap => write!(f, "no gap"),
            Kind::Duplicate => write!(f, "duplicate"),
            Kind::MissingChain(missing) => write!(f, "missing chain ({})", missing.len()),
            Kind::IncorrectSum { chain_length, .. } => {
                write!(f, "incorrect sum (length {chain_length})")
            }
            Kind::BadProbability => write!(f, "bad probability"),
            Kind::MissingProbability => write!(f, "missing probability"),
        }
    }
}

/// A fault found while parsing.
#[derive(Clone, Debug, PartialEq)]
pub struct Fault {
    /// Where the fault was found.
    position: Position,

    /// The kind of fault.
    kind: Kind,

    /// A human-readable description.
    message: String,
}

impl Fault {
    /// Creates a new [`Fault`].
    pub fn new(position: Position, kind: Kind, message: impl Into<String>) -> Self {
        Self {
            position,
            kind,
            message: message.into(),
        }
    }

    /// Gets the position of the fault.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Gets the kind of the fault.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Gets the message describing the fault.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_display() {
        let fault = Fault::new(
            Position::new(12, 2, 0),
            Kind::NumberBeforeChain,
            "Found a number before the letter chain was established.",
        );

        assert_eq!(
            fault.to_string(),
            "Found a number before the letter chain was established. (line 3, column 1)"
        );
        assert!(fault.kind().is_syntax());
        assert!(!fault.kind().is_fatal());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::AlphabetMismatch('X').to_string(), "alphabet mismatch ('X')");
        assert_eq!(
            Kind::MissingChain(NonEmpty::from((0, vec![1, 2]))).to_string(),
            "missing chain (3)"
        );
        assert!(!Kind::Duplicate.is_syntax());
    }
}

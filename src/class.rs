//! Character classes used when scanning a background file.

use std::ops::BitOr;

/// The number of entries in the classification table (the 7-bit code points).
const TABLE_SIZE: usize = 128;

/// A set of character classes.
///
/// A character can belong to several classes at once: the DNA letters are
/// also protein letters and `E` is both a protein letter and an exponent
/// marker within a number.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Class(u8);

impl Class {
    /// Characters which have no place in a background file.
    pub const JUNK: Class = Class(1 << 0);

    /// Whitespace (space, tab, form feed, new line and carriage return).
    pub const WHITESPACE: Class = Class(1 << 1);

    /// Letters of the DNA alphabet.
    pub const DNA: Class = Class(1 << 2);

    /// Letters of the protein alphabet.
    pub const PROTEIN: Class = Class(1 << 3);

    /// Characters that may start a number.
    pub const NUMBER_START: Class = Class(1 << 4);

    /// Characters that may continue a number.
    pub const NUMBER_MID: Class = Class(1 << 5);

    /// The comment marker.
    pub const COMMENT: Class = Class(1 << 6);

    /// Combines two sets of classes.
    pub const fn union(self, other: Class) -> Class {
        Class(self.0 | other.0)
    }

    /// Returns whether any class is shared between the two sets.
    pub const fn intersects(self, other: Class) -> bool {
        (self.0 & other.0) != 0
    }

    /// Gets the raw bits of the set.
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for Class {
    type Output = Class;

    fn bitor(self, rhs: Class) -> Self::Output {
        self.union(rhs)
    }
}

/// Assigns a class to each of the letters (in both cases).
const fn mark(mut table: [Class; TABLE_SIZE], letters: &[u8], class: Class) -> [Class; TABLE_SIZE] {
    let mut i = 0;

    while i < letters.len() {
        table[letters[i] as usize] = class;
        table[letters[i].to_ascii_lowercase() as usize] = class;
        i += 1;
    }

    table
}

/// Builds the classification table.
const fn build() -> [Class; TABLE_SIZE] {
    let table = [Class::JUNK; TABLE_SIZE];
    let table = mark(table, b" \t\x0c\n\r", Class::WHITESPACE);
    let table = mark(table, b"ACGT", Class::DNA.union(Class::PROTEIN));
    let table = mark(table, b"DFHIKLMNPQRSVWY", Class::PROTEIN);
    let table = mark(
        table,
        b"0123456789",
        Class::NUMBER_START.union(Class::NUMBER_MID),
    );
    let table = mark(table, b"-+.", Class::NUMBER_MID);
    let table = mark(table, b"E", Class::NUMBER_MID.union(Class::PROTEIN));
    mark(table, b"#", Class::COMMENT)
}

/// The classification of every 7-bit code point.
static TABLE: [Class; TABLE_SIZE] = build();

/// Classifies a character.
///
/// Anything outside of the 7-bit range is junk.
///
/// # Examples
///
/// ```
/// use bgfile::class::Class;
/// use bgfile::class::classify;
///
/// assert_eq!(classify('a'), Class::DNA | Class::PROTEIN);
/// assert!(classify('e').intersects(Class::NUMBER_MID));
/// assert!(classify('e').intersects(Class::PROTEIN));
/// assert_eq!(classify('λ'), Class::JUNK);
/// ```
pub fn classify(c: char) -> Class {
    match usize::try_from(u32::from(c)) {
        Ok(code) if code < TABLE_SIZE => TABLE[code],
        _ => Class::JUNK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace() {
        for c in [' ', '\t', '\x0c', '\n', '\r'] {
            assert_eq!(classify(c), Class::WHITESPACE);
        }
    }

    #[test]
    fn test_numbers() {
        for c in '0'..='9' {
            assert_eq!(classify(c), Class::NUMBER_START | Class::NUMBER_MID);
        }

        for c in ['-', '+', '.'] {
            assert_eq!(classify(c), Class::NUMBER_MID);
            assert!(!classify(c).intersects(Class::NUMBER_START));
        }
    }

    #[test]
    fn test_letters_ignore_case() {
        for c in ('a'..='z').chain('A'..='Z') {
            let class = classify(c);
            assert_eq!(class, classify(c.to_ascii_lowercase()));
            assert_eq!(class, classify(c.to_ascii_uppercase()));
        }
    }

    #[test]
    fn test_letters() {
        for c in "ACGT".chars() {
            assert_eq!(classify(c), Class::DNA | Class::PROTEIN);
        }

        for c in "DFHIKLMNPQRSVWY".chars() {
            assert_eq!(classify(c), Class::PROTEIN);
        }

        assert_eq!(classify('E'), Class::PROTEIN | Class::NUMBER_MID);

        for c in "BJOUXZ".chars() {
            assert_eq!(classify(c), Class::JUNK);
        }
    }

    #[test]
    fn test_other() {
        assert_eq!(classify('#'), Class::COMMENT);
        assert_eq!(classify('\0'), Class::JUNK);
        assert_eq!(classify('\u{7f}'), Class::JUNK);
        assert_eq!(classify('\u{80}'), Class::JUNK);
    }
}

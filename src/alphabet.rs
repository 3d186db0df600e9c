//! Alphabets that a background model may be expressed in.

pub mod rank;

use std::str::FromStr;

/// The letters of the DNA alphabet, in rank order.
pub const DNA_LETTERS: &str = "ACGT";

/// The letters of the protein alphabet, in rank order.
pub const PROTEIN_LETTERS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// An error related to the parsing of an alphabet name.
#[derive(Debug)]
pub struct ParseAlphabetError(String);

impl std::fmt::Display for ParseAlphabetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse alphabet error: {} is not a valid alphabet", self.0)
    }
}

impl std::error::Error for ParseAlphabetError {}

/// The alphabet of a background model.
///
/// A background file never declares its alphabet, so a parse begins at
/// [`Alphabet::Unknown`] and settles on [`Alphabet::Dna`] or
/// [`Alphabet::Protein`] once the data allows it.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Alphabet {
    /// Not yet determined.
    #[default]
    Unknown,
    /// The four letter DNA alphabet (`ACGT`).
    Dna,
    /// The twenty letter protein alphabet.
    Protein,
}

impl Alphabet {
    /// Gets the letters of the alphabet in rank order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::Alphabet;
    ///
    /// assert_eq!(Alphabet::Dna.letters(), Some("ACGT"));
    /// assert_eq!(Alphabet::Unknown.letters(), None);
    /// ```
    pub fn letters(&self) -> Option<&'static str> {
        match self {
            Alphabet::Unknown => None,
            Alphabet::Dna => Some(DNA_LETTERS),
            Alphabet::Protein => Some(PROTEIN_LETTERS),
        }
    }

    /// Gets the number of letters in the alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::Alphabet;
    ///
    /// assert_eq!(Alphabet::Dna.size(), Some(4));
    /// assert_eq!(Alphabet::Protein.size(), Some(20));
    /// ```
    pub fn size(&self) -> Option<usize> {
        self.letters().map(str::len)
    }

    /// Gets the canonical (uppercase) name of the alphabet.
    pub fn name(&self) -> &'static str {
        match self {
            Alphabet::Unknown => "UNKNOWN",
            Alphabet::Dna => "DNA",
            Alphabet::Protein => "PROTEIN",
        }
    }

    /// The single bit representing this alphabet within an [`AlphabetSet`].
    fn bit(&self) -> u8 {
        match self {
            Alphabet::Unknown => 0,
            Alphabet::Dna => 1 << 1,
            Alphabet::Protein => 1 << 2,
        }
    }
}

impl FromStr for Alphabet {
    type Err = ParseAlphabetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("DNA") {
            Ok(Self::Dna)
        } else if s.eq_ignore_ascii_case("PROTEIN") {
            Ok(Self::Protein)
        } else {
            Err(ParseAlphabetError(s.to_string()))
        }
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alphabet::Unknown => write!(f, "unknown alphabet"),
            Alphabet::Dna => write!(f, "DNA"),
            Alphabet::Protein => write!(f, "protein"),
        }
    }
}

/// A set of alphabets, used to describe which alphabets are acceptable.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AlphabetSet(u8);

impl AlphabetSet {
    /// Creates an empty [`AlphabetSet`].
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Creates an [`AlphabetSet`] containing every known alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::Alphabet;
    /// use bgfile::alphabet::AlphabetSet;
    ///
    /// let set = AlphabetSet::all();
    /// assert!(set.contains(Alphabet::Dna));
    /// assert!(set.contains(Alphabet::Protein));
    /// assert_eq!(set.to_string(), "DNA or protein");
    /// ```
    pub fn all() -> Self {
        [Alphabet::Dna, Alphabet::Protein].into_iter().collect()
    }

    /// Adds an alphabet to the set.
    pub fn insert(&mut self, alphabet: Alphabet) {
        self.0 |= alphabet.bit();
    }

    /// Returns whether the set contains the alphabet.
    pub fn contains(&self, alphabet: Alphabet) -> bool {
        (self.0 & alphabet.bit()) != 0
    }

    /// Returns whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates over the alphabets within the set.
    pub fn iter(&self) -> impl Iterator<Item = Alphabet> + '_ {
        [Alphabet::Dna, Alphabet::Protein]
            .into_iter()
            .filter(|alphabet| self.contains(*alphabet))
    }
}

impl Default for AlphabetSet {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Alphabet> for AlphabetSet {
    fn from(alphabet: Alphabet) -> Self {
        Self(alphabet.bit())
    }
}

impl FromIterator<Alphabet> for AlphabetSet {
    fn from_iter<I: IntoIterator<Item = Alphabet>>(iter: I) -> Self {
        let mut set = Self::empty();

        for alphabet in iter {
            set.insert(alphabet);
        }

        set
    }
}

impl std::fmt::Display for AlphabetSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.iter().map(|a| a.to_string()).collect::<Vec<_>>();

        match names.as_slice() {
            [] => write!(f, "{}", Alphabet::Unknown),
            [name] => write!(f, "{name}"),
            [init @ .., second_last, last] => {
                for name in init {
                    write!(f, "{name}, ")?;
                }

                write!(f, "{second_last} or {last}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_from_str() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("DNA".parse::<Alphabet>()?, Alphabet::Dna);
        assert_eq!("dna".parse::<Alphabet>()?, Alphabet::Dna);
        assert_eq!("Protein".parse::<Alphabet>()?, Alphabet::Protein);

        let err = "RNA".parse::<Alphabet>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse alphabet error: RNA is not a valid alphabet"
        );

        Ok(())
    }

    #[test]
    fn test_alphabet_display() {
        assert_eq!(Alphabet::Unknown.to_string(), "unknown alphabet");
        assert_eq!(Alphabet::Dna.to_string(), "DNA");
        assert_eq!(Alphabet::Protein.to_string(), "protein");
    }

    #[test]
    fn test_alphabet_set() {
        let mut set = AlphabetSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "unknown alphabet");

        set.insert(Alphabet::Protein);
        assert!(!set.contains(Alphabet::Dna));
        assert!(set.contains(Alphabet::Protein));
        assert_eq!(set.to_string(), "protein");

        set.insert(Alphabet::Unknown);
        assert_eq!(set, AlphabetSet::from(Alphabet::Protein));
        assert!(!set.contains(Alphabet::Unknown));
    }
}

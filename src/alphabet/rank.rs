//! Ranks of letters within a fixed alphabet.

use crate::alphabet::Alphabet;
use crate::alphabet::DNA_LETTERS;
use crate::alphabet::PROTEIN_LETTERS;

/// The number of entries in a rank table (the 7-bit code points).
const TABLE_SIZE: usize = 128;

/// A lookup from a letter to its 1-based rank within an alphabet.
///
/// Lookups are case-insensitive and a rank of zero means the letter is not
/// part of the alphabet.
#[derive(Clone, Debug)]
pub struct RankMap {
    /// The letters of the alphabet.
    letters: &'static str,

    /// The rank of each 7-bit code point.
    ranks: [u8; TABLE_SIZE],
}

impl RankMap {
    /// Builds the rank table for a set of uppercase letters.
    const fn new(letters: &'static str) -> Self {
        let bytes = letters.as_bytes();
        let mut ranks = [0u8; TABLE_SIZE];
        let mut i = 0;

        while i < bytes.len() {
            ranks[bytes[i] as usize] = (i + 1) as u8;
            ranks[bytes[i].to_ascii_lowercase() as usize] = (i + 1) as u8;
            i += 1;
        }

        Self { letters, ranks }
    }

    /// Gets the 1-based rank of a character, or zero if the character is not
    /// within the alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::alphabet::rank;
    ///
    /// assert_eq!(rank::DNA.rank('A'), 1);
    /// assert_eq!(rank::DNA.rank('t'), 4);
    /// assert_eq!(rank::DNA.rank('D'), 0);
    /// assert_eq!(rank::PROTEIN.rank('D'), 3);
    /// ```
    pub fn rank(&self, c: char) -> usize {
        match usize::try_from(u32::from(c)) {
            Ok(code) if code < TABLE_SIZE => self.ranks[code] as usize,
            _ => 0,
        }
    }

    /// Gets the number of letters in the alphabet.
    pub fn size(&self) -> usize {
        self.letters.len()
    }

    /// Gets the letters of the alphabet in rank order.
    pub fn letters(&self) -> &'static str {
        self.letters
    }
}

/// Ranks within the DNA alphabet.
pub static DNA: RankMap = RankMap::new(DNA_LETTERS);

/// Ranks within the protein alphabet.
pub static PROTEIN: RankMap = RankMap::new(PROTEIN_LETTERS);

/// Gets the rank map for an alphabet.
///
/// Protein ranks are used while the alphabet is still unknown, as every DNA
/// letter is also a protein letter.
pub fn for_alphabet(alphabet: Alphabet) -> &'static RankMap {
    match alphabet {
        Alphabet::Dna => &DNA,
        Alphabet::Protein | Alphabet::Unknown => &PROTEIN,
    }
}

//! Chains of letters which key the probabilities of a background model.
//!
//! A chain of letters `c1 c2 ... cn` over an alphabet of size `L` is encoded
//! as the bijective base-`L` numeral `((r1 * L + r2) * L + ...) + rn`, where
//! each `ri` is the 1-based rank of the letter. Every chain of every length
//! gets a distinct index, and all chains of length `n` occupy one contiguous
//! run (a _band_) of indices. Subtracting one gives the slot of the chain in a
//! flat probability store.

use crate::alphabet::rank::RankMap;

/// A chain of letters being accumulated during a parse.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Chain {
    /// The letters as they were read.
    letters: String,

    /// The encoded (1-based) index of the letters.
    index: usize,
}

impl Chain {
    /// Clears the chain so a new one may be read.
    pub fn clear(&mut self) {
        self.letters.clear();
        self.index = 0;
    }

    /// Appends a letter to the chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::alphabet::rank;
    /// use bgfile::chain::Chain;
    ///
    /// let mut chain = Chain::default();
    /// chain.push('C', &rank::DNA);
    /// chain.push('a', &rank::DNA);
    ///
    /// assert_eq!(chain.letters(), "Ca");
    /// assert_eq!(chain.slot(), Some(8));
    /// ```
    pub fn push(&mut self, c: char, ranks: &RankMap) {
        self.letters.push(c);
        self.index = self.index * ranks.size() + ranks.rank(c);
    }

    /// Recomputes the index of the chain against another alphabet.
    ///
    /// Returns the first letter that does not belong to the alphabet, in which
    /// case the chain is left untouched.
    pub fn rebase(&mut self, ranks: &RankMap) -> Option<char> {
        let mut index = 0;

        for c in self.letters.chars() {
            match ranks.rank(c) {
                0 => return Some(c),
                rank => index = index * ranks.size() + rank,
            }
        }

        self.index = index;
        None
    }

    /// Gets the letters of the chain.
    pub fn letters(&self) -> &str {
        &self.letters
    }

    /// Gets the number of letters in the chain.
    pub fn len(&self) -> usize {
        self.letters.chars().count()
    }

    /// Returns whether the chain has no letters.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Gets the slot of the chain within a probability store.
    ///
    /// Returns [`None`] for an empty chain.
    pub fn slot(&self) -> Option<usize> {
        self.index.checked_sub(1)
    }
}

/// Encodes a chain of letters into its slot.
///
/// Returns [`None`] if the chain is empty or contains a letter outside the
/// alphabet.
///
/// # Examples
///
/// ```
/// use bgfile::alphabet::rank;
/// use bgfile::chain;
///
/// assert_eq!(chain::encode("A", &rank::DNA), Some(0));
/// assert_eq!(chain::encode("T", &rank::DNA), Some(3));
/// assert_eq!(chain::encode("AA", &rank::DNA), Some(4));
/// assert_eq!(chain::encode("AX", &rank::DNA), None);
/// ```
pub fn encode(letters: &str, ranks: &RankMap) -> Option<usize> {
    let mut chain = Chain {
        letters: letters.to_string(),
        index: 0,
    };

    match chain.rebase(ranks) {
        Some(_) => None,
        None => chain.slot(),
    }
}

/// Decodes a slot into the letters of its chain.
///
/// # Examples
///
/// ```
/// use bgfile::chain;
///
/// assert_eq!(chain::decode(0, "ACGT"), "A");
/// assert_eq!(chain::decode(4, "ACGT"), "AA");
/// assert_eq!(chain::decode(8, "ACGT"), "CA");
/// assert_eq!(chain::decode(19, "ACGT"), "TT");
/// ```
pub fn decode(slot: usize, letters: &str) -> String {
    let letters = letters.as_bytes();
    let size = letters.len();
    let mut decoded = Vec::new();
    let mut index = slot + 1;

    while index > 0 {
        let digit = (index - 1) % size;
        decoded.push(letters[digit] as char);
        index = (index - 1) / size;
    }

    decoded.iter().rev().collect()
}

/// Gets the first slot of the band holding chains of the given length.
///
/// # Examples
///
/// ```
/// use bgfile::chain;
///
/// assert_eq!(chain::band_start(1, 4), 0);
/// assert_eq!(chain::band_start(2, 4), 4);
/// assert_eq!(chain::band_start(3, 4), 20);
/// ```
pub fn band_start(length: usize, size: usize) -> usize {
    (1..length).map(|n| band_len(n, size)).sum()
}

/// Gets the number of slots in the band holding chains of the given length.
pub fn band_len(length: usize, size: usize) -> usize {
    size.pow(length as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::rank;

    #[test]
    fn test_every_slot_round_trips() {
        for slot in 0..(4 + 16 + 64) {
            let letters = decode(slot, rank::DNA.letters());
            assert_eq!(encode(&letters, &rank::DNA), Some(slot));
        }
    }

    #[test]
    fn test_bands_are_contiguous() {
        for length in 1..4 {
            let start = band_start(length, 20);
            let end = start + band_len(length, 20);
            assert_eq!(decode(start, rank::PROTEIN.letters()).len(), length);
            assert_eq!(decode(end - 1, rank::PROTEIN.letters()).len(), length);
            assert_eq!(decode(end, rank::PROTEIN.letters()).len(), length + 1);
        }
    }

    #[test]
    fn test_rebase() {
        let mut chain = Chain::default();
        chain.push('G', &rank::PROTEIN);
        chain.push('T', &rank::PROTEIN);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.slot(), Some(6 * 20 + 17 - 1));

        assert_eq!(chain.rebase(&rank::DNA), None);
        assert_eq!(chain.slot(), Some(3 * 4 + 4 - 1));

        chain.push('W', &rank::PROTEIN);
        let slot = chain.slot();
        assert_eq!(chain.rebase(&rank::DNA), Some('W'));
        assert_eq!(chain.slot(), slot);
    }

    #[test]
    fn test_empty_chain() {
        let mut chain = Chain::default();
        assert!(chain.is_empty());
        assert_eq!(chain.slot(), None);
        assert_eq!(encode("", &rank::DNA), None);

        chain.push('A', &rank::DNA);
        chain.clear();
        assert!(chain.is_empty());
    }
}

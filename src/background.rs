//! Markov background models.

use crate::alphabet::rank;
use crate::alphabet::Alphabet;
use crate::chain;
use crate::parser::Store;

/// A Markov background model read from a background file.
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    /// The alphabet.
    alphabet: Alphabet,

    /// The order of the model.
    order: usize,

    /// The probability of every chain, by slot.
    probabilities: Store,
}

impl Background {
    /// Creates a new [`Background`].
    ///
    /// Returns [`None`] if the alphabet is unknown or if the store does not
    /// hold a probability for every chain up to `order + 1` letters long.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::alphabet::Alphabet;
    /// use bgfile::background::Background;
    /// use bgfile::parser::Store;
    ///
    /// let mut store = Store::new(4);
    /// assert!(Background::new(Alphabet::Dna, 0, store.clone()).is_none());
    ///
    /// for slot in 0..4 {
    ///     store.set(slot, 0.25);
    /// }
    ///
    /// let background = Background::new(Alphabet::Dna, 0, store).unwrap();
    /// assert_eq!(background.probability("A"), Some(0.25));
    /// ```
    pub fn new(alphabet: Alphabet, order: usize, probabilities: Store) -> Option<Self> {
        let size = alphabet.size()?;
        let expected = chain::band_start(order + 2, size);

        if probabilities.len() != expected || !probabilities.missing(0).is_empty() {
            return None;
        }

        Some(Self {
            alphabet,
            order,
            probabilities,
        })
    }

    /// Gets the alphabet.
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Gets the order of the model.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Gets the probability of a chain (case-insensitive).
    pub fn probability(&self, chain: &str) -> Option<f64> {
        chain::encode(chain, rank::for_alphabet(self.alphabet))
            .and_then(|slot| self.probabilities.get(slot))
    }

    /// Gets every chain along with its probability, shortest chains first.
    pub fn iter(&self) -> impl Iterator<Item = (String, f64)> + '_ {
        let letters = rank::for_alphabet(self.alphabet).letters();

        self.probabilities
            .as_slice()
            .iter()
            .enumerate()
            .map(move |(slot, p)| (chain::decode(slot, letters), *p))
    }
}

impl std::fmt::Display for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "# {} background model of order {}",
            self.alphabet, self.order
        )?;

        let size = self.alphabet.size().unwrap_or_default();
        let mut length = 0;

        for (slot, (chain, p)) in self.iter().enumerate() {
            if slot == chain::band_start(length + 1, size) {
                length += 1;
                writeln!(f, "# order {}", length - 1)?;
            }

            writeln!(f, "{chain} {p:.3e}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_dna(order: usize) -> Background {
        let len = chain::band_start(order + 2, 4);
        let mut store = Store::new(len);

        for length in 1..=order + 1 {
            let start = chain::band_start(length, 4);
            let band = chain::band_len(length, 4);

            for slot in start..start + band {
                store.set(slot, 1.0 / band as f64);
            }
        }

        Background::new(Alphabet::Dna, order, store).unwrap()
    }

    #[test]
    fn test_display() {
        let background = uniform_dna(1);
        let text = background.to_string();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "# DNA background model of order 1");
        assert_eq!(lines[1], "# order 0");
        assert_eq!(lines[2], "A 2.500e-1");
        assert_eq!(lines[6], "# order 1");
        assert_eq!(lines[7], "AA 6.250e-2");
        assert_eq!(lines.last(), Some(&"TT 6.250e-2"));
        assert_eq!(lines.len(), 23);
    }

    #[test]
    fn test_probability() {
        let background = uniform_dna(2);

        assert_eq!(background.order(), 2);
        assert_eq!(background.probability("gat"), Some(1.0 / 64.0));
        assert_eq!(background.probability("GATC"), None);
        assert_eq!(background.probability("N"), None);
    }

    #[test]
    fn test_incomplete_store() {
        assert!(Background::new(Alphabet::Dna, 1, Store::new(4)).is_none());
        assert!(Background::new(Alphabet::Unknown, 0, Store::new(4)).is_none());
    }
}

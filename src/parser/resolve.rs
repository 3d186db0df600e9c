//! Deciding between the DNA and protein alphabets.

use crate::alphabet::rank;
use crate::alphabet::DNA_LETTERS;
use crate::parser::Store;

/// Letters which belong to the protein alphabet but not to the DNA alphabet.
const PROTEIN_ONLY_LETTERS: &str = "DEFHIKLMNPQRSVWY";

/// The outcome of resolving the alphabet.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// Only DNA letters were given probabilities. The store holds the
    /// probabilities of the single letter chains, re-indexed for DNA.
    Dna(Store),

    /// At least one protein-only letter was given a probability.
    Protein,
}

/// Resolves the alphabet from the probabilities of single letter chains that
/// were stored against the protein alphabet.
///
/// # Examples
///
/// ```
/// use bgfile::alphabet::rank;
/// use bgfile::parser::resolve::resolve;
/// use bgfile::parser::resolve::Resolution;
/// use bgfile::parser::Store;
///
/// let mut store = Store::new(20);
/// store.set(rank::PROTEIN.rank('T') - 1, 0.5);
///
/// match resolve(&store) {
///     Resolution::Dna(dna) => assert_eq!(dna.get(3), Some(0.5)),
///     Resolution::Protein => unreachable!(),
/// }
///
/// store.set(rank::PROTEIN.rank('W') - 1, 0.5);
/// assert_eq!(resolve(&store), Resolution::Protein);
/// ```
pub fn resolve(store: &Store) -> Resolution {
    let is_protein = PROTEIN_ONLY_LETTERS
        .chars()
        .any(|c| store.is_set(rank::PROTEIN.rank(c) - 1));

    if is_protein {
        return Resolution::Protein;
    }

    Resolution::Dna(store.select(DNA_LETTERS.chars().map(|c| rank::PROTEIN.rank(c) - 1)))
}

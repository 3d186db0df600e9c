//! `bgfile` is a crate for validating and reading Markov background model
//! files.
//!
//! A background file gives the probability of every chain of letters, from
//! single letters up to chains one longer than the order of the model, over
//! either the DNA or the protein alphabet. The alphabet is never declared and
//! is instead inferred from the letters that were given probabilities.
//!
//! The crate provides two main points of entry:
//!
//! - Parsing a file with a [`Reader`] (or by pushing chunks into a
//!   [`parser::Parser`] directly) while receiving every
//!   [fault](crate::fault::Fault) through a [`handler::Handler`].
//! - Collecting those faults with [`diagnostics::Diagnostics`] into a
//!   [summary](crate::diagnostics::Summary) of errors and warnings that can be
//!   shown to a user.
//!
//! The parser recovers from problems within a line by skipping to the next
//! one, so a single pass reports as many problems as possible. Files that are
//! not plain UTF-8 text (compressed, binary or in another encoding) are
//! refused outright.
//!
//! ```
//! use bgfile::Alphabet;
//! use bgfile::diagnostics::Diagnostics;
//!
//! let data = b"# order 0\nA 0.3\nC 0.2\nG 0.2\nT 0.3\n";
//! let mut diagnostics = Diagnostics::default();
//!
//! let parser = bgfile::Reader::from(&data[..]).parse(&mut diagnostics)?;
//! assert!(!diagnostics.summary().is_error());
//!
//! let background = parser.background().unwrap();
//! assert_eq!(background.alphabet(), Alphabet::Dna);
//! assert_eq!(background.probability("T"), Some(0.3));
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod alphabet;
pub mod background;
pub mod chain;
pub mod class;
pub mod decoder;
pub mod diagnostics;
pub mod fault;
pub mod handler;
pub mod parser;
pub mod reader;
pub mod sniff;

pub use alphabet::Alphabet;
pub use background::Background;

pub use self::reader::Reader;

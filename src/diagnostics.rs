//! Collecting the faults of a background file into a summary for the user.
//!
//! [`Diagnostics`] is a [`Handler`] that sorts every fault into a bucket by
//! its kind. Once the parse is over, [`Diagnostics::summary`] turns those
//! buckets into the [messages](Message) to show, errors first and in a fixed
//! order.
//!
//! ```
//! use bgfile::diagnostics::Diagnostics;
//!
//! let data = b"A 0.25\nC 0.25\nG 0.25\n";
//! let mut diagnostics = Diagnostics::default();
//! bgfile::Reader::from(&data[..]).parse(&mut diagnostics)?;
//!
//! let summary = diagnostics.summary();
//! assert!(summary.is_error());
//! assert_eq!(summary.messages()[0].message(), "Missing entries");
//! assert_eq!(summary.messages()[0].reasons(), ["Did not find the entry for T"]);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::alphabet::rank;
use crate::alphabet::Alphabet;
use crate::alphabet::AlphabetSet;
use crate::chain;
use crate::fault::Fault;
use crate::fault::Kind;
use crate::handler::Handler;
use crate::sniff::Format;
use crate::sniff::FormatKind;

mod faults;
mod summary;

pub use faults::Faults;
pub use summary::Message;
pub use summary::Summary;

/// The default size above which a file is considered large.
pub const DEFAULT_FILE_MAX: u64 = 1 << 20;

/// The number of missing chains or chain lengths listed before the rest are
/// elided.
const LIST_MAX: usize = 10;

/// Advice for files which are not plain text.
const PLAIN_TEXT_HELP: &str =
    " - re-save as plain text; either Unicode UTF-8 (no Byte Order Mark) or ASCII";

/// Options for [`Diagnostics`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Options {
    /// The size above which a file is considered large.
    file_max: Option<u64>,

    /// The alphabets which are acceptable.
    alphabets: AlphabetSet,
}

impl Options {
    /// Sets the size above which a file is considered large (or [`None`] to
    /// never warn about large files).
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::diagnostics::Options;
    ///
    /// let options = Options::default().with_file_max(None);
    /// assert_eq!(options.file_max(), None);
    /// ```
    pub fn with_file_max(mut self, file_max: Option<u64>) -> Self {
        self.file_max = file_max;
        self
    }

    /// Sets the alphabets which are acceptable.
    pub fn with_alphabets(mut self, alphabets: AlphabetSet) -> Self {
        self.alphabets = alphabets;
        self
    }

    /// Gets the size above which a file is considered large.
    pub fn file_max(&self) -> Option<u64> {
        self.file_max
    }

    /// Gets the alphabets which are acceptable.
    pub fn alphabets(&self) -> AlphabetSet {
        self.alphabets
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            file_max: Some(DEFAULT_FILE_MAX),
            alphabets: AlphabetSet::all(),
        }
    }
}

/// Collects the events of a parse.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    /// The options.
    options: Options,

    /// Whether anything changed since the flag was last cleared.
    updated: bool,

    /// The fraction of the file processed.
    fraction: f64,

    /// The size of the file.
    file_size: u64,

    /// The alphabet of the file.
    alphabet: Alphabet,

    /// The format of the file, if it is not plain text.
    format: Option<Format>,

    /// The encoding error, if the file is not valid UTF-8.
    encoding: Option<String>,

    /// Syntax errors.
    syntax: Faults,

    /// Letters outside the alphabet.
    mismatches: Faults,

    /// Duplicated chains.
    duplicates: Faults,

    /// Whether the file could not be read as text at all.
    fatal: bool,

    /// The slots of the first few missing chains.
    missing: Vec<usize>,

    /// The number of missing chains.
    missing_count: usize,

    /// The chain lengths whose probabilities do not sum to one.
    bad_sums: Vec<usize>,
}

impl Diagnostics {
    /// Creates a new [`Diagnostics`].
    pub fn new(options: Options) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Replaces the options.
    pub fn configure(&mut self, options: Options) {
        self.options = options;
    }

    /// Forgets everything collected so far, keeping the options.
    pub fn reset(&mut self) {
        *self = Self::new(self.options);
    }

    /// Gets the options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns whether anything changed since [`Diagnostics::clear_updated`]
    /// was last called.
    pub fn is_updated(&self) -> bool {
        self.updated
    }

    /// Clears the flag returned by [`Diagnostics::is_updated`].
    pub fn clear_updated(&mut self) {
        self.updated = false;
    }

    /// Gets the fraction of the file processed.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Gets the size of the file.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Gets the alphabet of the file.
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Returns whether the file could not be read as text at all (it is in
    /// another format or is not valid UTF-8).
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// Summarises everything collected.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::new(self.alphabet);

        // (1) Large files are allowed, but they are worth a warning.
        if let Some(file_max) = self.options.file_max {
            if self.file_size > file_max {
                let megabytes = (self.file_size as f64 / (1u64 << 20) as f64).round();
                summary.add(false, "Large file", vec![format!("File is {megabytes}MB")]);
            }
        }

        // (2) Nothing else is worth reporting for a file that is not text.
        if let Some(format) = &self.format {
            let message = match format.kind() {
                FormatKind::Encoding => {
                    format!("Bad encoding \"{}\"{PLAIN_TEXT_HELP}", format.name())
                }
                FormatKind::Binary => format!("Bad format \"{}\"{PLAIN_TEXT_HELP}", format.name()),
                FormatKind::Compressed => {
                    format!("Bad format \"{}\" - must be decompressed first", format.name())
                }
            };

            summary.add(true, message, Vec::new());
            return summary;
        }

        if let Some(encoding) = &self.encoding {
            summary.add(
                true,
                format!("Bad encoding{PLAIN_TEXT_HELP}"),
                vec![encoding.clone()],
            );
            return summary;
        }

        // (3) The content.
        if !self.syntax.is_empty() {
            let reason = format!(
                "Incorrect syntax on {} {}",
                plural_lines(self.syntax.line_count()),
                self.syntax.lines()
            );
            summary.add(true, "Syntax errors", vec![reason]);
        }

        if !self.mismatches.is_empty() {
            let letters = self.mismatches.letters();

            let found = match (self.mismatches.count(), letters.is_empty()) {
                (1, true) => String::from("Found a character"),
                (1, false) => format!("Found a character {letters}"),
                (count, true) => format!("Found {count} characters"),
                (count, false) => format!("Found {count} characters (including {letters})"),
            };

            let reason = format!(
                "{found} not in the detected {} alphabet on {} {}",
                self.alphabet,
                plural_lines(self.mismatches.line_count()),
                self.mismatches.lines()
            );
            summary.add(true, "Alphabet is inconsistant", vec![reason]);
        }

        if !self.duplicates.is_empty() {
            let reason = if self.duplicates.count() == 1 {
                format!("Found a duplicated entry on line {}", self.duplicates.lines())
            } else {
                format!(
                    "Found {} duplicated entries on lines {}",
                    self.duplicates.line_count(),
                    self.duplicates.lines()
                )
            };
            summary.add(true, "Duplicated entries", vec![reason]);
        }

        if self.missing_count > 0 {
            let letters = rank::for_alphabet(self.alphabet).letters();
            let chains = self
                .missing
                .iter()
                .map(|slot| chain::decode(*slot, letters))
                .collect::<Vec<_>>();

            let reason = match (self.missing_count, chains.as_slice()) {
                (1, [chain]) => format!("Did not find the entry for {chain}"),
                (count, chains) => format!(
                    "Did not find {count} entries for {}",
                    elide(chains, count)
                ),
            };
            summary.add(true, "Missing entries", vec![reason]);
        }

        if !self.bad_sums.is_empty() {
            let reason = match self.bad_sums.as_slice() {
                [length] => format!(
                    "The probabilities did not sum to 1 for the entries of length {length}"
                ),
                lengths => format!(
                    "The probabilities did not sum to 1 for multiple entry lengths {}",
                    elide(lengths, lengths.len())
                ),
            };
            summary.add(true, "Probabilities should sum to 1", vec![reason]);
        }

        // (4) A well formed file can still be the wrong kind of file.
        if self.alphabet != Alphabet::Unknown && !self.options.alphabets.contains(self.alphabet) {
            let reason = format!(
                "The background was {} but {} was expected",
                self.alphabet, self.options.alphabets
            );
            summary.add(true, "Background is wrong alphabet", vec![reason]);
        }

        summary
    }
}

impl Handler for Diagnostics {
    fn begin(&mut self, size: u64) {
        self.reset();
        self.file_size = size;
        self.updated = true;
    }

    fn progress(&mut self, fraction: f64, alphabet: Alphabet) {
        self.fraction = fraction;

        if self.alphabet != alphabet {
            self.alphabet = alphabet;
            self.updated = true;
        }
    }

    fn error(&mut self, fault: Fault) {
        let line = fault.position().line();

        if fault.kind().is_fatal() {
            self.fatal = true;
        }

        match fault.kind() {
            Kind::Format(format) => self.format = Some(*format),
            Kind::Encoding(_) => self.encoding = Some(fault.message().to_string()),
            Kind::AlphabetMismatch(letter) => self.mismatches.add(line, Some(*letter)),
            Kind::Duplicate => self.duplicates.add(line, None),
            Kind::MissingChain(missing) => {
                // Only the chains that can be listed are kept.
                let room = (LIST_MAX + 1).saturating_sub(self.missing.len());
                self.missing.extend(missing.iter().copied().take(room));
                self.missing_count += missing.len();
            }
            Kind::IncorrectSum { chain_length, .. } => self.bad_sums.push(*chain_length),
            kind if kind.is_syntax() => self.syntax.add(line, None),
            _ => {}
        }

        self.updated = true;
    }

    fn end(&mut self, alphabet: Alphabet) {
        self.alphabet = alphabet;
        self.updated = true;
    }
}

/// Gets the word for one or more lines.
fn plural_lines(count: u64) -> &'static str {
    if count == 1 {
        "line"
    } else {
        "lines"
    }
}

/// Lists at most the first ten of `total` items, for example `A, C and G` or
/// `AA, AC, ..., GG, ...`.
///
/// Only the leading items need to be given: the last one is only shown when
/// the list fits, so at most eleven are ever looked at.
fn elide<T>(items: &[T], total: usize) -> String
where
    T: std::fmt::Display,
{
    let shown = LIST_MAX.min(total.saturating_sub(1)).min(items.len());

    let mut text = items[..shown]
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    match items.get(shown) {
        Some(last) if shown + 1 == total => text.push_str(&format!(" and {last}")),
        _ => text.push_str(", ..."),
    }

    text
}

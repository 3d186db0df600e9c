//! Bookkeeping of the lines (and letters) where one kind of fault was found.

use std::sync::LazyLock;

use regex::Regex;

/// The default number of line spans kept.
pub const DEFAULT_LINE_MAX: usize = 10;

/// The default number of offending letters kept.
pub const DEFAULT_LETTER_MAX: usize = 5;

/// Characters which cannot be shown to a user: control, format, surrogate,
/// private use and unassigned code points.
static HIDDEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{C}").unwrap());

/// A run of consecutive 0-based lines.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Span {
    /// The first line.
    begin: u64,

    /// The last line.
    end: u64,
}

impl Span {
    /// Gets the number of lines in the span.
    fn len(&self) -> u64 {
        self.end - self.begin + 1
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.begin == self.end {
            write!(f, "{}", self.begin + 1)
        } else {
            write!(f, "{}-{}", self.begin + 1, self.end + 1)
        }
    }
}

/// The faults of one kind found within a file.
///
/// Faults are expected in order of their line. Consecutive lines are merged
/// into a single span and only the first few spans and distinct letters are
/// kept, although every fault and every line is counted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Faults {
    /// The number of faults.
    count: usize,

    /// The number of spans to keep.
    line_max: usize,

    /// The number of distinct lines with a fault.
    line_count: u64,

    /// The spans of lines kept.
    spans: Vec<Span>,

    /// The number of letters to keep.
    letter_max: usize,

    /// The letters kept, in the order they were found.
    letters: Vec<char>,
}

impl Faults {
    /// Creates an empty [`Faults`] keeping at most `line_max` spans of lines
    /// (at least one) and `letter_max` letters.
    pub fn new(line_max: usize, letter_max: usize) -> Self {
        Self {
            count: 0,
            line_max: line_max.max(1),
            line_count: 0,
            spans: Vec::new(),
            letter_max,
            letters: Vec::new(),
        }
    }

    /// Records a fault on a 0-based line, along with the offending letter if
    /// there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::diagnostics::Faults;
    ///
    /// let mut faults = Faults::default();
    /// faults.add(0, None);
    /// faults.add(2, None);
    /// faults.add(3, None);
    /// faults.add(3, None);
    ///
    /// assert_eq!(faults.count(), 4);
    /// assert_eq!(faults.line_count(), 3);
    /// assert_eq!(faults.lines(), "1 and 3-4");
    /// ```
    pub fn add(&mut self, line: u64, letter: Option<char>) {
        self.count += 1;

        if let Some(letter) = letter {
            if self.letters.len() < self.letter_max
                && !self.letters.contains(&letter)
                && !HIDDEN.is_match(letter.encode_utf8(&mut [0; 4]))
            {
                self.letters.push(letter);
            }
        }

        match self.spans.last_mut() {
            None => {
                self.line_count += 1;
                self.spans.push(Span {
                    begin: line,
                    end: line,
                });
            }
            Some(last) if line == last.end + 1 => {
                self.line_count += 1;
                last.end = line;
            }
            Some(last) if line > last.end => {
                self.line_count += 1;

                if self.spans.len() < self.line_max {
                    self.spans.push(Span {
                        begin: line,
                        end: line,
                    });
                }
            }
            Some(_) => {}
        }
    }

    /// Gets the number of faults.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns whether there are no faults.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Gets the number of distinct lines with a fault.
    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    /// Lists the 1-based lines with a fault, for example `1, 3-5 and 9`.
    ///
    /// A trailing `, ...` marks that more lines had faults than were kept.
    pub fn lines(&self) -> String {
        let mut text = String::new();
        let mut shown = 0;

        for (i, span) in self.spans.iter().enumerate() {
            shown += span.len();

            if i > 0 {
                if i == self.spans.len() - 1 && shown == self.line_count {
                    text.push_str(" and ");
                } else {
                    text.push_str(", ");
                }
            }

            text.push_str(&span.to_string());
        }

        if shown < self.line_count {
            text.push_str(", ...");
        }

        text
    }

    /// Lists the letters kept, for example `'X', 'Y' and 'Z'`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::diagnostics::Faults;
    ///
    /// let mut faults = Faults::default();
    /// faults.add(0, Some('X'));
    /// faults.add(1, Some('\u{7}'));
    /// faults.add(2, Some('X'));
    /// faults.add(3, Some('Z'));
    ///
    /// assert_eq!(faults.letters(), "'X' and 'Z'");
    /// ```
    pub fn letters(&self) -> String {
        let mut text = String::new();

        for (i, letter) in self.letters.iter().enumerate() {
            if i > 0 {
                if i == self.letters.len() - 1 {
                    text.push_str(" and ");
                } else {
                    text.push_str(", ");
                }
            }

            text.push('\'');
            text.push(*letter);
            text.push('\'');
        }

        text
    }
}

impl Default for Faults {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_MAX, DEFAULT_LETTER_MAX)
    }
}

//! States of the background file parser.

/// The state of the parser between characters.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum State {
    /// At the start of a line.
    #[default]
    Start,

    /// Skipping the rest of a line.
    Comment,

    /// Reading the letters of a chain.
    Chain,

    /// Between a chain and its probability.
    Gap,

    /// Reading a probability.
    Number,

    /// After a probability, expecting only whitespace.
    Trailing,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Start => write!(f, "start of line"),
            State::Comment => write!(f, "comment"),
            State::Chain => write!(f, "chain"),
            State::Gap => write!(f, "gap"),
            State::Number => write!(f, "number"),
            State::Trailing => write!(f, "trailing whitespace"),
        }
    }
}

//! An incremental parser for Markov background model files.
//!
//! A background file lists, one per line, a chain of letters followed by the
//! probability of that chain:
//!
//! ```text
//! # order 0
//! A 0.3
//! C 0.2
//! G 0.2
//! T 0.3
//! ```
//!
//! Chains of every length from one up to the order of the model plus one must
//! be present, and the probabilities of all chains of one length must sum to
//! one. The alphabet is never declared; it is inferred from the single letter
//! chains once the first longer chain is seen (or the input ends).
//!
//! The [`Parser`] is fed successive chunks of the file with [`Parser::push`]
//! and reports everything it finds to a [`Handler`]. Problems with the content
//! are reported as [faults](crate::fault::Fault) and parsing recovers at the
//! next line, whereas a file that is not text stops the parse immediately.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use nonempty::NonEmpty;
use tracing::debug;
use tracing::trace;

use crate::alphabet::rank;
use crate::alphabet::rank::RankMap;
use crate::alphabet::Alphabet;
use crate::background::Background;
use crate::chain::Chain;
use crate::class::classify;
use crate::class::Class;
use crate::decoder;
use crate::decoder::Decoder;
use crate::fault::Fault;
use crate::fault::Kind;
use crate::fault::Position;
use crate::handler::Handler;
use crate::sniff;

pub mod number;
pub mod resolve;
mod state;
mod store;

pub use state::State;
pub use store::Store;
pub use store::UNSET;

use resolve::Resolution;

/// The number of times a single character may be dispatched between states
/// before the parser gives up.
pub const MAX_DISPATCHES: usize = 8;

/// How far the sum of the probabilities of one chain length may stray from
/// one.
pub const SUM_TOLERANCE: f64 = 0.1;

/// The largest number of slots the probability store may grow to.
///
/// This holds a protein model of order 4 (3,368,420 slots) or a DNA model of
/// order 9 (1,398,100 slots). A file with longer chains ends the scan.
pub const MAX_SLOTS: usize = 1 << 22;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to a [`Parser`].
///
/// Problems with the input are never errors; they are reported as faults to
/// the [`Handler`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A character was handed between states too many times without being
    /// consumed.
    RunawayDispatch {
        /// The character.
        code: char,

        /// The state the parser was left in.
        state: State,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::RunawayDispatch { code, state } => write!(
                f,
                "runaway dispatch: {code:?} was not consumed after {MAX_DISPATCHES} dispatches \
                 (state: {state})"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Control flow
////////////////////////////////////////////////////////////////////////////////////////

/// Where a parse stands after a chunk was pushed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// More input is expected.
    Pending,

    /// The parse is over and the handler was sent `end`.
    Done,

    /// The parse was cancelled.
    Cancelled,
}

/// Whether the scan may go on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Flow {
    /// Keep scanning.
    Continue,

    /// Nothing more can be learned from the input.
    Abort,
}

/// The outcome of dispatching one character to the current state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Step {
    /// The character was used up.
    Consumed,

    /// The state changed and the character must be dispatched again.
    Again,

    /// The scan must stop.
    Abort,
}

/// A handle which cancels a [`Parser`], possibly from another thread.
///
/// # Examples
///
/// ```
/// use bgfile::handler::Noop;
/// use bgfile::parser::Parser;
/// use bgfile::parser::Status;
///
/// let mut parser = Parser::new(12);
/// let canceller = parser.canceller();
///
/// assert_eq!(parser.push(b"A 0.25\n", &mut Noop)?, Status::Pending);
/// canceller.cancel();
/// assert_eq!(parser.push(b"C 0.25", &mut Noop)?, Status::Cancelled);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Canceller(Arc<AtomicBool>);

impl Canceller {
    /// Cancels the parse.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns whether the parse was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Parser
////////////////////////////////////////////////////////////////////////////////////////

/// An incremental parser for a background model file.
///
/// # Examples
///
/// ```
/// use bgfile::alphabet::Alphabet;
/// use bgfile::handler::Noop;
/// use bgfile::parser::Parser;
/// use bgfile::parser::Status;
///
/// let data = b"A 0.25\nC 0.25\nG 0.25\nT 0.25\n";
/// let mut parser = Parser::new(data.len() as u64);
///
/// assert_eq!(parser.push(data, &mut Noop)?, Status::Done);
/// assert_eq!(parser.alphabet(), Alphabet::Dna);
/// assert_eq!(parser.store().as_slice(), &[0.25, 0.25, 0.25, 0.25]);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Parser {
    /// The current state.
    state: State,

    /// The decoder which turns bytes into characters.
    decoder: Decoder,

    /// The alphabet, once it has been resolved.
    alphabet: Alphabet,

    /// The classes of letters that may form a chain.
    chain_class: Class,

    /// The ranks used to index chains.
    ranks: &'static RankMap,

    /// The chain being read.
    chain: Chain,

    /// The longest chain length established so far.
    chain_len: usize,

    /// The first slot of the band of the longest chain length.
    check_start: usize,

    /// The text of the probability being read.
    number: String,

    /// The probabilities of every chain.
    store: Store,

    /// The number of bytes pushed so far.
    offset: u64,

    /// The size of the input in bytes.
    total: u64,

    /// The name of the input, which helps with recognising formats.
    file_name: Option<String>,

    /// Whether the first chunk was seen.
    started: bool,

    /// Whether the parse is over.
    done: bool,

    /// The number of faults reported.
    faults: usize,

    /// The cancellation flag.
    canceller: Canceller,
}

impl Parser {
    /// Creates a new [`Parser`] for an input of `total` bytes.
    pub fn new(total: u64) -> Self {
        Self {
            state: State::default(),
            decoder: Decoder::default(),
            alphabet: Alphabet::Unknown,
            chain_class: Class::DNA | Class::PROTEIN,
            ranks: &rank::PROTEIN,
            chain: Chain::default(),
            chain_len: 1,
            check_start: 0,
            number: String::new(),
            store: Store::new(rank::PROTEIN.size()),
            offset: 0,
            total,
            file_name: None,
            started: false,
            done: false,
            faults: 0,
            canceller: Canceller::default(),
        }
    }

    /// Sets the name of the input file.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Gets the alphabet as understood so far.
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Gets the longest chain length established so far.
    pub fn chain_length(&self) -> usize {
        self.chain_len
    }

    /// Gets the stored probabilities.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Gets the number of faults reported so far.
    pub fn fault_count(&self) -> usize {
        self.faults
    }

    /// Gets the number of bytes pushed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns whether the parse is over.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Returns whether the parse was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.canceller.is_cancelled()
    }

    /// Gets a handle that can cancel the parse.
    pub fn canceller(&self) -> Canceller {
        self.canceller.clone()
    }

    /// Cancels the parse.
    ///
    /// No more events are sent to any handler afterwards.
    pub fn cancel(&self) {
        self.canceller.cancel()
    }

    /// Gets the background model, if the parse finished without a fault.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::handler::Noop;
    /// use bgfile::parser::Parser;
    ///
    /// let data = b"A 0.25\nC 0.25\nG 0.25\nT 0.25\n";
    /// let mut parser = Parser::new(data.len() as u64);
    /// parser.push(data, &mut Noop)?;
    ///
    /// let background = parser.background().unwrap();
    /// assert_eq!(background.order(), 0);
    /// assert_eq!(background.probability("g"), Some(0.25));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn background(&self) -> Option<Background> {
        if !self.done || self.faults > 0 || self.alphabet == Alphabet::Unknown {
            return None;
        }

        Background::new(self.alphabet, self.chain_len - 1, self.store.clone())
    }

    /// Pushes the next chunk of the input.
    ///
    /// Once the chunk reaching the end of the input (as given by the total
    /// size) was pushed, the parse is [finished](Parser::finish).
    pub fn push<H>(&mut self, chunk: &[u8], handler: &mut H) -> Result<Status>
    where
        H: Handler + ?Sized,
    {
        if self.done {
            return Ok(Status::Done);
        }

        if self.is_cancelled() {
            return Ok(Status::Cancelled);
        }

        // (1) Reports the progress made before this chunk.
        if !self.started {
            handler.begin(self.total);
        }

        handler.progress(self.fraction(), self.alphabet);

        // (2) Refuses files which are plainly not text before looking at any
        // of the characters.
        if !self.started {
            self.started = true;

            if let Some(format) = sniff::sniff(
                chunk,
                sniff::DEFAULT_MAX_SCAN,
                self.file_name.as_deref(),
            ) {
                debug!("stopping: the input appears to be {format}");
                self.emit(
                    handler,
                    Fault::new(
                        Position::default(),
                        Kind::Format(format),
                        "The file format is not correct for a background file",
                    ),
                );
                return Ok(self.stop(handler));
            }
        }

        // (3) Runs every character through the state machine.
        for &byte in chunk {
            if self.is_cancelled() {
                return Ok(Status::Cancelled);
            }

            let c = match self.decoder.decode(byte) {
                Ok(Some(c)) => c,
                Ok(None) => continue,
                Err(err) => {
                    self.encoding_fault(handler, err);
                    return Ok(self.stop(handler));
                }
            };

            if self.consume(c, handler)? == Flow::Abort {
                return Ok(self.stop(handler));
            }
        }

        self.offset += chunk.len() as u64;

        // (4) Wraps up once the end of the input was reached.
        if self.offset >= self.total {
            return self.finish(handler);
        }

        Ok(Status::Pending)
    }

    /// Signals that there is no more input.
    ///
    /// A chain still missing its probability is reported, a trailing
    /// probability is stored, the alphabet is resolved if no chain longer
    /// than a single letter was seen and the last chain length is checked.
    pub fn finish<H>(&mut self, handler: &mut H) -> Result<Status>
    where
        H: Handler + ?Sized,
    {
        if self.done {
            return Ok(Status::Done);
        }

        if self.is_cancelled() {
            return Ok(Status::Cancelled);
        }

        if let Err(err) = self.decoder.finish() {
            self.encoding_fault(handler, err);
            return Ok(self.stop(handler));
        }

        match self.state {
            State::Chain => {
                self.check_duplicate(handler);
                self.fault_here(
                    handler,
                    Kind::MissingProbability,
                    "Did not find a probability to go with the chain.",
                );
            }
            State::Number => self.store_number(handler),
            _ => {}
        }

        self.resolve_alphabet();

        if self.check_band(handler) == Flow::Abort {
            debug!("the last chain length has no entries");
        }

        Ok(self.stop(handler))
    }

    /// Gets the fraction of the input pushed so far.
    fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        self.offset as f64 / self.total as f64
    }

    /// Ends the parse.
    fn stop<H>(&mut self, handler: &mut H) -> Status
    where
        H: Handler + ?Sized,
    {
        if self.is_cancelled() {
            return Status::Cancelled;
        }

        self.done = true;
        handler.progress(1.0, self.alphabet);
        handler.end(self.alphabet);

        Status::Done
    }

    /// Reports a fault, unless the parse was cancelled.
    fn emit<H>(&mut self, handler: &mut H, fault: Fault)
    where
        H: Handler + ?Sized,
    {
        if self.is_cancelled() {
            return;
        }

        trace!("fault: {fault}");
        self.faults += 1;
        handler.error(fault);
    }

    /// Reports a fault at the last decoded character.
    fn fault_here<H>(&mut self, handler: &mut H, kind: Kind, message: impl Into<String>)
    where
        H: Handler + ?Sized,
    {
        let position = Position::new(
            self.decoder.offset(),
            self.decoder.line(),
            self.decoder.column(),
        );

        self.emit(handler, Fault::new(position, kind, message));
    }

    /// Reports input that is not valid text.
    fn encoding_fault<H>(&mut self, handler: &mut H, err: decoder::Error)
    where
        H: Handler + ?Sized,
    {
        debug!("stopping: {err}");

        let position = Position::new(err.offset(), self.decoder.line(), self.decoder.column());
        self.emit(
            handler,
            Fault::new(position, Kind::Encoding(err.code()), err.to_string()),
        );
    }

    /// Dispatches a character until some state consumes it.
    fn consume<H>(&mut self, c: char, handler: &mut H) -> Result<Flow>
    where
        H: Handler + ?Sized,
    {
        let class = classify(c);

        for _ in 0..MAX_DISPATCHES {
            match self.step(c, class, handler) {
                Step::Consumed => return Ok(Flow::Continue),
                Step::Again => continue,
                Step::Abort => return Ok(Flow::Abort),
            }
        }

        Err(Error::RunawayDispatch {
            code: c,
            state: self.state,
        })
    }

    /// Dispatches a character to the current state.
    fn step<H>(&mut self, c: char, class: Class, handler: &mut H) -> Step
    where
        H: Handler + ?Sized,
    {
        match self.state {
            State::Start => self.step_start(c, class, handler),
            State::Comment => self.step_comment(),
            State::Chain => self.step_chain(c, class, handler),
            State::Gap => self.step_gap(class, handler),
            State::Number => self.step_number(c, class, handler),
            State::Trailing => self.step_trailing(class, handler),
        }
    }

    /// Handles a character at the start of a line.
    fn step_start<H>(&mut self, c: char, class: Class, handler: &mut H) -> Step
    where
        H: Handler + ?Sized,
    {
        if class.intersects(Class::COMMENT) {
            self.state = State::Comment;
            return Step::Consumed;
        }

        if class.intersects(Class::WHITESPACE) {
            return Step::Consumed;
        }

        if class.intersects(self.chain_class) {
            self.chain.clear();
            self.state = State::Chain;
            return Step::Again;
        }

        if class.intersects(Class::DNA | Class::PROTEIN) {
            self.mismatch(handler, c);
        } else if class.intersects(Class::NUMBER_START | Class::NUMBER_MID) {
            self.fault_here(
                handler,
                Kind::NumberBeforeChain,
                "Found a number before the letter chain was established.",
            );
        } else {
            self.fault_here(
                handler,
                Kind::Junk,
                "Found a character that was not part of a state chain",
            );
        }

        self.state = State::Comment;
        Step::Consumed
    }

    /// Skips characters until the start of the next line.
    fn step_comment(&mut self) -> Step {
        if self.decoder.column() == 0 {
            self.state = State::Start;
            return Step::Again;
        }

        Step::Consumed
    }

    /// Handles a character within a chain.
    fn step_chain<H>(&mut self, c: char, class: Class, handler: &mut H) -> Step
    where
        H: Handler + ?Sized,
    {
        if class.intersects(Class::WHITESPACE) {
            self.check_duplicate(handler);
            self.state = State::Gap;
            return Step::Consumed;
        }

        if class.intersects(self.chain_class) {
            self.chain.push(c, self.ranks);

            if self.chain.len() > self.chain_len {
                return self.extend(handler);
            }

            return Step::Consumed;
        }

        if class.intersects(Class::DNA | Class::PROTEIN) {
            self.mismatch(handler, c);
        } else if class.intersects(Class::NUMBER_START) {
            self.fault_here(
                handler,
                Kind::NoGap,
                "There is no gap between the letter chain and the probability.",
            );
            self.number.clear();
            self.state = State::Number;
            return Step::Again;
        } else {
            self.fault_here(
                handler,
                Kind::Junk,
                "Found a character that was not part of a state chain",
            );
        }

        self.state = State::Comment;
        Step::Consumed
    }

    /// Handles a character between a chain and its probability.
    fn step_gap<H>(&mut self, class: Class, handler: &mut H) -> Step
    where
        H: Handler + ?Sized,
    {
        if self.decoder.column() == 0 {
            self.fault_here(
                handler,
                Kind::MissingProbability,
                "Did not find a probability to go with the chain",
            );
            self.state = State::Start;
            return Step::Again;
        }

        if class.intersects(Class::WHITESPACE) {
            return Step::Consumed;
        }

        if class.intersects(Class::NUMBER_START) {
            self.number.clear();
            self.state = State::Number;
            return Step::Again;
        }

        self.fault_here(
            handler,
            Kind::Junk,
            "Found a character that was not the start of a number",
        );
        self.state = State::Comment;
        Step::Consumed
    }

    /// Handles a character within a probability.
    fn step_number<H>(&mut self, c: char, class: Class, handler: &mut H) -> Step
    where
        H: Handler + ?Sized,
    {
        if class.intersects(Class::NUMBER_START | Class::NUMBER_MID) {
            self.number.push(c);
            return Step::Consumed;
        }

        if class.intersects(Class::WHITESPACE) {
            self.store_number(handler);
            return Step::Again;
        }

        self.fault_here(handler, Kind::Junk, "Expected a number.");
        self.state = State::Comment;
        Step::Consumed
    }

    /// Handles a character after a probability.
    fn step_trailing<H>(&mut self, class: Class, handler: &mut H) -> Step
    where
        H: Handler + ?Sized,
    {
        if self.decoder.column() == 0 {
            self.state = State::Start;
            return Step::Again;
        }

        if class.intersects(Class::WHITESPACE) {
            return Step::Consumed;
        }

        self.fault_here(handler, Kind::Junk, "Expected whitespace");
        self.state = State::Comment;
        Step::Consumed
    }

    /// Reports a letter outside of the established alphabet.
    fn mismatch<H>(&mut self, handler: &mut H, letter: char)
    where
        H: Handler + ?Sized,
    {
        self.fault_here(
            handler,
            Kind::AlphabetMismatch(letter),
            "Found a letter which does not match the previously established alphabet.",
        );
    }

    /// Reports the chain just read if it already has a probability.
    fn check_duplicate<H>(&mut self, handler: &mut H)
    where
        H: Handler + ?Sized,
    {
        if let Some(value) = self.chain.slot().and_then(|slot| self.store.get(slot)) {
            let message = format!(
                "Found a duplicated letter chain {} = {}",
                self.chain.letters(),
                value
            );
            self.fault_here(handler, Kind::Duplicate, message);
        }
    }

    /// Stores the probability just read against the current chain.
    fn store_number<H>(&mut self, handler: &mut H)
    where
        H: Handler + ?Sized,
    {
        let value = match number::parse(&self.number) {
            Ok(value) => value,
            Err(err) => {
                self.fault_here(handler, Kind::BadProbability, err.to_string());
                0.0
            }
        };

        if let Some(slot) = self.chain.slot() {
            self.store.set(slot, value);
        }

        self.state = State::Trailing;
    }

    /// Establishes the next chain length after a longer chain was read.
    ///
    /// The band of the previous chain length is checked before the store
    /// grows to hold the new one.
    fn extend<H>(&mut self, handler: &mut H) -> Step
    where
        H: Handler + ?Sized,
    {
        let resolving = self.chain_len == 1;
        self.resolve_alphabet();

        if self.check_band(handler) == Flow::Abort {
            debug!(
                chain_length = self.chain_len,
                "aborting: no entries for the chain length"
            );
            return Step::Abort;
        }

        let next = self.chain_len + 1;
        let additional = u32::try_from(next)
            .ok()
            .and_then(|exp| self.ranks.size().checked_pow(exp))
            .filter(|n| {
                self.store
                    .len()
                    .checked_add(*n)
                    .is_some_and(|len| len <= MAX_SLOTS)
            });

        let Some(additional) = additional else {
            debug!(chain_length = next, "aborting: chains are too long to store");
            return Step::Abort;
        };

        self.check_start = self.store.len();
        self.chain_len = next;
        self.store.grow(additional);

        debug!(
            chain_length = self.chain_len,
            slots = self.store.len(),
            "extended the store"
        );

        if resolving {
            if let Some(letter) = self.chain.rebase(self.ranks) {
                self.mismatch(handler, letter);
                self.state = State::Comment;
            }
        }

        Step::Consumed
    }

    /// Decides the alphabet from the single letter chains.
    ///
    /// This only happens while no chain longer than a single letter has been
    /// established.
    fn resolve_alphabet(&mut self) {
        if self.chain_len != 1 {
            return;
        }

        match resolve::resolve(&self.store) {
            Resolution::Dna(store) => {
                self.alphabet = Alphabet::Dna;
                self.chain_class = Class::DNA;
                self.ranks = &rank::DNA;
                self.store = store;
            }
            Resolution::Protein => {
                self.alphabet = Alphabet::Protein;
                self.chain_class = Class::PROTEIN;
                self.ranks = &rank::PROTEIN;
            }
        }

        debug!(alphabet = %self.alphabet, "resolved the alphabet");
    }

    /// Checks that every chain of the longest length has a probability and
    /// that these probabilities sum to one.
    ///
    /// The scan should be aborted when not a single chain of that length has
    /// a probability.
    fn check_band<H>(&mut self, handler: &mut H) -> Flow
    where
        H: Handler + ?Sized,
    {
        let band = self.store.len() - self.check_start;

        if let Some(missing) = NonEmpty::from_vec(self.store.missing(self.check_start)) {
            let count = missing.len();

            self.fault_here(
                handler,
                Kind::MissingChain(missing),
                format!("Missing {count} chain value(s)."),
            );

            if count == band {
                return Flow::Abort;
            }

            return Flow::Continue;
        }

        let total = self.store.sum(self.check_start);

        if (total - 1.0).abs() > SUM_TOLERANCE {
            let message = format!(
                "Summed probability of all length {} chains was {} when it should have been 1.0",
                self.chain_len, total
            );

            self.fault_here(
                handler,
                Kind::IncorrectSum {
                    chain_length: self.chain_len,
                    total,
                },
                message,
            );
        }

        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain;

    /// Records every event sent to it.
    #[derive(Debug, Default)]
    struct Recorder {
        begins: Vec<u64>,
        progress: Vec<f64>,
        faults: Vec<Fault>,
        ends: Vec<Alphabet>,
    }

    impl Handler for Recorder {
        fn begin(&mut self, size: u64) {
            self.begins.push(size);
        }

        fn progress(&mut self, fraction: f64, _: Alphabet) {
            self.progress.push(fraction);
        }

        fn error(&mut self, fault: Fault) {
            self.faults.push(fault);
        }

        fn end(&mut self, alphabet: Alphabet) {
            self.ends.push(alphabet);
        }
    }

    impl Recorder {
        fn kinds(&self) -> Vec<&Kind> {
            self.faults.iter().map(|fault| fault.kind()).collect()
        }
    }

    fn parse(data: &str) -> Result<(Parser, Recorder)> {
        let mut parser = Parser::new(data.len() as u64);
        let mut recorder = Recorder::default();
        parser.push(data.as_bytes(), &mut recorder)?;
        Ok((parser, recorder))
    }

    #[test]
    fn test_dna_order_zero() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (parser, recorder) = parse("A 0.25\nC 0.25\nG 0.25\nT 0.25\n")?;

        assert!(parser.is_done());
        assert_eq!(parser.alphabet(), Alphabet::Dna);
        assert!(recorder.faults.is_empty());
        assert_eq!(parser.store().as_slice(), &[0.25; 4]);
        assert_eq!(recorder.begins, vec![28]);
        assert_eq!(recorder.progress, vec![0.0, 1.0]);
        assert_eq!(recorder.ends, vec![Alphabet::Dna]);

        Ok(())
    }

    #[test]
    fn test_dna_order_one() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut data = String::from("# order 0\nA 0.25\nC 0.25\nG 0.25\nT 0.25\n# order 1\n");

        for a in "ACGT".chars() {
            for b in "ACGT".chars() {
                data.push_str(&format!("{a}{b} 0.0625\n"));
            }
        }

        let (parser, recorder) = parse(&data)?;

        assert!(recorder.faults.is_empty(), "{:?}", recorder.faults);
        assert_eq!(parser.alphabet(), Alphabet::Dna);
        assert_eq!(parser.chain_length(), 2);
        assert_eq!(parser.store().len(), 20);
        assert!(parser.store().missing(0).is_empty());
        assert_eq!(parser.background().map(|bg| bg.order()), Some(1));

        Ok(())
    }

    #[test]
    fn test_protein() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = crate::alphabet::PROTEIN_LETTERS
            .chars()
            .map(|c| format!("{c} 0.05\n"))
            .collect::<String>();

        let (parser, recorder) = parse(&data)?;

        assert!(recorder.faults.is_empty(), "{:?}", recorder.faults);
        assert_eq!(parser.alphabet(), Alphabet::Protein);
        assert_eq!(parser.store().len(), 20);

        Ok(())
    }

    #[test]
    fn test_missing_chain() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (parser, recorder) = parse("A 0.25\nC 0.25\nG 0.25\n")?;

        assert_eq!(parser.alphabet(), Alphabet::Dna);
        assert_eq!(
            recorder.kinds(),
            vec![&Kind::MissingChain(NonEmpty::new(3))]
        );
        assert_eq!(recorder.faults[0].message(), "Missing 1 chain value(s).");
        assert!(parser.background().is_none());

        Ok(())
    }

    #[test]
    fn test_incorrect_sum() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (_, recorder) = parse("A 0.2\nC 0.2\nG 0.2\nT 0.2\n")?;

        assert_eq!(recorder.faults.len(), 1);

        match recorder.faults[0].kind() {
            Kind::IncorrectSum {
                chain_length,
                total,
            } => {
                assert_eq!(*chain_length, 1);
                assert!((total - 0.8).abs() < 1e-9);
            }
            kind => panic!("unexpected fault: {kind}"),
        }

        Ok(())
    }

    #[test]
    fn test_junk_skips_line() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (parser, recorder) = parse("X 0.25 !!\nA 0.25\nC 0.25\nG 0.25\nT 0.25\n")?;

        assert_eq!(recorder.kinds(), vec![&Kind::Junk]);
        assert_eq!(recorder.faults[0].position().line(), 0);
        assert_eq!(parser.alphabet(), Alphabet::Dna);

        Ok(())
    }

    #[test]
    fn test_letter_mismatch_after_dna() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = "A 0.25\nC 0.25\nG 0.25\nT 0.25\nAA 1\nW 0.5\n";
        let (_, recorder) = parse(data)?;

        assert!(recorder
            .kinds()
            .contains(&&Kind::AlphabetMismatch('W')));

        Ok(())
    }

    #[test]
    fn test_protein_letter_in_first_long_chain() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let (_, recorder) = parse("A 0.25\nC 0.25\nG 0.25\nT 0.25\nDA 0.5\n")?;

        assert_eq!(recorder.kinds()[0], &Kind::AlphabetMismatch('D'));
        assert_eq!(recorder.faults[0].position().line(), 4);

        Ok(())
    }

    #[test]
    fn test_exponent_is_not_a_letter() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (parser, recorder) = parse("A 2.5e-1\nC 2.5E-1\nG 0.25\nT 0.25\n")?;

        assert!(recorder.faults.is_empty(), "{:?}", recorder.faults);
        assert_eq!(parser.alphabet(), Alphabet::Dna);

        Ok(())
    }

    #[test]
    fn test_number_faults() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (parser, recorder) = parse("A0.25\nC 1.5\nG 0.5.5\n0.25\nT 0.25x\n")?;

        assert_eq!(
            recorder.kinds(),
            vec![
                &Kind::NoGap,
                &Kind::BadProbability,
                &Kind::BadProbability,
                &Kind::NumberBeforeChain,
                &Kind::Junk,
                &Kind::MissingChain(NonEmpty::new(3)),
            ]
        );
        assert_eq!(recorder.faults[2].message(), "Number does not match expected format.");
        assert_eq!(recorder.faults[4].message(), "Expected a number.");
        assert_eq!(parser.store().get(1), Some(0.0));

        Ok(())
    }

    #[test]
    fn test_duplicate() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (_, recorder) = parse("A 0.25\nC 0.25\nG 0.25\nT 0.25\nA 0.25\n")?;

        assert_eq!(recorder.kinds()[0], &Kind::Duplicate);
        assert_eq!(
            recorder.faults[0].message(),
            "Found a duplicated letter chain A = 0.25"
        );
        assert_eq!(recorder.faults[0].position().line(), 4);

        Ok(())
    }

    #[test]
    fn test_missing_probability() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (_, recorder) = parse("A\nA 0.25\nC 0.25\nG 0.25\nT")?;

        assert_eq!(
            recorder.kinds(),
            vec![
                &Kind::MissingProbability,
                &Kind::MissingProbability,
                &Kind::MissingChain(NonEmpty::new(3)),
            ]
        );
        assert_eq!(
            recorder.faults[1].message(),
            "Did not find a probability to go with the chain."
        );

        Ok(())
    }

    #[test]
    fn test_empty_band_aborts() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (parser, recorder) = parse("AC 0.25\nGT 0.25\nTT 0.5\n")?;

        assert_eq!(recorder.faults.len(), 1);
        assert!(matches!(
            recorder.faults[0].kind(),
            Kind::MissingChain(missing) if missing.len() == 4
        ));
        assert!(parser.is_done());
        assert_eq!(recorder.ends.len(), 1);

        Ok(())
    }

    #[test]
    fn test_empty_input() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (parser, recorder) = parse("")?;

        assert!(parser.is_done());
        assert_eq!(parser.alphabet(), Alphabet::Dna);
        assert_eq!(recorder.faults.len(), 1);
        assert_eq!(recorder.ends.len(), 1);

        Ok(())
    }

    #[test]
    fn test_chunked_input() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = "A 0.25\nC 0.25\nG 0.25\nT 0.25\n".as_bytes();
        let mut parser = Parser::new(data.len() as u64);
        let mut recorder = Recorder::default();

        for chunk in data.chunks(5) {
            parser.push(chunk, &mut recorder)?;
        }

        assert!(parser.is_done());
        assert!(recorder.faults.is_empty());
        assert_eq!(recorder.begins.len(), 1);
        assert_eq!(recorder.progress.len(), 7);
        assert_eq!(recorder.ends, vec![Alphabet::Dna]);

        Ok(())
    }

    #[test]
    fn test_format() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = [0x1F, 0x8B, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut parser = Parser::new(data.len() as u64);
        let mut recorder = Recorder::default();

        assert_eq!(parser.push(&data, &mut recorder)?, Status::Done);
        assert!(matches!(recorder.kinds().as_slice(), [Kind::Format(_)]));
        assert_eq!(recorder.faults[0].position(), Position::default());
        assert_eq!(recorder.ends, vec![Alphabet::Unknown]);

        Ok(())
    }

    #[test]
    fn test_encoding() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"A 0.25\nC \xFF0.25\n";
        let mut parser = Parser::new(data.len() as u64);
        let mut recorder = Recorder::default();

        assert_eq!(parser.push(data, &mut recorder)?, Status::Done);
        assert!(matches!(
            recorder.kinds().as_slice(),
            [Kind::Encoding(decoder::Code::IllegalByte)]
        ));
        assert_eq!(recorder.faults[0].position().offset(), 9);
        assert_eq!(recorder.ends.len(), 1);

        Ok(())
    }

    #[test]
    fn test_cancel() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"A 0.25\nC 0.25\nG 0.25\n";
        let mut parser = Parser::new(data.len() as u64);
        let mut recorder = Recorder::default();

        assert_eq!(parser.push(&data[..7], &mut recorder)?, Status::Pending);
        parser.cancel();
        assert_eq!(parser.push(&data[7..], &mut recorder)?, Status::Cancelled);
        assert_eq!(parser.finish(&mut recorder)?, Status::Cancelled);

        assert_eq!(recorder.progress.len(), 1);
        assert!(recorder.faults.is_empty());
        assert!(recorder.ends.is_empty());
        assert!(!parser.is_done());

        Ok(())
    }

    #[test]
    fn test_chains_too_long_to_store() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = (1..=13)
            .map(|length| format!("{} 0.5\n", "A".repeat(length)))
            .collect::<String>();

        let (parser, recorder) = parse(&data)?;

        // The store stops growing once chains of eleven letters would need
        // more than the largest number of slots.
        assert!(parser.is_done());
        assert_eq!(parser.alphabet(), Alphabet::Dna);
        assert_eq!(parser.chain_length(), 10);
        assert_eq!(parser.store().len(), chain::band_start(11, 4));
        assert!(parser.store().len() <= MAX_SLOTS);
        assert!(parser.background().is_none());

        assert_eq!(recorder.ends, vec![Alphabet::Dna]);
        assert_eq!(recorder.progress.last(), Some(&1.0));
        assert_eq!(recorder.faults.len(), 10);
        assert!(recorder
            .kinds()
            .iter()
            .all(|kind| matches!(kind, Kind::MissingChain(_))));

        Ok(())
    }

    #[test]
    fn test_largest_models_fit() {
        assert!(chain::band_start(6, 20) <= MAX_SLOTS);
        assert!(chain::band_start(11, 4) <= MAX_SLOTS);
        assert!(chain::band_start(12, 4) > MAX_SLOTS);
    }

    #[test]
    fn test_runaway_dispatch_display() {
        let err = Error::RunawayDispatch {
            code: 'A',
            state: State::Chain,
        };

        assert_eq!(
            err.to_string(),
            "runaway dispatch: 'A' was not consumed after 8 dispatches (state: chain)"
        );
    }
}

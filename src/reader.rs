//! A chunked background file reader.

use std::fs::File;
use std::io::Read;
use std::io::{self};
use std::path::Path;

use tracing::trace;

use crate::handler::Handler;
use crate::parser;
use crate::parser::Parser;
use crate::parser::Status;

/// The default number of bytes handed to the parser at a time.
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 12;

/// An error related to a [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A parser error.
    Parser(parser::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Parser(err) => write!(f, "parser error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A background file reader.
///
/// The reader hands the input to a [`Parser`] one chunk at a time. The size
/// of the input must be known up front so that progress can be reported.
#[derive(Clone, Debug)]
pub struct Reader<T>
where
    T: Read,
{
    /// The inner reader.
    inner: T,

    /// The size of the input in bytes.
    size: u64,

    /// The name of the input file.
    file_name: Option<String>,

    /// The number of bytes read at a time.
    chunk_size: usize,
}

impl<T> Reader<T>
where
    T: Read,
{
    /// Creates a background file reader over an input of `size` bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"A 0.25\nC 0.25\nG 0.25\nT 0.25\n";
    /// let reader = bgfile::Reader::new(&data[..], data.len() as u64);
    /// ```
    pub fn new(inner: T, size: u64) -> Self {
        Self {
            inner,
            size,
            file_name: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Sets the name of the input file.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Sets the number of bytes read at a time (at least one).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Gets a reference to the inner reader.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Gets a mutable reference to the inner reader.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Gets the size of the input in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Gets the name of the input file.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Gets the number of bytes read at a time.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Creates a [`Parser`] set up for this input.
    pub fn parser(&self) -> Parser {
        let parser = Parser::new(self.size);

        match &self.file_name {
            Some(name) => parser.with_file_name(name.clone()),
            None => parser,
        }
    }

    /// Parses the whole input and returns the finished parser.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::alphabet::Alphabet;
    /// use bgfile::handler::Noop;
    ///
    /// let data = b"A 0.25\nC 0.25\nG 0.25\nT 0.25\n";
    /// let mut reader = bgfile::Reader::new(&data[..], data.len() as u64).with_chunk_size(3);
    ///
    /// let parser = reader.parse(&mut Noop)?;
    /// assert!(parser.is_done());
    /// assert_eq!(parser.alphabet(), Alphabet::Dna);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse<H>(&mut self, handler: &mut H) -> Result<Parser>
    where
        H: Handler + ?Sized,
    {
        let mut parser = self.parser();
        self.process(&mut parser, handler)?;
        Ok(parser)
    }

    /// Feeds the input to an existing parser until the parse is over.
    ///
    /// This allows holding on to the parser's
    /// [`Canceller`](crate::parser::Canceller) while it runs.
    pub fn process<H>(&mut self, parser: &mut Parser, handler: &mut H) -> Result<Status>
    where
        H: Handler + ?Sized,
    {
        let mut buffer = Vec::with_capacity(self.chunk_size);

        loop {
            buffer.clear();

            let n = (&mut self.inner)
                .take(self.chunk_size as u64)
                .read_to_end(&mut buffer)
                .map_err(Error::Io)?;

            trace!(offset = parser.offset(), bytes = n, "read chunk");

            let mut status = parser.push(&buffer, handler).map_err(Error::Parser)?;

            // A short read means the input ended, even if it is shorter than
            // the size given.
            if status == Status::Pending && n < self.chunk_size {
                status = parser.finish(handler).map_err(Error::Parser)?;
            }

            if status != Status::Pending {
                return Ok(status);
            }
        }
    }
}

impl Reader<File> {
    /// Opens a background file, taking the size and name from the file
    /// system.
    pub fn from_path<P>(path: P) -> io::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        let reader = Self::new(file, size);

        Ok(match path.file_name() {
            Some(name) => reader.with_file_name(name.to_string_lossy()),
            None => reader,
        })
    }
}

impl<'a> From<&'a [u8]> for Reader<&'a [u8]> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data, data.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::fault::Fault;
    use crate::parser::Canceller;

    /// Cancels the parse as soon as progress is first reported.
    struct Impatient {
        canceller: Canceller,
        progress: usize,
        ends: usize,
    }

    impl Handler for Impatient {
        fn progress(&mut self, _: f64, _: Alphabet) {
            self.progress += 1;
            self.canceller.cancel();
        }

        fn error(&mut self, fault: Fault) {
            panic!("unexpected fault: {fault}");
        }

        fn end(&mut self, _: Alphabet) {
            self.ends += 1;
        }
    }

    #[derive(Default)]
    struct Counter {
        progress: Vec<f64>,
        faults: usize,
    }

    impl Handler for Counter {
        fn progress(&mut self, fraction: f64, _: Alphabet) {
            self.progress.push(fraction);
        }

        fn error(&mut self, _: Fault) {
            self.faults += 1;
        }
    }

    #[test]
    fn test_chunks() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"A 0.25\nC 0.25\nG 0.25\nT 0.25\n";
        let mut reader = Reader::from(&data[..]).with_chunk_size(8);
        let mut counter = Counter::default();

        let parser = reader.parse(&mut counter)?;

        assert!(parser.is_done());
        assert_eq!(counter.faults, 0);
        assert_eq!(counter.progress, vec![0.0, 8.0 / 28.0, 16.0 / 28.0, 24.0 / 28.0, 1.0]);

        Ok(())
    }

    #[test]
    fn test_overstated_size() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"A 0.25\nC 0.25\nG 0.25\nT 0.25";
        let mut reader = Reader::new(&data[..], 1000);
        let mut counter = Counter::default();

        let parser = reader.parse(&mut counter)?;

        assert!(parser.is_done());
        assert_eq!(counter.faults, 0);
        assert_eq!(parser.store().as_slice(), &[0.25; 4]);

        Ok(())
    }

    #[test]
    fn test_cancel() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"A 0.25\nC 0.25\nG 0.25\nT 0.25\n";
        let mut reader = Reader::from(&data[..]).with_chunk_size(4);
        let mut parser = reader.parser();
        let mut handler = Impatient {
            canceller: parser.canceller(),
            progress: 0,
            ends: 0,
        };

        assert_eq!(reader.process(&mut parser, &mut handler)?, Status::Cancelled);
        assert_eq!(handler.progress, 1);
        assert_eq!(handler.ends, 0);

        Ok(())
    }

    #[test]
    fn test_error_display() {
        let err = Error::Io(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(err.to_string(), "i/o error: boom");
    }
}

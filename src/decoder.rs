//! A UTF-8 decoder that tracks lines and columns.
//!
//! Bytes are fed in one at a time so that a code point split across two
//! chunks of input is reassembled without the caller having to care.

/// The new line character.
const NEW_LINE: char = '\n';

/// The carriage return character.
const CARRIAGE_RETURN: char = '\r';

/// The kind of an encoding error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Code {
    /// A byte that can never start a code unit.
    IllegalByte,
    /// A code unit that ended before all of its bytes were read.
    IncompleteCodeUnit,
    /// A code point encoded with more bytes than necessary.
    OverlongEncoding,
    /// A value that is not a legal Unicode scalar value.
    InvalidCodePoint,
    /// A NUL byte, which has no place in plain text.
    NulByte,
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Code::IllegalByte => write!(f, "illegal byte"),
            Code::IncompleteCodeUnit => write!(f, "incomplete code unit"),
            Code::OverlongEncoding => write!(f, "overlong encoding"),
            Code::InvalidCodePoint => write!(f, "invalid code point"),
            Code::NulByte => write!(f, "NUL byte"),
        }
    }
}

/// An error related to decoding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A byte that can never start a code unit.
    IllegalByte {
        /// The byte.
        value: u8,
        /// The offset of the byte.
        offset: u64,
    },

    /// A code unit that ended before all of its bytes were read.
    IncompleteCodeUnit {
        /// The number of bytes the lead byte announced.
        expected: usize,
        /// The number of bytes found.
        found: usize,
        /// The offset of the code unit.
        offset: u64,
    },

    /// A code point encoded with more bytes than necessary.
    OverlongEncoding {
        /// The decoded value.
        codepoint: u32,
        /// The number of bytes used.
        length: usize,
        /// The offset of the code unit.
        offset: u64,
    },

    /// A value that is not a legal Unicode scalar value.
    InvalidCodePoint {
        /// The decoded value.
        codepoint: u32,
        /// The offset of the code unit.
        offset: u64,
    },

    /// A NUL byte.
    NulByte {
        /// The offset of the byte.
        offset: u64,
    },
}

impl Error {
    /// Gets the kind of the error.
    pub fn code(&self) -> Code {
        match self {
            Error::IllegalByte { .. } => Code::IllegalByte,
            Error::IncompleteCodeUnit { .. } => Code::IncompleteCodeUnit,
            Error::OverlongEncoding { .. } => Code::OverlongEncoding,
            Error::InvalidCodePoint { .. } => Code::InvalidCodePoint,
            Error::NulByte { .. } => Code::NulByte,
        }
    }

    /// Gets the byte offset at which the error occurred.
    pub fn offset(&self) -> u64 {
        match self {
            Error::IllegalByte { offset, .. }
            | Error::IncompleteCodeUnit { offset, .. }
            | Error::OverlongEncoding { offset, .. }
            | Error::InvalidCodePoint { offset, .. }
            | Error::NulByte { offset } => *offset,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IllegalByte { value, offset } => {
                write!(f, "invalid UTF-8 start byte {value:#x} at offset {offset}")
            }
            Error::IncompleteCodeUnit {
                expected,
                found,
                offset,
            } => write!(
                f,
                "expected {expected} bytes in the code unit at offset {offset} but only found \
                 {found} bytes"
            ),
            Error::OverlongEncoding {
                codepoint,
                length,
                offset,
            } => write!(
                f,
                "encoding of U+{codepoint:04X} at offset {offset} used {length} bytes which is \
                 more than allowed"
            ),
            Error::InvalidCodePoint { codepoint, offset } => write!(
                f,
                "the value U+{codepoint:04X} at offset {offset} is not a legal Unicode value"
            ),
            Error::NulByte { offset } => {
                write!(f, "NUL byte at offset {offset} is not allowed in plain text")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A partially read multi-byte code unit.
#[derive(Clone, Debug)]
struct Partial {
    /// The number of bytes announced by the lead byte.
    expected: usize,

    /// The number of bytes read so far.
    read: usize,

    /// The bits accumulated so far.
    value: u32,

    /// The largest value that would fit in a shorter encoding.
    min: u32,

    /// The offset of the lead byte.
    offset: u64,
}

/// Line and column bookkeeping.
#[derive(Clone, Debug, Default)]
struct Lines {
    /// The 0-based line of the last character.
    line: u64,

    /// The 0-based column of the last character (if any was read).
    column: Option<u64>,

    /// The last character read.
    last: Option<char>,

    /// Whether the last character began a line break.
    last_starts_break: bool,
}

impl Lines {
    /// Accounts for the next character.
    ///
    /// A CR/LF pair in either order is one line break, whereas a repeated
    /// break character starts a new line each time.
    fn advance(&mut self, c: char) {
        self.column = Some(self.column.map_or(0, |column| column + 1));

        let is_break = c == NEW_LINE || c == CARRIAGE_RETURN;
        let mut starts_break = false;

        match self.last {
            Some(last) if last == NEW_LINE || last == CARRIAGE_RETURN => {
                if !is_break {
                    self.new_line();
                } else if last == c || !self.last_starts_break {
                    self.new_line();
                    starts_break = true;
                }
            }
            _ => starts_break = is_break,
        }

        self.last = Some(c);
        self.last_starts_break = starts_break;
    }

    /// Moves to the start of the next line.
    fn new_line(&mut self) {
        self.line += 1;
        self.column = Some(0);
    }
}

/// A UTF-8 decoder that tracks the line and column of each character.
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    /// The offset of the next byte.
    position: u64,

    /// The offset of the last decoded character.
    offset: u64,

    /// A multi-byte code unit that is still being read.
    partial: Option<Partial>,

    /// Line and column bookkeeping.
    lines: Lines,
}

impl Decoder {
    /// Feeds the next byte into the decoder.
    ///
    /// Returns the decoded character once a complete code unit was read.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::decoder::Decoder;
    ///
    /// let mut decoder = Decoder::default();
    /// assert_eq!(decoder.decode(0xCE)?, None);
    /// assert_eq!(decoder.decode(0xBB)?, Some('λ'));
    /// assert_eq!(decoder.offset(), 0);
    /// assert_eq!(decoder.decode(b'\n')?, Some('\n'));
    /// assert_eq!(decoder.offset(), 2);
    /// assert_eq!(decoder.column(), 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn decode(&mut self, byte: u8) -> Result<Option<char>> {
        let position = self.position;
        self.position += 1;

        let value = match self.partial.take() {
            None => match byte {
                0 => return Err(Error::NulByte { offset: position }),
                0x01..=0x7F => {
                    self.offset = position;
                    u32::from(byte)
                }
                _ => {
                    let (expected, value, min) = match byte {
                        0xC0..=0xDF => (2, byte & 0x1F, 0x7F),
                        0xE0..=0xEF => (3, byte & 0x0F, 0x7FF),
                        0xF0..=0xF7 => (4, byte & 0x07, 0xFFFF),
                        0xF8..=0xFB => (5, byte & 0x03, 0x1F_FFFF),
                        0xFC..=0xFD => (6, byte & 0x01, 0x3FF_FFFF),
                        _ => {
                            return Err(Error::IllegalByte {
                                value: byte,
                                offset: position,
                            })
                        }
                    };

                    self.partial = Some(Partial {
                        expected,
                        read: 1,
                        value: u32::from(value),
                        min,
                        offset: position,
                    });

                    return Ok(None);
                }
            },
            Some(mut partial) => {
                if (byte & 0xC0) != 0x80 {
                    return Err(Error::IncompleteCodeUnit {
                        expected: partial.expected,
                        found: partial.read,
                        offset: partial.offset,
                    });
                }

                partial.value = (partial.value << 6) | u32::from(byte & 0x3F);
                partial.read += 1;

                if partial.read < partial.expected {
                    self.partial = Some(partial);
                    return Ok(None);
                }

                if partial.value <= partial.min {
                    return Err(Error::OverlongEncoding {
                        codepoint: partial.value,
                        length: partial.expected,
                        offset: partial.offset,
                    });
                }

                self.offset = partial.offset;
                partial.value
            }
        };

        let c = char::from_u32(value).ok_or(Error::InvalidCodePoint {
            codepoint: value,
            offset: self.offset,
        })?;

        self.lines.advance(c);
        Ok(Some(c))
    }

    /// Signals that no more bytes will be fed to the decoder.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::decoder::Code;
    /// use bgfile::decoder::Decoder;
    ///
    /// let mut decoder = Decoder::default();
    /// decoder.decode(0xE2)?;
    ///
    /// let err = decoder.finish().unwrap_err();
    /// assert_eq!(err.code(), Code::IncompleteCodeUnit);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn finish(&self) -> Result<()> {
        match &self.partial {
            Some(partial) => Err(Error::IncompleteCodeUnit {
                expected: partial.expected,
                found: partial.read,
                offset: partial.offset,
            }),
            None => Ok(()),
        }
    }

    /// Gets the byte offset of the last decoded character.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Gets the 0-based line of the last decoded character.
    pub fn line(&self) -> u64 {
        self.lines.line
    }

    /// Gets the 0-based column of the last decoded character.
    pub fn column(&self) -> u64 {
        self.lines.column.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(decoder: &mut Decoder, bytes: &[u8]) -> Result<Vec<(char, u64, u64)>> {
        let mut decoded = Vec::new();

        for byte in bytes {
            if let Some(c) = decoder.decode(*byte)? {
                decoded.push((c, decoder.line(), decoder.column()));
            }
        }

        decoder.finish()?;
        Ok(decoded)
    }

    #[test]
    fn test_lines_and_columns() -> Result<()> {
        let decoded = decode_all(&mut Decoder::default(), b"ab\ncd\r\ne\n\nf")?;

        assert_eq!(
            decoded,
            vec![
                ('a', 0, 0),
                ('b', 0, 1),
                ('\n', 0, 2),
                ('c', 1, 0),
                ('d', 1, 1),
                ('\r', 1, 2),
                ('\n', 1, 3),
                ('e', 2, 0),
                ('\n', 2, 1),
                ('\n', 3, 0),
                ('f', 4, 0),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_multibyte_offsets() -> Result<()> {
        let mut decoder = Decoder::default();

        for byte in "a€b".as_bytes() {
            if let Some(c) = decoder.decode(*byte)? {
                match c {
                    'a' => assert_eq!(decoder.offset(), 0),
                    '€' => assert_eq!(decoder.offset(), 1),
                    'b' => assert_eq!(decoder.offset(), 4),
                    _ => unreachable!(),
                }
            }
        }

        assert_eq!(decoder.column(), 2);
        Ok(())
    }

    #[test]
    fn test_illegal_byte() {
        let err = decode_all(&mut Decoder::default(), b"ab\xFF").unwrap_err();
        assert_eq!(
            err,
            Error::IllegalByte {
                value: 0xFF,
                offset: 2
            }
        );
        assert_eq!(err.to_string(), "invalid UTF-8 start byte 0xff at offset 2");
    }

    #[test]
    fn test_continuation_without_lead() {
        let err = decode_all(&mut Decoder::default(), b"\x80").unwrap_err();
        assert_eq!(err.code(), Code::IllegalByte);
    }

    #[test]
    fn test_incomplete_code_unit() {
        let err = decode_all(&mut Decoder::default(), b"a\xE2\x82b").unwrap_err();
        assert_eq!(
            err,
            Error::IncompleteCodeUnit {
                expected: 3,
                found: 2,
                offset: 1
            }
        );
    }

    #[test]
    fn test_overlong_encoding() {
        let err = decode_all(&mut Decoder::default(), b"\xC0\xAF").unwrap_err();
        assert_eq!(err.code(), Code::OverlongEncoding);
        assert_eq!(err.offset(), 0);
    }

    #[test]
    fn test_invalid_code_point() {
        // a UTF-16 surrogate
        let err = decode_all(&mut Decoder::default(), b"\xED\xA0\x80").unwrap_err();
        assert_eq!(err.code(), Code::InvalidCodePoint);

        let err = decode_all(&mut Decoder::default(), b"\xF8\x88\x80\x80\x80").unwrap_err();
        assert_eq!(err.code(), Code::InvalidCodePoint);
    }

    #[test]
    fn test_nul_byte() {
        let err = decode_all(&mut Decoder::default(), b"A\0").unwrap_err();
        assert_eq!(err, Error::NulByte { offset: 1 });
    }
}

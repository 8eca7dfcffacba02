//! Character sources feeding the tokenizer
//!
//! A [`CharSource`] hands out characters one at a time with a single
//! character of pushback. Sources track the [`Position`] of the next
//! character so tokens can carry spans.

use std::io::{self, BufReader, Read};
use std::str::Chars;

use crate::logging::{codes, Code};
use crate::utils::Position;

/// Failures of the underlying character stream
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Invalid UTF-8 sequence at byte offset {offset}")]
    InvalidEncoding { offset: usize },
}

impl SourceError {
    pub fn error_code(&self) -> Code {
        match self {
            SourceError::Io { .. } => codes::file_processing::IO_ERROR,
            SourceError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
        }
    }
}

impl From<io::Error> for SourceError {
    fn from(err: io::Error) -> Self {
        SourceError::Io {
            message: err.to_string(),
        }
    }
}

/// Ordered character input with peek, consume and one-character pushback
pub trait CharSource {
    /// Next character without consuming it; `None` once exhausted
    fn peek(&mut self) -> Result<Option<char>, SourceError>;

    /// Consume and return the next character
    fn get(&mut self) -> Result<Option<char>, SourceError>;

    /// Push back the character just returned by [`get`](CharSource::get).
    ///
    /// Only one character of pushback is supported, and only directly after
    /// a `get`.
    fn unget(&mut self, ch: char);

    /// Position of the next character to be read
    fn position(&self) -> Position;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn peek(&mut self) -> Result<Option<char>, SourceError> {
        (**self).peek()
    }

    fn get(&mut self) -> Result<Option<char>, SourceError> {
        (**self).get()
    }

    fn unget(&mut self, ch: char) {
        (**self).unget(ch)
    }

    fn position(&self) -> Position {
        (**self).position()
    }
}

/// [`CharSource`] over any iterator of fallible characters.
///
/// After the iterator reports an error or runs dry the stream stays
/// exhausted.
#[derive(Debug)]
pub struct CharStream<I> {
    chars: I,
    pending: Option<char>,
    position: Position,
    before_last: Option<Position>,
    exhausted: bool,
}

impl<I> CharStream<I>
where
    I: Iterator<Item = Result<char, SourceError>>,
{
    pub fn new(chars: I) -> Self {
        Self {
            chars,
            pending: None,
            position: Position::start(),
            before_last: None,
            exhausted: false,
        }
    }

    /// True once the input has ended and nothing is pushed back
    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.pending.is_none()
    }

    fn fill(&mut self) -> Result<Option<char>, SourceError> {
        if let Some(ch) = self.pending {
            return Ok(Some(ch));
        }
        if self.exhausted {
            return Ok(None);
        }

        match self.chars.next() {
            Some(Ok(ch)) => {
                self.pending = Some(ch);
                Ok(Some(ch))
            }
            Some(Err(err)) => {
                self.exhausted = true;
                Err(err)
            }
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }
}

impl<I> CharSource for CharStream<I>
where
    I: Iterator<Item = Result<char, SourceError>>,
{
    fn peek(&mut self) -> Result<Option<char>, SourceError> {
        self.fill()
    }

    fn get(&mut self) -> Result<Option<char>, SourceError> {
        let next = self.fill()?;
        if let Some(ch) = next {
            self.pending = None;
            self.before_last = Some(self.position);
            self.position = self.position.advance(ch);
        }
        Ok(next)
    }

    fn unget(&mut self, ch: char) {
        debug_assert!(self.pending.is_none(), "only one character of pushback");
        self.pending = Some(ch);
        if let Some(previous) = self.before_last.take() {
            self.position = previous;
        }
    }

    fn position(&self) -> Position {
        self.position
    }
}

// ============================================================================
// IN-MEMORY SOURCES
// ============================================================================

/// Infallible characters of a string slice
#[derive(Debug, Clone)]
pub struct StrChars<'a>(Chars<'a>);

impl Iterator for StrChars<'_> {
    type Item = Result<char, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(Ok)
    }
}

pub type StrSource<'a> = CharStream<StrChars<'a>>;

impl<'a> CharStream<StrChars<'a>> {
    pub fn from_str(input: &'a str) -> Self {
        Self::new(StrChars(input.chars()))
    }
}

// ============================================================================
// READER SOURCES
// ============================================================================

/// Incremental UTF-8 decoder over a byte reader
pub struct ReaderChars<R: Read> {
    bytes: io::Bytes<BufReader<R>>,
    offset: usize,
    failed: bool,
}

impl<R: Read> ReaderChars<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
            offset: 0,
            failed: false,
        }
    }

    /// Bytes consumed so far
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn next_byte(&mut self) -> Option<Result<u8, SourceError>> {
        let byte = self.bytes.next()?;
        if byte.is_ok() {
            self.offset += 1;
        }
        Some(byte.map_err(SourceError::from))
    }

    fn decode(&mut self) -> Option<Result<char, SourceError>> {
        let start = self.offset;
        let first = match self.next_byte()? {
            Ok(byte) => byte,
            Err(err) => return Some(Err(err)),
        };

        let invalid = SourceError::InvalidEncoding { offset: start };
        let width = utf8_width(first);
        if width == 0 {
            return Some(Err(invalid));
        }

        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.next_byte() {
                Some(Ok(byte)) => *slot = byte,
                Some(Err(err)) => return Some(Err(err)),
                None => return Some(Err(invalid)),
            }
        }

        match std::str::from_utf8(&buf[..width]) {
            Ok(decoded) => decoded.chars().next().map(Ok),
            Err(_) => Some(Err(invalid)),
        }
    }
}

impl<R: Read> Iterator for ReaderChars<R> {
    type Item = Result<char, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let next = self.decode();
        if matches!(next, Some(Err(_))) {
            self.failed = true;
        }
        next
    }
}

pub type ReaderSource<R> = CharStream<ReaderChars<R>>;

impl<R: Read> CharStream<ReaderChars<R>> {
    pub fn from_reader(reader: R) -> Self {
        Self::new(ReaderChars::new(reader))
    }
}

/// Encoded length from the leading byte, 0 when it cannot start a sequence
fn utf8_width(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn drain<S: CharSource>(source: &mut S) -> Result<String, SourceError> {
        let mut out = String::new();
        while let Some(ch) = source.get()? {
            out.push(ch);
        }
        Ok(out)
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut source = CharStream::from_str("ab");
        assert_eq!(source.peek().unwrap(), Some('a'));
        assert_eq!(source.peek().unwrap(), Some('a'));
        assert_eq!(source.position(), Position::start());
        assert_eq!(source.get().unwrap(), Some('a'));
        assert_eq!(source.get().unwrap(), Some('b'));
        assert_eq!(source.get().unwrap(), None);
        assert!(source.is_exhausted());
    }

    #[test]
    fn test_unget_restores_char_and_position() {
        let mut source = CharStream::from_str("x\ny");
        source.get().unwrap();
        let before = source.position();
        assert_eq!(source.get().unwrap(), Some('\n'));
        assert_eq!(source.position().line, 2);

        source.unget('\n');
        assert_eq!(source.position(), before);
        assert!(!source.is_exhausted());
        assert_eq!(source.get().unwrap(), Some('\n'));
        assert_eq!(source.get().unwrap(), Some('y'));
        assert_eq!(source.position(), Position::new(3, 2, 2));
    }

    #[test]
    fn test_reader_decodes_multibyte() {
        let input = "a≠πb";
        let mut source = CharStream::from_reader(input.as_bytes());
        assert_eq!(drain(&mut source).unwrap(), input);
        assert_eq!(source.position().offset, input.len());
    }

    #[test]
    fn test_reader_rejects_invalid_utf8() {
        let bytes: &[u8] = &[b'o', b'k', 0xFF, b'x'];
        let mut source = CharStream::from_reader(bytes);

        assert_eq!(source.get().unwrap(), Some('o'));
        assert_eq!(source.get().unwrap(), Some('k'));
        assert_matches!(source.get(), Err(SourceError::InvalidEncoding { offset: 2 }));
        // The stream stays exhausted after a failure
        assert_eq!(source.get().unwrap(), None);
    }

    #[test]
    fn test_reader_rejects_truncated_sequence() {
        let bytes: &[u8] = &[b'a', 0xE2, 0x89];
        let mut source = CharStream::from_reader(bytes);

        assert_eq!(source.get().unwrap(), Some('a'));
        assert_matches!(source.get(), Err(SourceError::InvalidEncoding { offset: 1 }));
    }

    #[test]
    fn test_reader_rejects_overlong_encoding() {
        // 0xE0 0x80 0x80 is an overlong NUL
        let bytes: &[u8] = &[0xE0, 0x80, 0x80];
        let mut source = CharStream::from_reader(bytes);
        assert_matches!(source.get(), Err(SourceError::InvalidEncoding { offset: 0 }));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device unplugged"))
        }
    }

    #[test]
    fn test_reader_io_error_surfaces() {
        let mut source = CharStream::from_reader(FailingReader);
        let err = source.peek().unwrap_err();
        assert_matches!(&err, SourceError::Io { message } if message.contains("unplugged"));
        assert_eq!(err.error_code(), codes::file_processing::IO_ERROR);
    }
}

use super::error::{BencodeError, Result};
use super::value::{Dict, Value};
use super::DEFAULT_MAX_DEPTH;
use bytes::Bytes;
use std::io::{BufRead, ErrorKind, Read};
use tracing::{debug, trace};

/// Longest integer span: `-9223372036854775808`.
const MAX_INTEGER_SPAN: usize = 20;

/// Longest length prefix: `usize::MAX` on 64-bit targets.
const MAX_LENGTH_SPAN: usize = 20;

/// Upper bound on the buffer reserved up front for a string payload.
const PAYLOAD_PREALLOC: usize = 64 * 1024;

/// Decodes a single bencode value spanning all of `data`.
///
/// # Errors
///
/// Fails if the value is malformed, or with [`BencodeError::TrailingData`] if
/// bytes remain after it.
///
/// # Examples
///
/// ```
/// use rbencode::bencode::{decode, BencodeError, Value};
///
/// assert_eq!(decode(b"i-42e").unwrap(), Value::Integer(-42));
/// assert!(matches!(decode(b"i42eextra"), Err(BencodeError::TrailingData(5))));
/// ```
pub fn decode(data: &[u8]) -> Result<Value> {
    let (value, consumed) = decode_prefix(data)?;

    if consumed != data.len() {
        return Err(BencodeError::TrailingData(data.len() - consumed));
    }

    Ok(value)
}

/// Decodes the first bencode value in `data` and returns it together with the
/// number of bytes it occupied.
///
/// ```
/// use rbencode::bencode::{decode_prefix, Value};
///
/// let data = b"dei7e";
/// let (first, used) = decode_prefix(data).unwrap();
/// assert_eq!(used, 2);
/// assert_eq!(first.as_dict().map(|d| d.len()), Some(0));
/// assert_eq!(decode_prefix(&data[used..]).unwrap(), (Value::Integer(7), 3));
/// ```
pub fn decode_prefix(data: &[u8]) -> Result<(Value, usize)> {
    let mut decoder = Decoder::new(data);
    let value = decoder.decode()?;
    Ok((value, decoder.position() as usize))
}

/// Decodes one bencode value from a buffered reader.
///
/// Pass `&mut reader` to keep using the reader afterwards; it is left
/// positioned right after the value.
pub fn decode_from<R: BufRead>(reader: R) -> Result<Value> {
    Decoder::new(reader).decode()
}

/// Streaming bencode decoder.
///
/// Each call to [`decode`](Decoder::decode) consumes exactly the bytes of one
/// value, so a stream holding several values back to back can be read one
/// value at a time.
///
/// # Examples
///
/// ```
/// use rbencode::bencode::{Decoder, Value};
///
/// let mut decoder = Decoder::new(&b"4:spami42ele"[..]);
/// assert_eq!(decoder.decode().unwrap(), Value::string("spam"));
/// assert_eq!(decoder.decode().unwrap(), Value::Integer(42));
/// assert_eq!(decoder.decode().unwrap(), Value::List(vec![]));
/// assert!(decoder.decode_next().unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct Decoder<R> {
    reader: R,
    max_depth: usize,
    position: u64,
    failed: bool,
}

enum Span {
    Delimited(Vec<u8>),
    TooLong(Vec<u8>),
    Eof,
}

impl<R: BufRead> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            max_depth: DEFAULT_MAX_DEPTH,
            position: 0,
            failed: false,
        }
    }

    /// Sets how many containers may be open at once. A top-level list holding
    /// only atoms needs a depth of 1.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Number of bytes consumed from the reader so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Borrows the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Returns the underlying reader, positioned after the last decoded value.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Decodes the next value. Running out of input before a value starts is
    /// [`BencodeError::UnexpectedEof`].
    pub fn decode(&mut self) -> Result<Value> {
        self.decode_next()?.ok_or(BencodeError::UnexpectedEof)
    }

    /// Decodes the next value, or returns `None` if the stream is exhausted.
    pub fn decode_next(&mut self) -> Result<Option<Value>> {
        if self.peek()?.is_none() {
            return Ok(None);
        }

        let start = self.position;
        match self.decode_value(0) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                trace!(
                    "Rejected bencode value at byte {} (failed at byte {}): {}",
                    start,
                    self.position,
                    e
                );
                Err(e)
            }
        }
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn expect_peek(&mut self) -> Result<u8> {
        self.peek()?.ok_or(BencodeError::UnexpectedEof)
    }

    fn bump(&mut self) {
        self.reader.consume(1);
        self.position += 1;
    }

    fn decode_value(&mut self, depth: usize) -> Result<Value> {
        match self.expect_peek()? {
            b'i' => self.decode_integer(),
            b'l' => self.decode_list(depth),
            b'd' => self.decode_dict(depth),
            b'0'..=b'9' => self.decode_bytes().map(Value::Bytes),
            c => Err(BencodeError::UnsupportedType(c)),
        }
    }

    fn enter_container(&mut self, depth: usize) -> Result<()> {
        if depth >= self.max_depth {
            debug!(
                "Bencode nesting exceeds {} levels at byte {}",
                self.max_depth, self.position
            );
            return Err(BencodeError::NestingTooDeep(self.max_depth));
        }
        self.bump();
        Ok(())
    }

    /// Reads up to and including `delimiter`, giving up after `limit` bytes.
    fn read_span(&mut self, delimiter: u8, limit: usize) -> Result<Span> {
        let mut span = Vec::new();
        let read = (&mut self.reader)
            .take(limit as u64 + 1)
            .read_until(delimiter, &mut span)?;
        self.position += read as u64;

        if span.last() == Some(&delimiter) {
            span.pop();
            Ok(Span::Delimited(span))
        } else if span.len() > limit {
            Ok(Span::TooLong(span))
        } else {
            Ok(Span::Eof)
        }
    }

    fn decode_integer(&mut self) -> Result<Value> {
        self.bump();

        let value = match self.read_span(b'e', MAX_INTEGER_SPAN)? {
            Span::Delimited(span) => parse_integer(&span)?,
            Span::TooLong(span) => return Err(self.skip_oversized_integer(span)),
            Span::Eof => return Err(BencodeError::UnexpectedEof),
        };

        Ok(Value::Integer(value))
    }

    /// Consumes the rest of an integer too long for an `i64`, reporting
    /// overflow only if every byte up to the terminator is a digit.
    fn skip_oversized_integer(&mut self, span: Vec<u8>) -> BencodeError {
        if let Err(e @ BencodeError::MalformedInteger(_)) = parse_integer(&span) {
            return e;
        }

        let mut consumed = span;
        loop {
            match self.peek() {
                Ok(Some(b'e')) => {
                    self.bump();
                    return BencodeError::IntegerOverflow(lossy(&consumed));
                }
                Ok(Some(c)) if c.is_ascii_digit() => {
                    self.bump();
                    if consumed.len() < MAX_INTEGER_SPAN * 2 {
                        consumed.push(c);
                    }
                }
                Ok(Some(_)) => return BencodeError::MalformedInteger(lossy(&consumed)),
                Ok(None) => return BencodeError::UnexpectedEof,
                Err(e) => return e,
            }
        }
    }

    fn decode_bytes(&mut self) -> Result<Bytes> {
        let len = match self.read_span(b':', MAX_LENGTH_SPAN)? {
            Span::Delimited(span) => parse_length(&span)?,
            Span::TooLong(_) => return Err(BencodeError::MalformedLength),
            Span::Eof => return Err(BencodeError::UnexpectedEof),
        };

        let mut payload = Vec::with_capacity(len.min(PAYLOAD_PREALLOC));
        let read = (&mut self.reader)
            .take(len as u64)
            .read_to_end(&mut payload)?;
        self.position += read as u64;

        if read != len {
            return Err(BencodeError::MalformedString {
                expected: len,
                actual: read,
            });
        }

        Ok(Bytes::from(payload))
    }

    fn decode_list(&mut self, depth: usize) -> Result<Value> {
        self.enter_container(depth)?;
        let mut list = Vec::new();

        while self.expect_peek()? != b'e' {
            list.push(self.decode_value(depth + 1)?);
        }

        self.bump();
        Ok(Value::List(list))
    }

    fn decode_dict(&mut self, depth: usize) -> Result<Value> {
        self.enter_container(depth)?;
        let mut dict = Dict::new();

        loop {
            let key = match self.expect_peek()? {
                b'e' => break,
                b'0'..=b'9' => self.decode_bytes()?,
                b'i' => return Err(BencodeError::NonStringKey("integer")),
                b'l' => return Err(BencodeError::NonStringKey("list")),
                b'd' => return Err(BencodeError::NonStringKey("dictionary")),
                c => return Err(BencodeError::UnsupportedType(c)),
            };

            let value = self.decode_value(depth + 1)?;
            dict.insert(key, value);
        }

        self.bump();
        Ok(Value::Dict(dict))
    }
}

impl<R: BufRead> Iterator for Decoder<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.decode_next() {
            Ok(value) => value.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

fn lossy(span: &[u8]) -> String {
    String::from_utf8_lossy(span).into_owned()
}

fn parse_integer(span: &[u8]) -> Result<i64> {
    let digits = span.strip_prefix(b"-").unwrap_or(span);

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(BencodeError::MalformedInteger(lossy(span)));
    }

    if span.starts_with(b"-0") || (digits[0] == b'0' && digits.len() > 1) {
        return Err(BencodeError::MalformedInteger(format!(
            "leading zeros in {}",
            lossy(span)
        )));
    }

    let text =
        std::str::from_utf8(span).map_err(|_| BencodeError::MalformedInteger(lossy(span)))?;
    text.parse()
        .map_err(|_| BencodeError::IntegerOverflow(text.to_owned()))
}

fn parse_length(span: &[u8]) -> Result<usize> {
    if span.is_empty()
        || !span.iter().all(u8::is_ascii_digit)
        || (span[0] == b'0' && span.len() > 1)
    {
        return Err(BencodeError::MalformedLength);
    }

    std::str::from_utf8(span)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or(BencodeError::MalformedLength)
}

use super::error::{BencodeError, Result};
use super::value::Value;
use super::DEFAULT_MAX_DEPTH;
use std::io::Write;

/// Encodes a bencode value to a byte vector.
///
/// The output follows the canonical bencode format:
/// - Integers: `i<number>e`
/// - Byte strings: `<length>:<data>`
/// - Lists: `l<items>e`
/// - Dictionaries: `d<key><value>...e` (keys sorted by raw bytes)
///
/// # Errors
///
/// Returns [`BencodeError::NestingTooDeep`] if the value nests more than
/// [`DEFAULT_MAX_DEPTH`] containers.
///
/// # Examples
///
/// ```
/// use rbencode::bencode::{encode, Dict, Value};
/// use bytes::Bytes;
///
/// // Encode an integer
/// let encoded = encode(&Value::Integer(42)).unwrap();
/// assert_eq!(encoded, b"i42e");
///
/// // Encode a list
/// let list = Value::List(vec![Value::Integer(1), Value::string("two")]);
/// let encoded = encode(&list).unwrap();
/// assert_eq!(encoded, b"li1e3:twoe");
///
/// // Keys come out sorted whatever order they went in
/// let mut dict = Dict::new();
/// dict.insert(Bytes::from_static(b"b"), Value::Integer(2));
/// dict.insert(Bytes::from_static(b"a"), Value::Integer(1));
/// let encoded = encode(&Value::Dict(dict)).unwrap();
/// assert_eq!(encoded, b"d1:ai1e1:bi2ee");
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    Encoder::new().encode(value)
}

/// Appends the encoding of `value` to `writer`.
///
/// ```
/// use rbencode::bencode::{encode_to, Value};
///
/// let mut buf = b"prefix:".to_vec();
/// encode_to(&Value::string("spam"), &mut buf).unwrap();
/// assert_eq!(buf, b"prefix:4:spam");
/// ```
pub fn encode_to<W: Write + ?Sized>(value: &Value, writer: &mut W) -> Result<()> {
    Encoder::new().encode_to(value, writer)
}

/// Bencode encoder with a configurable nesting bound.
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    max_depth: usize,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Creates an encoder allowing [`DEFAULT_MAX_DEPTH`] nested containers.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets how many containers may be open at once. A top-level list holding
    /// only atoms needs a depth of 1.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Encodes `value` into a buffer sized up front to its exact length.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        self.check_depth(value, 0)?;

        let mut buf = Vec::with_capacity(value.encoded_len());
        encode_value(value, &mut buf)?;
        Ok(buf)
    }

    /// Writes the encoding of `value`. The nesting bound is checked before
    /// anything is written, so only I/O errors can leave partial output behind.
    pub fn encode_to<W: Write + ?Sized>(&self, value: &Value, writer: &mut W) -> Result<()> {
        self.check_depth(value, 0)?;
        encode_value(value, writer)
    }

    fn check_depth(&self, value: &Value, depth: usize) -> Result<()> {
        match value {
            Value::Integer(_) | Value::Bytes(_) => Ok(()),
            Value::List(l) => self.check_children(l.iter(), depth),
            Value::Dict(d) => self.check_children(d.values(), depth),
        }
    }

    fn check_children<'a>(
        &self,
        children: impl Iterator<Item = &'a Value>,
        depth: usize,
    ) -> Result<()> {
        if depth >= self.max_depth {
            return Err(BencodeError::NestingTooDeep(self.max_depth));
        }

        for child in children {
            self.check_depth(child, depth + 1)?;
        }
        Ok(())
    }
}

fn encode_value<W: Write + ?Sized>(value: &Value, writer: &mut W) -> Result<()> {
    match value {
        Value::Integer(i) => {
            write!(writer, "i{}e", i)?;
        }
        Value::Bytes(b) => {
            encode_string(b, writer)?;
        }
        Value::List(l) => {
            writer.write_all(b"l")?;
            for item in l {
                encode_value(item, writer)?;
            }
            writer.write_all(b"e")?;
        }
        Value::Dict(d) => {
            let mut entries: Vec<_> = d.iter().collect();
            entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

            writer.write_all(b"d")?;
            for (key, val) in entries {
                encode_string(key, writer)?;
                encode_value(val, writer)?;
            }
            writer.write_all(b"e")?;
        }
    }
    Ok(())
}

fn encode_string<W: Write + ?Sized>(b: &[u8], writer: &mut W) -> Result<()> {
    write!(writer, "{}:", b.len())?;
    writer.write_all(b)?;
    Ok(())
}

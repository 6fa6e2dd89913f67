//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files and tracker
//! responses. This module only cares about the shape of the data, not what
//! it means.
//!
//! # Data Types
//!
//! Bencode supports four data types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Examples
//!
//! ## Decoding bencode data
//!
//! ```
//! use rbencode::bencode::{decode, Value};
//!
//! // Decode an integer
//! let value = decode(b"i42e").unwrap();
//! assert_eq!(value.as_integer(), Some(42));
//!
//! // Decode a string
//! let value = decode(b"4:spam").unwrap();
//! assert_eq!(value.as_str(), Some("spam"));
//!
//! // Decode a list
//! let value = decode(b"l4:spami42ee").unwrap();
//! let list = value.as_list().unwrap();
//! assert_eq!(list.len(), 2);
//!
//! // Decode a dictionary
//! let value = decode(b"d3:foo3:bare").unwrap();
//! let foo = value.get(b"foo").unwrap();
//! assert_eq!(foo.as_str(), Some("bar"));
//! ```
//!
//! ## Decoding a stream
//!
//! ```
//! use rbencode::bencode::{Decoder, Value};
//! use std::io::BufReader;
//!
//! let input = BufReader::new(&b"i1ei2e3:end"[..]);
//! let values: Vec<Value> = Decoder::new(input).collect::<Result<_, _>>().unwrap();
//! assert_eq!(values.len(), 3);
//! ```
//!
//! ## Encoding bencode data
//!
//! ```
//! use rbencode::bencode::{encode, Value};
//!
//! let torrent: Value = [
//!     ("announce", Value::string("http://tracker.example.com/announce")),
//!     (
//!         "info",
//!         [
//!             ("name", Value::string("example.txt")),
//!             ("length", Value::Integer(1024)),
//!         ]
//!         .into_iter()
//!         .collect(),
//!     ),
//! ]
//! .into_iter()
//! .collect();
//!
//! let encoded = encode(&torrent).unwrap();
//! assert!(encoded.starts_with(b"d8:announce"));
//! ```
//!
//! # Canonical form
//!
//! Dictionaries keep the key order they were decoded or built in, but the
//! encoder always writes keys sorted by raw bytes. Re-encoding a decoded
//! value is byte-identical to the input only when the input was canonical.
//!
//! # Error Handling
//!
//! Decoding can fail for various reasons:
//!
//! - [`BencodeError::MalformedLength`] - Bad string length prefix
//! - [`BencodeError::MalformedString`] - String shorter than its declared length
//! - [`BencodeError::MalformedInteger`] - Malformed integer (e.g., leading zeros)
//! - [`BencodeError::IntegerOverflow`] - Integer does not fit in an `i64`
//! - [`BencodeError::NonStringKey`] - Dictionary key that is not a byte string
//! - [`BencodeError::UnsupportedType`] - Byte that starts no bencode value
//! - [`BencodeError::NestingTooDeep`] - Recursion limit exceeded (64 levels by default)
//! - [`BencodeError::UnexpectedEof`] - Input ended unexpectedly
//! - [`BencodeError::TrailingData`] - Extra data after the value
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod value;

pub use decode::{decode, decode_from, decode_prefix, Decoder};
pub use encode::{encode, encode_to, Encoder};
pub use error::{BencodeError, Result};
pub use value::{Dict, Value};

/// Default number of containers that may be nested inside one another.
pub const DEFAULT_MAX_DEPTH: usize = 64;

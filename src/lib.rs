//! rbencode - A Bencode codec
//!
//! Decodes BitTorrent's bencode format into a [`Value`] tree and encodes
//! values back into their canonical bytes.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 Bencode encoding/decoding

pub mod bencode;

pub use bencode::{
    decode, decode_from, decode_prefix, encode, encode_to, BencodeError, Decoder, Dict, Encoder,
    Value,
};

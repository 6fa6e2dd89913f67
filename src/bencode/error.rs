use thiserror::Error;

#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("malformed string length")]
    MalformedLength,

    #[error("malformed string: expected {expected} bytes, got {actual}")]
    MalformedString { expected: usize, actual: usize },

    #[error("malformed integer: {0}")]
    MalformedInteger(String),

    #[error("dictionary key must be a byte string, got {0}")]
    NonStringKey(&'static str),

    #[error("unsupported type: {}", describe_byte(.0))]
    UnsupportedType(u8),

    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("integer out of range: {0}")]
    IntegerOverflow(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("{0} bytes of trailing data after value")]
    TrailingData(usize),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_byte(b: &u8) -> String {
    if b.is_ascii_graphic() {
        format!("{:?}", *b as char)
    } else {
        format!("0x{:02x}", b)
    }
}

pub type Result<T, E = BencodeError> = std::result::Result<T, E>;

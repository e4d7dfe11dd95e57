//! The generic value tree produced by [`Decoder::pop_next_value`](crate::decode::Decoder::pop_next_value)
//! and consumed by [`Encoder::write_value`](crate::encode::Encoder::write_value).

/// Standard date/time string (RFC 3339), RFC 8949 §3.4.1.
pub const TAG_STANDARD_DATETIME: u64 = 0;

/// Encoded CBOR data item, RFC 8949 §3.4.5.1.
pub const TAG_ENCODED_CBOR: u64 = 24;

/// URI (RFC 3986), RFC 8949 §3.4.5.3.
pub const TAG_URI: u64 = 32;

/// Base64url-encoded text, RFC 8949 §3.4.5.3.
pub const TAG_BASE64URL: u64 = 33;

/// Base64-encoded text, RFC 8949 §3.4.5.3.
pub const TAG_BASE64: u64 = 34;

/// The closed set of tags the decoder will reconstruct.
///
/// Epoch timestamps, bignums and decimal fractions are deliberately not in
/// this set; they decode as [`Error::UnsupportedTag`](crate::Error::UnsupportedTag).
pub fn tag_is_recognized(tag: u64) -> bool {
    matches!(
        tag,
        TAG_STANDARD_DATETIME | TAG_ENCODED_CBOR | TAG_URI | TAG_BASE64URL | TAG_BASE64
    )
}

/// Smallest logical integer a CBOR negative integer can carry (-2^64).
pub const INTEGER_MIN: i128 = -(1i128 << 64);

/// Largest logical integer a CBOR unsigned integer can carry (2^64 - 1).
pub const INTEGER_MAX: i128 = (1i128 << 64) - 1;

/// An owned, fully materialized CBOR value.
///
/// Maps are kept as a sequence of pairs in wire encounter order, so that
/// re-encoding a decoded map reproduces the original bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Logical integer in `[-2^64, 2^64 - 1]`; i128 covers both the unsigned
    /// and negative CBOR ranges without loss.
    Integer(i128),
    Float(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Tag(u64, Box<Value>),
    Null,
    Undefined,
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Integer(value as i128)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value as i128)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(value: Vec<(Value, Value)>) -> Self {
        Value::Map(value)
    }
}

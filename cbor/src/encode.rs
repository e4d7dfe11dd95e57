use crate::Error;
use crate::value::{INTEGER_MAX, INTEGER_MIN, Value};

/// A stream-oriented CBOR encoder over a growable byte buffer.
///
/// Writers append to the buffer; nothing is ever rewritten or reset.
/// Aggregate starts (`write_array_start`, `write_map_start`, `write_tag`)
/// emit only the header; the caller must follow with exactly the declared
/// number of items for the output to be well-formed.
pub struct Encoder {
    data: Vec<u8>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// All bytes produced so far. Cumulative; does not consume or reset.
    pub fn get_encoded_data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn emit_uint_minor(&mut self, major: u8, val: u64) {
        if val < 24 {
            self.data.push((major << 5) | (val as u8))
        } else if val <= u8::MAX as u64 {
            self.data.push((major << 5) | 24u8);
            self.data.push(val as u8)
        } else if val <= u16::MAX as u64 {
            self.data.push((major << 5) | 25u8);
            self.data.extend((val as u16).to_be_bytes())
        } else if val <= u32::MAX as u64 {
            self.data.push((major << 5) | 26u8);
            self.data.extend((val as u32).to_be_bytes())
        } else {
            self.data.push((major << 5) | 27u8);
            self.data.extend(val.to_be_bytes())
        }
    }

    pub fn write_uint(&mut self, value: u64) {
        self.emit_uint_minor(0, value)
    }

    /// Write major type 1 with the encoded argument `value`, i.e. the
    /// logical integer `-1 - value`.
    pub fn write_negint(&mut self, value: u64) {
        self.emit_uint_minor(1, value)
    }

    /// Write a logical integer in `[-2^64, 2^64 - 1]`, selecting major
    /// type 0 or 1. Anything outside that range fails with [`Error::Overflow`].
    pub fn write_int(&mut self, value: i128) -> Result<(), Error> {
        if !(INTEGER_MIN..=INTEGER_MAX).contains(&value) {
            return Err(Error::Overflow);
        }
        if value >= 0 {
            self.write_uint(value as u64);
        } else {
            // -1 - value cannot overflow i128 and fits u64 once range-checked
            self.write_negint((-1 - value) as u64);
        }
        Ok(())
    }

    /// Always emits the 8-byte form, never a narrowed 16/32-bit float.
    pub fn write_float(&mut self, value: f64) {
        self.data.push((7 << 5) | 27);
        self.data.extend(value.to_be_bytes())
    }

    pub fn write_bytes(&mut self, value: &[u8]) {
        self.emit_uint_minor(2, value.len() as u64);
        self.data.extend_from_slice(value)
    }

    pub fn write_text(&mut self, value: &str) {
        self.emit_uint_minor(3, value.len() as u64);
        self.data.extend_from_slice(value.as_bytes())
    }

    pub fn write_bool(&mut self, value: bool) {
        self.data.push((7 << 5) | if value { 21 } else { 20 })
    }

    pub fn write_null(&mut self) {
        self.data.push((7 << 5) | 22)
    }

    pub fn write_undefined(&mut self) {
        self.data.push((7 << 5) | 23)
    }

    /// Write an unassigned simple value (major type 7).
    ///
    /// Codes 20..=23 have dedicated writers and 24..=31 are reserved by
    /// RFC 8949; both fail with [`Error::InvalidArgument`].
    pub fn write_simple(&mut self, value: u8) -> Result<(), Error> {
        match value {
            20..=31 => Err(Error::InvalidArgument(
                "simple values 20..=31 are assigned or reserved",
            )),
            0..=19 => {
                self.data.push((7 << 5) | value);
                Ok(())
            }
            _ => {
                self.data.push((7 << 5) | 24);
                self.data.push(value);
                Ok(())
            }
        }
    }

    /// Header only; the caller must write exactly `count` values next.
    pub fn write_array_start(&mut self, count: u64) {
        self.emit_uint_minor(4, count)
    }

    /// Header only; the caller must write exactly `count` key/value pairs next.
    pub fn write_map_start(&mut self, count: u64) {
        self.emit_uint_minor(5, count)
    }

    /// Header only; the caller must write exactly one value next.
    pub fn write_tag(&mut self, tag: u64) {
        self.emit_uint_minor(6, tag)
    }

    /// Recursively serialize a whole value tree.
    ///
    /// Array elements and map pairs are written in their stored order, so
    /// encoding the same tree twice is byte-identical.
    pub fn write_value(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Integer(v) => self.write_int(*v)?,
            Value::Float(v) => self.write_float(*v),
            Value::Bool(v) => self.write_bool(*v),
            Value::Bytes(v) => self.write_bytes(v),
            Value::Text(v) => self.write_text(v),
            Value::Array(items) => {
                self.write_array_start(items.len() as u64);
                for item in items {
                    self.write_value(item)?;
                }
            }
            Value::Map(pairs) => {
                self.write_map_start(pairs.len() as u64);
                for (key, val) in pairs {
                    self.write_value(key)?;
                    self.write_value(val)?;
                }
            }
            Value::Tag(tag, inner) => {
                self.write_tag(*tag);
                self.write_value(inner)?;
            }
            Value::Null => self.write_null(),
            Value::Undefined => self.write_undefined(),
        }
        Ok(())
    }
}

use crate::Error;
use crate::value::{Value, tag_is_recognized};

/// What the next element in the stream is, as reported by
/// [`Decoder::peek_type`].
///
/// `Array` and `Map` mean a *definite*-length start; the indefinite starts
/// and `Break` are distinct members because they drive different decode
/// paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    UnsignedInt,
    NegativeInt,
    ByteString,
    TextString,
    Array,
    Map,
    Tag,
    Float,
    Bool,
    Null,
    Undefined,
    Break,
    IndefiniteByteStringStart,
    IndefiniteTextStringStart,
    IndefiniteArrayStart,
    IndefiniteMapStart,
}

fn take<const N: usize>(data: &[u8]) -> Result<[u8; N], Error> {
    data.get(..N)
        .and_then(|s| s.try_into().ok())
        .ok_or(Error::InsufficientData)
}

/// A cursor over a borrowed CBOR byte slice.
///
/// The input is borrowed, never copied; it must outlive the decoder and any
/// `pop_next_bytes`/`pop_next_text` slices handed out. The cursor only moves
/// forward, and never past the end of the input.
pub struct Decoder<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn get_remaining_bytes_len(&self) -> usize {
        self.data.len() - self.offset
    }

    fn peek_byte(&self) -> Result<u8, Error> {
        self.data
            .get(self.offset)
            .copied()
            .ok_or(Error::InsufficientData)
    }

    /// Classify the next element without consuming anything.
    pub fn peek_type(&self) -> Result<ElementType, Error> {
        let initial = self.peek_byte()?;
        match (initial >> 5, initial & 0x1F) {
            (0, 0..=27) => Ok(ElementType::UnsignedInt),
            (1, 0..=27) => Ok(ElementType::NegativeInt),
            (2, 31) => Ok(ElementType::IndefiniteByteStringStart),
            (2, 0..=27) => Ok(ElementType::ByteString),
            (3, 31) => Ok(ElementType::IndefiniteTextStringStart),
            (3, 0..=27) => Ok(ElementType::TextString),
            (4, 31) => Ok(ElementType::IndefiniteArrayStart),
            (4, 0..=27) => Ok(ElementType::Array),
            (5, 31) => Ok(ElementType::IndefiniteMapStart),
            (5, 0..=27) => Ok(ElementType::Map),
            (6, 0..=27) => Ok(ElementType::Tag),
            (7, 20 | 21) => Ok(ElementType::Bool),
            (7, 22) => Ok(ElementType::Null),
            (7, 23) => Ok(ElementType::Undefined),
            (7, 25..=27) => Ok(ElementType::Float),
            (7, 31) => Ok(ElementType::Break),
            // Minor values 28..=30, and simple values this crate does not
            // model (unassigned codes, one-byte simple form)
            _ => Err(Error::UnexpectedType),
        }
    }

    fn expect_type(&self, expected: ElementType) -> Result<(), Error> {
        if self.peek_type()? == expected {
            Ok(())
        } else {
            Err(Error::UnexpectedType)
        }
    }

    /// Parse the argument for the header at the cursor. Returns the argument
    /// and the full header length (initial byte included). Does not advance.
    fn parse_arg(&self) -> Result<(u64, usize), Error> {
        let minor = self.peek_byte()? & 0x1F;
        let follow = &self.data[self.offset + 1..];
        match minor {
            0..=23 => Ok((minor as u64, 1)),
            24 => Ok((
                *follow.first().ok_or(Error::InsufficientData)? as u64,
                2,
            )),
            25 => Ok((u16::from_be_bytes(take(follow)?) as u64, 3)),
            26 => Ok((u32::from_be_bytes(take(follow)?) as u64, 5)),
            27 => Ok((u64::from_be_bytes(take(follow)?), 9)),
            _ => Err(Error::UnexpectedType),
        }
    }

    /// Pop one argument-carrying header (uint/negint/tag/array/map starts).
    fn pop_arg(&mut self) -> Result<u64, Error> {
        let (value, len) = self.parse_arg()?;
        self.offset += len;
        Ok(value)
    }

    /// Pop the payload of the definite-length string header at the cursor,
    /// returning the content slice straight out of the input.
    fn pop_string_payload(&mut self) -> Result<&'a [u8], Error> {
        let (data_len, head_len) = self.parse_arg()?;
        let data_len = usize::try_from(data_len).map_err(|_| Error::Overflow)?;
        let start = self.offset + head_len;
        let end = start.checked_add(data_len).ok_or(Error::Overflow)?;
        if end > self.data.len() {
            return Err(Error::InsufficientData);
        }
        self.offset = end;
        Ok(&self.data[start..end])
    }

    pub fn pop_next_uint(&mut self) -> Result<u64, Error> {
        self.expect_type(ElementType::UnsignedInt)?;
        self.pop_arg()
    }

    /// The raw encoded argument `n` of a negative integer; the logical value
    /// is `-1 - n`.
    pub fn pop_next_negint(&mut self) -> Result<u64, Error> {
        self.expect_type(ElementType::NegativeInt)?;
        self.pop_arg()
    }

    /// Accepts all three float widths, widening to f64.
    pub fn pop_next_float(&mut self) -> Result<f64, Error> {
        self.expect_type(ElementType::Float)?;
        let follow = &self.data[self.offset + 1..];
        let (value, len) = match self.peek_byte()? & 0x1F {
            25 => (half::f16::from_be_bytes(take(follow)?).into(), 3),
            26 => (f32::from_be_bytes(take(follow)?).into(), 5),
            27 => (f64::from_be_bytes(take(follow)?), 9),
            _ => unreachable!(),
        };
        self.offset += len;
        Ok(value)
    }

    pub fn pop_next_bool(&mut self) -> Result<bool, Error> {
        self.expect_type(ElementType::Bool)?;
        let value = (self.peek_byte()? & 0x1F) == 21;
        self.offset += 1;
        Ok(value)
    }

    /// Definite-length byte string; the returned slice borrows the input.
    pub fn pop_next_bytes(&mut self) -> Result<&'a [u8], Error> {
        self.expect_type(ElementType::ByteString)?;
        self.pop_string_payload()
    }

    /// Definite-length text string; the returned slice borrows the input.
    pub fn pop_next_text(&mut self) -> Result<&'a str, Error> {
        self.expect_type(ElementType::TextString)?;
        Ok(core::str::from_utf8(self.pop_string_payload()?)?)
    }

    /// The tag number only; the tagged value remains next in the stream.
    pub fn pop_next_tag(&mut self) -> Result<u64, Error> {
        self.expect_type(ElementType::Tag)?;
        self.pop_arg()
    }

    /// Declared element count of a definite-length array. An indefinite
    /// start is `UnexpectedType`; use [`Decoder::pop_next_value`] for those.
    pub fn pop_next_array_start(&mut self) -> Result<u64, Error> {
        self.expect_type(ElementType::Array)?;
        self.pop_arg()
    }

    /// Declared pair count of a definite-length map.
    pub fn pop_next_map_start(&mut self) -> Result<u64, Error> {
        self.expect_type(ElementType::Map)?;
        self.pop_arg()
    }

    /// Advance past exactly one structural element: a scalar with its
    /// payload, or a lone header (aggregate start, tag, Break). Never
    /// descends into an aggregate's children.
    pub fn consume_next_element(&mut self) -> Result<(), Error> {
        match self.peek_type()? {
            ElementType::UnsignedInt
            | ElementType::NegativeInt
            | ElementType::Tag
            | ElementType::Array
            | ElementType::Map => {
                self.pop_arg()?;
            }
            ElementType::ByteString | ElementType::TextString => {
                // no UTF-8 validation when skipping
                self.pop_string_payload()?;
            }
            ElementType::Float => {
                self.pop_next_float()?;
            }
            ElementType::Bool
            | ElementType::Null
            | ElementType::Undefined
            | ElementType::Break
            | ElementType::IndefiniteByteStringStart
            | ElementType::IndefiniteTextStringStart
            | ElementType::IndefiniteArrayStart
            | ElementType::IndefiniteMapStart => {
                self.offset += 1;
            }
        }
        Ok(())
    }

    /// Skip one entire well-formed data item, nested content included,
    /// without materializing anything.
    ///
    /// Frames track outstanding children: `Some(n)` for a definite-length
    /// aggregate, `None` for an indefinite run closed only by Break.
    pub fn consume_next_data_item(&mut self) -> Result<(), Error> {
        let mut frames: Vec<Option<u64>> = vec![Some(1)];
        while let Some(frame) = frames.last_mut() {
            if *frame == Some(0) {
                frames.pop();
                continue;
            }
            let element = self.peek_type()?;
            if element == ElementType::Break {
                if frame.is_some() {
                    return Err(Error::UnexpectedType);
                }
                self.offset += 1;
                frames.pop();
                continue;
            }
            if let Some(n) = frame {
                *n -= 1;
            }
            match element {
                ElementType::Array => {
                    let count = self.pop_next_array_start()?;
                    frames.push(Some(count));
                }
                ElementType::Map => {
                    let count = self.pop_next_map_start()?;
                    frames.push(Some(count.checked_mul(2).ok_or(Error::Overflow)?));
                }
                ElementType::Tag => {
                    self.pop_next_tag()?;
                    frames.push(Some(1));
                }
                ElementType::IndefiniteArrayStart
                | ElementType::IndefiniteMapStart
                | ElementType::IndefiniteByteStringStart
                | ElementType::IndefiniteTextStringStart => {
                    self.offset += 1;
                    frames.push(None);
                }
                _ => self.consume_next_element()?,
            }
        }
        Ok(())
    }

    /// Materialize the next data item as a [`Value`] tree.
    ///
    /// Indefinite-length arrays, maps and chunked strings are reconstructed
    /// into the same shapes their definite-length equivalents produce; map
    /// pair order is wire encounter order.
    pub fn pop_next_value(&mut self) -> Result<Value, Error> {
        match self.peek_type()? {
            ElementType::UnsignedInt => Ok(Value::Integer(self.pop_next_uint()? as i128)),
            ElementType::NegativeInt => {
                Ok(Value::Integer(-1 - self.pop_next_negint()? as i128))
            }
            ElementType::Float => Ok(Value::Float(self.pop_next_float()?)),
            ElementType::Bool => Ok(Value::Bool(self.pop_next_bool()?)),
            ElementType::ByteString => Ok(Value::Bytes(self.pop_next_bytes()?.to_vec())),
            ElementType::TextString => Ok(Value::Text(self.pop_next_text()?.to_string())),
            ElementType::Null | ElementType::Undefined => {
                self.consume_next_element()?;
                Ok(Value::Null)
            }
            ElementType::Array => {
                let count = self.pop_next_array_start()?;
                let mut items = Vec::new();
                for _ in 0..count {
                    items.push(self.pop_next_value()?);
                }
                Ok(Value::Array(items))
            }
            ElementType::IndefiniteArrayStart => {
                self.consume_next_element()?;
                let mut items = Vec::new();
                loop {
                    if self.peek_type()? == ElementType::Break {
                        self.consume_next_element()?;
                        break Ok(Value::Array(items));
                    }
                    items.push(self.pop_next_value()?);
                }
            }
            ElementType::Map => {
                let count = self.pop_next_map_start()?;
                let mut pairs = Vec::new();
                for _ in 0..count {
                    let key = self.pop_next_value()?;
                    let value = self.pop_next_value()?;
                    pairs.push((key, value));
                }
                Ok(Value::Map(pairs))
            }
            ElementType::IndefiniteMapStart => {
                self.consume_next_element()?;
                let mut pairs = Vec::new();
                loop {
                    if self.peek_type()? == ElementType::Break {
                        self.consume_next_element()?;
                        break Ok(Value::Map(pairs));
                    }
                    let key = self.pop_next_value()?;
                    let value = self.pop_next_value()?;
                    pairs.push((key, value));
                }
            }
            ElementType::IndefiniteByteStringStart => {
                self.consume_next_element()?;
                let mut bytes = Vec::new();
                loop {
                    match self.peek_type()? {
                        ElementType::Break => {
                            self.consume_next_element()?;
                            break Ok(Value::Bytes(bytes));
                        }
                        ElementType::ByteString => {
                            bytes.extend_from_slice(self.pop_next_bytes()?)
                        }
                        _ => break Err(Error::UnexpectedType),
                    }
                }
            }
            ElementType::IndefiniteTextStringStart => {
                self.consume_next_element()?;
                let mut text = String::new();
                loop {
                    match self.peek_type()? {
                        ElementType::Break => {
                            self.consume_next_element()?;
                            break Ok(Value::Text(text));
                        }
                        ElementType::TextString => text.push_str(self.pop_next_text()?),
                        _ => break Err(Error::UnexpectedType),
                    }
                }
            }
            ElementType::Tag => {
                let tag = self.pop_next_tag()?;
                if !tag_is_recognized(tag) {
                    return Err(Error::UnsupportedTag(tag));
                }
                Ok(Value::Tag(tag, Box::new(self.pop_next_value()?)))
            }
            // A Break with no open indefinite-length run
            ElementType::Break => Err(Error::UnexpectedType),
        }
    }
}

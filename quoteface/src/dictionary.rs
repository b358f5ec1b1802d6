//! Inbox dictionary codec
//!
//! One inbox event carries a small dictionary of tuples written by the
//! companion app. All integers are little endian:
//!
//! ```text
//! u8  tuple count
//! repeat count times:
//!   u32 key
//!   u8  type   (0 = byte array, 1 = C string, 2 = unsigned int, 3 = signed int)
//!   u16 length
//!   [u8; length] value
//! ```
//!
//! Decoding borrows from the received buffer, nothing is copied.

/// Largest inbox payload accepted over BLE.
pub const MAX_INBOX_LEN: usize = 128;

/// Key, type and length
const TUPLE_HEADER_LEN: usize = 7;

/// Longest string a single inbox event can carry: one tuple without a NUL
/// terminator filling the payload after the count byte.
pub const MAX_STRING_LEN: usize = MAX_INBOX_LEN - 1 - TUPLE_HEADER_LEN;

/// Value types understood on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TupleType {
    ByteArray = 0,
    CString = 1,
    UInt = 2,
    Int = 3,
}

impl TryFrom<u8> for TupleType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::ByteArray),
            1 => Ok(Self::CString),
            2 => Ok(Self::UInt),
            3 => Ok(Self::Int),
            other => Err(Error::UnknownType(other)),
        }
    }
}

/// Tagged tuple payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
    UInt(u32),
    Int(i32),
}

/// One key/value record of an inbox event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tuple<'a> {
    pub key: u32,
    pub value: Value<'a>,
}

/// Borrowed view of an encoded inbox dictionary.
#[derive(Debug, Clone, Copy)]
pub struct Dictionary<'a> {
    count: u8,
    body: &'a [u8],
}

impl<'a> Dictionary<'a> {
    /// Read the dictionary header. Tuples are decoded lazily by [`Dictionary::iter`].
    pub fn parse(bytes: &'a [u8]) -> Result<Self, Error> {
        let (&count, body) = bytes.split_first().ok_or(Error::Empty)?;
        Ok(Self { count, body })
    }

    /// Number of tuples announced in the header
    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate over the tuples in delivery order.
    ///
    /// Iteration stops after the first malformed tuple.
    pub fn iter(&self) -> Iter<'a> {
        Iter {
            remaining: self.count,
            rest: self.body,
        }
    }
}

impl<'a> IntoIterator for &Dictionary<'a> {
    type Item = Result<Tuple<'a>, Error>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a> {
    remaining: u8,
    rest: &'a [u8],
}

impl<'a> Iterator for Iter<'a> {
    type Item = Result<Tuple<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match read_tuple(self.rest) {
            Ok((tuple, rest)) => {
                self.remaining -= 1;
                self.rest = rest;
                Some(Ok(tuple))
            }
            Err(err) => {
                self.remaining = 0;
                Some(Err(err))
            }
        }
    }
}

fn read_tuple(bytes: &[u8]) -> Result<(Tuple<'_>, &[u8]), Error> {
    if bytes.len() < TUPLE_HEADER_LEN {
        return Err(Error::Truncated);
    }
    let (header, rest) = bytes.split_at(TUPLE_HEADER_LEN);
    let key = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let kind = TupleType::try_from(header[4])?;
    let length = u16::from_le_bytes([header[5], header[6]]);

    if rest.len() < length as usize {
        return Err(Error::Truncated);
    }
    let (data, rest) = rest.split_at(length as usize);

    let value = match kind {
        TupleType::ByteArray => Value::Bytes(data),
        TupleType::CString => {
            // The terminating NUL is optional
            let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
            let text = core::str::from_utf8(&data[..end]).map_err(|_| Error::InvalidUtf8)?;
            Value::Text(text)
        }
        TupleType::UInt => Value::UInt(match *data {
            [b0] => b0 as u32,
            [b0, b1] => u16::from_le_bytes([b0, b1]) as u32,
            [b0, b1, b2, b3] => u32::from_le_bytes([b0, b1, b2, b3]),
            _ => return Err(Error::IntegerWidth(length)),
        }),
        TupleType::Int => Value::Int(match *data {
            [b0] => b0 as i8 as i32,
            [b0, b1] => i16::from_le_bytes([b0, b1]) as i32,
            [b0, b1, b2, b3] => i32::from_le_bytes([b0, b1, b2, b3]),
            _ => return Err(Error::IntegerWidth(length)),
        }),
    };

    Ok((Tuple { key, value }, rest))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No header byte
    Empty,
    /// A tuple header or value runs past the end of the buffer
    Truncated,
    UnknownType(u8),
    /// Integers must be 1, 2 or 4 bytes wide
    IntegerWidth(u16),
    InvalidUtf8,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Encode a tuple header followed by its value bytes.
    pub(crate) fn push_tuple(buf: &mut Vec<u8>, key: u32, kind: u8, value: &[u8]) {
        buf.extend_from_slice(&key.to_le_bytes());
        buf.push(kind);
        buf.extend_from_slice(&(value.len() as u16).to_le_bytes());
        buf.extend_from_slice(value);
    }

    /// Encode a dictionary of NUL terminated strings.
    pub(crate) fn text_dictionary(tuples: &[(u32, &str)]) -> Vec<u8> {
        let mut buf = vec![tuples.len() as u8];
        for (key, text) in tuples {
            let mut value = text.as_bytes().to_vec();
            value.push(0);
            push_tuple(&mut buf, *key, 1, &value);
        }
        buf
    }

    #[test]
    fn decodes_strings_in_delivery_order() {
        let buf = text_dictionary(&[(2, "true"), (0, "Hello")]);
        let dict = Dictionary::parse(&buf).unwrap();
        assert_eq!(dict.len(), 2);

        let tuples: Vec<_> = dict.iter().collect();
        assert_eq!(
            tuples,
            vec![
                Ok(Tuple {
                    key: 2,
                    value: Value::Text("true")
                }),
                Ok(Tuple {
                    key: 0,
                    value: Value::Text("Hello")
                }),
            ]
        );
    }

    #[test]
    fn string_without_terminator_uses_full_length() {
        let mut buf = vec![1];
        push_tuple(&mut buf, 0, 1, b"abc");
        let dict = Dictionary::parse(&buf).unwrap();
        assert_eq!(
            dict.iter().next(),
            Some(Ok(Tuple {
                key: 0,
                value: Value::Text("abc")
            }))
        );
    }

    #[test]
    fn decodes_integers_of_every_width() {
        let mut buf = vec![4];
        push_tuple(&mut buf, 1, 3, &[0xff]);
        push_tuple(&mut buf, 2, 3, &(-300i16).to_le_bytes());
        push_tuple(&mut buf, 3, 2, &0xbeefu16.to_le_bytes());
        push_tuple(&mut buf, 4, 2, &70_000u32.to_le_bytes());

        let values: Vec<_> = Dictionary::parse(&buf)
            .unwrap()
            .iter()
            .map(|t| t.unwrap().value)
            .collect();
        assert_eq!(
            values,
            vec![
                Value::Int(-1),
                Value::Int(-300),
                Value::UInt(0xbeef),
                Value::UInt(70_000)
            ]
        );
    }

    #[test]
    fn longest_string_fills_the_inbox() {
        let text = "q".repeat(MAX_STRING_LEN);
        let mut buf = vec![1];
        push_tuple(&mut buf, 0, 1, text.as_bytes());
        assert_eq!(buf.len(), MAX_INBOX_LEN);

        let tuple = Dictionary::parse(&buf).unwrap().iter().next().unwrap();
        assert_eq!(tuple.unwrap().value, Value::Text(text.as_str()));
    }

    #[test]
    fn byte_arrays_are_passed_through() {
        let mut buf = vec![1];
        push_tuple(&mut buf, 7, 0, &[1, 2, 3]);
        let tuple = Dictionary::parse(&buf).unwrap().iter().next().unwrap();
        assert_eq!(tuple.unwrap().value, Value::Bytes(&[1, 2, 3]));
    }

    #[test]
    fn empty_buffer_is_rejected() {
        assert!(matches!(Dictionary::parse(&[]), Err(Error::Empty)));
    }

    #[test]
    fn zero_count_yields_nothing() {
        let dict = Dictionary::parse(&[0, 0xde, 0xad]).unwrap();
        assert!(dict.is_empty());
        assert_eq!(dict.iter().count(), 0);
    }

    #[test]
    fn stops_after_first_malformed_tuple() {
        let mut buf = text_dictionary(&[(0, "ok")]);
        buf[0] = 3;
        push_tuple(&mut buf, 1, 9, b"x");
        push_tuple(&mut buf, 2, 1, b"never\0");

        let results: Vec<_> = Dictionary::parse(&buf).unwrap().iter().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(Error::UnknownType(9)));
    }

    #[test]
    fn truncated_value_is_reported() {
        let mut buf = vec![1];
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.push(1);
        buf.extend_from_slice(&10u16.to_le_bytes());
        buf.extend_from_slice(b"short");
        let mut iter = Dictionary::parse(&buf).unwrap().iter();
        assert_eq!(iter.next(), Some(Err(Error::Truncated)));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn count_larger_than_payload_is_truncated() {
        let mut buf = text_dictionary(&[(0, "one")]);
        buf[0] = 2;
        let results: Vec<_> = Dictionary::parse(&buf).unwrap().iter().collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1], Err(Error::Truncated));
    }

    #[test]
    fn odd_integer_width_is_rejected() {
        let mut buf = vec![1];
        push_tuple(&mut buf, 0, 3, &[1, 2, 3]);
        let mut iter = Dictionary::parse(&buf).unwrap().iter();
        assert_eq!(iter.next(), Some(Err(Error::IntegerWidth(3))));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut buf = vec![1];
        push_tuple(&mut buf, 0, 1, &[0xc3, 0x28, 0]);
        let mut iter = Dictionary::parse(&buf).unwrap().iter();
        assert_eq!(iter.next(), Some(Err(Error::InvalidUtf8)));
    }
}

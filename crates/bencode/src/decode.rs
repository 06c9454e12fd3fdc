//! Single-pass bencode decoder.

use std::collections::BTreeMap;

use crate::error::MalformedBencode;
use crate::value::Value;

const INT_START: u8 = b'i';
const LIST_START: u8 = b'l';
const DICT_START: u8 = b'd';
const END: u8 = b'e';
const LEN_DELIM: u8 = b':';

/// Decodes a single bencoded value from `bytes`.
///
/// # Errors
///
/// Returns `MalformedBencode` if `bytes` does not contain exactly one
/// well-formed value (trailing bytes after a complete value are an error).
pub fn decode(bytes: &[u8]) -> Result<Value, MalformedBencode> {
    let (value, end) = decode_at(bytes, 0)?;
    if end != bytes.len() {
        return Err(MalformedBencode::TrailingBytes { pos: end });
    }
    Ok(value)
}

fn peek(bytes: &[u8], pos: usize) -> Result<u8, MalformedBencode> {
    bytes.get(pos).copied().ok_or(MalformedBencode::TruncatedInput { pos })
}

fn decode_at(bytes: &[u8], pos: usize) -> Result<(Value, usize), MalformedBencode> {
    match peek(bytes, pos)? {
        INT_START => {
            let (n, next) = decode_int(bytes, pos + 1, END)?;
            Ok((Value::Int(n), next))
        }
        LIST_START => decode_list(bytes, pos + 1),
        DICT_START => decode_dict(bytes, pos + 1),
        b'0'..=b'9' => decode_bytes(bytes, pos),
        found => Err(MalformedBencode::InvalidByte { pos, found }),
    }
}

/// Decodes the ASCII-decimal integer run up to (excluding) `delim`, starting
/// at `pos`. Returns the parsed value and the position right after `delim`.
fn decode_int(bytes: &[u8], pos: usize, delim: u8) -> Result<(i64, usize), MalformedBencode> {
    let rest = bytes.get(pos..).ok_or(MalformedBencode::TruncatedInput { pos })?;

    let Some(len) = rest.iter().position(|&b| b == delim) else {
        return Err(MalformedBencode::IntegerNotTerminated { pos });
    };
    let digits = &rest[..len];

    if digits.is_empty() {
        return Err(MalformedBencode::IntegerNotDecimal { pos });
    }

    let (sign, magnitude) = match digits.split_first() {
        Some((b'-', rest)) => (-1i64, rest),
        _ => (1i64, digits),
    };

    if magnitude.is_empty() || !magnitude.iter().all(u8::is_ascii_digit) {
        return Err(MalformedBencode::IntegerNotDecimal { pos });
    }
    if magnitude.len() > 1 && magnitude[0] == b'0' {
        return Err(MalformedBencode::IntegerLeadingZero { pos });
    }
    if sign < 0 && magnitude == b"0" {
        return Err(MalformedBencode::IntegerNegativeZero { pos });
    }

    let text = std::str::from_utf8(digits).map_err(|_| MalformedBencode::IntegerNotDecimal { pos })?;
    let n = text.parse::<i64>().map_err(|_| MalformedBencode::IntegerNotDecimal { pos })?;

    Ok((n, pos + len + 1))
}

fn decode_bytes(bytes: &[u8], pos: usize) -> Result<(Value, usize), MalformedBencode> {
    let (len, start) = decode_int(bytes, pos, LEN_DELIM)?;
    let len = usize::try_from(len).map_err(|_| MalformedBencode::InvalidLength { pos })?;

    let available = bytes.len().saturating_sub(start);
    if len > available {
        return Err(MalformedBencode::LengthOverflow {
            pos,
            declared: len,
            available,
        });
    }

    let end = start + len;
    Ok((Value::Bytes(bytes[start..end].to_vec()), end))
}

fn decode_list(bytes: &[u8], pos: usize) -> Result<(Value, usize), MalformedBencode> {
    let mut items = Vec::new();
    let mut cursor = pos;

    while peek(bytes, cursor)? != END {
        let (value, next) = decode_at(bytes, cursor)?;
        items.push(value);
        cursor = next;
    }

    Ok((Value::List(items), cursor + 1))
}

fn decode_dict(bytes: &[u8], pos: usize) -> Result<(Value, usize), MalformedBencode> {
    let mut map = BTreeMap::new();
    let mut cursor = pos;

    while peek(bytes, cursor)? != END {
        let (key, next) = decode_bytes(bytes, cursor)?;
        let Value::Bytes(key) = key else { unreachable!("decode_bytes always returns Value::Bytes") };

        let (value, next) = decode_at(bytes, next)?;
        // Duplicate or out-of-order keys are accepted on decode: the sorted
        // `BTreeMap` absorbs both (last write wins, order is not preserved).
        map.insert(key, value);
        cursor = next;
    }

    Ok((Value::Dict(map), cursor + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::dict;

    #[test]
    fn decodes_integers() {
        assert_eq!(decode(b"i0e").unwrap(), Value::Int(0));
        assert_eq!(decode(b"i-42e").unwrap(), Value::Int(-42));
        assert_eq!(decode(b"i1234567890e").unwrap(), Value::Int(1_234_567_890));
    }

    #[test]
    fn rejects_leading_zero() {
        assert!(matches!(decode(b"i01e"), Err(MalformedBencode::IntegerLeadingZero { .. })));
    }

    #[test]
    fn rejects_negative_zero() {
        assert!(matches!(decode(b"i-0e"), Err(MalformedBencode::IntegerNegativeZero { .. })));
    }

    #[test]
    fn decodes_byte_strings() {
        assert_eq!(decode(b"4:spam").unwrap(), Value::bytes(*b"spam"));
        assert_eq!(decode(b"0:").unwrap(), Value::bytes(Vec::new()));
    }

    #[test]
    fn rejects_truncated_byte_string() {
        assert!(matches!(decode(b"4:sp"), Err(MalformedBencode::LengthOverflow { .. })));
    }

    #[test]
    fn decodes_lists_and_dicts() {
        assert_eq!(
            decode(b"l4:spam4:eggse").unwrap(),
            Value::List(vec![Value::bytes(*b"spam"), Value::bytes(*b"eggs")])
        );
        assert_eq!(
            decode(b"d3:cow3:moo4:spam4:eggse").unwrap(),
            dict([("cow", Value::str("moo")), ("spam", Value::str("eggs"))])
        );
    }

    #[test]
    fn folds_unsorted_and_duplicate_keys() {
        // "b" before "a", and "a" repeated: both fold into the sorted map.
        let v = decode(b"d1:bi1e1:ai2e1:ai3ee").unwrap();
        assert_eq!(v, dict([("a", Value::Int(3)), ("b", Value::Int(1))]));
    }

    #[test]
    fn rejects_trailing_bytes() {
        assert!(matches!(decode(b"i1ei2e"), Err(MalformedBencode::TrailingBytes { .. })));
    }

    #[test]
    fn rejects_non_digit_length_prefix() {
        assert!(matches!(decode(b"x:spam"), Err(MalformedBencode::InvalidByte { .. })));
    }
}

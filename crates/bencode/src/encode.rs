//! Deterministic bencode encoder.
//!
//! Map keys are always written in sorted order (`Value::Dict` is a
//! `BTreeMap`, so this falls out of plain iteration) which is mandatory for
//! info-hash reproducibility.

use crate::value::Value;

#[must_use]
pub fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(value, &mut out);
    out
}

fn encode_into(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Int(n) => {
            out.push(b'i');
            out.extend_from_slice(n.to_string().as_bytes());
            out.push(b'e');
        }
        Value::Bytes(b) => {
            out.extend_from_slice(b.len().to_string().as_bytes());
            out.push(b':');
            out.extend_from_slice(b);
        }
        Value::List(items) => {
            out.push(b'l');
            for item in items {
                encode_into(item, out);
            }
            out.push(b'e');
        }
        Value::Dict(map) => {
            out.push(b'd');
            for (key, value) in map {
                encode_into(&Value::Bytes(key.clone()), out);
                encode_into(value, out);
            }
            out.push(b'e');
        }
    }
}

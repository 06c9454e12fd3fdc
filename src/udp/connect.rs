//! The `Connect` request/response pair (`spec.md` §4.2).

use std::panic::Location;

use crate::error::TrackerError;
use crate::udp::ACTION_CONNECT;

/// The fixed magic constant that opens a BEP-15 connect handshake.
pub const PROTOCOL_MAGIC: i64 = 0x0417_2710_1980;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectRequest {
    pub transaction_id: i32,
}

impl ConnectRequest {
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidFrame` if `bytes` is not exactly 16
    /// bytes, does not start with [`PROTOCOL_MAGIC`], or declares an action
    /// other than `ACTION_CONNECT`.
    #[track_caller]
    pub fn decode(bytes: &[u8]) -> Result<Self, TrackerError> {
        if bytes.len() != 16 {
            return Err(TrackerError::InvalidFrame { location: Location::caller() });
        }

        let magic = i64::from_be_bytes(bytes[0..8].try_into().unwrap());
        let action = i32::from_be_bytes(bytes[8..12].try_into().unwrap());
        let transaction_id = i32::from_be_bytes(bytes[12..16].try_into().unwrap());

        if magic != PROTOCOL_MAGIC || action != ACTION_CONNECT {
            return Err(TrackerError::InvalidFrame { location: Location::caller() });
        }

        Ok(Self { transaction_id })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectResponse {
    pub transaction_id: i32,
    pub connection_id: i64,
}

impl ConnectResponse {
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16);
        out.extend_from_slice(&ACTION_CONNECT.to_be_bytes());
        out.extend_from_slice(&self.transaction_id.to_be_bytes());
        out.extend_from_slice(&self.connection_id.to_be_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_bytes(magic: i64, action: i32, transaction_id: i32) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(16);
        bytes.extend_from_slice(&magic.to_be_bytes());
        bytes.extend_from_slice(&action.to_be_bytes());
        bytes.extend_from_slice(&transaction_id.to_be_bytes());
        bytes
    }

    #[test]
    fn decodes_a_well_formed_connect_request() {
        let bytes = request_bytes(PROTOCOL_MAGIC, ACTION_CONNECT, 0x1234_5678);
        let request = ConnectRequest::decode(&bytes).unwrap();
        assert_eq!(request.transaction_id, 0x1234_5678);
    }

    #[test]
    fn rejects_a_wrong_magic() {
        let bytes = request_bytes(0, ACTION_CONNECT, 1);
        assert!(ConnectRequest::decode(&bytes).is_err());
    }

    #[test]
    fn rejects_a_mismatched_action() {
        let bytes = request_bytes(PROTOCOL_MAGIC, 1, 1);
        assert!(ConnectRequest::decode(&bytes).is_err());
    }

    #[test]
    fn rejects_a_truncated_frame() {
        assert!(ConnectRequest::decode(&[0; 8]).is_err());
    }

    #[test]
    fn response_is_exactly_sixteen_bytes() {
        let response = ConnectResponse {
            transaction_id: 7,
            connection_id: 0xDEAD_BEEF,
        };
        let bytes = response.encode();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &0i32.to_be_bytes());
    }
}

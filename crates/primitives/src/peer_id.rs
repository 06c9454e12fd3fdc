//! The announcing client's self-chosen peer id, and its canonical hex
//! rendering used as the swarm map key (`spec.md` I2).

use std::fmt;

pub const PEER_ID_BYTES_LEN: usize = 20;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct PeerId([u8; PEER_ID_BYTES_LEN]);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("peer id must be {PEER_ID_BYTES_LEN} bytes, got {got}")]
pub struct PeerIdLengthError {
    got: usize,
}

impl PeerId {
    #[must_use]
    pub fn new(bytes: [u8; PEER_ID_BYTES_LEN]) -> Self {
        Self(bytes)
    }

    /// # Errors
    ///
    /// Returns an error if `bytes` is not exactly 20 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PeerIdLengthError> {
        let array: [u8; PEER_ID_BYTES_LEN] = bytes.try_into().map_err(|_| PeerIdLengthError { got: bytes.len() })?;
        Ok(Self(array))
    }

    #[must_use]
    pub fn bytes(&self) -> [u8; PEER_ID_BYTES_LEN] {
        self.0
    }

    /// The canonical lowercase hex rendering of this peer id (`spec.md` I2).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_a_pure_function_of_the_bytes() {
        let a = PeerId::new([0xAA; 20]);
        let b = PeerId::new([0xAA; 20]);
        assert_eq!(a.to_hex(), b.to_hex());
        assert_eq!(a.to_hex(), "aa".repeat(20));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(PeerId::from_bytes(&[0; 19]).is_err());
        assert!(PeerId::from_bytes(&[0; 20]).is_ok());
    }
}

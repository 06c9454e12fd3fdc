//! `BitTorrent` info hash: the SHA-1 of the bencoded `info` dictionary, and a
//! torrent's identity in the registry.

use std::fmt;

pub const INFO_HASH_BYTES_LEN: usize = 20;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct InfoHash([u8; INFO_HASH_BYTES_LEN]);

impl InfoHash {
    #[must_use]
    pub const fn new(bytes: [u8; INFO_HASH_BYTES_LEN]) -> Self {
        Self(bytes)
    }

    /// # Errors
    ///
    /// Returns an error if `bytes` is not exactly 20 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InfoHashLengthError> {
        let array: [u8; INFO_HASH_BYTES_LEN] = bytes
            .try_into()
            .map_err(|_| InfoHashLengthError { got: bytes.len() })?;
        Ok(Self(array))
    }

    #[must_use]
    pub fn bytes(&self) -> [u8; INFO_HASH_BYTES_LEN] {
        self.0
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("info hash must be {INFO_HASH_BYTES_LEN} bytes, got {got}")]
pub struct InfoHashLengthError {
    got: usize,
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_as_lowercase_hex() {
        let hash = InfoHash::new([0xAB; 20]);
        assert_eq!(hash.to_string(), "ab".repeat(20));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(InfoHash::from_bytes(&[0; 19]).is_err());
        assert!(InfoHash::from_bytes(&[0; 21]).is_err());
        assert!(InfoHash::from_bytes(&[0; 20]).is_ok());
    }
}

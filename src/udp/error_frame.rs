//! The UDP `Error` response: action `3`, transaction id, a message to the
//! end of the frame (`spec.md` §4.2).

use crate::udp::ACTION_ERROR;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub transaction_id: i32,
    pub message: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + self.message.len());
        out.extend_from_slice(&ACTION_ERROR.to_be_bytes());
        out.extend_from_slice(&self.transaction_id.to_be_bytes());
        out.extend_from_slice(self.message.as_bytes());
        out
    }
}

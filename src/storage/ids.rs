use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::StorageError;

/// Store-assigned identity of a todo. Serialised as a bare JSON number.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct TodoId(u64);

impl TodoId {
    pub const FIRST: TodoId = TodoId(1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Zero-padded form used in storage keys so that byte order follows numeric order.
    pub(crate) fn key_fragment(&self) -> String {
        format!("{:020}", self.0)
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TodoId {
    type Err = StorageError;

    /// Accepts ASCII digits only; signs and whitespace are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StorageError::MalformedId(s.to_string()));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(StorageError::InvalidId)
    }
}

use std::fmt;

use crate::storage::TodoId;

pub(crate) const TODO_PREFIX: &str = "todo:";
const SEQUENCE_KEY: &str = "seq:todo";

/// Keys written to the todo tree. Todo keys are zero padded so byte order is id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TreeKey {
    Todo(TodoId),
    Sequence,
}

impl TreeKey {
    pub(crate) fn to_bytes(self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    pub(crate) fn is_todo(&self) -> bool {
        matches!(self, Self::Todo(_))
    }
}

impl fmt::Display for TreeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo(id) => write!(f, "{TODO_PREFIX}{}", id.key_fragment()),
            Self::Sequence => f.write_str(SEQUENCE_KEY),
        }
    }
}

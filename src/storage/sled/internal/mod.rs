mod key;
pub(crate) mod span_wrappers;

pub(crate) use key::{TreeKey, TODO_PREFIX};

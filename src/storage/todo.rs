use super::TodoId;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Todo {
    #[schema(value_type = u64)]
    pub id: TodoId,
    pub title: String,
    pub done: bool,
}

/// Validated input for a new todo; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub done: bool,
}

/// Partial update: `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub done: Option<bool>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.done.is_none()
    }
}

fn apply_if_changed<T: PartialEq + Clone>(field: &mut T, new: &Option<T>) {
    if let Some(value) = new {
        if *field != *value {
            *field = value.clone();
        }
    }
}

impl Todo {
    pub(crate) fn new(id: TodoId, new: NewTodo) -> Self {
        Self {
            id,
            title: new.title,
            done: new.done,
        }
    }

    pub(crate) fn apply(&mut self, patch: &TodoPatch) {
        apply_if_changed(&mut self.title, &patch.title);
        apply_if_changed(&mut self.done, &patch.done);
    }
}

#[derive(Encode, Decode, Serialize, Deserialize, Debug)]
#[serde(tag = "version", content = "data")]
pub(crate) enum TodoVersion {
    V1 { id: TodoId, title: String, done: bool },
}

impl From<TodoVersion> for Todo {
    fn from(value: TodoVersion) -> Self {
        match value {
            TodoVersion::V1 { id, title, done } => Self { id, title, done },
        }
    }
}

impl From<Todo> for TodoVersion {
    fn from(value: Todo) -> Self {
        Self::V1 {
            id: value.id,
            title: value.title,
            done: value.done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut todo = Todo::new(
            TodoId::FIRST,
            NewTodo {
                title: "read".to_string(),
                done: false,
            },
        );

        todo.apply(&TodoPatch {
            title: None,
            done: Some(true),
        });
        assert_eq!(todo.title, "read");
        assert!(todo.done);

        todo.apply(&TodoPatch::default());
        assert_eq!(todo.title, "read");
        assert!(todo.done);
        assert_eq!(todo.id, TodoId::FIRST);
    }
}

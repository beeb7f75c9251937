use super::*;

use crate::storage::test_util::TestStorageBuilder;

fn new_todo(title: &str) -> NewTodo {
    NewTodo {
        title: title.to_string(),
        done: false,
    }
}

#[tokio::test]
async fn test_create_and_get() {
    let builder = TestStorageBuilder::new();
    let storage = builder.build_todo().await;

    let created = storage.create(new_todo("aaa")).await.unwrap();
    assert_eq!(created.id, TodoId::FIRST);
    assert_eq!(created.title, "aaa");
    assert!(!created.done);

    let todo = storage.get(created.id).await.unwrap();
    assert_eq!(todo, created);

    let result = storage.get(TodoId::new(42)).await;
    assert!(matches!(result, Err(StorageError::NotFound)));
}

#[tokio::test]
async fn test_create_keeps_explicit_done() {
    let builder = TestStorageBuilder::new();
    let storage = builder.build_todo().await;

    let created = storage
        .create(NewTodo {
            title: "finished".to_string(),
            done: true,
        })
        .await
        .unwrap();

    assert!(storage.get(created.id).await.unwrap().done);
}

#[tokio::test]
async fn test_delete() {
    let builder = TestStorageBuilder::new();
    let storage = builder.build_todo().await;

    let todo = storage.create(new_todo("aaa")).await.unwrap();

    storage.delete(todo.id).await.unwrap();

    let result = storage.get(todo.id).await;
    assert!(matches!(result, Err(StorageError::NotFound)));

    let result = storage.delete(todo.id).await;
    assert!(matches!(result, Err(StorageError::NotFound)));
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let builder = TestStorageBuilder::new();
    let storage = builder.build_todo().await;

    let first = storage.create(new_todo("a")).await.unwrap();
    let second = storage.create(new_todo("b")).await.unwrap();
    storage.delete(second.id).await.unwrap();

    let third = storage.create(new_todo("c")).await.unwrap();

    assert_eq!(first.id, TodoId::new(1));
    assert_eq!(second.id, TodoId::new(2));
    assert_eq!(third.id, TodoId::new(3));
}

#[tokio::test]
async fn test_update() {
    let builder = TestStorageBuilder::new();
    let storage = builder.build_todo().await;

    let todo = storage.create(new_todo("aaa")).await.unwrap();

    let updated = storage
        .update(
            todo.id,
            TodoPatch {
                title: None,
                done: Some(true),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "aaa");
    assert!(updated.done);

    let updated = storage
        .update(
            todo.id,
            TodoPatch {
                title: Some("bbb".to_string()),
                done: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "bbb");
    assert!(updated.done);
    assert_eq!(storage.get(todo.id).await.unwrap(), updated);

    let unchanged = storage.update(todo.id, TodoPatch::default()).await.unwrap();
    assert_eq!(unchanged, updated);

    let result = storage.update(TodoId::new(99), TodoPatch::default()).await;
    assert!(matches!(result, Err(StorageError::NotFound)));
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let builder = TestStorageBuilder::new().with_todos(12);
    let storage = builder.build_todo().await;

    let todos = storage.list().await.unwrap();

    assert_eq!(todos.len(), 12);
    let ids: Vec<u64> = todos.iter().map(|t| t.id.value()).collect();
    assert_eq!(ids, (1..=12).rev().collect::<Vec<u64>>());
    assert_eq!(todos[0].title, "todo 11");
}

#[tokio::test]
async fn test_list_empty() {
    let builder = TestStorageBuilder::new();
    let storage = builder.build_todo().await;

    assert!(storage.list().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_distinct_ids() {
    let builder = TestStorageBuilder::new();
    let storage = builder.build_todo().await;

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let storage = storage.clone();
            tokio::spawn(async move { storage.create(new_todo(&format!("t{i}"))).await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id.value());
    }
    ids.sort_unstable();

    assert_eq!(ids, (1..=32).collect::<Vec<u64>>());
}

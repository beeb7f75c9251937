use std::sync::Arc;

use crate::{
    service::Service,
    storage::{FlushStorage, NewTodo, TodoStorage},
};

use super::SledStorage;

/// Temporary sled database, optionally seeded. Seeds are created in order, so the
/// last one gets the highest id.
pub struct TestStorageBuilder {
    seeds: Vec<NewTodo>,
    storage: Arc<SledStorage>,
}

impl TestStorageBuilder {
    pub fn new() -> Self {
        let db = sled::Config::new().temporary(true).open().unwrap();
        Self {
            seeds: Vec::new(),
            storage: Arc::new(SledStorage::from_db(&db).unwrap()),
        }
    }

    pub fn with_todos(mut self, count: usize) -> Self {
        self.seeds.extend((0..count).map(|i| NewTodo {
            title: format!("todo {i}"),
            done: false,
        }));
        self
    }

    pub fn with_todo(mut self, title: &str, done: bool) -> Self {
        self.seeds.push(NewTodo {
            title: title.to_string(),
            done,
        });
        self
    }

    async fn seed(&self) {
        for seed in &self.seeds {
            self.storage.create(seed.clone()).await.unwrap();
        }
    }

    pub async fn build_todo(&self) -> Arc<dyn TodoStorage> {
        self.seed().await;
        self.storage.clone()
    }

    pub async fn build_flush(&self) -> Arc<dyn FlushStorage> {
        self.storage.clone()
    }

    pub async fn build_service(&self) -> Service {
        self.seed().await;
        Service::with_backend(self.storage.clone())
    }
}

impl Default for TestStorageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#![allow(dead_code, unused_imports)]

mod client;
mod server;

use std::sync::Arc;

use axum::Router;
pub use client::TestAppClient;
use kube_ops_todo::{build_app, AccessLogSink, MemorySink, RequestLogger, Settings};

pub use server::{spawn_test_app, TestAppHandle};
use kube_ops_todo::TestStorageBuilder;

#[derive(Debug, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct ValidationErrorBody {
    pub errors: std::collections::BTreeMap<String, Vec<String>>,
}

pub struct TestApp {
    pub router: Router,
    pub access_log: MemorySink,
}

/// Fresh temporary storage plus an access log that writes only to memory.
pub async fn create_test_app(seed_todos: usize) -> TestApp {
    let service = TestStorageBuilder::new()
        .with_todos(seed_todos)
        .build_service()
        .await;

    let settings = Settings::from_file("test").unwrap();

    let access_log = MemorySink::new();
    let logger = RequestLogger::new(
        settings.service_name(),
        vec![Arc::new(access_log.clone()) as Arc<dyn AccessLogSink>],
    );

    TestApp {
        router: build_app(service, logger),
        access_log,
    }
}

pub async fn spawn_client(seed_todos: usize) -> (TestAppClient, MemorySink, TestAppHandle) {
    let app = create_test_app(seed_todos).await;
    let handle = spawn_test_app(app.router).await;
    let client = TestAppClient::new(handle.address.clone());
    (client, app.access_log, handle)
}

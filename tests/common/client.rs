#![allow(dead_code)]
use reqwest::Url;

pub struct TestAppClient {
    url: Url,
    client: reqwest::Client,
}

impl TestAppClient {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn index(&self) -> reqwest::Response {
        self.client
            .get(self.url.join("/").unwrap())
            .send()
            .await
            .unwrap()
    }

    pub async fn healthz(&self) -> reqwest::Response {
        self.client
            .get(self.url.join("/healthz").unwrap())
            .send()
            .await
            .unwrap()
    }

    pub async fn boom(&self) -> reqwest::Response {
        self.client
            .get(self.url.join("/boom").unwrap())
            .send()
            .await
            .unwrap()
    }

    pub async fn get_raw(&self, path_and_query: &str) -> reqwest::Response {
        self.client
            .get(self.url.join(path_and_query).unwrap())
            .header("user-agent", "kube-ops-tests/1.0")
            .send()
            .await
            .unwrap()
    }

    pub async fn list_todos(&self) -> reqwest::Response {
        self.client
            .get(self.url.join("/api/todos").unwrap())
            .send()
            .await
            .unwrap()
    }

    pub async fn create_todo(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url.join("/api/todos").unwrap())
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn create_todo_raw(
        &self,
        content_type: &'static str,
        body: &'static str,
    ) -> reqwest::Response {
        self.client
            .post(self.url.join("/api/todos").unwrap())
            .header("content-type", content_type)
            .body(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn get_todo(&self, todo_id: &str) -> reqwest::Response {
        self.client
            .get(self.url.join("/api/todos/").unwrap().join(todo_id).unwrap())
            .send()
            .await
            .unwrap()
    }

    pub async fn update_todo(&self, todo_id: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .patch(self.url.join("/api/todos/").unwrap().join(todo_id).unwrap())
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn delete_todo(&self, todo_id: &str) -> reqwest::Response {
        self.client
            .delete(self.url.join("/api/todos/").unwrap().join(todo_id).unwrap())
            .send()
            .await
            .unwrap()
    }
}

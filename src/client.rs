use crate::errors::ApiError;
use crate::model::{Todo, TodoId};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::debug;

/// The remote CRUD service holding the canonical todo records.
pub trait TodoApi {
    fn list(&self) -> impl Future<Output = Result<Vec<Todo>, ApiError>> + Send;

    fn create<B>(&self, body: &B) -> impl Future<Output = Result<Todo, ApiError>> + Send
    where
        B: Serialize + Sync;

    fn update<B>(
        &self,
        id: TodoId,
        patch: &B,
    ) -> impl Future<Output = Result<Todo, ApiError>> + Send
    where
        B: Serialize + Sync;

    fn delete(&self, id: TodoId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

impl HttpTodoApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: TodoId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Rejected { status })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    Ok(ensure_success(response)?.json().await?)
}

impl TodoApi for HttpTodoApi {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        debug!(url = %self.todos_url(), "listing todos");
        let response = self.client.get(self.todos_url()).send().await?;
        decode(response).await
    }

    async fn create<B>(&self, body: &B) -> Result<Todo, ApiError>
    where
        B: Serialize + Sync,
    {
        let response = self.client.post(self.todos_url()).json(body).send().await?;
        decode(response).await
    }

    async fn update<B>(&self, id: TodoId, patch: &B) -> Result<Todo, ApiError>
    where
        B: Serialize + Sync,
    {
        let response = self.client.put(self.todo_url(id)).json(patch).send().await?;
        decode(response).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let response = self.client.delete(self.todo_url(id)).send().await?;
        ensure_success(response)?;
        Ok(())
    }
}

use async_trait::async_trait;
use domain::{Todo, TodoId, TodoPatch};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Todo not found")]
    NotFound,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Todo API の呼び出し口
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list_todos(&self) -> Result<Vec<Todo>, ClientError>;

    async fn create_todo(&self, title: &str) -> Result<Todo, ClientError>;

    async fn update_todo(&self, id: &TodoId, patch: &TodoPatch) -> Result<Todo, ClientError>;

    async fn delete_todo(&self, id: &TodoId) -> Result<(), ClientError>;
}

#[derive(Serialize)]
struct CreateTodoBody<'a> {
    title: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// reqwest による `/api/todos` クライアント
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTodoApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/todos", self.base_url)
    }

    fn item_url(&self, id: &TodoId) -> String {
        format!("{}/api/todos/{}", self.base_url, id)
    }

    /// ステータスを検査してから本文を読む
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        Ok(Self::check(response).await?.json().await?)
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list_todos(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.client.get(self.collection_url()).send().await?;
        Self::decode(response).await
    }

    async fn create_todo(&self, title: &str) -> Result<Todo, ClientError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(&CreateTodoBody { title })
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_todo(&self, id: &TodoId, patch: &TodoPatch) -> Result<Todo, ClientError> {
        let response = self
            .client
            .patch(self.item_url(id))
            .json(patch)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_todo(&self, id: &TodoId) -> Result<(), ClientError> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

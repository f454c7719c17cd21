use crate::{PostgrestError, TodoChanges, TodoRecord, TodoRepository};
use async_trait::async_trait;
use domain::{Todo, TodoError, TodoId, TodoPatch};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;
use shared::SupabaseConfig;
use tracing::{debug, error};

const PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Supabase の todos テーブルを PostgREST 経由で操作するリポジトリ
#[derive(Debug, Clone)]
pub struct SupabaseTodoRepository {
    client: reqwest::Client,
    endpoint: String,
}

impl SupabaseTodoRepository {
    pub fn new(config: &SupabaseConfig) -> Result<Self, TodoError> {
        let key = HeaderValue::from_str(&config.anon_key)
            .map_err(|_| TodoError::backend("Supabase key is not a valid header value"))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.anon_key))
            .map_err(|_| TodoError::backend("Supabase key is not a valid header value"))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| TodoError::backend(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                config.url.trim_end_matches('/'),
                config.table
            ),
        })
    }

    fn id_filter(id: &TodoId) -> [(&'static str, String); 1] {
        [("id", format!("eq.{id}"))]
    }

    /// リクエストを送り、返ってきた行を Todo に変換する
    async fn send_rows(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<Vec<Todo>, TodoError> {
        let response = request.send().await.map_err(|e| {
            error!(operation, error = %e, "Supabase request failed");
            TodoError::backend(format!("{operation} request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.json::<PostgrestError>().await.ok();
            let message = detail
                .as_ref()
                .and_then(|d| d.message.clone())
                .unwrap_or_else(|| status.to_string());
            error!(
                operation,
                status = status.as_u16(),
                code = detail.as_ref().and_then(|d| d.code.as_deref()).unwrap_or("-"),
                message = %message,
                "Supabase rejected the operation"
            );
            return Err(TodoError::backend(format!(
                "{operation} failed ({status}): {message}"
            )));
        }

        let rows: Vec<TodoRecord> = response.json().await.map_err(|e| {
            error!(operation, error = %e, "Failed to decode Supabase rows");
            TodoError::backend(format!("{operation} returned malformed rows: {e}"))
        })?;
        debug!(operation, rows = rows.len(), "Supabase operation completed");

        Ok(rows.into_iter().map(Todo::from).collect())
    }
}

#[async_trait]
impl TodoRepository for SupabaseTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        self.send_rows(request, "list").await
    }

    async fn create(&self, title: &str) -> Result<Todo, TodoError> {
        let todo = Todo::new(title)?;
        let request = self
            .client
            .post(&self.endpoint)
            .header(PREFER, RETURN_REPRESENTATION)
            .json(&TodoRecord::from(&todo));

        self.send_rows(request, "create")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TodoError::backend("create returned no rows"))
    }

    async fn get_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoError> {
        // id カラムは uuid 型。UUID でない値はフィルタ自体が拒否されるため照会しない
        if !id.is_uuid() {
            return Ok(None);
        }
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("select", "*")])
            .query(&Self::id_filter(id));
        Ok(self.send_rows(request, "get").await?.into_iter().next())
    }

    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Option<Todo>, TodoError> {
        let patch = patch.normalized()?;
        if !id.is_uuid() {
            return Ok(None);
        }
        if patch.is_empty() {
            return self.get_by_id(id).await;
        }
        let request = self
            .client
            .patch(&self.endpoint)
            .query(&Self::id_filter(id))
            .header(PREFER, RETURN_REPRESENTATION)
            .json(&TodoChanges::from(&patch));
        Ok(self.send_rows(request, "update").await?.into_iter().next())
    }

    async fn delete(&self, id: &TodoId) -> Result<bool, TodoError> {
        if !id.is_uuid() {
            return Ok(false);
        }
        let request = self
            .client
            .delete(&self.endpoint)
            .query(&Self::id_filter(id))
            .header(PREFER, RETURN_REPRESENTATION);
        Ok(!self.send_rows(request, "delete").await?.is_empty())
    }
}

use chrono::{DateTime, Utc};
use domain::{Tags, Todo, TodoId, TodoPatch};
use serde::{Deserialize, Serialize};

/// todos テーブルの行（PostgREST 用）
///
/// カラム名は snake_case。tags カラムは NULL を許容する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Todo> for TodoRecord {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id.as_str().to_string(),
            title: todo.title.clone(),
            completed: todo.completed,
            tags: Some(todo.tags.as_slice().to_vec()),
            created_at: todo.created_at,
        }
    }
}

impl From<TodoRecord> for Todo {
    fn from(record: TodoRecord) -> Self {
        Todo {
            id: TodoId::from_string(record.id),
            title: record.title,
            completed: record.completed,
            tags: record.tags.map(Tags::from).unwrap_or_default(),
            created_at: record.created_at,
        }
    }
}

/// PATCH で送る変更カラム（指定されたものだけを含める）
#[derive(Debug, Default, Serialize)]
pub struct TodoChanges<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<&'a [String]>,
}

impl<'a> From<&'a TodoPatch> for TodoChanges<'a> {
    fn from(patch: &'a TodoPatch) -> Self {
        Self {
            title: patch.title.as_deref(),
            completed: patch.completed,
            tags: patch.tags.as_ref().map(Tags::as_slice),
        }
    }
}

/// PostgREST のエラーレスポンス
#[derive(Debug, Deserialize)]
pub struct PostgrestError {
    pub message: Option<String>,
    pub code: Option<String>,
}

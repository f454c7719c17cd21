use domain::{Tags, TodoPatch};
use serde::{Deserialize, Serialize};

/// POST /api/todos リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    /// 欠落・空白のみはハンドラで 400 にする
    pub title: Option<String>,
}

/// PATCH /api/todos/{id} リクエスト（任意のフィールドの組み合わせ）
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl From<UpdateTodoRequest> for TodoPatch {
    fn from(req: UpdateTodoRequest) -> Self {
        TodoPatch {
            title: req.title,
            completed: req.completed,
            tags: req.tags.map(Tags::from),
        }
    }
}

/// DELETE /api/todos/{id} レスポンス
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteTodoResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    /// サービスの簡易ステータス
    pub status: &'static str,
}

use crate::{InMemoryTodoRepository, SupabaseTodoRepository};
use async_trait::async_trait;
use domain::{Todo, TodoError, TodoId, TodoPatch};
use shared::StorageBackend;
use std::sync::Arc;
use tracing::info;

/// Todo の永続化を担うリポジトリ
///
/// インメモリ実装と Supabase 実装はこの契約だけを共有する。
/// 「見つからない」は `None` / `false` で返し、`Err` はバリデーション失敗か
/// バックエンド障害に限る。
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// 全件取得（並び順は実装依存）
    async fn list(&self) -> Result<Vec<Todo>, TodoError>;

    /// タイトルから新規作成し、ID と作成日時が確定した保存済みレコードを返す
    async fn create(&self, title: &str) -> Result<Todo, TodoError>;

    async fn get_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoError>;

    /// 部分更新。指定されなかったフィールドは変更しない
    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Option<Todo>, TodoError>;

    /// 削除。存在しなかった場合は `false`
    async fn delete(&self, id: &TodoId) -> Result<bool, TodoError>;
}

/// 設定に従ってリポジトリを組み立てる
pub fn repository_from_config(
    storage: &StorageBackend,
) -> Result<Arc<dyn TodoRepository>, TodoError> {
    let repo: Arc<dyn TodoRepository> = match storage {
        StorageBackend::Memory => Arc::new(InMemoryTodoRepository::new()),
        StorageBackend::Supabase(config) => Arc::new(SupabaseTodoRepository::new(config)?),
    };
    info!(backend = storage.name(), "Todo repository initialized");
    Ok(repo)
}

use crate::TodoRepository;
use async_trait::async_trait;
use domain::{Todo, TodoError, TodoId, TodoPatch};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// プロセス内の Vec に保持するリポジトリ（開発/テスト用）
///
/// 永続化はされない。クローンは同じコレクションを共有する。
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    todos: Arc<RwLock<Vec<Todo>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: Arc::new(RwLock::new(todos)),
        }
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.todos.read().await.clone())
    }

    async fn create(&self, title: &str) -> Result<Todo, TodoError> {
        let todo = Todo::new(title)?;
        self.todos.write().await.push(todo.clone());
        debug!(todo_id = %todo.id, "Todo stored in memory");
        Ok(todo)
    }

    async fn get_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|t| &t.id == id).cloned())
    }

    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Option<Todo>, TodoError> {
        let mut todos = self.todos.write().await;
        let Some(todo) = todos.iter_mut().find(|t| &t.id == id) else {
            return Ok(None);
        };
        todo.apply(patch)?;
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: &TodoId) -> Result<bool, TodoError> {
        let mut todos = self.todos.write().await;
        match todos.iter().position(|t| &t.id == id) {
            Some(index) => {
                todos.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

use crate::cors::CorsPolicy;
use infrastructure::{InMemoryTodoRepository, TodoRepository};
use std::sync::Arc;

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TodoRepository>,
    pub cors: Arc<CorsPolicy>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>, cors: CorsPolicy) -> Self {
        Self {
            repo,
            cors: Arc::new(cors),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Arc::new(InMemoryTodoRepository::new()),
            CorsPolicy::default(),
        )
    }
}

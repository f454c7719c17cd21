//! Todo REST API（axum）
//!
//! `/api/todos` 配下の CRUD と CORS を提供します。
//! ストレージは `AppState` に注入された `TodoRepository` で切り替えます。

pub mod cors;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;

pub use cors::CorsPolicy;
pub use error::ApiError;
pub use router::app;
pub use state::AppState;

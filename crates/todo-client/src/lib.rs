//! Todo API のクライアント
//!
//! - `api`: `/api/todos` を呼び出す `TodoApi` と reqwest 実装
//! - `state`: コレクションと UI 状態を持つ `TodoApp`
//! - `view`: 並べ替え・絞り込み・タグ別グループ化の派生ビュー

pub mod api;
pub mod state;
pub mod view;

pub use api::{ClientError, HttpTodoApi, TodoApi};
pub use state::{EditBuffer, TodoApp, UiState};
pub use view::{SortOrder, TagGroup, TodoView, ViewMode, ViewOptions};

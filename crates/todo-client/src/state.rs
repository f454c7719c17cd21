//! クライアントのアプリケーション状態
//!
//! 1 操作につき 1 リクエストを送り、成功時はサーバが返した Todo で
//! ローカルのコレクションを置き換える。失敗時は状態を変えない。

use crate::api::{ClientError, TodoApi};
use crate::view::{SortOrder, TodoView, ViewMode, ViewOptions};
use domain::{Todo, TodoId, TodoPatch};
use std::collections::BTreeSet;

/// タイトル編集中のバッファ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub id: TodoId,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub view: ViewOptions,
    pub editing: Option<EditBuffer>,
    /// 新規タスク入力欄
    pub new_task: String,
}

pub struct TodoApp<A> {
    api: A,
    todos: Vec<Todo>,
    ui: UiState,
}

impl<A: TodoApi> TodoApp<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            todos: Vec::new(),
            ui: UiState::default(),
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn find(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    /// 初回表示時にコレクション全体を取得する
    pub async fn mount(&mut self) -> Result<(), ClientError> {
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.api.list_todos().await {
            Ok(todos) => {
                tracing::debug!(count = todos.len(), "Fetched todos");
                self.todos = todos;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch todos");
                Err(e)
            }
        }
    }

    pub fn set_new_task(&mut self, title: impl Into<String>) {
        self.ui.new_task = title.into();
    }

    /// 入力欄の内容でタスクを追加する。空欄なら何もしない
    pub async fn add_todo(&mut self) -> Result<Option<Todo>, ClientError> {
        let title = self.ui.new_task.trim().to_string();
        if title.is_empty() {
            return Ok(None);
        }

        match self.api.create_todo(&title).await {
            Ok(todo) => {
                tracing::info!(todo_id = %todo.id, "Todo created");
                self.todos.push(todo.clone());
                self.ui.new_task.clear();
                Ok(Some(todo))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create todo");
                Err(e)
            }
        }
    }

    /// 部分更新を送り、返ってきた Todo でローカルを置き換える。
    /// 404 の場合は手元の状態が古いとみなして全件を取り直す。
    pub async fn update_todo(
        &mut self,
        id: &TodoId,
        patch: TodoPatch,
    ) -> Result<Todo, ClientError> {
        match self.api.update_todo(id, &patch).await {
            Ok(todo) => {
                if let Some(slot) = self.todos.iter_mut().find(|t| t.id == todo.id) {
                    *slot = todo.clone();
                }
                Ok(todo)
            }
            Err(ClientError::NotFound) => {
                tracing::warn!(todo_id = %id, "Todo no longer exists, refetching");
                if let Err(e) = self.refresh().await {
                    tracing::debug!(error = %e, "Refetch after missing todo failed");
                }
                Err(ClientError::NotFound)
            }
            Err(e) => {
                tracing::error!(todo_id = %id, error = %e, "Failed to update todo");
                Err(e)
            }
        }
    }

    pub async fn delete_todo(&mut self, id: &TodoId) -> Result<(), ClientError> {
        match self.api.delete_todo(id).await {
            Ok(()) => {
                self.todos.retain(|t| &t.id != id);
                tracing::info!(todo_id = %id, "Todo deleted");
                Ok(())
            }
            Err(e) => {
                tracing::error!(todo_id = %id, error = %e, "Failed to delete todo");
                Err(e)
            }
        }
    }

    pub async fn toggle_completed(&mut self, id: &TodoId) -> Result<Todo, ClientError> {
        let completed = self.find(id).ok_or(ClientError::NotFound)?.completed;
        self.update_todo(id, TodoPatch::completed(!completed)).await
    }

    /// タグを追加する。既に付いていればリクエストを送らず `None`
    pub async fn add_tag(
        &mut self,
        id: &TodoId,
        tag: &str,
    ) -> Result<Option<Todo>, ClientError> {
        let todo = self.find(id).ok_or(ClientError::NotFound)?;
        match todo.tags.with(tag) {
            Some(tags) => self.update_todo(id, TodoPatch::tags(tags)).await.map(Some),
            None => Ok(None),
        }
    }

    /// タグを外す。付いていなければリクエストを送らず `None`
    pub async fn remove_tag(
        &mut self,
        id: &TodoId,
        tag: &str,
    ) -> Result<Option<Todo>, ClientError> {
        let todo = self.find(id).ok_or(ClientError::NotFound)?;
        match todo.tags.without(tag) {
            Some(tags) => self.update_todo(id, TodoPatch::tags(tags)).await.map(Some),
            None => Ok(None),
        }
    }

    pub fn start_edit(&mut self, id: &TodoId) -> bool {
        let Some(todo) = self.find(id) else {
            return false;
        };
        self.ui.editing = Some(EditBuffer {
            id: todo.id.clone(),
            title: todo.title.clone(),
        });
        true
    }

    pub fn set_edit_title(&mut self, title: impl Into<String>) {
        if let Some(buffer) = self.ui.editing.as_mut() {
            buffer.title = title.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.ui.editing = None;
    }

    /// 編集を確定する。バッファが空欄なら取り消しとして扱う
    pub async fn save_edit(&mut self) -> Result<Option<Todo>, ClientError> {
        let Some(buffer) = self.ui.editing.take() else {
            return Ok(None);
        };
        let title = buffer.title.trim();
        if title.is_empty() {
            return Ok(None);
        }
        self.update_todo(&buffer.id, TodoPatch::title(title))
            .await
            .map(Some)
    }

    pub fn toggle_sort(&mut self) {
        self.ui.view.sort = self.ui.view.sort.toggled();
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.ui.view.sort = sort;
    }

    /// タグ絞り込みの選択を切り替える。保存済みタグと同じく前後の空白は除き、空なら無視
    pub fn toggle_tag_filter(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }
        let filter = &mut self.ui.view.tag_filter;
        if !filter.remove(tag) {
            filter.insert(tag.to_string());
        }
    }

    pub fn clear_tag_filter(&mut self) {
        self.ui.view.tag_filter.clear();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.ui.view.mode = mode;
    }

    pub fn toggle_hide_completed(&mut self) {
        self.ui.view.hide_completed = !self.ui.view.hide_completed;
    }

    /// コレクション中に現れる全タグ（絞り込み候補）
    pub fn all_tags(&self) -> BTreeSet<&str> {
        self.todos.iter().flat_map(|t| t.tags.iter()).collect()
    }

    pub fn view(&self) -> TodoView<'_> {
        TodoView::build(&self.todos, &self.ui.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::Tags;
    use std::sync::Mutex;

    /// 呼び出しを記録するインメモリの API
    #[derive(Default)]
    struct FakeApi {
        server: Mutex<Vec<Todo>>,
        calls: Mutex<Vec<String>>,
        fail: Mutex<bool>,
    }

    impl FakeApi {
        fn with_todos(todos: Vec<Todo>) -> Self {
            Self {
                server: Mutex::new(todos),
                ..Self::default()
            }
        }

        fn record(&self, call: &str) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push(call.to_string());
            if *self.fail.lock().unwrap() {
                return Err(ClientError::Api {
                    status: 500,
                    message: "Internal server error".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TodoApi for &FakeApi {
        async fn list_todos(&self) -> Result<Vec<Todo>, ClientError> {
            self.record("list")?;
            Ok(self.server.lock().unwrap().clone())
        }

        async fn create_todo(&self, title: &str) -> Result<Todo, ClientError> {
            self.record("create")?;
            let todo = Todo::new(title).map_err(|e| ClientError::Api {
                status: 400,
                message: e.to_string(),
            })?;
            self.server.lock().unwrap().push(todo.clone());
            Ok(todo)
        }

        async fn update_todo(&self, id: &TodoId, patch: &TodoPatch) -> Result<Todo, ClientError> {
            self.record("update")?;
            let mut server = self.server.lock().unwrap();
            let todo = server
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or(ClientError::NotFound)?;
            todo.apply(patch.clone()).map_err(|e| ClientError::Api {
                status: 400,
                message: e.to_string(),
            })?;
            Ok(todo.clone())
        }

        async fn delete_todo(&self, id: &TodoId) -> Result<(), ClientError> {
            self.record("delete")?;
            let mut server = self.server.lock().unwrap();
            let before = server.len();
            server.retain(|t| &t.id != id);
            if server.len() == before {
                return Err(ClientError::NotFound);
            }
            Ok(())
        }
    }

    fn calls(api: &FakeApi) -> Vec<String> {
        api.calls.lock().unwrap().clone()
    }

    fn tagged(title: &str, tags: &[&str]) -> Todo {
        let mut todo = Todo::new(title).unwrap();
        todo.tags = tags.iter().collect::<Tags>();
        todo
    }

    #[tokio::test]
    async fn test_mount_fetches_once() {
        // Arrange
        let api = FakeApi::with_todos(vec![tagged("Buy milk", &[])]);
        let mut app = TodoApp::new(&api);

        // Act
        app.mount().await.unwrap();

        // Assert
        assert_eq!(app.todos().len(), 1);
        assert_eq!(calls(&api), vec!["list"]);
    }

    #[tokio::test]
    async fn test_add_todo_appends_and_clears_input() {
        let api = FakeApi::default();
        let mut app = TodoApp::new(&api);
        app.set_new_task("  Write report ");

        let created = app.add_todo().await.unwrap().unwrap();

        assert_eq!(created.title, "Write report");
        assert_eq!(app.todos(), &[created]);
        assert!(app.ui().new_task.is_empty());
        assert_eq!(calls(&api), vec!["create"]);
    }

    #[tokio::test]
    async fn test_blank_new_task_sends_nothing() {
        let api = FakeApi::default();
        let mut app = TodoApp::new(&api);
        app.set_new_task("   ");

        let result = app.add_todo().await.unwrap();

        assert!(result.is_none());
        assert!(calls(&api).is_empty());
    }

    #[tokio::test]
    async fn test_toggle_completed_patches_local_entry() {
        // Arrange
        let todo = tagged("Buy milk", &["home"]);
        let id = todo.id.clone();
        let api = FakeApi::with_todos(vec![todo]);
        let mut app = TodoApp::new(&api);
        app.mount().await.unwrap();

        // Act
        app.toggle_completed(&id).await.unwrap();

        // Assert: 再取得せずにローカルを更新
        assert!(app.find(&id).unwrap().completed);
        assert!(app.find(&id).unwrap().has_tag("home"));
        assert_eq!(calls(&api), vec!["list", "update"]);
    }

    #[tokio::test]
    async fn test_tag_changes_skip_request_when_unchanged() {
        let todo = tagged("Deploy", &["work"]);
        let id = todo.id.clone();
        let api = FakeApi::with_todos(vec![todo]);
        let mut app = TodoApp::new(&api);
        app.mount().await.unwrap();

        let duplicate = app.add_tag(&id, "work").await.unwrap();
        let absent = app.remove_tag(&id, "home").await.unwrap();

        assert!(duplicate.is_none());
        assert!(absent.is_none());
        assert_eq!(calls(&api), vec!["list"]);
    }

    #[tokio::test]
    async fn test_add_and_remove_tag() {
        let todo = tagged("Deploy", &["work"]);
        let id = todo.id.clone();
        let api = FakeApi::with_todos(vec![todo]);
        let mut app = TodoApp::new(&api);
        app.mount().await.unwrap();

        app.add_tag(&id, "urgent").await.unwrap();
        assert_eq!(app.find(&id).unwrap().tags.as_slice(), ["work", "urgent"]);

        app.remove_tag(&id, "work").await.unwrap();
        assert_eq!(app.find(&id).unwrap().tags.as_slice(), ["urgent"]);
    }

    #[tokio::test]
    async fn test_update_not_found_refetches_collection() {
        // Arrange: 別クライアントがサーバ側で削除した状態
        let todo = tagged("Stale", &[]);
        let id = todo.id.clone();
        let api = FakeApi::with_todos(vec![todo]);
        let mut app = TodoApp::new(&api);
        app.mount().await.unwrap();
        api.server.lock().unwrap().clear();

        // Act
        let result = app.toggle_completed(&id).await;

        // Assert: 404 の後に全件を取り直し、古い Todo は消える
        assert!(matches!(result, Err(ClientError::NotFound)));
        assert!(app.todos().is_empty());
        assert_eq!(calls(&api), vec!["list", "update", "list"]);
    }

    #[tokio::test]
    async fn test_failures_leave_state_unchanged() {
        let todo = tagged("Keep", &["work"]);
        let id = todo.id.clone();
        let api = FakeApi::with_todos(vec![todo]);
        let mut app = TodoApp::new(&api);
        app.mount().await.unwrap();
        let before = app.todos().to_vec();
        *api.fail.lock().unwrap() = true;
        app.set_new_task("New");

        assert!(app.add_todo().await.is_err());
        assert!(app.toggle_completed(&id).await.is_err());
        assert!(app.delete_todo(&id).await.is_err());

        assert_eq!(app.todos(), before.as_slice());
        assert_eq!(app.ui().new_task, "New");
    }

    #[tokio::test]
    async fn test_delete_removes_local_entry() {
        let keep = tagged("Keep", &[]);
        let drop = tagged("Drop", &[]);
        let drop_id = drop.id.clone();
        let api = FakeApi::with_todos(vec![keep, drop]);
        let mut app = TodoApp::new(&api);
        app.mount().await.unwrap();

        app.delete_todo(&drop_id).await.unwrap();

        assert_eq!(app.todos().len(), 1);
        assert!(app.find(&drop_id).is_none());
    }

    #[tokio::test]
    async fn test_save_edit_sends_trimmed_title() {
        let todo = tagged("Old", &[]);
        let id = todo.id.clone();
        let api = FakeApi::with_todos(vec![todo]);
        let mut app = TodoApp::new(&api);
        app.mount().await.unwrap();

        assert!(app.start_edit(&id));
        app.set_edit_title("  New title ");
        let saved = app.save_edit().await.unwrap();

        assert_eq!(saved.unwrap().title, "New title");
        assert_eq!(app.find(&id).unwrap().title, "New title");
        assert!(app.ui().editing.is_none());
    }

    #[tokio::test]
    async fn test_blank_edit_cancels_without_request() {
        let todo = tagged("Old", &[]);
        let id = todo.id.clone();
        let api = FakeApi::with_todos(vec![todo]);
        let mut app = TodoApp::new(&api);
        app.mount().await.unwrap();

        app.start_edit(&id);
        app.set_edit_title("   ");
        let saved = app.save_edit().await.unwrap();

        assert!(saved.is_none());
        assert!(app.ui().editing.is_none());
        assert_eq!(app.find(&id).unwrap().title, "Old");
        assert_eq!(calls(&api), vec!["list"]);
    }

    #[tokio::test]
    async fn test_tag_filter_is_trimmed_and_ignores_blank() {
        // Arrange
        let api = FakeApi::with_todos(vec![
            tagged("Report", &["work"]),
            tagged("Groceries", &["home"]),
        ]);
        let mut app = TodoApp::new(&api);
        app.mount().await.unwrap();

        // Act: 空白付きのタグと空のタグを選択
        app.toggle_tag_filter(" work ");
        app.toggle_tag_filter("   ");

        // Assert: "work" として扱われ、空タグで全件が消えることはない
        assert_eq!(app.ui().view.tag_filter, BTreeSet::from(["work".to_string()]));
        match app.view() {
            TodoView::List(todos) => {
                assert_eq!(todos.len(), 1);
                assert_eq!(todos[0].title, "Report");
            }
            other => panic!("Expected list view, got {other:?}"),
        }

        app.toggle_tag_filter("work");
        assert!(app.ui().view.tag_filter.is_empty());
    }

    #[tokio::test]
    async fn test_ui_toggles_drive_view() {
        let api = FakeApi::with_todos(vec![
            tagged("Report", &["work"]),
            tagged("Groceries", &["home"]),
        ]);
        let mut app = TodoApp::new(&api);
        app.mount().await.unwrap();

        app.toggle_tag_filter("work");
        app.set_view_mode(ViewMode::Grouped);

        match app.view() {
            TodoView::Grouped(groups) => {
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].tag, Some("work"));
            }
            other => panic!("Expected grouped view, got {other:?}"),
        }

        app.toggle_tag_filter("work");
        assert!(app.ui().view.tag_filter.is_empty());
        assert_eq!(app.all_tags().into_iter().collect::<Vec<_>>(), vec!["home", "work"]);
    }
}

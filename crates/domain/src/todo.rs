use crate::errors::DomainError;
use crate::tags::Tags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// サーバ生成の ID と同じ、小文字ハイフン区切りの UUID 形式か
    pub fn is_uuid(&self) -> bool {
        Uuid::try_parse(&self.0).is_ok_and(|u| u.hyphenated().to_string() == self.0)
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// タイトルを正規化する（前後の空白除去、空なら拒否）
pub fn normalize_title(title: &str) -> Result<String, DomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub tags: Tags,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// 新しい Todo を作成する（ID と作成日時はここで確定）
    pub fn new(title: &str) -> Result<Self, DomainError> {
        Self::with_created_at(title, Utc::now())
    }

    pub fn with_created_at(title: &str, created_at: DateTime<Utc>) -> Result<Self, DomainError> {
        Ok(Self {
            id: TodoId::new(),
            title: normalize_title(title)?,
            completed: false,
            tags: Tags::new(),
            created_at,
        })
    }

    /// 部分更新を適用する。
    /// 検証に失敗した場合はどのフィールドも変更しない。
    pub fn apply(&mut self, patch: TodoPatch) -> Result<(), DomainError> {
        let patch = patch.normalized()?;

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        Ok(())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Todo の部分更新
///
/// `None` のフィールドは変更しない。`tags: Some(空)` はタグを全て外す。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

impl TodoPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn tags(tags: Tags) -> Self {
        Self {
            tags: Some(tags),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none() && self.tags.is_none()
    }

    /// タイトルを正規化した更新内容を返す
    pub fn normalized(self) -> Result<Self, DomainError> {
        let title = self.title.as_deref().map(normalize_title).transpose()?;
        Ok(Self { title, ..self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_id_new_is_uuid() {
        // Act
        let todo_id = TodoId::new();

        // Assert: UUID v4 形式で生成される
        assert!(todo_id.is_uuid());
        assert_eq!(todo_id.as_str().len(), 36);
        assert!(!TodoId::from_string("not-a-uuid").is_uuid());
    }

    #[test]
    fn test_is_uuid_accepts_only_canonical_form() {
        let canonical = "0b6c1f0e-52a4-4a4f-9d3c-6f7c2b9e8a11";

        assert!(TodoId::from_string(canonical).is_uuid());
        // 他の表記は Uuid としては解釈できても保存形式とは一致しない
        assert!(!TodoId::from_string(format!("urn:uuid:{canonical}")).is_uuid());
        assert!(!TodoId::from_string(format!("{{{canonical}}}")).is_uuid());
        assert!(!TodoId::from_string(canonical.replace('-', "")).is_uuid());
        assert!(!TodoId::from_string(canonical.to_uppercase()).is_uuid());
    }

    #[test]
    fn test_todo_creation_trims_title() {
        // Arrange & Act
        let todo = Todo::new("  Buy milk  ").unwrap();

        // Assert: 初期状態が正しく設定されていることを確認
        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
        assert!(todo.tags.is_empty());
        assert!(!todo.id.as_str().is_empty());
    }

    #[test]
    fn test_todo_creation_rejects_blank_title() {
        assert_eq!(Todo::new("").unwrap_err(), DomainError::EmptyTitle);
        assert_eq!(Todo::new(" \t\n ").unwrap_err(), DomainError::EmptyTitle);
    }

    #[test]
    fn test_apply_completed_leaves_other_fields() {
        // Arrange
        let mut todo = Todo::new("Write report").unwrap();
        todo.tags.insert("work");
        let before = todo.clone();

        // Act
        todo.apply(TodoPatch::completed(true)).unwrap();

        // Assert
        assert!(todo.completed);
        assert_eq!(todo.title, before.title);
        assert_eq!(todo.tags, before.tags);
        assert_eq!(todo.created_at, before.created_at);
    }

    #[test]
    fn test_apply_empty_tags_clears_only_tags() {
        let mut todo = Todo::new("Write report").unwrap();
        todo.tags.insert("work");
        todo.completed = true;

        todo.apply(TodoPatch::tags(Tags::new())).unwrap();

        assert!(todo.tags.is_empty());
        assert_eq!(todo.title, "Write report");
        assert!(todo.completed);
    }

    #[test]
    fn test_apply_blank_title_changes_nothing() {
        // Arrange: タイトルと完了を同時に更新しようとする
        let mut todo = Todo::new("Keep me").unwrap();
        let patch = TodoPatch {
            title: Some("   ".to_string()),
            completed: Some(true),
            tags: None,
        };

        // Act
        let result = todo.apply(patch);

        // Assert: 失敗時はどのフィールドも変わらない
        assert_eq!(result, Err(DomainError::EmptyTitle));
        assert_eq!(todo.title, "Keep me");
        assert!(!todo.completed);
    }

    #[test]
    fn test_todo_json_shape() {
        let mut todo = Todo::new("Task").unwrap();
        todo.tags.insert("home");

        let json = serde_json::to_value(&todo).unwrap();

        assert_eq!(json["id"], todo.id.as_str());
        assert_eq!(json["title"], "Task");
        assert_eq!(json["completed"], false);
        assert_eq!(json["tags"], serde_json::json!(["home"]));
        assert!(json["createdAt"].is_string());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = TodoPatch::completed(false);

        let json = serde_json::to_string(&patch).unwrap();

        assert_eq!(json, r#"{"completed":false}"#);
        assert!(TodoPatch::default().is_empty());
    }
}

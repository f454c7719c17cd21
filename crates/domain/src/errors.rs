use thiserror::Error;

/// ドメインの不変条件違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 空白除去後のタイトルが空
    #[error("Title is required")]
    EmptyTitle,
}

/// ストレージ操作のエラー
///
/// 「見つからない」はエラーではなく `Option` / `bool` で表現するため、
/// ここにはバリデーション失敗とバックエンド障害だけが現れる。
#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl TodoError {
    pub fn backend(message: impl Into<String>) -> Self {
        TodoError::Backend(message.into())
    }
}

use async_trait::async_trait;
use domain::{Todo, TodoDraft, TodoId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// ストア側のスキーマ・入力検証に失敗
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 更新対象が書き込みまでの間に消えていた
    #[error("Record no longer exists")]
    Missing,

    #[error("Store error: {0}")]
    Backend(String),
}

/// Todo コレクションを扱うドキュメントストアのドライバ
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// 全件取得（ID 順）
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError>;

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError>;

    /// ID を採番して保存し、保存したレコードを返す
    async fn create(&self, draft: TodoDraft) -> Result<Todo, StoreError>;

    /// 既存レコードを丸ごと置き換える
    async fn update(&self, todo: &Todo) -> Result<(), StoreError>;

    async fn delete(&self, todo: &Todo) -> Result<(), StoreError>;
}

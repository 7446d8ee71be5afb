use async_trait::async_trait;
use domain::{Todo, TodoDraft, TodoId, TodoQuery};
use shared::AppError;

/// todos コレクションに対する永続化操作
///
/// 絞り込み・並び替えの意味は `TodoQuery` が定義し、各実装はそれに従う。
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// 条件に一致する Todo を並び替えて返す（件数制限なし）
    async fn find(&self, query: &TodoQuery) -> Result<Vec<Todo>, AppError>;

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, AppError>;

    /// 新しい ID を払い出して挿入し、その ID を返す
    async fn insert(&self, draft: TodoDraft) -> Result<TodoId, AppError>;

    /// 削除した件数（0 または 1）を返す
    async fn delete(&self, id: &TodoId) -> Result<u64, AppError>;
}

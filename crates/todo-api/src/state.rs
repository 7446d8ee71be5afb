use infrastructure::{InMemoryTodoRepository, TodoRepository};
use shared::AppError;
use std::sync::Arc;

use crate::error::ApiError;

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    repository: Arc<dyn TodoRepository>,
    include_error_details: bool,
}

impl AppState {
    pub fn new(repository: Arc<dyn TodoRepository>, include_error_details: bool) -> Self {
        Self {
            repository,
            include_error_details,
        }
    }

    /// インメモリストアを使う状態（開発/テスト用）
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryTodoRepository::new()), true)
    }

    pub fn repository(&self) -> &dyn TodoRepository {
        self.repository.as_ref()
    }

    /// エラーを環境に応じたレスポンス用エラーに変換
    pub fn reject(&self, error: AppError) -> ApiError {
        ApiError::new(error, self.include_error_details)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid TodoId: {0}")]
    InvalidTodoId(String),

    /// 作成時の不変条件違反（違反メッセージをすべて保持）
    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),
}

pub type DomainResult<T> = Result<T, DomainError>;

use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// アプリケーション全体で使用されるエラー型
#[derive(Debug, Clone, Error)]
pub enum AppError {
    // ドメインエラー
    #[error("Invalid todo id: {0}")]
    InvalidTodoId(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // インフラストラクチャエラー
    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // システムエラー
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidTodoId(id) => AppError::InvalidTodoId(id),
            DomainError::Validation(violations) => AppError::Validation(violations),
        }
    }
}

/// エラーの分類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    /// クライアントエラー（4xx相当）
    Client,
    /// サーバーエラー（5xx相当）
    Server,
    /// 一時的なエラー
    Transient,
}

/// エラーの重要度
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// エラーメタデータ
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    /// 呼び出し側で再試行しても良いか（サービス自身は再試行しない）
    pub retryable: bool,
}

impl ErrorMetadata {
    fn new(code: &'static str, category: ErrorCategory, severity: ErrorSeverity) -> Self {
        Self {
            code,
            category,
            severity,
            retryable: false,
        }
    }
}

impl AppError {
    pub fn metadata(&self) -> ErrorMetadata {
        match self {
            AppError::InvalidTodoId(_) => {
                ErrorMetadata::new("INVALID_ID", ErrorCategory::Client, ErrorSeverity::Info)
            }
            AppError::Validation(_) => ErrorMetadata::new(
                "VALIDATION_ERROR",
                ErrorCategory::Client,
                ErrorSeverity::Info,
            ),
            AppError::BadRequest(_) => {
                ErrorMetadata::new("BAD_REQUEST", ErrorCategory::Client, ErrorSeverity::Info)
            }
            AppError::NotFound(_) => {
                ErrorMetadata::new("NOT_FOUND", ErrorCategory::Client, ErrorSeverity::Info)
            }
            AppError::DynamoDb(msg) => {
                let retryable = is_dynamodb_retryable(msg);
                ErrorMetadata {
                    code: "DYNAMODB_ERROR",
                    category: if retryable {
                        ErrorCategory::Transient
                    } else {
                        ErrorCategory::Server
                    },
                    severity: if retryable {
                        ErrorSeverity::Warning
                    } else {
                        ErrorSeverity::Error
                    },
                    retryable,
                }
            }
            AppError::Serialization(_) => ErrorMetadata::new(
                "SERIALIZATION_ERROR",
                ErrorCategory::Server,
                ErrorSeverity::Error,
            ),
            AppError::Configuration(_) => ErrorMetadata::new(
                "CONFIGURATION_ERROR",
                ErrorCategory::Server,
                ErrorSeverity::Critical,
            ),
            AppError::Internal(_) => ErrorMetadata::new(
                "INTERNAL_ERROR",
                ErrorCategory::Server,
                ErrorSeverity::Critical,
            ),
        }
    }

    /// HTTPステータスコードを取得
    pub fn http_status_code(&self) -> u16 {
        match self.metadata().category {
            ErrorCategory::Client => match self {
                AppError::NotFound(_) => 404,
                _ => 400,
            },
            ErrorCategory::Server => 500,
            ErrorCategory::Transient => 503,
        }
    }

    /// クライアントに返すメッセージ
    ///
    /// クライアントエラーはそのまま、サーバーエラーは内部情報を隠す。
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidTodoId(_) => {
                "The requested todo id wasn't a legal todo ID.".to_string()
            }
            AppError::Validation(violations) => violations.join("; "),
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::DynamoDb(_) if self.metadata().retryable => {
                "The document store is temporarily unavailable".to_string()
            }
            _ => "Internal server error".to_string(),
        }
    }
}

/// DynamoDBエラーが一時的なものかどうかを判定
fn is_dynamodb_retryable(error_message: &str) -> bool {
    let retryable_errors = [
        "ThrottlingException",
        "ProvisionedThroughputExceededException",
        "ServiceUnavailable",
        "InternalServerError",
        "RequestLimitExceeded",
    ];

    retryable_errors
        .iter()
        .any(|&err| error_message.contains(err))
}

/// 標準化されたエラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    /// 詳細情報（開発環境のみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// 作成時のバリデーション違反
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
    pub request_id: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn from_app_error(error: &AppError, request_id: String, include_details: bool) -> Self {
        let violations = match error {
            AppError::Validation(violations) => violations.clone(),
            _ => Vec::new(),
        };

        Self {
            code: error.metadata().code.to_string(),
            message: error.user_message(),
            details: include_details.then(|| error.to_string()),
            violations,
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

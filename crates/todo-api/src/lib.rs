//! todos コレクションの HTTP API（axum）
//!
//! 一覧（絞り込み/並び替え）・単一取得・作成・削除を提供します。
//! 永続化は `infrastructure::TodoRepository` に委譲します。

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{app, app_with_state};
pub use state::AppState;

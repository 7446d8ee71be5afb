//! todo-api バイナリのエントリポイント
//! 設定に応じたストアで HTTP サーバを起動します。

use anyhow::Result;
use infrastructure::{
    DynamoDbClient, DynamoDbTodoRepository, InMemoryTodoRepository, TodoRepository,
};
use shared::{init_tracing, Config, StorageBackend};
use std::sync::Arc;
use todo_api::{app_with_state, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG 環境変数で制御可能
    init_tracing().map_err(|e| anyhow::anyhow!(e))?;

    let config = Config::from_env()?;
    let repository: Arc<dyn TodoRepository> = match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Arc::new(InMemoryTodoRepository::new())
        }
        StorageBackend::DynamoDb => {
            let db = DynamoDbClient::new(&config).await;
            db.ensure_table().await?;
            Arc::new(DynamoDbTodoRepository::new(db))
        }
    };

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, table = %config.dynamodb_table, "server starting");

    let state = AppState::new(repository, config.include_error_details());
    axum::serve(listener, app_with_state(state)).await?;

    Ok(())
}

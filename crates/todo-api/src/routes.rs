use axum::{routing::get, Router};

use crate::{handlers, state::AppState};

pub const API_TODOS: &str = "/api/todos";
pub const API_TODOS_BY_ID: &str = "/api/todos/:id";

/// インメモリストアでルータを構築します。
pub fn app() -> Router {
    app_with_state(AppState::in_memory())
}

/// 外部から状態を注入できる版
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            API_TODOS,
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            API_TODOS_BY_ID,
            get(handlers::get_todo).delete(handlers::delete_todo),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn get_health_returns_ok() {
        let app = app();

        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let request = Request::builder()
            .method("PATCH")
            .uri("/api/todos")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

use async_trait::async_trait;
use domain::{Todo, TodoDraft, TodoId, TodoQuery};
use shared::AppError;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::repositories::TodoRepository;

/// 開発/テスト用のインメモリ実装
///
/// 挿入順を保持するため `Vec` で管理する。
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: Mutex<Vec<Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存データを投入した状態で作成
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: Mutex::new(todos),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Todo>>, AppError> {
        self.todos
            .lock()
            .map_err(|_| AppError::Internal("todo store lock poisoned".to_string()))
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn find(&self, query: &TodoQuery) -> Result<Vec<Todo>, AppError> {
        let mut matching: Vec<Todo> = self
            .lock()?
            .iter()
            .filter(|todo| query.filter.matches(todo))
            .cloned()
            .collect();
        query.sort.sort(&mut matching);
        Ok(matching)
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, AppError> {
        Ok(self.lock()?.iter().find(|todo| &todo.id == id).cloned())
    }

    async fn insert(&self, draft: TodoDraft) -> Result<TodoId, AppError> {
        let id = TodoId::new();
        self.lock()?.push(Todo::from_draft(id.clone(), draft));
        debug!(todo_id = %id, created_at = ?id.created_at(), "todo inserted in memory");
        Ok(id)
    }

    async fn delete(&self, id: &TodoId) -> Result<u64, AppError> {
        let mut todos = self.lock()?;
        match todos.iter().position(|todo| &todo.id == id) {
            Some(index) => {
                todos.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{ListTodosParams, SortField, SortOrder, SortSpec, TodoFilter};

    fn draft(owner: &str, status: bool, body: &str, category: &str) -> TodoDraft {
        TodoDraft {
            owner: owner.to_string(),
            status,
            body: body.to_string(),
            category: category.to_string(),
        }
    }

    async fn seeded() -> InMemoryTodoRepository {
        let repo = InMemoryTodoRepository::new();
        repo.insert(draft("Blanche", false, "In sunt ex non tempor", "software design"))
            .await
            .unwrap();
        repo.insert(draft("Fry", false, "Ipsum esse est ullamco", "video games"))
            .await
            .unwrap();
        repo.insert(draft("Fry", true, "Ullamco irure laborum", "homework"))
            .await
            .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_insert_then_find_by_id() {
        let repo = InMemoryTodoRepository::new();

        let id = repo.insert(draft("Dawn", true, "body", "groceries")).await.unwrap();
        let found = repo.find_by_id(&id).await.unwrap().unwrap();

        assert_eq!(found.id, id);
        assert_eq!(found.owner, "Dawn");
        assert!(found.status);
    }

    #[tokio::test]
    async fn test_find_applies_filter_and_sort() {
        let repo = seeded().await;
        let query = TodoQuery {
            filter: TodoFilter {
                owner: Some("fRy".to_string()),
                ..Default::default()
            },
            sort: SortSpec {
                field: Some(SortField::Category),
                order: SortOrder::Descending,
            },
        };

        let todos = repo.find(&query).await.unwrap();

        let categories: Vec<_> = todos.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(categories, ["video games", "homework"]);
    }

    #[tokio::test]
    async fn test_find_without_parameters_returns_everything() {
        let repo = seeded().await;

        let todos = repo
            .find(&TodoQuery::from(ListTodosParams::default()))
            .await
            .unwrap();

        assert_eq!(todos.len(), 3);
        assert_eq!(todos[0].category, "homework");
    }

    #[tokio::test]
    async fn test_delete_reports_count() {
        let repo = seeded().await;
        let id = repo.insert(draft("Roberta", false, "b", "c")).await.unwrap();

        assert_eq!(repo.delete(&id).await.unwrap(), 1);
        assert_eq!(repo.delete(&id).await.unwrap(), 0);
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
        let remaining = repo
            .find(&TodoQuery::from(ListTodosParams::default()))
            .await
            .unwrap();
        assert_eq!(remaining.len(), 3);
    }
}

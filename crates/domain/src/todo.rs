use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// ストアが払い出す Todo の識別子（ULID 文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        Self(Ulid::new().to_string())
    }

    /// 構造的に正しい ULID のみ受け付ける
    pub fn parse(s: &str) -> DomainResult<Self> {
        let ulid = Ulid::from_string(s).map_err(|_| DomainError::InvalidTodoId(s.to_string()))?;
        Ok(Self(ulid.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn timestamp_ms(&self) -> Option<u64> {
        Ulid::from_string(&self.0)
            .ok()
            .map(|ulid| ulid.timestamp_ms())
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp_ms()
            .and_then(|ms| DateTime::from_timestamp_millis(ms as i64))
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// 保存済みの Todo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: TodoId,
    pub owner: String,
    pub status: bool,
    pub body: String,
    pub category: String,
}

impl Todo {
    pub fn from_draft(id: TodoId, draft: TodoDraft) -> Self {
        Self {
            id,
            owner: draft.owner,
            status: draft.status,
            body: draft.body,
            category: draft.category,
        }
    }
}

/// POST /api/todos のペイロード
///
/// 欠落フィールドも受け取ってから `validate` でまとめて検査する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTodo {
    pub owner: Option<String>,
    pub status: Option<bool>,
    pub body: Option<String>,
    pub category: Option<String>,
}

/// 検証済みで挿入可能な Todo（ID はまだない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub owner: String,
    pub status: bool,
    pub body: String,
    pub category: String,
}

impl NewTodo {
    /// owner / body / category が空でないこと、status が存在することを検査する。
    /// 違反はすべて集めて返す。`raw_body` はエラーメッセージにそのまま埋め込む。
    pub fn validate(self, raw_body: &str) -> DomainResult<TodoDraft> {
        let mut violations = Vec::new();

        let owner = non_empty(self.owner);
        if owner.is_none() {
            violations.push(format!(
                "Todo must have a non-empty owner; body was {raw_body}"
            ));
        }
        let body = non_empty(self.body);
        if body.is_none() {
            violations.push(format!(
                "Todo must have a non-empty body; body was {raw_body}"
            ));
        }
        let category = non_empty(self.category);
        if category.is_none() {
            violations.push(format!(
                "Todo must have a non-empty category; body was {raw_body}"
            ));
        }
        if self.status.is_none() {
            violations.push(format!(
                "Todo must have a valid boolean status; body was {raw_body}"
            ));
        }

        match (owner, self.status, body, category) {
            (Some(owner), Some(status), Some(body), Some(category)) => Ok(TodoDraft {
                owner,
                status,
                body,
                category,
            }),
            _ => Err(DomainError::Validation(violations)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

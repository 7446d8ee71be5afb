//! 一覧取得の絞り込み・並び替え条件
//!
//! クエリパラメータ（owner / body / category / sortby / sortorder）を
//! ストアに依存しない形で表現する。DynamoDB 実装は `TodoFilter` を
//! フィルタ式に変換し、並び替えは `SortSpec::sort` で行う。

use crate::todo::Todo;
use std::cmp::Ordering;

pub const OWNER_KEY: &str = "owner";
pub const STATUS_KEY: &str = "status";
pub const BODY_KEY: &str = "body";
pub const CATEGORY_KEY: &str = "category";
pub const ID_KEY: &str = "_id";

/// 絞り込み対象の文字列フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Owner,
    Body,
    Category,
}

impl TextField {
    pub const ALL: [TextField; 3] = [TextField::Owner, TextField::Body, TextField::Category];

    pub fn name(&self) -> &'static str {
        match self {
            TextField::Owner => OWNER_KEY,
            TextField::Body => BODY_KEY,
            TextField::Category => CATEGORY_KEY,
        }
    }

    pub fn value<'a>(&self, todo: &'a Todo) -> &'a str {
        match self {
            TextField::Owner => &todo.owner,
            TextField::Body => &todo.body,
            TextField::Category => &todo.category,
        }
    }
}

/// 大文字小文字を区別しない部分一致条件の AND 結合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub owner: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
}

impl TodoFilter {
    /// 指定されたフィールドと検索語（小文字化済み）の組
    pub fn conditions(&self) -> Vec<(TextField, String)> {
        TextField::ALL
            .iter()
            .filter_map(|field| {
                self.term(*field)
                    .map(|term| (*field, term.to_lowercase()))
            })
            .collect()
    }

    pub fn term(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Owner => self.owner.as_deref(),
            TextField::Body => self.body.as_deref(),
            TextField::Category => self.category.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_none() && self.body.is_none() && self.category.is_none()
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        self.conditions()
            .iter()
            .all(|(field, term)| field.value(todo).to_lowercase().contains(term.as_str()))
    }
}

/// 並び替え可能なフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Owner,
    Status,
    Body,
    Category,
}

impl SortField {
    /// 未知のフィールド名は `None`（並び替えなし）
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            ID_KEY => Some(SortField::Id),
            OWNER_KEY => Some(SortField::Owner),
            STATUS_KEY => Some(SortField::Status),
            BODY_KEY => Some(SortField::Body),
            CATEGORY_KEY => Some(SortField::Category),
            _ => None,
        }
    }

    fn compare(&self, a: &Todo, b: &Todo) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Owner => a.owner.cmp(&b.owner),
            SortField::Status => a.status.cmp(&b.status),
            SortField::Body => a.body.cmp(&b.body),
            SortField::Category => a.category.cmp(&b.category),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// `desc` のみ降順、それ以外はすべて昇順
    pub fn parse(value: &str) -> Self {
        if value == "desc" {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Option<SortField>,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: Some(SortField::Category),
            order: SortOrder::Ascending,
        }
    }
}

impl SortSpec {
    /// 安定ソート。フィールド未指定（未知の名前）の場合は順序を保つ。
    pub fn sort(&self, todos: &mut [Todo]) {
        let Some(field) = self.field else {
            return;
        };
        todos.sort_by(|a, b| {
            let ord = field.compare(a, b);
            match self.order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
    }
}

/// GET /api/todos のクエリパラメータ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTodosParams {
    pub owner: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
    pub sortby: Option<String>,
    pub sortorder: Option<String>,
}

impl ListTodosParams {
    /// デコード済みの (キー, 値) 列から作成
    ///
    /// 同じキーが複数回現れた場合は最初の値を使い、未知のキーは無視する。
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                OWNER_KEY => &mut params.owner,
                BODY_KEY => &mut params.body,
                CATEGORY_KEY => &mut params.category,
                "sortby" => &mut params.sortby,
                "sortorder" => &mut params.sortorder,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

/// 絞り込みと並び替えをまとめた一覧クエリ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoQuery {
    pub filter: TodoFilter,
    pub sort: SortSpec,
}

impl From<ListTodosParams> for TodoQuery {
    fn from(params: ListTodosParams) -> Self {
        let field = match params.sortby.as_deref() {
            Some(name) => SortField::parse(name),
            None => Some(SortField::Category),
        };
        let order = params
            .sortorder
            .as_deref()
            .map(SortOrder::parse)
            .unwrap_or_default();

        Self {
            filter: TodoFilter {
                owner: params.owner,
                body: params.body,
                category: params.category,
            },
            sort: SortSpec { field, order },
        }
    }
}

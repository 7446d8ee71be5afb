use aws_sdk_dynamodb::types::AttributeValue;
use domain::{Todo, TodoFilter, TodoId, BODY_KEY, CATEGORY_KEY, OWNER_KEY, STATUS_KEY};
use shared::AppError;
use std::collections::HashMap;

/// パーティションキー属性名
pub const ID_ATTRIBUTE: &str = "id";

/// 大文字小文字を無視した部分一致用の小文字化コピー属性名
pub fn search_attribute(field: &str) -> String {
    format!("{field}_lc")
}

/// Todo ⇔ DynamoDB アイテムの変換
pub struct TodoItem;

impl TodoItem {
    pub fn to_item(todo: &Todo) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::new();
        item.insert(
            ID_ATTRIBUTE.to_string(),
            AttributeValue::S(todo.id.as_str().to_string()),
        );
        item.insert(STATUS_KEY.to_string(), AttributeValue::Bool(todo.status));

        for (name, value) in [
            (OWNER_KEY, &todo.owner),
            (BODY_KEY, &todo.body),
            (CATEGORY_KEY, &todo.category),
        ] {
            item.insert(name.to_string(), AttributeValue::S(value.clone()));
            item.insert(
                search_attribute(name),
                AttributeValue::S(value.to_lowercase()),
            );
        }

        item
    }

    pub fn from_item(item: &HashMap<String, AttributeValue>) -> Result<Todo, AppError> {
        let id = string_attribute(item, ID_ATTRIBUTE)?;
        let id = TodoId::parse(&id)
            .map_err(|e| AppError::Serialization(format!("stored item has bad id: {e}")))?;
        let status = item
            .get(STATUS_KEY)
            .and_then(|value| value.as_bool().ok())
            .copied()
            .ok_or_else(|| missing(STATUS_KEY))?;

        Ok(Todo {
            id,
            owner: string_attribute(item, OWNER_KEY)?,
            status,
            body: string_attribute(item, BODY_KEY)?,
            category: string_attribute(item, CATEGORY_KEY)?,
        })
    }
}

fn string_attribute(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String, AppError> {
    item.get(name)
        .and_then(|value| value.as_s().ok())
        .cloned()
        .ok_or_else(|| missing(name))
}

fn missing(name: &str) -> AppError {
    AppError::Serialization(format!("stored item is missing attribute `{name}`"))
}

/// Scan 用のフィルタ式
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl FilterExpression {
    /// 条件がなければ `None`（全件スキャン）
    ///
    /// 空文字の検索語はすべてに一致するため式に含めない。
    pub fn from_filter(filter: &TodoFilter) -> Option<Self> {
        let mut clauses = Vec::new();
        let mut names = HashMap::new();
        let mut values = HashMap::new();

        for (field, term) in filter.conditions() {
            if term.is_empty() {
                continue;
            }
            let name_placeholder = format!("#{}", field.name());
            let value_placeholder = format!(":{}", field.name());
            clauses.push(format!("contains({name_placeholder}, {value_placeholder})"));
            names.insert(name_placeholder, search_attribute(field.name()));
            values.insert(value_placeholder, AttributeValue::S(term));
        }

        if clauses.is_empty() {
            return None;
        }

        Some(Self {
            expression: clauses.join(" AND "),
            names,
            values,
        })
    }
}

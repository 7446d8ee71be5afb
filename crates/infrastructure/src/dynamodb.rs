use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::{
    error::DisplayErrorContext,
    types::{
        AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
        ReturnValue, ScalarAttributeType, TableStatus,
    },
    Client,
};
use domain::{Todo, TodoDraft, TodoId, TodoQuery};
use shared::{AppError, Config};
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::models::{FilterExpression, TodoItem, ID_ATTRIBUTE};
use crate::repositories::TodoRepository;

const TABLE_READY_ATTEMPTS: u32 = 30;

#[derive(Clone)]
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
}

impl DynamoDbClient {
    pub async fn new(config: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()));
        if let Some(endpoint) = &config.dynamodb_endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let aws_config = loader.load().await;

        Self {
            client: Client::new(&aws_config),
            table_name: config.dynamodb_table.clone(),
        }
    }

    /// 構築済みの SDK クライアントから作成（テスト用）
    pub fn from_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// テーブルがなければ作成し、ACTIVE になるまで待つ
    #[instrument(skip(self), fields(table = %self.table_name))]
    pub async fn ensure_table(&self) -> Result<(), AppError> {
        match self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
        {
            Ok(_) => return Ok(()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception()) => {}
            Err(e) => return Err(dynamodb_error("describe_table", e)),
        }

        info!("table not found, creating");
        self.client
            .create_table()
            .table_name(&self.table_name)
            .billing_mode(BillingMode::PayPerRequest)
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(ID_ATTRIBUTE)
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .map_err(|e| AppError::Internal(e.to_string()))?,
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(ID_ATTRIBUTE)
                    .key_type(KeyType::Hash)
                    .build()
                    .map_err(|e| AppError::Internal(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| dynamodb_error("create_table", e))?;

        for _ in 0..TABLE_READY_ATTEMPTS {
            let output = self
                .client
                .describe_table()
                .table_name(&self.table_name)
                .send()
                .await
                .map_err(|e| dynamodb_error("describe_table", e))?;
            if output.table().and_then(|t| t.table_status()) == Some(&TableStatus::Active) {
                info!("table is active");
                return Ok(());
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        Err(AppError::DynamoDb(format!(
            "table {} did not become ACTIVE",
            self.table_name
        )))
    }
}

fn dynamodb_error<E>(operation: &str, e: E) -> AppError
where
    E: std::error::Error + 'static,
{
    let message = DisplayErrorContext(e).to_string();
    error!(operation, error = %message, "DynamoDB error");
    AppError::DynamoDb(message)
}

/// 単一テーブル（ハッシュキー `id`）に Todo を 1 アイテムずつ保存する実装
pub struct DynamoDbTodoRepository {
    db: DynamoDbClient,
}

impl DynamoDbTodoRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoRepository for DynamoDbTodoRepository {
    /// Scan をページングしながら全件読み、フィルタ式で絞り込んだ上で並び替える
    #[instrument(skip_all, fields(filter = ?query.filter))]
    async fn find(&self, query: &TodoQuery) -> Result<Vec<Todo>, AppError> {
        let filter = FilterExpression::from_filter(&query.filter);
        let mut todos = Vec::new();
        let mut start_key = None;

        loop {
            let mut request = self
                .db
                .client()
                .scan()
                .table_name(self.db.table_name())
                .set_exclusive_start_key(start_key.take());
            if let Some(filter) = &filter {
                request = request
                    .filter_expression(&filter.expression)
                    .set_expression_attribute_names(Some(filter.names.clone()))
                    .set_expression_attribute_values(Some(filter.values.clone()));
            }

            let output = request
                .send()
                .await
                .map_err(|e| dynamodb_error("scan", e))?;

            for item in output.items.unwrap_or_default() {
                todos.push(TodoItem::from_item(&item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        query.sort.sort(&mut todos);
        info!(result_count = todos.len(), "scan completed");
        Ok(todos)
    }

    #[instrument(skip_all, fields(todo_id = %id))]
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, AppError> {
        let output = self
            .db
            .client()
            .get_item()
            .table_name(self.db.table_name())
            .key(ID_ATTRIBUTE, AttributeValue::S(id.as_str().to_string()))
            .send()
            .await
            .map_err(|e| dynamodb_error("get_item", e))?;

        output.item.as_ref().map(TodoItem::from_item).transpose()
    }

    #[instrument(skip_all)]
    async fn insert(&self, draft: TodoDraft) -> Result<TodoId, AppError> {
        let id = TodoId::new();
        let todo = Todo::from_draft(id.clone(), draft);

        self.db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(TodoItem::to_item(&todo)))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", ID_ATTRIBUTE)
            .send()
            .await
            .map_err(|e| dynamodb_error("put_item", e))?;

        info!(todo_id = %id, created_at = ?id.created_at(), "todo saved");
        Ok(id)
    }

    #[instrument(skip_all, fields(todo_id = %id))]
    async fn delete(&self, id: &TodoId) -> Result<u64, AppError> {
        let output = self
            .db
            .client()
            .delete_item()
            .table_name(self.db.table_name())
            .key(ID_ATTRIBUTE, AttributeValue::S(id.as_str().to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| dynamodb_error("delete_item", e))?;

        Ok(u64::from(output.attributes.is_some()))
    }
}

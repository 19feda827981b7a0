use crate::models::{item_to_todo, todo_to_item, Item, TodoKeys, TODO_ENTITY_TYPE};
use crate::store::{StoreError, TodoStore};
use crate::DynamoDbClient;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::AttributeValue;
use domain::{Todo, TodoDraft, TodoId};
use tracing::{debug, warn};

/// DynamoDB に Todo を 1 アイテムずつ保存するストア
pub struct DynamoTodoStore {
    db: DynamoDbClient,
}

impl DynamoTodoStore {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoStore for DynamoTodoStore {
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let mut todos = Vec::new();
        let mut start_key: Option<Item> = None;

        // 1MB を超える結果はページングされるので最後まで辿る
        loop {
            let output = self
                .db
                .client()
                .scan()
                .table_name(self.db.table_name())
                .filter_expression("EntityType = :entity_type")
                .expression_attribute_values(
                    ":entity_type",
                    AttributeValue::S(TODO_ENTITY_TYPE.to_string()),
                )
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(store_error)?;

            todos.extend(todos_from_page(output.items())?);

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        todos.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(count = todos.len(), "scanned todos");
        Ok(todos)
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let output = self
            .db
            .client()
            .get_item()
            .table_name(self.db.table_name())
            .set_key(Some(TodoKeys::for_todo(id).to_key_map()))
            .send()
            .await
            .map_err(store_error)?;

        match output.item() {
            None => Ok(None),
            Some(item) => item_to_todo(item).map(Some).ok_or_else(|| {
                warn!(todo_id = %id, "stored item could not be parsed");
                StoreError::Backend(format!("malformed item for todo {id}"))
            }),
        }
    }

    async fn create(&self, draft: TodoDraft) -> Result<Todo, StoreError> {
        let todo = draft.into_todo(TodoId::new());

        self.db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(todo_to_item(&todo)))
            .send()
            .await
            .map_err(store_error)?;

        Ok(todo)
    }

    async fn update(&self, todo: &Todo) -> Result<(), StoreError> {
        // 読み込み後に削除されたレコードを復活させない
        self.db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(todo_to_item(todo)))
            .condition_expression("attribute_exists(PK)")
            .send()
            .await
            .map_err(store_error)?;

        Ok(())
    }

    async fn delete(&self, todo: &Todo) -> Result<(), StoreError> {
        self.db
            .client()
            .delete_item()
            .table_name(self.db.table_name())
            .set_key(Some(TodoKeys::for_todo(&todo.id).to_key_map()))
            .send()
            .await
            .map_err(store_error)?;

        Ok(())
    }
}

/// スキャン 1 ページ分のアイテムを Todo に変換する。
///
/// 復元できないアイテムが 1 つでもあれば、`find_by_id` と同じく Backend エラーにする。
fn todos_from_page(items: &[Item]) -> Result<Vec<Todo>, StoreError> {
    items
        .iter()
        .map(|item| {
            item_to_todo(item).ok_or_else(|| {
                let id = item
                    .get("Id")
                    .and_then(|v| v.as_s().ok())
                    .map(String::as_str)
                    .unwrap_or("<unknown>");
                warn!(todo_id = %id, "scanned item could not be parsed");
                StoreError::Backend(format!("malformed item for todo {id}"))
            })
        })
        .collect()
}

/// SDK エラーをエラーコードで分類する
fn store_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let (code, message) = match err.as_service_error() {
        Some(service) => (
            service.code().map(str::to_string),
            service.message().map(str::to_string),
        ),
        None => (None, None),
    };

    classify(code.as_deref(), message, || {
        DisplayErrorContext(&err).to_string()
    })
}

fn classify(
    code: Option<&str>,
    message: Option<String>,
    describe: impl FnOnce() -> String,
) -> StoreError {
    match code {
        Some("ValidationException") => {
            StoreError::Validation(message.unwrap_or_else(|| "invalid item".to_string()))
        }
        Some("ConditionalCheckFailedException") => StoreError::Missing,
        _ => StoreError::Backend(describe()),
    }
}

pub mod dynamodb;
pub mod memory;
pub mod models;
pub mod store;
pub mod todo_repository;

pub use dynamodb::*;
pub use memory::*;
pub use models::*;
pub use store::*;
pub use todo_repository::*;

use shared::{Config, StoreBackend};
use std::sync::Arc;
use tracing::info;

/// 設定に従って Todo ストアを組み立てる
pub async fn connect(config: &Config) -> Arc<dyn TodoStore> {
    match config.store_backend {
        StoreBackend::DynamoDb => {
            info!(
                table = %config.dynamodb_table,
                endpoint = ?config.dynamodb_endpoint,
                "using DynamoDB todo store"
            );
            Arc::new(DynamoTodoStore::new(DynamoDbClient::new(config).await))
        }
        StoreBackend::Memory => {
            info!("using in-memory todo store");
            Arc::new(InMemoryTodoStore::new())
        }
    }
}

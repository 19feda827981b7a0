use crate::store::{StoreError, TodoStore};
use async_trait::async_trait;
use domain::{Todo, TodoDraft, TodoId};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// プロセス内の Todo ストア（開発/テスト用）
#[derive(Default)]
pub struct InMemoryTodoStore {
    todos: RwLock<BTreeMap<TodoId, Todo>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.todos.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        Ok(self.todos.read().await.get(id).cloned())
    }

    async fn create(&self, draft: TodoDraft) -> Result<Todo, StoreError> {
        let todo = draft.into_todo(TodoId::new());
        self.todos
            .write()
            .await
            .insert(todo.id.clone(), todo.clone());
        Ok(todo)
    }

    async fn update(&self, todo: &Todo) -> Result<(), StoreError> {
        let mut todos = self.todos.write().await;
        match todos.get_mut(&todo.id) {
            Some(stored) => {
                *stored = todo.clone();
                Ok(())
            }
            None => Err(StoreError::Missing),
        }
    }

    async fn delete(&self, todo: &Todo) -> Result<(), StoreError> {
        self.todos.write().await.remove(&todo.id);
        Ok(())
    }
}

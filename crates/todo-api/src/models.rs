use domain::{Payload, Todo};
use serde::{Deserialize, Serialize};

/// POST / PATCH のリクエストボディ `{ "todo": { ... } }`
#[derive(Debug, Deserialize)]
pub struct TodoRequest {
    pub todo: Payload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoResponse {
    pub todo: Todo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}

//! 作成・部分更新のリクエストボディを Todo に反映するルール
//!
//! - `owner` はクライアントから受け取らない。作成時に呼び出し元の ID で上書きする
//! - 部分更新で値が空文字のキーは「変更なし」として捨てる（空文字へのクリアはできない）

use crate::errors::DomainError;
use crate::todo::{Todo, TodoFields, TodoId, UserId, RESERVED_KEYS};
use serde_json::{Map, Value};

/// `{ "todo": { ... } }` の中身
pub type Payload = Map<String, Value>;

/// 作成時に必須のフィールド
pub const REQUIRED_FIELD: &str = "title";

/// 保存前の Todo（ID はストアが採番する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub owner: UserId,
    pub fields: TodoFields,
}

impl TodoDraft {
    pub fn from_payload(payload: Payload, caller: &UserId) -> Result<Self, DomainError> {
        let fields = string_fields(strip_reserved(payload))?;

        match fields.get(REQUIRED_FIELD) {
            Some(value) if !value.trim().is_empty() => {}
            _ => {
                return Err(DomainError::validation(format!(
                    "`{REQUIRED_FIELD}` is required"
                )))
            }
        }

        Ok(Self {
            owner: caller.clone(),
            fields,
        })
    }

    pub fn into_todo(self, id: TodoId) -> Todo {
        Todo {
            id,
            owner: self.owner,
            fields: self.fields,
        }
    }
}

/// 部分更新の内容。`owner` と `id` は受け取った時点で取り除く。
#[derive(Debug, Clone, PartialEq)]
pub struct TodoPatch {
    changes: Payload,
}

impl TodoPatch {
    pub fn from_payload(payload: Payload) -> Self {
        Self {
            changes: strip_reserved(payload),
        }
    }

    /// 空文字以外の値を既存レコードにマージした結果を返す。
    ///
    /// 型が不正な値があれば何も反映せずにエラーにする。
    pub fn merge_into(self, mut todo: Todo) -> Result<Todo, DomainError> {
        let changes = string_fields(
            self.changes
                .into_iter()
                .filter(|(_, value)| value.as_str() != Some(""))
                .collect(),
        )?;

        todo.fields.extend(changes);
        Ok(todo)
    }
}

fn strip_reserved(mut payload: Payload) -> Payload {
    for key in RESERVED_KEYS {
        payload.remove(key);
    }
    payload
}

fn string_fields(payload: Payload) -> Result<TodoFields, DomainError> {
    payload
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key, s)),
            other => Err(DomainError::validation(format!(
                "`{key}` must be a string, got {}",
                type_name(&other)
            ))),
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

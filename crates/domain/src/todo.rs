use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// エラーメッセージに使うエンティティ名
pub const TODO_ENTITY: &str = "Todo";

/// クライアントが書き換えられないキー
pub const RESERVED_KEYS: [&str; 2] = ["id", "owner"];

/// 呼び出し側が自由に設定できる文字列フィールド（空文字も可）
pub type TodoFields = BTreeMap<String, String>;

/// ストアが採番する Todo の識別子（ULID）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// パスなど外部から来た文字列を検証して TodoId にする
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        ulid::Ulid::from_string(raw)
            .map(|ulid| Self(ulid.to_string()))
            .map_err(|_| DomainError::MalformedIdentifier(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 認証済みプリンシパルの識別子（JWT の `sub`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 保存済みの Todo。
///
/// JSON では `id` / `owner` と任意フィールドを同じ階層に並べる。
/// `fields` に予約キーが入らないことは `TodoDraft` / `TodoPatch` が保証する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub owner: UserId,
    #[serde(flatten)]
    pub fields: TodoFields,
}

impl Todo {
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

use crate::errors::DomainError;
use crate::todo::{Todo, UserId, TODO_ENTITY};

/// ストアの検索結果が空なら NotFound にする
pub fn ensure_found<T>(record: Option<T>, entity: &'static str) -> Result<T, DomainError> {
    record.ok_or(DomainError::NotFound { entity })
}

/// 呼び出し元がレコードの所有者でなければ NotOwned にする。
///
/// 変更系のストア呼び出しより前に評価すること。
pub fn ensure_owner(todo: &Todo, caller: &UserId) -> Result<(), DomainError> {
    if todo.is_owned_by(caller) {
        Ok(())
    } else {
        Err(DomainError::NotOwned {
            entity: TODO_ENTITY,
        })
    }
}

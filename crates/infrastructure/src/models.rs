use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;
use domain::{Todo, TodoFields, TodoId, UserId};
use std::collections::HashMap;

pub type Item = HashMap<String, AttributeValue>;

/// `EntityType` 属性の値
pub const TODO_ENTITY_TYPE: &str = "Todo";

/// Todo アイテムのキー構造
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoKeys {
    pub pk: String,
    pub sk: String,
}

impl TodoKeys {
    pub fn for_todo(id: &TodoId) -> Self {
        Self {
            pk: format!("TODO#{}", id.as_str()),
            sk: "METADATA".to_string(),
        }
    }

    pub fn to_key_map(&self) -> Item {
        HashMap::from([
            ("PK".to_string(), AttributeValue::S(self.pk.clone())),
            ("SK".to_string(), AttributeValue::S(self.sk.clone())),
        ])
    }
}

/// Todo を DynamoDB アイテムに変換
pub fn todo_to_item(todo: &Todo) -> Item {
    let mut item = TodoKeys::for_todo(&todo.id).to_key_map();

    let fields = todo
        .fields
        .iter()
        .map(|(key, value)| (key.clone(), AttributeValue::S(value.clone())))
        .collect();

    item.insert(
        "EntityType".to_string(),
        AttributeValue::S(TODO_ENTITY_TYPE.to_string()),
    );
    item.insert("Id".to_string(), AttributeValue::S(todo.id.to_string()));
    item.insert(
        "Owner".to_string(),
        AttributeValue::S(todo.owner.to_string()),
    );
    item.insert("Fields".to_string(), AttributeValue::M(fields));
    item.insert(
        "UpdatedAt".to_string(),
        AttributeValue::S(Utc::now().to_rfc3339()),
    );

    item
}

/// DynamoDB アイテムから Todo を復元。形が合わなければ None
pub fn item_to_todo(item: &Item) -> Option<Todo> {
    let id = TodoId::parse(item.get("Id")?.as_s().ok()?).ok()?;
    let owner = UserId::from_string(item.get("Owner")?.as_s().ok()?.clone());

    let fields = match item.get("Fields") {
        None => TodoFields::new(),
        Some(value) => value
            .as_m()
            .ok()?
            .iter()
            .map(|(key, value)| Some((key.clone(), value.as_s().ok()?.clone())))
            .collect::<Option<TodoFields>>()?,
    };

    Some(Todo { id, owner, fields })
}

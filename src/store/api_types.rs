//! Wire types for the document store REST surface.

use serde::{Deserialize, Serialize};

use super::types::{TodoItem, ID_FLOOR};

/// A stored item document. Fields are exactly `{id, description}`; a
/// document written without an `id` field deserializes to the floor
/// sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDocument {
  #[serde(default = "default_id")]
  pub id: u32,
  #[serde(default)]
  pub description: String,
}

fn default_id() -> u32 {
  ID_FLOOR
}

/// Response body of a collection fetch
#[derive(Debug, Deserialize)]
pub struct ListResponse {
  #[serde(default)]
  pub documents: Vec<ItemDocument>,
}

impl ItemDocument {
  pub fn from_item(item: &TodoItem) -> Self {
    Self {
      id: item.id,
      description: item.description.clone(),
    }
  }

  pub fn into_item(self) -> TodoItem {
    TodoItem {
      id: self.id,
      description: self.description,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_document_round_trip() {
    let item = TodoItem::new("buy milk", 42);

    let json = serde_json::to_string(&ItemDocument::from_item(&item)).unwrap();
    let back: ItemDocument = serde_json::from_str(&json).unwrap();
    let back = back.into_item();

    assert_eq!(back.id, 42);
    assert_eq!(back.description, "buy milk");
  }

  #[test]
  fn test_missing_id_defaults_to_floor() {
    let doc: ItemDocument = serde_json::from_str(r#"{"description": "legacy"}"#).unwrap();

    assert_eq!(doc.id, ID_FLOOR);
    assert_eq!(doc.description, "legacy");
  }

  #[test]
  fn test_wire_fields_are_exactly_id_and_description() {
    let value =
      serde_json::to_value(ItemDocument::from_item(&TodoItem::new("x", 10_000_001))).unwrap();
    let obj = value.as_object().unwrap();

    assert_eq!(obj.len(), 2);
    assert_eq!(obj["id"], 10_000_001);
    assert_eq!(obj["description"], "x");
  }

  #[test]
  fn test_list_response_maps_documents() {
    let list: ListResponse =
      serde_json::from_str(r#"{"documents": [{"id": 10000001, "description": "a"}]}"#).unwrap();

    let items: Vec<TodoItem> = list.documents.into_iter().map(ItemDocument::into_item).collect();
    assert_eq!(items, [TodoItem::new("a", 10_000_001)]);
  }

  #[test]
  fn test_empty_list_response() {
    let list: ListResponse = serde_json::from_str("{}").unwrap();
    assert!(list.documents.is_empty());
  }
}

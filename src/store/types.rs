use std::fmt;
use std::hash::{Hash, Hasher};

/// Floor for item ids. Ids start here so decimal document keys keep a fixed
/// width of eight digits, which keeps lexicographic key order in the store
/// numeric (up to 99,999,999 items).
pub const ID_FLOOR: u32 = 10_000_000;

/// A single to-do entry
#[derive(Debug, Clone)]
pub struct TodoItem {
  pub id: u32,
  pub description: String,
}

impl TodoItem {
  pub fn new(description: impl Into<String>, id: u32) -> Self {
    Self {
      id,
      description: description.into(),
    }
  }
}

/// Items are the same entity iff their ids match; the description is
/// content, not identity.
impl PartialEq for TodoItem {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TodoItem {}

impl Hash for TodoItem {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

/// List rows display the description only
impl fmt::Display for TodoItem {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.description)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_equality_is_by_id_only() {
    let a = TodoItem::new("buy milk", 10_000_001);
    let b = TodoItem::new("walk the dog", 10_000_001);
    let c = TodoItem::new("buy milk", 10_000_002);

    assert_eq!(a, b);
    assert_ne!(a, c);
  }

  #[test]
  fn test_display_is_description() {
    let item = TodoItem::new("buy milk", 10_000_001);
    assert_eq!(item.to_string(), "buy milk");
  }

  #[test]
  fn test_hash_follows_id() {
    use std::collections::HashSet;

    let mut set = HashSet::new();
    set.insert(TodoItem::new("buy milk", 10_000_001));

    assert!(set.contains(&TodoItem::new("anything", 10_000_001)));
    assert!(!set.contains(&TodoItem::new("buy milk", 10_000_002)));
  }
}

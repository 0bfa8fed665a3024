//! The signed-in user's item cache.

use std::future::Future;

use color_eyre::Result;

use crate::store::client::StoreClient;
use crate::store::types::{TodoItem, ID_FLOOR};

/// Authoritative in-memory copy of the signed-in user's items, in insertion
/// order. Constructed on sign-in, dropped on sign-out.
///
/// Local mutations apply immediately; each one hands back a future that
/// mirrors the change to the remote store. The caller decides where that
/// future runs and what to do when it fails. Local state is never rolled
/// back on a failed mirror.
pub struct Session {
  user_id: String,
  store: StoreClient,
  items: Vec<TodoItem>,
}

impl Session {
  pub fn new(user_id: String, store: StoreClient) -> Self {
    Self {
      user_id,
      store,
      items: Vec::new(),
    }
  }

  pub fn user_id(&self) -> &str {
    &self.user_id
  }

  pub fn store(&self) -> &StoreClient {
    &self.store
  }

  /// Items in insertion order
  pub fn items(&self) -> &[TodoItem] {
    &self.items
  }

  /// Discard the current items and install the given ones wholesale.
  /// Called once per successful fetch.
  pub fn replace_items(&mut self, items: Vec<TodoItem>) {
    self.items = items;
  }

  /// Append an item and return the remote mirror of the write
  pub fn add_item(&mut self, item: TodoItem) -> impl Future<Output = Result<()>> + Send + 'static {
    self.items.push(item.clone());

    let store = self.store.clone();
    async move { store.put_item(&item).await }
  }

  /// Remove the first item with a matching id (a no-op when absent) and
  /// return the remote mirror of the delete. The remote delete is attempted
  /// either way; deleting a missing remote key succeeds.
  pub fn delete_item(
    &mut self,
    item: &TodoItem,
  ) -> impl Future<Output = Result<()>> + Send + 'static {
    if let Some(pos) = self.items.iter().position(|i| i == item) {
      self.items.remove(pos);
    }

    let store = self.store.clone();
    let id = item.id;
    async move { store.delete_item(id).await }
  }

  /// The largest id currently in the cache, clamped to the floor. Callers
  /// allocating a new item add 1.
  pub fn next_id(&self) -> u32 {
    self.items.iter().map(|i| i.id).fold(ID_FLOOR, u32::max)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::auth::AuthSession;
  use crate::config::StoreConfig;

  // Mirror futures are dropped unawaited throughout: the remote side of a
  // mutation never runs in these tests.

  fn test_session() -> Session {
    let store = StoreClient::new(
      &StoreConfig {
        url: "https://store.example.com/".to_string(),
      },
      &AuthSession {
        user_id: "u1".to_string(),
        id_token: "token".to_string(),
      },
    )
    .unwrap();

    Session::new("u1".to_string(), store)
  }

  fn descriptions(session: &Session) -> Vec<&str> {
    session.items().iter().map(|i| i.description.as_str()).collect()
  }

  #[test]
  fn test_next_id_on_empty_cache_is_floor() {
    assert_eq!(test_session().next_id(), ID_FLOOR);
  }

  #[test]
  fn test_next_id_never_drops_below_floor() {
    let mut session = test_session();
    drop(session.add_item(TodoItem::new("legacy", 7)));

    assert_eq!(session.next_id(), ID_FLOOR);
  }

  #[test]
  fn test_next_id_reports_current_max_not_max_plus_one() {
    let mut session = test_session();
    drop(session.add_item(TodoItem::new("a", ID_FLOOR + 1)));
    drop(session.add_item(TodoItem::new("b", ID_FLOOR + 5)));

    assert_eq!(session.next_id(), ID_FLOOR + 5);
  }

  #[test]
  fn test_add_appends_preserving_order() {
    let mut session = test_session();
    drop(session.add_item(TodoItem::new("a", ID_FLOOR + 1)));
    drop(session.add_item(TodoItem::new("b", ID_FLOOR + 2)));
    drop(session.add_item(TodoItem::new("c", ID_FLOOR + 3)));

    assert_eq!(descriptions(&session), ["a", "b", "c"]);
  }

  #[test]
  fn test_delete_removes_first_match_by_id() {
    let mut session = test_session();
    session.replace_items(vec![
      TodoItem::new("first", ID_FLOOR + 1),
      TodoItem::new("second", ID_FLOOR + 2),
      TodoItem::new("duplicate id", ID_FLOOR + 1),
    ]);

    drop(session.delete_item(&TodoItem::new("anything", ID_FLOOR + 1)));

    assert_eq!(descriptions(&session), ["second", "duplicate id"]);
  }

  #[test]
  fn test_double_delete_is_a_local_noop() {
    let mut session = test_session();
    session.replace_items(vec![TodoItem::new("only", ID_FLOOR + 1)]);

    let item = session.items()[0].clone();
    drop(session.delete_item(&item));
    drop(session.delete_item(&item));

    assert!(session.items().is_empty());
  }

  #[test]
  fn test_replace_discards_previous_items() {
    let mut session = test_session();
    drop(session.add_item(TodoItem::new("old", ID_FLOOR + 1)));
    drop(session.add_item(TodoItem::new("older", ID_FLOOR + 2)));

    session.replace_items(vec![TodoItem::new("new", ID_FLOOR + 9)]);

    assert_eq!(descriptions(&session), ["new"]);
    assert_eq!(session.items()[0].id, ID_FLOOR + 9);
  }

  #[test]
  fn test_add_then_delete_scenario() {
    let mut session = test_session();

    let a = TodoItem::new("a", session.next_id() + 1);
    assert_eq!(a.id, 10_000_001);
    drop(session.add_item(a.clone()));

    let b = TodoItem::new("b", session.next_id() + 1);
    assert_eq!(b.id, 10_000_002);
    drop(session.add_item(b));

    drop(session.delete_item(&a));

    let remaining: Vec<_> = session
      .items()
      .iter()
      .map(|i| (i.id, i.description.as_str()))
      .collect();
    assert_eq!(remaining, [(10_000_002, "b")]);
  }
}

use color_eyre::{eyre::eyre, Result};
use reqwest::StatusCode;
use url::Url;

use crate::auth::AuthSession;
use crate::config::StoreConfig;

use super::api_types::{ItemDocument, ListResponse};
use super::types::TodoItem;

/// Client for the keyed document store, scoped to one signed-in user.
/// Documents live under `accounts/{userId}/descriptions/{itemId}`.
#[derive(Clone)]
pub struct StoreClient {
  http: reqwest::Client,
  base: Url,
  user_id: String,
  token: String,
}

impl StoreClient {
  pub fn new(config: &StoreConfig, session: &AuthSession) -> Result<Self> {
    let mut base =
      Url::parse(&config.url).map_err(|e| eyre!("Invalid store URL {}: {}", config.url, e))?;

    // join() drops the last path segment unless the base ends with a slash
    if !base.path().ends_with('/') {
      base.set_path(&format!("{}/", base.path()));
    }

    Ok(Self {
      http: reqwest::Client::new(),
      base,
      user_id: session.user_id.clone(),
      token: session.id_token.clone(),
    })
  }

  /// Write or overwrite the document keyed by the item's id
  pub async fn put_item(&self, item: &TodoItem) -> Result<()> {
    let url = self.join(&document_path(&self.user_id, item.id))?;

    self
      .http
      .put(url)
      .bearer_auth(&self.token)
      .json(&ItemDocument::from_item(item))
      .send()
      .await
      .map_err(|e| eyre!("Failed to store item {}: {}", item.id, e))?
      .error_for_status()
      .map_err(|e| eyre!("Failed to store item {}: {}", item.id, e))?;

    Ok(())
  }

  /// Delete the document keyed by the given id. Deleting a key that does
  /// not exist is not an error.
  pub async fn delete_item(&self, id: u32) -> Result<()> {
    let url = self.join(&document_path(&self.user_id, id))?;

    let response = self
      .http
      .delete(url)
      .bearer_auth(&self.token)
      .send()
      .await
      .map_err(|e| eyre!("Failed to delete item {}: {}", id, e))?;

    if delete_status_ok(response.status()) {
      Ok(())
    } else {
      Err(eyre!("Failed to delete item {}: {}", id, response.status()))
    }
  }

  /// Fetch every item under the user's collection, in store order
  pub async fn fetch_all(&self) -> Result<Vec<TodoItem>> {
    let url = self.join(&collection_path(&self.user_id))?;

    let response = self
      .http
      .get(url)
      .bearer_auth(&self.token)
      .send()
      .await
      .map_err(|e| eyre!("Failed to fetch items: {}", e))?
      .error_for_status()
      .map_err(|e| eyre!("Failed to fetch items: {}", e))?;

    let list: ListResponse = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse item list: {}", e))?;

    Ok(list.documents.into_iter().map(ItemDocument::into_item).collect())
  }

  fn join(&self, path: &str) -> Result<Url> {
    self
      .base
      .join(path)
      .map_err(|e| eyre!("Invalid store path {}: {}", path, e))
  }
}

/// Collection holding all of one user's items
fn collection_path(user_id: &str) -> String {
  format!("accounts/{}/descriptions", user_id)
}

/// Document key for a single item
fn document_path(user_id: &str, id: u32) -> String {
  format!("accounts/{}/descriptions/{}", user_id, id)
}

/// A missing remote key is an acceptable outcome of a delete
fn delete_status_ok(status: StatusCode) -> bool {
  status.is_success() || status == StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
  use super::*;

  fn test_client(base: &str) -> StoreClient {
    StoreClient::new(
      &StoreConfig {
        url: base.to_string(),
      },
      &AuthSession {
        user_id: "u1".to_string(),
        id_token: "token".to_string(),
      },
    )
    .unwrap()
  }

  #[test]
  fn test_collection_path() {
    assert_eq!(collection_path("u1"), "accounts/u1/descriptions");
  }

  #[test]
  fn test_document_path() {
    assert_eq!(
      document_path("u1", 10_000_001),
      "accounts/u1/descriptions/10000001"
    );
  }

  #[test]
  fn test_delete_missing_key_is_ok() {
    assert!(delete_status_ok(StatusCode::OK));
    assert!(delete_status_ok(StatusCode::NO_CONTENT));
    assert!(delete_status_ok(StatusCode::NOT_FOUND));
    assert!(!delete_status_ok(StatusCode::FORBIDDEN));
  }

  #[test]
  fn test_document_urls_keep_the_base_path() {
    let client = test_client("https://store.example.com/api");
    let url = client.join(&document_path("u1", 10_000_001)).unwrap();

    assert_eq!(
      url.as_str(),
      "https://store.example.com/api/accounts/u1/descriptions/10000001"
    );
  }
}

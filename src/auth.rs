//! Identity provider client and sign-in state notifications.

use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use url::Url;

use crate::config::IdentityConfig;

/// An authenticated session: the provider's opaque user id plus the bearer
/// token the store accepts.
#[derive(Debug, Clone)]
pub struct AuthSession {
  pub user_id: String,
  pub id_token: String,
}

/// Current sign-in state as reported by the provider
#[derive(Debug, Clone, Default)]
pub enum AuthState {
  #[default]
  SignedOut,
  SignedIn(AuthSession),
}

impl AuthState {
  pub fn is_signed_in(&self) -> bool {
    matches!(self, AuthState::SignedIn(_))
  }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
  email: &'a str,
  password: &'a str,
  return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
  local_id: String,
  id_token: String,
}

/// Client for the hosted identity service
pub struct AuthClient {
  http: reqwest::Client,
  base: Url,
  api_key: String,
  state_tx: watch::Sender<AuthState>,
}

impl AuthClient {
  pub fn new(config: &IdentityConfig) -> Result<Self> {
    let mut base = Url::parse(&config.url)
      .map_err(|e| eyre!("Invalid identity URL {}: {}", config.url, e))?;

    // join() drops the last path segment unless the base ends with a slash
    if !base.path().ends_with('/') {
      base.set_path(&format!("{}/", base.path()));
    }

    let (state_tx, _) = watch::channel(AuthState::SignedOut);

    Ok(Self {
      http: reqwest::Client::new(),
      base,
      api_key: config.api_key.clone(),
      state_tx,
    })
  }

  /// Current state, without subscribing
  pub fn current_state(&self) -> AuthState {
    self.state_tx.borrow().clone()
  }

  /// Subscribe to sign-in state changes. The provider reports only the
  /// current state: changes that happen between polls are not replayed, a
  /// late poll observes the latest state only. Dropping the watcher
  /// unsubscribes.
  pub fn subscribe(&self) -> AuthWatcher {
    AuthWatcher {
      rx: self.state_tx.subscribe(),
    }
  }

  /// Exchange email/password credentials for a session. On success the new
  /// state is broadcast to subscribers.
  pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
    let mut url = self
      .base
      .join("v1/accounts:signInWithPassword")
      .map_err(|e| eyre!("Invalid identity URL: {}", e))?;
    url.query_pairs_mut().append_pair("key", &self.api_key);

    let response = self
      .http
      .post(url)
      .json(&SignInRequest {
        email,
        password,
        return_secure_token: true,
      })
      .send()
      .await
      .map_err(|e| eyre!("Sign-in request failed: {}", e))?;

    if !response.status().is_success() {
      return Err(eyre!("Sign-in rejected: {}", response.status()));
    }

    let body: SignInResponse = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse sign-in response: {}", e))?;

    let session = AuthSession {
      user_id: body.local_id,
      id_token: body.id_token,
    };
    self.set_state(AuthState::SignedIn(session.clone()));

    Ok(session)
  }

  /// Drop the current session and broadcast the signed-out state
  pub fn sign_out(&self) {
    self.set_state(AuthState::SignedOut);
  }

  fn set_state(&self, state: AuthState) {
    // send_replace updates the value even with no live subscribers
    self.state_tx.send_replace(state);
  }
}

/// A live subscription to sign-in state changes
pub struct AuthWatcher {
  rx: watch::Receiver<AuthState>,
}

impl AuthWatcher {
  /// Wait for the state to change from the last observed value, then return
  /// the latest state. Returns None once the provider is gone.
  pub async fn changed(&mut self) -> Option<AuthState> {
    match self.rx.changed().await {
      Ok(()) => Some(self.rx.borrow_and_update().clone()),
      Err(_) => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn test_client() -> AuthClient {
    AuthClient::new(&IdentityConfig {
      url: "https://identity.example.com/".to_string(),
      api_key: "test-key".to_string(),
      email: None,
    })
    .unwrap()
  }

  fn signed_in(user: &str) -> AuthState {
    AuthState::SignedIn(AuthSession {
      user_id: user.to_string(),
      id_token: "token".to_string(),
    })
  }

  #[tokio::test]
  async fn test_missed_states_are_not_replayed() {
    let client = test_client();
    let mut watcher = client.subscribe();

    // Both transitions land before the subscriber polls
    client.set_state(signed_in("u1"));
    client.set_state(AuthState::SignedOut);

    // Only the latest state is delivered; the intermediate sign-in is gone
    let state = watcher.changed().await.unwrap();
    assert!(!state.is_signed_in());
  }

  #[tokio::test]
  async fn test_sign_out_notifies_subscribers() {
    let client = test_client();
    client.set_state(signed_in("u1"));
    assert!(client.current_state().is_signed_in());

    let mut watcher = client.subscribe();
    client.sign_out();

    let state = watcher.changed().await.unwrap();
    assert!(!state.is_signed_in());
    assert!(!client.current_state().is_signed_in());
  }

  #[tokio::test]
  async fn test_watcher_ends_when_provider_drops() {
    let client = test_client();
    let mut watcher = client.subscribe();
    drop(client);

    assert!(watcher.changed().await.is_none());
  }
}

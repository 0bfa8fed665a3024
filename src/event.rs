use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::auth::AuthState;
use crate::store::types::TodoItem;

/// Identity-provider notifications delivered to the event loop
#[derive(Debug)]
pub enum AuthEvent {
  /// The provider reported a new current sign-in state
  StateChanged(AuthState),
  /// A sign-in attempt finished with an error
  SignInFailed(String),
}

/// Document-store completions delivered to the event loop
#[derive(Debug)]
pub enum StoreEvent {
  /// Full fetch finished successfully
  ItemsLoaded(Vec<TodoItem>),
  /// Full fetch failed; the cache keeps its previous contents
  FetchFailed(String),
  /// A remote write or delete failed after the local mutation was applied
  MirrorFailed { id: u32, message: String },
}

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh
  Tick,
  /// Identity provider notification
  Auth(AuthEvent),
  /// Document store completion
  Store(StoreEvent),
}

/// Event handler that produces events from terminal input and a tick timer.
/// Spawned tasks report their completions through `sender()` clones.
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn terminal event reader
    let input_tx = tx.clone();
    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          if let Ok(CrosstermEvent::Key(key)) = event::read() {
            if input_tx.send(Event::Key(key)).is_err() {
              break;
            }
          }
        } else {
          // Tick
          if input_tx.send(Event::Tick).is_err() {
            break;
          }
        }
      }
    });

    Self { tx, rx }
  }

  /// Sender for async tasks to report completions
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}

use crate::auth::{AuthClient, AuthState};
use crate::commands;
use crate::config::Config;
use crate::event::{AuthEvent, Event, EventHandler, StoreEvent};
use crate::session::Session;
use crate::store::client::StoreClient;
use crate::store::types::TodoItem;
use crate::ui;
use crate::ui::components::{InputResult, TextInput};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  /// Typing a new item
  Insert,
  Command,
}

/// Which login field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
  Email,
  Password,
}

/// State of the sign-in form
pub struct LoginForm {
  pub email: TextInput,
  pub password: TextInput,
  pub focus: LoginField,
  pub error: Option<String>,
  /// A sign-in request is in flight
  pub busy: bool,
}

impl LoginForm {
  fn new(email: Option<&str>, password: Option<&str>) -> Self {
    let focus = if email.is_some() {
      LoginField::Password
    } else {
      LoginField::Email
    };

    Self {
      email: email.map(TextInput::with_value).unwrap_or_default(),
      password: password.map(TextInput::with_value).unwrap_or_default(),
      focus,
      error: None,
      busy: false,
    }
  }
}

/// View state - each variant owns its presentation data; the items
/// themselves live in the Session
pub enum ViewState {
  Login { form: LoginForm },
  TodoList { selected: usize, loading: bool },
}

/// Main application state
pub struct App {
  /// Current view
  view: ViewState,

  /// Current input mode (list screen only)
  mode: Mode,

  /// New-item input buffer (insert mode)
  item_input: TextInput,

  /// Command input buffer (after pressing :)
  command_input: String,

  /// Selected autocomplete suggestion index
  selected_suggestion: usize,

  /// Application configuration
  config: Config,

  /// Identity provider client
  auth: Arc<AuthClient>,

  /// The signed-in user's item cache; None while signed out
  session: Option<Session>,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Transient message shown in the status bar until the next key press
  status: Option<String>,

  /// Whether to quit
  should_quit: bool,

  /// Sign-in was cancelled; exit with an error after teardown
  cancelled: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let auth = Arc::new(AuthClient::new(&config.identity)?);
    let (tx, _rx) = mpsc::unbounded_channel();

    // Start on the screen matching the current sign-in state
    let view = match auth.current_state() {
      AuthState::SignedIn(_) => ViewState::TodoList {
        selected: 0,
        loading: true,
      },
      AuthState::SignedOut => ViewState::Login {
        form: LoginForm::new(
          config.identity.email.as_deref(),
          Config::get_password().as_deref(),
        ),
      },
    };

    Ok(Self {
      view,
      mode: Mode::Normal,
      item_input: TextInput::new(),
      command_input: String::new(),
      selected_suggestion: 0,
      config,
      auth,
      session: None,
      event_tx: tx,
      status: None,
      should_quit: false,
      cancelled: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    // Watch sign-in state while the screen is up. The subscription is
    // dropped on teardown; state changes after that are not replayed.
    let mut watcher = self.auth.subscribe();
    let auth_tx = self.event_tx.clone();
    let watch_task = tokio::spawn(async move {
      while let Some(state) = watcher.changed().await {
        if auth_tx
          .send(Event::Auth(AuthEvent::StateChanged(state)))
          .is_err()
        {
          break;
        }
      }
    });

    // Main loop
    while !self.should_quit {
      // Draw UI
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Handle events
      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Unsubscribe from sign-in state changes
    watch_task.abort();

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    if self.cancelled {
      return Err(eyre!("sign-in cancelled"));
    }
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {} // UI refresh happens automatically
      Event::Auth(auth_event) => self.handle_auth_event(auth_event),
      Event::Store(store_event) => self.handle_store_event(store_event),
    }
  }

  fn handle_auth_event(&mut self, event: AuthEvent) {
    match event {
      AuthEvent::StateChanged(AuthState::SignedIn(auth_session)) => {
        info!(user = %auth_session.user_id, "signed in");
        self.status = Some("Signed in!".to_string());

        match StoreClient::new(&self.config.store, &auth_session) {
          Ok(store) => {
            self.session = Some(Session::new(auth_session.user_id, store));
            self.view = ViewState::TodoList {
              selected: 0,
              loading: true,
            };
            self.mode = Mode::Normal;
            self.load_items();
          }
          Err(e) => {
            error!("failed to set up store client: {e:#}");
            self.status = Some(format!("Store unavailable: {}", e));
          }
        }
      }
      AuthEvent::StateChanged(AuthState::SignedOut) => {
        info!("signed out");
        // Discard the cache outright; the next sign-in builds a fresh one
        self.session = None;
        if !matches!(self.view, ViewState::Login { .. }) {
          self.view = ViewState::Login {
            form: LoginForm::new(self.config.identity.email.as_deref(), None),
          };
          self.mode = Mode::Normal;
        }
      }
      AuthEvent::SignInFailed(message) => {
        warn!("sign-in failed: {message}");
        if let ViewState::Login { form } = &mut self.view {
          form.busy = false;
          form.error = Some(message);
        }
      }
    }
  }

  fn handle_store_event(&mut self, event: StoreEvent) {
    match event {
      StoreEvent::ItemsLoaded(items) => {
        info!(count = items.len(), "loaded items");
        let len = items.len();

        match &mut self.session {
          Some(session) => session.replace_items(items),
          // Signed out before the fetch finished; drop the stale result
          None => return,
        }

        if let ViewState::TodoList { selected, loading } = &mut self.view {
          *loading = false;
          if *selected >= len {
            *selected = len.saturating_sub(1);
          }
        }
      }
      StoreEvent::FetchFailed(message) => {
        // The previous items and render stay as they were
        error!("fetch failed: {message}");
        self.status = Some(format!("Failed to load items: {}", message));
        if let ViewState::TodoList { loading, .. } = &mut self.view {
          *loading = false;
        }
      }
      StoreEvent::MirrorFailed { id, message } => {
        self.status = Some(format!("Item {} not synced: {}", id, message));
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    self.status = None;

    if matches!(self.view, ViewState::Login { .. }) {
      self.handle_login_key(key);
      return;
    }

    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Insert => self.handle_insert_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
    }
  }

  fn handle_login_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.cancelled = true;
      self.should_quit = true;
      return;
    }

    let ViewState::Login { form } = &mut self.view else {
      return;
    };

    if form.busy {
      return; // ignore input while the request is in flight
    }

    match key.code {
      // Abandoning sign-in closes the app
      KeyCode::Esc => {
        self.cancelled = true;
        self.should_quit = true;
      }
      KeyCode::Tab | KeyCode::BackTab => {
        form.focus = match form.focus {
          LoginField::Email => LoginField::Password,
          LoginField::Password => LoginField::Email,
        };
      }
      KeyCode::Enter => {
        form.busy = true;
        form.error = None;
        let email = form.email.value().to_string();
        let password = form.password.value().to_string();
        self.submit_sign_in(email, password);
      }
      _ => {
        let input = match form.focus {
          LoginField::Email => &mut form.email,
          LoginField::Password => &mut form.password,
        };
        let _ = input.handle_key(key);
      }
    }
  }

  fn submit_sign_in(&mut self, email: String, password: String) {
    let auth = self.auth.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      // Success arrives through the state watcher
      if let Err(e) = auth.sign_in(&email, &password).await {
        let _ = tx.send(Event::Auth(AuthEvent::SignInFailed(e.to_string())));
      }
    });
  }

  fn handle_normal_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      // Quit
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Navigation
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),

      // Item operations
      KeyCode::Char('a') | KeyCode::Char('i') => {
        self.mode = Mode::Insert;
        self.item_input.clear();
      }
      KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
      KeyCode::Char('r') => self.load_items(),

      // Mode switches
      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }

      _ => {}
    }
  }

  fn handle_insert_mode_key(&mut self, key: KeyEvent) {
    match self.item_input.handle_key(key) {
      InputResult::Submitted(text) => {
        self.submit_new_item(text);
        self.item_input.clear();
        self.mode = Mode::Normal;
      }
      InputResult::Cancelled => {
        self.item_input.clear();
        self.mode = Mode::Normal;
      }
      InputResult::Consumed | InputResult::NotHandled => {}
    }
  }

  fn handle_command_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Enter => {
        self.mode = Mode::Normal;
        self.execute_command();
        self.selected_suggestion = 0;
      }
      KeyCode::Tab | KeyCode::Down => {
        // Navigate autocomplete suggestions
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        // Navigate autocomplete suggestions backwards
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            suggestions.len() - 1
          } else {
            self.selected_suggestion - 1
          };
        }
      }
      KeyCode::Backspace => {
        self.command_input.pop();
        self.selected_suggestion = 0; // Reset selection on input change
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
        self.selected_suggestion = 0; // Reset selection on input change
      }
      _ => {}
    }
  }

  fn execute_command(&mut self) {
    // Get the command to execute - either from selected suggestion or direct input
    let suggestions = commands::get_suggestions(&self.command_input);
    let cmd = if !suggestions.is_empty() && self.selected_suggestion < suggestions.len() {
      suggestions[self.selected_suggestion].name.to_string()
    } else {
      self.command_input.trim().to_lowercase()
    };
    self.command_input.clear();

    match cmd.as_str() {
      "add" => {
        self.mode = Mode::Insert;
        self.item_input.clear();
      }
      "refresh" => self.load_items(),
      "logout" => {
        // The state change flows back through the watcher
        self.auth.sign_out();
      }
      "quit" => self.should_quit = true,
      _ => {
        self.status = Some(format!("Unknown command: {}", cmd));
      }
    }
  }

  /// Fetch the full item collection; completion replaces the cache contents
  fn load_items(&mut self) {
    let Some(session) = &self.session else {
      return;
    };
    let store = session.store().clone();
    let tx = self.event_tx.clone();

    if let ViewState::TodoList { loading, .. } = &mut self.view {
      *loading = true;
    }

    tokio::spawn(async move {
      match store.fetch_all().await {
        Ok(items) => {
          let _ = tx.send(Event::Store(StoreEvent::ItemsLoaded(items)));
        }
        Err(e) => {
          let _ = tx.send(Event::Store(StoreEvent::FetchFailed(e.to_string())));
        }
      }
    });
  }

  fn submit_new_item(&mut self, text: String) {
    let (id, mirror) = {
      let Some(session) = &mut self.session else {
        return;
      };
      let item = TodoItem::new(text, session.next_id() + 1);
      let id = item.id;
      (id, session.add_item(item))
    };

    self.spawn_mirror(id, mirror);
  }

  fn delete_selected(&mut self) {
    let ViewState::TodoList { selected, .. } = &self.view else {
      return;
    };
    let selected = *selected;

    let (id, mirror, len) = {
      let Some(session) = &mut self.session else {
        return;
      };
      let Some(item) = session.items().get(selected).cloned() else {
        return;
      };
      let mirror = session.delete_item(&item);
      (item.id, mirror, session.items().len())
    };

    self.spawn_mirror(id, mirror);

    // Keep the selection on a valid row
    if let ViewState::TodoList { selected, .. } = &mut self.view {
      if *selected >= len {
        *selected = len.saturating_sub(1);
      }
    }
  }

  /// Run a remote mirror in the background, surfacing failures in the
  /// status bar and the log
  fn spawn_mirror(
    &self,
    id: u32,
    mirror: impl std::future::Future<Output = Result<()>> + Send + 'static,
  ) {
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      if let Err(e) = mirror.await {
        warn!(id, "remote mirror failed: {e:#}");
        let _ = tx.send(Event::Store(StoreEvent::MirrorFailed {
          id,
          message: e.to_string(),
        }));
      }
    });
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.items().len();
    if let ViewState::TodoList { selected, .. } = &mut self.view {
      if len > 0 {
        *selected = (*selected as i32 + delta).rem_euclid(len as i32) as usize;
      }
    }
  }

  // Accessors for UI rendering
  pub fn view(&self) -> &ViewState {
    &self.view
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn item_input(&self) -> &TextInput {
    &self.item_input
  }

  pub fn command_input(&self) -> &str {
    &self.command_input
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }

  pub fn status(&self) -> Option<&str> {
    self.status.as_deref()
  }

  /// Items of the signed-in session, empty while signed out
  pub fn items(&self) -> &[TodoItem] {
    self.session.as_ref().map(|s| s.items()).unwrap_or(&[])
  }

  /// The signed-in user's id, if any
  pub fn account(&self) -> Option<&str> {
    self.session.as_ref().map(|s| s.user_id())
  }

  pub fn store_url(&self) -> &str {
    &self.config.store.url
  }

  pub fn title(&self) -> Option<&str> {
    self.config.title.as_deref()
  }
}

//! Application state and main event loop for the TUI.
//!
//! Manages terminal setup/teardown, panic hooks, and the core render loop.
//! Uploads and authentication run as spawned tasks that report back over an
//! mpsc channel, so the render loop never blocks on the network.

use std::io::{self, stdout};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::layout::Rect;
use ratatui::prelude::{CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::api::auth::{password_from_env, AuthClient, AuthState, PASSWORD_ENV, REFRESH_INTERVAL};
use crate::api::{ApiError, GatewayClient};
use crate::config::schema::Config;
use crate::config::xdg;
use crate::layout::drag::{DragController, DragOutcome};
use crate::layout::store::{FileStore, LayoutStore};
use crate::layout::Layout;
use crate::tui::event::{handle_key_event, Action, Event, EventHandler};
use crate::tui::ui::render_dashboard;
use crate::widgets::{UploadStatus, WidgetRegistry};

/// How long transient footer messages stay visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Result of a background task, delivered to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// An upload task finished.
    UploadFinished(Result<String, ApiError>),
    /// The auth task changed state (login, refresh, failure).
    Auth(AuthState),
}

/// Core application state for the TUI.
pub struct App {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Loaded configuration.
    pub config: Config,
    /// Grid column count (at least 1).
    pub columns: u16,
    /// The widget catalog.
    pub registry: WidgetRegistry,
    /// Current widget order with normalized spans.
    pub layout: Layout,
    /// Whether edit mode (drag reordering) is active.
    pub edit_mode: bool,
    /// Drag gesture state machine.
    pub drag: DragController,
    /// Lifecycle of the most recent upload, rendered by the uploader tile.
    pub upload: UploadStatus,
    /// Authentication state shown in the header.
    pub auth: AuthState,
    /// Count of ticks processed, drives the uploader spinner.
    pub tick_count: u64,
    /// Temporary status message shown in footer, with expiry time.
    pub status_message: Option<(String, Instant)>,
    /// Tile rectangles from the last render pass, for mouse hit-testing.
    pub tile_rects: Vec<(String, Rect)>,
    /// Input buffer of the upload prompt; `None` while the prompt is closed.
    pub upload_prompt: Option<String>,
    store: LayoutStore<FileStore>,
    gateway: Arc<GatewayClient>,
    events_tx: mpsc::Sender<AppEvent>,
    events_rx: mpsc::Receiver<AppEvent>,
}

impl App {
    /// Creates the app from configuration: builds the registry, loads the
    /// persisted layout (falling back to the registry default), and wires
    /// the background-task channel.
    pub fn new(config: Config) -> Self {
        let columns = config.tui.columns.max(1);
        let registry = WidgetRegistry::new();
        let defaults = registry.default_layout(columns);
        let store = LayoutStore::new(FileStore::new(xdg::state_dir()));
        let layout = store.load(&defaults).unwrap_or(defaults);
        let gateway = Arc::new(GatewayClient::new(&config.api));
        let (events_tx, events_rx) = mpsc::channel(16);

        Self {
            should_quit: false,
            config,
            columns,
            registry,
            layout,
            edit_mode: false,
            drag: DragController::new(),
            upload: UploadStatus::Idle,
            auth: AuthState::Disabled,
            tick_count: 0,
            status_message: None,
            tile_rects: Vec::new(),
            upload_prompt: None,
            store,
            gateway,
            events_tx,
            events_rx,
        }
    }

    /// Shows a transient message in the footer.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now() + STATUS_MESSAGE_TTL));
    }

    /// Clears the status message if its expiry time has passed.
    pub fn expire_status_message(&mut self) {
        if let Some((_, expiry)) = &self.status_message {
            if Instant::now() >= *expiry {
                self.status_message = None;
            }
        }
    }

    /// The tile under the given terminal position, from the last render.
    fn tile_at(&self, column: u16, row: u16) -> Option<(&str, Rect)> {
        self.tile_rects
            .iter()
            .find(|(_, rect)| {
                column >= rect.x
                    && column < rect.x + rect.width
                    && row >= rect.y
                    && row < rect.y + rect.height
            })
            .map(|(id, rect)| (id.as_str(), *rect))
    }

    /// Toggles edit mode. Leaving edit mode abandons any gesture in flight.
    pub fn toggle_edit_mode(&mut self) {
        self.edit_mode = !self.edit_mode;
        if !self.edit_mode {
            self.drag.cancel();
        }
    }

    /// Restores the registry default order and persists it.
    pub fn reset_layout(&mut self) {
        self.layout = self.registry.default_layout(self.columns);
        self.store.save(&self.layout);
        self.set_status("Layout reset to default");
    }

    /// Routes a mouse event into the drag state machine.
    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((id, rect)) = self.tile_at(mouse.column, mouse.row) {
                    let id = id.to_string();
                    self.drag.press(
                        self.edit_mode,
                        &id,
                        (rect.width, rect.height),
                        (mouse.column, mouse.row),
                    );
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                let hover = self
                    .tile_at(mouse.column, mouse.row)
                    .map(|(id, _)| id.to_string());
                self.drag.motion((mouse.column, mouse.row), hover.as_deref());
            }
            MouseEventKind::Up(MouseButton::Left) => {
                match self.drag.release(&mut self.layout, self.columns) {
                    DragOutcome::Committed => {
                        self.store.save(&self.layout);
                        self.set_status("Layout saved");
                    }
                    DragOutcome::Rejected => {
                        self.set_status("Reorder would need more rows; kept current order");
                    }
                    DragOutcome::NoChange => {}
                }
            }
            _ => {}
        }
    }

    /// Applies a background-task result.
    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::UploadFinished(Ok(receipt)) => {
                self.upload = UploadStatus::Done(receipt);
            }
            AppEvent::UploadFinished(Err(e)) => {
                tracing::warn!("upload failed: {}", e);
                self.upload = UploadStatus::Failed(format!("Upload failed: {e}"));
            }
            AppEvent::Auth(state) => {
                if let AuthState::Failed { reason } = &state {
                    tracing::warn!("authentication failed: {}", reason);
                }
                self.auth = state;
            }
        }
    }

    /// Handles a key press while the upload prompt is open.
    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(input) = self.upload_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.upload_prompt = None;
            }
            KeyCode::Enter => {
                let path = input.trim().to_string();
                self.upload_prompt = None;
                if !path.is_empty() {
                    self.start_upload(path);
                }
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('v') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                match arboard::Clipboard::new().and_then(|mut c| c.get_text()) {
                    Ok(text) => input.push_str(text.trim()),
                    Err(e) => {
                        tracing::warn!("clipboard paste failed: {}", e);
                        self.set_status(format!("Paste failed: {e}"));
                    }
                }
            }
            KeyCode::Char(c) => {
                input.push(c);
            }
            _ => {}
        }
    }

    /// Kicks off an upload task for the given path.
    ///
    /// When auth is enabled but no session is live, the upload is refused
    /// locally instead of sending a request the gateway would reject.
    fn start_upload(&mut self, path: String) {
        let token = match (self.config.auth.enabled, self.auth.token()) {
            (true, None) => {
                self.upload = UploadStatus::Failed(format!(
                    "Upload failed: {}",
                    ApiError::AuthRequired
                ));
                return;
            }
            (_, token) => token.map(str::to_string),
        };

        let file_name = Path::new(&path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&path)
            .to_string();
        self.upload = UploadStatus::InFlight { file_name };

        let gateway = Arc::clone(&self.gateway);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = gateway.upload(Path::new(&path), token.as_deref()).await;
            let _ = tx.send(AppEvent::UploadFinished(result)).await;
        });
    }

    /// Runs the TUI application: sets up terminal, enters event loop, restores on exit.
    pub async fn run(&mut self) -> io::Result<()> {
        // Install panic hook that restores terminal before printing panic info
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        setup_terminal()?;

        let result = self.event_loop().await;

        restore_terminal()?;
        result
    }

    /// Main event loop: renders UI and processes events.
    async fn event_loop(&mut self) -> io::Result<()> {
        let backend = CrosstermBackend::new(stdout());
        let mut terminal =
            Terminal::new(backend).expect("failed to create ratatui terminal instance");
        let event_handler = EventHandler::new(self.config.tui.tick_rate_duration());
        let mut reader = EventStream::new();

        if self.config.auth.enabled {
            self.auth = AuthState::Pending;
            let auth_config = self.config.auth.clone();
            let tx = self.events_tx.clone();
            tokio::spawn(async move {
                run_auth(auth_config, tx).await;
            });
        }

        loop {
            // Drain background-task results before rendering
            while let Ok(event) = self.events_rx.try_recv() {
                self.apply_event(event);
            }

            terminal.draw(|frame| {
                render_dashboard(frame, self);
            })?;

            match event_handler.next(&mut reader).await? {
                Event::Key(key) => {
                    if self.upload_prompt.is_some() {
                        self.handle_prompt_key(key);
                    } else {
                        match handle_key_event(self.edit_mode, key) {
                            Action::Quit => self.should_quit = true,
                            Action::ToggleEditMode => self.toggle_edit_mode(),
                            Action::ResetLayout => self.reset_layout(),
                            Action::OpenUploadPrompt => {
                                self.upload_prompt = Some(String::new());
                            }
                            Action::CancelGesture => self.drag.cancel(),
                            Action::None => {}
                        }
                    }
                }
                Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                Event::Tick => {
                    self.tick_count += 1;
                    self.expire_status_message();
                }
                Event::Resize(_, _) => {}
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }
}

/// Background authentication task: password-grant login, then a refresh
/// loop that keeps the token fresh. State changes go back over `tx`.
async fn run_auth(config: crate::config::schema::AuthConfig, tx: mpsc::Sender<AppEvent>) {
    let Some(password) = password_from_env() else {
        let _ = tx
            .send(AppEvent::Auth(AuthState::Failed {
                reason: format!("{PASSWORD_ENV} is not set"),
            }))
            .await;
        return;
    };

    let username = config.username.clone();
    let client = AuthClient::new(config);
    let mut session = match client.login(&password).await {
        Ok(session) => session,
        Err(e) => {
            let _ = tx
                .send(AppEvent::Auth(AuthState::Failed {
                    reason: e.to_string(),
                }))
                .await;
            return;
        }
    };

    let user = match client.userinfo(&session.access_token).await {
        Ok(info) => info.display_name().to_string(),
        Err(e) => {
            tracing::debug!("userinfo fetch failed, using configured username: {}", e);
            username
        }
    };
    let _ = tx
        .send(AppEvent::Auth(AuthState::Authenticated {
            user: user.clone(),
            token: session.access_token.clone(),
        }))
        .await;

    let mut interval = tokio::time::interval(REFRESH_INTERVAL);
    interval.tick().await;
    loop {
        interval.tick().await;
        if !session.needs_refresh() {
            continue;
        }
        match client.refresh(&session.refresh_token).await {
            Ok(fresh) => {
                session = fresh;
                let _ = tx
                    .send(AppEvent::Auth(AuthState::Authenticated {
                        user: user.clone(),
                        token: session.access_token.clone(),
                    }))
                    .await;
            }
            Err(e) => {
                let _ = tx
                    .send(AppEvent::Auth(AuthState::Failed {
                        reason: e.to_string(),
                    }))
                    .await;
                return;
            }
        }
    }
}

/// Enables raw mode and switches to the alternate screen.
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

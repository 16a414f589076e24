use std::sync::Arc;
use std::time::Duration;

use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use folio_core::session::GREETING;
use folio_core::showcase::CASE_STUDIES;
use folio_core::{
    spawn_boot, BootEvent, BootHandle, BootScript, ChatSession, CompletionBackend, GeminiClient,
    PendingExchange, SendOutcome, Settled,
};

use crate::config::{Config, Theme};
use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Boot,
    Home,
    Skills,
    Projects,
    Contact,
}

impl Screen {
    pub const TABS: [Screen; 4] = [Screen::Home, Screen::Skills, Screen::Projects, Screen::Contact];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Boot => "BOOT",
            Screen::Home => "HOME",
            Screen::Skills => "STACK",
            Screen::Projects => "SYSTEMS",
            Screen::Contact => "CONTACT",
        }
    }

    pub fn tab_index(&self) -> Option<usize> {
        Self::TABS.iter().position(|s| s == self)
    }

    pub fn next(self) -> Self {
        match self.tab_index() {
            Some(i) => Self::TABS[(i + 1) % Self::TABS.len()],
            None => self,
        }
    }

    pub fn prev(self) -> Self {
        match self.tab_index() {
            Some(i) => Self::TABS[(i + Self::TABS.len() - 1) % Self::TABS.len()],
            None => self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub theme: Theme,

    // Boot screen state, discarded once the portfolio opens
    pub boot_progress: u8,
    pub boot_lines: Vec<String>,
    boot_handle: Option<BootHandle>,

    // Showcase state
    pub content_scroll: u16,
    pub project_state: ListState,

    // Chat panel state
    pub chat_open: bool,
    pub session: ChatSession,
    pub chat_input: String,
    pub chat_cursor: usize,
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,
    pub animation_frame: u8, // 0-2 for ellipsis animation

    backend: Arc<dyn CompletionBackend>,
    request_timeout: Duration,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(config: &Config, events: UnboundedSender<AppEvent>) -> Self {
        let mut client = GeminiClient::new(&config.model)
            .with_api_key(config.api_key.clone())
            .with_timeout(config.request_timeout());
        if let Some(base_url) = &config.base_url {
            client = client.with_base_url(base_url);
        }

        Self::with_backend(config, Arc::new(client), events)
    }

    pub fn with_backend(
        config: &Config,
        backend: Arc<dyn CompletionBackend>,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        let mut project_state = ListState::default();
        project_state.select(Some(0));

        Self {
            should_quit: false,
            screen: Screen::Home,
            input_mode: InputMode::Normal,
            theme: config.theme,

            boot_progress: 0,
            boot_lines: Vec::new(),
            boot_handle: None,

            content_scroll: 0,
            project_state,

            chat_open: false,
            session: ChatSession::new().with_greeting(GREETING),
            chat_input: String::new(),
            chat_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,

            backend,
            request_timeout: config.request_timeout(),
            events,
        }
    }

    /// Shows the boot screen and starts its timers.
    pub fn start_boot(&mut self) {
        let events = self.events.clone();
        self.screen = Screen::Boot;
        self.boot_progress = 0;
        self.boot_lines.clear();
        self.boot_handle = Some(spawn_boot(BootScript::default(), move |event| {
            events.send(AppEvent::Boot(event)).is_ok()
        }));
    }

    pub fn apply_boot_event(&mut self, event: BootEvent) {
        if self.screen != Screen::Boot {
            return;
        }
        match event {
            BootEvent::Line(line) => self.boot_lines.push(line),
            BootEvent::Progress(progress) => self.boot_progress = progress,
            BootEvent::Ready => self.finish_boot(),
        }
    }

    /// Leaves the boot screen, cancelling its timers if they are still running.
    pub fn finish_boot(&mut self) {
        if let Some(handle) = self.boot_handle.take() {
            handle.cancel();
        }
        self.boot_lines.clear();
        self.boot_progress = 0;
        if self.screen == Screen::Boot {
            self.screen = Screen::Home;
            info!("boot sequence dismissed");
        }
    }

    pub fn is_booting(&self) -> bool {
        self.screen == Screen::Boot
    }

    pub fn open_chat(&mut self) {
        self.chat_open = true;
        self.input_mode = InputMode::Editing;
        self.scroll_chat_to_bottom();
    }

    pub fn close_chat(&mut self) {
        self.chat_open = false;
        self.input_mode = InputMode::Normal;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }

    pub fn select_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.screen = screen;
            self.content_scroll = 0;
        }
    }

    pub fn backend(&self) -> Arc<dyn CompletionBackend> {
        Arc::clone(&self.backend)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn events(&self) -> UnboundedSender<AppEvent> {
        self.events.clone()
    }

    /// Hands the typed input to the session. The input box is only cleared
    /// when the session accepts it.
    pub fn take_exchange(&mut self) -> Option<PendingExchange> {
        let exchange = self.session.begin_send(&self.chat_input).ok()?;
        self.chat_input.clear();
        self.chat_cursor = 0;
        self.scroll_chat_to_bottom();
        Some(exchange)
    }

    pub fn apply_reply(&mut self, settled: Settled) -> SendOutcome {
        let outcome = self.session.finish(settled);
        self.animation_frame = 0;
        self.scroll_chat_to_bottom();
        outcome
    }

    pub fn is_waiting(&self) -> bool {
        self.session.is_busy()
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn project_nav_down(&mut self) {
        let i = self.project_state.selected().map_or(0, |i| (i + 1).min(CASE_STUDIES.len() - 1));
        self.project_state.select(Some(i));
    }

    pub fn project_nav_up(&mut self) {
        let i = self.project_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.project_state.select(Some(i));
    }

    pub fn chat_scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    pub fn chat_scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    /// Scroll chat to bottom so the newest message (or the pending indicator)
    /// is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 { self.chat_width as usize } else { 50 };

        let mut total_lines: u16 = 0;
        for msg in self.session.transcript().messages() {
            total_lines = total_lines.saturating_add(1); // Role label
            for line in msg.text.lines() {
                let char_count = line.chars().count();
                let wrapped = u16::try_from(char_count / wrap_width + 1).unwrap_or(u16::MAX);
                total_lines = total_lines.saturating_add(wrapped);
            }
            total_lines = total_lines.saturating_add(1); // Blank line after message
        }
        if self.session.is_busy() {
            total_lines = total_lines.saturating_add(2);
        }

        let visible_height = if self.chat_height > 0 { self.chat_height } else { 20 };
        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }
}

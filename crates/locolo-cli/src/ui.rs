//! TUI implementation for locolo

use crate::assistant::{Assistant, AssistantEvent, Request, spawn_request};
use crate::config::Config;
use crate::conversation::Conversation;
use crossterm::event::EventStream;
use futures::StreamExt;
use locolo_tui::{
    App, AppState, ChatActions, ChatMessagesProps, Theme,
    input::{Action, event_to_action},
    widgets::{ChatInput, ChatMessages, ChatMessagesState},
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

const MOUSE_SCROLL_LINES: usize = 3;

/// Requests raised by the chat panel's controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMessage {
    Reload,
    Stop,
}

/// Runs requests against the assistant on background tasks
pub struct Dispatcher {
    assistant: Arc<dyn Assistant>,
    events: mpsc::Sender<AssistantEvent>,
}

impl Dispatcher {
    pub fn new(assistant: Arc<dyn Assistant>, events: mpsc::Sender<AssistantEvent>) -> Self {
        Self { assistant, events }
    }

    fn dispatch(&self, request: Request) {
        spawn_request(self.assistant.clone(), request, self.events.clone());
    }
}

/// TUI application state
pub struct TuiState {
    conversation: Conversation,
    input: ChatInput,
    chat: ChatMessagesState,
    actions: ChatActions,
    dispatcher: Dispatcher,
    theme: Theme,
    title: String,
    assistant_name: String,
    suggestions: Vec<String>,
    show_timestamps: bool,
}

impl TuiState {
    pub fn new(
        conversation: Conversation,
        config: &Config,
        theme: Theme,
        dispatcher: Dispatcher,
        ui_tx: mpsc::Sender<UiMessage>,
    ) -> Self {
        let reload_tx = ui_tx.clone();
        let actions = ChatActions::new()
            .with_reload(move || {
                let _ = reload_tx.try_send(UiMessage::Reload);
            })
            .with_stop(move || {
                let _ = ui_tx.try_send(UiMessage::Stop);
            });

        Self {
            conversation,
            input: ChatInput::new().with_placeholder("Ask me about tonight..."),
            chat: ChatMessagesState::new(),
            actions,
            dispatcher,
            theme,
            title: format!(" {} ", config.assistant_name),
            assistant_name: config.assistant_name.clone(),
            suggestions: config.suggestions.clone(),
            show_timestamps: config.show_timestamps,
        }
    }

    fn props(&self) -> ChatMessagesProps<'_> {
        ChatMessagesProps::new(
            self.conversation.messages(),
            self.conversation.is_loading(),
            &self.actions,
        )
    }

    fn start(&mut self, request: Option<Request>) {
        if let Some(request) = request {
            self.chat.restart_spinner();
            self.dispatcher.dispatch(request);
        }
    }

    /// Handle a request raised through the panel's actions
    pub fn handle_ui_message(&mut self, msg: UiMessage) {
        debug!(?msg, "ui message");
        match msg {
            UiMessage::Reload => {
                let request = self.conversation.reload();
                self.start(request);
            }
            UiMessage::Stop => {
                self.conversation.stop();
            }
        }
    }

    pub fn handle_assistant_event(&mut self, event: AssistantEvent) {
        self.conversation.apply(event);
    }

    /// Handle keyboard action, return false to quit
    pub fn handle_action(&mut self, action: Action) -> bool {
        let gate = self.props().gate();

        match action {
            Action::Submit => {
                if !self.conversation.is_loading() && !self.input.is_empty() {
                    let text = self.input.take();
                    let request = self.conversation.submit(&text);
                    self.start(request);
                }
                true
            }
            Action::Reload => {
                if gate.show_reload {
                    self.actions.reload();
                }
                true
            }
            Action::Escape | Action::Interrupt => {
                if gate.show_stop {
                    self.actions.stop();
                    true
                } else {
                    false
                }
            }
            Action::Quit => false,
            Action::Clear => {
                if !self.conversation.is_loading() {
                    self.conversation.clear();
                }
                true
            }
            Action::PageUp => {
                self.chat.page_up();
                true
            }
            Action::PageDown => {
                self.chat.page_down();
                true
            }
            Action::ScrollUp => {
                self.chat.scroll_up(MOUSE_SCROLL_LINES);
                true
            }
            Action::ScrollDown => {
                self.chat.scroll_down(MOUSE_SCROLL_LINES);
                true
            }
            Action::ScrollTop => {
                self.chat.scroll_to_top();
                true
            }
            Action::ScrollBottom => {
                self.chat.scroll_to_bottom();
                true
            }
            other => {
                self.input.handle_action(&other);
                true
            }
        }
    }

    /// Stop outstanding work before exiting
    pub fn shutdown(&mut self) {
        self.conversation.stop();
        self.chat.unmount();
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let hints = if self.conversation.is_loading() {
            "Esc: stop │ PgUp/PgDn: scroll │ Ctrl+Q: quit"
        } else {
            "Enter: send │ Ctrl+R: regenerate │ Ctrl+L: clear │ Ctrl+Q: quit"
        };
        let count = format!("{} messages", self.conversation.messages().len());

        let available = area.width as usize;
        let line = if count.chars().count() + hints.chars().count() + 2 <= available {
            let spacing = available - count.chars().count() - hints.chars().count();
            Line::from(vec![
                Span::styled(count, self.theme.dim_style()),
                Span::raw(" ".repeat(spacing)),
                Span::styled(hints, self.theme.dim_style()),
            ])
        } else {
            Line::from(Span::styled(hints, self.theme.dim_style()))
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl AppState for TuiState {
    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Chat panel
                Constraint::Length(3), // Input
                Constraint::Length(1), // Status
            ])
            .split(frame.area());

        // Field-level borrows so the panel state can be borrowed mutably alongside
        let props = ChatMessagesProps::new(
            self.conversation.messages(),
            self.conversation.is_loading(),
            &self.actions,
        );
        let chat = ChatMessages::new(props, &self.theme)
            .title(&self.title)
            .assistant_name(&self.assistant_name)
            .suggestions(&self.suggestions)
            .show_timestamps(self.show_timestamps);
        frame.render_stateful_widget(chat, chunks[0], &mut self.chat);

        self.input.render(
            chunks[1],
            frame.buffer_mut(),
            &self.theme,
            !self.conversation.is_loading(),
        );
        self.render_status(frame, chunks[2]);
    }

    fn after_draw(&mut self) -> bool {
        self.chat.after_commit()
    }
}

/// Run the TUI until the user quits
pub async fn run_tui(
    conversation: Conversation,
    config: &Config,
    theme: Theme,
    assistant: Arc<dyn Assistant>,
) -> anyhow::Result<()> {
    let mut app = App::new()?.with_tick_rate(Duration::from_millis(config.tick_rate_ms.max(16)));

    let (ui_tx, mut ui_rx) = mpsc::channel::<UiMessage>(32);
    let (event_tx, mut event_rx) = mpsc::channel::<AssistantEvent>(256);

    let dispatcher = Dispatcher::new(assistant, event_tx);
    let mut state = TuiState::new(conversation, config, theme, dispatcher, ui_tx);

    let mut event_stream = EventStream::new();
    let mut tick_interval = tokio::time::interval(app.tick_rate());

    info!("tui started");
    let result = loop {
        app.draw(&mut state)?;

        tokio::select! {
            biased;

            // Assistant output first so streaming stays smooth
            Some(event) = event_rx.recv() => {
                state.handle_assistant_event(event);
            }

            Some(msg) = ui_rx.recv() => {
                state.handle_ui_message(msg);
            }

            event = event_stream.next() => {
                match event {
                    Some(Ok(evt)) => {
                        if let Some(action) = event_to_action(evt) {
                            if !state.handle_action(action) {
                                break Ok(());
                            }
                        }
                    }
                    Some(Err(e)) => {
                        break Err(anyhow::anyhow!("Event error: {}", e));
                    }
                    None => break Ok(()),
                }
            }

            // Tick for spinner animation
            _ = tick_interval.tick() => {}
        }
    };

    state.shutdown();
    info!("tui stopped");
    result
}

//! Rendering of the chat panel for the main conversation states

use locolo_tui::widgets::chat_actions::{RELOAD_LABEL, STOP_LABEL};
use locolo_tui::widgets::spinner::SPINNER_FRAMES;
use locolo_tui::widgets::{ChatMessages, ChatMessagesState};
use locolo_tui::{ChatActions, ChatMessage, ChatMessagesProps, Theme};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn both_actions() -> ChatActions {
    ChatActions::new().with_reload(|| {}).with_stop(|| {})
}

fn draw(
    terminal: &mut Terminal<TestBackend>,
    state: &mut ChatMessagesState,
    messages: &[ChatMessage],
    is_loading: bool,
    actions: &ChatActions,
) -> String {
    let theme = Theme::dark();
    let suggestions = vec!["Romantic Jazz Night".to_string()];
    terminal
        .draw(|frame| {
            let props = ChatMessagesProps::new(messages, is_loading, actions);
            let widget = ChatMessages::new(props, &theme).suggestions(&suggestions);
            frame.render_stateful_widget(widget, frame.area(), state);
        })
        .unwrap();
    state.after_commit();
    screen(terminal)
}

fn screen(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn has_spinner(text: &str) -> bool {
    SPINNER_FRAMES.iter().any(|f| text.contains(f))
}

fn terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(60, 20)).unwrap()
}

#[test]
fn empty_idle_shows_welcome_without_controls() {
    let mut terminal = terminal();
    let mut state = ChatMessagesState::new();
    let text = draw(&mut terminal, &mut state, &[], false, &both_actions());

    assert!(text.contains("Hi, I'm Locolo"));
    assert!(text.contains("Romantic Jazz Night"));
    assert!(!has_spinner(&text));
    assert!(!text.contains(RELOAD_LABEL));
    assert!(!text.contains(STOP_LABEL));
}

#[test]
fn user_message_while_loading_shows_pending_spinner() {
    let mut terminal = terminal();
    let mut state = ChatMessagesState::new();
    let messages = vec![ChatMessage::user("Where is the jazz?").with_id("1")];
    let text = draw(&mut terminal, &mut state, &messages, true, &both_actions());

    assert!(text.contains("Where is the jazz?"));
    assert!(has_spinner(&text));
    assert!(text.contains(STOP_LABEL));
    assert!(!text.contains(RELOAD_LABEL));
}

#[test]
fn streaming_assistant_row_is_replaced_by_spinner() {
    let mut terminal = terminal();
    let mut state = ChatMessagesState::new();
    let messages = vec![
        ChatMessage::user("Where is the jazz?").with_id("1"),
        ChatMessage::assistant("Try the partial reply").with_id("2"),
    ];
    let text = draw(&mut terminal, &mut state, &messages, true, &both_actions());

    assert!(text.contains("Where is the jazz?"));
    assert!(!text.contains("Try the partial reply"));
    assert!(has_spinner(&text));
    assert!(text.contains(STOP_LABEL));
}

#[test]
fn finished_reply_shows_rows_and_reload() {
    let mut terminal = terminal();
    let mut state = ChatMessagesState::new();
    let messages = vec![
        ChatMessage::user("Where is the jazz?").with_id("1"),
        ChatMessage::assistant("Blue Note, 9pm").with_id("2"),
    ];
    let text = draw(&mut terminal, &mut state, &messages, false, &both_actions());

    let question = text.find("Where is the jazz?").unwrap();
    let answer = text.find("Blue Note, 9pm").unwrap();
    assert!(question < answer);
    assert!(!has_spinner(&text));
    assert!(text.contains(RELOAD_LABEL));
    assert!(!text.contains(STOP_LABEL));
}

#[test]
fn missing_actions_hide_controls() {
    let mut terminal = terminal();
    let mut state = ChatMessagesState::new();
    let messages = vec![
        ChatMessage::user("hi").with_id("1"),
        ChatMessage::assistant("hello").with_id("2"),
    ];
    let none = ChatActions::new();

    let idle = draw(&mut terminal, &mut state, &messages, false, &none);
    assert!(!idle.contains(RELOAD_LABEL));

    let loading = draw(&mut terminal, &mut state, &messages, true, &none);
    assert!(!loading.contains(STOP_LABEL));
}

#[test]
fn newest_message_is_visible_after_commit() {
    let mut terminal = terminal();
    let mut state = ChatMessagesState::new();
    let mut messages: Vec<ChatMessage> = (0..15)
        .map(|i| ChatMessage::user(format!("question number {i}")))
        .collect();
    messages.push(ChatMessage::assistant("the very last answer"));

    draw(&mut terminal, &mut state, &messages, false, &both_actions());
    // the scroll is applied after the first commit, so the next frame shows it
    let text = draw(&mut terminal, &mut state, &messages, false, &both_actions());

    assert!(text.contains("the very last answer"));
    assert!(!text.contains("question number 0"));
}

#[test]
fn finished_reply_is_scrolled_into_view() {
    let mut terminal = terminal();
    let mut state = ChatMessagesState::new();
    let mut messages: Vec<ChatMessage> = (0..10)
        .map(|i| ChatMessage::user(format!("question number {i}")))
        .collect();
    let reply: Vec<String> = (0..20)
        .map(|i| format!("line{i}"))
        .chain(std::iter::once("FINAL_LINE".to_string()))
        .collect();
    messages.push(ChatMessage::assistant(reply.join("\n\n")));

    draw(&mut terminal, &mut state, &messages, true, &both_actions());
    let streaming = draw(&mut terminal, &mut state, &messages, true, &both_actions());
    assert!(has_spinner(&streaming));

    draw(&mut terminal, &mut state, &messages, false, &both_actions());
    let text = draw(&mut terminal, &mut state, &messages, false, &both_actions());

    assert!(text.contains("FINAL_LINE"));
    assert!(state.viewport().unwrap().is_at_bottom());
}

//! Frame layout.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ title bar                                    │
//! ├───────────┬──────────────────────────────────┤
//! │ sidebar   │ message list / landing page      │
//! │ (toggle)  │                                  │
//! │           ├──────────────────────────────────┤
//! │           │ composer                         │
//! ├───────────┴──────────────────────────────────┤
//! │ key hints                                    │
//! └──────────────────────────────────────────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{LandingPage, MessageList, Sidebar, TitleBar};
use crate::tui::{Focus, TuiState};

/// Narrowest chat column kept when the sidebar is shown.
const MIN_MAIN_WIDTH: u16 = 30;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let [title_area, body_area, footer_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(frame.area());

    let (sidebar_area, main_area) = split_body(body_area, tui);
    let loading = app.is_loading();

    // Composer props
    tui.composer.disabled = loading;
    tui.composer.focused = tui.focus == Focus::Composer;
    let composer_height = tui.composer.calculate_height(main_area.width);
    let [messages_area, composer_area] =
        Layout::vertical([Min(0), Length(composer_height)]).areas(main_area);

    if let Some(area) = sidebar_area {
        Sidebar {
            state: &tui.sidebar,
            current_session_id: app.current_session_id.as_deref(),
            focused: tui.focus == Focus::Sidebar,
        }
        .render(frame, area);
    }

    if app.transcript.is_empty() && !loading {
        LandingPage::default().render(frame, messages_area);
        tui.message_list.has_unseen_content = false;
    } else {
        MessageList::new(
            &mut tui.message_list,
            &app.transcript,
            loading,
            spinner_frame,
            tui.scroll_tolerance,
        )
        .render(frame, messages_area);
    }

    tui.composer.render(frame, composer_area);

    let mut title_bar = TitleBar::new(
        app.current_session_id.clone(),
        app.status_message.clone(),
        loading,
    );
    title_bar.spinner_frame = spinner_frame;
    title_bar.has_unseen_content = tui.message_list.has_unseen_content;
    title_bar.render(frame, title_area);

    frame.render_widget(
        Line::styled(footer_hints(tui.focus), Style::default().fg(Color::DarkGray)),
        footer_area,
    );
}

/// Split off the sidebar column when it is enabled and the terminal is wide
/// enough to keep a usable chat column.
fn split_body(body: Rect, tui: &TuiState) -> (Option<Rect>, Rect) {
    if !tui.show_sidebar || body.width < tui.sidebar_width + MIN_MAIN_WIDTH {
        return (None, body);
    }
    let [sidebar, main] =
        Layout::horizontal([Constraint::Length(tui.sidebar_width), Constraint::Min(0)])
            .areas(body);
    (Some(sidebar), main)
}

fn footer_hints(focus: Focus) -> &'static str {
    match focus {
        Focus::Composer => {
            " Enter send · Shift+Enter newline · Tab sidebar · Ctrl+N new · Ctrl+L clear · Ctrl+B toggle sidebar · Ctrl+C quit"
        }
        Focus::Sidebar => {
            " ↑↓ select · Enter open · n new · c clear · r refresh · Tab/Esc back · Ctrl+C quit"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{SessionSummary, SidebarData};
    use crate::core::message::Message;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(app: &App, tui: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn tui() -> TuiState {
        TuiState::new(true, 28, 5)
    }

    #[test]
    fn test_empty_app_shows_landing_and_sidebar() {
        let app = App::new();
        let text = rendered(&app, &mut tui());
        assert!(text.contains("Welcome to your Workspace"));
        assert!(text.contains("Library"));
        assert!(text.contains("No recent flows"));
        assert!(text.contains("new session"));
    }

    #[test]
    fn test_messages_replace_landing() {
        let mut app = App::new();
        app.transcript.push(Message::user("what is rust"));
        app.transcript.push(Message::assistant("a language"));
        let text = rendered(&app, &mut tui());
        assert!(!text.contains("Welcome to your Workspace"));
        assert!(text.contains("what is rust"));
        assert!(text.contains("a language"));
    }

    #[test]
    fn test_loading_disables_composer_and_shows_thinking() {
        let mut app = App::new();
        app.transcript.push(Message::user("hello"));
        app.requests.begin();
        let mut tui = tui();
        let text = rendered(&app, &mut tui);
        assert!(tui.composer.disabled);
        assert!(text.contains("Thinking..."));
        assert!(text.contains("Waiting for reply"));
    }

    #[test]
    fn test_hidden_sidebar() {
        let app = App::new();
        let mut tui = TuiState::new(false, 28, 5);
        let text = rendered(&app, &mut tui);
        assert!(!text.contains("Library"));
    }

    #[test]
    fn test_sidebar_marks_current_session() {
        let mut app = App::new();
        app.current_session_id = Some("s1".to_string());
        app.sidebar = SidebarData {
            recent: vec![SessionSummary {
                session_id: "s1".to_string(),
                title: "Trip ideas".to_string(),
            }],
            ..Default::default()
        };
        let mut tui = tui();
        tui.sidebar.sync(&app.sidebar);
        let text = rendered(&app, &mut tui);
        assert!(text.contains("● Trip ideas"));
        assert!(text.contains("session s1"));
    }

    #[test]
    fn test_narrow_terminal_drops_sidebar() {
        let tui = tui();
        let (sidebar, main) = split_body(Rect::new(0, 0, 40, 10), &tui);
        assert!(sidebar.is_none());
        assert_eq!(main.width, 40);

        let (sidebar, main) = split_body(Rect::new(0, 0, 100, 10), &tui);
        assert_eq!(sidebar.map(|r| r.width), Some(28));
        assert_eq!(main.width, 72);
    }

    #[test]
    fn test_footer_hints_follow_focus() {
        assert!(footer_hints(Focus::Composer).contains("Enter send"));
        assert!(footer_hints(Focus::Sidebar).contains("Enter open"));
    }
}

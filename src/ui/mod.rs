pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(root[1]);

    let hints = match app.input_mode {
        InputMode::Table => "n: new  e: edit  d: delete  r: refresh  c: clear form  q: quit",
        InputMode::Form => "Enter: save  Tab: next field  Esc: back to table",
        InputMode::Modal => "Left/Right: choose  Enter: apply  Esc: cancel",
    };
    let p = Paragraph::new(format!(" {}", hints)).block(
        Block::default()
            .title("user-admin-tui")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(
        Style::default()
            .fg(app.theme.header_fg)
            .bg(app.theme.header_bg),
    );
    f.render_widget(p, root[0]);

    users::render_users_table(f, body[0], app);
    users::render_user_form(f, body[1], app);

    components::render_notice_line(f, root[2], app);
    components::render_status_bar(f, root[3], app);

    if let Some(ModalState::DeleteConfirm { .. }) = app.modal {
        users::render_delete_modal(f, f.area(), app);
    }
}

//! Shared UI components (status bar, notice line, modal helpers).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, InputMode, NoticeKind};

/// Render the transient notification line. Empty when no notice is visible;
/// expiry is handled by the event-loop tick, not here.
pub fn render_notice_line(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(notice) = &app.notice else {
        return;
    };
    let color = match notice.kind {
        NoticeKind::Success => app.theme.success,
        NoticeKind::Error => app.theme.error,
    };
    let p = Paragraph::new(format!(" {}", notice.text))
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    f.render_widget(p, area);
}

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Table => "TABLE",
        InputMode::Form => "FORM",
        InputMode::Modal => "CONFIRM",
    };
    let msg = format!(
        "mode: {mode}  users:{}  rows/page:{}  endpoint:{}",
        app.users.len(),
        app.rows_per_page,
        app.api_url
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Center a fixed-size rect inside `area`, clamped to its bounds.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

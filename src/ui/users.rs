use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use crate::app::{AppState, FormField, InputMode, LoadState, ModalState};
use crate::format::display_timestamp;

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    // Placeholder body for anything other than a non-empty loaded list.
    let placeholder = match app.load {
        LoadState::Loading => Some("Loading…"),
        LoadState::Failed => Some("Failed to load users"),
        LoadState::Loaded if app.users.is_empty() => Some("No users yet"),
        LoadState::Loaded => None,
    };
    if let Some(text) = placeholder {
        let p = Paragraph::new(format!("\n{}", text))
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.text))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.users.len());
    let slice = &app.users[start..end];

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(display_timestamp(u.created_at.as_deref())),
            Cell::from(display_timestamp(u.updated_at.as_deref())),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(25),
        Constraint::Percentage(35),
        Constraint::Length(22),
        Constraint::Length(22),
    ];

    let header = Row::new(vec!["ID", "NAME", "EMAIL", "CREATED", "UPDATED"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_user_form(f: &mut Frame, area: Rect, app: &AppState) {
    let active = app.input_mode == InputMode::Form;
    let title = match &app.form.id {
        Some(id) => format!("Edit user {}", id),
        None => "New user".to_string(),
    };

    let marker = |field: FormField| {
        if active && app.form.focus == Some(field) {
            "▶ "
        } else {
            "  "
        }
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        title,
        Style::default().fg(app.theme.title),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "{}Name:  {}",
        marker(FormField::Name),
        app.form.name
    )));
    if let Some(err) = &app.form.name_error {
        lines.push(Line::from(Span::styled(
            format!("        {}", err),
            Style::default().fg(app.theme.error),
        )));
    }
    lines.push(Line::from(format!(
        "{}Email: {}",
        marker(FormField::Email),
        app.form.email
    )));
    if let Some(err) = &app.form.email_error {
        lines.push(Line::from(Span::styled(
            format!("        {}", err),
            Style::default().fg(app.theme.error),
        )));
    }

    let p = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Form")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(ModalState::DeleteConfirm { selected }) = app.modal else {
        return;
    };
    let rect = crate::ui::components::centered_rect(50, 7, area);
    let (name, id) = match app.selected_user() {
        Some(u) => (u.name.clone(), u.id.to_string()),
        None => (String::new(), String::new()),
    };
    let yes = if selected == 0 { "[Yes]" } else { " Yes " };
    let no = if selected == 1 { "[No]" } else { " No  " };
    let body = format!("Delete user '{}' (id {})?\n\n  {}    {}", name, id, yes, no);
    let p = Paragraph::new(body).block(
        Block::default()
            .title("Confirm delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

//! Event loop and command handlers.
//!
//! The loop draws, polls for input and dispatches per input mode. All store
//! calls are synchronous and issued from the loop thread, so list replacements
//! are applied strictly in the order the user triggered them.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::{Duration, Instant};

use crate::api::{ApiClient, UserDraft, UserStore};
use crate::app::keymap::KeyAction;
use crate::app::{
    AppState, Config, FormField, InputMode, LoadState, ModalState, NOTICE_TTL, Notice, NoticeKind,
};
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    cfg: &Config,
) -> Result<()> {
    let store = ApiClient::new(&cfg.api_url);
    let mut app = AppState::new(cfg);
    refresh_users(&mut app, &store);

    loop {
        app.tick();
        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Table => {
                            if !handle_table_key(&mut app, &store, &key) {
                                break;
                            }
                        }
                        InputMode::Form => handle_form_key(&mut app, &store, &key),
                        InputMode::Modal => handle_modal_key(&mut app, &store, key.code),
                    }
                }
            }
        }
    }

    Ok(())
}

/// Handle a key while the table owns input. Returns `false` to quit.
pub fn handle_table_key(app: &mut AppState, store: &dyn UserStore, key: &KeyEvent) -> bool {
    match app.keymap.resolve(key) {
        Some(KeyAction::Quit) => return false,
        Some(KeyAction::Refresh) => refresh_users(app, store),
        Some(KeyAction::NewUser) => open_blank_form(app),
        Some(KeyAction::EditSelection) => prefill_edit(app),
        Some(KeyAction::DeleteSelection) => request_delete(app),
        Some(KeyAction::ResetForm) => reset_form(app),
        Some(KeyAction::MoveUp) => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
            }
        }
        Some(KeyAction::MoveDown) => {
            if app.selected_index + 1 < app.users.len() {
                app.selected_index += 1;
            }
        }
        Some(KeyAction::PageUp) => {
            let rpp = app.rows_per_page.max(1);
            app.selected_index = app.selected_index.saturating_sub(rpp);
        }
        Some(KeyAction::PageDown) => {
            let rpp = app.rows_per_page.max(1);
            let new_idx = app.selected_index.saturating_add(rpp);
            app.selected_index = new_idx.min(app.users.len().saturating_sub(1));
        }
        Some(KeyAction::Ignore) | None => {}
    }
    true
}

/// Handle a key while the form owns input.
pub fn handle_form_key(app: &mut AppState, store: &dyn UserStore, key: &KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.form.focus = None;
            app.input_mode = InputMode::Table;
        }
        KeyCode::Enter => submit_form(app, store),
        KeyCode::Tab | KeyCode::Down => {
            app.form.focus = Some(FormField::Email);
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form.focus = Some(FormField::Name);
        }
        KeyCode::Backspace => {
            focused_field_mut(app).pop();
        }
        KeyCode::Char(c) => {
            focused_field_mut(app).push(c);
        }
        _ => {}
    }
}

fn focused_field_mut(app: &mut AppState) -> &mut String {
    match app.form.focus.unwrap_or(FormField::Name) {
        FormField::Name => &mut app.form.name,
        FormField::Email => &mut app.form.email,
    }
}

/// Handle a key while the delete confirmation dialog is open.
pub fn handle_modal_key(app: &mut AppState, store: &dyn UserStore, code: KeyCode) {
    let Some(ModalState::DeleteConfirm { selected }) = &mut app.modal else {
        app.input_mode = InputMode::Table;
        return;
    };
    match code {
        KeyCode::Esc => close_modal(app),
        KeyCode::Left | KeyCode::Right => {
            *selected = if *selected == 0 { 1 } else { 0 };
        }
        KeyCode::Enter => {
            let confirmed = *selected == 0;
            close_modal(app);
            if confirmed {
                delete_selected(app, store);
            }
        }
        _ => {}
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Table;
}

/// Show a transient notification with the default dismissal delay.
pub fn show_notice(app: &mut AppState, kind: NoticeKind, text: impl Into<String>) {
    show_notice_for(app, kind, text, NOTICE_TTL);
}

/// Show a transient notification. Replaces any visible notice and restarts
/// the dismissal deadline, so at most one dismissal is ever pending.
pub fn show_notice_for(
    app: &mut AppState,
    kind: NoticeKind,
    text: impl Into<String>,
    ttl: Duration,
) {
    app.notice = Some(Notice {
        kind,
        text: text.into(),
        deadline: Instant::now() + ttl,
    });
}

/// Fetch the full collection and replace the rendered list. Safe to call
/// after every mutation; the table content is never patched incrementally.
pub fn refresh_users(app: &mut AppState, store: &dyn UserStore) {
    app.load = LoadState::Loading;
    match store.list() {
        Ok(users) => {
            tracing::debug!(count = users.len(), "user list replaced");
            app.users = users;
            app.load = LoadState::Loaded;
            app.clamp_selection();
        }
        Err(e) => {
            tracing::warn!(error = %e, "user list fetch failed");
            app.load = LoadState::Failed;
            show_notice(app, NoticeKind::Error, "Failed to load users");
        }
    }
}

/// Validate and submit the form. Update mode is selected by the identifier
/// being populated. Validation is sequential and short-circuits before any
/// network call: name first, then email.
pub fn submit_form(app: &mut AppState, store: &dyn UserStore) {
    app.form.name_error = None;
    app.form.email_error = None;

    let name = app.form.name.trim().to_string();
    if name.is_empty() {
        app.form.name_error = Some("Name is required".to_string());
        return;
    }
    let email = app.form.email.trim().to_string();
    if email.is_empty() {
        app.form.email_error = Some("Email is required".to_string());
        return;
    }

    let draft = UserDraft { name, email };
    let (result, verb) = match app.form.id.clone() {
        Some(id) => (store.update(&id, &draft), "updated"),
        None => (store.create(&draft), "created"),
    };

    match result {
        Ok(()) => {
            show_notice(
                app,
                NoticeKind::Success,
                format!("User {} successfully!", verb),
            );
            reset_form(app);
            app.input_mode = InputMode::Table;
            refresh_users(app, store);
        }
        Err(e) => {
            // Form is kept intact so the user can retry.
            let msg = e.to_string();
            let msg = if msg.trim().is_empty() {
                "Something went wrong".to_string()
            } else {
                msg
            };
            show_notice(app, NoticeKind::Error, msg);
        }
    }
}

/// Open the form empty for a new user and give it input focus.
pub fn open_blank_form(app: &mut AppState) {
    app.form.clear();
    app.form.focus = Some(FormField::Name);
    app.input_mode = InputMode::Form;
}

/// Populate the form from the selected row and give it input focus.
pub fn prefill_edit(app: &mut AppState) {
    let Some(user) = app.selected_user().cloned() else {
        return;
    };
    app.form.id = Some(user.id);
    app.form.name = user.name;
    app.form.email = user.email;
    app.form.name_error = None;
    app.form.email_error = None;
    app.form.focus = Some(FormField::Name);
    app.input_mode = InputMode::Form;
}

/// Clear all fields and inline errors. No network interaction.
pub fn reset_form(app: &mut AppState) {
    app.form.clear();
}

/// Open the delete confirmation dialog for the selected row, defaulting to No.
pub fn request_delete(app: &mut AppState) {
    if app.selected_user().is_some() {
        app.modal = Some(ModalState::DeleteConfirm { selected: 1 });
        app.input_mode = InputMode::Modal;
    }
}

/// Issue the DELETE for the selected row. Only reachable through the
/// confirmation dialog.
pub fn delete_selected(app: &mut AppState, store: &dyn UserStore) {
    let Some(id) = app.selected_user().map(|u| u.id.clone()) else {
        return;
    };
    match store.delete(&id) {
        Ok(()) => {
            show_notice(app, NoticeKind::Success, "User deleted");
            refresh_users(app, store);
        }
        Err(e) => {
            let msg = e.to_string();
            let msg = if msg.trim().is_empty() {
                "Delete failed".to_string()
            } else {
                msg
            };
            show_notice(app, NoticeKind::Error, msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{UserId, UserRecord};
    use crate::app::Theme;
    use crate::app::keymap::Keymap;
    use crate::error::simple_error;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockStore {
        calls: RefCell<Vec<String>>,
        users: Vec<UserRecord>,
        fail_list: bool,
        fail_mutation_with: Option<String>,
    }

    impl UserStore for MockStore {
        fn list(&self) -> crate::error::Result<Vec<UserRecord>> {
            self.calls.borrow_mut().push("list".to_string());
            if self.fail_list {
                return Err(simple_error("connection refused"));
            }
            Ok(self.users.clone())
        }

        fn create(&self, draft: &UserDraft) -> crate::error::Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("create {} {}", draft.name, draft.email));
            match &self.fail_mutation_with {
                Some(msg) => Err(simple_error(msg.clone())),
                None => Ok(()),
            }
        }

        fn update(&self, id: &UserId, draft: &UserDraft) -> crate::error::Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("update {} {} {}", id, draft.name, draft.email));
            match &self.fail_mutation_with {
                Some(msg) => Err(simple_error(msg.clone())),
                None => Ok(()),
            }
        }

        fn delete(&self, id: &UserId) -> crate::error::Result<()> {
            self.calls.borrow_mut().push(format!("delete {}", id));
            match &self.fail_mutation_with {
                Some(msg) => Err(simple_error(msg.clone())),
                None => Ok(()),
            }
        }
    }

    fn mk_user(id: i64, name: &str, email: &str) -> UserRecord {
        UserRecord {
            id: UserId::Num(id),
            name: name.to_string(),
            email: email.to_string(),
            created_at: Some("2025-07-05T11:30:00Z".to_string()),
            updated_at: None,
        }
    }

    fn mk_app() -> AppState {
        AppState {
            users: Vec::new(),
            load: LoadState::Loading,
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Table,
            form: Default::default(),
            notice: None,
            modal: None,
            theme: Theme::dark(),
            keymap: Keymap::default(),
            api_url: "http://localhost:8080/api/users".to_string(),
        }
    }

    #[test]
    fn empty_name_blocks_submit_before_any_network_call() {
        let store = MockStore::default();
        let mut app = mk_app();
        app.form.name = "   ".to_string();
        app.form.email = "a@x.com".to_string();

        submit_form(&mut app, &store);

        assert!(store.calls.borrow().is_empty());
        assert_eq!(app.form.name_error.as_deref(), Some("Name is required"));
        // email is never checked once name has failed
        assert_eq!(app.form.email_error, None);
    }

    #[test]
    fn empty_email_blocks_submit_after_name_passes() {
        let store = MockStore::default();
        let mut app = mk_app();
        app.form.name = "Bob".to_string();

        submit_form(&mut app, &store);

        assert!(store.calls.borrow().is_empty());
        assert_eq!(app.form.name_error, None);
        assert_eq!(app.form.email_error.as_deref(), Some("Email is required"));
    }

    #[test]
    fn create_submits_trimmed_draft_then_clears_and_refreshes() {
        let store = MockStore::default();
        let mut app = mk_app();
        app.input_mode = InputMode::Form;
        app.form.name = "  Bob ".to_string();
        app.form.email = " b@x.com ".to_string();

        submit_form(&mut app, &store);

        assert_eq!(
            *store.calls.borrow(),
            vec!["create Bob b@x.com".to_string(), "list".to_string()]
        );
        assert_eq!(app.form.id, None);
        assert!(app.form.name.is_empty());
        assert!(app.form.email.is_empty());
        assert_eq!(app.input_mode, InputMode::Table);
        let notice = app.notice.expect("success notice");
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.text, "User created successfully!");
    }

    #[test]
    fn populated_id_switches_submit_to_update() {
        let store = MockStore::default();
        let mut app = mk_app();
        app.form.id = Some(UserId::Num(7));
        app.form.name = "Bob".to_string();
        app.form.email = "b@x.com".to_string();

        submit_form(&mut app, &store);

        assert_eq!(
            *store.calls.borrow(),
            vec!["update 7 Bob b@x.com".to_string(), "list".to_string()]
        );
        assert_eq!(
            app.notice.unwrap().text,
            "User updated successfully!"
        );
    }

    #[test]
    fn failed_submit_keeps_form_and_shows_server_text() {
        let store = MockStore {
            fail_mutation_with: Some("email taken".to_string()),
            ..Default::default()
        };
        let mut app = mk_app();
        app.form.name = "Bob".to_string();
        app.form.email = "b@x.com".to_string();

        submit_form(&mut app, &store);

        assert_eq!(*store.calls.borrow(), vec!["create Bob b@x.com".to_string()]);
        assert_eq!(app.form.name, "Bob");
        assert_eq!(app.form.email, "b@x.com");
        let notice = app.notice.expect("error notice");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "email taken");
    }

    #[test]
    fn refresh_replaces_list_and_clamps_selection() {
        let store = MockStore {
            users: vec![mk_user(1, "Ann", "a@x.com")],
            ..Default::default()
        };
        let mut app = mk_app();
        app.selected_index = 5;

        refresh_users(&mut app, &store);

        assert_eq!(app.load, LoadState::Loaded);
        assert_eq!(app.users.len(), 1);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn refresh_failure_flags_load_state_and_notifies() {
        let store = MockStore {
            fail_list: true,
            ..Default::default()
        };
        let mut app = mk_app();

        refresh_users(&mut app, &store);

        assert_eq!(app.load, LoadState::Failed);
        let notice = app.notice.expect("load-error notice");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "Failed to load users");
    }

    #[test]
    fn delete_requires_confirmation() {
        let store = MockStore {
            users: vec![mk_user(1, "Ann", "a@x.com")],
            ..Default::default()
        };
        let mut app = mk_app();
        refresh_users(&mut app, &store);
        store.calls.borrow_mut().clear();

        request_delete(&mut app);
        assert_eq!(app.modal, Some(ModalState::DeleteConfirm { selected: 1 }));
        assert_eq!(app.input_mode, InputMode::Modal);

        // declining performs no network call and no UI change
        handle_modal_key(&mut app, &store, KeyCode::Esc);
        assert!(store.calls.borrow().is_empty());
        assert_eq!(app.users.len(), 1);
        assert_eq!(app.modal, None);
        assert_eq!(app.input_mode, InputMode::Table);
    }

    #[test]
    fn enter_on_default_no_also_declines() {
        let store = MockStore {
            users: vec![mk_user(1, "Ann", "a@x.com")],
            ..Default::default()
        };
        let mut app = mk_app();
        refresh_users(&mut app, &store);
        store.calls.borrow_mut().clear();

        request_delete(&mut app);
        handle_modal_key(&mut app, &store, KeyCode::Enter);

        assert!(store.calls.borrow().is_empty());
        assert_eq!(app.modal, None);
    }

    #[test]
    fn confirmed_delete_issues_request_and_refreshes() {
        let store = MockStore {
            users: vec![mk_user(1, "Ann", "a@x.com")],
            ..Default::default()
        };
        let mut app = mk_app();
        refresh_users(&mut app, &store);
        store.calls.borrow_mut().clear();

        request_delete(&mut app);
        handle_modal_key(&mut app, &store, KeyCode::Left); // move to Yes
        handle_modal_key(&mut app, &store, KeyCode::Enter);

        assert_eq!(
            *store.calls.borrow(),
            vec!["delete 1".to_string(), "list".to_string()]
        );
        assert_eq!(app.notice.unwrap().text, "User deleted");
    }

    #[test]
    fn failed_delete_surfaces_server_text() {
        let store = MockStore {
            users: vec![mk_user(1, "Ann", "a@x.com")],
            fail_mutation_with: Some("locked".to_string()),
            ..Default::default()
        };
        let mut app = mk_app();
        refresh_users(&mut app, &store);

        request_delete(&mut app);
        handle_modal_key(&mut app, &store, KeyCode::Right); // No -> Yes
        handle_modal_key(&mut app, &store, KeyCode::Enter);

        let notice = app.notice.expect("error notice");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "locked");
    }

    #[test]
    fn prefill_edit_populates_form_and_moves_focus() {
        let store = MockStore {
            users: vec![mk_user(9, "Ann", "a@x.com")],
            ..Default::default()
        };
        let mut app = mk_app();
        refresh_users(&mut app, &store);

        prefill_edit(&mut app);

        assert_eq!(app.form.id, Some(UserId::Num(9)));
        assert_eq!(app.form.name, "Ann");
        assert_eq!(app.form.email, "a@x.com");
        assert_eq!(app.input_mode, InputMode::Form);
        assert_eq!(app.form.focus, Some(FormField::Name));
    }

    #[test]
    fn reset_clears_fields_and_errors_without_network() {
        let store = MockStore::default();
        let mut app = mk_app();
        app.form.id = Some(UserId::Num(3));
        app.form.name = "Ann".to_string();
        app.form.name_error = Some("Name is required".to_string());

        reset_form(&mut app);

        assert!(store.calls.borrow().is_empty());
        assert_eq!(app.form.id, None);
        assert!(app.form.name.is_empty());
        assert_eq!(app.form.name_error, None);
    }

    #[test]
    fn new_notice_replaces_old_and_resets_deadline() {
        let mut app = mk_app();
        show_notice_for(&mut app, NoticeKind::Error, "first", Duration::from_millis(1));
        let first_deadline = app.notice.as_ref().unwrap().deadline;

        show_notice(&mut app, NoticeKind::Success, "second");
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.text, "second");
        assert_eq!(notice.kind, NoticeKind::Success);
        assert!(notice.deadline > first_deadline);
    }

    #[test]
    fn notice_expires_on_tick() {
        let mut app = mk_app();
        show_notice(&mut app, NoticeKind::Success, "done");

        app.tick_at(Instant::now());
        assert!(app.notice.is_some());

        app.tick_at(Instant::now() + NOTICE_TTL + Duration::from_millis(1));
        assert!(app.notice.is_none());
    }

    #[test]
    fn typed_characters_go_to_the_focused_field() {
        let store = MockStore::default();
        let mut app = mk_app();
        open_blank_form(&mut app);

        for c in "Ann".chars() {
            handle_form_key(&mut app, &store, &KeyEvent::from(KeyCode::Char(c)));
        }
        handle_form_key(&mut app, &store, &KeyEvent::from(KeyCode::Tab));
        for c in "a@x".chars() {
            handle_form_key(&mut app, &store, &KeyEvent::from(KeyCode::Char(c)));
        }
        handle_form_key(&mut app, &store, &KeyEvent::from(KeyCode::Backspace));

        assert_eq!(app.form.name, "Ann");
        assert_eq!(app.form.email, "a@");
        assert!(store.calls.borrow().is_empty());
    }
}

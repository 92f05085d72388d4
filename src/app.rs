//! Keyboard-driven state around the task list controller.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::controller::{Clock, DraftField, SystemClock, TaskListController};
use crate::store::Store;
use crate::task::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form(DraftField),
    Table,
}

const FORM_ORDER: [DraftField; 3] = [DraftField::Name, DraftField::Description, DraftField::Status];

pub struct App<S: Store, C: Clock = SystemClock> {
    pub controller: TaskListController<S, C>,
    pub focus: Focus,
    pub selected: usize,
    pub should_quit: bool,
}

impl<S: Store, C: Clock> App<S, C> {
    pub fn new(controller: TaskListController<S, C>) -> Self {
        Self {
            controller,
            focus: Focus::Form(DraftField::Name),
            selected: 0,
            should_quit: false,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.controller.is_editing() {
            "Update"
        } else {
            "Add"
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.focus {
            Focus::Form(field) => self.handle_form_key(field, key),
            Focus::Table => self.handle_table_key(key),
        }
    }

    fn handle_form_key(&mut self, field: DraftField, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Table,
            KeyCode::Tab | KeyCode::Down => self.cycle_field(field, 1),
            KeyCode::BackTab | KeyCode::Up => self.cycle_field(field, -1),
            KeyCode::Enter => {
                if self.controller.submit() {
                    self.focus = Focus::Form(DraftField::Name);
                }
            }
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right
                if field == DraftField::Status =>
            {
                let next = self.controller.draft().status.toggled();
                self.controller.update_draft_field(DraftField::Status, next.as_str());
            }
            KeyCode::Char('j')
                if field == DraftField::Description
                    && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.edit_text(field, |s| s.push('\n'));
            }
            KeyCode::Char(c)
                if field != DraftField::Status
                    && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.edit_text(field, |s| s.push(c));
            }
            KeyCode::Backspace if field != DraftField::Status => {
                self.edit_text(field, |s| {
                    s.pop();
                });
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Tab => self.focus = Focus::Form(DraftField::Name),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.controller.tasks().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.controller.begin_edit(id);
                    self.focus = Focus::Form(DraftField::Name);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.controller.delete_task(id);
                    let len = self.controller.tasks().len();
                    if self.selected >= len {
                        self.selected = len.saturating_sub(1);
                    }
                }
            }
            KeyCode::Char('t') | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    self.controller.toggle_status(id);
                }
            }
            _ => {}
        }
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.controller.tasks().get(self.selected).map(|t| t.id)
    }

    fn cycle_field(&mut self, field: DraftField, step: isize) {
        let pos = FORM_ORDER.iter().position(|f| *f == field).unwrap_or(0) as isize;
        let len = FORM_ORDER.len() as isize;
        let next = (pos + step).rem_euclid(len) as usize;
        self.focus = Focus::Form(FORM_ORDER[next]);
    }

    fn edit_text(&mut self, field: DraftField, f: impl FnOnce(&mut String)) {
        let mut value = self.controller.draft().field(field).to_string();
        f(&mut value);
        self.controller.update_draft_field(field, &value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::EditMode;
    use crate::store::{MemoryStore, TASKS_KEY};
    use crate::task::TaskStatus;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App<MemoryStore, impl Clock>, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn app_with(json: &str) -> App<MemoryStore, impl Clock> {
        let store = MemoryStore::with_entry(TASKS_KEY, json);
        App::new(TaskListController::with_clock(store, || 1_000_i64))
    }

    #[test]
    fn test_type_and_submit() {
        let mut app = app_with("[]");
        type_str(&mut app, "Buy milk");
        app.handle_key(press(KeyCode::Tab));
        type_str(&mut app, "2 liters");
        assert_eq!(app.submit_label(), "Add");
        app.handle_key(press(KeyCode::Enter));

        let tasks = app.controller.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Buy milk");
        assert_eq!(tasks[0].description, "2 liters");
        assert_eq!(app.focus, Focus::Form(DraftField::Name));
    }

    #[test]
    fn test_backspace_and_status_cycle() {
        let mut app = app_with("[]");
        type_str(&mut app, "abc");
        app.handle_key(press(KeyCode::Backspace));
        assert_eq!(app.controller.draft().name, "ab");

        app.handle_key(press(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::Form(DraftField::Status));
        app.handle_key(press(KeyCode::Char(' ')));
        assert_eq!(app.controller.draft().status, TaskStatus::Done);
    }

    #[test]
    fn test_multiline_description() {
        let mut app = app_with("[]");
        app.handle_key(press(KeyCode::Tab));
        type_str(&mut app, "one");
        app.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL));
        type_str(&mut app, "two");
        assert_eq!(app.controller.draft().description, "one\ntwo");
    }

    #[test]
    fn test_control_chords_do_not_insert_text() {
        let mut app = app_with("[]");
        type_str(&mut app, "ab");
        app.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL));
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert_eq!(app.controller.draft().name, "ab");

        app.handle_key(press(KeyCode::Tab));
        app.handle_key(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL));
        assert_eq!(app.controller.draft().description, "");
    }

    #[test]
    fn test_table_actions() {
        let mut app = app_with(
            r#"[{"id":1,"name":"A","description":"d","status":"pending"},
                {"id":2,"name":"B","description":"e","status":"pending"}]"#,
        );
        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.focus, Focus::Table);

        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Char('t')));
        assert_eq!(app.controller.find(2).unwrap().status, TaskStatus::Done);

        app.handle_key(press(KeyCode::Char('d')));
        assert_eq!(app.controller.tasks().len(), 1);
        assert_eq!(app.selected, 0);

        app.handle_key(press(KeyCode::Char('e')));
        assert_eq!(app.controller.mode(), EditMode::Editing(1));
        assert_eq!(app.submit_label(), "Update");
        assert_eq!(app.focus, Focus::Form(DraftField::Name));
    }

    #[test]
    fn test_quit_only_from_table() {
        let mut app = app_with("[]");
        app.handle_key(press(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.controller.draft().name, "q");

        app.handle_key(press(KeyCode::Esc));
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_table_actions_on_empty_list() {
        let mut app = app_with("[]");
        app.handle_key(press(KeyCode::Esc));
        app.handle_key(press(KeyCode::Char('d')));
        app.handle_key(press(KeyCode::Char('e')));
        assert!(app.controller.tasks().is_empty());
        assert_eq!(app.controller.mode(), EditMode::Idle);
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::forms::{AuthMode, LoginForm, MeasurementForm, TrainingField, TrainingForm};
use crate::models::{MeasurementEntry, TrainingEntry};

/// Views reachable from the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Training,
    Measurements,
    Nutrition,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Training, Tab::Measurements, Tab::Nutrition];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Home",
            Tab::Training => "Train",
            Tab::Measurements => "Measure",
            Tab::Nutrition => "Nutrition",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Requests a view hands back to the shell loop, which runs them against the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SignIn { email: String, password: String },
    SignUp { email: String, password: String },
    SignOut,
    SaveLog(TrainingEntry),
    SaveMeasurement(MeasurementEntry),
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Message shown to the user; blocking notices hold input until dismissed
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub blocking: bool,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
            blocking: false,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            blocking: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            blocking: false,
        }
    }

    /// Alert that must be acknowledged before anything else
    pub fn alert(mut self) -> Self {
        self.blocking = true;
        self
    }
}

/// Navigation shell state: which view is visible and the form contents
#[derive(Debug, Default)]
pub struct App {
    pub should_quit: bool,
    pub active_tab: Tab,
    pub show_help: bool,
    pub login: LoginForm,
    pub training: TrainingForm,
    pub measurement: MeasurementForm,
    pub notice: Option<Notice>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Return to the initial view after the session goes away
    pub fn reset_after_sign_out(&mut self) {
        self.active_tab = Tab::Dashboard;
        self.training = TrainingForm::default();
        self.measurement = MeasurementForm::default();
        self.login.clear_password();
        self.show_help = false;
    }

    /// Handle one key press; `authenticated` selects the login view or the tabs
    pub fn handle_key(&mut self, key: KeyEvent, authenticated: bool) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        // Blocking alert takes precedence
        if self.notice.as_ref().is_some_and(|n| n.blocking) {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.notice = None;
            }
            return None;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return None;
        }

        if !authenticated {
            return self.handle_login_key(key);
        }

        match key.code {
            KeyCode::Tab => {
                self.active_tab = self.active_tab.next();
                return None;
            }
            KeyCode::BackTab => {
                self.active_tab = self.active_tab.prev();
                return None;
            }
            _ => {}
        }

        match self.active_tab {
            Tab::Dashboard | Tab::Nutrition => self.handle_navigation_key(key),
            Tab::Training => self.handle_training_key(key),
            Tab::Measurements => self.handle_measurement_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
            self.login.toggle_mode();
            return None;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.toggle_focus();
            }
            KeyCode::Backspace => self.login.pop(),
            KeyCode::Char(c) => self.login.push(c),
            KeyCode::Enter => match self.login.credentials() {
                Ok((email, password)) => {
                    self.notice = Some(Notice::info("Processing..."));
                    return Some(match self.login.mode {
                        AuthMode::SignIn => Action::SignIn { email, password },
                        AuthMode::SignUp => Action::SignUp { email, password },
                    });
                }
                Err(e) => self.notify(Notice::error(e.to_string())),
            },
            _ => {}
        }

        None
    }

    fn handle_navigation_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') | KeyCode::Char('R') => return Some(Action::Refresh),
            KeyCode::Char('o') | KeyCode::Char('O') => return Some(Action::SignOut),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.active_tab = Tab::ALL[idx];
            }
            KeyCode::Right => self.active_tab = self.active_tab.next(),
            KeyCode::Left => self.active_tab = self.active_tab.prev(),
            _ => {}
        }

        None
    }

    fn handle_training_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = &mut self.training;

        match key.code {
            KeyCode::Esc => self.active_tab = Tab::Dashboard,
            KeyCode::Down => form.focus_next(),
            KeyCode::Up => form.focus_prev(),
            KeyCode::Right if form.focus == TrainingField::Exercise => form.next_exercise(),
            KeyCode::Left if form.focus == TrainingField::Exercise => form.prev_exercise(),
            KeyCode::Backspace => form.pop(),
            KeyCode::Char(c) => form.push(c),
            KeyCode::Enter => match form.entry() {
                Ok(entry) => return Some(Action::SaveLog(entry)),
                Err(e) => self.notify(Notice::error(e.to_string())),
            },
            _ => {}
        }

        None
    }

    fn handle_measurement_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = &mut self.measurement;

        match key.code {
            KeyCode::Esc => self.active_tab = Tab::Dashboard,
            KeyCode::Up | KeyCode::Down => form.toggle_focus(),
            KeyCode::Backspace => form.pop(),
            KeyCode::Char(c) => form.push(c),
            KeyCode::Enter => match form.entry() {
                Ok(entry) => return Some(Action::SaveMeasurement(entry)),
                Err(e) => self.notify(Notice::error(e.to_string())),
            },
            _ => {}
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Exercise;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str, authenticated: bool) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)), authenticated);
        }
    }

    #[test]
    fn test_login_submit_produces_sign_in() {
        let mut app = App::new();
        type_text(&mut app, "ana@example.com", false);
        app.handle_key(press(KeyCode::Tab), false);
        type_text(&mut app, "pw", false);

        let action = app.handle_key(press(KeyCode::Enter), false);
        assert_eq!(
            action,
            Some(Action::SignIn {
                email: "ana@example.com".to_string(),
                password: "pw".to_string(),
            })
        );
    }

    #[test]
    fn test_login_mode_toggle() {
        let mut app = App::new();
        app.handle_key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL), false);
        type_text(&mut app, "a@b.c", false);
        app.handle_key(press(KeyCode::Down), false);
        type_text(&mut app, "pw", false);

        assert!(matches!(
            app.handle_key(press(KeyCode::Enter), false),
            Some(Action::SignUp { .. })
        ));
    }

    #[test]
    fn test_empty_training_form_is_rejected() {
        let mut app = App::new();
        app.active_tab = Tab::Training;

        assert_eq!(app.handle_key(press(KeyCode::Enter), true), None);
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[test]
    fn test_training_form_submit() {
        let mut app = App::new();
        app.active_tab = Tab::Training;

        app.handle_key(press(KeyCode::Right), true);
        app.handle_key(press(KeyCode::Right), true);
        app.handle_key(press(KeyCode::Down), true);
        type_text(&mut app, "80", true);
        app.handle_key(press(KeyCode::Down), true);
        type_text(&mut app, "5", true);

        let action = app.handle_key(press(KeyCode::Enter), true);
        assert_eq!(
            action,
            Some(Action::SaveLog(TrainingEntry::new(Exercise::PesoMuerto, 80.0, 5)))
        );
    }

    #[test]
    fn test_tab_navigation() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Tab), true);
        assert_eq!(app.active_tab, Tab::Training);
        app.handle_key(press(KeyCode::BackTab), true);
        app.handle_key(press(KeyCode::BackTab), true);
        assert_eq!(app.active_tab, Tab::Nutrition);
        app.handle_key(press(KeyCode::Char('2')), true);
        assert_eq!(app.active_tab, Tab::Training);

        // Digits are form input on the training tab
        app.handle_key(press(KeyCode::Char('1')), true);
        assert_eq!(app.active_tab, Tab::Training);
    }

    #[test]
    fn test_blocking_notice_swallows_keys() {
        let mut app = App::new();
        app.notify(Notice::error("Invalid login credentials").alert());

        assert_eq!(app.handle_key(press(KeyCode::Char('o')), true), None);
        assert!(app.notice.is_some());
        app.handle_key(press(KeyCode::Enter), true);
        assert!(app.notice.is_none());
        assert_eq!(app.handle_key(press(KeyCode::Char('o')), true), Some(Action::SignOut));
    }
}

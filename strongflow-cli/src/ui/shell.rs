use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

use super::app::{Action, App, Notice, Tab};
use super::widgets;
use crate::api::{Backend, SignUpOutcome};
use crate::session::{AppState, SessionController};
use crate::stats::DashboardSummary;

/// Full-screen navigation shell; owns the terminal and the session controller
pub struct Shell<B: Backend> {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    controller: SessionController<B>,
    tick_rate: Duration,
}

impl<B: Backend> Shell<B> {
    /// Set up the terminal around an already started controller
    pub fn new(controller: SessionController<B>, tick_rate: Duration) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        Ok(Self {
            terminal,
            app: App::new(),
            controller,
            tick_rate,
        })
    }

    /// Run the event loop until the user quits
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let was_authenticated = self.controller.state().auth.is_authenticated();
            self.controller.pump_events().await;
            if was_authenticated && !self.controller.state().auth.is_authenticated() {
                self.app.reset_after_sign_out();
            }

            if let Some(error) = self.controller.take_error() {
                self.app.notify(Notice::error(error));
            }

            let app = &self.app;
            let state = self.controller.state();
            let summary = self.controller.summary();
            self.terminal.draw(|f| ui(f, app, state, &summary))?;

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == event::KeyEventKind::Press {
                        let authenticated = self.controller.state().auth.is_authenticated();
                        if let Some(action) = self.app.handle_key(key, authenticated) {
                            self.dispatch(action).await;
                        }
                    }
                }
            }

            if self.app.should_quit {
                break;
            }
        }

        self.controller.shutdown();
        Ok(())
    }

    /// Run a view's request against the controller and report the outcome
    async fn dispatch(&mut self, action: Action) {
        tracing::debug!("Dispatching {:?}", std::mem::discriminant(&action));

        match action {
            Action::SignIn { email, password } => {
                match self.controller.sign_in(&email, &password).await {
                    Ok(()) => {
                        self.app.login.clear_password();
                        self.app.active_tab = Tab::Dashboard;
                        self.app.notice = None;
                    }
                    Err(e) => self.app.notify(Notice::error(e.to_string()).alert()),
                }
            }
            Action::SignUp { email, password } => {
                match self.controller.sign_up(&email, &password).await {
                    Ok(SignUpOutcome::SignedIn(_)) => {
                        self.app.login.clear_password();
                        self.app.active_tab = Tab::Dashboard;
                        self.app.notice = None;
                    }
                    Ok(SignUpOutcome::ConfirmationRequired { email }) => {
                        self.app.login.toggle_mode();
                        self.app.notify(
                            Notice::info(format!("Account created. Confirm {} and sign in.", email))
                                .alert(),
                        );
                    }
                    Err(e) => self.app.notify(Notice::error(e.to_string()).alert()),
                }
            }
            Action::SignOut => {
                self.controller.sign_out().await;
                self.app.reset_after_sign_out();
                self.app.notify(Notice::info("Signed out"));
            }
            Action::SaveLog(entry) => match self.controller.save_log(entry).await {
                Ok(_) => {
                    self.app.training.reset();
                    self.app.notify(Notice::success("Training saved ✨"));
                }
                Err(e) => self.app.notify(Notice::error(format!("Training not saved: {}", e))),
            },
            Action::SaveMeasurement(entry) => match self.controller.save_measurement(entry).await {
                Ok(_) => {
                    self.app.measurement.reset();
                    self.app.notify(Notice::success("Measurements updated 🍑"));
                }
                Err(e) => self.app.notify(Notice::error(format!("Measurement not saved: {}", e))),
            },
            Action::Refresh => {
                self.controller.refresh_all().await;
                if self.controller.state().last_error.is_none() {
                    self.app.notify(Notice::info("Data refreshed"));
                }
            }
        }
    }

    /// Cleanup terminal on exit
    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to restore terminal")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;

        Ok(())
    }
}

impl<B: Backend> Drop for Shell<B> {
    fn drop(&mut self) {
        self.controller.shutdown();
        let _ = self.cleanup();
    }
}

/// Render the login view or the tabbed views, depending on the session
fn ui(f: &mut Frame, app: &App, state: &AppState, summary: &DashboardSummary) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(size);

    let email = match state.auth.session() {
        None => {
            let login_area = centered_rect(60, 60, main_chunks[0]);
            widgets::render_login(login_area, f.buffer_mut(), &app.login);
            None
        }
        Some(session) => {
            let body = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(main_chunks[0]);

            widgets::render_tabs(body[0], f.buffer_mut(), app.active_tab);

            match app.active_tab {
                Tab::Dashboard => widgets::render_dashboard(body[1], f.buffer_mut(), summary),
                Tab::Training => {
                    widgets::render_training_form(body[1], f.buffer_mut(), &app.training)
                }
                Tab::Measurements => {
                    widgets::render_measurement_form(body[1], f.buffer_mut(), &app.measurement)
                }
                Tab::Nutrition => widgets::render_nutrition(body[1], f.buffer_mut()),
            }

            session.user.email.as_deref()
        }
    };

    widgets::render_status_bar(main_chunks[1], f.buffer_mut(), email, app.notice.as_ref());

    if let Some(notice) = app.notice.as_ref().filter(|n| n.blocking) {
        widgets::render_alert(centered_rect(50, 30, size), f.buffer_mut(), notice);
    } else if app.show_help {
        widgets::render_help_overlay(centered_rect(60, 80, size), f.buffer_mut());
    }
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

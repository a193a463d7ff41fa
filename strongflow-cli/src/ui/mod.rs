// Terminal UI module using ratatui

mod app;
mod forms;
mod shell;
mod widgets;

pub use app::{Action, App, Notice, NoticeKind, Tab};
pub use forms::{AuthMode, LoginForm, MeasurementForm, TextField, TrainingForm};
pub use shell::Shell;

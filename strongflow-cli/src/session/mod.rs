// Session controller and the fetch/save flow it drives

mod controller;
pub mod data;

pub use controller::{AppState, AuthState, SessionController};

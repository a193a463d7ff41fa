// Library exports for StrongFlow CLI
// This allows testing of internal modules

pub mod api;
pub mod commands;
pub mod config;
pub mod models;
pub mod session;
pub mod stats;
pub mod ui;

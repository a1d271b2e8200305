//! Little Explorers player crate.
//!
//! This crate contains the session controller, the reply resolver, the
//! platform adapters and the Dioxus UI shell.
//! Multi-platform support is provided via compile-time `cfg` selection.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod state;
pub mod ui;

// Re-export commonly used entrypoints
pub use application::{ReplyResolver, SessionController};
pub use config::{AppConfig, ShellKind};
pub use state::Platform;
pub use ui::app;

//! Shared types for the repl-diary watcher.

mod command;
mod config;
mod entry;
mod target;

pub use command::*;
pub use config::*;
pub use entry::*;
pub use target::*;

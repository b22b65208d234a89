//! Daemon glue for the repl-diary watcher.

pub mod logging;

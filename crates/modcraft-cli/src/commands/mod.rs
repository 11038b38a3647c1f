//! Subcommand implementations.  Each module exposes an `execute` function
//! that `main` dispatches to.

pub mod add;
pub mod completions;
pub mod config;
pub mod list;
pub mod new;

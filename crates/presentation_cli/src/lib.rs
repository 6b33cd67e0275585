//! ReviewDesk CLI library
//!
//! Argument parsing, service wiring and output rendering, split from the
//! binary so the command surface can be tested directly.

pub mod app;
pub mod cli;
pub mod output;

pub use app::{App, execute, load_config};
pub use cli::{Cli, Commands, log_filter_from_verbosity};

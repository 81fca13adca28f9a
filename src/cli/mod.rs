pub(crate) mod args;
pub mod commands;
pub mod core;
pub mod output;
mod shell;

pub use self::core::{CliError, CliMode, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV};

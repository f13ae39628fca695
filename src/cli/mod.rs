pub mod output;
pub mod script;
mod shell;
pub mod state;
pub mod ui;

pub use shell::{run_cli, CliMode, SCRIPT_ENV};

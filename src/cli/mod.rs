//! CLI module for querydeck
//!
//! Provides command-line interface for:
//! - serve: Start the HTTP server
//! - explain: Print the statement a query request would run

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, load_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_json};

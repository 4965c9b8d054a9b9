//! CLI argument definitions using clap
//!
//! Commands:
//! - querydeck serve [--config <path>] [--port <port>]
//! - querydeck explain

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// querydeck - structured, parameterized table queries over HTTP
#[derive(Parser, Debug)]
#[command(name = "querydeck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file (defaults are used when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port override
        #[arg(long)]
        port: Option<u16>,
    },

    /// Read one query request from stdin and print the generated statement
    Explain,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["querydeck", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert!(config.is_none());
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_explain() {
        let cli = Cli::try_parse_from(["querydeck", "explain"]).unwrap();
        assert!(matches!(cli.command, Command::Explain));
    }
}

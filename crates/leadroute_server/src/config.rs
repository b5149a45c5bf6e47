//! Process configuration from CLI flags with environment fallbacks.

use clap::Parser;
use leadroute_core::default_log_level;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime settings for the `leadroute` server.
#[derive(Debug, Clone, Parser)]
#[command(name = "leadroute", version, about = "Weighted lead-to-operator routing service")]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[arg(long, env = "LEADROUTE_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// SQLite database file; created and migrated on start.
    #[arg(long, env = "LEADROUTE_DB_PATH", default_value = "leadroute.sqlite3")]
    pub db_path: PathBuf,

    /// trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "LEADROUTE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files. Logs go to stderr when unset.
    #[arg(long, env = "LEADROUTE_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl ServerConfig {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or_else(|| default_log_level())
    }
}

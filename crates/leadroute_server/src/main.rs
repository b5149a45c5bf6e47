//! `leadroute` binary entry point.

use clap::Parser;
use leadroute_server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    leadroute_core::init_logging(config.log_level(), config.log_dir.as_deref())
        .map_err(anyhow::Error::msg)?;

    leadroute_server::serve(config).await
}

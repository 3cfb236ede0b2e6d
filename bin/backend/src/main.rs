//! School Directory Backend Binary
//!
//! Serves the school API on HOST:PORT (default 0.0.0.0:5000).
//! Options: --migrate, --memory; see `--help` for the rest.

use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let config = sch_core::Config::parse();
    sch_core::log("backend")?;
    sch_core::hook();
    sch_server::run(config).await
}

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use x402_dev_tools::server::{self, Interrupt, ServerConfig, TestServer};

#[derive(Debug, Parser)]
#[clap(
    name = "test-server",
    version,
    about = "Serve ./test-pages on port 9000 for manual extension testing"
)]
struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let _args = Args::parse();

    // Registered before the banner invites Ctrl+C.
    let interrupt = Interrupt::install()?;

    let server = TestServer::bind(ServerConfig::default()).await?;
    log::debug!("Serving files from {}", server.root().display());
    for line in server::banner_lines(server.local_addr().port()) {
        println!("{}", line.green());
    }

    // Connections are only accepted once serving starts; the listener is
    // closed by the time it returns.
    server.serve(interrupt.recv()).await?;

    println!("\n{}", "Shutting down server...".yellow());
    Ok(())
}

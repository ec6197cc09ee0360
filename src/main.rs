use anyhow::Result;
use citycare::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}

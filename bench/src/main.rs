use clap::Parser;
use color_eyre::eyre::Result;

mod commands;
mod paux;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let cli = commands::Cli::parse();
    cli.run().await?;

    Ok(())
}

use anyhow::{Context, Result};
use skycheck_cli::{App, StdConsole};
use skycheck_core::{AppError, Config};
use skycheck_locate::ResolverClient;

#[tokio::main]
async fn main() -> Result<()> {
    skycheck_core::init("warn")?;

    let (config, _) = Config::load_validated()?;
    let address = config.resolver.address.clone();

    let client = ResolverClient::connect(&address)
        .await
        .with_context(|| format!("Failed to connect to skycheck-resolver at {}", address))?;
    tracing::info!("Connected to resolver at {}", address);

    match App::new(config, client, StdConsole::new(true)).run().await {
        Ok(()) => Ok(()),
        Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            tracing::info!("Input closed, exiting");
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}

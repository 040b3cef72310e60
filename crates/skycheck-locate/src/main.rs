use anyhow::{Context, Result};
use skycheck_core::Config;
use skycheck_locate::{DatasetCache, ResolverServer};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    skycheck_core::init("info")?;

    let (config, _) = Config::load_validated()?;
    let resolver = &config.resolver;

    let cache = DatasetCache::new(&resolver.cache_path, &resolver.dataset_url)
        .context("Failed to create dataset cache")?;
    let mut server = ResolverServer::from_cache(cache).await;

    let listener = TcpListener::bind(&resolver.address)
        .await
        .with_context(|| format!("Failed to bind {}", resolver.address))?;
    tracing::info!("Resolver listening on {}", resolver.address);

    let (stream, peer) = listener.accept().await.context("Failed to accept requester")?;
    stream.set_nodelay(true)?;
    tracing::info!("Requester connected from {}", peer);

    server
        .serve(stream)
        .await
        .context("Resolver session failed")?;

    tracing::info!("Resolver terminated");
    Ok(())
}

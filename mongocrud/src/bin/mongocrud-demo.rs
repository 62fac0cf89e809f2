//! Runs the scripted CRUD demo against a local MongoDB, first blocking, then async.

use tracing_subscriber::EnvFilter;

use mongocrud::{
    config::CrudConfig,
    demo::{run_demo, run_demo_async},
    mongodb::{connect, connect_blocking},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CrudConfig::default();

    println!("\nSynchronous:");
    let store = connect_blocking(&config)?;
    run_demo(&store)?;
    store.shutdown()?;

    println!("\nAsynchronous:");
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let store = connect(&config).await?;
            run_demo_async(&store).await?;
            store.shutdown().await
        })?;

    Ok(())
}

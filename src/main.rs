mod args;
mod client;
mod correlator;
mod halo;
mod model;
mod normalizer;
mod scanner;
mod service;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use args::Args;
use clap::Parser;
use client::Client;
use service::Adapter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let client = Client::new(&args.client_config())?;
    let adapter = Arc::new(Adapter::new(client));

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, service::router(adapter)).await?;

    Ok(())
}

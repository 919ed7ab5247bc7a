use anyhow::{Context as _, Result};
use clap::Args;
use leadline_config::AppConfig;
use leadline_server::AppState;
use leadline_store::Store;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::runtime::Builder;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on; defaults to `server.bind` from the config.
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

pub fn serve(config: &AppConfig, store: Store, args: ServeArgs) -> Result<()> {
    let bind = args.bind.unwrap_or(config.server.bind);
    let state = AppState::new(store, config.server.api_key.as_str());

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "start async runtime")?;
    runtime.block_on(async move {
        let listener = TcpListener::bind(bind)
            .await
            .with_context(|| format!("bind {bind}"))?;
        eprintln!("listening on http://{}", listener.local_addr()?);
        leadline_server::serve(listener, state)
            .await
            .with_context(|| "serve lead endpoint")
    })
}

//! Serve command - run the dashboard until Ctrl-C

use crate::error::{ErrorKind, Result};
use clap::Args;
use exn::ResultExt;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use vidtrend_config::Config;
use vidtrend_dashboard::AppState;
use vidtrend_history::Repository;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on. Overrides `server.listen`.
    #[arg(long)]
    listen: Option<SocketAddr>,
}

pub async fn run(args: ServeArgs, config: &Config) -> Result<()> {
    let db = super::open_database(config).await?;
    let source = Arc::new(super::source(config)?);
    let region = config.server.region().or_raise(|| ErrorKind::Config)?;
    let category = config.server.category().or_raise(|| ErrorKind::Config)?;
    let state = AppState::new(Repository::from(&db), source, config.source.credential(), region, category)
        .or_raise(|| ErrorKind::Server)?;

    let listen = args.listen.unwrap_or(config.server.listen);
    info!(database = %config.database.display(), %region, %category, "starting dashboard");
    let served = vidtrend_dashboard::serve(listen, state).await.or_raise(|| ErrorKind::Server);
    db.close().await;
    served
}

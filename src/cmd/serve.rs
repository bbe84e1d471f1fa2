use clap::Args;
use tracing::info;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::server;

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on (overrides WOES_ADDR and the default).
    #[arg(short, long)]
    pub addr: Option<String>,
}

pub async fn run(ctx: AppContext, args: ServeArgs) -> AppResult<()> {
    let addr = args.addr.unwrap_or_else(|| ctx.config.listen_addr.clone());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "intake server listening");
    axum::serve(listener, server::router(ctx)).await?;
    Ok(())
}

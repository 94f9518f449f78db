use crate::commands::Context;
use crate::server::{self, AppState};
use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overrides the configured one
    #[arg(long)]
    pub bind: Option<String>,
}

pub fn serve(ctx: &Context<'_>, args: ServeArgs) -> Result<()> {
    let bind = args.bind.unwrap_or_else(|| ctx.config.server.bind.clone());
    let client = ctx.axiscare_client()?;
    info!(
        base_url = client.base_url(),
        log = %ctx.failure_log.path().display(),
        phone_match = ?ctx.config.axiscare.phone_match,
        "starting webhook server"
    );

    let state = AppState::new(
        Arc::new(client),
        ctx.failure_log.clone(),
        ctx.config.axiscare.phone_match,
    );
    server::run(state, &bind)
}

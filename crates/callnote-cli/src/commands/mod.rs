use anyhow::{Context as _, Result};
use callnote_config::AppConfig;
use callnote_store::FailureLog;
use callnote_sync::axiscare::AxisCareClient;
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;

pub mod completions;
pub mod logs;
pub mod process;
pub mod serve;

pub struct Context<'a> {
    pub config: &'a AppConfig,
    pub failure_log: &'a FailureLog,
    pub json: bool,
}

impl Context<'_> {
    pub fn axiscare_client(&self) -> Result<AxisCareClient> {
        let axiscare = &self.config.axiscare;
        AxisCareClient::new(
            axiscare.base_url(),
            axiscare.api_token.clone(),
            Duration::from_secs(axiscare.timeout_secs),
        )
        .with_context(|| "build axiscare client")
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct LogsReport {
    path: String,
    contents: Option<String>,
}

pub fn show_logs(ctx: &Context<'_>) -> Result<()> {
    let path = ctx.failure_log.path().display().to_string();
    if ctx.json {
        let contents = ctx
            .failure_log
            .read_all()
            .with_context(|| format!("read failure log {path}"))?;
        return print_json(&LogsReport { path, contents });
    }

    let text = ctx
        .failure_log
        .read_or_default()
        .with_context(|| format!("read failure log {path}"))?;
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}

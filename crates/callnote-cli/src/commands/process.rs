use crate::commands::{print_json, Context};
use crate::error::{invalid_input, rejected};
use anyhow::{Context as _, Result};
use callnote_core::{CallSummaryEvent, ProcessOutcome};
use callnote_sync::CallSummaryProcessor;
use clap::Args;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Event JSON file; reads stdin when omitted or `-`
    pub file: Option<PathBuf>,
}

pub fn process(ctx: &Context<'_>, args: ProcessArgs) -> Result<()> {
    let raw = read_input(args.file.as_ref())?;
    if raw.trim().is_empty() {
        return Err(invalid_input("event input is empty"));
    }
    let event: CallSummaryEvent =
        serde_json::from_str(&raw).with_context(|| "parse call summary event")?;

    let client = ctx.axiscare_client()?;
    let outcome = CallSummaryProcessor::new(&client, ctx.failure_log)
        .with_phone_match(ctx.config.axiscare.phone_match)
        .process(&event);

    if ctx.json {
        print_json(&outcome)?;
    }

    match outcome {
        ProcessOutcome::Success => {
            if !ctx.json {
                println!("Stored call summary {}", event.call_id);
            }
            Ok(())
        }
        ProcessOutcome::Failure { kind, detail } => Err(rejected(kind, detail)),
    }
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file.filter(|path| path.as_os_str() != "-") {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("read event file {}", path.display())),
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .with_context(|| "read event from stdin")?;
            Ok(raw)
        }
    }
}

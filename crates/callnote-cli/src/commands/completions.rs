use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io::{self, Write};

#[derive(Debug, clap::Args)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn emit(args: CompletionsArgs) -> Result<()> {
    let mut cmd = crate::Cli::command();
    let mut stdout = io::stdout().lock();
    clap_complete::generate(args.shell, &mut cmd, "callnote", &mut stdout);
    stdout.flush()?;
    Ok(())
}

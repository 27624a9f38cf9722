//! formstore shell
//!
//! Hosts one form loaded from JSON files and edits it line by line.
//!
//! ```text
//! formstore --values demos/sample-form/values.json --fields demos/sample-form/fields.json
//! formstore --fields fields.json -c 'set name Ada' -c submit
//! ```
//!
//! Log output goes to stderr and is controlled by `FORMSTORE_LOG`
//! (e.g. `FORMSTORE_LOG=formstore=debug`).

mod command;
mod repl;
mod session;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::command::Command;
use crate::session::{Reply, Session};

#[derive(Debug, Parser)]
#[command(name = "formstore", version, about = "Edit and validate a form from the terminal")]
struct Cli {
    /// JSON file with the initial record
    #[arg(long, value_name = "FILE")]
    values: Option<PathBuf>,

    /// JSON file with a list of field configs
    #[arg(long, value_name = "FILE")]
    fields: Option<PathBuf>,

    /// JSON file with form options
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Run these commands in order instead of starting the shell
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    commands: Vec<String>,

    /// History file for the interactive shell
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("FORMSTORE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut session = Session::load(cli.values.as_deref(), cli.fields.as_deref(), cli.options.as_deref())?;

    if cli.commands.is_empty() {
        return repl::run(&mut session, cli.history.as_deref());
    }

    for line in &cli.commands {
        let Some(command) = Command::parse(line)? else {
            continue;
        };
        match session.execute(command)? {
            Reply::Text(text) if !text.is_empty() => println!("{text}"),
            Reply::Text(_) => {}
            Reply::Quit => break,
        }
    }
    Ok(())
}

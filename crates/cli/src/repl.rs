//! Interactive line editor loop

use std::path::Path;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::command::Command;
use crate::session::{Reply, Session};

const PROMPT: &str = "formstore> ";

/// Read commands until `quit` or end of input
///
/// Command errors are printed and the loop continues.
pub fn run(session: &mut Session, history: Option<&Path>) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    if let Some(path) = history {
        if let Err(e) = editor.load_history(path) {
            tracing::debug!(target: "formstore::cli", error = %e, "No history loaded");
        }
    }

    println!("formstore shell, type 'help' for commands");
    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        let outcome = Command::parse(&line).and_then(|command| match command {
            Some(command) => session.execute(command),
            None => Ok(Reply::Text(String::new())),
        });
        match outcome {
            Ok(Reply::Text(text)) if !text.is_empty() => println!("{text}"),
            Ok(Reply::Text(_)) => {}
            Ok(Reply::Quit) => break,
            Err(e) => eprintln!("error: {e:#}"),
        }
    }

    if let Some(path) = history {
        if let Err(e) = editor.save_history(path) {
            tracing::warn!(target: "formstore::cli", error = %e, "Failed to save history");
        }
    }
    Ok(())
}

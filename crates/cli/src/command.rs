//! Command parsing for the shell
//!
//! Lines are split with shell quoting rules, so JSON arguments can be
//! passed in single quotes: `append hobbies '{"title": "chess"}'`.

use anyhow::{anyhow, bail, Context};
use formstore_core::{FieldPath, Value};
use formstore_form::FormError;

/// One parsed shell command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the value at a path, or the whole record
    Get(Option<FieldPath>),
    /// Write raw input at a path
    Set { path: FieldPath, raw: String },
    /// Append a JSON item to a list
    Append { path: FieldPath, item: Value },
    /// Remove an item from a list
    Remove { path: FieldPath, index: usize },
    /// Validate one field, or the whole form
    Validate(Option<FieldPath>),
    /// Print the error map
    Errors,
    /// Submit the form
    Submit,
    /// Restore the initial record
    Reset,
    /// Mark a field disabled
    Disable(FieldPath),
    /// Mark a field enabled
    Enable(FieldPath),
    /// Render every configured field
    Show,
    /// Print command help
    Help,
    /// Leave the shell
    Quit,
}

pub const HELP: &str = "\
Commands:
  get [PATH]             print the value at PATH (whole record if omitted)
  set PATH VALUE         write VALUE at PATH
  append PATH JSON       append an item to the list at PATH
  remove PATH INDEX      remove the item at INDEX from the list at PATH
  validate [PATH]        validate one field or the whole form
  errors                 print the error map
  submit                 validate and submit
  reset                  restore the initial values
  disable PATH           mark a field disabled
  enable PATH            mark a field enabled
  show                   render all configured fields
  help                   show this help
  quit                   leave the shell";

impl Command {
    /// Parse one input line; `Ok(None)` for a blank line
    pub fn parse(line: &str) -> anyhow::Result<Option<Command>> {
        let words = shlex::split(line).ok_or_else(|| anyhow!("unbalanced quotes"))?;
        let mut words = words.into_iter();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let mut args = Args {
            command: name.clone(),
            words,
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "get" => Command::Get(args.optional_path()?),
            "set" => Command::Set {
                path: args.path()?,
                raw: args.rest("VALUE")?,
            },
            "append" => {
                let path = args.path()?;
                let raw = args.rest("JSON")?;
                let item = serde_json::from_str(&raw).with_context(|| format!("invalid JSON item: {raw}"))?;
                Command::Append { path, item }
            }
            "remove" => {
                let path = args.path()?;
                let raw = args.required("INDEX")?;
                let index = raw.parse().with_context(|| format!("invalid index: {raw}"))?;
                Command::Remove { path, index }
            }
            "validate" => Command::Validate(args.optional_path()?),
            "errors" => Command::Errors,
            "submit" => Command::Submit,
            "reset" => Command::Reset,
            "disable" => Command::Disable(args.path()?),
            "enable" => Command::Enable(args.path()?),
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command '{other}', try 'help'"),
        };
        args.finish()?;
        Ok(Some(command))
    }
}

struct Args {
    command: String,
    words: std::vec::IntoIter<String>,
}

impl Args {
    fn required(&mut self, what: &str) -> anyhow::Result<String> {
        self.words
            .next()
            .ok_or_else(|| anyhow!("{}: missing {what}", self.command))
    }

    fn path(&mut self) -> anyhow::Result<FieldPath> {
        let raw = self.required("PATH")?;
        parse_path(&raw)
    }

    fn optional_path(&mut self) -> anyhow::Result<Option<FieldPath>> {
        self.words.next().map(|raw| parse_path(&raw)).transpose()
    }

    /// Remaining words joined by spaces, so unquoted text survives
    fn rest(&mut self, what: &str) -> anyhow::Result<String> {
        let words: Vec<String> = self.words.by_ref().collect();
        if words.is_empty() {
            bail!("{}: missing {what}", self.command);
        }
        Ok(words.join(" "))
    }

    fn finish(mut self) -> anyhow::Result<()> {
        match self.words.next() {
            Some(extra) => bail!("{}: unexpected argument '{extra}'", self.command),
            None => Ok(()),
        }
    }
}

fn parse_path(raw: &str) -> anyhow::Result<FieldPath> {
    raw.parse::<FieldPath>()
        .map_err(FormError::from)
        .with_context(|| format!("bad path '{raw}'"))
}

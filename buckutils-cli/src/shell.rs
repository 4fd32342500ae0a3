//! Interactive, line-oriented session.
//!
//! Every command maps onto one [`Session`] operation. Positions typed by the
//! user are 1-based. A failing command prints its error and the session
//! continues.

use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use buckutils::error::{BuckError, Result};
use buckutils::output::{self, OutputFormatter, ProgressBar};
use buckutils::preview::PreviewEvent;
use buckutils::utils::collect_paths_for_patterns;
use buckutils::{CatalogEntry, Session};

const PROMPT: &str = "buckutils> ";

const HELP: &[(&str, &str)] = &[
    ("add <file>...", "add PDF files (glob patterns allowed)"),
    ("remove <n>...", "remove the items at the given positions"),
    ("up <n>", "move an item one position up"),
    ("down <n>", "move an item one position down"),
    ("swap <n> <m>", "swap two items"),
    ("list", "show the current order"),
    ("preview [n]", "show page previews, all or one"),
    ("combine <file> [--force]", "write the list as one PDF"),
    ("rename <file> <name>", "rename a file in its directory"),
    ("clear", "empty the list"),
    ("help", "show this help"),
    ("quit", "leave the session"),
];

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(Vec<String>),
    Remove(Vec<usize>),
    Up(usize),
    Down(usize),
    Swap(usize, usize),
    List,
    Preview(Option<usize>),
    Combine { output: PathBuf, force: bool },
    Rename { source: PathBuf, new_name: String },
    Clear,
    Help,
    Quit,
}

/// Whether the session keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

impl ShellCommand {
    /// Parse one input line. Returns `Ok(None)` for a blank line.
    ///
    /// Positions in the result are 0-based.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let words = split_words(line)?;
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match name.to_lowercase().as_str() {
            "add" | "a" => {
                require_args(name, args, 1)?;
                Self::Add(args.to_vec())
            }
            "remove" | "rm" => {
                require_args(name, args, 1)?;
                Self::Remove(args.iter().map(|a| parse_position(a)).collect::<Result<_>>()?)
            }
            "up" => Self::Up(single_position(name, args)?),
            "down" => Self::Down(single_position(name, args)?),
            "swap" => {
                exact_args(name, args, 2)?;
                Self::Swap(parse_position(&args[0])?, parse_position(&args[1])?)
            }
            "list" | "ls" => Self::List,
            "preview" | "p" => match args {
                [] => Self::Preview(None),
                [position] => Self::Preview(Some(parse_position(position)?)),
                _ => return Err(usage(name)),
            },
            "combine" => {
                let force = args.iter().any(|a| a == "--force" || a == "-f");
                let rest: Vec<&String> = args
                    .iter()
                    .filter(|a| *a != "--force" && *a != "-f")
                    .collect();
                let [output] = rest.as_slice() else {
                    return Err(usage(name));
                };
                Self::Combine {
                    output: PathBuf::from(output.as_str()),
                    force,
                }
            }
            "rename" => {
                exact_args(name, args, 2)?;
                Self::Rename {
                    source: PathBuf::from(&args[0]),
                    new_name: args[1].clone(),
                }
            }
            "clear" => Self::Clear,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => {
                return Err(BuckError::invalid_config(format!(
                    "Unknown command '{other}'. Type 'help' for a list of commands"
                )));
            }
        };
        Ok(Some(command))
    }
}

/// The interactive front end over one session.
pub struct Shell<T: CatalogEntry> {
    session: Session<T>,
    formatter: OutputFormatter,
}

impl<T: CatalogEntry> Shell<T> {
    pub fn new(session: Session<T>, formatter: OutputFormatter) -> Self {
        Self { session, formatter }
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    /// Read commands from stdin until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        self.formatter.info("Type 'help' for a list of commands.");
        self.run_with(BufReader::new(tokio::io::stdin()), true).await
    }

    /// Read commands from `reader` until `quit` or end of input.
    pub async fn run_with<R>(&mut self, reader: R, prompt: bool) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        loop {
            if prompt {
                print!("{PROMPT}");
                std::io::stdout().flush().ok();
            }

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let command = match ShellCommand::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    self.formatter.error(&err.to_string());
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => self.formatter.error(&err.to_string()),
            }
        }
        Ok(())
    }

    /// Run one command against the session.
    pub async fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Add(patterns) => {
                for path in collect_paths_for_patterns(&patterns)? {
                    let added = self.session.add(&path)?;
                    self.formatter
                        .success(&format!("Added {} ({added} item(s))", path.display()));
                }
            }
            ShellCommand::Remove(positions) => {
                let removed = self.session.remove_selected(&positions)?;
                for entry in removed {
                    self.formatter.info(&format!("Removed {}", entry.label()));
                }
            }
            ShellCommand::Up(position) => {
                self.session.move_up(position)?;
                self.list();
            }
            ShellCommand::Down(position) => {
                self.session.move_down(position)?;
                self.list();
            }
            ShellCommand::Swap(a, b) => {
                self.session.swap(a, b)?;
                self.list();
            }
            ShellCommand::List => self.list(),
            ShellCommand::Preview(position) => self.preview(position).await?,
            ShellCommand::Combine { output, force } => {
                if output.exists() && !force {
                    return Err(BuckError::output_exists(output));
                }
                let stats = self.session.combine(&output)?;
                self.formatter
                    .success(&format!("Created {}", output.display()));
                output::display_combine_statistics(&self.formatter, &stats);
            }
            ShellCommand::Rename { source, new_name } => {
                self.session.select_rename(source);
                self.session.propose_name(new_name)?;
                let renamed = self.session.apply_rename()?;
                self.formatter
                    .success(&format!("Renamed to {}", renamed.display()));
            }
            ShellCommand::Clear => {
                self.session.clear();
                self.formatter.info("The list is now empty.");
            }
            ShellCommand::Help => {
                for (usage, description) in HELP {
                    self.formatter.detail(usage, description);
                }
            }
            ShellCommand::Quit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn list(&self) {
        output::display_catalog(&self.formatter, self.session.catalog());
    }

    async fn preview(&mut self, position: Option<usize>) -> Result<()> {
        if let Some(position) = position {
            // Fail before rendering anything.
            self.session.preview(position)?;
        }

        let requests = self.session.preview_requests();
        if !requests.is_empty() {
            let mut progress = if self.formatter.is_quiet() {
                ProgressBar::disabled()
            } else {
                ProgressBar::auto(requests.len())
            };
            progress.set_message("Rendering previews");

            let mut rx = self.session.preview_queue().spawn(requests);
            while let Some(event) = rx.recv().await {
                if let PreviewEvent::Ready(preview) = event {
                    self.session.apply_preview(preview);
                }
                progress.increment();
            }
            progress.finish();
        }

        let positions: Vec<usize> = match position {
            Some(position) => vec![position],
            None => (0..self.session.list().len()).collect(),
        };
        for position in positions {
            if let Some(preview) = self.session.preview(position)? {
                output::display_preview(&self.formatter, preview);
            }
        }
        Ok(())
    }
}

/// Split a line on whitespace, keeping double-quoted words together.
fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_word = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_word = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            c => {
                current.push(c);
                has_word = true;
            }
        }
    }

    if in_quotes {
        return Err(BuckError::invalid_config("Unterminated quote"));
    }
    if has_word {
        words.push(current);
    }
    Ok(words)
}

fn parse_position(word: &str) -> Result<usize> {
    match word.parse::<usize>() {
        Ok(0) | Err(_) => Err(BuckError::invalid_config(format!(
            "Invalid position '{word}': positions start at 1"
        ))),
        Ok(n) => Ok(n - 1),
    }
}

fn single_position(name: &str, args: &[String]) -> Result<usize> {
    exact_args(name, args, 1)?;
    parse_position(&args[0])
}

fn require_args(name: &str, args: &[String], min: usize) -> Result<()> {
    if args.len() < min {
        return Err(usage(name));
    }
    Ok(())
}

fn exact_args(name: &str, args: &[String], count: usize) -> Result<()> {
    if args.len() != count {
        return Err(usage(name));
    }
    Ok(())
}

fn usage(name: &str) -> BuckError {
    let name = name.to_lowercase();
    let hint = HELP
        .iter()
        .find(|(usage, _)| usage.split_whitespace().next() == Some(name.as_str()))
        .map(|(usage, _)| format!("Usage: {usage}"))
        .unwrap_or_else(|| "Type 'help' for a list of commands".to_string());
    BuckError::invalid_config(hint)
}

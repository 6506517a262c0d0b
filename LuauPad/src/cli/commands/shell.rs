//! Interactive multi-document session
//!
//! Reads one command per line. `edit` replaces the active document with the
//! lines that follow, up to a line holding a single `.`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use super::highlight::render;
use crate::config::AppConfig;
use crate::dispatch::DispatchHandle;
use crate::io::Platform;
use crate::session::Session;
use crate::state::DocumentId;

const HELP: &str = "\
commands:
  new                create an empty document
  open [path]        open a file (prompts when no path is given)
  edit               replace the active document; finish with a line holding only '.'
  append <text>      add a line to the active document
  switch <n>         make tab n active
  close [n]          close tab n (default: the active tab)
  delete             close the active tab after confirming
  save               export the active document
  copy               copy the active document to the clipboard
  exec               send the active document to the endpoint
  probe              check that the endpoint answers
  tabs               list open tabs
  show               print the active document with line numbers
  quit               leave";

enum Flow {
    Continue,
    Quit,
}

/// Line-driven front end over a [`Session`]
pub struct Shell<P: Platform, W: Write> {
    session: Session<P>,
    out: W,
    colored: bool,
    pending: Vec<(&'static str, DispatchHandle)>,
}

impl<P: Platform, W: Write> Shell<P, W> {
    pub fn new(session: Session<P>, out: W) -> Self {
        Self {
            session,
            out,
            colored: console::colors_enabled(),
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    pub fn into_inner(self) -> (Session<P>, W) {
        (self.session, self.out)
    }

    /// Process commands until `quit` or the input ends
    pub fn run(&mut self, mut lines: impl Iterator<Item = String>) -> anyhow::Result<()> {
        loop {
            self.poll_dispatches(Duration::ZERO)?;
            let label = self.session.active().label();
            write!(self.out, "[{label}]> ")?;
            self.out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(self.out)?;
                break;
            };
            if let Flow::Quit = self.handle(line.trim_end_matches(['\r', '\n']), &mut lines)? {
                break;
            }
        }

        if !self.pending.is_empty() {
            writeln!(self.out, "waiting for {} dispatch(es)", self.pending.len())?;
            let timeout = self.session.config().request_timeout() + Duration::from_secs(1);
            self.poll_dispatches(timeout)?;
        }
        Ok(())
    }

    fn poll_dispatches(&mut self, timeout: Duration) -> io::Result<()> {
        let mut still_running = Vec::new();
        for (kind, handle) in self.pending.drain(..) {
            match handle.wait_timeout(timeout) {
                Some(Ok(body)) => writeln!(self.out, "{kind} response: {body}")?,
                // Already logged; never an alert
                Some(Err(_)) => {}
                None => still_running.push((kind, handle)),
            }
        }
        self.pending = still_running;
        Ok(())
    }

    fn tab_id(&self, arg: &str) -> Option<DocumentId> {
        let index: usize = arg.parse().ok()?;
        let documents = self.session.tabs().documents();
        index
            .checked_sub(1)
            .and_then(|i| documents.get(i))
            .map(|doc| doc.id().clone())
    }

    fn handle(&mut self, line: &str, lines: &mut impl Iterator<Item = String>) -> anyhow::Result<Flow> {
        let (command, arg) = match line.trim_start().split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "" => {}
            "help" | "?" => writeln!(self.out, "{HELP}")?,
            "quit" | "exit" => return Ok(Flow::Quit),
            "new" => {
                self.session.new_document();
                writeln!(self.out, "created {}", self.session.active().name())?;
            }
            "open" => {
                let opened = if arg.is_empty() {
                    self.session.open_file()
                } else {
                    self.session.open_path(Path::new(arg))
                };
                if opened.is_some() {
                    let lines = self.session.view().line_count;
                    writeln!(
                        self.out,
                        "opened {} ({lines} lines)",
                        self.session.active().name()
                    )?;
                }
            }
            "edit" => {
                let mut body = Vec::new();
                for next in lines.by_ref() {
                    let next = next.trim_end_matches(['\r', '\n']).to_string();
                    if next == "." {
                        break;
                    }
                    body.push(next);
                }
                self.session.edit(body.join("\n"));
            }
            "append" => {
                let mut text = String::new();
                if !self.session.active().content().is_empty() {
                    text.push('\n');
                }
                text.push_str(arg);
                self.session.append(&text);
            }
            "switch" => match self.tab_id(arg) {
                Some(id) => {
                    self.session.switch_to(&id);
                }
                None => writeln!(self.out, "no tab {arg}")?,
            },
            "close" => {
                let id = if arg.is_empty() {
                    Some(self.session.tabs().active_id().clone())
                } else {
                    self.tab_id(arg)
                };
                match id {
                    Some(id) => {
                        if !self.session.close(&id)? {
                            writeln!(self.out, "kept open")?;
                        }
                    }
                    None => writeln!(self.out, "no tab {arg}")?,
                }
            }
            "delete" => {
                if !self.session.delete_active()? {
                    writeln!(self.out, "kept open")?;
                }
            }
            "save" => {
                if let Some(path) = self.session.save_active() {
                    writeln!(self.out, "saved {}", path.display())?;
                }
            }
            "copy" => {
                if self.session.copy_active() {
                    writeln!(self.out, "copied")?;
                }
            }
            "exec" => {
                self.pending.push(("exec", self.session.execute_active()));
                writeln!(self.out, "dispatched")?;
            }
            "probe" => {
                self.pending.push(("probe", self.session.probe()));
                writeln!(self.out, "dispatched")?;
            }
            "tabs" => {
                for (i, tab) in self.session.tab_labels().iter().enumerate() {
                    let marker = if tab.active { '>' } else { ' ' };
                    writeln!(self.out, "{marker} {} {}", i + 1, tab.label)?;
                }
            }
            "show" => {
                let content = self.session.active().content().to_string();
                let tokens = self.session.view().tokens.clone();
                writeln!(self.out, "{}", render(&content, &tokens, self.colored))?;
            }
            other => writeln!(self.out, "unknown command: {other} (try help)")?,
        }
        Ok(Flow::Continue)
    }
}

fn stdin_lines() -> impl Iterator<Item = String> {
    // Lock per line: platform prompts read stdin too
    std::iter::from_fn(|| {
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    })
}

#[cfg(feature = "native-dialogs")]
fn platform(_config: &AppConfig) -> crate::io::native::NativePlatform {
    crate::io::native::NativePlatform::new()
}

#[cfg(not(feature = "native-dialogs"))]
fn platform(config: &AppConfig) -> crate::io::terminal::TerminalPlatform {
    let dir = config.export_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    crate::io::terminal::TerminalPlatform::new(dir)
}

/// Start an interactive session with `files` open
pub fn execute(files: &[PathBuf], config: &AppConfig) -> anyhow::Result<()> {
    let mut session = Session::with_http(config.clone(), platform(config))
        .context("failed to start session")?;
    for file in files {
        session.open_path(file);
    }

    let mut shell = Shell::new(session, io::stdout());
    writeln!(io::stdout(), "LuauPad {} - type 'help' for commands", crate::VERSION)?;
    shell.run(stdin_lines())
}

//! Terminal session: transcript, input line, history and command dispatch.

use platform_host::{FsResult, VirtualFsService};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::completion::{layout_matches, Completer, Completion};
use crate::format::format_ls_line;
use crate::history::CommandHistory;
use crate::tokenize::tokenize;

/// First transcript line of a new session.
pub const WELCOME_MESSAGE: &str = "Welcome to SimTerm! Type `help` for available commands.";

const HELP_LINES: [&str; 13] = [
    "Available commands:",
    "  help              - Show this help message",
    "  clear             - Clear the terminal screen",
    "  pwd               - Print working directory",
    "  ls [path]         - List directory contents",
    "  cd <path>         - Change directory",
    "  mkdir <path>      - Create directory",
    "  touch <path>      - Create empty file or update timestamp",
    "  cat <path>        - Display file content",
    "  rm <path>         - Remove file or empty directory",
    "  mv <source> <dest> - Move/rename file or directory",
    "  cp <source> <dest> - Copy file or directory",
    "  echo [...text]    - Print text to terminal",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Styling class of a transcript line.
pub enum LineKind {
    /// Banner text.
    Info,
    /// Echoed prompt and command.
    Prompt,
    /// Command output.
    Output,
    /// Command failure.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One line of the terminal transcript.
pub struct TerminalLine {
    /// Styling class.
    pub kind: LineKind,
    /// Line text without a trailing newline.
    pub text: String,
}

impl TerminalLine {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Lines produced by one submitted command.
pub struct CommandOutput {
    /// Output and error lines, excluding the echoed prompt.
    pub lines: Vec<TerminalLine>,
    /// The transcript was cleared.
    pub cleared: bool,
}

impl CommandOutput {
    fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        let text = text.into();
        // Multi-line results (file content) become one transcript line per line.
        if text.contains('\n') {
            self.lines
                .extend(text.split('\n').map(|line| TerminalLine::new(kind, line)));
        } else {
            self.lines.push(TerminalLine::new(kind, text));
        }
    }

    fn report<T>(&mut self, result: FsResult<T>) {
        if let Err(err) = result {
            self.push(LineKind::Error, err.message);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// State of one terminal window.
pub struct TerminalSession {
    lines: Vec<TerminalLine>,
    input: String,
    history: CommandHistory,
    completer: Completer,
}

impl Default for TerminalSession {
    fn default() -> Self {
        Self::new(CommandHistory::default())
    }
}

impl TerminalSession {
    /// Creates a session showing the welcome banner.
    pub fn new(history: CommandHistory) -> Self {
        Self {
            lines: vec![TerminalLine::new(LineKind::Info, WELCOME_MESSAGE)],
            input: String::new(),
            history,
            completer: Completer::default(),
        }
    }

    /// Creates a session remembering at most `limit` commands.
    pub fn with_history_limit(limit: usize) -> Self {
        Self::new(CommandHistory::new(limit))
    }

    /// Transcript, oldest first.
    pub fn lines(&self) -> &[TerminalLine] {
        &self.lines
    }

    /// Current input line.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Command history.
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Replaces the input line, as typing does.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.completer.reset();
    }

    /// Prompt prefix for `cwd`.
    pub fn prompt(cwd: &str) -> String {
        format!("{cwd}$ ")
    }

    /// Recalls the previous history entry into the input line.
    pub fn history_previous(&mut self) {
        if let Some(entry) = self.history.previous() {
            self.input = entry;
        }
        self.completer.reset();
    }

    /// Recalls the next history entry; past the newest the input is cleared.
    pub fn history_next(&mut self) {
        if let Some(entry) = self.history.next() {
            self.input = entry;
        }
        self.completer.reset();
    }

    /// Handles a tab press against the current input.
    pub fn complete(&mut self, fs: &dyn VirtualFsService) -> Completion {
        let completion = self.completer.complete(&self.input, fs);
        match &completion {
            Completion::Completed(input) => self.input = input.clone(),
            Completion::Listed(matches) => {
                self.lines.extend(
                    layout_matches(matches)
                        .into_iter()
                        .map(|line| TerminalLine::new(LineKind::Output, line)),
                );
                let prompt = format!("{}{}", Self::prompt(&fs.cwd()), self.input);
                self.lines.push(TerminalLine::new(LineKind::Prompt, prompt));
            }
            Completion::NoMatch | Completion::Ambiguous => {}
        }
        completion
    }

    /// Runs `line` as if it had been typed and submitted.
    pub fn run(&mut self, fs: &mut dyn VirtualFsService, line: &str) -> CommandOutput {
        self.set_input(line);
        self.submit(fs)
    }

    /// Executes the current input line and appends the results to the transcript.
    pub fn submit(&mut self, fs: &mut dyn VirtualFsService) -> CommandOutput {
        let command_line = std::mem::take(&mut self.input).trim().to_string();
        self.completer.reset();
        if command_line.is_empty() {
            return CommandOutput::default();
        }

        self.history.push(&command_line);
        let prompt = format!("{}{command_line}", Self::prompt(&fs.cwd()));
        self.lines.push(TerminalLine::new(LineKind::Prompt, prompt));

        let output = execute(fs, &command_line);
        if output.cleared {
            self.lines.clear();
        } else {
            self.lines.extend(output.lines.iter().cloned());
        }
        output
    }
}

fn execute(fs: &mut dyn VirtualFsService, command_line: &str) -> CommandOutput {
    let mut out = CommandOutput::default();
    let argv = match tokenize(command_line) {
        Ok(argv) => argv,
        Err(err) => {
            out.push(LineKind::Error, err.to_string());
            return out;
        }
    };
    let Some((command, args)) = argv.split_first() else {
        return out;
    };
    debug!(command = command.as_str(), args = args.len(), "terminal command");

    let first = args.first().map(String::as_str);
    match (command.as_str(), first) {
        ("help", _) => {
            for line in HELP_LINES {
                out.push(LineKind::Output, line);
            }
        }
        ("clear", _) => out.cleared = true,
        ("pwd", _) => out.push(LineKind::Output, fs.cwd()),
        ("echo", _) => out.push(LineKind::Output, args.join(" ")),
        ("ls", target) => match fs.list_entries(target) {
            Ok(entries) if entries.is_empty() => out.push(LineKind::Output, "(Directory is empty)"),
            Ok(entries) => {
                for entry in &entries {
                    out.push(LineKind::Output, format_ls_line(entry));
                }
            }
            Err(err) => out.push(LineKind::Error, err.message),
        },
        ("cd" | "mkdir" | "touch" | "cat" | "rm", None) => {
            out.push(LineKind::Error, format!("{command}: missing operand"));
        }
        ("cd", Some(path)) => out.report(fs.set_cwd(path)),
        ("mkdir", Some(path)) => out.report(fs.create_directory(path)),
        ("touch", Some(path)) => out.report(fs.create_file(path, None)),
        ("rm", Some(path)) => out.report(fs.delete_item(path)),
        ("cat", Some(path)) => match fs.read_file(path) {
            Ok(content) => out.push(LineKind::Output, content),
            Err(err) => out.push(LineKind::Error, err.message),
        },
        ("mv" | "cp", _) => match args {
            [] | [_] if command == "mv" => out.push(
                LineKind::Error,
                "mv: missing destination operand after source operand",
            ),
            [] | [_] => out.push(
                LineKind::Error,
                "cp: missing destination file operand after source operand",
            ),
            [source, destination, ..] if command == "mv" => {
                out.report(fs.move_item(source, destination))
            }
            [source, destination, ..] => out.report(fs.copy_item(source, destination)),
        },
        (other, _) => out.push(LineKind::Error, format!("Command not found: {other}")),
    }
    out
}

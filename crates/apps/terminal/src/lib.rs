//! Headless terminal app: a command-line session over the desktop's virtual filesystem.
//!
//! [`TerminalSession`] owns the transcript, input line, command history and tab-completion
//! state. Commands map one-to-one onto [`platform_host::VirtualFsService`] operations and their
//! results are rendered as [`TerminalLine`]s.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod completion;
pub mod format;
pub mod history;
pub mod session;
pub mod tokenize;

pub use completion::{Completer, Completion, KNOWN_COMMANDS};
pub use format::{format_bytes, format_ls_line, format_timestamp};
pub use history::{CommandHistory, DEFAULT_HISTORY_LIMIT};
pub use session::{CommandOutput, LineKind, TerminalLine, TerminalSession, WELCOME_MESSAGE};
pub use tokenize::{tokenize, TerminalError};

use std::io::Stderr;
use std::sync::{LazyLock, Mutex};

pub mod colors;
pub mod dialog;
pub mod display;
pub mod init;
pub mod message;

/// Shared handle to stderr.
///
/// Held by prompts while they render so log output can't interleave.
pub static TERMINAL_STDERR: LazyLock<Mutex<Stderr>> =
    LazyLock::new(|| Mutex::new(std::io::stderr()));

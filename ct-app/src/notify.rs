//! Timestamped stderr notices. Every user-facing success or failure goes
//! through here so results on stdout stay clean.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Default,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Level::Default => "info",
            Level::Success => "ok",
            Level::Warning => "warn",
            Level::Error => "error",
        };
        f.write_str(label)
    }
}

pub fn notify(level: Level, message: &str) {
    let now = chrono::Local::now().format("%H:%M:%S");
    eprintln!("[{now}] {level}: {message}");
}

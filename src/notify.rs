use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A transient user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub at: DateTime<Local>,
}

impl Toast {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            at: Local::now(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn toast(&self, toast: Toast);
}

/// Prints toasts to the terminal and mirrors them to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn toast(&self, toast: Toast) {
        let icon = match toast.severity {
            Severity::Success => "✅",
            Severity::Info => "ℹ️",
            Severity::Warn => "⚠️",
            Severity::Error => "❌",
        };
        match toast.severity {
            Severity::Success | Severity::Info => {
                log::info!("toast[{}] {}", toast.severity, toast.message);
                println!("{} {}", icon, toast.message);
            }
            Severity::Warn | Severity::Error => {
                log::warn!("toast[{}] {}", toast.severity, toast.message);
                eprintln!("{} {}", icon, toast.message);
            }
        }
    }
}

/// Keeps every toast in memory; used by view-models and tests.
#[derive(Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts.lock().ok().and_then(|t| t.last().cloned())
    }
}

impl Notifier for RecordingNotifier {
    fn toast(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}

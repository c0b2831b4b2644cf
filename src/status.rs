use chrono::{DateTime, Local};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub message: String,
    pub severity: Severity,
    pub at: DateTime<Local>,
}

/// The single feedback line. Every report overwrites the last one.
#[derive(Debug)]
pub struct StatusReporter {
    current: Status,
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self {
            current: Status {
                message: "Press 'd' to detect your location or enter coordinates, then 's' to search."
                    .to_string(),
                severity: Severity::Info,
                at: Local::now(),
            },
        }
    }
}

impl StatusReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        // Errors also go to the log file for diagnostics
        match severity {
            Severity::Error => error!("{}", message),
            _ => info!("{}", message),
        }
        self.current = Status {
            message,
            severity,
            at: Local::now(),
        };
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.report(message, Severity::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.report(message, Severity::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.report(message, Severity::Error);
    }

    pub fn current(&self) -> &Status {
        &self.current
    }
}

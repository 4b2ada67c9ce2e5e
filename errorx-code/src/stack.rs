//! Call-site capture for stack layers

use crate::config::{self, BacktraceMode};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::Location;

/// Where an error was wrapped.
///
/// The caller location is always recorded. A full backtrace is recorded
/// according to the process-wide [`BacktraceMode`].
pub struct Stack {
    location: &'static Location<'static>,
    backtrace: Option<Backtrace>,
}

impl Stack {
    #[track_caller]
    pub(crate) fn capture() -> Self {
        Self::capture_with(config::backtrace_mode())
    }

    #[track_caller]
    pub(crate) fn capture_with(mode: BacktraceMode) -> Self {
        let backtrace = match mode {
            BacktraceMode::Disabled => None,
            BacktraceMode::Env => {
                let backtrace = Backtrace::capture();
                (backtrace.status() == BacktraceStatus::Captured).then_some(backtrace)
            }
            BacktraceMode::Always => Some(Backtrace::force_capture()),
        };
        Self {
            location: Location::caller(),
            backtrace,
        }
    }

    /// The call site of the constructor that captured this stack.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// The captured backtrace, if any.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.backtrace.as_ref()
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    at {}", self.location)?;
        if let Some(backtrace) = &self.backtrace {
            write!(f, "\n{}", backtrace)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

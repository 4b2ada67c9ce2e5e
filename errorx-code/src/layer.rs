//! Message and stack layers
//!
//! These sit outside a [`CodedError`](crate::CodedError) and add context
//! without hiding the code underneath.

use crate::error::Error;
use crate::stack::Stack;
use std::error::Error as StdError;
use std::fmt;

// =============================================================================
// Message layer
// =============================================================================

/// Prefixes the wrapped error's message with extra context.
///
/// Renders as `"<message>: <inner>"`.
pub struct WithMessage {
    message: String,
    inner: Error,
}

impl WithMessage {
    pub(crate) fn new(inner: Error, message: String) -> Self {
        Self { message, inner }
    }

    /// The context added by this layer.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped error.
    pub fn inner(&self) -> &Error {
        &self.inner
    }
}

impl fmt::Display for WithMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.inner)
    }
}

/// Verbose: the inner error first, then the message on its own line.
impl fmt::Debug for WithMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt_verbose(f)?;
        write!(f, "\n{}", self.message)
    }
}

impl StdError for WithMessage {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.inner.as_dyn())
    }
}

// =============================================================================
// Stack layer
// =============================================================================

/// Records where the wrapped error was annotated.
///
/// Adds nothing to the short rendering. The verbose rendering appends the
/// recorded call site and, when captured, the backtrace.
pub struct WithStack {
    stack: Stack,
    inner: Error,
}

impl WithStack {
    #[track_caller]
    pub(crate) fn new(inner: Error) -> Self {
        Self {
            stack: Stack::capture(),
            inner,
        }
    }

    /// The captured call site.
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// The wrapped error.
    pub fn inner(&self) -> &Error {
        &self.inner
    }
}

impl fmt::Display for WithStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for WithStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt_verbose(f)?;
        write!(f, "\n{}", self.stack)
    }
}

impl StdError for WithStack {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.inner.as_dyn())
    }
}

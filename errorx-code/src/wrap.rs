//! Constructors
//!
//! Every constructor puts the code closest to the error it is given, and any
//! message or stack layer outside it:
//!
//! ```text
//! ┌─────────────────┬──────────────────────────────────────┐
//! │ Constructor     │ Layers (outer → inner)               │
//! ├─────────────────┼──────────────────────────────────────┤
//! │ with_code       │ code → err                           │
//! │ with_stack      │ stack → code → err                   │
//! │ wrap / wrapf    │ stack → message → code → err         │
//! │ with_message(f) │ message → code → err                 │
//! └─────────────────┴──────────────────────────────────────┘
//! ```
//!
//! Outer callers can keep adding context; [`code`](crate::code) still finds
//! the tag by walking inward.

use crate::coded::CodedError;
use crate::error::Error;
use crate::layer::{WithMessage, WithStack};
use crate::ErrorCode;
use std::fmt;

/// Tag `err` with `code`. No message, no stack.
pub fn with_code(err: impl Into<Error>, code: ErrorCode) -> CodedError {
    CodedError::new(err, code)
}

/// Tag `err` with `code` and record the call site.
#[track_caller]
pub fn with_stack(err: impl Into<Error>, code: ErrorCode) -> Error {
    let coded = Error::coded(with_code(err, code));
    Error::stack(WithStack::new(coded))
}

/// Tag `err` with `code`, prefix it with `message` and record the call site.
///
/// ```rust
/// use errorx_code::{new, wrap};
///
/// let err = wrap(new("connection reset"), 503, "fetch upstream");
/// assert_eq!(err.to_string(), "fetch upstream: [503] connection reset");
/// assert_eq!(err.code(), 503);
/// ```
#[track_caller]
pub fn wrap(err: impl Into<Error>, code: ErrorCode, message: impl Into<String>) -> Error {
    let message = with_message(err, code, message);
    Error::stack(WithStack::new(message))
}

/// [`wrap`] with a formatted message. See also the [`wrapf!`](crate::wrapf!) macro.
#[track_caller]
pub fn wrapf(err: impl Into<Error>, code: ErrorCode, args: fmt::Arguments<'_>) -> Error {
    wrap(err, code, fmt::format(args))
}

/// Tag `err` with `code` and prefix it with `message`. No stack.
pub fn with_message(err: impl Into<Error>, code: ErrorCode, message: impl Into<String>) -> Error {
    let coded = Error::coded(with_code(err, code));
    Error::message(WithMessage::new(coded, message.into()))
}

/// [`with_message`] with a formatted message. See also the
/// [`with_messagef!`](crate::with_messagef!) macro.
pub fn with_messagef(err: impl Into<Error>, code: ErrorCode, args: fmt::Arguments<'_>) -> Error {
    with_message(err, code, fmt::format(args))
}

// =============================================================================
// Result extension
// =============================================================================

/// Annotate the error side of a `Result` in place.
///
/// ```rust
/// use errorx_code::{code, ResultExt};
///
/// let parsed: Result<u16, _> = "eighty".parse::<u16>().with_message(400, "parse port");
/// let err = parsed.unwrap_err();
/// assert_eq!(code(Some(&err)), 400);
/// assert_eq!(err.to_string(), "parse port: [400] invalid digit found in string");
/// ```
pub trait ResultExt<T> {
    /// See [`with_code`]
    fn with_code(self, code: ErrorCode) -> Result<T, Error>;

    /// See [`with_stack`]
    fn with_stack(self, code: ErrorCode) -> Result<T, Error>;

    /// See [`wrap`]
    fn wrap(self, code: ErrorCode, message: impl Into<String>) -> Result<T, Error>;

    /// [`wrap`] with a message built only on the error path.
    fn wrap_with<M, F>(self, code: ErrorCode, message: F) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M;

    /// See [`with_message`]
    fn with_message(self, code: ErrorCode, message: impl Into<String>) -> Result<T, Error>;

    /// [`with_message`] with a message built only on the error path.
    fn with_message_with<M, F>(self, code: ErrorCode, message: F) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M;

    /// Emit the error, if any, as an ERROR tracing event and pass it on.
    #[cfg(feature = "tracing")]
    fn log_err(self, message: &str) -> Result<T, Error>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<Error>,
{
    fn with_code(self, code: ErrorCode) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(with_code(err, code).into()),
        }
    }

    #[track_caller]
    fn with_stack(self, code: ErrorCode) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(with_stack(err, code)),
        }
    }

    #[track_caller]
    fn wrap(self, code: ErrorCode, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(wrap(err, code, message)),
        }
    }

    #[track_caller]
    fn wrap_with<M, F>(self, code: ErrorCode, message: F) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(wrap(err, code, message())),
        }
    }

    fn with_message(self, code: ErrorCode, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(with_message(err, code, message)),
        }
    }

    fn with_message_with<M, F>(self, code: ErrorCode, message: F) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(with_message(err, code, message())),
        }
    }

    #[cfg(feature = "tracing")]
    fn log_err(self, message: &str) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let err: Error = err.into();
                err.emit(tracing::Level::ERROR, message);
                Err(err)
            }
        }
    }
}

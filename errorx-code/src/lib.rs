//! # errorx-code
//!
//! Integer error codes and causal context for any error value.
//!
//! ## Design Philosophy
//!
//! - **Code**: an `i32` tag that says *what* went wrong, independent of text
//! - **Message layers**: outer callers add context without hiding the code
//! - **Stack layers**: record where an error was annotated
//! - **Chain**: the original error always stays reachable through `source()`
//!
//! ## Usage
//!
//! ```rust
//! use errorx_code::{cause, code, new, with_code, wrap, PlainError};
//!
//! let err = wrap(with_code(new("bad request"), 400), 500, "handle /users");
//!
//! assert_eq!(err.to_string(), "handle /users: [500] [400] bad request");
//! assert_eq!(code(Some(&err)), 500);
//! assert!(cause(&err).downcast_ref::<PlainError>().is_some());
//! ```
//!
//! ## Principles
//!
//! - The code is always applied closest to the error handed to a constructor,
//!   so [`code`] finds it by walking inward past later context
//! - [`code`] returns the *nearest* code; an outer code shadows inner ones
//! - Chains without a code report the configurable default (`-1` unless changed
//!   through [`set_default_code`] or [`config::Config::install`])
//! - [`CodedError::is`] compares codes, not structure
//! - Foreign error types carry codes by implementing [`CodeProvider`] and
//!   registering with [`register_code_provider`]

mod coded;
pub mod config;
mod error;
mod format;
mod layer;
mod lookup;
mod macros;
mod stack;
mod wrap;

pub use coded::{register_code_provider, CodeProvider, CodedError};
pub use error::{new, Chain, Error, PlainError};
pub use format::Quoted;
pub use layer::{WithMessage, WithStack};
pub use lookup::{cause, code, code_of, default_code, is, set_default_code, CodeResolver};
pub use stack::Stack;
pub use wrap::{with_code, with_message, with_messagef, with_stack, wrap, wrapf, ResultExt};

/// The integer classification attached to an error.
pub type ErrorCode = i32;

/// The code reported for chains without one, until reconfigured.
pub const DEFAULT_CODE: ErrorCode = -1;

/// Result type alias using errorx-code Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

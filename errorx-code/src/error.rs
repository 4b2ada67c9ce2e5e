//! The opaque Error handle returned by every constructor

use crate::coded::{register_code_provider, CodeProvider, CodedError};
use crate::format::Quoted;
use crate::layer::{WithMessage, WithStack};
use crate::lookup;
use crate::ErrorCode;
use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;
use std::ops::Deref;
use std::panic::Location;

/// An owned link in an error chain.
///
/// Every constructor in this crate hands back an `Error`. Callers should treat
/// it as opaque: the concrete layering (stack, message, code) is an
/// implementation detail, and the structured information is recovered with
/// [`code`](crate::code), [`cause`](crate::cause) or [`Error::find`].
///
/// Any `std::error::Error + Send + Sync + 'static` converts into an `Error`,
/// so `?` works on foreign errors:
///
/// ```rust
/// use errorx_code::{Error, ResultExt};
///
/// fn read(path: &str) -> Result<String, Error> {
///     std::fs::read_to_string(path).wrap(404, format!("read {path}"))
/// }
///
/// let err = read("/definitely/not/here").unwrap_err();
/// assert_eq!(err.code(), 404);
/// assert!(err.to_string().starts_with("read /definitely/not/here: [404] "));
/// ```
///
/// Rendering:
/// - `{}` prints the short, code-prefixed message chain
/// - `{:?}` prints the verbose form, including captured call sites and backtraces
/// - [`Error::quoted`] prints the short form inside double quotes
pub struct Error {
    repr: Repr,
}

enum Repr {
    Leaf(Box<dyn StdError + Send + Sync + 'static>),
    Coded(Box<CodedError>),
    Message(Box<WithMessage>),
    Stack(Box<WithStack>),
}

impl Error {
    /// Wrap an arbitrary error as the first link of a chain.
    ///
    /// Values that already are one of this crate's layers keep their identity
    /// as that layer instead of being hidden behind a leaf.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_boxed(Box::new(error))
    }

    /// Same as [`Error::new`] for an already boxed error.
    pub fn from_boxed(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        let error = match error.downcast::<CodedError>() {
            Ok(coded) => return Self { repr: Repr::Coded(coded) },
            Err(other) => other,
        };
        let error = match error.downcast::<WithMessage>() {
            Ok(message) => return Self { repr: Repr::Message(message) },
            Err(other) => other,
        };
        match error.downcast::<WithStack>() {
            Ok(stack) => Self { repr: Repr::Stack(stack) },
            Err(other) => Self { repr: Repr::Leaf(other) },
        }
    }

    /// Wrap an error that carries its own code, registering its type with
    /// [`register_code_provider`](crate::register_code_provider) so the chain
    /// lookups see that code.
    pub fn from_provider<E>(error: E) -> Self
    where
        E: StdError + CodeProvider + Send + Sync + 'static,
    {
        register_code_provider::<E>();
        Self::new(error)
    }

    /// Take over an `anyhow::Error`.
    ///
    /// If the anyhow error was built directly from one of this crate's layers
    /// the layer is recovered; otherwise the anyhow chain becomes a leaf whose
    /// `source()` chain is preserved.
    pub fn from_anyhow(error: anyhow::Error) -> Self {
        let error = match error.downcast::<CodedError>() {
            Ok(coded) => return coded.into(),
            Err(other) => other,
        };
        let error = match error.downcast::<WithMessage>() {
            Ok(message) => return message.into(),
            Err(other) => other,
        };
        match error.downcast::<WithStack>() {
            Ok(stack) => stack.into(),
            Err(other) => Self {
                repr: Repr::Leaf(other.into()),
            },
        }
    }

    pub(crate) fn coded(coded: CodedError) -> Self {
        Self {
            repr: Repr::Coded(Box::new(coded)),
        }
    }

    pub(crate) fn message(message: WithMessage) -> Self {
        Self {
            repr: Repr::Message(Box::new(message)),
        }
    }

    pub(crate) fn stack(stack: WithStack) -> Self {
        Self {
            repr: Repr::Stack(Box::new(stack)),
        }
    }

    // =========================================================================
    // Chain access
    // =========================================================================

    /// The outermost link as a standard error trait object.
    pub fn as_dyn(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match &self.repr {
            Repr::Leaf(error) => &**error,
            Repr::Coded(coded) => &**coded,
            Repr::Message(message) => &**message,
            Repr::Stack(stack) => &**stack,
        }
    }

    /// The next handle in the chain, when the outermost link is one of this
    /// crate's layers. Leaves return `None` even if they have a `source()`.
    pub fn inner(&self) -> Option<&Error> {
        match &self.repr {
            Repr::Leaf(_) => None,
            Repr::Coded(coded) => Some(coded.inner()),
            Repr::Message(message) => Some(message.inner()),
            Repr::Stack(stack) => Some(stack.inner()),
        }
    }

    /// Iterate over every link, outermost first, following `source()`.
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self.as_dyn())
    }

    /// The deepest error reachable through `source()`.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        lookup::cause(self)
    }

    /// The nearest code in the chain, or the process-wide default.
    pub fn code(&self) -> ErrorCode {
        lookup::code(Some(self))
    }

    /// The first link in the chain that is a `T`.
    pub fn find<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        self.chain().find_map(|link| link.downcast_ref::<T>())
    }

    /// Downcast the outermost link only.
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        self.as_dyn().downcast_ref::<T>()
    }

    /// Returns true if the outermost link is a `T`.
    pub fn is<T>(&self) -> bool
    where
        T: StdError + 'static,
    {
        self.as_dyn().is::<T>()
    }

    /// Call site recorded by the nearest stack layer.
    pub fn location(&self) -> Option<&'static Location<'static>> {
        self.find::<WithStack>().map(|stack| stack.stack().location())
    }

    /// Backtrace recorded by the nearest stack layer, if one was captured.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.chain()
            .filter_map(|link| link.downcast_ref::<WithStack>())
            .find_map(|stack| stack.stack().backtrace())
    }

    /// Render the short message inside double quotes.
    pub fn quoted(&self) -> Quoted<'_, Self> {
        Quoted::new(self)
    }

    /// Give up the handle for a plain boxed trait object.
    pub fn into_boxed(self) -> Box<dyn StdError + Send + Sync + 'static> {
        match self.repr {
            Repr::Leaf(error) => error,
            Repr::Coded(coded) => coded,
            Repr::Message(message) => message,
            Repr::Stack(stack) => stack,
        }
    }

    /// Verbose rendering: leaves print their `source()` chain root first,
    /// layers add what they carry.
    pub(crate) fn fmt_verbose(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Leaf(error) => {
                let head: &(dyn StdError + 'static) = &**error;
                let links: Vec<_> = Chain::new(head).collect();
                for (i, link) in links.iter().rev().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", link)?;
                }
                Ok(())
            }
            Repr::Coded(coded) => fmt::Debug::fmt(&**coded, f),
            Repr::Message(message) => fmt::Debug::fmt(&**message, f),
            Repr::Stack(stack) => fmt::Debug::fmt(&**stack, f),
        }
    }

    /// Emit this error as a tracing event carrying its code.
    #[cfg(feature = "tracing")]
    pub fn emit(&self, level: tracing::Level, message: &str) {
        let code = self.code();
        match level {
            tracing::Level::ERROR => tracing::error!(code, error = %self, "{message}"),
            tracing::Level::WARN => tracing::warn!(code, error = %self, "{message}"),
            tracing::Level::INFO => tracing::info!(code, error = %self, "{message}"),
            tracing::Level::DEBUG => tracing::debug!(code, error = %self, "{message}"),
            _ => tracing::trace!(code, error = %self, "{message}"),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl<E> From<E> for Error
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Error::new(error)
    }
}

impl From<Error> for Box<dyn StdError + Send + Sync + 'static> {
    fn from(error: Error) -> Self {
        error.into_boxed()
    }
}

impl Deref for Error {
    type Target = dyn StdError + Send + Sync + 'static;

    fn deref(&self) -> &Self::Target {
        self.as_dyn()
    }
}

impl AsRef<dyn StdError + Send + Sync + 'static> for Error {
    fn as_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.as_dyn()
    }
}

// =============================================================================
// Display - short, code-prefixed message chain
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_dyn(), f)
    }
}

// =============================================================================
// Debug - verbose, with call sites and backtraces
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_verbose(f)
    }
}

// =============================================================================
// Chain iterator
// =============================================================================

/// Iterator over the links of an error chain, outermost first.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Chain<'a> {
    /// Start walking at `head`.
    pub fn new(head: &'a (dyn StdError + 'static)) -> Self {
        Self { next: Some(head) }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

// =============================================================================
// Plain leaf errors
// =============================================================================

/// A leaf error that is nothing but a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PlainError {
    message: String,
}

impl PlainError {
    /// Create a plain error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Get the message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Create a chain consisting of a single [`PlainError`].
pub fn new(message: impl Into<String>) -> Error {
    Error::new(PlainError::new(message))
}

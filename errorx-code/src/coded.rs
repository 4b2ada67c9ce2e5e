//! The code-carrying decorator

use crate::error::Error;
use crate::format::Quoted;
use crate::ErrorCode;
use std::any::TypeId;
use std::error::Error as StdError;
use std::fmt;
use std::ptr;
use std::sync::{PoisonError, RwLock};

/// Anything that carries an integer error code.
///
/// [`CodedError`] is always recognised by the chain lookups. Other error types
/// opt in with [`register_code_provider`] (or [`Error::from_provider`]), or per
/// resolver with [`CodeResolver::with_provider`](crate::CodeResolver::with_provider).
///
/// ```rust
/// use errorx_code::{code_of, register_code_provider, CodeProvider};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("http status {0}")]
/// struct HttpError(i32);
///
/// impl CodeProvider for HttpError {
///     fn code(&self) -> i32 {
///         self.0
///     }
/// }
///
/// register_code_provider::<HttpError>();
/// assert_eq!(code_of(&HttpError(418)), 418);
/// ```
pub trait CodeProvider {
    /// The code attached to this value.
    fn code(&self) -> ErrorCode;
}

/// Reads the code off one link if the link is of a known provider type.
pub(crate) type Extractor = fn(&(dyn StdError + 'static)) -> Option<ErrorCode>;

static PROVIDERS: RwLock<Vec<(TypeId, Extractor)>> = RwLock::new(Vec::new());

pub(crate) fn extract<T>(link: &(dyn StdError + 'static)) -> Option<ErrorCode>
where
    T: StdError + CodeProvider + 'static,
{
    link.downcast_ref::<T>().map(CodeProvider::code)
}

/// Make every `T` in a chain count as a code-bearing link for [`code`](crate::code),
/// [`code_of`](crate::code_of), [`CodeResolver`](crate::CodeResolver) and
/// [`CodedError::is`]. Registering twice is a no-op.
pub fn register_code_provider<T>()
where
    T: StdError + CodeProvider + 'static,
{
    let mut providers = PROVIDERS.write().unwrap_or_else(PoisonError::into_inner);
    if !providers.iter().any(|(id, _)| *id == TypeId::of::<T>()) {
        providers.push((TypeId::of::<T>(), extract::<T>));
    }
}

/// The code carried by this single link: a [`CodedError`] or a registered provider.
pub(crate) fn provided_code(link: &(dyn StdError + 'static)) -> Option<ErrorCode> {
    if let Some(coded) = link.downcast_ref::<CodedError>() {
        return Some(coded.code);
    }
    let providers = PROVIDERS.read().unwrap_or_else(PoisonError::into_inner);
    providers.iter().find_map(|(_, extract)| extract(link))
}

/// Decorates an error with an integer code.
///
/// The code and the wrapped error are fixed at construction. Rendering is
/// `"[<code>] <inner>"`; nesting several `CodedError`s yields one prefix per
/// layer, outermost first.
///
/// # Equality
///
/// [`CodedError::is`] compares by *code*, not by structure: two independently
/// built errors carrying the same code are considered the same error even when
/// they wrap unrelated causes. This lets any error tagged with a code stand in
/// for a sentinel of that code. Code that needs identity semantics should
/// compare addresses or inspect [`CodedError::inner`] instead.
///
/// ```rust
/// use errorx_code::{new, with_code};
///
/// let a = with_code(new("disk full"), 507);
/// let b = with_code(new("quota exceeded"), 507);
/// assert!(a.is(&b));
/// assert!(!a.is(&with_code(new("disk full"), 500)));
/// ```
pub struct CodedError {
    code: ErrorCode,
    inner: Error,
}

impl CodedError {
    /// Attach `code` to `inner`. Never fails.
    pub fn new(inner: impl Into<Error>, code: ErrorCode) -> Self {
        Self {
            code,
            inner: inner.into(),
        }
    }

    /// The stored code. Does not walk the chain.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The wrapped error.
    pub fn inner(&self) -> &Error {
        &self.inner
    }

    /// The wrapped error as a trait object, one level down.
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.inner.as_dyn()
    }

    /// Give up the decorator and return the wrapped error.
    pub fn into_inner(self) -> Error {
        self.inner
    }

    /// True if `target` is this very value, or is a code-bearing link (a
    /// `CodedError` or a registered [`CodeProvider`]) with the same code.
    ///
    /// An [`Error`] handle is compared through its outermost link, see
    /// [`CodedError::is_error`].
    pub fn is(&self, target: &(dyn StdError + 'static)) -> bool {
        if ptr::addr_eq(self as *const Self, target as *const (dyn StdError + 'static)) {
            return true;
        }
        provided_code(target) == Some(self.code)
    }

    /// [`CodedError::is`] against the outermost link of an [`Error`] handle.
    ///
    /// ```rust
    /// use errorx_code::{new, with_code, wrap, Error};
    ///
    /// let sentinel = with_code(new("not found"), 404);
    /// let tagged: Error = with_code(new("no such user"), 404).into();
    /// assert!(sentinel.is_error(&tagged));
    /// // same as passing the dereferenced handle
    /// assert!(sentinel.is(&*tagged));
    /// // the outermost link of a wrapped error is a stack layer, which has no code
    /// assert!(!sentinel.is_error(&wrap(new("no such user"), 404, "lookup")));
    /// ```
    pub fn is_error(&self, target: &Error) -> bool {
        self.is(target.as_dyn())
    }

    /// The first link, starting at this one, that is a `T`.
    pub fn find<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        let head: &(dyn StdError + 'static) = self;
        crate::Chain::new(head).find_map(|link| link.downcast_ref::<T>())
    }

    /// Render the short message inside double quotes.
    pub fn quoted(&self) -> Quoted<'_, Self> {
        Quoted::new(self)
    }
}

impl CodeProvider for CodedError {
    fn code(&self) -> ErrorCode {
        self.code
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.inner)
    }
}

/// Verbose: the code prefix once, then the verbose rendering of the inner error.
impl fmt::Debug for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.code)?;
        self.inner.fmt_verbose(f)
    }
}

impl StdError for CodedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.inner.as_dyn())
    }
}

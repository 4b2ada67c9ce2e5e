//! Chain lookups: nearest code, root cause, code equality

use crate::coded::{self, CodeProvider, CodedError, Extractor};
use crate::error::{Chain, Error};
use crate::{ErrorCode, DEFAULT_CODE};
use std::any::TypeId;
use std::error::Error as StdError;
use std::ptr;
use std::sync::atomic::{AtomicI32, Ordering};

static DEFAULT_CODE_CELL: AtomicI32 = AtomicI32::new(DEFAULT_CODE);

/// The code [`code`] reports for chains that carry none.
pub fn default_code() -> ErrorCode {
    DEFAULT_CODE_CELL.load(Ordering::Relaxed)
}

/// Replace the process-wide default code.
///
/// Any caller comparing against the sentinel must compare against the value
/// configured here, not against `-1`. Set it once at startup.
pub fn set_default_code(code: ErrorCode) {
    DEFAULT_CODE_CELL.store(code, Ordering::Relaxed);
}

/// The nearest code in `err`'s chain.
///
/// Walks outermost first and stops at the first code-bearing link, so an
/// outer code shadows an inner one. `None` and chains without a code yield
/// [`default_code`].
pub fn code(err: Option<&Error>) -> ErrorCode {
    CodeResolver::global().code(err)
}

/// [`code`] for an arbitrary standard error chain.
pub fn code_of(err: &(dyn StdError + 'static)) -> ErrorCode {
    CodeResolver::global().code_of(err)
}

/// The deepest error reachable by repeated `source()`.
pub fn cause(err: &Error) -> &(dyn StdError + 'static) {
    root_of(err.as_dyn())
}

/// True if any link of `err` is `target` itself, or is a [`CodedError`] whose
/// code equals `target`'s code.
///
/// ```rust
/// use errorx_code::{is, new, with_code, wrap};
///
/// let sentinel = with_code(new("not found"), 404);
/// let err = wrap(new("no such user"), 404, "lookup");
/// assert!(is(&err, &sentinel));
/// ```
pub fn is(err: &Error, target: &(dyn StdError + 'static)) -> bool {
    err.chain().any(|link| {
        ptr::addr_eq(link as *const (dyn StdError + 'static), target as *const (dyn StdError + 'static))
            || link
                .downcast_ref::<CodedError>()
                .is_some_and(|coded| coded.is(target))
    })
}

fn root_of<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current
}

/// A code lookup with its own default, for callers that prefer passing the
/// fallback around over touching the process-wide cell.
///
/// Besides [`CodedError`] and globally registered providers, a resolver also
/// recognises the [`CodeProvider`] types added with [`CodeResolver::with_provider`].
///
/// ```rust
/// use errorx_code::{new, with_code, CodeResolver};
///
/// let resolver = CodeResolver::new(500);
/// assert_eq!(resolver.code(Some(&new("no code here"))), 500);
/// assert_eq!(resolver.code(Some(&with_code(new("tagged"), 404).into())), 404);
/// assert_eq!(resolver.code(None), 500);
/// ```
#[derive(Debug, Clone)]
pub struct CodeResolver {
    default: ErrorCode,
    providers: Vec<(TypeId, Extractor)>,
}

impl Default for CodeResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CODE)
    }
}

impl CodeResolver {
    /// Create a resolver falling back to `default`.
    pub const fn new(default: ErrorCode) -> Self {
        Self {
            default,
            providers: Vec::new(),
        }
    }

    /// A resolver snapshotting the current process-wide default.
    pub fn global() -> Self {
        Self::new(default_code())
    }

    /// Also treat `T` links as code-bearing, for this resolver only.
    pub fn with_provider<T>(mut self) -> Self
    where
        T: StdError + CodeProvider + 'static,
    {
        if !self.providers.iter().any(|(id, _)| *id == TypeId::of::<T>()) {
            self.providers.push((TypeId::of::<T>(), coded::extract::<T>));
        }
        self
    }

    /// The fallback code.
    pub fn default_code(&self) -> ErrorCode {
        self.default
    }

    /// The nearest code in `err`'s chain, or this resolver's default.
    pub fn code(&self, err: Option<&Error>) -> ErrorCode {
        err.map_or(self.default, |err| self.code_of(err.as_dyn()))
    }

    /// The nearest code in an arbitrary standard error chain.
    pub fn code_of(&self, err: &(dyn StdError + 'static)) -> ErrorCode {
        Chain::new(err)
            .find_map(|link| self.link_code(link))
            .unwrap_or(self.default)
    }

    fn link_code(&self, link: &(dyn StdError + 'static)) -> Option<ErrorCode> {
        coded::provided_code(link)
            .or_else(|| self.providers.iter().find_map(|(_, extract)| extract(link)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new, with_code, with_message, wrap, PlainError};

    #[derive(Debug, thiserror::Error)]
    enum AppError {
        #[error("storage failed")]
        Storage(#[source] CodedError),
    }

    #[test]
    fn test_code_none_is_default() {
        assert_eq!(code(None), default_code());
    }

    #[test]
    fn test_code_without_code_layer() {
        let resolver = CodeResolver::new(-7);
        assert_eq!(resolver.code(Some(&new("plain"))), -7);
    }

    #[test]
    fn test_code_walks_past_outer_layers() {
        let err = wrap(new("inner"), 503, "outer");
        assert_eq!(code(Some(&err)), 503);
    }

    #[test]
    fn test_outermost_code_wins() {
        let err: Error = with_code(with_code(new("x"), 2), 1).into();
        assert_eq!(code(Some(&err)), 1);

        let err = with_message(with_code(new("x"), 2), 1, "ctx");
        assert_eq!(err.to_string(), "ctx: [1] [2] x");
        assert_eq!(code(Some(&err)), 1);
    }

    #[test]
    fn test_code_through_foreign_source() {
        let app = AppError::Storage(with_code(new("disk"), 507));
        assert_eq!(CodeResolver::new(0).code_of(&app), 507);

        let err = Error::new(app);
        assert_eq!(CodeResolver::new(0).code(Some(&err)), 507);
    }

    #[test]
    fn test_cause_returns_root() {
        let err = wrap(with_message(with_code(new("root"), 1), 2, "mid"), 3, "top");
        let root = cause(&err);
        assert_eq!(root.downcast_ref::<PlainError>(), Some(&PlainError::new("root")));
    }

    #[test]
    fn test_cause_of_leaf_is_itself() {
        let err = new("alone");
        assert!(ptr::addr_eq(cause(&err), err.as_dyn()));
    }

    #[test]
    fn test_is_walks_chain() {
        let err = wrap(new("x"), 404, "lookup");
        let sentinel = with_code(new("not found"), 404);
        assert!(is(&err, &sentinel));
        assert!(!is(&err, &with_code(new("x"), 500)));
    }

    #[test]
    fn test_is_identity_of_leaf() {
        let err = with_message(new("x"), 1, "ctx");
        let leaf = cause(&err);
        assert!(is(&err, leaf));
        assert!(!is(&err, &PlainError::new("x")));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("teapot")]
    struct Teapot;

    impl CodeProvider for Teapot {
        fn code(&self) -> ErrorCode {
            418
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("rate limited")]
    struct RateLimited;

    impl CodeProvider for RateLimited {
        fn code(&self) -> ErrorCode {
            429
        }
    }

    #[test]
    fn test_registered_provider_found_in_chain() {
        crate::register_code_provider::<Teapot>();
        assert_eq!(code_of(&Teapot), 418);
        assert_eq!(CodeResolver::new(0).code(Some(&Error::new(Teapot))), 418);

        let err = with_message(Error::new(Teapot), 500, "brew");
        assert_eq!(CodeResolver::new(0).code(Some(&err)), 500);
        assert_eq!(cause(&err).downcast_ref::<Teapot>().map(|t| t.code()), Some(418));
    }

    #[test]
    fn test_resolver_local_provider() {
        let plain = CodeResolver::new(0);
        let aware = CodeResolver::new(0).with_provider::<RateLimited>();
        let err = Error::new(RateLimited);
        assert_eq!(plain.code(Some(&err)), 0);
        assert_eq!(aware.code(Some(&err)), 429);
    }

    #[test]
    fn test_coded_error_shadows_provider() {
        crate::register_code_provider::<Teapot>();
        let err: Error = with_code(Teapot, 503).into();
        assert_eq!(CodeResolver::new(0).code(Some(&err)), 503);
    }

    #[test]
    fn test_resolver_default() {
        assert_eq!(CodeResolver::default().default_code(), DEFAULT_CODE);
        assert_eq!(CodeResolver::new(9).code(None), 9);
    }
}

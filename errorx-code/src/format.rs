//! Quoted rendering

use std::fmt;

/// Renders the short message of an error as a quoted, escaped string.
pub struct Quoted<'a, T: ?Sized> {
    error: &'a T,
}

impl<'a, T: ?Sized> Quoted<'a, T> {
    pub(crate) fn new(error: &'a T) -> Self {
        Self { error }
    }
}

impl<T: fmt::Display + ?Sized> fmt::Display for Quoted<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.error.to_string())
    }
}

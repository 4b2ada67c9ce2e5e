/// Create a [`PlainError`](crate::PlainError) chain from a format string.
///
/// ```rust
/// let err = errorx_code::errorf!("user {} not found", 42);
/// assert_eq!(err.to_string(), "user 42 not found");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::new(::std::format!($($arg)+))
    };
}

/// [`wrap`](crate::wrap) with a formatted message.
///
/// ```rust
/// use errorx_code::{new, wrapf};
///
/// let err = wrapf!(new("test"), 500, "wrapped {}", "error");
/// assert_eq!(err.to_string(), "wrapped error: [500] test");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $code:expr, $($arg:tt)+) => {
        $crate::wrapf($err, $code, ::std::format_args!($($arg)+))
    };
}

/// [`with_message`](crate::with_message) with a formatted message.
///
/// ```rust
/// use errorx_code::{new, with_messagef};
///
/// let err = with_messagef!(new("test"), 500, "message {}", "formatted");
/// assert_eq!(err.to_string(), "message formatted: [500] test");
/// ```
#[macro_export]
macro_rules! with_messagef {
    ($err:expr, $code:expr, $($arg:tt)+) => {
        $crate::with_messagef($err, $code, ::std::format_args!($($arg)+))
    };
}

//! Chain-level behaviour of the public constructors and lookups.

use errorx_code::{
    cause, code, code_of, new, register_code_provider, with_code, with_message, with_messagef,
    with_stack, wrap, wrapf, CodeProvider, CodeResolver, CodedError, Error, PlainError,
};
use std::io;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("quota exceeded for {tenant}")]
struct QuotaError {
    tenant: String,
}

fn quota(tenant: &str) -> QuotaError {
    QuotaError {
        tenant: tenant.to_string(),
    }
}

#[test]
fn code_of_construct_is_its_code() {
    for tag in [-1, 0, 1, 404, i32::MIN, i32::MAX] {
        let err: Error = with_code(new("x"), tag).into();
        assert_eq!(code(Some(&err)), tag);
    }
}

#[test]
fn cause_of_construct_is_original() {
    let err: Error = with_code(quota("acme"), 429).into();
    assert_eq!(cause(&err).downcast_ref::<QuotaError>(), Some(&quota("acme")));
}

#[test]
fn code_equality_ignores_inner_error() {
    let a = with_code(quota("acme"), 429);
    let b = with_code(io::Error::new(io::ErrorKind::Other, "socket"), 429);
    assert!(a.is(&b));

    let c = with_code(quota("acme"), 430);
    assert!(!a.is(&c));
}

#[test]
fn wrap_renders_message_then_code() {
    let err = wrap(new("test"), 500, "ctx");
    assert_eq!(err.to_string(), "ctx: [500] test");
}

#[test]
fn wrapf_renders_formatted_message() {
    let err = wrapf(new("test"), 500, format_args!("ctx {}", "x"));
    assert_eq!(err.to_string(), "ctx x: [500] test");

    let err = errorx_code::wrapf!(new("test"), 500, "wrapped {:?}", "error");
    assert_eq!(err.to_string(), "wrapped \"error\": [500] test");
}

#[test]
fn with_message_scenario() {
    let err = with_message(new("bad request"), 400, "invalid input");
    assert_eq!(code(Some(&err)), 400);
    assert_eq!(err.to_string(), "invalid input: [400] bad request");
}

#[test]
fn with_messagef_scenario() {
    let err = with_messagef(new("test"), 500, format_args!("message {}", "formatted"));
    assert_eq!(err.to_string(), "message formatted: [500] test");

    let err = errorx_code::with_messagef!(new("test"), 500, "message {}", 7);
    assert_eq!(err.to_string(), "message 7: [500] test");
}

#[test]
fn cause_survives_three_wraps() {
    let inner = with_code(quota("acme"), 429);
    let middle = with_message(inner, 503, "reserve capacity");
    let outer = wrap(middle, 500, "create order");

    assert_eq!(
        outer.to_string(),
        "create order: [500] reserve capacity: [503] [429] quota exceeded for acme"
    );
    assert_eq!(code(Some(&outer)), 500);
    assert_eq!(cause(&outer).downcast_ref::<QuotaError>(), Some(&quota("acme")));
    assert_eq!(outer.chain().count(), 7);
}

#[test]
fn verbose_with_stack_names_call_site() {
    let line = line!() + 1;
    let err = with_stack(new("test"), 500);

    let verbose = format!("{:?}", err);
    assert!(verbose.starts_with("[500] test"));
    assert!(verbose.contains(&format!("{}:{}:", file!(), line)));
    assert_eq!(err.to_string(), "[500] test");
}

#[test]
fn verbose_wrapf_keeps_code_message_and_site() {
    let err = errorx_code::wrapf!(new("test"), 500, "wrapped {}", "error");
    let verbose = format!("{:?}", err);
    assert!(verbose.contains("[500] test"));
    assert!(verbose.contains("wrapped error"));
    assert!(verbose.contains(file!()));
}

#[test]
fn verbose_without_stack_is_plain() {
    let err = with_message(new("test"), 500, "message");
    assert_eq!(format!("{:?}", err), "[500] test\nmessage");
}

#[test]
fn find_reaches_every_layer_kind() {
    let err = wrap(quota("acme"), 429, "reserve");
    assert!(err.find::<errorx_code::WithStack>().is_some());
    assert!(err.find::<errorx_code::WithMessage>().is_some());
    assert_eq!(err.find::<CodedError>().map(CodedError::code), Some(429));
    assert_eq!(err.find::<QuotaError>(), Some(&quota("acme")));
    assert!(err.find::<PlainError>().is_none());
}

#[test]
fn question_mark_converts_foreign_errors() {
    fn open() -> errorx_code::Result<()> {
        let opened: Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        opened?;
        Ok(())
    }

    let err = open().unwrap_err();
    assert_eq!(err.to_string(), "no such file");
    assert_eq!(code(Some(&err)), errorx_code::default_code());
    assert!(err.source().is_none());
}

#[test]
fn errors_cross_threads() {
    let err = wrap(new("test"), 500, "ctx");
    let rendered = std::thread::spawn(move || err.to_string()).join().unwrap();
    assert_eq!(rendered, "ctx: [500] test");
}

#[derive(Debug, thiserror::Error)]
#[error("http status {0}")]
struct HttpError(i32);

impl CodeProvider for HttpError {
    fn code(&self) -> i32 {
        self.0
    }
}

#[test]
fn foreign_code_provider_is_a_code_bearing_link() {
    register_code_provider::<HttpError>();

    assert_eq!(code_of(&HttpError(418)), 418);
    assert_eq!(CodeResolver::new(0).code(Some(&HttpError(418).into())), 418);
    assert!(with_code(new("x"), 418).is(&HttpError(418)));
    assert!(!with_code(new("x"), 419).is(&HttpError(418)));

    let err = with_message(HttpError(418), 500, "brew");
    assert_eq!(code(Some(&err)), 500);
    assert_eq!(code(Some(&Error::from_provider(HttpError(503)))), 503);
    assert_eq!(cause(&err).downcast_ref::<HttpError>().map(|e| e.0), Some(418));
}

#[test]
fn verbose_leaf_lists_its_sources() {
    let leaf = Error::from_anyhow(anyhow::anyhow!("disk").context("load"));
    let err = with_message(leaf, 1, "ctx");
    assert_eq!(format!("{:?}", err), "[1] disk\nload\nctx");
}

//! Request body decoding.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use otelnote_core::error::ClientCode;
use otelnote_core::protocol::{ErrorBody, NoteBody, NoteIdBody};
use otelnote_core::{NoteError, NoteId};

#[test]
fn decode_min() {
    let body = NoteBody::decode(br#"{"content":"Sample Text 1"}"#).unwrap();
    assert_eq!(body.content, "Sample Text 1");
}

#[test]
fn decode_ignores_extra_fields() {
    let body = NoteBody::decode(br#"{"content":"x","title":"ignored"}"#).unwrap();
    assert_eq!(body.content, "x");
}

#[test]
fn missing_content_is_bad_request() {
    let err = NoteBody::decode(br#"{"text":"x"}"#).expect_err("must fail");
    assert_eq!(err.client_code(), ClientCode::BadRequest);
}

#[test]
fn non_string_content_is_bad_request() {
    for raw in [&br#"{"content":12}"#[..], br#"{"content":null}"#, br#"["content"]"#] {
        let err = NoteBody::decode(raw).expect_err("must fail");
        assert_eq!(err.client_code(), ClientCode::BadRequest);
    }
}

#[test]
fn array_body_is_bad_request() {
    for raw in [&br#"["hello"]"#[..], br#"[{"content":"x"}]"#, br#""content""#, b"42"] {
        let err = NoteBody::decode(raw).expect_err("non-object body must fail");
        assert_eq!(err.client_code(), ClientCode::BadRequest);
    }
}

#[test]
fn empty_and_garbage_bodies_are_bad_request() {
    assert!(matches!(NoteBody::decode(b""), Err(NoteError::BadRequest(_))));
    assert!(matches!(NoteBody::decode(b"{not json"), Err(NoteError::BadRequest(_))));
}

#[test]
fn id_body_is_a_plain_integer() {
    let s = serde_json::to_string(&NoteIdBody { id: NoteId(7) }).unwrap();
    assert_eq!(s, r#"{"id":7}"#);
}

#[test]
fn error_body_uses_client_code() {
    let body = ErrorBody::from(&NoteError::NotFound("9".into()));
    assert_eq!(body.error, "NOT_FOUND");
    assert_eq!(body.message, "note not found: 9");
}

//! Classification of Sync API responses.
//!
//! # Design
//! The Sync API mixes transport-level success with operation-level failure: a
//! batch of commands can come back as HTTP 200 with some commands applied and
//! others rejected in `sync_status`. A 200 therefore only counts as success
//! once every `sync_status` entry is the literal `"ok"`.
//!
//! Non-200 statuses the API documents carry an error payload in the body and
//! map to an [`ErrorKind`]. Any other status is reported as `UNKNOWN_ERROR`
//! without looking at the body.
//!
//! `sync_status` is walked in key order. Which failing command is reported
//! when several fail is not meaningful; only that some failure is reported.

use serde_json::{Map, Value};

use crate::error::{ApiError, Error, ErrorKind, ErrorPayload, UNKNOWN_ERROR_TAG};
use crate::http::HttpResponse;

/// `sync_status` value of a command that was applied.
pub const SYNC_OK: &str = "ok";

const HTTP_OK: u16 = 200;

/// Decide whether a response is a success.
///
/// Returns [`Error::Api`] when the server reported an error and
/// [`Error::Decode`] when the body needed to make that decision is malformed.
pub fn check_response(response: &HttpResponse) -> Result<(), Error> {
    let status = response.status;
    let body = response.body.as_slice();

    if status == HTTP_OK {
        return check_sync_status(body);
    }

    match ErrorKind::from_status(status) {
        Some(kind) => {
            let payload: ErrorPayload = serde_json::from_slice(body).map_err(Error::Decode)?;
            Err(payload.into_api_error(kind, status, None).into())
        }
        None => Err(ApiError::unknown(status).into()),
    }
}

fn check_sync_status(body: &[u8]) -> Result<(), Error> {
    if is_blank(body) {
        return Ok(());
    }

    // Only an object carries `sync_status`; list endpoints answer with a bare
    // array.
    let envelope: Value = serde_json::from_slice(body).map_err(Error::Decode)?;
    let statuses = match envelope {
        Value::Object(mut fields) => match fields.remove("sync_status") {
            Some(Value::Object(statuses)) => statuses,
            _ => return Ok(()),
        },
        _ => return Ok(()),
    };

    let mut statuses: Vec<(String, Value)> = statuses.into_iter().collect();
    statuses.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (command_id, result) in statuses {
        if result.as_str() == Some(SYNC_OK) {
            continue;
        }
        return Err(sync_error(command_id, result)?.into());
    }
    Ok(())
}

/// Build the error for a failed command. An object is the regular error
/// payload; anything else that is not `"ok"` is still a failure and is kept
/// verbatim as the message.
fn sync_error(command_id: String, result: Value) -> Result<ApiError, Error> {
    match result {
        Value::Object(_) => {
            let payload: ErrorPayload = serde_json::from_value(result).map_err(Error::Decode)?;
            Ok(payload.into_api_error(ErrorKind::Sync, HTTP_OK, Some(command_id)))
        }
        other => Ok(ApiError {
            kind: ErrorKind::Sync,
            tag: UNKNOWN_ERROR_TAG.to_string(),
            code: None,
            message: other.to_string(),
            http_code: HTTP_OK,
            extra: Map::new(),
            command_id: Some(command_id),
        }),
    }
}

pub(crate) fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse::new(status, body)
    }

    fn api_error(result: Result<(), Error>) -> ApiError {
        match result {
            Err(Error::Api(err)) => err,
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[test]
    fn ok_without_sync_status_is_success() {
        let resp = response(200, r#"{"projects":[{"id":1,"name":"Inbox"}],"full_sync":true}"#);
        assert!(check_response(&resp).is_ok());
    }

    #[test]
    fn ok_with_unrelated_content_is_success() {
        assert!(check_response(&response(200, r#"{"test":"hi"}"#)).is_ok());
    }

    #[test]
    fn ok_with_empty_body_is_success() {
        assert!(check_response(&response(200, "")).is_ok());
        assert!(check_response(&response(200, "  \n")).is_ok());
    }

    #[test]
    fn ok_with_all_commands_ok_is_success() {
        let resp = response(200, r#"{"sync_status":{"a":"ok","b":"ok"}}"#);
        assert!(check_response(&resp).is_ok());
    }

    #[test]
    fn ok_with_empty_sync_status_is_success() {
        assert!(check_response(&response(200, r#"{"sync_status":{}}"#)).is_ok());
    }

    #[test]
    fn failed_command_becomes_sync_error() {
        let resp = response(
            200,
            r#"{
                "sync_status": {
                    "ed1ce597-e4c7-4a88-ba48-e048d827c067": "ok",
                    "bf1ce597-e4c7-4a88-ba48-e048d827c067": {
                        "error_code": 20,
                        "error": "Project not found",
                        "error_tag": "PROJECT_NOT_FOUND",
                        "http_code": 404,
                        "error_extra": {"event_id": "abc"}
                    }
                }
            }"#,
        );
        let err = api_error(check_response(&resp));
        assert_eq!(err.kind, ErrorKind::Sync);
        assert_eq!(
            err.command_id.as_deref(),
            Some("bf1ce597-e4c7-4a88-ba48-e048d827c067")
        );
        assert_eq!(err.tag, "PROJECT_NOT_FOUND");
        assert_eq!(err.code, Some(20));
        assert_eq!(err.message, "Project not found");
        assert_eq!(err.http_code, 404);
        assert_eq!(err.extra["event_id"], "abc");
    }

    #[test]
    fn one_of_several_failures_is_reported() {
        let resp = response(
            200,
            r#"{"sync_status":{"a":{"error_tag":"A"},"b":"ok","c":{"error_tag":"C"}}}"#,
        );
        let err = api_error(check_response(&resp));
        let id = err.command_id.clone().unwrap();
        assert!(id == "a" || id == "c");
        assert_eq!(err.tag, id.to_uppercase());
    }

    #[test]
    fn non_ok_string_is_a_failure() {
        let err = api_error(check_response(&response(200, r#"{"sync_status":{"a":"failed"}}"#)));
        assert_eq!(err.kind, ErrorKind::Sync);
        assert_eq!(err.tag, UNKNOWN_ERROR_TAG);
        assert_eq!(err.message, r#""failed""#);
        assert_eq!(err.http_code, 200);
    }

    #[test]
    fn array_status_is_a_failure() {
        let err = api_error(check_response(&response(200, r#"{"sync_status":{"a":["ok"]}}"#)));
        assert_eq!(err.command_id.as_deref(), Some("a"));
        assert_eq!(err.message, r#"["ok"]"#);
    }

    #[test]
    fn sync_error_without_http_code_defaults_to_ok_status() {
        let err = api_error(check_response(&response(
            200,
            r#"{"sync_status":{"a":{"error_tag":"INVALID_COMMAND","error":"Unknown command"}}}"#,
        )));
        assert_eq!(err.http_code, 200);
        assert_eq!(err.message, "Unknown command");
    }

    #[test]
    fn malformed_sync_error_payload_is_a_decode_error() {
        let resp = response(200, r#"{"sync_status":{"a":{"error_code":"not a number"}}}"#);
        assert!(matches!(check_response(&resp), Err(Error::Decode(_))));
    }

    #[test]
    fn ok_with_array_body_is_success() {
        assert!(check_response(&response(200, "[]")).is_ok());
        assert!(check_response(&response(200, r#"[{"id":3,"name":"Old"}]"#)).is_ok());
        assert!(check_response(&response(200, r#"[{"id":3},{"id":4}]"#)).is_ok());
    }

    #[test]
    fn non_object_sync_status_is_ignored() {
        assert!(check_response(&response(200, r#"{"sync_status":null}"#)).is_ok());
        assert!(check_response(&response(200, r#"{"sync_status":["x"]}"#)).is_ok());
    }

    #[test]
    fn ok_with_garbage_body_is_a_decode_error() {
        assert!(matches!(
            check_response(&response(200, "<html>")),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn forbidden_carries_server_tag() {
        let resp = response(
            403,
            r#"{
                "error_tag": "AUTH_CSRF_ERROR",
                "error_code": 0,
                "http_code": 403,
                "error_extra": {"retry_after": 2, "access_type": "web_session"},
                "error": "AUTH_CSRF_ERROR"
            }"#,
        );
        let err = api_error(check_response(&resp));
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.tag, "AUTH_CSRF_ERROR");
        assert_eq!(err.code, Some(0));
        assert_eq!(err.http_code, 403);
        assert_eq!(err.extra["access_type"], "web_session");
        assert_eq!(err.command_id, None);
    }

    #[test]
    fn documented_statuses_map_to_kinds() {
        let cases = [
            (400, ErrorKind::BadRequest),
            (401, ErrorKind::Unauthorized),
            (403, ErrorKind::Forbidden),
            (404, ErrorKind::NotFound),
            (429, ErrorKind::TooManyRequests),
            (500, ErrorKind::Internal),
            (503, ErrorKind::Unavailable),
        ];
        for (status, kind) in cases {
            let body = format!(r#"{{"error_tag":"TAG","error":"message","http_code":{status}}}"#);
            let err = api_error(check_response(&response(status, &body)));
            assert_eq!(err.kind, kind, "status {status}");
            assert_eq!(err.http_code, status);
        }
    }

    #[test]
    fn unknown_status_does_not_read_body() {
        let err = api_error(check_response(&response(418, "not json at all")));
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.tag, "UNKNOWN_ERROR");
        assert_eq!(err.message, "Unknown error occurred.");
        assert_eq!(err.http_code, 418);
        assert!(err.extra.is_empty());
    }

    #[test]
    fn truncated_error_body_is_a_decode_error() {
        assert!(matches!(
            check_response(&response(400, "{")),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn empty_error_body_is_a_decode_error() {
        assert!(matches!(
            check_response(&response(500, "")),
            Err(Error::Decode(_))
        ));
    }
}

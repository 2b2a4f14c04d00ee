use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::DeskError;
use crate::types::account::{Credentials, CredentialsPayload};

/// Extracts and validates `{identifier, secret}` from a JSON body.
///
/// The content type is not enforced; any body that parses as a JSON object is accepted.
/// Missing, empty or non-string fields are rejected with `VALIDATION_ERROR` before any
/// handler or storage code runs.
pub struct CredentialsBody(pub Credentials);

impl<S> FromRequest<S> for CredentialsBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = match Bytes::from_request(req, state).await {
            Ok(b) => b,
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(DeskError::PayloadTooLarge.into_response());
            }
            Err(rejection) => return Err(rejection.into_response()),
        };

        parse_credentials(&body)
            .map(CredentialsBody)
            .map_err(IntoResponse::into_response)
    }
}

pub fn parse_credentials(body: &[u8]) -> Result<Credentials, DeskError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| DeskError::Validation("request body must be a JSON object".to_string()))?;
    if !value.is_object() {
        return Err(DeskError::Validation(
            "request body must be a JSON object".to_string(),
        ));
    }

    let payload: CredentialsPayload = serde_json::from_value(value)
        .map_err(|e| DeskError::Validation(format!("malformed request body: {e}")))?;

    let identifier = required_string(payload.identifier, "identifier")?;
    let secret = required_string(payload.secret, "secret")?;
    Ok(Credentials::new(identifier, secret))
}

fn required_string(field: Option<Value>, name: &str) -> Result<String, DeskError> {
    match field {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            Err(DeskError::Validation(format!("missing required field `{name}`")))
        }
        Some(_) => Err(DeskError::Validation(format!("field `{name}` must be a string"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(err: DeskError) -> String {
        match err {
            DeskError::Validation(r) => r,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_canonical_and_legacy_field_names() {
        let c = parse_credentials(br#"{"identifier":"alice","secret":"pw1"}"#).unwrap();
        assert_eq!(c.identifier, "alice");
        assert_eq!(c.secret(), "pw1");

        let c = parse_credentials(br#"{"username":"bob","password":"pw2"}"#).unwrap();
        assert_eq!(c.identifier, "bob");
        assert_eq!(c.secret(), "pw2");
    }

    #[test]
    fn missing_or_empty_fields_are_validation_errors() {
        let r = reason(parse_credentials(br#"{"secret":"pw"}"#).unwrap_err());
        assert!(r.contains("identifier"));

        let r = reason(parse_credentials(br#"{"identifier":"alice"}"#).unwrap_err());
        assert!(r.contains("secret"));

        let r = reason(parse_credentials(br#"{"identifier":"","secret":"pw"}"#).unwrap_err());
        assert!(r.contains("identifier"));

        let r = reason(parse_credentials(br#"{"identifier":"a","secret":null}"#).unwrap_err());
        assert!(r.contains("secret"));
    }

    #[test]
    fn non_object_or_non_string_bodies_are_rejected() {
        reason(parse_credentials(b"").unwrap_err());
        reason(parse_credentials(b"not json").unwrap_err());
        reason(parse_credentials(br#"["alice","pw"]"#).unwrap_err());
        let r = reason(parse_credentials(br#"{"identifier":42,"secret":"pw"}"#).unwrap_err());
        assert!(r.contains("must be a string"));
    }

    #[test]
    fn whitespace_is_not_trimmed() {
        let c = parse_credentials(br#"{"identifier":" ","secret":" "}"#).unwrap();
        assert_eq!(c.identifier, " ");
    }

    #[test]
    fn debug_never_prints_secret() {
        let c = Credentials::new("alice", "hunter2");
        let rendered = format!("{c:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}

//! Contact payload parsing and validation

use regex::Regex;
use std::sync::OnceLock;

use super::error::FieldError;

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_INVALID: &str = "Valid email is required";
pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const BODY_INVALID: &str = "Request body must be a JSON object or form data";

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Fields as they arrived; non-string values are dropped to `None`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Decode a request body into raw fields.
///
/// `application/json` (and `+json`) bodies are decoded as JSON and
/// `application/x-www-form-urlencoded` bodies as form data. Bodies of any
/// other or missing type are ignored, as is an empty body: no fields at all,
/// so every field is reported as missing by [`validate`].
pub fn parse_body(body: &[u8], content_type: Option<&str>) -> Result<RawSubmission, FieldError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RawSubmission::default());
    }

    match content_type.map(media_type) {
        Some(BodyKind::Json) => parse_json(body),
        Some(BodyKind::Form) => Ok(parse_form(body)),
        Some(BodyKind::Other) | None => Ok(RawSubmission::default()),
    }
}

enum BodyKind {
    Json,
    Form,
    Other,
}

fn media_type(content_type: &str) -> BodyKind {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json")) {
        BodyKind::Json
    } else if essence == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

fn parse_json(body: &[u8]) -> Result<RawSubmission, FieldError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| FieldError::new("body", BODY_INVALID))?;
    let Some(object) = value.as_object() else {
        return Err(FieldError::new("body", BODY_INVALID));
    };

    let field = |key: &str| {
        object
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string)
    };

    Ok(RawSubmission {
        name: field("name"),
        email: field("email"),
        message: field("message"),
    })
}

fn parse_form(body: &[u8]) -> RawSubmission {
    let mut raw = RawSubmission::default();
    for (key, value) in url::form_urlencoded::parse(body) {
        let slot = match key.as_ref() {
            "name" => &mut raw.name,
            "email" => &mut raw.email,
            "message" => &mut raw.message,
            _ => continue,
        };
        // First occurrence wins
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }
    raw
}

/// Validate raw fields, collecting one error per invalid field
pub fn validate(raw: RawSubmission) -> Result<ContactSubmission, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = raw.name.filter(|n| !n.is_empty());
    if name.is_none() {
        errors.push(FieldError::new("name", NAME_REQUIRED));
    }

    let email = raw.email.filter(|e| is_valid_email(e));
    if email.is_none() {
        errors.push(FieldError::new("email", EMAIL_INVALID));
    }

    let message = raw.message.filter(|m| !m.is_empty());
    if message.is_none() {
        errors.push(FieldError::new("message", MESSAGE_REQUIRED));
    }

    match (name, email, message) {
        (Some(name), Some(email), Some(message)) => Ok(ContactSubmission {
            name,
            email,
            message,
        }),
        _ => Err(errors),
    }
}

/// Check email syntax.
///
/// Local part: letters, digits and `_'+-.`, not starting with a dot and not
/// ending in one. Domain: dot-separated labels starting with an
/// alphanumeric, ending in a TLD of at least two letters. No `..` anywhere.
pub fn is_valid_email(email: &str) -> bool {
    let pattern = EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
            .expect("email pattern is a valid regex")
    });

    !email.starts_with('.') && !email.contains("..") && pattern.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, email: &str, message: &str) -> RawSubmission {
        RawSubmission {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[test]
    fn test_valid_emails() {
        for email in [
            "ann@example.com",
            "first.last@sub.example.co",
            "o'brien+tag@example.io",
            "a_b-c@my-host.org",
        ] {
            assert!(is_valid_email(email), "expected valid: {email}");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "bad-email",
            "ann@",
            "@example.com",
            ".ann@example.com",
            "ann.@example.com",
            "ann..lee@example.com",
            "ann@example",
            "ann@example.c",
            "ann@-example.com",
            "ann@@example.com",
            "ann example@example.com",
        ] {
            assert!(!is_valid_email(email), "expected invalid: {email}");
        }
    }

    #[test]
    fn test_validate_accepts_complete_submission() {
        let submission = validate(raw("Ann", "ann@example.com", "hi")).unwrap();
        assert_eq!(submission.name, "Ann");
        assert_eq!(submission.email, "ann@example.com");
        assert_eq!(submission.message, "hi");
    }

    #[test]
    fn test_validate_reports_bad_email_only() {
        let errors = validate(raw("Ann", "bad-email", "hi")).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("email", EMAIL_INVALID)]);
    }

    #[test]
    fn test_validate_reports_every_missing_field_in_order() {
        let errors = validate(RawSubmission::default()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
    }

    #[test]
    fn test_validate_does_not_trim() {
        // Whitespace counts as content for name and message
        assert!(validate(raw(" ", "ann@example.com", " ")).is_ok());
        assert!(validate(raw("Ann", " ann@example.com", "hi")).is_err());
    }

    #[test]
    fn test_parse_json_drops_non_string_values() {
        let parsed = parse_body(
            br#"{"name": 42, "email": "ann@example.com", "message": null}"#,
            Some("application/json"),
        )
        .unwrap();
        assert_eq!(parsed.name, None);
        assert_eq!(parsed.email.as_deref(), Some("ann@example.com"));
        assert_eq!(parsed.message, None);
    }

    #[test]
    fn test_parse_rejects_non_object_json() {
        let err = parse_body(b"[1, 2, 3]", Some("application/json")).unwrap_err();
        assert_eq!(err.field, "body");
        assert!(parse_body(b"{not json", Some("application/json; charset=utf-8")).is_err());
    }

    #[test]
    fn test_parse_empty_body_yields_no_fields() {
        assert_eq!(parse_body(b"", None).unwrap(), RawSubmission::default());
        assert_eq!(parse_body(b"  \n", None).unwrap(), RawSubmission::default());
    }

    #[test]
    fn test_parse_json_media_types() {
        let body = br#"{"name": "Ann", "email": "ann@example.com", "message": "hi"}"#;
        let expected = raw("Ann", "ann@example.com", "hi");
        assert_eq!(parse_body(body, Some("Application/JSON")).unwrap(), expected);
        assert_eq!(parse_body(body, Some("application/merge-patch+json")).unwrap(), expected);
    }

    #[test]
    fn test_parse_ignores_other_content_types() {
        let body = br#"{"name": "Ann", "email": "ann@example.com", "message": "hi"}"#;
        assert_eq!(parse_body(body, Some("text/plain")).unwrap(), RawSubmission::default());
        assert_eq!(parse_body(body, None).unwrap(), RawSubmission::default());
        assert_eq!(parse_body(b"{not json", None).unwrap(), RawSubmission::default());
    }

    #[test]
    fn test_parse_form_body() {
        let parsed = parse_body(
            b"name=Ann+Lee&email=ann%40example.com&message=hello%21&name=ignored",
            Some("application/x-www-form-urlencoded; charset=UTF-8"),
        )
        .unwrap();
        assert_eq!(parsed, raw("Ann Lee", "ann@example.com", "hello!"));
    }
}

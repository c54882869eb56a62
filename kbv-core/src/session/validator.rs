//! Inbound event validation
//!
//! Checks run in a fixed order and the first failure wins. Callers rely on
//! the order to know which single message a malformed event produces.

use serde_json::{Map, Value};

use super::{SessionContext, SessionRecord};
use crate::error::{SessionRecordError, ValidationError};

/// Attributes the session record must carry, in check order
pub const SESSION_RECORD_FIELDS: [&str; 11] = [
    "sessionId",
    "expiryDate",
    "clientIpAddress",
    "redirectUri",
    "clientSessionId",
    "createdDate",
    "clientId",
    "subject",
    "persistentSessionId",
    "attemptCount",
    "state",
];

/// Validate a raw fetch-questions event into a [`SessionContext`]
pub fn validate_event(event: &Value) -> Result<SessionContext, ValidationError> {
    let event = event.as_object().ok_or(ValidationError::EmptyEvent)?;

    let session_id = text(event.get("sessionId")).ok_or(ValidationError::MissingSessionId)?;
    let session_item =
        present(event.get("sessionItem")).ok_or(ValidationError::MissingSessionItem)?;

    let parameters = present(event.get("parameters")).ok_or(ValidationError::MissingParameters)?;
    let questions_url =
        wrapped_text(parameters, "url").ok_or(ValidationError::MissingQuestionsUrl)?;
    let user_agent =
        wrapped_text(parameters, "userAgent").ok_or(ValidationError::MissingUserAgent)?;

    let bearer_token = present(event.get("bearerToken"))
        .and_then(|token| text(token.get("value")))
        .ok_or(ValidationError::MissingBearerToken)?;

    let person = present(event.get("personIdentityItem"))
        .ok_or(ValidationError::MissingPersonIdentityItem)?;
    let nino = text(person.get("nino")).ok_or(ValidationError::MissingNino)?;

    let record = parse_session_record(session_item)?;

    Ok(SessionContext {
        session_id: session_id.to_string(),
        session_ttl: record.expiry_date,
        questions_url: questions_url.to_string(),
        user_agent: user_agent.to_string(),
        bearer_token: bearer_token.to_string(),
        nino: nino.to_string(),
        session_item: record,
    })
}

/// Parse the `sessionItem.Item` attribute map into a typed record
fn parse_session_record(session_item: &Value) -> Result<SessionRecord, SessionRecordError> {
    let item = session_item
        .get("Item")
        .and_then(Value::as_object)
        .ok_or(SessionRecordError::MissingAttribute("Item"))?;

    // Presence first so a missing field is reported ahead of a bad number
    if let Some(missing) = SESSION_RECORD_FIELDS
        .iter()
        .find(|field| attribute(item, field).is_none())
    {
        return Err(SessionRecordError::MissingAttribute(*missing));
    }

    let expiry_date = number_attribute(item, "expiryDate")?;
    if expiry_date <= 0 {
        return Err(SessionRecordError::InvalidExpiry);
    }

    Ok(SessionRecord {
        session_id: string_attribute(item, "sessionId")?,
        expiry_date,
        client_ip_address: string_attribute(item, "clientIpAddress")?,
        redirect_uri: string_attribute(item, "redirectUri")?,
        client_session_id: string_attribute(item, "clientSessionId")?,
        created_date: number_attribute(item, "createdDate")?,
        client_id: string_attribute(item, "clientId")?,
        subject: string_attribute(item, "subject")?,
        persistent_session_id: string_attribute(item, "persistentSessionId")?,
        attempt_count: number_attribute(item, "attemptCount")?,
        state: string_attribute(item, "state")?,
    })
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn text(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Read `parent.<key>.value` as a non-empty string
fn wrapped_text<'a>(parent: &'a Value, key: &str) -> Option<&'a str> {
    text(parent.get(key).and_then(|wrapper| wrapper.get("value")))
}

fn string_attribute(
    item: &Map<String, Value>,
    field: &'static str,
) -> Result<String, SessionRecordError> {
    attribute(item, field).ok_or(SessionRecordError::MissingAttribute(field))
}

fn number_attribute(
    item: &Map<String, Value>,
    field: &'static str,
) -> Result<i64, SessionRecordError> {
    string_attribute(item, field)?
        .trim()
        .parse::<i64>()
        .map_err(|_| SessionRecordError::NotANumber(field))
}

/// Accepts `{"S": ..}` / `{"N": ..}` attribute values as well as bare scalars
fn attribute(item: &Map<String, Value>, field: &str) -> Option<String> {
    match item.get(field)? {
        Value::Object(typed) => typed.get("S").or_else(|| typed.get("N")).and_then(scalar),
        other => scalar(other),
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

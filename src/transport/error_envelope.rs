use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::domain::{ErrorEnvelope, FieldError};

#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorEnvelopeJson {
    #[serde(default, deserialize_with = "lenient")]
    code: i64,
    #[serde(default, deserialize_with = "lenient")]
    message: String,
    #[serde(default, deserialize_with = "lenient")]
    uuid: String,
    #[serde(default, deserialize_with = "lenient")]
    object: String,
    #[serde(default, deserialize_with = "lenient")]
    cause: String,
    #[serde(default, deserialize_with = "lenient")]
    status: String,
    #[serde(default, deserialize_with = "lenient")]
    errors: Vec<FieldErrorJson>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FieldErrorJson {
    #[serde(default, deserialize_with = "lenient")]
    location: String,
    #[serde(default, deserialize_with = "lenient")]
    name: String,
    #[serde(default, deserialize_with = "lenient")]
    description: String,
}

/// A field of the wrong JSON type (or `null`) decodes to its default instead of
/// failing the whole envelope.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Decode the error body of a non-2xx response.
///
/// Bodies that are not a JSON envelope (empty, HTML from a proxy, ...) decode to an empty
/// envelope so the caller still gets an error keyed on the HTTP status. Individual fields
/// of an unexpected type are dropped; the rest of the envelope is kept.
pub fn decode_error_envelope(body: &str) -> ErrorEnvelope {
    let parsed: ErrorEnvelopeJson = serde_json::from_str(body).unwrap_or_default();
    ErrorEnvelope {
        code: parsed.code,
        message: parsed.message,
        uuid: parsed.uuid,
        object: parsed.object,
        cause: parsed.cause,
        status: parsed.status,
        errors: parsed
            .errors
            .into_iter()
            .map(|it| FieldError {
                location: it.location,
                name: it.name,
                description: it.description,
            })
            .collect(),
    }
}

/// Human readable description of an API failure.
///
/// Preference order: the envelope `message` (prefixed with the status), then the
/// field errors as `name: description` pairs, then the bare status code.
pub fn describe_api_error(status: u16, envelope: &ErrorEnvelope) -> String {
    if !envelope.message.is_empty() {
        return format!("{status}: {}", envelope.message);
    }
    if !envelope.errors.is_empty() {
        return envelope
            .errors
            .iter()
            .map(|it| format!("{}: {}", it.name, it.description))
            .collect::<Vec<_>>()
            .join(", ");
    }
    status.to_string()
}

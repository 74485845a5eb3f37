use std::fmt;

use serde_json::Value;

use crate::error::{ProximaError, Result};
use crate::transport::HttpResponse;

/// Read-only view over a chat completion payload
///
/// Every field falls back to an empty string or zero when the payload omits
/// it, so construction never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximaResponse {
    text: String,
    model: String,
    id: String,
    finish_reason: String,
    response_time_ms: u64,
    provider: String,
    function: String,
    raw: Value,
}

impl ProximaResponse {
    /// Project a raw payload
    pub fn from_value(raw: Value) -> Self {
        let first_choice = raw
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first());
        let message = first_choice.and_then(|choice| choice.get("message"));
        let proxima = raw.get("proxima");

        let text = field(message, "content").unwrap_or_default();
        let model = field(Some(&raw), "model")
            .or_else(|| field(first_choice, "model"))
            .unwrap_or_default();
        let provider = field(proxima, "provider").unwrap_or_else(|| model.clone());

        Self {
            text,
            id: field(Some(&raw), "id").unwrap_or_default(),
            finish_reason: field(first_choice, "finish_reason").unwrap_or_default(),
            response_time_ms: proxima
                .and_then(|proxima| proxima.get("responseTimeMs"))
                .and_then(millis)
                .unwrap_or_default(),
            provider,
            function: field(Some(&raw), "function").unwrap_or_default(),
            model,
            raw,
        }
    }

    /// Generated text of the first choice
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Model that answered
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Completion identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Why generation stopped
    pub fn finish_reason(&self) -> &str {
        &self.finish_reason
    }

    /// Gateway-measured latency in milliseconds
    pub const fn response_time_ms(&self) -> u64 {
        self.response_time_ms
    }

    /// Provider that served the request, or the model when unreported
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Server function that handled the call
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Full payload
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    /// Take the full payload
    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl From<Value> for ProximaResponse {
    fn from(raw: Value) -> Self {
        Self::from_value(raw)
    }
}

impl fmt::Display for ProximaResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// String-ish field of an optional object
fn field(object: Option<&Value>, key: &str) -> Option<String> {
    match object?.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn millis(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .map(|ms| ms.round() as u64)
    })
}

// -- Interpretation --

/// Turn a chat response into a view, or an API error for any status but 200
///
/// # Errors
///
/// Returns `Api` for non-200 statuses and `MalformedResponse` when a 200
/// body is not JSON
pub fn interpret_chat(response: &HttpResponse) -> Result<ProximaResponse> {
    if response.status != 200 {
        return Err(api_error(response));
    }

    let raw: Value = serde_json::from_slice(&response.body)?;
    Ok(ProximaResponse::from_value(raw))
}

/// Parse an auxiliary response body regardless of status
///
/// # Errors
///
/// Returns `MalformedResponse` when the body is not JSON
pub fn interpret_raw(response: &HttpResponse) -> Result<Value> {
    serde_json::from_slice(&response.body).map_err(Into::into)
}

/// Build the error for a non-200 chat response
fn api_error(response: &HttpResponse) -> ProximaError {
    let message = response
        .is_json()
        .then(|| serde_json::from_slice::<Value>(&response.body).ok())
        .flatten()
        .and_then(|body| {
            body.get("error")
                .and_then(|error| error.get("message"))
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| format!("API error: {}", response.status));

    ProximaError::Api {
        status: response.status,
        message,
    }
}

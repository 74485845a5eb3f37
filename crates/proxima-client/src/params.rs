//! Request parameter normalization
//!
//! Merges the message, the model and function selectors, and an open set of
//! pass-through parameters into the flat body `POST /v1/chat/completions`
//! expects. Unset values never reach the wire.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ProximaError, Result};
use crate::types::{CodeAction, Function};

/// Spelling callers may use for the `from` wire field
pub const FROM_LANG: &str = "from_lang";

/// Keys owned by the named selectors
const RESERVED_KEYS: [&str; 3] = ["model", "message", "function"];

/// Flat JSON body for one chat call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RequestBody(Map<String, Value>);

impl RequestBody {
    /// Value for a wire key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether a wire key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Resolved model identifier
    pub fn model(&self) -> &str {
        self.0.get("model").and_then(Value::as_str).unwrap_or_default()
    }

    /// Borrow the underlying map
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a JSON object
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Arguments for one chat call
///
/// ```
/// use proxima_client::{ChatParams, Function};
///
/// let params = ChatParams::new("Hello world")
///     .model("gemini")
///     .function(Function::Translate)
///     .param("to", "Hindi")
///     .from_lang("English");
///
/// let body = params.into_body("auto");
/// assert_eq!(body.get("from").unwrap(), "English");
/// assert!(!body.contains_key("from_lang"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatParams {
    message: Option<String>,
    model: Option<String>,
    function: Option<Function>,
    extra: Map<String, Value>,
}

impl ChatParams {
    /// Start a call with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Web search for `query`
    pub fn search(query: impl Into<String>) -> Self {
        Self::new(query).function(Function::Search)
    }

    /// Translate `text` into `to`
    pub fn translate(text: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(text)
            .function(Function::Translate)
            .param("to", Value::String(to.into()))
    }

    /// Brainstorm around `topic`
    pub fn brainstorm(topic: impl Into<String>) -> Self {
        Self::new(topic).function(Function::Brainstorm)
    }

    /// Code call with the given action
    ///
    /// Add `language`, `code` or `error` with [`ChatParams::param`].
    pub fn code(action: CodeAction) -> Self {
        Self::default()
            .function(Function::Code)
            .param("action", action.as_str())
    }

    /// Analyze the page at `url`
    pub fn analyze(url: impl Into<String>) -> Self {
        Self::default()
            .function(Function::Analyze)
            .param("url", Value::String(url.into()))
    }

    /// Set or replace the message
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Select a model instead of the configured default
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Select a server-side function
    #[must_use]
    pub fn function(mut self, function: impl Into<Function>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Add a pass-through parameter
    ///
    /// `None` and `null` values mark the parameter as unset.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Add a pass-through parameter from any serializable value
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON
    pub fn try_param(mut self, key: impl Into<String>, value: &impl Serialize) -> Result<Self> {
        let key = key.into();
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(source) => return Err(ProximaError::InvalidParameter { key, source }),
        };

        self.extra.insert(key, value);
        Ok(self)
    }

    /// Merge a map of pass-through parameters
    #[must_use]
    pub fn params(mut self, params: Map<String, Value>) -> Self {
        self.extra.extend(params);
        self
    }

    /// Source language for translations, sent as `from`
    #[must_use]
    pub fn from_lang(self, language: impl Into<String>) -> Self {
        self.param(FROM_LANG, Value::String(language.into()))
    }

    /// Pass-through parameters as supplied
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Build the wire body
    ///
    /// `default_model` is used when no model, or an empty one, was selected.
    pub fn into_body(self, default_model: &str) -> RequestBody {
        let mut body = Map::new();

        let model = self
            .model
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| default_model.to_owned());
        body.insert("model".to_owned(), Value::String(model));

        if let Some(message) = self.message.filter(|message| !message.is_empty()) {
            body.insert("message".to_owned(), Value::String(message));
        }

        if let Some(function) = self.function.filter(|function| !function.as_str().is_empty()) {
            body.insert("function".to_owned(), Value::String(function.as_str().to_owned()));
        }

        for (key, value) in self.extra {
            if value.is_null() {
                continue;
            }

            if RESERVED_KEYS.contains(&key.as_str()) {
                tracing::warn!(key = %key, "ignoring pass-through parameter that shadows a named selector");
                continue;
            }

            let key = if key == FROM_LANG { "from".to_owned() } else { key };
            body.insert(key, value);
        }

        RequestBody(body)
    }
}

impl From<&str> for ChatParams {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ChatParams {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

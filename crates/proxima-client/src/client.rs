use serde_json::Value;

use crate::config::ClientConfig;
use crate::dispatcher::RequestDispatcher;
use crate::error::Result;
use crate::params::ChatParams;
use crate::response::{self, ProximaResponse};
use crate::transport::{Method, ReqwestTransport, Transport};

const CHAT_COMPLETIONS: &str = "/v1/chat/completions";
const MODELS: &str = "/v1/models";
const FUNCTIONS: &str = "/v1/functions";
const STATS: &str = "/v1/stats";
const NEW_CONVERSATION: &str = "/v1/conversations/new";

/// Typed client for the Proxima gateway
///
/// Every behavior goes through one endpoint; the model and function
/// selectors in [`ChatParams`] decide what the server does.
#[derive(Debug, Clone)]
pub struct ProximaClient<T = ReqwestTransport> {
    dispatcher: RequestDispatcher<T>,
}

impl ProximaClient {
    /// Create a client over HTTP
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.api_key())?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client for a gateway on `http://localhost:3210`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn local() -> Result<Self> {
        Self::new(ClientConfig::default())
    }
}

impl<T: Transport> ProximaClient<T> {
    /// Create a client over a custom transport
    pub const fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            dispatcher: RequestDispatcher::new(config, transport),
        }
    }

    /// Client configuration
    pub const fn config(&self) -> &ClientConfig {
        self.dispatcher.config()
    }

    // -- Chat --

    /// Send a message through the unified endpoint
    ///
    /// # Errors
    ///
    /// Returns a transport error once retries are spent, `Api` for a non-200
    /// status, or `MalformedResponse` if the body is not JSON
    pub async fn chat(&self, params: impl Into<ChatParams>) -> Result<ProximaResponse> {
        let config = self.dispatcher.config();
        let body = params.into().into_body(config.default_model());

        tracing::debug!(model = body.model(), function = ?body.get("function"), "sending chat request");

        let response = self
            .dispatcher
            .dispatch(Method::Post, CHAT_COMPLETIONS, Some(body.into_value()), config.chat_policy())
            .await?;

        response::interpret_chat(&response)
    }

    // -- System --

    /// List available models and their status
    ///
    /// Returns the `data` field as sent, or an empty array when it is
    /// missing or null.
    ///
    /// # Errors
    ///
    /// Returns a transport error or `MalformedResponse`
    pub async fn list_models(&self) -> Result<Value> {
        let mut value = self.get_raw(MODELS).await?;
        let data = value.get_mut("data").map(Value::take).filter(|data| !data.is_null());
        Ok(data.unwrap_or_else(|| Value::Array(Vec::new())))
    }

    /// Function catalog describing how to use the unified endpoint
    ///
    /// # Errors
    ///
    /// Returns a transport error or `MalformedResponse`
    pub async fn list_functions(&self) -> Result<Value> {
        self.get_raw(FUNCTIONS).await
    }

    /// Response time statistics per provider
    ///
    /// # Errors
    ///
    /// Returns a transport error or `MalformedResponse`
    pub async fn stats(&self) -> Result<Value> {
        self.get_raw(STATS).await
    }

    /// Start fresh conversations for all providers
    ///
    /// # Errors
    ///
    /// Returns a transport error or `MalformedResponse`
    pub async fn new_conversation(&self) -> Result<Value> {
        let response = self
            .dispatcher
            .dispatch(
                Method::Post,
                NEW_CONVERSATION,
                Some(Value::Object(serde_json::Map::new())),
                self.config().auxiliary_policy(),
            )
            .await?;

        response::interpret_raw(&response)
    }

    async fn get_raw(&self, path: &str) -> Result<Value> {
        let response = self
            .dispatcher
            .dispatch(Method::Get, path, None, self.config().auxiliary_policy())
            .await?;

        response::interpret_raw(&response)
    }
}

//! Transport adapter: posts form fields to an endpoint with a bounded timeout
//!
//! The session never talks HTTP directly. It hands a [`TransportRequest`] to
//! a [`Transport`] and gets back either the response body or a
//! [`TransportError`]. Response bodies are plain text consumed verbatim.

use async_trait::async_trait;
use std::time::Duration;

/// A request for one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Full URL of the endpoint
    pub url: String,
    /// Form fields, sent in order
    pub fields: Vec<(String, String)>,
    /// Expiry is reported as [`TransportError::Timeout`]
    pub timeout: Duration,
}

impl TransportRequest {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            fields: Vec::new(),
            timeout,
        }
    }

    /// Add a form field
    pub fn field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    /// Value of the first field named `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Why a request produced no usable body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with something other than 200
    Status(u16),
    /// Connection refused, reset, DNS failure, unreadable body...
    Network(String),
    /// No answer within the request's timeout
    Timeout(Duration),
}

impl TransportError {
    /// True for a non-success status, false for transport-level failures
    pub fn is_status(&self) -> bool {
        matches!(self, TransportError::Status(_))
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Status(code) => write!(f, "server responded with status {code}"),
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Timeout(d) => write!(f, "request timed out after {d:?}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Sends requests and resolves to the response body
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<String, TransportError>;
}

/// HTTP transport backed by a blocking `ureq` agent
#[derive(Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent("control-session")
                .build(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<String, TransportError> {
        let agent = self.agent.clone();
        let timeout = request.timeout;
        let call = tokio::task::spawn_blocking(move || post_form(&agent, &request));

        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(TransportError::Network(format!("request task failed: {e}"))),
            Err(_) => {
                tracing::debug!("Request timed out after {:?}", timeout);
                Err(TransportError::Timeout(timeout))
            }
        }
    }
}

/// Blocking POST of the request's form fields
fn post_form(agent: &ureq::Agent, request: &TransportRequest) -> Result<String, TransportError> {
    tracing::debug!("POST {} ({} fields)", request.url, request.fields.len());
    let fields: Vec<(&str, &str)> = request
        .fields
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let response = agent
        .post(&request.url)
        .timeout(request.timeout)
        .send_form(&fields)
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => TransportError::Status(code),
            ureq::Error::Transport(t) => {
                tracing::debug!("HTTP request failed: {}", t);
                TransportError::Network(t.to_string())
            }
        })?;

    if response.status() != 200 {
        return Err(TransportError::Status(response.status()));
    }

    response
        .into_string()
        .map_err(|e| TransportError::Network(format!("Failed to read response body: {e}")))
}

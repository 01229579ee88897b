//! Failure-tolerant JSON layer over the race engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use komik_core::{AppConfig, Error};

use super::error::AggregateFailure;
use super::mirror::MirrorRegistry;
use super::race::RaceEngine;
use super::request::ApiRequest;
use super::transport::{HttpConfig, HttpTransport, Transport};

/// Why a document carries no usable data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// No mirror produced a usable response.
    Unreachable(AggregateFailure),
    /// A mirror answered 2xx but the body was not JSON.
    Malformed(String),
}

/// Parsed upstream answer in the standard envelope.
///
/// `fetch_json` always returns one of these; failures come back as
/// `{success: false, message, data: []}` instead of an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDocument {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "empty_data")]
    pub data: Value,
    #[serde(skip)]
    pub fault: Option<Fault>,
}

fn empty_data() -> Value {
    Value::Array(Vec::new())
}

impl ApiDocument {
    /// The sentinel failure document.
    pub fn failure(message: impl Into<String>, fault: Option<Fault>) -> Self {
        Self { success: false, message: Some(message.into()), data: empty_data(), fault }
    }

    /// Interpret a parsed body.
    ///
    /// Enveloped bodies (an object with a boolean `success`) are taken as they are.
    /// Anything else is a bare record and counts as a success.
    pub fn from_body(body: Value) -> Self {
        let Value::Object(mut map) = body else {
            return Self { success: true, message: None, data: body, fault: None };
        };

        let Some(success) = map.get("success").and_then(Value::as_bool) else {
            return Self { success: true, message: None, data: Value::Object(map), fault: None };
        };

        let message = map.remove("message").and_then(|m| m.as_str().map(str::to_string));
        let data = match map.remove("data") {
            Some(Value::Null) | None => empty_data(),
            Some(data) => data,
        };

        Self { success, message, data, fault: None }
    }

    /// Whether the failure came from the mirrors being unreachable or down.
    ///
    /// A uniform 4xx from every mirror is the upstream's answer, not an outage.
    pub fn is_unreachable(&self) -> bool {
        matches!(&self.fault, Some(Fault::Unreachable(aggregate)) if !aggregate.rejected())
    }

    /// Data array, or an empty slice when `data` is not an array.
    pub fn items(&self) -> &[Value] {
        self.data.as_array().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Issues logical requests through the race engine and parses JSON.
#[derive(Clone)]
pub struct ApiClient {
    engine: Arc<RaceEngine>,
}

impl ApiClient {
    pub fn new(engine: RaceEngine) -> Self {
        Self { engine: Arc::new(engine) }
    }

    /// Build a client over the given transport using the configured mirrors and deadline.
    pub fn with_transport(config: &AppConfig, transport: Arc<dyn Transport>) -> Self {
        Self::new(RaceEngine::new(transport, MirrorRegistry::from_config(config), config.race_timeout()))
    }

    /// Build a client over the reqwest transport.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let transport = HttpTransport::new(HttpConfig {
            user_agent: config.user_agent.clone(),
            timeout: config.race_timeout(),
            ..HttpConfig::default()
        })?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn engine(&self) -> &RaceEngine {
        &self.engine
    }

    /// Race `request` and parse the winner's body. Never fails.
    pub async fn fetch_json(&self, request: &ApiRequest) -> ApiDocument {
        let winner = match self.engine.race(request).await {
            Ok(winner) => winner,
            Err(failure) => {
                let message = failure.to_string();
                return ApiDocument::failure(message, Some(Fault::Unreachable(failure)));
            }
        };

        match serde_json::from_slice::<Value>(&winner.response.bytes) {
            Ok(body) => ApiDocument::from_body(body),
            Err(e) => {
                tracing::warn!("{} returned invalid JSON for {}: {}", winner.mirror, request.path, e);
                let message = format!("invalid JSON from {}: {}", winner.mirror, e);
                ApiDocument::failure(message.clone(), Some(Fault::Malformed(message)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FailureReason;
    use crate::testing::{Script, ScriptedTransport};
    use serde_json::json;

    fn client(transport: ScriptedTransport) -> ApiClient {
        ApiClient::with_transport(&AppConfig::default(), Arc::new(transport))
    }

    #[test]
    fn test_envelope_taken_as_is() {
        let doc = ApiDocument::from_body(json!({"success": true, "data": [{"title": "One Piece"}]}));
        assert!(doc.success);
        assert_eq!(doc.items().len(), 1);
        assert_eq!(doc.message, None);
    }

    #[test]
    fn test_envelope_without_data_gets_empty_array() {
        let doc = ApiDocument::from_body(json!({"success": false, "message": "not found"}));
        assert!(!doc.success);
        assert_eq!(doc.message.as_deref(), Some("not found"));
        assert_eq!(doc.data, json!([]));
        assert!(!doc.is_unreachable());
    }

    #[test]
    fn test_bare_body_is_wrapped() {
        let doc = ApiDocument::from_body(json!({"title": "One Piece", "genres": ["Action"]}));
        assert!(doc.success);
        assert_eq!(doc.data["title"], "One Piece");

        let list = ApiDocument::from_body(json!([1, 2, 3]));
        assert!(list.success);
        assert_eq!(list.items().len(), 3);
    }

    #[test]
    fn test_failure_serializes_to_sentinel_shape() {
        let doc = ApiDocument::failure("all mirrors failed", None);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({"success": false, "message": "all mirrors failed", "data": []}));
    }

    #[tokio::test]
    async fn test_fetch_json_parses_winner() {
        let request = ApiRequest::get("/api/genres");
        let transport = ScriptedTransport::new().route(&request, Script::json(json!({"success": true, "data": [{"title": "Action"}]})));

        let doc = client(transport).fetch_json(&request).await;
        assert!(doc.success);
        assert_eq!(doc.items()[0]["title"], "Action");
    }

    #[tokio::test]
    async fn test_fetch_json_never_fails_on_outage() {
        let transport = ScriptedTransport::new()
            .mirror("Primary", Script::fail(FailureReason::Status(502)))
            .mirror("Secondary", Script::fail(FailureReason::Timeout))
            .mirror("Vercel", Script::fail(FailureReason::Network("refused".into())))
            .mirror("Netlify", Script::fail(FailureReason::Status(500)));

        let doc = client(transport).fetch_json(&ApiRequest::get("/api/genres")).await;
        assert!(!doc.success);
        assert_eq!(doc.data, json!([]));
        assert!(doc.is_unreachable());
        assert!(doc.message.unwrap().contains("Primary: status 502"));
    }

    #[tokio::test]
    async fn test_uniform_not_found_is_not_an_outage() {
        let doc = client(ScriptedTransport::new()).fetch_json(&ApiRequest::get("/api/asia/detail/nope")).await;
        assert!(!doc.success);
        assert!(!doc.is_unreachable());
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_failure_document() {
        let request = ApiRequest::get("/api/genres");
        let transport = ScriptedTransport::new().route(&request, Script::ok("<html>maintenance</html>"));

        let doc = client(transport).fetch_json(&request).await;
        assert!(!doc.success);
        assert!(matches!(doc.fault, Some(Fault::Malformed(_))));
        assert!(!doc.is_unreachable());
    }
}

//! The agent gateway: the external service that writes the addon.
//!
//! A gateway takes a prompt and a capability identifier and answers with a
//! loosely structured JSON envelope:
//!
//! ```text
//! { "success": bool,
//!   "error": "...",
//!   "response": { "result": { ... } },
//!   "module_outputs": { "artifact_files": [ { "file_url": "..." } ] } }
//! ```
//!
//! The envelope is read defensively here; the `result` object stays untyped
//! until the workflow validates it.

mod command;
mod http;

use std::{env, io, time::Duration};

use serde_json::{Value, json};

use crate::config::GatewayConfig;

pub use command::CommandGateway;
pub use http::HttpGateway;

/// Something that can run one agent request to completion.
pub trait AgentGateway {
    fn call(&self, prompt: &str, capability: &str) -> Result<GatewayResponse, TransportFault>;
}

/// The call itself failed: the gateway could not be reached or answered garbage.
#[derive(Debug, thiserror::Error)]
pub enum TransportFault {
    #[error("failed to start gateway `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("gateway I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("gateway exited with {status}: {stderr}")]
    Exited { status: String, stderr: String },

    #[error("gateway did not answer within {secs}s")]
    TimedOut { secs: u64 },

    #[error("gateway request failed: {0}")]
    Http(String),

    #[error("gateway returned invalid JSON: {0}")]
    Decode(String),
}

/// A decoded gateway envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewayResponse {
    pub success: bool,
    pub error: Option<String>,
    /// `response.result`, decoded from a JSON string when the agent sent one.
    pub result: Option<Value>,
    /// `file_url` of each entry in `module_outputs.artifact_files`, in order.
    pub artifacts: Vec<Option<String>>,
}

impl GatewayResponse {
    /// A successful response carrying `result`.
    #[cfg(test)]
    pub(crate) fn ok(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            ..Self::default()
        }
    }

    /// A response reporting failure.
    #[cfg(test)]
    pub(crate) fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn with_artifact(mut self, file_url: impl Into<String>) -> Self {
        self.artifacts.push(Some(file_url.into()));
        self
    }

    /// Reads an envelope. Missing or mistyped fields fall back to defaults.
    pub fn from_value(value: &Value) -> Self {
        let success = value.get("success").and_then(Value::as_bool).unwrap_or(false);
        let error = value
            .get("error")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from);
        let result = value
            .get("response")
            .and_then(|r| r.get("result"))
            .filter(|r| !r.is_null())
            .map(decode_embedded);
        let artifacts = either(value, "module_outputs", "moduleOutputs")
            .and_then(|m| either(m, "artifact_files", "artifactFiles"))
            .and_then(Value::as_array)
            .map(|files| {
                files
                    .iter()
                    .map(|f| {
                        either(f, "file_url", "fileUrl")
                            .and_then(Value::as_str)
                            .map(String::from)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            success,
            error,
            result,
            artifacts,
        }
    }

    /// The first artifact's URL, or empty when there is none.
    pub fn primary_artifact_url(&self) -> &str {
        self.artifacts
            .first()
            .and_then(Option::as_deref)
            .unwrap_or("")
    }
}

/// The request body every transport sends.
fn request_body(prompt: &str, capability: &str) -> Value {
    json!({ "message": prompt, "agent_id": capability })
}

/// Agents sometimes send their result as a JSON string; unwrap it when possible.
fn decode_embedded(result: &Value) -> Value {
    match result {
        Value::String(s) => serde_json::from_str(s).unwrap_or_else(|_| result.clone()),
        other => other.clone(),
    }
}

fn either<'a>(value: &'a Value, snake: &str, camel: &str) -> Option<&'a Value> {
    value.get(snake).or_else(|| value.get(camel))
}

/// Builds the configured gateway transport.
pub fn from_config(config: &GatewayConfig) -> Result<Box<dyn AgentGateway>, String> {
    let timeout = Duration::from_secs(config.timeout_secs.max(1));

    if let Some(url) = config.url.as_deref().filter(|u| !u.is_empty()) {
        let api_key = match config.api_key_env.as_deref() {
            Some(var) => match env::var(var) {
                Ok(key) if !key.is_empty() => Some(key),
                _ => {
                    tracing::warn!(var, "api key variable is unset; calling without a token");
                    None
                }
            },
            None => None,
        };
        return Ok(Box::new(HttpGateway::new(url, api_key, timeout)));
    }

    match config.command.split_first() {
        Some((program, args)) => Ok(Box::new(CommandGateway::new(
            program,
            args.to_vec(),
            timeout,
        ))),
        None => Err("no gateway configured: set [gateway] url or command in config.toml".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_full_envelope() {
        let value = json!({
            "success": true,
            "response": { "result": { "package_name": "X.zip" } },
            "module_outputs": { "artifact_files": [ { "file_url": "https://dl/x.zip" } ] }
        });

        let response = GatewayResponse::from_value(&value);

        assert!(response.success);
        assert_eq!(response.result.unwrap()["package_name"], "X.zip");
        assert_eq!(response.artifacts, [Some("https://dl/x.zip".to_string())]);
    }

    #[test]
    fn accepts_camel_case_module_outputs() {
        let value = json!({
            "success": true,
            "moduleOutputs": { "artifactFiles": [ { "fileUrl": "u" }, {} ] }
        });

        let response = GatewayResponse::from_value(&value);

        assert_eq!(response.primary_artifact_url(), "u");
        assert_eq!(response.artifacts.len(), 2);
    }

    #[test]
    fn malformed_fields_degrade() {
        let value = json!({
            "success": "yes",
            "error": 42,
            "response": "nope",
            "module_outputs": { "artifact_files": "not a list" }
        });

        let response = GatewayResponse::from_value(&value);

        assert_eq!(response, GatewayResponse::default());
        assert_eq!(response.primary_artifact_url(), "");
    }

    #[test]
    fn string_results_are_decoded() {
        let value = json!({
            "success": true,
            "response": { "result": "{\"addon_name\":\"X\"}" }
        });

        let result = GatewayResponse::from_value(&value).result.unwrap();
        assert_eq!(result["addon_name"], "X");
    }

    #[test]
    fn non_json_string_result_is_kept() {
        let value = json!({ "success": true, "response": { "result": "done" } });

        let result = GatewayResponse::from_value(&value).result.unwrap();
        assert_eq!(result, json!("done"));
    }

    #[test]
    fn from_config_requires_a_transport() {
        let err = from_config(&GatewayConfig::default()).err().unwrap();
        assert!(err.contains("no gateway configured"));
    }
}

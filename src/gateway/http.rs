//! Gateway transport over HTTP.

use std::time::Duration;

use serde_json::Value;

use super::{AgentGateway, GatewayResponse, TransportFault, request_body};

pub struct HttpGateway {
    url: String,
    api_key: Option<String>,
    agent: ureq::Agent,
}

impl HttpGateway {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            api_key,
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl AgentGateway for HttpGateway {
    fn call(&self, prompt: &str, capability: &str) -> Result<GatewayResponse, TransportFault> {
        tracing::debug!(url = %self.url, capability, "calling gateway over http");

        let mut request = self.agent.post(&self.url);
        if let Some(key) = &self.api_key {
            request = request.set("Authorization", &format!("Bearer {key}"));
        }

        match request.send_json(request_body(prompt, capability)) {
            Ok(response) => {
                let value = response
                    .into_json::<Value>()
                    .map_err(|e| TransportFault::Decode(e.to_string()))?;
                Ok(GatewayResponse::from_value(&value))
            }
            // Gateways report agent failures with an error status and an envelope.
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                match serde_json::from_str::<Value>(&body) {
                    Ok(value) if value.get("success").is_some() => {
                        Ok(GatewayResponse::from_value(&value))
                    }
                    _ => Err(TransportFault::Http(format!("status {code}: {}", body.trim()))),
                }
            }
            Err(e) => Err(TransportFault::Http(e.to_string())),
        }
    }
}

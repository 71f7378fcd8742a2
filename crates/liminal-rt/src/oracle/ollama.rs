//! Remote text oracle over an Ollama-compatible HTTP endpoint.
//!
//! Posts a single-message generate request and parses the `response` field
//! out of the JSON reply. Network and parse failures surface as oracle
//! errors, never as program aborts.

use serde_json::json;

use super::{Oracle, OracleReply};

/// A remote text oracle.
pub struct OllamaOracle {
    endpoint: String,
    model: String,
}

impl OllamaOracle {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }
}

impl Oracle for OllamaOracle {
    fn call_text(&mut self, prompt: &str) -> OracleReply {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        })
        .to_string();

        let url = format!("{}/api/generate", self.endpoint);
        let response = ureq::post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|e| e.to_string())?;
        let text = response
            .into_string()
            .map_err(|e| format!("ollama read failed: {e}"))?;

        let parsed: serde_json::Value =
            serde_json::from_str(&text).map_err(|_| "ollama parse failed".to_string())?;
        match parsed.get("response").and_then(|v| v.as_str()) {
            Some(reply) => Ok(reply.to_string()),
            None => Err("ollama parse failed".to_string()),
        }
    }
}

// Live-endpoint behavior is covered by opt-in end-to-end runs; there is no
// network access in unit tests.

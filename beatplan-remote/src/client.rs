use beatplan_core::{Backend, Operation};
use tracing::{debug, instrument};

use crate::error::RemoteError;
use crate::rows::{build_request, RestMethod};

const REST_PREFIX: &str = "rest/v1";

/// Backend that writes to the hosted database's REST interface.
pub struct RestBackend {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl RestBackend {
    /// Creates a client for the project at `base_url`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PREFIX, path)
    }

    /// Sends one operation.
    #[instrument(skip(self, op), fields(kind = op.kind()))]
    pub async fn send(&self, op: &Operation) -> Result<(), RemoteError> {
        let request = build_request(op)?;
        let url = self.url(&request.path);

        debug!(%url, "Sending write");

        let builder = match request.method {
            RestMethod::Post => self.http.post(&url),
            RestMethod::Patch => self.http.patch(&url),
        };

        let response = builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=minimal")
            .json(&request.body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or(body);
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), "Write accepted");
        Ok(())
    }

    /// Whether the REST endpoint answers at all. Any HTTP response counts as
    /// reachable; only transport failures count as offline.
    pub async fn probe(&self) -> bool {
        let result = self
            .http
            .head(format!("{}/{}/", self.base_url, REST_PREFIX))
            .header("apikey", &self.api_key)
            .send()
            .await;

        match result {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "Backend unreachable");
                false
            }
        }
    }
}

impl Backend for RestBackend {
    type Error = RemoteError;

    async fn apply(&self, op: &Operation) -> Result<(), Self::Error> {
        self.send(op).await
    }
}

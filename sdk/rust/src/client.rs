use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
}

/// Body returned by `POST /api/submit-form` for every status.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "submissionId", default)]
    pub submission_id: Option<String>,
    #[serde(rename = "retryAfter", default)]
    pub retry_after: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub struct RelayClient {
    client: Client,
    relay_url: String,
}

impl RelayClient {
    pub fn new(relay_url: &str) -> Self {
        Self {
            client: Client::builder()
                .pool_max_idle_per_host(0)
                .no_proxy()
                .build()
                .unwrap_or_default(),
            relay_url: relay_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit the form. Failure statuses (400, 429, 500) still carry a
    /// JSON body, so they are returned alongside the status rather than
    /// as an error.
    pub async fn submit(
        &self,
        full_name: &str,
        email: &str,
    ) -> Result<(StatusCode, SubmitResponse), Box<dyn std::error::Error>> {
        let req = SubmitRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
        };

        let resp = self
            .client
            .post(format!("{}/api/submit-form", self.relay_url))
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        match serde_json::from_str::<SubmitResponse>(&text) {
            Ok(body) => Ok((status, body)),
            Err(e) => Err(format!("Relay returned non-JSON body with status {}: {} ({})", status, text, e).into()),
        }
    }

    /// Query the liveness endpoint.
    pub async fn health(&self) -> Result<HealthResponse, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/health", self.relay_url))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("Relay returned error status {}", status).into());
        }

        Ok(resp.json::<HealthResponse>().await?)
    }
}

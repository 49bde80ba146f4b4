use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const CALCULATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Request body for `POST {base}/calculate`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CalculateRequest {
    pub image: String,
    pub dict_of_vars: HashMap<String, String>,
}

/// One recognized expression. `assign` marks variable assignments whose
/// result should be merged into the session's variable dictionary.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RecognizedEntry {
    pub expr: String,
    pub result: String,
    pub assign: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CalculateResponse {
    pub data: Vec<RecognizedEntry>,
}

/// Recognition service seam. The session talks to this trait so tests can
/// substitute canned responses for the HTTP client.
pub trait RecognitionBackend {
    fn calculate(&self, request: &CalculateRequest) -> Result<CalculateResponse>;
}

/// Blocking HTTP client for the recognition service.
pub struct HttpRecognition {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpRecognition {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(CALCULATE_TIMEOUT)
            .user_agent("mathboard recognition client")
            .build()
            .context("failed to build recognition HTTP client")?;
        Ok(HttpRecognition {
            client,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/calculate", self.base_url.trim_end_matches('/'))
    }
}

impl RecognitionBackend for HttpRecognition {
    fn calculate(&self, request: &CalculateRequest) -> Result<CalculateResponse> {
        let url = self.endpoint();
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .with_context(|| format!("failed to reach recognition service at {url}"))?;
        let status = response.status();
        if !status.is_success() {
            bail!("recognition service returned {status}");
        }
        response
            .json::<CalculateResponse>()
            .context("malformed recognition response")
    }
}

//! Mathpix OCR Client
//!
//! One POST to the fixed `/v3/latex` endpoint per invocation. The caller
//! is synchronous; the async reqwest client runs on a private runtime.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::config::Credentials;

/// Fixed OCR service endpoint
pub const SERVICE_URL: &str = "https://api.mathpix.com/v3/latex";

/// Single request/response cycle, no retry
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// LaTeX flavor requested from the OCR service
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OcrFormat {
    /// Simplified LaTeX
    #[value(name = "latex_simplified")]
    LatexSimplified,
    /// Styled LaTeX preserving layout hints
    #[value(name = "latex_styled")]
    LatexStyled,
}

impl OcrFormat {
    /// Field name this format appears under, both in the request's
    /// `formats` list and in the response object
    pub fn field_name(&self) -> &'static str {
        match self {
            OcrFormat::LatexSimplified => "latex_simplified",
            OcrFormat::LatexStyled => "latex_styled",
        }
    }
}

/// Errors terminal to one OCR operation
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned HTTP {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("service reported an error: {0}")]
    Api(String),
    #[error("response is missing the `{0}` field (unexpected API response shape)")]
    MissingField(&'static str),
}

/// Request body for the OCR endpoint
#[derive(Debug, Serialize)]
struct OcrRequest {
    /// Base64 data URI of the image bytes
    src: String,
    formats: [&'static str; 1],
}

/// Response body from the OCR endpoint
///
/// The service returns the recognized markup under one key per requested
/// format, plus assorted detection metadata; everything lands in `fields`
/// so the history file keeps the full response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResponse {
    /// Present when recognition failed service-side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

impl OcrResponse {
    /// Extract the markup for the requested format
    pub fn extract(&self, format: OcrFormat) -> Result<&str, OcrError> {
        if let Some(error) = &self.error {
            return Err(OcrError::Api(error.clone()));
        }
        self.fields
            .get(format.field_name())
            .and_then(Value::as_str)
            .ok_or(OcrError::MissingField(format.field_name()))
    }
}

/// Base64 data URI for an image's bytes
pub fn image_data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(bytes))
}

/// OCR request dispatcher
pub struct MathpixClient {
    credentials: Credentials,
    runtime: Runtime,
    client: reqwest::Client,
}

impl MathpixClient {
    /// Create a client holding the resolved credentials
    pub fn new(credentials: Credentials) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            credentials,
            runtime,
            client,
        })
    }

    /// Send one image file for recognition (blocking)
    pub fn recognize(&self, image_path: &Path, format: OcrFormat) -> Result<OcrResponse> {
        let bytes = std::fs::read(image_path)
            .with_context(|| format!("Failed to read image {}", image_path.display()))?;

        info!(
            "Sending {} byte image ({} requested)",
            bytes.len(),
            format.field_name()
        );

        let request = OcrRequest {
            src: image_data_uri(&bytes),
            formats: [format.field_name()],
        };

        let response = self
            .runtime
            .block_on(self.post(&request))
            .context("OCR request failed")?;

        debug!("Response fields: {:?}", response.fields.keys().collect::<Vec<_>>());

        Ok(response)
    }

    async fn post(&self, request: &OcrRequest) -> Result<OcrResponse, OcrError> {
        let response = self
            .client
            .post(SERVICE_URL)
            .header("app_id", &self.credentials.app_id)
            .header("app_key", &self.credentials.app_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OcrError::HttpStatus(status));
        }

        Ok(response.json::<OcrResponse>().await?)
    }
}

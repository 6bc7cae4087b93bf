use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clap::ValueEnum;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

/// Env var holding the inference API bearer token.
pub const TOKEN_ENV: &str = "HF_API_TOKEN";

/// Hosted image-classification models the hunt can run against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum ClassifierModel {
    DeitBase,
    Resnet50,
    VitBase,
}

impl ClassifierModel {
    pub fn repo(&self) -> &'static str {
        match self {
            ClassifierModel::DeitBase => "facebook/deit-base-distilled-patch16-224",
            ClassifierModel::Resnet50 => "microsoft/resnet-50",
            ClassifierModel::VitBase => "google/vit-base-patch16-224",
        }
    }
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("no API token configured; set {TOKEN_ENV}")]
    MissingToken,
    #[error("classification request failed with status {status}")]
    Http { status: u16 },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid base64 image payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("unreadable classification response: {0}")]
    Parse(#[from] std::io::Error),
    #[error("classification response entry missing a label")]
    MissingLabel,
}

/// Client for the remote inference endpoint. One attempt per call, no retry
/// and no timeout beyond what the transport provides.
#[derive(Debug, Clone)]
pub struct Classifier {
    endpoint: String,
    model: ClassifierModel,
    token: Option<String>,
}

impl Classifier {
    /// Build a client with the bearer token taken from the environment.
    pub fn new(model: ClassifierModel) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model,
            token: std::env::var(TOKEN_ENV).ok(),
        }
    }

    pub fn with_token(model: ClassifierModel, token: Option<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model,
            token,
        }
    }

    /// Point the client at a different endpoint root (test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Send a base64-encoded still image to the model and return the
    /// lowercased labels it detected, in response order. Confidence scores
    /// are ignored. A non-array success body yields no labels.
    pub fn analyze(&self, base64_image: &str) -> Result<Vec<String>, ClassifyError> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ClassifyError::MissingToken)?;

        let image_bytes = BASE64.decode(strip_data_uri(base64_image))?;
        let url = format!("{}/{}", self.endpoint, self.model.repo());

        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {token}"))
            .set("Content-Type", "application/octet-stream")
            .send_bytes(&image_bytes);

        match response {
            Ok(resp) => {
                let body: serde_json::Value = resp.into_json()?;
                extract_labels(&body)
            }
            Err(ureq::Error::Status(status, _)) => Err(ClassifyError::Http { status }),
            Err(ureq::Error::Transport(transport)) => {
                Err(ClassifyError::Transport(transport.to_string()))
            }
        }
    }
}

/// Drop a leading `data:<mime>;base64,` prefix if present.
fn strip_data_uri(base64_image: &str) -> &str {
    if base64_image.starts_with("data:") {
        base64_image
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or(base64_image)
    } else {
        base64_image
    }
}

fn extract_labels(body: &serde_json::Value) -> Result<Vec<String>, ClassifyError> {
    match body.as_array() {
        Some(items) => items
            .iter()
            .map(|item| {
                item.get("label")
                    .and_then(|label| label.as_str())
                    .map(|label| label.to_lowercase())
                    .ok_or(ClassifyError::MissingLabel)
            })
            .collect(),
        None => Ok(Vec::new()),
    }
}

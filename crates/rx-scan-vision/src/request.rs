//! Request bodies for the `images:annotate` endpoint.

use base64::Engine as _;
use serde::Serialize;

/// Batch annotate endpoint; the API key or bearer token is added by the transport.
pub const ANNOTATE_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Feature type for dense text detection.
pub const TEXT_DETECTION: &str = "TEXT_DETECTION";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnnotateRequest {
    pub requests: Vec<ImageRequest>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
}

/// Inline image bytes, base64 encoded.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageContent {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
}

impl AnnotateRequest {
    /// Single-image text detection request.
    pub fn text_detection(image_bytes: &[u8]) -> Self {
        Self {
            requests: vec![ImageRequest {
                image: ImageContent {
                    content: base64::engine::general_purpose::STANDARD.encode(image_bytes),
                },
                features: vec![Feature {
                    feature_type: TEXT_DETECTION.to_string(),
                }],
            }],
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

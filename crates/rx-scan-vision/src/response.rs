//! Parsing of `images:annotate` responses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Detection errors.
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Text detection service error: {0}")]
    Service(String),

    #[error("Image read error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DetectionResult<T> = Result<T, DetectionError>;

/// Top-level batch response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<ImageResponse>,
}

/// Result for one image of the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    /// First entry holds the whole detected text; the rest are individual words
    #[serde(default)]
    pub text_annotations: Vec<TextAnnotation>,
    pub error: Option<ServiceStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextAnnotation {
    #[serde(default)]
    pub description: String,
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Full detected text of the first image, empty when nothing was found.
pub fn parse_annotate_response(json: &str) -> DetectionResult<String> {
    let response: AnnotateResponse = serde_json::from_str(json)?;
    full_text(&response)
}

/// Full detected text of the first image in a parsed response.
pub fn full_text(response: &AnnotateResponse) -> DetectionResult<String> {
    let Some(image) = response.responses.first() else {
        return Err(DetectionError::InvalidFormat(
            "response contains no image results".into(),
        ));
    };

    if let Some(status) = &image.error {
        return Err(DetectionError::Service(format!(
            "{} (code {})",
            status.message, status.code
        )));
    }

    Ok(image
        .text_annotations
        .first()
        .map(|annotation| annotation.description.clone())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_annotation_is_full_text() {
        let json = r#"{"responses":[{"textAnnotations":[
            {"locale":"en","description":"Panadol 500 mg bd\nAmoxil 250 mg tds"},
            {"description":"Panadol"},
            {"description":"500"}
        ]}]}"#;

        let text = parse_annotate_response(json).unwrap();
        assert_eq!(text, "Panadol 500 mg bd\nAmoxil 250 mg tds");
    }

    #[test]
    fn test_no_text_found() {
        let text = parse_annotate_response(r#"{"responses":[{}]}"#).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_service_error() {
        let json = r#"{"responses":[{"error":{"code":3,"message":"Bad image data."}}]}"#;
        let err = parse_annotate_response(json).unwrap_err();

        assert!(matches!(err, DetectionError::Service(_)));
        assert!(err.to_string().contains("Bad image data."));
    }

    #[test]
    fn test_malformed_responses() {
        assert!(matches!(
            parse_annotate_response("not json"),
            Err(DetectionError::JsonParse(_))
        ));
        assert!(matches!(
            parse_annotate_response(r#"{"responses":[]}"#),
            Err(DetectionError::InvalidFormat(_))
        ));
    }

    proptest! {
        #[test]
        fn parse_never_panics(input in ".*") {
            let _ = parse_annotate_response(&input);
        }

        #[test]
        fn description_returned_verbatim(text in "[A-Za-z0-9 .\n]{0,64}") {
            let response = AnnotateResponse {
                responses: vec![ImageResponse {
                    text_annotations: vec![TextAnnotation {
                        description: text.clone(),
                        locale: None,
                    }],
                    error: None,
                }],
            };
            prop_assert_eq!(full_text(&response).unwrap(), text);
        }
    }
}

//! Text detector trait and implementations.

use std::path::Path;

use crate::request::{AnnotateRequest, ANNOTATE_ENDPOINT};
use crate::response::{parse_annotate_response, DetectionError, DetectionResult};

/// Anything that turns image bytes into the full detected text.
pub trait TextDetector {
    fn detect_text(&self, image: &[u8]) -> DetectionResult<String>;
}

/// POSTs an annotate request body to `endpoint` and returns the raw response body.
///
/// Implemented by the host application with its HTTP client and credentials.
pub trait AnnotateTransport {
    fn annotate(&self, endpoint: &str, request_json: &str) -> DetectionResult<String>;
}

/// Cloud Vision text detector over a host-provided transport.
pub struct VisionDetector<T> {
    transport: T,
    endpoint: String,
}

impl<T: AnnotateTransport> VisionDetector<T> {
    /// Detector targeting the public `images:annotate` endpoint.
    pub fn new(transport: T) -> Self {
        Self::with_endpoint(transport, ANNOTATE_ENDPOINT)
    }

    /// Detector targeting another endpoint (regional host, proxy).
    pub fn with_endpoint(transport: T, endpoint: &str) -> Self {
        Self {
            transport,
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl<T: AnnotateTransport> TextDetector for VisionDetector<T> {
    fn detect_text(&self, image: &[u8]) -> DetectionResult<String> {
        let request = AnnotateRequest::text_detection(image).to_json()?;
        let response = self.transport.annotate(&self.endpoint, &request)?;
        let text = parse_annotate_response(&response)?;
        tracing::debug!(
            image_size = image.len(),
            text_len = text.len(),
            "Text detection complete"
        );
        Ok(text)
    }
}

/// Detect text, treating any failure as "no text".
pub fn detect_text_or_empty<D: TextDetector + ?Sized>(detector: &D, image: &[u8]) -> String {
    match detector.detect_text(image) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Text detection failed: {e}");
            String::new()
        }
    }
}

/// Read an image file and detect its text.
pub fn detect_text_in_file<D: TextDetector + ?Sized, P: AsRef<Path>>(
    detector: &D,
    path: P,
) -> DetectionResult<String> {
    let image = std::fs::read(path)?;
    detector.detect_text(&image)
}

/// Mock detector for testing without the remote service.
pub struct MockDetector {
    outcome: Result<String, String>,
}

impl MockDetector {
    /// Always detects the given text.
    pub fn with_text(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
        }
    }

    /// Always fails with a service error.
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
        }
    }
}

impl TextDetector for MockDetector {
    fn detect_text(&self, _image: &[u8]) -> DetectionResult<String> {
        self.outcome.clone().map_err(DetectionError::Service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;

    struct CannedTransport {
        response: String,
        last_request: RefCell<Option<(String, String)>>,
    }

    impl AnnotateTransport for CannedTransport {
        fn annotate(&self, endpoint: &str, request_json: &str) -> DetectionResult<String> {
            *self.last_request.borrow_mut() =
                Some((endpoint.to_string(), request_json.to_string()));
            Ok(self.response.clone())
        }
    }

    fn canned(response: &str) -> CannedTransport {
        CannedTransport {
            response: response.to_string(),
            last_request: RefCell::new(None),
        }
    }

    #[test]
    fn test_vision_detector() {
        let detector = VisionDetector::new(canned(
            r#"{"responses":[{"textAnnotations":[{"description":"Tab. Panadol 500mg bd"}]}]}"#,
        ));

        let text = detector.detect_text(b"img").unwrap();
        assert_eq!(text, "Tab. Panadol 500mg bd");

        let (endpoint, sent) = detector.transport.last_request.borrow().clone().unwrap();
        assert_eq!(endpoint, ANNOTATE_ENDPOINT);
        assert!(sent.contains("TEXT_DETECTION"));
        assert!(sent.contains("aW1n"));
    }

    #[test]
    fn test_custom_endpoint() {
        let proxy = "https://eu-vision.googleapis.com/v1/images:annotate";
        let detector = VisionDetector::with_endpoint(canned(r#"{"responses":[{}]}"#), proxy);

        assert_eq!(detector.detect_text(b"img").unwrap(), "");
        assert_eq!(detector.endpoint(), proxy);
        let (endpoint, _) = detector.transport.last_request.borrow().clone().unwrap();
        assert_eq!(endpoint, proxy);
    }

    #[test]
    fn test_detect_or_empty() {
        assert_eq!(
            detect_text_or_empty(&MockDetector::with_text("Amoxil 250 mg tds"), b""),
            "Amoxil 250 mg tds"
        );
        assert_eq!(
            detect_text_or_empty(&MockDetector::failing("quota exceeded"), b""),
            ""
        );

        let erroring = VisionDetector::new(canned(
            r#"{"responses":[{"error":{"code":7,"message":"denied"}}]}"#,
        ));
        assert_eq!(detect_text_or_empty(&erroring, b"img"), "");
    }

    #[test]
    fn test_detect_in_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"img").unwrap();

        let text = detect_text_in_file(&MockDetector::with_text("Syp Piriton"), file.path()).unwrap();
        assert_eq!(text, "Syp Piriton");

        assert!(matches!(
            detect_text_in_file(&MockDetector::with_text(""), "/nonexistent/rx.png"),
            Err(DetectionError::Io(_))
        ));
    }
}

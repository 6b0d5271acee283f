//! Text detection for prescription images.
//!
//! This crate wraps the Cloud Vision `images:annotate` API behind the [`TextDetector`] trait:
//! request bodies are built by [`request`], responses are reduced to the full detected text by
//! [`response`]. The HTTP call itself is left to an [`AnnotateTransport`] supplied by the host.

pub mod detector;
pub mod request;
pub mod response;

pub use detector::*;
pub use request::*;
pub use response::*;

//! Clients for the Google Cloud collaborators used by document ingestion:
//! Cloud Storage for fetching uploaded objects and Cloud Vision for OCR.

pub mod credentials;
pub mod storage;
pub mod vision;

pub use credentials::Credentials;
pub use storage::{GcsClient, ObjectStore, GCS_API_BASE};
pub use vision::{TextDetector, VisionClient, VISION_API_BASE};

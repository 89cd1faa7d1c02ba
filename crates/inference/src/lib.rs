pub mod backend;
pub mod classifier;
pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod service;

// Re-export commonly used types for convenience
pub use backend::{InferenceBackend, InferenceOutput};
pub use classifier::{Classifier, DEFAULT_THRESHOLD};
pub use config::InferenceConfig;
pub use error::{ClassifierError, ServiceError};
pub use result::{ClassificationResult, Verdict};
pub use service::{ClassificationService, ServiceHandle};

#[cfg(feature = "ort-backend")]
pub use backend::ort::OrtBackend;

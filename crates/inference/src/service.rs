use crate::{
    backend::InferenceBackend,
    classifier::Classifier,
    config::InferenceConfig,
    error::ServiceError,
    result::ClassificationResult,
};
use common::span;
use preprocess::{ImagePreprocessor, Preprocess, RawImage};
use std::sync::{Arc, Mutex};

#[cfg(feature = "ort-backend")]
use crate::{backend::ort::OrtBackend, error::ClassifierError};

/// Capture-to-verdict pipeline: preprocess a raw capture, then classify it.
pub struct ClassificationService<B: InferenceBackend, P: Preprocess = ImagePreprocessor> {
    preprocessor: P,
    classifier: Classifier<B>,
    rotation_degrees: i32,
}

impl<B: InferenceBackend, P: Preprocess> ClassificationService<B, P> {
    pub fn new(preprocessor: P, classifier: Classifier<B>, rotation_degrees: i32) -> Self {
        Self {
            preprocessor,
            classifier,
            rotation_degrees,
        }
    }

    pub fn classifier(&self) -> &Classifier<B> {
        &self.classifier
    }

    pub fn rotation_degrees(&self) -> i32 {
        self.rotation_degrees
    }

    /// Run one capture through preprocessing and the classifier.
    ///
    /// Blocks for the duration of the forward pass.
    pub fn classify_image(&mut self, raw: RawImage) -> Result<ClassificationResult, ServiceError> {
        let _s = span!("classify_image", rotation = self.rotation_degrees);

        let tensor = self.preprocessor.prepare(raw, self.rotation_degrees)?;
        let result = self.classifier.classify(&tensor)?;

        tracing::info!(
            label = %result.label,
            probability = result.probability,
            latency_ms = result.latency_millis,
            "Classification finished"
        );

        Ok(result)
    }
}

impl<B: InferenceBackend> ClassificationService<B> {
    pub fn from_config(config: &InferenceConfig, classifier: Classifier<B>) -> Self {
        Self::new(
            ImagePreprocessor::new(config.preprocess_config()),
            classifier,
            config.rotation_degrees,
        )
    }
}

#[cfg(feature = "ort-backend")]
impl ClassificationService<OrtBackend> {
    /// Load the ONNX model named by `config` and build the service around it.
    pub fn load(config: &InferenceConfig) -> Result<Self, ClassifierError> {
        let classifier = Classifier::load_with(
            &config.model_path,
            config.confidence_threshold,
            |path| {
                OrtBackend::load_model_with_provider(
                    path,
                    config.execution_provider,
                    config.intra_threads,
                )
            },
        )?;
        Ok(Self::from_config(config, classifier))
    }
}

/// Cloneable handle that runs classifications on tokio's blocking pool.
///
/// Calls are serialized through a mutex, so the underlying service still sees
/// one classification at a time.
pub struct ServiceHandle<B: InferenceBackend, P: Preprocess = ImagePreprocessor> {
    inner: Arc<Mutex<ClassificationService<B, P>>>,
}

impl<B: InferenceBackend, P: Preprocess> Clone for ServiceHandle<B, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B, P> ServiceHandle<B, P>
where
    B: InferenceBackend + Send + 'static,
    P: Preprocess + Send + 'static,
{
    pub fn new(service: ClassificationService<B, P>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    pub async fn classify(&self, raw: RawImage) -> Result<ClassificationResult, ServiceError> {
        let inner = Arc::clone(&self.inner);

        tokio::task::spawn_blocking(move || {
            let mut service = inner.lock().map_err(|_| ServiceError::Poisoned)?;
            service.classify_image(raw)
        })
        .await?
    }
}

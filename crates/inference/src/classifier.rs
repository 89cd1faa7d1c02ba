use crate::backend::InferenceBackend;
use crate::error::ClassifierError;
use crate::result::{ClassificationResult, Verdict};
use common::span;
use preprocess::NormalizedTensor;
use std::path::Path;
use std::time::Instant;

pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Binary hotdog classifier over a loaded model.
///
/// A classifier whose model failed to load stays usable only to report the
/// "Uninitialized Classifier" sentinel. `classify` takes `&mut self`, so one
/// instance serves one call at a time.
pub struct Classifier<B: InferenceBackend> {
    backend: Option<B>,
    threshold: f32,
}

impl<B: InferenceBackend> Classifier<B> {
    pub fn new(backend: B, threshold: f32) -> Self {
        Self {
            backend: Some(backend),
            threshold,
        }
    }

    /// Load the model at `path`. Failure is final: nothing is retried.
    pub fn load(path: &Path, threshold: f32) -> Result<Self, ClassifierError> {
        Self::load_with(path, threshold, B::load_model)
    }

    /// Like `load`, with a backend-specific loader (execution provider, threads).
    pub fn load_with<F>(path: &Path, threshold: f32, loader: F) -> Result<Self, ClassifierError>
    where
        F: FnOnce(&Path) -> anyhow::Result<B>,
    {
        let _s = span!("load_classifier");

        tracing::info!(model_path = %path.display(), "Loading classification model");

        let backend = loader(path).map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize the image classifier");
            ClassifierError::ModelLoad {
                path: path.to_path_buf(),
                source: e.into(),
            }
        })?;

        Ok(Self::new(backend, threshold))
    }

    pub fn uninitialized() -> Self {
        Self {
            backend: None,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn classify(
        &mut self,
        tensor: &NormalizedTensor,
    ) -> Result<ClassificationResult, ClassifierError> {
        let Some(backend) = self.backend.as_mut() else {
            tracing::error!("Image classifier has not been initialized");
            return Ok(ClassificationResult::uninitialized());
        };

        let (output, elapsed) = {
            let _infer_span = span!("model_inference");
            let start = Instant::now();
            let output = backend
                .infer(tensor)
                .map_err(|e| ClassifierError::Inference(e.into()))?;
            (output, start.elapsed())
        };

        let score = output.scalar().ok_or_else(|| {
            ClassifierError::InvalidOutput(format!(
                "expected a single score, got shape {:?}",
                output.scores.shape()
            ))
        })?;

        // The model ends in a sigmoid; logits or NaN are rejected
        if !(0.0..=1.0).contains(&score) {
            return Err(ClassifierError::InvalidOutput(format!(
                "score outside [0, 1]: {}",
                score
            )));
        }

        let latency_millis = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
        let label = Verdict::from_score(score, self.threshold);

        tracing::debug!(score, latency_millis, label = %label, "Classified image");

        Ok(ClassificationResult::new(label, score, latency_millis))
    }
}

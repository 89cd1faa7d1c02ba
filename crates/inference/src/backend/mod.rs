use ndarray::ArrayD;
use preprocess::NormalizedTensor;
use std::path::Path;

#[cfg(feature = "ort-backend")]
pub mod ort;

pub trait InferenceBackend {
    fn load_model(path: &Path) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Run one forward pass over a prepared `[1, 224, 224, 3]` input
    fn infer(&mut self, input: &NormalizedTensor) -> anyhow::Result<InferenceOutput>;
}

pub struct InferenceOutput {
    pub scores: ArrayD<f32>, // [1, 1] sigmoid probability
}

impl InferenceOutput {
    /// The single score of a binary classifier, if the output holds exactly one value.
    pub fn scalar(&self) -> Option<f32> {
        match self.scores.len() {
            1 => self.scores.iter().next().copied(),
            _ => None,
        }
    }
}

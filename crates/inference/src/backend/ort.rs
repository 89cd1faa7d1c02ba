use super::{InferenceBackend, InferenceOutput};
use anyhow::Context;
use memmap2::Mmap;
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use preprocess::NormalizedTensor;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_INTRA_THREADS: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionProvider {
    #[default]
    Cpu,
    Cuda,
}

impl FromStr for ExecutionProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(ExecutionProvider::Cpu),
            "cuda" => Ok(ExecutionProvider::Cuda),
            other => anyhow::bail!("Unknown execution provider: {}", other),
        }
    }
}

pub struct OrtBackend {
    session: Session,
}

impl OrtBackend {
    /// Load model with specified execution provider
    ///
    /// The model file is memory-mapped read-only and handed to ONNX Runtime
    /// from memory.
    pub fn load_model_with_provider(
        path: &Path,
        provider: ExecutionProvider,
        intra_threads: usize,
    ) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open model file {}", path.display()))?;

        if file.metadata()?.len() == 0 {
            anyhow::bail!("Model file {} is empty", path.display());
        }

        // SAFETY: the mapping is read-only and only lives until the session
        // has been committed; model assets are not modified while loading.
        let model = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to map model file {}", path.display()))?;

        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        #[cfg_attr(not(feature = "cuda"), allow(unused_mut))]
        let mut builder = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?;

        match provider {
            #[cfg(feature = "cuda")]
            ExecutionProvider::Cuda => {
                tracing::info!("Initializing ONNX Runtime with CUDA execution provider");
                builder = builder.with_execution_providers([
                    ort::execution_providers::CUDAExecutionProvider::default()
                        .with_device_id(0)
                        .build()
                        .error_on_failure(),
                ])?;
            }
            #[cfg(not(feature = "cuda"))]
            ExecutionProvider::Cuda => {
                anyhow::bail!("CUDA execution provider requested but the 'cuda' feature is disabled");
            }
            ExecutionProvider::Cpu => {
                tracing::info!("Initializing ONNX Runtime with CPU execution provider");
            }
        }

        let session = builder.commit_from_memory(&model)?;

        tracing::info!(
            model_bytes = model.len(),
            "Model loaded from {}",
            path.display()
        );
        Ok(Self { session })
    }
}

impl InferenceBackend for OrtBackend {
    fn load_model(path: &Path) -> anyhow::Result<Self> {
        Self::load_model_with_provider(path, ExecutionProvider::Cpu, DEFAULT_INTRA_THREADS)
    }

    fn infer(&mut self, input: &NormalizedTensor) -> anyhow::Result<InferenceOutput> {
        let images = input.view().into_dyn();

        // Single input [1, 224, 224, 3] and single output [1, 1], addressed by position
        let outputs = self
            .session
            .run(ort::inputs![TensorRef::from_array_view(images)?])?;

        let scores = outputs[0].try_extract_array::<f32>()?;

        Ok(InferenceOutput {
            scores: scores.into_owned(),
        })
    }
}

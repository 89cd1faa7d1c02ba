use crate::classifier::DEFAULT_THRESHOLD;
use common::env_or;
use preprocess::{ChannelOrder, DEFAULT_ROTATION_DEGREES, PreprocessConfig};
use std::env;
use std::path::PathBuf;

#[cfg(feature = "ort-backend")]
pub use crate::backend::ort::{DEFAULT_INTRA_THREADS, ExecutionProvider};

pub use common::Environment;

pub const DEFAULT_MODEL_PATH: &str = "assets/model.onnx";

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub environment: Environment,
    pub model_path: PathBuf,
    pub confidence_threshold: f32,
    pub rotation_degrees: i32,
    pub channel_order: ChannelOrder,
    #[cfg(feature = "ort-backend")]
    pub execution_provider: ExecutionProvider,
    #[cfg(feature = "ort-backend")]
    pub intra_threads: usize,
}

impl InferenceConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = Environment::from_env();

        let model_path = env::var("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH));

        let confidence_threshold = env_or("CONFIDENCE_THRESHOLD", DEFAULT_THRESHOLD)?;
        if !(0.0..=1.0).contains(&confidence_threshold) {
            anyhow::bail!(
                "CONFIDENCE_THRESHOLD must be within [0, 1], got {}",
                confidence_threshold
            );
        }

        let rotation_degrees = env_or("ROTATION_DEGREES", DEFAULT_ROTATION_DEGREES)?;
        if rotation_degrees.rem_euclid(90) != 0 {
            anyhow::bail!(
                "ROTATION_DEGREES must be a multiple of 90, got {}",
                rotation_degrees
            );
        }

        let channel_order = match env::var("CHANNEL_ORDER") {
            Ok(value) => value.parse()?,
            Err(_) => ChannelOrder::default(),
        };

        Ok(Self {
            environment,
            model_path,
            confidence_threshold,
            rotation_degrees,
            channel_order,
            #[cfg(feature = "ort-backend")]
            execution_provider: match env::var("EXECUTION_PROVIDER") {
                Ok(value) => value.parse()?,
                Err(_) => ExecutionProvider::default(),
            },
            #[cfg(feature = "ort-backend")]
            intra_threads: env_or("INTRA_THREADS", DEFAULT_INTRA_THREADS)?.max(1),
        })
    }

    pub fn preprocess_config(&self) -> PreprocessConfig {
        PreprocessConfig {
            channel_order: self.channel_order,
            default_rotation: self.rotation_degrees,
            ..PreprocessConfig::default()
        }
    }

    /// Create default configuration for testing
    #[cfg(test)]
    pub fn test_default() -> Self {
        Self {
            environment: Environment::Development,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            confidence_threshold: DEFAULT_THRESHOLD,
            rotation_degrees: DEFAULT_ROTATION_DEGREES,
            channel_order: ChannelOrder::Rgb,
            #[cfg(feature = "ort-backend")]
            execution_provider: ExecutionProvider::Cpu,
            #[cfg(feature = "ort-backend")]
            intra_threads: DEFAULT_INTRA_THREADS,
        }
    }
}

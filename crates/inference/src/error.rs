use preprocess::PreprocessError;
use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Failed to load model from {}: {source}", path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("Inference failed: {0}")]
    Inference(#[source] BoxError),

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),

    #[error("Classification failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Classification service lock poisoned")]
    Poisoned,

    #[error("Classification worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

use crate::config::InferenceConfig;
use common::TryInitError;

/// Install the process-wide subscriber for the configured environment.
pub fn setup_logging(config: &InferenceConfig) -> Result<(), TryInitError> {
    common::setup_logging(config.environment)
}

pub mod config;
pub mod cpu;
pub mod error;
pub mod raw;
pub mod tensor;
pub mod transform;

pub use config::{
    CAPTURE_RESOLUTION_HINT, ChannelOrder, DEFAULT_INPUT_SIZE, DEFAULT_ROTATION_DEGREES,
    MODEL_INPUT_SIZE, PreprocessConfig,
};
pub use cpu::ImagePreprocessor;
pub use error::PreprocessError;
pub use raw::RawImage;
pub use tensor::NormalizedTensor;
pub use transform::{CropBox, Rotation};

/// Trait for image preprocessing implementations
pub trait Preprocess {
    /// Turn a captured image into model input.
    ///
    /// # Arguments
    /// * `raw` - Captured image, encoded or already decoded
    /// * `rotation_degrees` - Clockwise rotation compensating the sensor orientation
    fn prepare(
        &mut self,
        raw: RawImage,
        rotation_degrees: i32,
    ) -> Result<NormalizedTensor, PreprocessError>;

    /// Get the input size this preprocessor targets
    fn input_size(&self) -> (u32, u32);
}

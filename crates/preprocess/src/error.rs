use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Buffer size mismatch: expected {expected}, got {actual} bytes")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Unsupported rotation: {0} degrees (must be a multiple of 90)")]
    UnsupportedRotation(i32),

    #[error("Unknown channel order: {0}")]
    UnknownChannelOrder(String),

    #[error("Tensor shape mismatch: expected {expected:?}, got {actual:?}")]
    TensorShape {
        expected: [usize; 4],
        actual: Vec<usize>,
    },

    #[error("Image buffer error: {0}")]
    ImageBuffer(#[from] fast_image_resize::ImageBufferError),

    #[error("Resize failed: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

use crate::error::PreprocessError;
use common::span;
use image::RgbImage;

/// A captured image as handed over by the capture surface.
#[derive(Debug, Clone)]
pub enum RawImage {
    /// Compressed single-plane image bytes (JPEG, PNG).
    Encoded(Vec<u8>),
    /// Packed RGB8 pixels, row-major.
    Decoded {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
}

impl RawImage {
    pub fn encoded(bytes: impl Into<Vec<u8>>) -> Self {
        RawImage::Encoded(bytes.into())
    }

    pub fn from_rgb(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        RawImage::Decoded {
            width,
            height,
            pixels: image.into_raw(),
        }
    }

    /// Decode into an RGB pixel grid, validating the result.
    pub fn decode(self) -> Result<RgbImage, PreprocessError> {
        let _s = span!("decode");

        let image = match self {
            RawImage::Encoded(bytes) => {
                tracing::trace!(encoded_bytes = bytes.len(), "Decoding compressed image");
                image::load_from_memory(&bytes)?.into_rgb8()
            }
            RawImage::Decoded {
                width,
                height,
                pixels,
            } => {
                check_dimensions(width, height)?;

                let expected = width as usize * height as usize * 3;
                if pixels.len() != expected {
                    return Err(PreprocessError::SizeMismatch {
                        expected,
                        actual: pixels.len(),
                    });
                }

                let actual = pixels.len();
                RgbImage::from_raw(width, height, pixels)
                    .ok_or(PreprocessError::SizeMismatch { expected, actual })?
            }
        };

        check_dimensions(image.width(), image.height())?;

        Ok(image)
    }
}

impl From<RgbImage> for RawImage {
    fn from(image: RgbImage) -> Self {
        Self::from_rgb(image)
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), PreprocessError> {
    if width == 0 || height == 0 {
        return Err(PreprocessError::InvalidDimensions { width, height });
    }
    Ok(())
}

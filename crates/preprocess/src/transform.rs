use crate::error::PreprocessError;
use common::span_debug;
use image::{RgbImage, imageops};

/// Clockwise quarter-turn rotation applied to a capture before cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(&self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Dimensions of a `width` x `height` image after this rotation.
    pub fn rotated_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    pub fn apply(&self, image: RgbImage) -> RgbImage {
        let _s = span_debug!("rotate", degrees = self.degrees());

        match self {
            Rotation::Deg0 => image,
            Rotation::Deg90 => imageops::rotate90(&image),
            Rotation::Deg180 => imageops::rotate180(&image),
            Rotation::Deg270 => imageops::rotate270(&image),
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = PreprocessError;

    /// Accepts any multiple of 90, including negative and > 360 values.
    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            _ => Err(PreprocessError::UnsupportedRotation(degrees)),
        }
    }
}

/// Square region trimmed symmetrically from the longer side of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub size: u32,
}

impl CropBox {
    /// Largest centered square. Offsets use integer halves of both sides, so
    /// odd differences leave the extra column/row on the right/bottom.
    pub fn center_square(width: u32, height: u32) -> Self {
        if width >= height {
            CropBox {
                left: width / 2 - height / 2,
                top: 0,
                size: height,
            }
        } else {
            CropBox {
                left: 0,
                top: height / 2 - width / 2,
                size: width,
            }
        }
    }
}

use crate::error::PreprocessError;
use std::fmt;
use std::str::FromStr;

/// Side length of the square model input.
pub const MODEL_INPUT_SIZE: u32 = 224;

pub const DEFAULT_INPUT_SIZE: (u32, u32) = (MODEL_INPUT_SIZE, MODEL_INPUT_SIZE);

/// Resolution to request from the capture surface. Actual captures may be any
/// size; crop and resize take care of the difference.
pub const CAPTURE_RESOLUTION_HINT: (u32, u32) = DEFAULT_INPUT_SIZE;

/// Camera sensors on phones are mounted landscape, so portrait captures arrive
/// rotated by a quarter turn.
pub const DEFAULT_ROTATION_DEGREES: i32 = 90;

pub const IMG_MEAN: f32 = 0.0;
pub const IMG_STD: f32 = 255.0;

/// Order in which the three color channels of a pixel are written to the tensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

impl ChannelOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelOrder::Rgb => "rgb",
            ChannelOrder::Bgr => "bgr",
        }
    }

    /// Source channel index (into an RGB pixel) for each tensor slot.
    pub(crate) fn source_indices(&self) -> [usize; 3] {
        match self {
            ChannelOrder::Rgb => [0, 1, 2],
            ChannelOrder::Bgr => [2, 1, 0],
        }
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelOrder {
    type Err = PreprocessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rgb" => Ok(ChannelOrder::Rgb),
            "bgr" => Ok(ChannelOrder::Bgr),
            other => Err(PreprocessError::UnknownChannelOrder(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessConfig {
    /// Subtracted from every 8-bit channel value.
    pub mean: f32,
    /// Divides every mean-shifted channel value.
    pub std: f32,
    pub channel_order: ChannelOrder,
    /// Rotation used by `prepare_default`.
    pub default_rotation: i32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            mean: IMG_MEAN,
            std: IMG_STD,
            channel_order: ChannelOrder::default(),
            default_rotation: DEFAULT_ROTATION_DEGREES,
        }
    }
}

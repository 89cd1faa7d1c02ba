use crate::config::MODEL_INPUT_SIZE;
use crate::error::PreprocessError;
use ndarray::{Array4, ArrayView4};

const SIDE: usize = MODEL_INPUT_SIZE as usize;

/// Model input in NHWC layout: `[1, 224, 224, 3]` f32.
///
/// The shape is checked on construction and cannot change afterwards, so a
/// value of this type is always safe to feed to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    data: Array4<f32>,
}

impl NormalizedTensor {
    pub const SHAPE: [usize; 4] = [1, SIDE, SIDE, 3];

    pub const LEN: usize = SIDE * SIDE * 3;

    pub fn from_vec(values: Vec<f32>) -> Result<Self, PreprocessError> {
        if values.len() != Self::LEN {
            return Err(PreprocessError::TensorShape {
                expected: Self::SHAPE,
                actual: vec![values.len()],
            });
        }
        let data = Array4::from_shape_vec(Self::SHAPE, values)?;
        Ok(Self { data })
    }

    pub fn from_array(array: Array4<f32>) -> Result<Self, PreprocessError> {
        if array.shape() != &Self::SHAPE[..] {
            return Err(PreprocessError::TensorShape {
                expected: Self::SHAPE,
                actual: array.shape().to_vec(),
            });
        }
        let data = if array.is_standard_layout() {
            array
        } else {
            array.as_standard_layout().into_owned()
        };
        Ok(Self { data })
    }

    /// Tensor filled with a single value, mostly useful for warm-up runs.
    pub fn filled(value: f32) -> Self {
        Self {
            data: Array4::from_elem(Self::SHAPE, value),
        }
    }

    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.data
    }

    pub fn into_inner(self) -> Array4<f32> {
        self.data
    }

    /// The three channel values written for pixel `(x, y)`, or `None` when
    /// the coordinates fall outside the 224x224 grid.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[f32; 3]> {
        Some([
            *self.data.get([0, y, x, 0])?,
            *self.data.get([0, y, x, 1])?,
            *self.data.get([0, y, x, 2])?,
        ])
    }

    pub fn byte_len(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }
}

use crate::config::{MODEL_INPUT_SIZE, PreprocessConfig};
use crate::error::PreprocessError;
use crate::raw::RawImage;
use crate::tensor::NormalizedTensor;
use crate::transform::{CropBox, Rotation};
use crate::Preprocess;
use common::span;
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer,
    images::{Image, ImageRef},
};
use image::{RgbImage, imageops};

/// Turns a captured image into the model's `[1, 224, 224, 3]` input.
///
/// The resizer and the 224x224 destination image are kept between calls;
/// `&mut self` on every entry point keeps callers to one preparation at a time.
pub struct ImagePreprocessor {
    config: PreprocessConfig,
    resizer: Resizer,
    resized: Image<'static>,
}

impl ImagePreprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self {
            config,
            resizer: Resizer::new(),
            resized: Image::new(MODEL_INPUT_SIZE, MODEL_INPUT_SIZE, PixelType::U8x3),
        }
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Decode, rotate, center-crop, resize and normalize `raw`.
    ///
    /// Nothing is written to a tensor until every earlier step succeeded.
    pub fn prepare(
        &mut self,
        raw: RawImage,
        rotation_degrees: i32,
    ) -> Result<NormalizedTensor, PreprocessError> {
        let _s = span!("prepare");

        let rotation = Rotation::try_from(rotation_degrees)?;
        let decoded = raw.decode()?;

        tracing::trace!(
            width = decoded.width(),
            height = decoded.height(),
            rotation = rotation.degrees(),
            "Preparing captured image"
        );

        let rotated = rotation.apply(decoded);
        self.crop_and_resize(&rotated)?;
        drop(rotated);

        self.normalize()
    }

    /// `prepare` with the configured default rotation.
    pub fn prepare_default(&mut self, raw: RawImage) -> Result<NormalizedTensor, PreprocessError> {
        let rotation = self.config.default_rotation;
        self.prepare(raw, rotation)
    }

    fn crop_and_resize(&mut self, image: &RgbImage) -> Result<(), PreprocessError> {
        let _s = span!("crop_and_resize");

        let (width, height) = image.dimensions();
        let crop = CropBox::center_square(width, height);

        tracing::trace!(
            left = crop.left,
            top = crop.top,
            size = crop.size,
            "Center crop"
        );

        // Crop into its own buffer so the resampling filter never reaches
        // pixels outside the square.
        let cropped =
            imageops::crop_imm(image, crop.left, crop.top, crop.size, crop.size).to_image();

        let src = ImageRef::new(crop.size, crop.size, cropped.as_raw(), PixelType::U8x3)?;

        self.resizer.resize(
            &src,
            &mut self.resized,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        )?;

        Ok(())
    }

    fn normalize(&self) -> Result<NormalizedTensor, PreprocessError> {
        let _s = span!("normalize");

        let PreprocessConfig {
            mean,
            std,
            channel_order,
            ..
        } = self.config;
        let order = channel_order.source_indices();

        let mut output = Vec::with_capacity(NormalizedTensor::LEN);
        for px in self.resized.buffer().chunks_exact(3) {
            for &channel in &order {
                output.push((px[channel] as f32 - mean) / std);
            }
        }

        NormalizedTensor::from_vec(output)
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(PreprocessConfig::default())
    }
}

impl Preprocess for ImagePreprocessor {
    fn prepare(
        &mut self,
        raw: RawImage,
        rotation_degrees: i32,
    ) -> Result<NormalizedTensor, PreprocessError> {
        ImagePreprocessor::prepare(self, raw, rotation_degrees)
    }

    fn input_size(&self) -> (u32, u32) {
        (MODEL_INPUT_SIZE, MODEL_INPUT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelOrder;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    fn encode_png(image: &RgbImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    /// Gradient pattern so rotations and crops are observable
    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_output_shape_for_rectangular_inputs() {
        let mut preprocessor = ImagePreprocessor::default();

        for (width, height) in [(400, 300), (300, 400), (1920, 1080), (17, 991), (1, 1)] {
            let tensor = preprocessor
                .prepare(RawImage::from_rgb(gradient(width, height)), 90)
                .unwrap();
            assert_eq!(
                tensor.view().shape(),
                &[1, 224, 224, 3],
                "Wrong shape for {width}x{height}"
            );
        }
    }

    #[test]
    fn test_solid_white_normalizes_to_one() {
        let white = RgbImage::from_pixel(640, 480, Rgb([255, 255, 255]));
        let mut preprocessor = ImagePreprocessor::default();

        let tensor = preprocessor.prepare_default(RawImage::from_rgb(white)).unwrap();

        assert!(tensor.as_array().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_solid_black_normalizes_to_zero() {
        let black = RgbImage::new(300, 500);
        let mut preprocessor = ImagePreprocessor::default();

        let tensor = preprocessor.prepare_default(RawImage::from_rgb(black)).unwrap();

        assert!(tensor.as_array().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_channels_written_red_green_blue() {
        let image = RgbImage::from_pixel(224, 224, Rgb([255, 0, 51]));
        let mut preprocessor = ImagePreprocessor::default();

        let tensor = preprocessor.prepare(RawImage::from_rgb(image), 0).unwrap();

        assert_eq!(tensor.pixel(100, 100), Some([1.0, 0.0, 0.2]));
    }

    #[test]
    fn test_bgr_channel_order() {
        let image = RgbImage::from_pixel(224, 224, Rgb([255, 0, 51]));
        let config = PreprocessConfig {
            channel_order: ChannelOrder::Bgr,
            ..Default::default()
        };
        let mut preprocessor = ImagePreprocessor::new(config);

        let tensor = preprocessor.prepare(RawImage::from_rgb(image), 0).unwrap();

        assert_eq!(tensor.pixel(0, 0), Some([0.2, 0.0, 1.0]));
    }

    #[test]
    fn test_square_input_survives_quarter_turn() {
        // A 224x224 capture rotated back by 270 degrees must come out of
        // prepare(.., 90) as the original image.
        let original = gradient(224, 224);
        let captured = imageops::rotate270(&original);
        let mut preprocessor = ImagePreprocessor::default();

        let tensor = preprocessor.prepare(RawImage::from_rgb(captured), 90).unwrap();

        let tolerance = 1.0 / 255.0 + f32::EPSILON;
        for (x, y, px) in original.enumerate_pixels() {
            let actual = tensor.pixel(x as usize, y as usize).unwrap();
            for c in 0..3 {
                let expected = px[c] as f32 / 255.0;
                assert!(
                    (actual[c] - expected).abs() <= tolerance,
                    "pixel ({x}, {y}) channel {c}: expected {expected}, got {}",
                    actual[c]
                );
            }
        }
    }

    #[test]
    fn test_center_crop_discards_sides() {
        // 672x224 landscape: left and right thirds red, middle third green.
        // After cropping to the middle 224x224 no red may remain.
        let image = RgbImage::from_fn(672, 224, |x, _| {
            if (224..448).contains(&x) {
                Rgb([0, 255, 0])
            } else {
                Rgb([255, 0, 0])
            }
        });
        let mut preprocessor = ImagePreprocessor::default();

        let tensor = preprocessor.prepare(RawImage::from_rgb(image), 0).unwrap();

        for y in [0usize, 100, 223] {
            for x in [0usize, 112, 223] {
                assert_eq!(tensor.pixel(x, y), Some([0.0, 1.0, 0.0]), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_rotation_applied_before_crop() {
        // 448x224 image: top half blue, bottom half white. Rotating by 90
        // gives a 224x448 portrait whose centered square straddles both.
        let image = RgbImage::from_fn(448, 224, |_, y| {
            if y < 112 {
                Rgb([0, 0, 255])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let mut preprocessor = ImagePreprocessor::default();

        let tensor = preprocessor.prepare(RawImage::from_rgb(image), 90).unwrap();

        // Clockwise rotation puts the old top on the right, old bottom on the left
        assert_eq!(tensor.pixel(223, 112), Some([0.0, 0.0, 1.0]));
        assert_eq!(tensor.pixel(0, 112), Some([1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_encoded_input_is_decoded() {
        let png = encode_png(&RgbImage::from_pixel(400, 300, Rgb([255, 255, 255])));
        let mut preprocessor = ImagePreprocessor::default();

        let tensor = preprocessor.prepare_default(RawImage::encoded(png)).unwrap();

        assert_eq!(tensor.pixel(0, 0), Some([1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_decode_failure_returns_error() {
        let mut preprocessor = ImagePreprocessor::default();

        let result = preprocessor.prepare_default(RawImage::encoded(vec![1, 2, 3, 4]));

        assert!(matches!(result, Err(PreprocessError::Decode(_))));
    }

    #[test]
    fn test_unsupported_rotation_fails_before_decode() {
        let mut preprocessor = ImagePreprocessor::default();

        // Garbage bytes would fail decoding; the rotation check must win.
        let result = preprocessor.prepare(RawImage::encoded(vec![0u8; 8]), 45);

        assert!(matches!(result, Err(PreprocessError::UnsupportedRotation(45))));
    }

    #[test]
    fn test_reuse_does_not_leak_previous_image() {
        let mut preprocessor = ImagePreprocessor::default();

        let white = RgbImage::from_pixel(500, 500, Rgb([255, 255, 255]));
        preprocessor.prepare_default(RawImage::from_rgb(white)).unwrap();

        let black = RgbImage::new(300, 200);
        let tensor = preprocessor.prepare_default(RawImage::from_rgb(black)).unwrap();

        assert!(tensor.as_array().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_preprocess_trait() {
        let mut preprocessor = ImagePreprocessor::default();
        let preprocess: &mut dyn Preprocess = &mut preprocessor;

        assert_eq!(preprocess.input_size(), (224, 224));
        assert!(
            preprocess
                .prepare(RawImage::from_rgb(gradient(100, 100)), 180)
                .is_ok()
        );
    }
}

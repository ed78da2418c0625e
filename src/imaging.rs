//! Decoding of test images and masks into fixed-size normalized buffers.
//!
//! Images are kept channel-interleaved (`[height, width, 3]`) in `[0, 1]`;
//! masks and binarized predictions are flat row-major boolean grids.

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma, RgbImage, imageops::FilterType};

use crate::error::{EvalError, Result};

/// An image/ground-truth pair from the test split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePair {
    pub image: PathBuf,
    pub mask: PathBuf,
}

impl SamplePair {
    pub fn new(image: impl Into<PathBuf>, mask: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            mask: mask.into(),
        }
    }

    /// Base file name of the image, extension included.
    pub fn name(&self) -> String {
        self.image
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.image.to_string_lossy().into_owned())
    }
}

/// RGB image with every channel scaled to `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImage {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl NormalizedImage {
    pub fn from_rgb(image: &RgbImage) -> Self {
        let data = image.as_raw().iter().map(|&v| v as f32 / 255.0).collect();

        Self {
            width: image.width() as usize,
            height: image.height() as usize,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Planar `[3, height, width]` layout expected by the network.
    pub fn to_chw(&self) -> Vec<f32> {
        let plane = self.width * self.height;
        let mut chw = Vec::with_capacity(3 * plane);

        for c in 0..3 {
            chw.extend(self.data.iter().skip(c).step_by(3));
        }

        chw
    }

    /// Back to 8 bits per channel, truncating.
    pub fn to_rgb8(&self) -> RgbImage {
        let raw = self
            .data
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8)
            .collect();

        // the buffer length is 3 * width * height by construction
        RgbImage::from_raw(self.width as u32, self.height as u32, raw)
            .unwrap_or_else(|| RgbImage::new(self.width as u32, self.height as u32))
    }
}

/// Per-pixel foreground probability produced by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityMap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl ProbabilityMap {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height {
            return Err(EvalError::ShapeMismatch {
                expected: format!("{} values ({height}x{width})", width * height),
                actual: format!("{} values", data.len()),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f32] {
        &self.data
    }

    /// Pixels at or above `threshold` are foreground.
    pub fn binarize(&self, threshold: f32) -> BinaryMask {
        BinaryMask {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&p| p >= threshold).collect(),
        }
    }

    /// Probabilities clipped to `[0, 1]` and scaled to 8 bits, truncating.
    pub fn to_gray8(&self) -> GrayImage {
        let raw = self
            .data
            .iter()
            .map(|&p| (p.clamp(0.0, 1.0) * 255.0) as u8)
            .collect();

        GrayImage::from_raw(self.width as u32, self.height as u32, raw)
            .unwrap_or_else(|| GrayImage::new(self.width as u32, self.height as u32))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl BinaryMask {
    pub fn new(width: usize, height: usize, data: Vec<bool>) -> Result<Self> {
        if data.len() != width * height {
            return Err(EvalError::ShapeMismatch {
                expected: format!("{} pixels ({height}x{width})", width * height),
                actual: format!("{} pixels", data.len()),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[bool] {
        &self.data
    }

    /// Foreground as 255, background as 0.
    pub fn to_gray8(&self) -> GrayImage {
        let mut image = GrayImage::new(self.width as u32, self.height as u32);
        for (pixel, &positive) in image.pixels_mut().zip(&self.data) {
            *pixel = Luma([if positive { 255 } else { 0 }]);
        }
        image
    }
}

/// Decode an image as RGB, resize it (bilinear) to `[height, width]` and scale to `[0, 1]`.
pub fn read_image<P: AsRef<Path>>(path: P, size: [usize; 2]) -> Result<NormalizedImage> {
    let path = path.as_ref();
    let [height, width] = size;

    let image = image::open(path).map_err(|source| EvalError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;

    let resized = image
        .resize_exact(width as u32, height as u32, FilterType::Triangle)
        .to_rgb8();

    Ok(NormalizedImage::from_rgb(&resized))
}

/// Decode a mask as grayscale, resize it (bilinear) to `[height, width]` and keep the
/// pixels whose normalized intensity is strictly above `threshold`.
pub fn read_mask<P: AsRef<Path>>(path: P, size: [usize; 2], threshold: f32) -> Result<BinaryMask> {
    let path = path.as_ref();
    let [height, width] = size;

    let mask = image::open(path)
        .map_err(|source| EvalError::MaskDecode {
            path: path.to_path_buf(),
            source,
        })?
        .to_luma8();

    let resized = image::imageops::resize(&mask, width as u32, height as u32, FilterType::Triangle);
    let data = resized
        .as_raw()
        .iter()
        .map(|&v| v as f32 / 255.0 > threshold)
        .collect();

    BinaryMask::new(width, height, data)
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn sample_name_is_base_file_name() {
        let pair = SamplePair::new("data/images/case_01.png", "data/masks/case_01.png");
        assert_eq!(pair.name(), "case_01.png");
    }

    #[test]
    fn chw_splits_channels_into_planes() {
        let mut rgb = RgbImage::new(2, 1);
        rgb.put_pixel(0, 0, Rgb([255, 0, 0]));
        rgb.put_pixel(1, 0, Rgb([0, 255, 51]));

        let image = NormalizedImage::from_rgb(&rgb);

        assert_eq!(image.to_chw(), vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.2]);
        assert_eq!(image.to_rgb8(), rgb);
    }

    #[test]
    fn prediction_threshold_is_inclusive() {
        let map = ProbabilityMap::new(3, 1, vec![0.49, 0.5, 0.9]).unwrap();
        assert_eq!(map.binarize(0.5).pixels(), &[false, true, true]);
    }

    #[test]
    fn probability_map_rejects_wrong_length() {
        assert!(matches!(
            ProbabilityMap::new(2, 2, vec![0.0; 3]),
            Err(EvalError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn mask_threshold_is_strict() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");

        // 128 / 255 > 0.5, 127 / 255 < 0.5
        let mut gray = GrayImage::new(2, 2);
        gray.put_pixel(0, 0, Luma([128]));
        gray.put_pixel(1, 0, Luma([127]));
        gray.put_pixel(0, 1, Luma([255]));
        gray.save(&path).unwrap();

        let mask = read_mask(&path, [2, 2], 0.5).unwrap();
        assert_eq!(mask.pixels(), &[true, false, true, false]);
    }

    #[test]
    fn read_image_resizes_and_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        RgbImage::from_pixel(10, 6, Rgb([255, 255, 255]))
            .save(&path)
            .unwrap();

        let image = read_image(&path, [4, 8]).unwrap();

        assert_eq!((image.height(), image.width()), (4, 8));
        assert!(image.to_chw().iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn undecodable_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(matches!(
            read_image(&path, [4, 4]),
            Err(EvalError::ImageDecode { .. })
        ));
        assert!(matches!(
            read_mask(dir.path().join("missing.png"), [4, 4], 0.5),
            Err(EvalError::MaskDecode { .. })
        ));
    }
}

//! Heatmap overlays of predicted probabilities on the input image.

mod colormap;
mod contour;

use std::path::Path;

use image::{Rgb, RgbImage};

pub use colormap::{apply_jet, jet};
pub use contour::{draw_contours, external_contours};

use crate::{
    config::EvaluationConfig,
    error::{EvalError, Result},
    imaging::{NormalizedImage, ProbabilityMap},
};

/// How the overlay is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// Heatmap weight; the image gets `1 - alpha`.
    pub alpha: f32,
    pub threshold: f32,
    pub contour_color: Rgb<u8>,
    pub contour_thickness: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            threshold: 0.5,
            contour_color: Rgb([255, 165, 0]),
            contour_thickness: 2,
        }
    }
}

impl From<&EvaluationConfig> for OverlayStyle {
    fn from(config: &EvaluationConfig) -> Self {
        Self {
            alpha: config.overlay_alpha,
            threshold: config.prediction_threshold,
            contour_color: Rgb(config.contour_color),
            contour_thickness: config.contour_thickness,
        }
    }
}

/// Blend `foreground` over `background` with weight `alpha`, rounding and saturating.
pub fn blend(background: &RgbImage, foreground: &RgbImage, alpha: f32) -> RgbImage {
    RgbImage::from_fn(background.width(), background.height(), |x, y| {
        let bg = background.get_pixel(x, y).0;
        let fg = foreground.get_pixel(x, y).0;
        Rgb(std::array::from_fn(|c| {
            ((1.0 - alpha) * bg[c] as f32 + alpha * fg[c] as f32)
                .round()
                .clamp(0.0, 255.0) as u8
        }))
    })
}

/// Heatmap of `probabilities` blended over `image`, with the outline of the
/// thresholded foreground drawn on top.
pub fn render_overlay(
    image: &NormalizedImage,
    probabilities: &ProbabilityMap,
    style: &OverlayStyle,
) -> Result<RgbImage> {
    if (image.width(), image.height()) != (probabilities.width(), probabilities.height()) {
        return Err(EvalError::ShapeMismatch {
            expected: format!("{}x{}", image.height(), image.width()),
            actual: format!("{}x{}", probabilities.height(), probabilities.width()),
        });
    }

    let heatmap = apply_jet(&probabilities.to_gray8());
    let mut overlay = blend(&image.to_rgb8(), &heatmap, style.alpha);

    let contours = external_contours(&probabilities.binarize(style.threshold));
    draw_contours(
        &mut overlay,
        &contours,
        style.contour_color,
        style.contour_thickness,
    );

    Ok(overlay)
}

/// Render the overlay and write it to `path`; the format follows the extension.
pub fn save_overlay<P: AsRef<Path>>(
    image: &NormalizedImage,
    probabilities: &ProbabilityMap,
    style: &OverlayStyle,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let overlay = render_overlay(image, probabilities, style)?;

    overlay.save(path).map_err(|source| EvalError::ImageSave {
        path: path.to_path_buf(),
        source,
    })
}

use std::path::PathBuf;

use burn::prelude::*;

use crate::metrics::ZeroDivision;

/// Settings of one evaluation run.
///
/// Every field has a default, so `EvaluationConfig::new()` evaluates
/// `files/model.mpk` on the test split of `data/` and writes into `results/`.
#[derive(Config, Debug)]
pub struct EvaluationConfig {
    /// Serialized U-Net record written by a `CompactRecorder`.
    #[config(default = "PathBuf::from(\"files/model.mpk\")")]
    pub model_path: PathBuf,

    /// Dataset root holding `images/` and `masks/`.
    #[config(default = "PathBuf::from(\"data\")")]
    pub dataset_path: PathBuf,

    /// Overlays are written here, one per scored image.
    #[config(default = "PathBuf::from(\"results\")")]
    pub results_dir: PathBuf,

    /// Score table; `<results_dir>/score.csv` when unset.
    pub score_path: Option<PathBuf>,

    /// `[height, width]` every image and mask is resized to.
    #[config(default = "[256, 256]")]
    pub image_size: [usize; 2],

    #[config(default = 0.5)]
    pub prediction_threshold: f32,

    #[config(default = 0.5)]
    pub mask_threshold: f32,

    /// Heatmap weight in the overlay blend.
    #[config(default = 0.5)]
    pub overlay_alpha: f32,

    #[config(default = "[255, 165, 0]")]
    pub contour_color: [u8; 3],

    #[config(default = 2)]
    pub contour_thickness: u32,

    /// Fraction of the dataset held out for validation, and again for test.
    #[config(default = 0.1)]
    pub split: f64,

    #[config(default = 42)]
    pub seed: u64,

    #[config(default = 64)]
    pub base_channels: usize,

    #[config(default = "ZeroDivision::Zero")]
    pub zero_division: ZeroDivision,
}

impl EvaluationConfig {
    pub fn score_file(&self) -> PathBuf {
        self.score_path
            .clone()
            .unwrap_or_else(|| self.results_dir.join("score.csv"))
    }
}

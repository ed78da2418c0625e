use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::prelude::*;
use clap::{Args, ValueEnum};
use tracing::info;
use unet_eval::{
    EvaluationConfig, Evaluator, UNetConfig, UNetSegmenter, ZeroDivision, load_dataset,
};

#[cfg(feature = "wgpu")]
type EvalBackend = burn::backend::Wgpu<f32, i32>;
#[cfg(not(feature = "wgpu"))]
type EvalBackend = burn::backend::NdArray<f32>;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ZeroDivisionArg {
    Zero,
    One,
}

impl From<ZeroDivisionArg> for ZeroDivision {
    fn from(arg: ZeroDivisionArg) -> Self {
        match arg {
            ZeroDivisionArg::Zero => ZeroDivision::Zero,
            ZeroDivisionArg::One => ZeroDivision::One,
        }
    }
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// JSON evaluation config; flags below override its fields.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model record written by a `CompactRecorder` (.mpk).
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Dataset root with `images/` and `masks/`.
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    #[arg(short, long)]
    pub results_dir: Option<PathBuf>,

    #[arg(short, long)]
    pub score_path: Option<PathBuf>,

    #[arg(long)]
    pub base_channels: Option<usize>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Metric value when both mask and prediction are empty.
    #[arg(long, value_enum)]
    pub zero_division: Option<ZeroDivisionArg>,
}

impl EvaluateArgs {
    fn resolve_config(&self) -> Result<EvaluationConfig> {
        let mut config = match &self.config {
            Some(path) => EvaluationConfig::load(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?,
            None => EvaluationConfig::new(),
        };

        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(dataset) = &self.dataset {
            config.dataset_path = dataset.clone();
        }
        if let Some(results_dir) = &self.results_dir {
            config.results_dir = results_dir.clone();
        }
        if let Some(score_path) = &self.score_path {
            config.score_path = Some(score_path.clone());
        }
        if let Some(base_channels) = self.base_channels {
            config.base_channels = base_channels;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(zero_division) = self.zero_division {
            config.zero_division = zero_division.into();
        }

        Ok(config)
    }
}

pub fn run(args: &EvaluateArgs) -> Result<()> {
    let config = args.resolve_config()?;
    let device = Default::default();

    let unet_config = UNetConfig::new(config.image_size).with_base_channels(config.base_channels);
    let model = UNetSegmenter::<EvalBackend>::load(&unet_config, &config.model_path, &device)
        .context("Failed to load model")?;

    info!("Loading dataset from {}...", config.dataset_path.display());
    let splits = load_dataset(&config.dataset_path, config.split, config.seed)
        .context("Failed to load dataset")?;
    info!(
        "Dataset split: {} train, {} valid, {} test",
        splits.train.len(),
        splits.valid.len(),
        splits.test.len()
    );

    let summary = Evaluator::new(&model, &config)
        .run(&splits.test)
        .context("Evaluation failed")?;

    info!(
        "Evaluation completed: {} scored, {} skipped",
        summary.table.len(),
        summary.skipped
    );
    Ok(())
}

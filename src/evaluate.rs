//! The evaluation loop: predict, draw, score every test pair, then report.

use std::fs;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::{
    config::EvaluationConfig,
    error::Result,
    imaging::{SamplePair, read_image, read_mask},
    metrics::{BinaryScores, ScoreRecord, ScoreTable},
    model::SegmentationModel,
    overlay::{OverlayStyle, save_overlay},
    report::{print_summary, write_scores},
};

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub struct EvaluationSummary {
    pub table: ScoreTable,
    /// `None` when no pair could be scored.
    pub mean: Option<BinaryScores>,
    pub skipped: usize,
}

pub struct Evaluator<'a, M: SegmentationModel + ?Sized> {
    model: &'a M,
    config: &'a EvaluationConfig,
    style: OverlayStyle,
}

impl<'a, M: SegmentationModel + ?Sized> Evaluator<'a, M> {
    pub fn new(model: &'a M, config: &'a EvaluationConfig) -> Self {
        Self {
            model,
            config,
            style: OverlayStyle::from(config),
        }
    }

    /// Score one pair and write its overlay. Decode failures come back as
    /// recoverable errors.
    pub fn evaluate_pair(&self, pair: &SamplePair) -> Result<ScoreRecord> {
        let config = self.config;
        let name = pair.name();

        let image = read_image(&pair.image, config.image_size)?;
        let mask = read_mask(&pair.mask, config.image_size, config.mask_threshold)?;

        let probabilities = self.model.predict(&image)?;

        save_overlay(
            &image,
            &probabilities,
            &self.style,
            config.results_dir.join(&name),
        )?;

        let prediction = probabilities.binarize(config.prediction_threshold);
        let scores = BinaryScores::compute(&mask, &prediction, config.zero_division)?;

        Ok(ScoreRecord::new(name, scores))
    }

    /// Evaluate `pairs` in order, skipping the ones that fail to decode.
    pub fn evaluate(&self, pairs: &[SamplePair]) -> Result<(ScoreTable, usize)> {
        fs::create_dir_all(&self.config.results_dir)?;

        let progress = ProgressBar::new(pairs.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} Evaluating [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut table = ScoreTable::new();
        let mut skipped = 0;

        for pair in pairs {
            match self.evaluate_pair(pair) {
                Ok(record) => table.push(record),
                Err(err) if err.is_recoverable() => {
                    skipped += 1;
                    progress.suspend(|| warn!("Skipping {}: {err}", pair.name()));
                }
                Err(err) => {
                    progress.abandon();
                    return Err(err);
                }
            }
            progress.inc(1);
        }

        progress.finish_and_clear();

        Ok((table, skipped))
    }

    /// Evaluate, print the mean metrics and write the score table.
    pub fn run(&self, pairs: &[SamplePair]) -> Result<EvaluationSummary> {
        info!("Evaluating {} test pairs...", pairs.len());

        let (table, skipped) = self.evaluate(pairs)?;
        if skipped > 0 {
            warn!("{skipped} of {} pairs could not be read", pairs.len());
        }

        let mean = table.mean();
        match &mean {
            Some(mean) => print_summary(mean),
            None => warn!("No test pair could be scored, mean metrics are undefined"),
        }

        let score_file = self.config.score_file();
        write_scores(&table, &score_file)?;
        info!("Wrote {} scores to {}", table.len(), score_file.display());

        Ok(EvaluationSummary {
            table,
            mean,
            skipped,
        })
    }
}

use burn::prelude::*;

// `Config` derives expand to two-parameter `Result`s; keep the crate alias qualified.
use crate::{
    error::{self, EvalError},
    imaging::BinaryMask,
};

/// Value reported for a metric whose denominator is zero.
#[derive(Config, Debug, Copy, PartialEq, Eq)]
pub enum ZeroDivision {
    Zero,
    One,
}

impl ZeroDivision {
    pub fn value(self) -> f64 {
        match self {
            ZeroDivision::Zero => 0.0,
            ZeroDivision::One => 1.0,
        }
    }
}

/// Pixel counts of a prediction against the ground truth, class 1 positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub true_negatives: u64,
}

impl ConfusionCounts {
    pub fn from_masks(target: &BinaryMask, prediction: &BinaryMask) -> error::Result<Self> {
        if target.width() != prediction.width() || target.height() != prediction.height() {
            return Err(EvalError::ShapeMismatch {
                expected: format!("{}x{}", target.height(), target.width()),
                actual: format!("{}x{}", prediction.height(), prediction.width()),
            });
        }

        let mut counts = Self::default();
        for (&truth, &predicted) in target.pixels().iter().zip(prediction.pixels()) {
            match (truth, predicted) {
                (true, true) => counts.true_positives += 1,
                (false, true) => counts.false_positives += 1,
                (true, false) => counts.false_negatives += 1,
                (false, false) => counts.true_negatives += 1,
            }
        }

        Ok(counts)
    }
}

/// F1, Jaccard index, recall and precision of one prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryScores {
    pub f1: f64,
    pub jaccard: f64,
    pub recall: f64,
    pub precision: f64,
}

impl BinaryScores {
    pub fn from_counts(counts: &ConfusionCounts, zero_division: ZeroDivision) -> Self {
        let tp = counts.true_positives as f64;
        let fp = counts.false_positives as f64;
        let fn_ = counts.false_negatives as f64;

        let ratio = |numerator: f64, denominator: f64| {
            if denominator > 0.0 {
                numerator / denominator
            } else {
                zero_division.value()
            }
        };

        Self {
            f1: ratio(2.0 * tp, 2.0 * tp + fp + fn_),
            jaccard: ratio(tp, tp + fp + fn_),
            recall: ratio(tp, tp + fn_),
            precision: ratio(tp, tp + fp),
        }
    }

    pub fn compute(
        target: &BinaryMask,
        prediction: &BinaryMask,
        zero_division: ZeroDivision,
    ) -> error::Result<Self> {
        let counts = ConfusionCounts::from_masks(target, prediction)?;
        Ok(Self::from_counts(&counts, zero_division))
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.f1, self.jaccard, self.recall, self.precision]
    }
}

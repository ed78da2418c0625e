//! Per-image binary segmentation scores and their aggregation.

mod binary;
mod table;

pub use binary::{BinaryScores, ConfusionCounts, ZeroDivision};
pub use table::{ScoreRecord, ScoreTable};

pub mod config;
pub mod error;
pub mod evaluate;
pub mod imaging;
pub mod metrics;
pub mod model;
pub mod overlay;
pub mod report;

#[cfg(feature = "dataset")]
pub mod dataset;

pub use config::EvaluationConfig;
pub use error::{EvalError, Result};
pub use evaluate::{EvaluationSummary, Evaluator};
pub use imaging::{BinaryMask, NormalizedImage, ProbabilityMap, SamplePair};
pub use metrics::{BinaryScores, ScoreRecord, ScoreTable, ZeroDivision};
pub use model::{SegmentationModel, UNet, UNetConfig, UNetSegmenter};

#[cfg(feature = "dataset")]
pub use dataset::{DatasetSplits, load_dataset};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

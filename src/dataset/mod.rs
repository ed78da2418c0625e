//! Discovery of image/mask pairs on disk and their train/validation/test split.

mod split;

pub use split::{DatasetSplits, collect_pairs, load_dataset, split_pairs};

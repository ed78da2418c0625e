use std::path::{Path, PathBuf};

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::debug;

use crate::{
    error::{EvalError, Result},
    imaging::SamplePair,
};

const SUPPORTED_FILES: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Train, validation and test pairs of one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSplits {
    pub train: Vec<SamplePair>,
    pub valid: Vec<SamplePair>,
    pub test: Vec<SamplePair>,
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_FILES
                .iter()
                .any(|&valid_ext| valid_ext.eq_ignore_ascii_case(ext))
        })
}

fn find_mask(masks_dir: &Path, stem: &str) -> Option<PathBuf> {
    SUPPORTED_FILES
        .iter()
        .map(|ext| masks_dir.join(format!("{stem}.{ext}")))
        .find(|candidate| candidate.is_file())
}

/// Pair every supported file of `<root>/images` with the mask of the same stem in
/// `<root>/masks`. Images without a mask are left out. Pairs are sorted by image path.
pub fn collect_pairs<P: AsRef<Path>>(root: P) -> Result<Vec<SamplePair>> {
    let root = root.as_ref();
    let images_dir = root.join("images");
    let masks_dir = root.join("masks");

    if !images_dir.is_dir() {
        return Err(EvalError::Dataset(format!(
            "images directory does not exist: {}",
            images_dir.display()
        )));
    }

    if !masks_dir.is_dir() {
        return Err(EvalError::Dataset(format!(
            "masks directory does not exist: {}",
            masks_dir.display()
        )));
    }

    let mut pairs = Vec::new();
    for entry in std::fs::read_dir(&images_dir)? {
        let path = entry?.path();

        if !path.is_file() || !is_supported(&path) {
            continue;
        }

        let Some(stem) = path.file_stem().map(|stem| stem.to_string_lossy().into_owned()) else {
            continue;
        };

        match find_mask(&masks_dir, &stem) {
            Some(mask) => pairs.push(SamplePair::new(path, mask)),
            None => debug!("No mask for {}, ignoring it", path.display()),
        }
    }

    pairs.sort_by(|a, b| a.image.cmp(&b.image));

    Ok(pairs)
}

/// Shuffle `pairs` with `seed` and cut off `ceil(split * n)` pairs for validation,
/// then as many for test; the rest is training data.
pub fn split_pairs(mut pairs: Vec<SamplePair>, split: f64, seed: u64) -> Result<DatasetSplits> {
    if !(0.0..=0.5).contains(&split) {
        return Err(EvalError::Dataset(format!(
            "split ratio must be within [0, 0.5], got {split}"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    pairs.shuffle(&mut rng);

    let total = pairs.len();
    let split_size = ((split * total as f64).ceil() as usize).min(total);

    let mut rest = pairs.split_off(split_size);
    let valid = pairs;

    let test_size = split_size.min(rest.len());
    let train = rest.split_off(test_size);
    let test = rest;

    Ok(DatasetSplits { train, valid, test })
}

/// Collect the pairs under `root` and split them.
pub fn load_dataset<P: AsRef<Path>>(root: P, split: f64, seed: u64) -> Result<DatasetSplits> {
    let pairs = collect_pairs(root)?;
    split_pairs(pairs, split, seed)
}

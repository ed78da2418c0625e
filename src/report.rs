//! Summary printing and the per-image score CSV.

use std::{fs, path::Path};

use serde::Serialize;

use crate::{
    error::Result,
    metrics::{BinaryScores, ScoreTable},
};

const HEADER: [&str; 6] = ["", "Image", "F1", "Jaccard", "Recall", "Precision"];

#[derive(Serialize)]
struct ScoreRow<'a> {
    index: usize,
    image: &'a str,
    f1: f64,
    jaccard: f64,
    recall: f64,
    precision: f64,
}

/// The four mean metrics, one per line, five decimals.
pub fn format_summary(mean: &BinaryScores) -> String {
    format!(
        "F1: {:0.5}\nJaccard: {:0.5}\nRecall: {:0.5}\nPrecision: {:0.5}",
        mean.f1, mean.jaccard, mean.recall, mean.precision
    )
}

pub fn print_summary(mean: &BinaryScores) {
    println!("{}", format_summary(mean));
}

/// Write the table with a leading unnamed row-index column. Parent directories
/// are created as needed.
pub fn write_scores<P: AsRef<Path>>(table: &ScoreTable, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(HEADER)?;
    for (index, record) in table.records().iter().enumerate() {
        let scores = &record.scores;
        writer.serialize(ScoreRow {
            index,
            image: &record.name,
            f1: scores.f1,
            jaccard: scores.jaccard,
            recall: scores.recall,
            precision: scores.precision,
        })?;
    }

    writer.flush()?;
    Ok(())
}

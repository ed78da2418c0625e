use derive_new::new;

use super::BinaryScores;

/// Scores of one test image.
#[derive(new, Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub name: String,
    pub scores: BinaryScores,
}

/// Ordered per-image scores of an evaluation run.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    records: Vec<ScoreRecord>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ScoreRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Arithmetic mean of each metric, `None` when nothing was scored.
    pub fn mean(&self) -> Option<BinaryScores> {
        if self.records.is_empty() {
            return None;
        }

        let mut sums = [0.0; 4];
        for record in &self.records {
            for (sum, value) in sums.iter_mut().zip(record.scores.as_array()) {
                *sum += value;
            }
        }

        let count = self.records.len() as f64;
        let [f1, jaccard, recall, precision] = sums.map(|sum| sum / count);

        Some(BinaryScores {
            f1,
            jaccard,
            recall,
            precision,
        })
    }
}

impl FromIterator<ScoreRecord> for ScoreTable {
    fn from_iter<I: IntoIterator<Item = ScoreRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, values: [f64; 4]) -> ScoreRecord {
        let [f1, jaccard, recall, precision] = values;
        ScoreRecord::new(
            name.to_string(),
            BinaryScores {
                f1,
                jaccard,
                recall,
                precision,
            },
        )
    }

    #[test]
    fn empty_table_has_no_mean() {
        assert_eq!(ScoreTable::new().mean(), None);
    }

    #[test]
    fn mean_is_arithmetic_mean_per_metric() {
        let table: ScoreTable = [
            record("a.png", [1.0, 1.0, 1.0, 1.0]),
            record("b.png", [0.5, 0.25, 0.0, 0.75]),
            record("c.png", [0.0, 0.5, 0.5, 0.2]),
        ]
        .into_iter()
        .collect();

        let mean = table.mean().unwrap();

        assert_eq!(mean.f1, (1.0 + 0.5 + 0.0) / 3.0);
        assert_eq!(mean.jaccard, (1.0 + 0.25 + 0.5) / 3.0);
        assert_eq!(mean.recall, (1.0 + 0.0 + 0.5) / 3.0);
        assert_eq!(mean.precision, (1.0 + 0.75 + 0.2) / 3.0);
    }

    #[test]
    fn records_keep_insertion_order() {
        let mut table = ScoreTable::new();
        table.push(record("z.png", [0.0; 4]));
        table.push(record("a.png", [1.0; 4]));

        let names: Vec<_> = table.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["z.png", "a.png"]);
        assert_eq!(table.len(), 2);
    }
}

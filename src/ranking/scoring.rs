//! Composite importance score.
//!
//! Five raw signals are normalized against their batch maximum and folded
//! with equal weights; the entrypoint flag adds a smaller fixed bonus.
//!
//! | signal | source |
//! |---|---|
//! | inbound | resolved references into the file |
//! | centrality | PageRank |
//! | surface | public-surface weight |
//! | influence | outgoing dependency count |
//! | complexity | branch/loop keywords + boolean operators |

use crate::types::{AnalysisRecord, CentralityTable, ScoredFile};

/// Weight of each normalized signal.
pub const SIGNAL_WEIGHT: f64 = 0.18;
/// Bonus for entrypoint files.
pub const ENTRYPOINT_BONUS: f64 = 0.10;

/// Raw per-file signals in a fixed order.
#[derive(Debug, Clone, Copy, Default)]
struct Signals([f64; 5]);

impl Signals {
    fn of(record: &AnalysisRecord, pagerank: f64) -> Self {
        Signals([
            f64::from(record.inbound),
            pagerank,
            f64::from(record.public_weight),
            record.dependencies.len() as f64,
            f64::from(record.complexity),
        ])
    }

    fn max(self, other: Self) -> Self {
        let mut out = self.0;
        for (slot, value) in out.iter_mut().zip(other.0) {
            *slot = slot.max(value);
        }
        Signals(out)
    }
}

/// Divide by the batch maximum; a zero maximum normalizes to zero.
fn normalize(value: f64, max: f64) -> f64 {
    if max > 0.0 { value / max } else { 0.0 }
}

/// Score every record. Output order follows input order.
pub fn score_files(records: Vec<AnalysisRecord>, centrality: &CentralityTable) -> Vec<ScoredFile> {
    let raw: Vec<(AnalysisRecord, f64, Signals)> = records
        .into_iter()
        .map(|record| {
            let pagerank = centrality.get(&record.rel_path).copied().unwrap_or(0.0);
            let signals = Signals::of(&record, pagerank);
            (record, pagerank, signals)
        })
        .collect();

    let maxima = raw
        .iter()
        .fold(Signals::default(), |acc, (_, _, s)| acc.max(*s));

    raw.into_iter()
        .map(|(record, pagerank, signals)| {
            let folded: f64 = signals
                .0
                .iter()
                .zip(maxima.0)
                .map(|(&value, max)| SIGNAL_WEIGHT * normalize(value, max))
                .sum();
            let bonus = if record.is_entrypoint { ENTRYPOINT_BONUS } else { 0.0 };
            ScoredFile {
                inbound: record.inbound,
                pagerank,
                score: (folded + bonus).clamp(0.0, 1.0),
                record,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(path: &str, inbound: u32, weight: u32, deps: &[&str], complexity: u32) -> AnalysisRecord {
        AnalysisRecord {
            rel_path: Arc::from(path),
            inbound,
            public_weight: weight,
            dependencies: deps.iter().map(|d| Arc::from(*d)).collect(),
            complexity,
            ..Default::default()
        }
    }

    fn table(entries: &[(&str, f64)]) -> CentralityTable {
        entries.iter().map(|(p, r)| (Arc::from(*p), *r)).collect()
    }

    #[test]
    fn test_batch_maximum_scores_all_signals() {
        let records = vec![
            record("top.swift", 4, 6, &["x", "y"], 10),
            record("half.swift", 2, 3, &["x"], 5),
        ];
        let scored = score_files(records, &table(&[("top.swift", 0.6), ("half.swift", 0.3)]));

        assert!((scored[0].score - 0.90).abs() < 1e-9);
        assert!((scored[1].score - 0.45).abs() < 1e-9);
        assert_eq!(scored[0].inbound, 4);
        assert!((scored[1].pagerank - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_entrypoint_bonus_and_clamp() {
        let mut top = record("main.swift", 1, 1, &["a"], 1);
        top.is_entrypoint = true;
        let scored = score_files(vec![top], &table(&[("main.swift", 1.0)]));
        // 5 * 0.18 + 0.10 = 1.0
        assert!((scored[0].score - 1.0).abs() < 1e-9);
        assert!(scored[0].score <= 1.0);
    }

    #[test]
    fn test_all_zero_signals_score_zero() {
        let records = vec![record("a.swift", 0, 0, &[], 0), record("b.swift", 0, 0, &[], 0)];
        let scored = score_files(records, &CentralityTable::new());
        for file in &scored {
            assert_eq!(file.score, 0.0);
        }
    }

    #[test]
    fn test_scores_bounded_for_extreme_inputs() {
        let mut records = vec![
            record("huge.swift", u32::MAX, u32::MAX, &["a", "b", "c"], u32::MAX),
            record("tiny.swift", 1, 0, &[], 1),
        ];
        records[0].is_entrypoint = true;
        records[1].is_entrypoint = true;
        let scored = score_files(records, &table(&[("huge.swift", 0.99), ("tiny.swift", 0.01)]));
        for file in &scored {
            assert!((0.0..=1.0).contains(&file.score), "score {} out of range", file.score);
        }
    }
}

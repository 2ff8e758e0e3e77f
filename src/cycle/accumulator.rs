use tracing::warn;

use crate::extractor::extract;
use crate::types::{CycleResult, PlayerRow, Summary, TableKind};

/// Per-cycle collection state. Owned by one cycle and discarded with it.
#[derive(Debug, Default)]
pub struct CycleAccumulator {
    result: CycleResult,
}

/// What one table contributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOutcome {
    pub appended: usize,
    pub skipped: usize,
}

impl CycleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A later summary block replaces an earlier one.
    pub fn set_summary(&mut self, summary: Summary) {
        self.result.summary = summary;
    }

    /// Decode every row of one table in order and append it to the collection
    /// its table kind selects. Rows without the six-cell shape are skipped.
    pub fn push_table(&mut self, kind: TableKind, rows: Vec<Vec<String>>) -> TableOutcome {
        let mut outcome = TableOutcome::default();

        for (index, cells) in rows.into_iter().enumerate() {
            match extract(kind, cells) {
                Ok(PlayerRow::Batting(batsman)) => {
                    self.result.batsmen.push(batsman);
                    outcome.appended += 1;
                }
                Ok(PlayerRow::Bowling(bowler)) => {
                    self.result.bowlers.push(bowler);
                    outcome.appended += 1;
                }
                Err(e) => {
                    warn!(table = %kind, row = index, error = %e, "skipping malformed row");
                    self.result.malformed_rows += 1;
                    outcome.skipped += 1;
                }
            }
        }

        outcome
    }

    /// Hand the collected result out, leaving the accumulator empty.
    pub fn take(&mut self) -> CycleResult {
        std::mem::take(&mut self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn rows_land_in_the_table_kind_collection() {
        let mut acc = CycleAccumulator::new();
        acc.push_table(
            TableKind::Batting,
            vec![
                row(&["Root", "45", "60", "4", "0", "75.00"]),
                row(&["Bairstow", "12", "20", "1", "0", "60.00"]),
            ],
        );
        acc.push_table(
            TableKind::Bowling,
            vec![row(&["Bumrah", "10", "2", "30", "1", "3.00"])],
        );

        let result = acc.take();
        assert_eq!(result.batsmen.len(), 2);
        assert_eq!(result.bowlers.len(), 1);
        assert_eq!(result.batsmen[0].name, "Root");
        assert_eq!(result.batsmen[1].name, "Bairstow");
        assert_eq!(result.malformed_rows, 0);
    }

    #[test]
    fn malformed_row_is_skipped_without_partial_entity() {
        let mut acc = CycleAccumulator::new();
        let outcome = acc.push_table(
            TableKind::Batting,
            vec![
                row(&["Root", "45", "60", "4", "0", "75.00"]),
                row(&["Stokes", "3"]),
                row(&["Pope", "8", "15", "1", "0", "53.33"]),
            ],
        );

        assert_eq!(outcome, TableOutcome { appended: 2, skipped: 1 });
        let result = acc.take();
        let names: Vec<_> = result.batsmen.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Root", "Pope"]);
        assert!(result.bowlers.is_empty());
        assert_eq!(result.malformed_rows, 1);
    }

    #[test]
    fn take_resets_for_next_cycle() {
        let mut acc = CycleAccumulator::new();
        acc.set_summary(Summary {
            score: "142/3".to_string(),
            run_rate: "3.55".to_string(),
        });
        acc.push_table(TableKind::Bowling, vec![row(&["Anderson", "8", "3", "12", "2", "1.50"])]);

        let first = acc.take();
        assert_eq!(first.summary.score, "142/3");
        assert_eq!(acc.take(), CycleResult::default());
    }
}

use crate::error::MalformedRowError;
use crate::types::{Batsman, Bowler, PlayerRow, TableKind};

/// Cells per scoreboard row: name followed by five stats.
pub const ROW_WIDTH: usize = 6;

/// A row that has already been checked to hold exactly [`ROW_WIDTH`] cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCells([String; ROW_WIDTH]);

impl TryFrom<Vec<String>> for RowCells {
    type Error = MalformedRowError;

    fn try_from(cells: Vec<String>) -> Result<Self, Self::Error> {
        let found = cells.len();
        let cells: [String; ROW_WIDTH] = cells.try_into().map_err(|_| MalformedRowError {
            expected: ROW_WIDTH,
            found,
        })?;
        Ok(Self(cells))
    }
}

impl RowCells {
    pub fn into_batsman(self) -> Batsman {
        let [name, runs, balls, fours, sixes, strike_rate] = self.0;
        Batsman { name, runs, balls, fours, sixes, strike_rate }
    }

    pub fn into_bowler(self) -> Bowler {
        let [name, overs, maidens, runs, wickets, economy] = self.0;
        Bowler { name, overs, maidens, runs, wickets, economy }
    }

    pub fn decode(self, kind: TableKind) -> PlayerRow {
        match kind {
            TableKind::Batting => PlayerRow::Batting(self.into_batsman()),
            TableKind::Bowling => PlayerRow::Bowling(self.into_bowler()),
        }
    }
}

/// Decode one row's cell texts into the entity its table kind calls for.
/// The cell count is validated before anything is built, so a short row never
/// yields a partially filled entity.
pub fn extract(kind: TableKind, cells: Vec<String>) -> Result<PlayerRow, MalformedRowError> {
    Ok(RowCells::try_from(cells)?.decode(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::classify_table;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn batting_row_maps_positionally() {
        let row = extract(
            classify_table("Batter"),
            cells(&["Root", "45*", "60", "4", "0", "75.00"]),
        )
        .unwrap();
        assert_eq!(
            row,
            PlayerRow::Batting(Batsman {
                name: "Root".to_string(),
                runs: "45*".to_string(),
                balls: "60".to_string(),
                fours: "4".to_string(),
                sixes: "0".to_string(),
                strike_rate: "75.00".to_string(),
            })
        );
    }

    #[test]
    fn bowling_row_maps_positionally() {
        let row = extract(
            classify_table("Bowler"),
            cells(&["Bumrah", "12.3", "2", "38", "1", "3.04"]),
        )
        .unwrap();
        assert_eq!(
            row,
            PlayerRow::Bowling(Bowler {
                name: "Bumrah".to_string(),
                overs: "12.3".to_string(),
                maidens: "2".to_string(),
                runs: "38".to_string(),
                wickets: "1".to_string(),
                economy: "3.04".to_string(),
            })
        );
    }

    #[test]
    fn placeholder_values_are_not_interpreted() {
        let row = extract(TableKind::Batting, cells(&["Pope", "-", "-", "*", "", "-"])).unwrap();
        let PlayerRow::Batting(b) = row else {
            panic!("expected batting row");
        };
        assert_eq!(b.runs, "-");
        assert_eq!(b.fours, "*");
        assert_eq!(b.sixes, "");
    }

    #[test]
    fn short_row_is_malformed() {
        for n in 0..ROW_WIDTH {
            let row: Vec<String> = (0..n).map(|i| i.to_string()).collect();
            let err = extract(TableKind::Batting, row).unwrap_err();
            assert_eq!(err, MalformedRowError { expected: ROW_WIDTH, found: n });
        }
    }

    #[test]
    fn long_row_is_malformed() {
        let long = cells(&["a", "b", "c", "d", "e", "f", "g"]);
        let err = extract(TableKind::Bowling, long).unwrap_err();
        assert_eq!(err.found, 7);
    }
}

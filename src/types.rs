use serde::Serialize;

// ---------------------------------------------------------------------------
// Scoreboard entities
//
// Every field is kept as displayed on the page. Values such as "-", "*" or
// "45*" are legitimate and must survive untouched.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Batsman {
    pub name: String,
    pub runs: String,
    pub balls: String,
    pub fours: String,
    pub sixes: String,
    pub strike_rate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bowler {
    pub name: String,
    pub overs: String,
    pub maidens: String,
    pub runs: String,
    pub wickets: String,
    pub economy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub score: String,
    pub run_rate: String,
}

// ---------------------------------------------------------------------------
// Extraction output
// ---------------------------------------------------------------------------

/// One decoded scoreboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerRow {
    Batting(Batsman),
    Bowling(Bowler),
}

/// Which shape a table's rows decode into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Batting,
    Bowling,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TableKind::Batting => "batting",
            TableKind::Bowling => "bowling",
        };
        write!(f, "{s}")
    }
}

/// Everything one fetch produced. Never mutated once the fetch has completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleResult {
    pub summary: Summary,
    /// Page order.
    pub batsmen: Vec<Batsman>,
    /// Page order.
    pub bowlers: Vec<Bowler>,
    /// Rows skipped because they did not have the six-cell shape.
    pub malformed_rows: usize,
}

// ---------------------------------------------------------------------------
// Notification payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    /// Fixed fixture label, e.g. "IND vs ENG".
    pub title: String,
    /// "Name  Runs(Balls) | Name  Runs(Balls)" for the two batsmen at the crease.
    pub subtitle: String,
    /// Current score string.
    pub headline: String,
    pub sound: String,
    pub group: String,
    pub sender: String,
}

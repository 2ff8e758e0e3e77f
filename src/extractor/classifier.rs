use crate::types::TableKind;

/// Header prefix that marks a batting table.
pub const BATTING_HEADER_PREFIX: &str = "Batter";

/// Classify a scoreboard table by its header label.
///
/// A table is batting iff the first six characters of its header are exactly
/// "Batter"; anything else (including an empty header) is bowling. This is a
/// heuristic tied to the live markup: a bowling header that happened to start
/// with "Batter" would be decoded as batting, and a renamed batting header
/// ("Batsman", "BATTER") would be decoded as bowling.
pub fn classify_table(header: &str) -> TableKind {
    if header.starts_with(BATTING_HEADER_PREFIX) {
        TableKind::Batting
    } else {
        TableKind::Bowling
    }
}

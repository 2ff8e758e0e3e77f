use crate::config::Config;
use crate::error::InsufficientDataError;
use crate::types::{Batsman, CycleResult, NotificationPayload};

/// Batsmen shown in the alert subtitle.
const BATSMEN_SHOWN: usize = 2;

/// Builds the alert payload for a completed cycle.
#[derive(Debug, Clone)]
pub struct NotificationFormatter {
    title: String,
    sound: String,
    group: String,
    sender: String,
}

impl NotificationFormatter {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            title: cfg.fixture_title.clone(),
            sound: cfg.notify_sound.clone(),
            group: cfg.notify_group.clone(),
            sender: cfg.notify_sender.clone(),
        }
    }

    /// Fails with [`InsufficientDataError`] unless at least two batsmen were
    /// extracted; callers skip the alert for that cycle.
    pub fn format(
        &self,
        result: &CycleResult,
    ) -> Result<NotificationPayload, InsufficientDataError> {
        let [first, second] = match result.batsmen.get(..BATSMEN_SHOWN) {
            Some([first, second]) => [first, second],
            _ => {
                return Err(InsufficientDataError {
                    needed: BATSMEN_SHOWN,
                    found: result.batsmen.len(),
                })
            }
        };

        Ok(NotificationPayload {
            title: self.title.clone(),
            subtitle: format!("{} | {}", batting_line(first), batting_line(second)),
            headline: result.summary.score.clone(),
            sound: self.sound.clone(),
            group: self.group.clone(),
            sender: self.sender.clone(),
        })
    }
}

fn batting_line(b: &Batsman) -> String {
    format!("{}  {}({})", b.name, b.runs, b.balls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Summary;

    fn batsman(name: &str, runs: &str, balls: &str) -> Batsman {
        Batsman {
            name: name.to_string(),
            runs: runs.to_string(),
            balls: balls.to_string(),
            fours: "0".to_string(),
            sixes: "0".to_string(),
            strike_rate: "0.00".to_string(),
        }
    }

    fn result_with(batsmen: Vec<Batsman>) -> CycleResult {
        CycleResult {
            summary: Summary {
                score: "142/3".to_string(),
                run_rate: "3.55".to_string(),
            },
            batsmen,
            ..CycleResult::default()
        }
    }

    fn formatter() -> NotificationFormatter {
        NotificationFormatter::from_config(&Config::default())
    }

    #[test]
    fn formats_two_batsmen_and_score() {
        let payload = formatter()
            .format(&result_with(vec![
                batsman("Root", "45", "60"),
                batsman("Bairstow", "12", "20"),
            ]))
            .unwrap();

        assert_eq!(payload.subtitle, "Root  45(60) | Bairstow  12(20)");
        assert_eq!(payload.headline, "142/3");
        assert_eq!(payload.title, "IND vs ENG");
        assert_eq!(payload.group, "cric-crawler");
        assert_eq!(payload.sender, "com.apple.Safari");
        assert_eq!(payload.sound, "default");
    }

    #[test]
    fn only_first_two_batsmen_are_used() {
        let payload = formatter()
            .format(&result_with(vec![
                batsman("Root", "45*", "60"),
                batsman("Stokes", "-", "-"),
                batsman("Pope", "8", "15"),
            ]))
            .unwrap();

        assert_eq!(payload.subtitle, "Root  45*(60) | Stokes  -(-)");
    }

    #[test]
    fn fewer_than_two_batsmen_is_insufficient() {
        let err = formatter().format(&result_with(vec![])).unwrap_err();
        assert_eq!(err, InsufficientDataError { needed: 2, found: 0 });

        let err = formatter()
            .format(&result_with(vec![batsman("Root", "45", "60")]))
            .unwrap_err();
        assert_eq!(err, InsufficientDataError { needed: 2, found: 1 });
    }
}

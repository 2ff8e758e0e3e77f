use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::collector::{child_text, element_text, parse_selector, Collector};
use crate::config::{selectors, Config};
use crate::cycle::CycleAccumulator;
use crate::error::FetchError;
use crate::extractor::classify_table;
use crate::types::{CycleResult, Summary};

/// One fetch-and-extract pass. The scheduler only talks to cycles through this.
pub trait Cycle {
    fn run_cycle(&self) -> impl Future<Output = Result<CycleResult, FetchError>> + Send;
}

/// CSS selectors used to locate the scoreboard blocks.
#[derive(Debug, Clone)]
pub struct ScoreboardSelectors {
    pub summary_block: String,
    pub summary_score: String,
    pub summary_run_rate: String,
    pub table_block: String,
    pub table_header: String,
    pub table_row: String,
    pub row_cell: String,
}

impl Default for ScoreboardSelectors {
    fn default() -> Self {
        Self {
            summary_block: selectors::SUMMARY_BLOCK.to_string(),
            summary_score: selectors::SUMMARY_SCORE.to_string(),
            summary_run_rate: selectors::SUMMARY_RUN_RATE.to_string(),
            table_block: selectors::TABLE_BLOCK.to_string(),
            table_header: selectors::TABLE_HEADER.to_string(),
            table_row: selectors::TABLE_ROW.to_string(),
            row_cell: selectors::ROW_CELL.to_string(),
        }
    }
}

/// Fetches the live scoreboard page once per call and decodes it into a [`CycleResult`].
pub struct CycleRunner {
    cfg: Config,
    selectors: ScoreboardSelectors,
    /// Cancelled from the fetch error trigger.
    termination: CancellationToken,
}

impl CycleRunner {
    pub fn new(cfg: Config, termination: CancellationToken) -> Self {
        Self {
            cfg,
            selectors: ScoreboardSelectors::default(),
            termination,
        }
    }

    pub fn with_selectors(mut self, selectors: ScoreboardSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    async fn fetch(&self) -> Result<CycleResult, FetchError> {
        let acc = Arc::new(Mutex::new(CycleAccumulator::new()));

        let score_sel = parse_selector(&self.selectors.summary_score)?;
        let run_rate_sel = parse_selector(&self.selectors.summary_run_rate)?;
        let header_sel = parse_selector(&self.selectors.table_header)?;
        let row_sel = parse_selector(&self.selectors.table_row)?;
        let cell_sel = parse_selector(&self.selectors.row_cell)?;

        let mut collector = Collector::builder()
            .allowed_domains(self.cfg.allowed_domains.iter().cloned())
            .max_depth(self.cfg.max_depth)
            .timeout(self.cfg.fetch_timeout)
            .user_agent(self.cfg.user_agent.as_str())
            .on_request(|url| println!("Visiting URL: {url}"))
            .on_html(&self.selectors.summary_block, {
                let acc = Arc::clone(&acc);
                move |block, _| {
                    acc.lock().set_summary(Summary {
                        score: child_text(block, &score_sel),
                        run_rate: child_text(block, &run_rate_sel),
                    });
                }
            })
            .on_html(&self.selectors.table_block, {
                let acc = Arc::clone(&acc);
                move |table, _| {
                    let header = child_text(table, &header_sel);
                    let kind = classify_table(&header);
                    let rows: Vec<Vec<String>> = table
                        .select(&row_sel)
                        .map(|row| {
                            row.select(&cell_sel)
                                .map(|cell| element_text(&cell))
                                .collect()
                        })
                        .collect();
                    // One lock per table keeps a table's rows contiguous and in page order.
                    let outcome = acc.lock().push_table(kind, rows);
                    if outcome.skipped > 0 {
                        warn!(%header, skipped = outcome.skipped, "table had malformed rows");
                    }
                }
            })
            .on_error({
                let termination = self.termination.clone();
                move |url, e| {
                    error!(%url, error = %e, "scoreboard fetch failed, stopping");
                    termination.cancel();
                }
            })
            .build()?;

        collector.visit(&self.cfg.target_url)?;
        collector.wait().await?;

        let result = acc.lock().take();
        Ok(result)
    }
}

impl Cycle for CycleRunner {
    async fn run_cycle(&self) -> Result<CycleResult, FetchError> {
        let result = self.fetch().await.inspect_err(|_| self.termination.cancel())?;
        info!(
            batsmen = result.batsmen.len(),
            bowlers = result.bowlers.len(),
            malformed_rows = result.malformed_rows,
            score = %result.summary.score,
            "Cycle complete",
        );
        Ok(result)
    }
}

/// Print the raw cycle output to stdout, one JSON line per collection.
pub fn dump(result: &CycleResult) {
    let lines = [
        ("batsmen", serde_json::to_string(&result.batsmen)),
        ("bowlers", serde_json::to_string(&result.bowlers)),
        ("summary", serde_json::to_string(&result.summary)),
    ];
    for (label, line) in lines {
        match line {
            Ok(json) => println!("{json}"),
            Err(e) => warn!("failed to serialize {label}: {e}"),
        }
    }
}

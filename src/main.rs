mod collector;
mod config;
mod cycle;
mod error;
mod extractor;
mod notify;
mod scheduler;
mod types;

#[cfg(test)]
mod test_support;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::cycle::CycleRunner;
use crate::notify::{DesktopNotifier, NotificationFormatter};
use crate::scheduler::{Scheduler, SchedulerReport};

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    let report = run(cfg).await;
    info!(
        cycles = report.cycles_run,
        state = ?report.final_state,
        "Polling finished after {} cycle(s)",
        report.cycles_run,
    );
}

async fn run(cfg: Config) -> SchedulerReport {
    info!(
        target_url = %cfg.target_url,
        domains = %cfg.allowed_domains.join(","),
        interval_secs = cfg.poll_interval.as_secs(),
        notifier = ?cfg.notifier,
        "Starting scoreboard polling",
    );

    // Cancelled by a failed fetch or by Ctrl-C.
    let termination = CancellationToken::new();

    let shutdown = termination.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Ctrl-C received, stopping after the current cycle");
                shutdown.cancel();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {e}"),
        }
    });

    let runner = CycleRunner::new(cfg.clone(), termination.clone());
    let notifier = DesktopNotifier::from_config(&cfg);
    let formatter = NotificationFormatter::from_config(&cfg);

    Scheduler::new(runner, notifier, formatter, cfg.poll_interval, termination)
        .run()
        .await
}

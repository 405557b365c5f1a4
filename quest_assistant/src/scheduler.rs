use crate::account;
use crate::api::QuestService;
use crate::report;
use crate::store::CredentialStore;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

// Intervals are configurable so the loop can be exercised with short
// durations under test; Default carries the production values.
pub struct SchedulerConfig {
    pub total_duration: Duration,
    pub cycle_interval: Duration,
    pub account_delay: Duration,
    pub sleep_chunk: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            total_duration: Duration::from_secs(25 * 60 * 60),
            cycle_interval: Duration::from_secs(24 * 60 * 60),
            account_delay: Duration::from_secs(2),
            sleep_chunk: Duration::from_secs(5 * 60),
        }
    }
}

pub struct CycleOutcome {
    pub iterations: u32,
    pub interrupted: bool,
}

// Runs check-in cycles until the absolute deadline passes or the cancel flag
// is raised. Credentials are reloaded before every cycle so refreshes written
// by a previous cycle (or a previous process) are picked up.
pub fn run<S, F>(
    config: &SchedulerConfig,
    store: &CredentialStore,
    proxies: &[String],
    make_service: F,
    cancel: &AtomicBool,
) -> Result<CycleOutcome>
where
    S: QuestService,
    F: Fn(Option<&str>) -> Result<S>,
{
    let deadline = Utc::now() + chrono::Duration::from_std(config.total_duration)?;
    let mut iterations = 0u32;

    while Utc::now() < deadline {
        if cancel.load(Ordering::SeqCst) {
            return Ok(CycleOutcome { iterations, interrupted: true });
        }

        let credentials = store.load()?;
        iterations += 1;
        let cycle_start = Utc::now();

        println!("{}", "=".repeat(50));
        println!("Daily check - iteration {}", iterations);
        println!("Current time: {}", format_time(cycle_start));
        println!("Time remaining: {}", format_duration(deadline - cycle_start));
        println!("{}", "=".repeat(50));

        let mut results = Vec::with_capacity(credentials.len());
        for pair in &credentials {
            println!("\nProcessing account {}/{}...", pair.index + 1, credentials.len());

            let proxy = if proxies.is_empty() {
                None
            } else {
                Some(proxies[pair.index % proxies.len()].as_str())
            };
            let service = make_service(proxy)?;
            let result = account::process_account(&service, store, pair);
            println!("  User: {} - Status: {}", result.user_id, result.status);
            results.push(result);

            // Pace requests so we don't burst the remote service.
            if !sleep_with_cancel(config.account_delay, config.account_delay, cancel) {
                return Ok(CycleOutcome { iterations, interrupted: true });
            }
        }

        println!("\n{}", "=".repeat(50));
        println!("ITERATION {} RESULTS", iterations);
        println!("{}", "=".repeat(50));
        report::print_results(&results);

        let next_run = cycle_start + chrono::Duration::from_std(config.cycle_interval)?;
        let until_next = next_run - Utc::now();
        println!("\nNext iteration at: {}", format_time(next_run));
        println!("Sleeping for: {}", format_duration(until_next));

        // A negative interval means the cycle overran; loop immediately.
        if let Ok(sleep_total) = until_next.to_std() {
            if !sleep_with_cancel(sleep_total, config.sleep_chunk, cancel) {
                return Ok(CycleOutcome { iterations, interrupted: true });
            }
        }
    }

    Ok(CycleOutcome {
        iterations,
        interrupted: cancel.load(Ordering::SeqCst),
    })
}

// Sleeps in bounded chunks, checking the cancel flag before each one so an
// interrupt is honored within a chunk's latency. Returns false when
// cancelled before the full duration elapsed.
pub fn sleep_with_cancel(total: Duration, chunk: Duration, cancel: &AtomicBool) -> bool {
    let mut remaining = total;
    while remaining > Duration::from_secs(0) {
        if cancel.load(Ordering::SeqCst) {
            return false;
        }
        let step = remaining.min(chunk);
        thread::sleep(step);
        remaining -= step;
    }
    !cancel.load(Ordering::SeqCst)
}

pub fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

// H:MM:SS, clamped at zero.
pub fn format_duration(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds().max(0);
    format!("{}:{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}

// ---------------------------------------------------------------------
// name: Checkin
// type: Command line application.
// desc: Completes the "daily_check" quest for every stored account,
//       refreshing expired access tokens as it goes, on a 24-hour
//       cycle bounded by a 25-hour run.
// ---------------------------------------------------------------------

use chrono::Utc;
use quest_assistant::api::ApiClient;
use quest_assistant::config::Config;
use quest_assistant::scheduler::{self, SchedulerConfig};
use quest_assistant::store::{self, CredentialStore};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Conventional exit status for a SIGINT-driven stop.
const INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let config = Config::from_env();

    println!("IDOS Network Daily Check");
    println!("{}", "=".repeat(50));
    println!("This run lasts 25 hours with automatic token refresh");
    println!("{}", "=".repeat(50));

    let store = CredentialStore::new(&config.bearer_file, &config.refresh_file);
    let credentials = match store.load() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("Loaded {} account(s)", credentials.len());

    let mut proxies = Vec::new();
    if confirm("Use proxy? (y/n): ") {
        proxies = store::load_proxies(&config.proxy_file);
        if proxies.is_empty() {
            println!("No proxies loaded, continuing without proxy");
        } else {
            println!("Loaded {} proxy/proxies", proxies.len());
        }
    }

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::SeqCst)) {
            eprintln!("Error: failed to install interrupt handler: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let schedule = SchedulerConfig::default();
    let start = Utc::now();
    let end = start + chrono::Duration::seconds(schedule.total_duration.as_secs() as i64);
    println!("\nScript started at: {}", scheduler::format_time(start));
    println!("Will run until: {}", scheduler::format_time(end));
    println!("\nPress Ctrl+C to stop the script early\n");

    let base_url = config.base_url.clone();
    let outcome = scheduler::run(
        &schedule,
        &store,
        &proxies,
        |proxy| ApiClient::new(&base_url, proxy),
        &cancel,
    );

    match outcome {
        Ok(outcome) => {
            if outcome.interrupted {
                println!("\n\nScript stopped by user at: {}", scheduler::format_time(Utc::now()));
                println!("Completed {} iteration(s)", outcome.iterations);
                ExitCode::from(INTERRUPTED)
            } else {
                println!("\nCompleted {} iteration(s)", outcome.iterations);
                println!("Script completed at: {}", scheduler::format_time(Utc::now()));
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn confirm(prompt: &str) -> bool {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    line.trim().eq_ignore_ascii_case("y")
}

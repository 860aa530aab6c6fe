use profile_collector::cli::{self, OutputFormat, ProgressPrinter};
use profile_collector::config::CollectorConfig;
use profile_collector::jobs::{self, JobRequest, JobStateMachine, JobStatus};

const USAGE: &str = "usage: profile-collector [--json | --raw] [<first-name> <last-name> <company>]";

/// Exit status after Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

async fn cancel(machine: &JobStateMachine) {
    machine.reset().await;
    eprintln!("\n↩️  Lookup cancelled");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        eprintln!("{USAGE}");
        return Ok(());
    }
    let format = OutputFormat::from_flags(args.iter().map(String::as_str));
    let positional: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| !a.starts_with("--"))
        .collect();

    let config = CollectorConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export PROFILE_COLLECTOR_API_URL=https://...");
        std::process::exit(2);
    });

    let request = match positional.as_slice() {
        [first_name, last_name, company] => JobRequest::new(first_name, last_name, company)?,
        [] => cli::prompt_request().await?,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    eprintln!("🔎 Profile Collector v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", config.api_base_url);
    eprintln!(
        "   Polling every {}s, up to {} times\n",
        config.poll.interval.as_secs(),
        config.poll.max_polls
    );

    let machine = jobs::connect(&config)?;
    let mut updates = machine.subscribe();
    let mut printer = ProgressPrinter::new();

    tokio::select! {
        submitted = machine.submit(request) => {
            submitted?;
        }
        _ = tokio::signal::ctrl_c() => {
            cancel(&machine).await;
            std::process::exit(EXIT_INTERRUPTED);
        }
    }

    let snapshot = loop {
        let snapshot = updates.borrow_and_update().clone();
        if let Some(line) = printer.update(&snapshot) {
            eprintln!("{line}");
        }
        if snapshot.is_settled() {
            break snapshot;
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break machine.snapshot();
                }
            }
            _ = tokio::signal::ctrl_c() => {
                cancel(&machine).await;
                std::process::exit(EXIT_INTERRUPTED);
            }
        }
    };

    if format != OutputFormat::Snapshot {
        if let Some(banner) = cli::error_banner(&snapshot) {
            eprintln!("{banner}");
        }
    }
    if let Some(text) = cli::render_output(&snapshot, format)? {
        println!("{text}");
    }

    if snapshot.status == JobStatus::Failed {
        std::process::exit(1);
    }
    Ok(())
}

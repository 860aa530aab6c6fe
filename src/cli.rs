//! Terminal front-end — prompts for a lookup and renders snapshots.
//!
//! Only reads [`JobSnapshot`]s and [`ResultView`]s; it never touches the
//! client or the scheduler.

use std::fmt::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::jobs::{JobRequest, JobSnapshot, JobStatus};
use crate::projector::{self, ResultView, Section};

/// Width of the poll progress bar, in cells.
const PROGRESS_CELLS: usize = 20;

/// Width of a breakdown bar, in cells.
const BREAKDOWN_CELLS: usize = 25;

/// Ask for the three lookup fields on stdin until they validate.
pub async fn prompt_request() -> anyhow::Result<JobRequest> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let first_name = ask(&mut lines, "First name").await?;
        let last_name = ask(&mut lines, "Last name").await?;
        let company = ask(&mut lines, "Company").await?;

        match JobRequest::new(&first_name, &last_name, &company) {
            Ok(request) => return Ok(request),
            Err(e) => eprintln!("⚠️  {e}"),
        }
    }
}

async fn ask(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> anyhow::Result<String> {
    eprint!("{label}: ");
    match lines.next_line().await? {
        Some(line) => Ok(line),
        None => anyhow::bail!("stdin closed before {label} was entered"),
    }
}

/// Tracks what was last printed so unchanged snapshots stay quiet.
#[derive(Debug, Default)]
pub struct ProgressPrinter {
    last: Option<(JobStatus, bool, u32)>,
}

impl ProgressPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line to print for this snapshot, or `None` if nothing visible changed.
    pub fn update(&mut self, snapshot: &JobSnapshot) -> Option<String> {
        let key = (snapshot.status, snapshot.is_loading, snapshot.poll_count);
        if self.last == Some(key) {
            return None;
        }
        self.last = Some(key);
        progress_line(snapshot)
    }
}

/// One-line status for a snapshot that is still in flight.
pub fn progress_line(snapshot: &JobSnapshot) -> Option<String> {
    match snapshot.status {
        JobStatus::Idle if snapshot.is_loading => Some("⏳ Submitting lookup...".to_string()),
        JobStatus::Pending => {
            let filled = ((snapshot.poll_progress * PROGRESS_CELLS as f64).round() as usize)
                .min(PROGRESS_CELLS);
            Some(format!(
                "⏳ Analysis in progress [{}{}] poll {}",
                "#".repeat(filled),
                "-".repeat(PROGRESS_CELLS - filled),
                snapshot.poll_count,
            ))
        }
        _ => None,
    }
}

/// Banner for a snapshot that ended with an error message.
pub fn error_banner(snapshot: &JobSnapshot) -> Option<String> {
    snapshot.error.as_ref().map(|e| format!("❌ Error: {e}"))
}

/// What the binary prints on stdout once the job settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable report of the projected result.
    #[default]
    Report,
    /// The whole snapshot as JSON.
    Snapshot,
    /// The server's result payload, pretty-printed.
    Raw,
}

impl OutputFormat {
    /// Pick the format from command-line flags. `--raw` wins over `--json`.
    pub fn from_flags<'a>(flags: impl IntoIterator<Item = &'a str>) -> Self {
        let mut format = Self::Report;
        for flag in flags {
            match flag {
                "--raw" => return Self::Raw,
                "--json" => format = Self::Snapshot,
                _ => {}
            }
        }
        format
    }
}

/// Stdout text for a settled snapshot, or `None` if there is nothing to print.
pub fn render_output(snapshot: &JobSnapshot, format: OutputFormat) -> anyhow::Result<Option<String>> {
    let text = match format {
        OutputFormat::Snapshot => Some(serde_json::to_string_pretty(snapshot)?),
        OutputFormat::Raw => snapshot.result.as_ref().map(projector::raw_json),
        OutputFormat::Report => snapshot
            .result
            .as_ref()
            .map(|result| render_result(&projector::project(result, snapshot.status))),
    };
    Ok(text)
}

/// Multi-line report for a projected result.
pub fn render_result(view: &ResultView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analysis results [{}]", view.status_badge);

    if let Some(score) = &view.score {
        let _ = writeln!(out, "\nScore: {}/100 ({})", score.score, score.tier);
        if let Some(justification) = &score.justification {
            let _ = writeln!(out, "  {justification}");
        }
    }

    let _ = writeln!(out, "\nScore details");
    match &view.breakdown {
        Section::Items { items } => {
            let label_width = items.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
            for bar in items {
                let filled = (bar.fill * BREAKDOWN_CELLS as f64).round() as usize;
                let _ = writeln!(
                    out,
                    "  {:<label_width$}  {}{} {}",
                    bar.label,
                    "█".repeat(filled),
                    "░".repeat(BREAKDOWN_CELLS.saturating_sub(filled)),
                    bar.value,
                );
            }
        }
        Section::Empty { message } => {
            let _ = writeln!(out, "  {message}");
        }
    }

    write_list(&mut out, "Detailed justification", &view.justification_lines, |line| {
        format!("• {line}")
    });
    write_list(&mut out, "Personal information", &view.personal, |field| {
        format!("{}: {}", field.key, field.value)
    });
    write_list(&mut out, "Sources used", &view.sources, |source| source.clone());

    out
}

fn write_list<T>(out: &mut String, title: &str, section: &Section<T>, line: impl Fn(&T) -> String) {
    let _ = writeln!(out, "\n{title}");
    match section {
        Section::Items { items } => {
            for item in items {
                let _ = writeln!(out, "  {}", line(item));
            }
        }
        Section::Empty { message } => {
            let _ = writeln!(out, "  {message}");
        }
    }
}

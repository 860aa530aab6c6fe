//! Result projection — turns a raw job result into display-ready pieces.
//!
//! Everything here is a pure function of the payload. Missing or oddly typed
//! sections become [`Section::Empty`] instead of errors.

use serde::Serialize;
use serde_json::Value;

use crate::jobs::JobStatus;

/// Scores at or above this are high confidence.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 75.0;

/// Scores at or above this (and below high) are medium confidence.
pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 50.0;

/// Full-scale value of one breakdown bar.
pub const BREAKDOWN_SCALE: f64 = 25.0;

/// Personal-info values are cut to this many characters.
const MAX_FIELD_CHARS: usize = 100;

const EMPTY_BREAKDOWN: &str = "No score breakdown";
const EMPTY_JUSTIFICATION: &str = "No detailed justification";
const EMPTY_PERSONAL: &str = "No personal data";
const EMPTY_SOURCES: &str = "No sources detected";

/// Confidence tier of a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    High,
    Medium,
    NeedsVerification,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_CONFIDENCE_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_CONFIDENCE_THRESHOLD {
            Self::Medium
        } else {
            Self::NeedsVerification
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high confidence",
            Self::Medium => "medium confidence",
            Self::NeedsVerification => "needs verification",
        }
    }
}

impl std::fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A list section that may have nothing to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section<T> {
    Items { items: Vec<T> },
    Empty { message: &'static str },
}

impl<T> Section<T> {
    fn from_items(items: Vec<T>, empty_message: &'static str) -> Self {
        if items.is_empty() {
            Self::Empty {
                message: empty_message,
            }
        } else {
            Self::Items { items }
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Items { items } => items,
            Self::Empty { .. } => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// Headline score with its tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub score: f64,
    pub tier: ScoreTier,
    pub justification: Option<String>,
}

/// One bar of the score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownBar {
    pub key: String,
    pub label: String,
    pub value: f64,
    /// Bar length in `[0, 1]`.
    pub fill: f64,
    pub tier: ScoreTier,
}

/// A personal-info field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileField {
    pub key: String,
    pub value: String,
}

/// Everything the result panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub status_badge: &'static str,
    pub score: Option<ScoreCard>,
    pub breakdown: Section<BreakdownBar>,
    pub justification_lines: Section<String>,
    pub personal: Section<ProfileField>,
    pub sources: Section<String>,
}

/// Project a result payload for display.
pub fn project(result: &Value, status: JobStatus) -> ResultView {
    ResultView {
        status_badge: status_badge(status),
        score: score_card(result),
        breakdown: breakdown(result),
        justification_lines: justification_lines(result),
        personal: personal_fields(result),
        sources: sources(result),
    }
}

pub fn status_badge(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Done => "Completed",
        JobStatus::Failed => "Failed",
        JobStatus::Idle | JobStatus::Pending => "Partial",
    }
}

pub fn score_card(result: &Value) -> Option<ScoreCard> {
    let score = result.get("score")?.as_f64()?;
    Some(ScoreCard {
        score,
        tier: ScoreTier::from_score(score),
        justification: result
            .get("justification")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
    })
}

/// Bar length for a breakdown value: `value / 25`, clamped to `[0, 1]`.
pub fn breakdown_fill(value: f64) -> f64 {
    (value / BREAKDOWN_SCALE).clamp(0.0, 1.0)
}

pub fn breakdown(result: &Value) -> Section<BreakdownBar> {
    let bars = result
        .get("breakdown")
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(key, value)| {
                    let value = value.as_f64()?;
                    Some(BreakdownBar {
                        key: key.clone(),
                        label: humanize(key),
                        value,
                        fill: breakdown_fill(value),
                        tier: ScoreTier::from_score(value / BREAKDOWN_SCALE * 100.0),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Section::from_items(bars, EMPTY_BREAKDOWN)
}

pub fn justification_lines(result: &Value) -> Section<String> {
    Section::from_items(string_list(result.get("justification_lines")), EMPTY_JUSTIFICATION)
}

pub fn sources(result: &Value) -> Section<String> {
    Section::from_items(
        string_list(result.pointer("/meta/sources")),
        EMPTY_SOURCES,
    )
}

pub fn personal_fields(result: &Value) -> Section<ProfileField> {
    let fields = result
        .pointer("/personal/value")
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .filter(|(_, value)| is_truthy(value))
                .map(|(key, value)| ProfileField {
                    key: key.clone(),
                    value: display_value(value).chars().take(MAX_FIELD_CHARS).collect(),
                })
                .collect()
        })
        .unwrap_or_default();
    Section::from_items(fields, EMPTY_PERSONAL)
}

/// Pretty-printed payload for the raw data view.
pub fn raw_json(result: &Value) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string())
}

/// `company_match` → `Company match`.
fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

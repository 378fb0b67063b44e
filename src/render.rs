//! Output rendering for crawl results.

use serde::Serialize;

use revscout_core::ReviewSummary;
use revscout_protocols::types::{CrawlOutcome, ReviewRecord, TerminationReason};

const TITLE_WIDTH: usize = 28;
const REVIEWER_WIDTH: usize = 18;
const BODY_WIDTH: usize = 60;
const BAR_WIDTH: usize = 30;

#[derive(Serialize)]
struct Report<'a> {
    records: &'a [ReviewRecord],
    pages_visited: u32,
    termination: &'a TerminationReason,
    summary: &'a ReviewSummary,
}

/// Pretty JSON document with records, stop reason and summary.
pub(crate) fn json(outcome: &CrawlOutcome, summary: &ReviewSummary) -> serde_json::Result<String> {
    let report = Report {
        records: &outcome.records,
        pages_visited: outcome.pages_visited,
        termination: &outcome.termination,
        summary,
    };
    let mut rendered = serde_json::to_string_pretty(&report)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Fixed-width table followed by the summary block.
pub(crate) fn table(outcome: &CrawlOutcome, summary: &ReviewSummary) -> String {
    let mut out = String::new();

    if !outcome.records.is_empty() {
        out.push_str(&format!(
            "{:>4}  {:<6}  {:<rw$}  {:<tw$}  {}\n",
            "#",
            "RATING",
            "REVIEWER",
            "TITLE",
            "REVIEW",
            rw = REVIEWER_WIDTH,
            tw = TITLE_WIDTH,
        ));
        out.push_str(&"-".repeat(4 + 2 + 6 + 2 + REVIEWER_WIDTH + 2 + TITLE_WIDTH + 2 + BODY_WIDTH));
        out.push('\n');

        for (i, record) in outcome.records.iter().enumerate() {
            let rating = if record.has_rating() {
                format!("{:.1}", record.rating)
            } else {
                "-".to_string()
            };
            out.push_str(&format!(
                "{:>4}  {:<6}  {:<rw$}  {:<tw$}  {}\n",
                i + 1,
                rating,
                clip(&record.reviewer, REVIEWER_WIDTH),
                clip(&record.title, TITLE_WIDTH),
                clip(&record.body, BODY_WIDTH),
                rw = REVIEWER_WIDTH,
                tw = TITLE_WIDTH,
            ));
        }
        out.push('\n');
    }

    out.push_str(&summary_block(summary));
    out.push_str(&format!(
        "Pages visited: {} ({})\n",
        outcome.pages_visited, outcome.termination
    ));
    out
}

fn summary_block(summary: &ReviewSummary) -> String {
    let mut out = format!("Reviews: {} ({} rated)\n", summary.total, summary.rated);
    let Some(average) = summary.average_rating else {
        return out;
    };
    out.push_str(&format!("Average rating: {:.2}\n", average));

    let widest = summary.histogram.iter().copied().max().unwrap_or(0).max(1);
    for stars in (1..=5).rev() {
        let count = summary.histogram[stars - 1];
        let bar = count * BAR_WIDTH / widest;
        out.push_str(&format!("  {} star  {:<bw$} {}\n", stars, "#".repeat(bar), count, bw = BAR_WIDTH));
    }
    if summary.out_of_scale > 0 {
        out.push_str(&format!("  {} rating(s) above 5 not charted\n", summary.out_of_scale));
    }
    out
}

/// Single-line, width-limited rendering of free text.
fn clip(text: &str, width: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= width {
        return flat;
    }
    let kept: String = flat.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

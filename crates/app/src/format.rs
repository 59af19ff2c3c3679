use screening_core::model::ScoredResult;
use services::{DashboardSearch, RejectReason, SessionEntry};

pub fn format_result(result: &ScoredResult) -> String {
    let mut line = format!(
        "{:<16} correct {:>3}  incorrect {:>3}  median {:>8.1} ms",
        result.subject_id().as_str(),
        result.total_correct(),
        result.total_incorrect(),
        result.median_latency_ms(),
    );
    if let Some(note) = result.note() {
        line.push_str("  # ");
        line.push_str(note);
    }
    line
}

pub fn format_entry(entry: &SessionEntry) -> String {
    match entry {
        SessionEntry::Scored(result) => format_result(result),
        SessionEntry::Failed(err) => {
            format!("{:<16} error: {}", err.subject_id.as_str(), err.message())
        }
    }
}

pub fn format_search(found: &DashboardSearch) -> Vec<String> {
    let mut lines: Vec<_> = found.entries.iter().map(format_entry).collect();
    for rejected in &found.rejected {
        let reason = match rejected.reason {
            RejectReason::AlreadySearched => "already searched this session",
        };
        lines.push(format!("{:<16} skipped: {reason}", rejected.subject_id.as_str()));
    }
    lines
}

pub fn format_saved(results: &[ScoredResult]) -> Vec<String> {
    if results.is_empty() {
        return vec!["no saved results".into()];
    }
    results.iter().map(format_result).collect()
}

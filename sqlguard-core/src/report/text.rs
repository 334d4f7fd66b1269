//! Human-readable report rendering.
//!
//! Issues are grouped by severity, then by technique; each group shows the
//! occurrence count, the shared description, and per-occurrence location and
//! confidence. A detail section follows with the offending text and the
//! suggested fix for every issue.

use std::fmt::Write;

use crate::detect::{ReportIssue, Severity, Technique};

use super::AnalysisReport;

pub fn render(report: &AnalysisReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "SQL Analysis Report");
    let _ = writeln!(out, "===================");
    let _ = writeln!(
        out,
        "Run {} | mode {} | status {}",
        report.run_id, report.mode, report.status
    );
    let _ = writeln!(out, "Started:   {}", report.started_at.to_rfc3339());
    if let Some(completed) = report.completed_at {
        let _ = writeln!(out, "Completed: {}", completed.to_rfc3339());
    }
    let summary = &report.summary;
    let _ = writeln!(
        out,
        "\n{} issue(s): {} critical, {} warning, {} info ({} files, {} queries analyzed)",
        summary.total_issues,
        summary.critical_issues,
        summary.warning_issues,
        summary.info_issues,
        summary.files_analyzed,
        summary.queries_analyzed,
    );

    for severity in Severity::ALL {
        let groups = group_by_technique(&report.issues, severity);
        if groups.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n== {severity} ==");
        for (technique, issues) in groups {
            let _ = writeln!(
                out,
                "[{technique}] {} occurrence(s) - {}",
                issues.len(),
                issues[0].description
            );
            for issue in issues {
                let place = issue
                    .location
                    .as_ref()
                    .map(|loc| format!("{}:{}", loc.file, loc.start_line))
                    .unwrap_or_else(|| "<unknown>".to_string());
                let _ = writeln!(out, "  - {place} (confidence {:.2})", issue.confidence);
            }
        }
    }

    if !report.issues.is_empty() {
        let _ = writeln!(out, "\n== Details ==");
        for (idx, issue) in report.issues.iter().enumerate() {
            let place = issue
                .location
                .as_ref()
                .map(|loc| format!(" at {}:{}", loc.file, loc.start_line))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "\n{}. [{}] {}{place}",
                idx + 1,
                issue.severity,
                issue.technique
            );
            let _ = writeln!(out, "   Query: {}", issue.query.replace('\n', "\n          "));
            let _ = writeln!(out, "   Fix:   {}", issue.suggestion);
        }
    }

    out
}

/// Issues of one severity, grouped by technique in first-seen order.
fn group_by_technique(
    issues: &[ReportIssue],
    severity: Severity,
) -> Vec<(Technique, Vec<&ReportIssue>)> {
    let mut groups: Vec<(Technique, Vec<&ReportIssue>)> = Vec::new();
    for issue in issues.iter().filter(|issue| issue.severity == severity) {
        match groups.iter_mut().find(|(t, _)| *t == issue.technique) {
            Some((_, bucket)) => bucket.push(issue),
            None => groups.push((issue.technique, vec![issue])),
        }
    }
    groups
}

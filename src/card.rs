use chrono::NaiveDate;
use ratatui::prelude::*;

use crate::models::{Job, Page, Status, TrackingStatus};
use crate::query;

/// First letter of each whitespace-separated word, at most two,
/// uppercased. Stand-in for the company logo.
pub fn company_initials(company: &str) -> String {
    company
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// Relative label for a posted date, computed against `today` so tests
/// can pin the clock. Unparseable dates render verbatim.
pub fn posted_label(raw: &str, today: NaiveDate) -> String {
    let Some(date) = query::parse_posted_date(raw) else {
        return raw.to_string();
    };
    let days = (today - date).num_days().abs();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => format!("{} weeks ago", days / 7),
        _ => date.format("%b %-d, %Y").to_string(),
    }
}

/// Badge text and style. The tracking status wins on applied jobs and
/// is never shown for any other status.
pub fn badge(job: &Job) -> (&'static str, Style) {
    if job.status == Status::Applied {
        if let Some(tracking) = job.tracking_status {
            return (tracking.badge_label(), tracking_style(tracking));
        }
    }
    (job.status.badge_label(), status_style(job.status))
}

fn status_style(status: Status) -> Style {
    let color = match status {
        Status::New => Color::Green,
        Status::Applied => Color::Cyan,
        Status::Waiting => Color::Yellow,
        Status::Denied => Color::Red,
    };
    Style::default().fg(color)
}

fn tracking_style(tracking: TrackingStatus) -> Style {
    let color = match tracking {
        TrackingStatus::Pending => Color::Yellow,
        TrackingStatus::UnderReview => Color::Cyan,
        TrackingStatus::Shortlisted => Color::Green,
        TrackingStatus::Rejected => Color::Red,
        TrackingStatus::Offer => Color::Magenta,
    };
    Style::default().fg(color)
}

/// Key hints for the action row, per page.
pub fn actions(page: Page) -> &'static [(&'static str, &'static str)] {
    match page {
        Page::Dashboard => &[
            ("a", "Apply"),
            ("v", "Save for Later"),
            ("x", "Not Interested"),
        ],
        Page::Applied => &[("t", "Tracking Status"), ("w", "Move to Waiting")],
        Page::Waiting => &[("a", "Apply Now"), ("x", "Remove")],
        Page::History => &[("r", "Restore to Dashboard")],
    }
}

/// Full card for the detail pane: header with badge, meta line,
/// wrapped snippet, skills, link, and the page's action hints.
pub fn detail_text(job: &Job, page: Page, today: NaiveDate, width: usize) -> Text<'static> {
    let mut lines: Vec<Line> = Vec::new();

    let (badge_text, badge_style) = badge(job);
    lines.push(Line::from(vec![
        Span::styled(
            format!("[{}] ", company_initials(&job.company)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            job.job_title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(badge_text, badge_style),
    ]));
    lines.push(Line::from(format!(
        "{} | {} | {}",
        job.company,
        job.location,
        posted_label(&job.posted_date, today)
    )));
    lines.push(Line::from(""));

    if !job.snippet.is_empty() {
        for wrapped in textwrap::fill(&job.snippet, width.max(20)).lines() {
            lines.push(Line::from(wrapped.to_string()));
        }
        lines.push(Line::from(""));
    }

    if !job.skills.is_empty() {
        lines.push(Line::from(Span::styled(
            "Skills",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("  {}", job.skills.join(", "))));
        lines.push(Line::from(""));
    }

    if !job.link.is_empty() {
        lines.push(Line::from(format!("Link: {}", job.link)));
        lines.push(Line::from(""));
    }

    let hints: Vec<String> = actions(page)
        .iter()
        .map(|(key, label)| format!("{key}:{label}"))
        .collect();
    lines.push(Line::from(Span::styled(
        hints.join("  "),
        Style::default().fg(Color::DarkGray),
    )));

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_with(status: Status, tracking: Option<TrackingStatus>) -> Job {
        Job {
            job_id: "1".to_string(),
            job_title: "Backend Engineer".to_string(),
            company: "Acme Corp".to_string(),
            location: "Remote".to_string(),
            snippet: "Build and run services.".to_string(),
            link: "https://example.com/1".to_string(),
            skills: vec!["Rust".to_string()],
            posted_date: "2026-08-01".to_string(),
            status,
            tracking_status: tracking,
        }
    }

    #[test]
    fn test_company_initials() {
        assert_eq!(company_initials("Acme Corp"), "AC");
        assert_eq!(company_initials("Tech Data Systems Inc"), "TD");
        assert_eq!(company_initials("stripe"), "S");
        assert_eq!(company_initials("  spaced   out  "), "SO");
        assert_eq!(company_initials(""), "");
    }

    #[test]
    fn test_posted_label_relative_forms() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        assert_eq!(posted_label("2026-08-08", today), "Today");
        assert_eq!(posted_label("2026-08-07", today), "Yesterday");
        assert_eq!(posted_label("2026-08-05", today), "3 days ago");
        assert_eq!(posted_label("2026-08-02", today), "6 days ago");
        // 7..=29 days collapse to floor(days / 7) weeks.
        assert_eq!(posted_label("2026-07-31", today), "1 weeks ago");
        assert_eq!(posted_label("2026-07-25", today), "2 weeks ago");
        assert_eq!(posted_label("2026-07-10", today), "4 weeks ago");
    }

    #[test]
    fn test_posted_label_absolute_past_a_month() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        assert_eq!(posted_label("2026-07-09", today), "Jul 9, 2026");
        assert_eq!(posted_label("2025-12-24", today), "Dec 24, 2025");
    }

    #[test]
    fn test_posted_label_unparseable_renders_verbatim() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        assert_eq!(posted_label("last Tuesday", today), "last Tuesday");
        assert_eq!(posted_label("", today), "");
    }

    #[test]
    fn test_badge_tracking_overrides_applied() {
        let job = job_with(Status::Applied, Some(TrackingStatus::UnderReview));
        let (text, style) = badge(&job);
        assert_eq!(text, "under review");
        assert_eq!(style.fg, Some(Color::Cyan));
    }

    #[test]
    fn test_badge_applied_without_tracking_falls_back() {
        let job = job_with(Status::Applied, None);
        assert_eq!(badge(&job).0, "Applied");
    }

    #[test]
    fn test_badge_ignores_tracking_outside_applied() {
        // A stale tracking value on a saved job must not leak through.
        let job = job_with(Status::Waiting, Some(TrackingStatus::Offer));
        assert_eq!(badge(&job).0, "Saved");
        let job = job_with(Status::Denied, Some(TrackingStatus::Rejected));
        assert_eq!(badge(&job).0, "Denied");
    }

    #[test]
    fn test_actions_per_page() {
        let labels = |page| {
            actions(page)
                .iter()
                .map(|(_, label)| *label)
                .collect::<Vec<_>>()
        };
        assert_eq!(labels(Page::Dashboard), ["Apply", "Save for Later", "Not Interested"]);
        assert_eq!(labels(Page::Applied), ["Tracking Status", "Move to Waiting"]);
        assert_eq!(labels(Page::Waiting), ["Apply Now", "Remove"]);
        assert_eq!(labels(Page::History), ["Restore to Dashboard"]);
    }

    #[test]
    fn test_detail_text_carries_meta_line() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        let job = job_with(Status::New, None);
        let text = detail_text(&job, Page::Dashboard, today, 60);
        let flat: Vec<String> = text
            .lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect();
        assert!(flat[0].contains("Backend Engineer"));
        assert!(flat[1].contains("Acme Corp | Remote |"));
        assert!(flat.iter().any(|l| l.contains("Rust")));
        assert!(flat.iter().any(|l| l.contains("a:Apply")));
    }
}

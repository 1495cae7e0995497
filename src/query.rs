use anyhow::anyhow;
use chrono::NaiveDate;

use crate::models::Job;

/// Display ordering for a job list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DateDesc,
    DateAsc,
    Company,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::DateDesc => "newest first",
            SortKey::DateAsc => "oldest first",
            SortKey::Company => "company A-Z",
        }
    }

    pub fn cycle(self) -> SortKey {
        match self {
            SortKey::DateDesc => SortKey::DateAsc,
            SortKey::DateAsc => SortKey::Company,
            SortKey::Company => SortKey::DateDesc,
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(SortKey::DateDesc),
            "date-asc" => Ok(SortKey::DateAsc),
            "company" => Ok(SortKey::Company),
            other => Err(anyhow!(
                "Unknown sort key '{}' (expected date-desc, date-asc, company)",
                other
            )),
        }
    }
}

/// Case-insensitive substring match across title, company, location,
/// and every skill. An empty query matches everything.
pub fn matches_query(job: &Job, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    job.job_title.to_lowercase().contains(&q)
        || job.company.to_lowercase().contains(&q)
        || job.location.to_lowercase().contains(&q)
        || job.skills.iter().any(|s| s.to_lowercase().contains(&q))
}

/// Calendar date of a posting. `None` for anything unparseable, which
/// the sort treats as older than every real date.
pub fn parse_posted_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    // Some backends hand out full timestamps; keep the date part.
    if let Ok(stamp) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }
    None
}

/// Stable in-place sort. `None` dates order before every `Some`, so
/// broken dates sink to the bottom of newest-first and float to the
/// top of oldest-first.
pub fn sort_jobs(jobs: &mut [Job], sort: SortKey) {
    match sort {
        SortKey::DateDesc => {
            jobs.sort_by_key(|j| std::cmp::Reverse(parse_posted_date(&j.posted_date)));
        }
        SortKey::DateAsc => {
            jobs.sort_by_key(|j| parse_posted_date(&j.posted_date));
        }
        SortKey::Company => {
            jobs.sort_by_key(|j| j.company.to_lowercase());
        }
    }
}

/// Filtered and sorted copy of `jobs`; the input is never reordered.
pub fn visible_jobs(jobs: &[Job], query: &str, sort: SortKey) -> Vec<Job> {
    let mut out: Vec<Job> = jobs
        .iter()
        .filter(|j| matches_query(j, query))
        .cloned()
        .collect();
    sort_jobs(&mut out, sort);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    fn job(id: &str, title: &str, company: &str, posted: &str, skills: &[&str]) -> Job {
        Job {
            job_id: id.to_string(),
            job_title: title.to_string(),
            company: company.to_string(),
            location: "Remote".to_string(),
            snippet: String::new(),
            link: String::new(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            posted_date: posted.to_string(),
            status: Status::New,
            tracking_status: None,
        }
    }

    #[test]
    fn test_matches_query_is_case_insensitive_across_fields() {
        let j = job("1", "Backend Engineer", "Acme Corp", "2026-08-01", &["React", "SQL"]);
        assert!(matches_query(&j, "backend"));
        assert!(matches_query(&j, "ACME"));
        assert!(matches_query(&j, "remote"));
        assert!(matches_query(&j, "react"));
        assert!(matches_query(&j, "rEaCt"));
        assert!(!matches_query(&j, "python"));
        assert!(matches_query(&j, ""));
    }

    #[test]
    fn test_visible_jobs_is_a_subset() {
        let jobs = vec![
            job("1", "Frontend Dev", "Acme", "2026-08-01", &["React"]),
            job("2", "Backend Dev", "Beta", "2026-08-02", &["Go"]),
            job("3", "Fullstack Dev", "Gamma", "2026-08-03", &["react-native"]),
        ];
        let hits = visible_jobs(&jobs, "react", SortKey::DateAsc);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| jobs.iter().any(|j| j.job_id == h.job_id)));
        // Source order untouched.
        assert_eq!(jobs[0].job_id, "1");
        assert_eq!(jobs[2].job_id, "3");
    }

    #[test]
    fn test_sort_by_date() {
        let mut jobs = vec![
            job("1", "A", "X", "2026-08-01", &[]),
            job("2", "B", "Y", "2026-08-05", &[]),
            job("3", "C", "Z", "2026-07-20", &[]),
        ];
        sort_jobs(&mut jobs, SortKey::DateDesc);
        let ids: Vec<&str> = jobs.iter().map(|j| j.job_id.as_str()).collect();
        assert_eq!(ids, ["2", "1", "3"]);

        sort_jobs(&mut jobs, SortKey::DateAsc);
        let ids: Vec<&str> = jobs.iter().map(|j| j.job_id.as_str()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[test]
    fn test_sort_by_company_ignores_case() {
        let mut jobs = vec![
            job("1", "A", "zeta", "2026-08-01", &[]),
            job("2", "B", "Alpha", "2026-08-01", &[]),
            job("3", "C", "beta", "2026-08-01", &[]),
        ];
        sort_jobs(&mut jobs, SortKey::Company);
        let companies: Vec<&str> = jobs.iter().map(|j| j.company.as_str()).collect();
        assert_eq!(companies, ["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_sort_is_stable_on_equal_keys() {
        let mut jobs = vec![
            job("1", "A", "Acme", "2026-08-01", &[]),
            job("2", "B", "Acme", "2026-08-01", &[]),
            job("3", "C", "Acme", "2026-08-01", &[]),
        ];
        sort_jobs(&mut jobs, SortKey::Company);
        let ids: Vec<&str> = jobs.iter().map(|j| j.job_id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);

        sort_jobs(&mut jobs, SortKey::DateDesc);
        let ids: Vec<&str> = jobs.iter().map(|j| j.job_id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_unparseable_dates_sort_oldest() {
        let mut jobs = vec![
            job("1", "A", "X", "not-a-date", &[]),
            job("2", "B", "Y", "2026-08-05", &[]),
            job("3", "C", "Z", "", &[]),
        ];
        sort_jobs(&mut jobs, SortKey::DateDesc);
        assert_eq!(jobs[0].job_id, "2");
        // Broken dates trail in original relative order.
        assert_eq!(jobs[1].job_id, "1");
        assert_eq!(jobs[2].job_id, "3");

        sort_jobs(&mut jobs, SortKey::DateAsc);
        assert_eq!(jobs[2].job_id, "2");
    }

    #[test]
    fn test_parse_posted_date_forms() {
        assert_eq!(
            parse_posted_date("2026-08-01"),
            NaiveDate::from_ymd_opt(2026, 8, 1)
        );
        assert_eq!(
            parse_posted_date("2026-08-01T12:30:00Z"),
            NaiveDate::from_ymd_opt(2026, 8, 1)
        );
        assert_eq!(parse_posted_date("yesterday"), None);
        assert_eq!(parse_posted_date(""), None);
    }

    #[test]
    fn test_sort_key_cycle_and_parse() {
        assert_eq!(SortKey::DateDesc.cycle(), SortKey::DateAsc);
        assert_eq!(SortKey::Company.cycle(), SortKey::DateDesc);
        assert_eq!("date-asc".parse::<SortKey>().unwrap(), SortKey::DateAsc);
        assert!("salary".parse::<SortKey>().is_err());
    }
}

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Pipeline state of a job. The backend owns every transition; the
/// client only requests them and mirrors the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Applied,
    Waiting,
    Denied,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Applied => "applied",
            Status::Waiting => "waiting",
            Status::Denied => "denied",
        }
    }

    /// Badge text when no tracking status overrides it. "waiting" reads
    /// as "Saved" in the UI.
    pub fn badge_label(self) -> &'static str {
        match self {
            Status::New => "New",
            Status::Applied => "Applied",
            Status::Waiting => "Saved",
            Status::Denied => "Denied",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Status::New),
            "applied" => Ok(Status::Applied),
            "waiting" => Ok(Status::Waiting),
            "denied" => Ok(Status::Denied),
            other => Err(anyhow!(
                "Unknown status '{}' (expected new, applied, waiting, denied)",
                other
            )),
        }
    }
}

/// Sub-state of an applied job while it moves through the interview
/// pipeline. Free movement among the five values, no ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackingStatus {
    Pending,
    UnderReview,
    Shortlisted,
    Rejected,
    Offer,
}

impl TrackingStatus {
    pub const ALL: [TrackingStatus; 5] = [
        TrackingStatus::Pending,
        TrackingStatus::UnderReview,
        TrackingStatus::Shortlisted,
        TrackingStatus::Rejected,
        TrackingStatus::Offer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrackingStatus::Pending => "pending",
            TrackingStatus::UnderReview => "under-review",
            TrackingStatus::Shortlisted => "shortlisted",
            TrackingStatus::Rejected => "rejected",
            TrackingStatus::Offer => "offer",
        }
    }

    /// Humanized badge text: the wire form with hyphens as spaces.
    pub fn badge_label(self) -> &'static str {
        match self {
            TrackingStatus::Pending => "pending",
            TrackingStatus::UnderReview => "under review",
            TrackingStatus::Shortlisted => "shortlisted",
            TrackingStatus::Rejected => "rejected",
            TrackingStatus::Offer => "offer",
        }
    }
}

impl std::fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrackingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackingStatus::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown tracking status '{}' (expected pending, under-review, \
                     shortlisted, rejected, offer)",
                    s
                )
            })
    }
}

/// The four views. Each is backed by exactly one status filter; the
/// mapping is exhaustive so a page cannot exist without a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Applied,
    Waiting,
    History,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Dashboard, Page::Applied, Page::Waiting, Page::History];

    pub fn status(self) -> Status {
        match self {
            Page::Dashboard => Status::New,
            Page::Applied => Status::Applied,
            Page::Waiting => Status::Waiting,
            Page::History => Status::Denied,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Applied => "Applied",
            Page::Waiting => "Waiting List",
            Page::History => "History",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Applied => "applied",
            Page::Waiting => "waiting",
            Page::History => "history",
        }
    }

    pub fn next(self) -> Page {
        match self {
            Page::Dashboard => Page::Applied,
            Page::Applied => Page::Waiting,
            Page::Waiting => Page::History,
            Page::History => Page::Dashboard,
        }
    }

    pub fn prev(self) -> Page {
        match self {
            Page::Dashboard => Page::History,
            Page::Applied => Page::Dashboard,
            Page::Waiting => Page::Applied,
            Page::History => Page::Waiting,
        }
    }
}

impl std::str::FromStr for Page {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown page '{}' (expected dashboard, applied, waiting, history)",
                    s
                )
            })
    }
}

/// One tracked posting, exactly as the backend serves it. The backend
/// may attach extra fields; they are ignored here. `tracking_status`
/// is only meaningful while `status` is `applied`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub posted_date: String,
    pub status: Status,
    #[serde(default)]
    pub tracking_status: Option<TrackingStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(serde_json::to_string(&Status::New).unwrap(), "\"new\"");
        assert_eq!(serde_json::to_string(&Status::Denied).unwrap(), "\"denied\"");
        assert_eq!(serde_json::from_str::<Status>("\"waiting\"").unwrap(), Status::Waiting);
        assert!(serde_json::from_str::<Status>("\"closed\"").is_err());
    }

    #[test]
    fn test_tracking_status_wire_strings() {
        assert_eq!(
            serde_json::to_string(&TrackingStatus::UnderReview).unwrap(),
            "\"under-review\""
        );
        assert_eq!(
            serde_json::from_str::<TrackingStatus>("\"offer\"").unwrap(),
            TrackingStatus::Offer
        );
        assert_eq!("shortlisted".parse::<TrackingStatus>().unwrap(), TrackingStatus::Shortlisted);
        assert!("interviewing".parse::<TrackingStatus>().is_err());
    }

    #[test]
    fn test_tracking_badge_label_humanizes_hyphens() {
        assert_eq!(TrackingStatus::UnderReview.badge_label(), "under review");
        assert_eq!(TrackingStatus::Pending.badge_label(), "pending");
    }

    #[test]
    fn test_page_status_mapping() {
        assert_eq!(Page::Dashboard.status(), Status::New);
        assert_eq!(Page::Applied.status(), Status::Applied);
        assert_eq!(Page::Waiting.status(), Status::Waiting);
        assert_eq!(Page::History.status(), Status::Denied);
    }

    #[test]
    fn test_page_cycle_round_trips() {
        for page in Page::ALL {
            assert_eq!(page.next().prev(), page);
        }
        assert_eq!("history".parse::<Page>().unwrap(), Page::History);
        assert!("settings".parse::<Page>().is_err());
    }

    #[test]
    fn test_status_badge_labels() {
        assert_eq!(Status::Waiting.badge_label(), "Saved");
        assert_eq!(Status::New.badge_label(), "New");
    }

    #[test]
    fn test_job_deserializes_wire_shape() {
        let raw = r#"{
            "job_id": "abc123",
            "job_title": "Backend Engineer",
            "company": "Acme Corp",
            "location": "Remote",
            "snippet": "Build services.",
            "link": "https://example.com/jobs/abc123",
            "skills": ["Rust", "SQL"],
            "posted_date": "2026-08-01",
            "status": "applied",
            "tracking_status": "under-review",
            "stipend": null,
            "short_description": "Build services."
        }"#;
        let job: Job = serde_json::from_str(raw).unwrap();
        assert_eq!(job.job_id, "abc123");
        assert_eq!(job.status, Status::Applied);
        assert_eq!(job.tracking_status, Some(TrackingStatus::UnderReview));
        assert_eq!(job.skills, vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_job_tolerates_missing_optional_fields() {
        let raw = r#"{
            "job_id": "x1",
            "job_title": "Engineer",
            "company": "Acme",
            "status": "new",
            "tracking_status": null
        }"#;
        let job: Job = serde_json::from_str(raw).unwrap();
        assert!(job.skills.is_empty());
        assert_eq!(job.location, "");
        assert_eq!(job.tracking_status, None);
    }
}

use crate::models::{Job, Page, Status};
use crate::query::{self, SortKey};

/// Per-status totals over the full cache, shown in the page tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub new: usize,
    pub applied: usize,
    pub waiting: usize,
    pub denied: usize,
}

impl StatusCounts {
    pub fn tally(jobs: &[Job]) -> Self {
        let mut counts = StatusCounts::default();
        for job in jobs {
            match job.status {
                Status::New => counts.new += 1,
                Status::Applied => counts.applied += 1,
                Status::Waiting => counts.waiting += 1,
                Status::Denied => counts.denied += 1,
            }
        }
        counts
    }

    pub fn get(self, status: Status) -> usize {
        match status {
            Status::New => self.new,
            Status::Applied => self.applied,
            Status::Waiting => self.waiting,
            Status::Denied => self.denied,
        }
    }
}

/// The client-side view-model. One instance, passed by `&mut`; every
/// mutation is a named method so call sites read as actions. Nothing
/// here persists - a restart re-fetches the world.
#[derive(Debug)]
pub struct Store {
    /// Full cache from the bulk load, patched record-by-record after
    /// each successful mutation. Drives counts and dialog lookups.
    pub jobs: Vec<Job>,
    /// The list most recently fetched for the active page.
    pub page_jobs: Vec<Job>,
    pub page: Page,
    pub search_query: String,
    pub sort_by: SortKey,
    /// Set while a dialog is open for a job, cleared when it closes.
    pub current_job_id: Option<String>,
}

impl Store {
    pub fn new(page: Page) -> Self {
        Self {
            jobs: Vec::new(),
            page_jobs: Vec::new(),
            page,
            search_query: String::new(),
            sort_by: SortKey::DateDesc,
            current_job_id: None,
        }
    }

    /// Wholesale replacement from the initial `/data` load.
    pub fn replace_all(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
    }

    pub fn set_page_jobs(&mut self, jobs: Vec<Job>) {
        self.page_jobs = jobs;
    }

    /// Lookup by id, preferring the full cache but falling back to the
    /// page list for records that arrived after the bulk load.
    pub fn get(&self, job_id: &str) -> Option<&Job> {
        self.jobs
            .iter()
            .find(|j| j.job_id == job_id)
            .or_else(|| self.page_jobs.iter().find(|j| j.job_id == job_id))
    }

    /// Replace the cached record with the same id. The backend returns
    /// the whole updated record, so the old one is overwritten, not
    /// merged. Returns false when the id is not cached.
    pub fn patch(&mut self, updated: Job) -> bool {
        match self.jobs.iter_mut().find(|j| j.job_id == updated.job_id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.jobs)
    }

    /// The display list: the active page's fetch, filtered by the
    /// search query and sorted. Always a fresh copy.
    pub fn visible(&self) -> Vec<Job> {
        query::visible_jobs(&self.page_jobs, &self.search_query, self.sort_by)
    }

    pub fn select(&mut self, job_id: &str) {
        self.current_job_id = Some(job_id.to_string());
    }

    pub fn clear_selection(&mut self) {
        self.current_job_id = None;
    }

    pub fn selected(&self) -> Option<&Job> {
        self.current_job_id.as_deref().and_then(|id| self.get(id))
    }
}

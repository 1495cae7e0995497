use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::models::{Job, Status, TrackingStatus};

/// Normalized result of one backend call. Connection failures, HTTP
/// errors, unparseable bodies, and explicit `success: false` envelopes
/// all land in this shape; callers branch on `success` and never
/// unwind through an action handler.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    fn ok(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// The error message, with a fallback for `success: false` bodies
    /// that carry none.
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "Backend error".to_string())
    }
}

/// Wire envelope for every endpoint except `/data`, which returns a
/// bare array.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

pub struct ApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `/data`: the initial bulk load. Unwrapped array, unlike
    /// every other endpoint.
    pub fn fetch_all(&self) -> Outcome<Vec<Job>> {
        let response = match self.client.get(self.url("/data")).send() {
            Ok(response) => response,
            Err(_) => return Outcome::err("Cannot reach backend"),
        };
        let body = match response.text() {
            Ok(body) => body,
            Err(_) => return Outcome::err("Cannot read backend response"),
        };
        match serde_json::from_str::<Vec<Job>>(&body) {
            Ok(jobs) => Outcome::ok(Some(jobs)),
            Err(_) => Outcome::err("Malformed response from backend"),
        }
    }

    /// GET `/jobs?status=`: the wrapped, status-filtered list used on
    /// every page activation.
    pub fn list_jobs(&self, status: Status) -> Outcome<Vec<Job>> {
        self.get_wrapped(&format!("/jobs?status={}", status.as_str()))
    }

    pub fn apply(&self, job_id: &str) -> Outcome<Job> {
        self.post_wrapped(&format!("/apply/{job_id}"), None)
    }

    pub fn save(&self, job_id: &str) -> Outcome<Job> {
        self.post_wrapped(&format!("/save/{job_id}"), None)
    }

    /// Deny with a free-text reason; an empty reason is permitted.
    pub fn deny(&self, job_id: &str, reason: &str) -> Outcome<Job> {
        self.post_wrapped(&format!("/deny/{job_id}"), Some(json!({ "reason": reason })))
    }

    pub fn update_tracking(&self, job_id: &str, tracking: TrackingStatus) -> Outcome<Job> {
        self.post_wrapped(
            &format!("/tracking/{job_id}"),
            Some(json!({ "trackingStatus": tracking.as_str() })),
        )
    }

    pub fn move_status(&self, job_id: &str, status: Status) -> Outcome<Job> {
        self.post_wrapped(
            &format!("/move/{job_id}"),
            Some(json!({ "newStatus": status.as_str() })),
        )
    }

    pub fn delete(&self, job_id: &str) -> Outcome<()> {
        self.finish(self.client.delete(self.url(&format!("/delete/{job_id}"))).send())
    }

    pub fn reset(&self) -> Outcome<()> {
        self.post_wrapped("/reset", None)
    }

    fn get_wrapped<T: DeserializeOwned>(&self, path: &str) -> Outcome<T> {
        self.finish(self.client.get(self.url(path)).send())
    }

    fn post_wrapped<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Outcome<T> {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        self.finish(request.send())
    }

    /// The body is parsed whatever the HTTP status: the backend pairs
    /// `success: false` envelopes with 4xx codes.
    fn finish<T: DeserializeOwned>(
        &self,
        sent: reqwest::Result<reqwest::blocking::Response>,
    ) -> Outcome<T> {
        let response = match sent {
            Ok(response) => response,
            Err(_) => return Outcome::err("Cannot reach backend"),
        };
        let body = match response.text() {
            Ok(body) => body,
            Err(_) => return Outcome::err("Cannot read backend response"),
        };
        parse_envelope(&body)
    }
}

fn parse_envelope<T: DeserializeOwned>(body: &str) -> Outcome<T> {
    match serde_json::from_str::<Envelope<T>>(body) {
        Ok(envelope) if envelope.success => Outcome::ok(envelope.data),
        Ok(envelope) => Outcome {
            success: false,
            data: None,
            error: envelope.error.or_else(|| Some("Backend error".to_string())),
        },
        Err(_) => Outcome::err("Malformed response from backend"),
    }
}

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api_url: Option<String>,
}

/// Backend URL resolution order: `--api` flag, `JOBTRACK_API`, the
/// config file, then the default.
pub fn resolve_api_url(flag: Option<&str>) -> String {
    if let Some(url) = flag {
        return url.to_string();
    }
    if let Ok(url) = std::env::var("JOBTRACK_API") {
        if !url.is_empty() {
            return url;
        }
    }
    if let Some(url) = config_file_url() {
        return url;
    }
    DEFAULT_API_URL.to_string()
}

fn config_file_url() -> Option<String> {
    let raw = std::fs::read_to_string(config_path()?).ok()?;
    let file: ConfigFile = serde_json::from_str(&raw).ok()?;
    file.api_url.filter(|url| !url.is_empty())
}

/// XDG config directory or fallback to the working directory.
fn config_path() -> Option<PathBuf> {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobtrack") {
        Some(proj_dirs.config_dir().join("config.json"))
    } else {
        Some(PathBuf::from("jobtrack.config.json"))
    }
}

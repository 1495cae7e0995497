mod api;
mod card;
mod config;
mod models;
mod query;
mod store;
mod tui;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};

use api::{ApiClient, Outcome};
use models::{Job, Page, Status, TrackingStatus};
use query::SortKey;
use store::{StatusCounts, Store};

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Track job applications through a pipeline backend")]
struct Cli {
    /// Backend base URL (overrides JOBTRACK_API and the config file)
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse jobs interactively
    Browse {
        /// Page to open (dashboard, applied, waiting, history)
        #[arg(short, long, default_value = "dashboard")]
        page: String,
    },

    /// List jobs in one status column
    List {
        /// Status column (new, applied, waiting, denied)
        #[arg(short, long, default_value = "new")]
        status: String,

        /// Case-insensitive search across title, company, location, skills
        #[arg(long)]
        search: Option<String>,

        /// Sort order (date-desc, date-asc, company)
        #[arg(long, default_value = "date-desc")]
        sort: String,
    },

    /// Show one job in full
    Show {
        /// Job ID
        id: String,
    },

    /// Apply to a job
    Apply {
        /// Job ID
        id: String,
    },

    /// Save a job to the waiting list
    Save {
        /// Job ID
        id: String,
    },

    /// Deny a job (moves it to history)
    Deny {
        /// Job ID
        id: String,

        /// Free-text reason; may be empty
        #[arg(short, long, default_value = "")]
        reason: String,
    },

    /// Set the tracking status of an applied job
    Track {
        /// Job ID
        id: String,

        /// pending, under-review, shortlisted, rejected, offer
        status: String,
    },

    /// Move a job to another status column
    Move {
        /// Job ID
        id: String,

        /// new, applied, waiting, denied
        status: String,
    },

    /// Restore a job to the dashboard
    Restore {
        /// Job ID
        id: String,
    },

    /// Permanently delete a job
    Delete {
        /// Job ID
        id: String,
    },

    /// Reset the backend data set
    Reset,

    /// Show per-status totals
    Counts,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_url = config::resolve_api_url(cli.api.as_deref());
    let client = ApiClient::new(&base_url)?;

    let command = cli.command.unwrap_or(Commands::Browse {
        page: "dashboard".to_string(),
    });

    match command {
        Commands::Browse { page } => {
            let page: Page = page.parse()?;
            let jobs = expect_data(client.fetch_all())?;
            eprintln!("Loaded {} jobs from {}", jobs.len(), client.base_url());

            let mut store = Store::new(page);
            store.replace_all(jobs);
            tui::run(&client, store)?;
        }

        Commands::List { status, search, sort } => {
            let status: Status = status.parse()?;
            let sort: SortKey = sort.parse()?;
            let jobs = expect_data(client.list_jobs(status))?;
            let rows = query::visible_jobs(&jobs, search.as_deref().unwrap_or(""), sort);

            if rows.is_empty() {
                println!("No jobs found.");
            } else {
                println!(
                    "{:<26} {:<14} {:<30} {:<20} {:<16}",
                    "ID", "STATUS", "TITLE", "COMPANY", "POSTED"
                );
                println!("{}", "-".repeat(108));
                for job in rows {
                    let badge = card::badge(&job).0;
                    println!(
                        "{:<26} {:<14} {:<30} {:<20} {:<16}",
                        truncate(&job.job_id, 24),
                        badge,
                        truncate(&job.job_title, 28),
                        truncate(&job.company, 18),
                        truncate(&job.posted_date, 14)
                    );
                }
            }
        }

        Commands::Show { id } => {
            let jobs = expect_data(client.fetch_all())?;
            match jobs.into_iter().find(|j| j.job_id == id) {
                Some(job) => print_job(&job),
                None => println!("Job '{}' not found.", id),
            }
        }

        Commands::Apply { id } => {
            let job = expect_data(client.apply(&id))?;
            println!("Applied to '{}' at {}.", job.job_title, job.company);
        }

        Commands::Save { id } => {
            let job = expect_data(client.save(&id))?;
            println!("Saved '{}' to the waiting list.", job.job_title);
        }

        Commands::Deny { id, reason } => {
            let job = expect_data(client.deny(&id, &reason))?;
            println!("Moved '{}' to history.", job.job_title);
        }

        Commands::Track { id, status } => {
            let tracking: TrackingStatus = status.parse()?;
            let job = expect_data(client.update_tracking(&id, tracking))?;
            println!(
                "'{}' is now {}.",
                job.job_title,
                job.tracking_status.map(|t| t.badge_label()).unwrap_or("untracked")
            );
        }

        Commands::Move { id, status } => {
            let status: Status = status.parse()?;
            let job = expect_data(client.move_status(&id, status))?;
            println!("Moved '{}' to {}.", job.job_title, job.status);
        }

        Commands::Restore { id } => {
            let job = expect_data(client.move_status(&id, Status::New))?;
            println!("Restored '{}' to the dashboard.", job.job_title);
        }

        Commands::Delete { id } => {
            let outcome = client.delete(&id);
            if !outcome.success {
                return Err(anyhow!(outcome.error_message()));
            }
            println!("Deleted job '{}'.", id);
        }

        Commands::Reset => {
            let outcome = client.reset();
            if !outcome.success {
                return Err(anyhow!(outcome.error_message()));
            }
            println!("Backend data set reset.");
        }

        Commands::Counts => {
            let jobs = expect_data(client.fetch_all())?;
            let counts = StatusCounts::tally(&jobs);
            println!("{:<14} {:>6}", "PAGE", "JOBS");
            println!("{}", "-".repeat(21));
            for page in Page::ALL {
                println!("{:<14} {:>6}", page.title(), counts.get(page.status()));
            }
        }
    }

    Ok(())
}

/// Unwrap a successful outcome or surface its error as the exit
/// message.
fn expect_data<T>(outcome: Outcome<T>) -> Result<T> {
    if outcome.success {
        outcome.data.ok_or_else(|| anyhow!("Backend returned no data"))
    } else {
        Err(anyhow!(outcome.error_message()))
    }
}

fn print_job(job: &Job) {
    println!("Job {}", job.job_id);
    println!("Title: {}", job.job_title);
    println!("Company: {}", job.company);
    println!("Location: {}", job.location);
    println!("Posted: {}", job.posted_date);
    println!("Status: {}", job.status);
    if job.status == Status::Applied {
        if let Some(tracking) = job.tracking_status {
            println!("Tracking: {}", tracking.badge_label());
        }
    }
    if !job.skills.is_empty() {
        println!("Skills: {}", job.skills.join(", "));
    }
    if !job.link.is_empty() {
        println!("Link: {}", job.link);
    }
    if !job.snippet.is_empty() {
        println!("\n{}", job.snippet);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

use std::fmt::{self, Display};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub mod github;
pub use github::GitHubTracker;

/// Owner and name of a repository on the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Coordinates of a single issue, enough to address every issue mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub repo: RepoRef,
    pub number: u64,
}

impl Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repo, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub due_on: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    NotPlanned,
}

impl CloseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotPlanned => "not_planned",
        }
    }
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{operation}: request failed: {source}")]
    Http {
        operation: &'static str,
        source: reqwest::Error,
    },
    #[error("{operation}: tracker answered {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error("couldn't build API URL: {0}")]
    Url(String),
}

/// The operations the triage engine needs from an issue tracker.
///
/// Every call is a single blocking request from the engine's point of view; implementations
/// don't retry. Label mutations are expected to be idempotent on the tracker side.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn add_labels(&self, issue: &IssueRef, labels: &[String]) -> Result<(), TrackerError>;

    async fn remove_label(&self, issue: &IssueRef, label: &str) -> Result<(), TrackerError>;

    async fn create_comment(&self, issue: &IssueRef, body: &str) -> Result<(), TrackerError>;

    /// Closed milestones of `repo`, most recent due date first.
    async fn list_closed_milestones(&self, repo: &RepoRef) -> Result<Vec<Milestone>, TrackerError>;

    async fn close_issue(&self, issue: &IssueRef, reason: CloseReason) -> Result<(), TrackerError>;
}

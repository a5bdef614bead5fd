//! Fakes and builders shared by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::tracker::{CloseReason, IssueRef, IssueTracker, Milestone, RepoRef, TrackerError};
use crate::triage::{CommentSnapshot, IssueSnapshot};

pub const REPORTER: &str = "reporter";

pub fn issue(body: &str, labels: &[&str]) -> IssueSnapshot {
    IssueSnapshot {
        issue: IssueRef {
            repo: RepoRef {
                owner: "i3".to_owned(),
                name: "i3".to_owned(),
            },
            number: 1640,
        },
        title: "i3 misbehaves".to_owned(),
        body: body.to_owned(),
        author: REPORTER.to_owned(),
        labels: labels.iter().copied().collect(),
    }
}

pub fn comment(author: &str, body: &str) -> CommentSnapshot {
    CommentSnapshot {
        author: author.to_owned(),
        body: body.to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AddLabels(Vec<String>),
    RemoveLabel(String),
    Comment(String),
    ListMilestones,
    Close(CloseReason),
}

/// An [`IssueTracker`] that records every request and answers from canned data.
#[derive(Default)]
pub struct RecordingTracker {
    calls: Mutex<Vec<Call>>,
    milestones: Vec<Milestone>,
    failing: Option<&'static str>,
}

impl RecordingTracker {
    /// Closed milestones, newest first.
    pub fn with_milestones(titles: &[&str]) -> Self {
        Self {
            milestones: titles
                .iter()
                .map(|title| Milestone {
                    title: (*title).to_owned(),
                    due_on: None,
                })
                .collect(),
            ..Default::default()
        }
    }

    /// Makes every request of the given operation fail, after recording it.
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), TrackerError> {
        self.calls.lock().unwrap().push(call);
        if self.failing == Some(operation) {
            return Err(TrackerError::Status {
                operation,
                status: 500,
                body: "injected failure".to_owned(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl IssueTracker for RecordingTracker {
    async fn add_labels(&self, _issue: &IssueRef, labels: &[String]) -> Result<(), TrackerError> {
        self.record("add labels", Call::AddLabels(labels.to_vec()))
    }

    async fn remove_label(&self, _issue: &IssueRef, label: &str) -> Result<(), TrackerError> {
        self.record("remove label", Call::RemoveLabel(label.to_owned()))
    }

    async fn create_comment(&self, _issue: &IssueRef, body: &str) -> Result<(), TrackerError> {
        self.record("create comment", Call::Comment(body.to_owned()))
    }

    async fn list_closed_milestones(&self, _repo: &RepoRef) -> Result<Vec<Milestone>, TrackerError> {
        self.record("list milestones", Call::ListMilestones)?;
        Ok(self.milestones.clone())
    }

    async fn close_issue(&self, _issue: &IssueRef, reason: CloseReason) -> Result<(), TrackerError> {
        self.record("close issue", Call::Close(reason))
    }
}

use tracing::{info, trace};

use crate::tracker::{IssueRef, IssueTracker, TrackerError};

use super::event::LabelSet;
use super::rules::Action;

/// Executes [`Action`]s against the tracker, one request at a time.
///
/// Keeps its own copy of the issue's labels, updated as mutations succeed, so that adding a
/// label that is already there or removing one that isn't never reaches the tracker.
pub struct Applier<'a> {
    tracker: &'a dyn IssueTracker,
    issue: &'a IssueRef,
    labels: LabelSet,
}

impl<'a> Applier<'a> {
    pub fn new(tracker: &'a dyn IssueTracker, issue: &'a IssueRef, labels: LabelSet) -> Self {
        Self {
            tracker,
            issue,
            labels,
        }
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Applies `actions` in order, stopping at the first failure. Whatever was applied before
    /// the failure stays applied.
    pub async fn apply_all(&mut self, actions: &[Action]) -> Result<(), TrackerError> {
        for action in actions {
            self.apply(action).await?;
        }
        Ok(())
    }

    pub async fn apply(&mut self, action: &Action) -> Result<(), TrackerError> {
        match action {
            Action::AddLabel(label) => {
                self.add_label(label).await?;
            }
            Action::RemoveLabel(label) => {
                self.remove_label(label).await?;
            }
            Action::Comment(text) => {
                self.tracker.create_comment(self.issue, text).await?;
                info!("commented on {}", self.issue);
            }
            Action::Close(reason) => {
                self.tracker.close_issue(self.issue, *reason).await?;
                info!("closed {} as {}", self.issue, reason.as_str());
            }
        }
        Ok(())
    }

    /// Returns `true` if the label was newly added.
    pub async fn add_label(&mut self, label: &str) -> Result<bool, TrackerError> {
        if self.labels.contains(label) {
            trace!("{} already has label `{}`", self.issue, label);
            return Ok(false);
        }

        self.tracker
            .add_labels(self.issue, &[label.to_owned()])
            .await?;
        self.labels.insert(label);
        info!("added label `{}` to {}", label, self.issue);
        Ok(true)
    }

    /// Returns `true` if the label was present and got removed.
    pub async fn remove_label(&mut self, label: &str) -> Result<bool, TrackerError> {
        if !self.labels.contains(label) {
            trace!("{} doesn't have label `{}`", self.issue, label);
            return Ok(false);
        }

        self.tracker.remove_label(self.issue, label).await?;
        self.labels.remove(label);
        info!("removed label `{}` from {}", label, self.issue);
        Ok(true)
    }
}

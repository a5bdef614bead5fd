use serde::Deserialize;
use tracing::trace;

use crate::triage::TriageEvent;
use crate::webhooks::github::events::{Issue, Repository};

#[derive(Debug, Deserialize)]
pub struct IssuesEvent {
    pub action: String,
    pub issue: Issue,
    pub repository: Repository,
}

impl IssuesEvent {
    /// Only freshly opened issues are triaged; edits, labels and the like are left alone.
    pub fn into_triage_event(self) -> Option<TriageEvent> {
        if self.action != "opened" {
            trace!("ignoring `{}` action on issue #{}", self.action, self.issue.number);
            return None;
        }

        let snapshot = self.issue.into_snapshot(&self.repository);
        Some(TriageEvent::IssueOpened(snapshot))
    }
}

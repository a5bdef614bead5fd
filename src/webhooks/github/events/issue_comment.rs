use serde::Deserialize;
use tracing::trace;

use crate::triage::{CommentSnapshot, TriageEvent};
use crate::webhooks::github::events::{Comment, Issue, Repository};

#[derive(Debug, Deserialize)]
pub struct IssueCommentEvent {
    pub action: String,
    pub issue: Issue,
    pub comment: Comment,
    pub repository: Repository,
}

impl IssueCommentEvent {
    pub fn into_triage_event(self) -> Option<TriageEvent> {
        if self.action != "created" {
            trace!("ignoring `{}` comment on issue #{}", self.action, self.issue.number);
            return None;
        }

        let comment = CommentSnapshot {
            author: self.comment.user.login,
            body: self.comment.body.unwrap_or_default(),
        };
        Some(TriageEvent::CommentCreated {
            issue: self.issue.into_snapshot(&self.repository),
            comment,
        })
    }
}

use serde::Deserialize;

use crate::tracker::{IssueRef, RepoRef};
use crate::triage::IssueSnapshot;
use crate::webhooks::github::GitHubEventType;

mod issue_comment;
mod issues;
mod ping;

pub use issue_comment::*;
pub use issues::*;
pub use ping::*;

#[derive(Debug)]
pub enum GitHubEvent {
    IssueComment(IssueCommentEvent),
    Issues(IssuesEvent),
    Ping(PingEvent),
}

impl GitHubEvent {
    pub fn parse(event_type: GitHubEventType, payload: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(match event_type {
            GitHubEventType::IssueComment => Self::IssueComment(serde_json::from_slice(payload)?),
            GitHubEventType::Issues => Self::Issues(serde_json::from_slice(payload)?),
            GitHubEventType::Ping => Self::Ping(serde_json::from_slice(payload)?),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: GitHubUser,
}

impl Repository {
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef {
            owner: self.owner.login.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    // null when the issue was opened without a description
    pub body: Option<String>,
    pub user: GitHubUser,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Issue {
    pub fn into_snapshot(self, repository: &Repository) -> IssueSnapshot {
        IssueSnapshot {
            issue: IssueRef {
                repo: repository.repo_ref(),
                number: self.number,
            },
            title: self.title,
            body: self.body.unwrap_or_default(),
            author: self.user.login,
            labels: self.labels.into_iter().map(|label| label.name).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Comment {
    pub body: Option<String>,
    pub user: GitHubUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::TriageEvent;

    const ISSUE_OPENED: &str = r#"{
        "action": "opened",
        "issue": {
            "number": 1694,
            "title": "xfce4-panel disappears",
            "body": null,
            "user": { "login": "reporter", "id": 1 },
            "labels": [{ "name": "bug", "color": "fc2929" }]
        },
        "repository": {
            "name": "i3",
            "full_name": "i3/i3",
            "owner": { "login": "i3", "id": 2 }
        },
        "sender": { "login": "reporter", "id": 1 }
    }"#;

    #[test]
    fn issues_event_becomes_snapshot() {
        let event = GitHubEvent::parse(GitHubEventType::Issues, ISSUE_OPENED.as_bytes()).unwrap();
        let GitHubEvent::Issues(event) = event else {
            panic!("expected an issues event");
        };

        let Some(TriageEvent::IssueOpened(snapshot)) = event.into_triage_event() else {
            panic!("opened issues should be triaged");
        };
        assert_eq!(snapshot.issue.to_string(), "i3/i3#1694");
        assert_eq!(snapshot.body, "");
        assert_eq!(snapshot.author, "reporter");
        assert!(snapshot.labels.contains("bug"));
    }

    #[test]
    fn other_issue_actions_are_ignored() {
        let edited = ISSUE_OPENED.replace(r#""action": "opened""#, r#""action": "edited""#);
        let event: IssuesEvent = serde_json::from_str(&edited).unwrap();
        assert!(event.into_triage_event().is_none());
    }

    #[test]
    fn comment_event_carries_both_authors() {
        let payload = r#"{
            "action": "created",
            "issue": {
                "number": 7,
                "title": "crash",
                "body": "it crashes",
                "user": { "login": "reporter", "id": 1 },
                "labels": [{ "name": "missing-version" }]
            },
            "comment": { "body": "i3 version 4.10", "user": { "login": "helper", "id": 3 } },
            "repository": { "name": "i3", "full_name": "i3/i3", "owner": { "login": "i3", "id": 2 } },
            "sender": { "login": "helper", "id": 3 }
        }"#;
        let event: IssueCommentEvent = serde_json::from_str(payload).unwrap();

        let Some(TriageEvent::CommentCreated { issue, comment }) = event.into_triage_event() else {
            panic!("created comments should be triaged");
        };
        assert_eq!(issue.author, "reporter");
        assert_eq!(comment.author, "helper");
        assert_eq!(comment.body, "i3 version 4.10");
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(GitHubEvent::parse(GitHubEventType::Issues, b"{\"action\":").is_err());
        assert!(GitHubEvent::parse(GitHubEventType::Ping, b"{}").is_err());
    }
}

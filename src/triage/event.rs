use std::collections::BTreeSet;

use crate::tracker::IssueRef;

/// The issue as it looked when the webhook was delivered. May already be stale.
#[derive(Debug, Clone)]
pub struct IssueSnapshot {
    pub issue: IssueRef,
    pub title: String,
    pub body: String,
    pub author: String,
    pub labels: LabelSet,
}

#[derive(Debug, Clone)]
pub struct CommentSnapshot {
    pub author: String,
    pub body: String,
}

/// A tracker event the triage engine acts upon.
#[derive(Debug, Clone)]
pub enum TriageEvent {
    IssueOpened(IssueSnapshot),
    CommentCreated {
        issue: IssueSnapshot,
        comment: CommentSnapshot,
    },
}

impl TriageEvent {
    pub fn issue(&self) -> &IssueSnapshot {
        match self {
            Self::IssueOpened(issue) => issue,
            Self::CommentCreated { issue, .. } => issue,
        }
    }
}

/// Set of label names on an issue. Names are unique and compared verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet(BTreeSet<String>);

impl LabelSet {
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn contains_any(&self, labels: &[&str]) -> bool {
        labels.iter().any(|label| self.contains(label))
    }

    /// Returns `false` if the label was already present.
    pub fn insert(&mut self, label: &str) -> bool {
        self.0.insert(label.to_owned())
    }

    /// Returns `false` if the label wasn't present.
    pub fn remove(&mut self, label: &str) -> bool {
        self.0.remove(label)
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

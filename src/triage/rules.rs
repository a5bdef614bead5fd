//! The triage policy as ordered lists of guarded rules.
//!
//! Rules only look at the event and at the label set delivered with it; they never talk to the
//! tracker. Each rule either passes, contributes actions and lets the next rule run, or
//! contributes actions and ends the run. Comparing against the newest release needs the
//! milestone list, so a run can end by asking for a [`ReleaseCheck`] instead, which
//! [`resolve_release`] turns into actions once the milestones are known.

use crate::tracker::{CloseReason, Milestone};

use super::classify::{classify, has_log_link, ClassificationFlags, IssueKind};
use super::event::{CommentSnapshot, IssueSnapshot, LabelSet};
use super::version::{extract, VersionMatch};
use super::{labels, messages};

/// A single mutation of the issue on the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddLabel(String),
    RemoveLabel(String),
    Comment(String),
    Close(CloseReason),
}

impl Action {
    fn add(label: &str) -> Self {
        Self::AddLabel(label.to_owned())
    }

    fn remove(label: &str) -> Self {
        Self::RemoveLabel(label.to_owned())
    }

    fn comment(text: &str) -> Self {
        Self::Comment(text.to_owned())
    }
}

/// Compare `version` with the newest closed milestone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCheck {
    pub version: String,
    /// Drop `unsupported-version` when the version turns out to be current.
    pub clears_unsupported: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Plan {
    pub actions: Vec<Action>,
    pub release_check: Option<ReleaseCheck>,
}

enum Verdict {
    Pass,
    Continue(Vec<Action>),
    Stop(Vec<Action>),
    CheckRelease(Vec<Action>, ReleaseCheck),
}

fn fold(verdicts: impl Iterator<Item = Verdict>) -> Plan {
    let mut plan = Plan::default();
    for verdict in verdicts {
        match verdict {
            Verdict::Pass => {}
            Verdict::Continue(actions) => plan.actions.extend(actions),
            Verdict::Stop(actions) => {
                plan.actions.extend(actions);
                break;
            }
            Verdict::CheckRelease(actions, check) => {
                plan.actions.extend(actions);
                plan.release_check = Some(check);
                break;
            }
        }
    }
    plan
}

/// Adds `label` and explains why, unless the label is already there: then the reporter has
/// already been told.
fn request(labels: &LabelSet, label: &str, comment: &str) -> Vec<Action> {
    if labels.contains(label) {
        return Vec::new();
    }
    vec![Action::add(label), Action::comment(comment)]
}

pub struct Opened<'a> {
    pub issue: &'a IssueSnapshot,
    pub flags: ClassificationFlags,
    pub version: Option<VersionMatch>,
}

impl<'a> Opened<'a> {
    pub fn new(issue: &'a IssueSnapshot) -> Self {
        Self {
            issue,
            flags: classify(&issue.title, &issue.body),
            version: extract(&issue.body),
        }
    }
}

pub fn plan_opened(ctx: &Opened<'_>) -> Plan {
    let rules: [fn(&Opened<'_>) -> Verdict; 5] = [
        feature_request,
        documentation_request,
        bug_report,
        missing_log,
        version_support,
    ];
    fold(rules.iter().map(|rule| rule(ctx)))
}

fn feature_request(ctx: &Opened<'_>) -> Verdict {
    if ctx.flags.kind() != Some(IssueKind::Enhancement) {
        return Verdict::Pass;
    }

    let mut actions = vec![Action::add(labels::ENHANCEMENT)];
    if ctx.flags.requires_new_configuration {
        actions.push(Action::add(labels::REQUIRES_CONFIGURATION));
    }
    if !ctx.issue.labels.contains(labels::ENHANCEMENT) {
        actions.push(Action::comment(messages::FEATURE_POLICY));
    }
    Verdict::Stop(actions)
}

fn documentation_request(ctx: &Opened<'_>) -> Verdict {
    match ctx.flags.kind() {
        Some(IssueKind::Documentation) => Verdict::Stop(vec![Action::add(labels::DOCUMENTATION)]),
        _ => Verdict::Pass,
    }
}

fn bug_report(ctx: &Opened<'_>) -> Verdict {
    match ctx.flags.kind() {
        Some(IssueKind::Bug) => Verdict::Continue(vec![Action::add(labels::BUG)]),
        _ => Verdict::Pass,
    }
}

fn missing_log(ctx: &Opened<'_>) -> Verdict {
    if ctx.flags.has_log_link {
        return Verdict::Pass;
    }
    Verdict::Continue(request(
        &ctx.issue.labels,
        labels::MISSING_LOG,
        messages::MISSING_LOG,
    ))
}

fn version_support(ctx: &Opened<'_>) -> Verdict {
    match &ctx.version {
        None => Verdict::Stop(request(
            &ctx.issue.labels,
            labels::MISSING_VERSION,
            messages::MISSING_VERSION,
        )),
        // i3status and i3lock have their own release cycles
        Some(found) if !found.product.is_primary() => Verdict::Stop(Vec::new()),
        Some(found) => Verdict::CheckRelease(
            Vec::new(),
            ReleaseCheck {
                version: found.version.clone(),
                clears_unsupported: false,
            },
        ),
    }
}

pub struct Commented<'a> {
    pub issue: &'a IssueSnapshot,
    pub comment: &'a CommentSnapshot,
    pub version: Option<VersionMatch>,
}

impl<'a> Commented<'a> {
    pub fn new(issue: &'a IssueSnapshot, comment: &'a CommentSnapshot) -> Self {
        Self {
            issue,
            comment,
            version: extract(&comment.body),
        }
    }
}

pub fn plan_comment(ctx: &Commented<'_>) -> Plan {
    let rules: [fn(&Commented<'_>) -> Verdict; 4] =
        [from_reporter, pending_request, log_provided, version_provided];
    fold(rules.iter().map(|rule| rule(ctx)))
}

fn from_reporter(ctx: &Commented<'_>) -> Verdict {
    if ctx.comment.author == ctx.issue.author {
        Verdict::Pass
    } else {
        Verdict::Stop(Vec::new())
    }
}

fn pending_request(ctx: &Commented<'_>) -> Verdict {
    if ctx.issue.labels.contains_any(&labels::PENDING) {
        Verdict::Pass
    } else {
        Verdict::Stop(Vec::new())
    }
}

fn log_provided(ctx: &Commented<'_>) -> Verdict {
    if ctx.issue.labels.contains(labels::MISSING_LOG) && has_log_link(&ctx.comment.body) {
        Verdict::Continue(vec![Action::remove(labels::MISSING_LOG)])
    } else {
        Verdict::Pass
    }
}

fn version_provided(ctx: &Commented<'_>) -> Verdict {
    let waiting = [labels::MISSING_VERSION, labels::UNSUPPORTED_VERSION];
    if !ctx.issue.labels.contains_any(&waiting) {
        return Verdict::Pass;
    }

    let Some(found) = &ctx.version else {
        return Verdict::Stop(Vec::new());
    };

    let actions = vec![Action::remove(labels::MISSING_VERSION)];
    if !found.product.is_primary() {
        return Verdict::Stop(actions);
    }
    Verdict::CheckRelease(
        actions,
        ReleaseCheck {
            version: found.version.clone(),
            clears_unsupported: true,
        },
    )
}

/// Turns a [`ReleaseCheck`] into actions, given the newest closed milestone and the labels the
/// issue carries at this point of the run.
pub fn resolve_release(
    check: &ReleaseCheck,
    latest: Option<&Milestone>,
    labels: &LabelSet,
) -> Vec<Action> {
    let Some(latest) = latest else {
        return Vec::new();
    };

    if check.version == latest.title {
        let mut actions = vec![Action::add(&latest.title)];
        if check.clears_unsupported {
            actions.push(Action::remove(labels::UNSUPPORTED_VERSION));
        }
        return actions;
    }

    // the reporter was already asked to upgrade
    if labels.contains(labels::UNSUPPORTED_VERSION) {
        return Vec::new();
    }
    vec![
        Action::add(labels::UNSUPPORTED_VERSION),
        Action::Comment(messages::upgrade(&check.version, &latest.title)),
        Action::Close(CloseReason::NotPlanned),
    ]
}

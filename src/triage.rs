use tracing::{debug, warn};

use crate::tracker::{IssueTracker, TrackerError};

mod apply;
use apply::Applier;

pub mod classify;

mod event;
pub use event::{CommentSnapshot, IssueSnapshot, TriageEvent};

pub mod labels;
pub mod messages;

mod rules;
use rules::{Commented, Opened, Plan};

pub mod version;

/// Runs the triage pipeline matching `event` and applies its decisions to the tracker.
///
/// Stops at the first failed tracker request. Mutations made before the failure are kept;
/// every step is idempotent, so a redelivery of the same webhook picks up where this run
/// stopped.
pub async fn handle_event(
    event: &TriageEvent,
    tracker: &dyn IssueTracker,
) -> Result<(), TrackerError> {
    let plan = match event {
        TriageEvent::IssueOpened(issue) => rules::plan_opened(&Opened::new(issue)),
        TriageEvent::CommentCreated { issue, comment } => {
            rules::plan_comment(&Commented::new(issue, comment))
        }
    };

    let issue = event.issue();
    debug!("plan for {}: {:?}", issue.issue, plan);
    execute(plan, issue, tracker).await
}

async fn execute(
    plan: Plan,
    issue: &IssueSnapshot,
    tracker: &dyn IssueTracker,
) -> Result<(), TrackerError> {
    let mut applier = Applier::new(tracker, &issue.issue, issue.labels.clone());
    applier.apply_all(&plan.actions).await?;

    let Some(check) = plan.release_check else {
        return Ok(());
    };

    let milestones = tracker.list_closed_milestones(&issue.issue.repo).await?;
    match milestones.first() {
        Some(latest) => debug!(
            "newest release of {} is {} (due {})",
            issue.issue.repo,
            latest.title,
            latest.due_on.as_deref().unwrap_or("whenever")
        ),
        None => warn!(
            "no closed milestones in {}, can't tell whether {} is supported",
            issue.issue.repo, check.version
        ),
    }

    let actions = rules::resolve_release(&check, milestones.first(), applier.labels());
    applier.apply_all(&actions).await
}

use std::sync::Arc;

use rocket::{routes, Build, Rocket};

use crate::tracker::IssueTracker;

pub mod github;
pub use github::{github_webhook, GitHubSecret};

/// The tracker every webhook delivery acts upon.
pub struct Tracker(pub Arc<dyn IssueTracker>);

pub fn build_rocket(secret: GitHubSecret, tracker: Arc<dyn IssueTracker>) -> Rocket<Build> {
    rocket::build()
        .mount("/", routes![github_webhook])
        .manage(secret)
        .manage(Tracker(tracker))
}

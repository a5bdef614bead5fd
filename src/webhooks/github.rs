use std::io;
use std::str::FromStr;

use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    response::{self, Responder},
    Request, State,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::tracker::TrackerError;
use crate::triage;
use crate::webhooks::Tracker;

pub mod events;
pub use events::GitHubEvent;

mod signing;
use signing::{SignatureError, SignedGitHubPayload};

const X_GITHUB_EVENT: &str = "X-GitHub-Event";

pub struct GitHubSecret(pub String);

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("request header needs exactly one event type")]
    MissingEventType,
    #[error("unsupported event type `{0}`")]
    UnsupportedEvent(String),
    #[error("wrong content type")]
    ContentType,
    #[error("data limit exceeded")]
    TooLarge,
    #[error("couldn't read payload: {0}")]
    Read(#[from] io::Error),
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error("couldn't parse payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("webhook secret isn't configured")]
    MissingSecret,
}

impl WebhookError {
    pub fn status(&self) -> Status {
        match self {
            Self::MissingEventType
            | Self::UnsupportedEvent(_)
            | Self::ContentType
            | Self::Read(_)
            | Self::Json(_) => Status::BadRequest,
            Self::TooLarge => Status::PayloadTooLarge,
            Self::Signature(_) => Status::Unauthorized,
            Self::Tracker(_) | Self::MissingSecret => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for WebhookError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        (self.status(), self.to_string()).respond_to(request)
    }
}

#[rocket::post("/api/webhooks/github", data = "<payload>")]
pub async fn github_webhook(
    event: GitHubEventType,
    payload: SignedGitHubPayload,
    tracker: &State<Tracker>,
) -> Result<&'static str, WebhookError> {
    let event = GitHubEvent::parse(event, &payload.0)?;

    let triage_event = match event {
        GitHubEvent::Ping(ping) => {
            info!("received ping for hook {:?}: {}", ping.hook_id, ping.zen);
            return Ok("pong");
        }
        GitHubEvent::Issues(event) => event.into_triage_event(),
        GitHubEvent::IssueComment(event) => event.into_triage_event(),
    };
    let Some(triage_event) = triage_event else {
        return Ok("ignored");
    };

    let issue = &triage_event.issue().issue;
    info!("triaging {}", issue);
    if let Err(e) = triage::handle_event(&triage_event, tracker.0.as_ref()).await {
        warn!("triage of {} aborted: {}", issue, e);
        return Err(e.into());
    }

    debug!("done with {}", issue);
    Ok("OK")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitHubEventType {
    IssueComment,
    Issues,
    Ping,
}

impl FromStr for GitHubEventType {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issue_comment" => Ok(Self::IssueComment),
            "issues" => Ok(Self::Issues),
            "ping" => Ok(Self::Ping),
            other => Err(WebhookError::UnsupportedEvent(other.to_owned())),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for GitHubEventType {
    type Error = WebhookError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let event_types = request.headers().get(X_GITHUB_EVENT).collect::<Vec<_>>();
        if event_types.len() != 1 {
            return Outcome::Error((Status::BadRequest, WebhookError::MissingEventType));
        }

        match event_types[0].parse() {
            Ok(ev_type) => Outcome::Success(ev_type),
            Err(e) => Outcome::Error((Status::BadRequest, e)),
        }
    }
}

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::json;
use tracing::{debug, trace};
use url::Url;

use crate::config::TriageConfig;
use crate::tracker::{CloseReason, IssueRef, IssueTracker, Milestone, RepoRef, TrackerError};

const GITHUB_JSON: &str = "application/vnd.github+json";

/// [`IssueTracker`] backed by the GitHub REST API.
pub struct GitHubTracker {
    client: Client,
    api_url: Url,
    token: String,
}

impl GitHubTracker {
    pub fn new(config: &TriageConfig) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| TrackerError::Http {
                operation: "build client",
                source,
            })?;

        Ok(Self {
            client,
            api_url: config.github_api_url.clone(),
            token: config.github_token.clone(),
        })
    }

    /// Appends `segments` to the API base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TrackerError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| TrackerError::Url(format!("{} can't be a base URL", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn issue_endpoint(&self, issue: &IssueRef, rest: &[&str]) -> Result<Url, TrackerError> {
        let number = issue.number.to_string();
        let mut segments = vec![
            "repos",
            issue.repo.owner.as_str(),
            issue.repo.name.as_str(),
            "issues",
            number.as_str(),
        ];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_JSON)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, TrackerError> {
        let response = request
            .send()
            .await
            .map_err(|source| TrackerError::Http { operation, source })?;

        let status = response.status();
        trace!("{} answered {}", operation, status);
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(TrackerError::Status {
            operation,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    async fn add_labels(&self, issue: &IssueRef, labels: &[String]) -> Result<(), TrackerError> {
        let url = self.issue_endpoint(issue, &["labels"])?;
        let request = self
            .request(Method::POST, url)
            .json(&json!({ "labels": labels }));
        self.send("add labels", request).await?;
        Ok(())
    }

    async fn remove_label(&self, issue: &IssueRef, label: &str) -> Result<(), TrackerError> {
        let url = self.issue_endpoint(issue, &["labels", label])?;
        let request = self.request(Method::DELETE, url);

        match self.send("remove label", request).await {
            // someone else got there first
            Err(TrackerError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                debug!("label `{}` was already gone from {}", label, issue);
                Ok(())
            }
            other => other.map(drop),
        }
    }

    async fn create_comment(&self, issue: &IssueRef, body: &str) -> Result<(), TrackerError> {
        let url = self.issue_endpoint(issue, &["comments"])?;
        let request = self
            .request(Method::POST, url)
            .json(&json!({ "body": body }));
        self.send("create comment", request).await?;
        Ok(())
    }

    async fn list_closed_milestones(&self, repo: &RepoRef) -> Result<Vec<Milestone>, TrackerError> {
        let operation = "list milestones";
        let mut url = self.endpoint(&["repos", repo.owner.as_str(), repo.name.as_str(), "milestones"])?;
        url.query_pairs_mut()
            .append_pair("state", "closed")
            .append_pair("sort", "due_on")
            .append_pair("direction", "desc");

        let response = self.send(operation, self.request(Method::GET, url)).await?;
        response
            .json()
            .await
            .map_err(|source| TrackerError::Http { operation, source })
    }

    async fn close_issue(&self, issue: &IssueRef, reason: CloseReason) -> Result<(), TrackerError> {
        let url = self.issue_endpoint(issue, &[])?;
        let request = self
            .request(Method::PATCH, url)
            .json(&json!({ "state": "closed", "state_reason": reason.as_str() }));
        self.send("close issue", request).await?;
        Ok(())
    }
}

pub mod types;

pub use types::{Commit, FileChange};

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use thiserror::Error;
use tracing::{debug, instrument};

use types::{CommitEntry, CommitFilesResponse};

const BASE_URL: &str = "https://api.github.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid GitHub token: {0}")]
    Credential(#[from] reqwest::header::InvalidHeaderValue),
}

/// Client for the two commit endpoints this tool consumes.
///
/// Holds one pooled `reqwest::Client`. All concurrent fetches share the
/// pool (read-only use of the request parameters), and dropping the
/// client releases the underlying sockets.
#[derive(Debug)]
pub struct GithubClient {
    http: reqwest::Client,
    owner: String,
    repo: String,
    branch: String,
}

impl GithubClient {
    /// Build a client for one owner/repo/branch. A missing token is not
    /// an error: requests go out unauthenticated, subject to GitHub's
    /// anonymous rate limits.
    pub fn new(
        owner: &str,
        repo: &str,
        branch: &str,
        token: Option<&str>,
    ) -> Result<Self, GithubError> {
        let http = reqwest::Client::builder()
            .default_headers(default_headers(token)?)
            .user_agent(concat!("commit-viewer/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
        })
    }

    /// Fetch the `limit` most recent commits on the configured branch,
    /// in the API's native order (most-recent-first).
    #[instrument(skip(self), fields(owner = %self.owner, repo = %self.repo, branch = %self.branch))]
    pub async fn list_commits(&self, limit: u32) -> Result<Vec<Commit>, GithubError> {
        let url = format!("{BASE_URL}/repos/{}/{}/commits", self.owner, self.repo);
        let per_page = limit.to_string();

        debug!("fetching commit list from GitHub API");
        let response = self
            .http
            .get(&url)
            .query(&[("sha", self.branch.as_str()), ("per_page", per_page.as_str())])
            .send()
            .await?;
        let response = check_status(response).await?;

        let entries = response.json::<Vec<CommitEntry>>().await?;
        debug!(commits = entries.len(), "received commit list");

        Ok(entries.into_iter().map(Commit::from).collect())
    }

    /// Fetch the per-file change summaries for one commit, in the order
    /// the API returns them.
    #[instrument(skip(self), fields(owner = %self.owner, repo = %self.repo))]
    pub async fn commit_changes(&self, sha: &str) -> Result<Vec<FileChange>, GithubError> {
        let url = format!(
            "{BASE_URL}/repos/{}/{}/commits/{}",
            self.owner, self.repo, sha
        );

        debug!("fetching commit detail from GitHub API");
        let response = self.http.get(&url).send().await?;
        let response = check_status(response).await?;

        let payload = response.json::<CommitFilesResponse>().await?;
        debug!(files = payload.files.len(), "received commit detail");

        Ok(payload.files.into_iter().map(FileChange::from).collect())
    }
}

/// Default header set for every request: the versioned accept header,
/// plus a bearer authorization header when a token is present.
fn default_headers(token: Option<&str>) -> Result<HeaderMap, GithubError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github.v3+json"),
    );
    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Turn a non-2xx response into `GithubError::Status`, keeping the body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GithubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GithubError::Status { status, body })
}

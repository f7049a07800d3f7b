use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::github::{Commit, FileChange, GithubClient, GithubError};

/// One or more of the per-commit fetches failed. Carries every
/// underlying error, not just the first encountered — simultaneous
/// failures are all surfaced.
#[derive(Debug, Error)]
#[error("{} commit fetch(es) failed", .errors.len())]
pub struct AggregateError {
    pub errors: Vec<GithubError>,
}

/// Anything that can produce the file changes for one commit sha.
/// The GitHub client is the real source; tests script their own.
#[async_trait]
pub trait ChangesSource: Send + Sync {
    async fn commit_changes(&self, sha: &str) -> Result<Vec<FileChange>, GithubError>;
}

#[async_trait]
impl ChangesSource for GithubClient {
    async fn commit_changes(&self, sha: &str) -> Result<Vec<FileChange>, GithubError> {
        GithubClient::commit_changes(self, sha).await
    }
}

/// Fetch file changes for every commit concurrently.
///
/// Launches one request per commit and waits for all of them to settle.
/// On success the returned vector is index-aligned with `commits`
/// regardless of completion order. If any request failed, the failures
/// are collected into a single `AggregateError` and no partial results
/// are returned.
#[instrument(skip_all, fields(commits = commits.len()))]
pub async fn changes_per_commit<S: ChangesSource>(
    source: &S,
    commits: &[Commit],
) -> Result<Vec<Vec<FileChange>>, AggregateError> {
    let outcomes = join_all(commits.iter().map(|c| source.commit_changes(&c.sha))).await;

    let mut changes = Vec::with_capacity(outcomes.len());
    let mut errors = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(files) => changes.push(files),
            Err(err) => errors.push(err),
        }
    }

    if !errors.is_empty() {
        return Err(AggregateError { errors });
    }
    debug!(fetched = changes.len(), "all commit fetches succeeded");
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn commit(sha: &str) -> Commit {
        Commit {
            sha: sha.to_string(),
            author_name: "testuser".to_string(),
            author_email: "test@example.com".to_string(),
            date: "2024-05-01T00:00:00Z".to_string(),
            message: format!("commit {sha}"),
            html_url: format!("https://github.com/org/repo/commit/{sha}"),
        }
    }

    /// Mock source with per-sha delays (to force a completion order) and
    /// a set of shas that fail with distinct 404s.
    #[derive(Default)]
    struct ScriptedSource {
        delays_ms: HashMap<String, u64>,
        failing: Vec<String>,
    }

    #[async_trait]
    impl ChangesSource for ScriptedSource {
        async fn commit_changes(&self, sha: &str) -> Result<Vec<FileChange>, GithubError> {
            if let Some(ms) = self.delays_ms.get(sha) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.failing.iter().any(|s| s == sha) {
                return Err(GithubError::Status {
                    status: reqwest::StatusCode::NOT_FOUND,
                    body: format!("no commit {sha}"),
                });
            }
            Ok(vec![FileChange {
                path: format!("{sha}.rs"),
                status: "modified".to_string(),
                additions: 1,
                deletions: 0,
                previous_filename: None,
                patch: None,
            }])
        }
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_output() {
        let source = ScriptedSource::default();
        let results = changes_per_commit(&source, &[]).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_results_align_with_input_order() {
        let source = ScriptedSource::default();
        let commits = vec![commit("aaa"), commit("bbb"), commit("ccc")];
        let results = changes_per_commit(&source, &commits).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0][0].path, "aaa.rs");
        assert_eq!(results[1][0].path, "bbb.rs");
        assert_eq!(results[2][0].path, "ccc.rs");
    }

    #[tokio::test]
    async fn test_alignment_survives_reversed_completion_order() {
        // First commit finishes last, last finishes first.
        let source = ScriptedSource {
            delays_ms: HashMap::from([
                ("aaa".to_string(), 40),
                ("bbb".to_string(), 20),
                ("ccc".to_string(), 0),
            ]),
            failing: Vec::new(),
        };
        let commits = vec![commit("aaa"), commit("bbb"), commit("ccc")];
        let results = changes_per_commit(&source, &commits).await.unwrap();
        assert_eq!(results[0][0].path, "aaa.rs");
        assert_eq!(results[1][0].path, "bbb.rs");
        assert_eq!(results[2][0].path, "ccc.rs");
    }

    #[tokio::test]
    async fn test_single_failure_aggregates_one_error() {
        let source = ScriptedSource {
            delays_ms: HashMap::new(),
            failing: vec!["bbb".to_string()],
        };
        let commits = vec![commit("aaa"), commit("bbb"), commit("ccc")];
        let err = changes_per_commit(&source, &commits).await.unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert!(err.errors[0].to_string().contains("no commit bbb"));
    }

    #[tokio::test]
    async fn test_multiple_failures_all_collected() {
        let source = ScriptedSource {
            delays_ms: HashMap::from([("ccc".to_string(), 25)]),
            failing: vec!["aaa".to_string(), "ccc".to_string()],
        };
        let commits = vec![commit("aaa"), commit("bbb"), commit("ccc")];
        let err = changes_per_commit(&source, &commits).await.unwrap_err();
        assert_eq!(err.errors.len(), 2);
        let messages: Vec<String> = err.errors.iter().map(|e| e.to_string()).collect();
        assert!(messages.iter().any(|m| m.contains("no commit aaa")));
        assert!(messages.iter().any(|m| m.contains("no commit ccc")));
    }

    #[tokio::test]
    async fn test_aggregate_error_display_reports_count() {
        let source = ScriptedSource {
            delays_ms: HashMap::new(),
            failing: vec!["aaa".to_string(), "bbb".to_string()],
        };
        let commits = vec![commit("aaa"), commit("bbb")];
        let err = changes_per_commit(&source, &commits).await.unwrap_err();
        assert_eq!(err.to_string(), "2 commit fetch(es) failed");
    }
}

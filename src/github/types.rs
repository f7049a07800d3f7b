use serde::Deserialize;

/// A single commit from the repository's recent history.
/// Note: Not Deserialize — Commit is constructed from the wire-format
/// structs below rather than mapped straight off the API JSON.
#[derive(Debug, Clone)]
pub struct Commit {
    /// Full commit hash
    pub sha: String,
    /// Commit author's name
    pub author_name: String,
    /// Commit author's email
    pub author_email: String,
    /// Author date as the ISO-8601 string the API returns
    pub date: String,
    /// Full commit message
    pub message: String,
    /// Web URL of the commit
    pub html_url: String,
}

impl Commit {
    /// First 7 characters of the hash (the whole hash if shorter).
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

/// The diff summary for one file within a commit.
#[derive(Debug, Clone)]
pub struct FileChange {
    /// File path (e.g., "src/auth/config.rs")
    pub path: String,
    /// Status string as the API reports it ("added", "modified",
    /// "removed", "renamed", ...); never interpreted beyond display
    pub status: String,
    /// Lines added in this file
    pub additions: usize,
    /// Lines deleted in this file
    pub deletions: usize,
    /// Present only when the file was renamed
    pub previous_filename: Option<String>,
    /// Unified diff text; absent for binary files and oversized diffs
    pub patch: Option<String>,
}

/// Wire format of one entry in the list-commits response.
#[derive(Debug, Deserialize)]
pub(crate) struct CommitEntry {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitDetail {
    pub author: CommitAuthor,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitAuthor {
    pub name: String,
    pub email: String,
    pub date: String,
}

impl From<CommitEntry> for Commit {
    fn from(entry: CommitEntry) -> Self {
        Commit {
            sha: entry.sha,
            author_name: entry.commit.author.name,
            author_email: entry.commit.author.email,
            date: entry.commit.author.date,
            message: entry.commit.message,
            html_url: entry.html_url,
        }
    }
}

/// Wire format of the single-commit response. Only the `files` array is
/// consumed; a response without a `files` key means no file-level data,
/// not an error.
#[derive(Debug, Deserialize)]
pub(crate) struct CommitFilesResponse {
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileEntry {
    pub filename: String,
    pub status: String,
    pub additions: usize,
    pub deletions: usize,
    #[serde(default)]
    pub previous_filename: Option<String>,
    #[serde(default)]
    pub patch: Option<String>,
}

impl From<FileEntry> for FileChange {
    fn from(entry: FileEntry) -> Self {
        FileChange {
            path: entry.filename,
            status: entry.status,
            additions: entry.additions,
            deletions: entry.deletions,
            previous_filename: entry.previous_filename,
            patch: entry.patch,
        }
    }
}

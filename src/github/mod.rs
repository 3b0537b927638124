//! GitHub REST access used as the persistence backend.
//!
//! The backend only needs a narrow slice of the API: identity lookup,
//! repository lookup/creation and the contents endpoints. `GitHubApi` is the
//! seam between the table store and the network so the store can run against
//! the in-memory implementation in offline mode and in tests.

mod http;
mod memory;

pub use http::HttpGitHub;
pub use memory::MemoryGitHub;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors returned by a GitHub backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GitHubError {
    #[error("token rejected")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(String),
    #[error("access to {0} forbidden")]
    Forbidden(String),
    #[error("repository name {0} already exists")]
    NameTaken(String),
    #[error("stale sha for {path}")]
    ShaConflict {
        path: String,
        current_sha: Option<String>,
    },
    #[error("GitHub responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Repository coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The account a token belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Description given to repositories created by registration.
pub const REPO_DESCRIPTION: &str = "Fleet dashboard data";

/// Repository metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoInfo {
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Decoded file plus the blob sha GitHub reported for it.
#[derive(Debug, Clone)]
pub struct FileContents {
    pub sha: String,
    pub bytes: Vec<u8>,
}

/// A contents API commit.
#[derive(Debug, Clone, Copy)]
pub struct PutContents<'a> {
    pub message: &'a str,
    pub bytes: &'a [u8],
    /// Sha of the blob being replaced; `None` creates the file.
    pub sha: Option<&'a str>,
}

#[async_trait]
pub trait GitHubApi: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn authenticated_user(&self, token: &str) -> Result<GitHubUser, GitHubError>;

    async fn repository(&self, token: &str, repo: &RepoRef) -> Result<RepoInfo, GitHubError>;

    /// Create a private repository owned by the token's account.
    async fn create_repository(&self, token: &str, name: &str) -> Result<RepoInfo, GitHubError>;

    /// `Ok(None)` when the file does not exist.
    async fn get_contents(
        &self,
        token: &str,
        repo: &RepoRef,
        path: &str,
    ) -> Result<Option<FileContents>, GitHubError>;

    /// Commit new file contents, returning the new blob sha.
    async fn put_contents(
        &self,
        token: &str,
        repo: &RepoRef,
        path: &str,
        put: PutContents<'_>,
    ) -> Result<String, GitHubError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_ref_parse() {
        let repo = RepoRef::parse("acme/fleet-data").unwrap();
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "fleet-data");
        assert_eq!(repo.to_string(), "acme/fleet-data");

        assert!(RepoRef::parse("fleet-data").is_none());
        assert!(RepoRef::parse("/fleet").is_none());
        assert!(RepoRef::parse("a/b/c").is_none());
    }
}

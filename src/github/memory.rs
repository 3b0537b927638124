//! In-memory GitHub backend for offline development and tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    FileContents, GitHubApi, GitHubError, GitHubUser, PutContents, RepoInfo, RepoRef,
    REPO_DESCRIPTION,
};

struct StoredFile {
    sha: String,
    bytes: Vec<u8>,
}

struct MemoryRepo {
    info: RepoInfo,
    members: HashSet<String>,
    files: HashMap<String, StoredFile>,
}

/// Accounts, repositories and files held in process memory.
///
/// Blob shas are opaque counters; a put must quote the current one exactly as
/// with the real contents API.
#[derive(Default)]
pub struct MemoryGitHub {
    accounts: HashMap<String, GitHubUser>,
    repos: Mutex<HashMap<String, MemoryRepo>>,
    next_sha: AtomicU64,
    put_calls: AtomicU64,
    rejected_paths: Mutex<HashSet<String>>,
}

impl MemoryGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token that resolves to `login`.
    pub fn with_account(mut self, token: &str, login: &str) -> Self {
        self.accounts.insert(
            token.to_string(),
            GitHubUser {
                login: login.to_string(),
                name: None,
                email: Some(format!("{}@users.noreply.github.com", login)),
            },
        );
        self
    }

    /// Create a repository owned by `owner`, optionally shared with other logins.
    pub async fn add_repository(&self, repo: &RepoRef, collaborators: &[&str]) {
        self.insert_repository(repo, collaborators, None).await;
    }

    async fn insert_repository(
        &self,
        repo: &RepoRef,
        collaborators: &[&str],
        description: Option<&str>,
    ) {
        let mut members: HashSet<String> = collaborators.iter().map(|s| s.to_string()).collect();
        members.insert(repo.owner.clone());
        self.repos.lock().await.insert(
            repo.to_string(),
            MemoryRepo {
                info: RepoInfo {
                    full_name: repo.to_string(),
                    private: true,
                    default_branch: Some("main".to_string()),
                    description: description.map(str::to_string),
                },
                members,
                files: HashMap::new(),
            },
        );
    }

    /// Make every put to `path` fail with a server error until cleared.
    #[cfg(test)]
    pub async fn reject_writes_to(&self, path: &str) {
        self.rejected_paths.lock().await.insert(path.to_string());
    }

    #[cfg(test)]
    pub async fn accept_all_writes(&self) {
        self.rejected_paths.lock().await.clear();
    }

    /// Number of successful commits so far.
    #[cfg(test)]
    pub fn put_calls(&self) -> u64 {
        self.put_calls.load(Ordering::Relaxed)
    }

    fn user(&self, token: &str) -> Result<&GitHubUser, GitHubError> {
        self.accounts.get(token).ok_or(GitHubError::Unauthorized)
    }

    fn fresh_sha(&self) -> String {
        let n = self.next_sha.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{:040x}", n)
    }
}

fn accessible<'a>(
    repos: &'a mut HashMap<String, MemoryRepo>,
    login: &str,
    repo: &RepoRef,
) -> Result<&'a mut MemoryRepo, GitHubError> {
    match repos.get_mut(&repo.to_string()) {
        Some(found) if found.members.contains(login) => Ok(found),
        // GitHub hides private repositories behind 404.
        _ => Err(GitHubError::NotFound(repo.to_string())),
    }
}

#[async_trait]
impl GitHubApi for MemoryGitHub {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn authenticated_user(&self, token: &str) -> Result<GitHubUser, GitHubError> {
        self.user(token).cloned()
    }

    async fn repository(&self, token: &str, repo: &RepoRef) -> Result<RepoInfo, GitHubError> {
        let login = self.user(token)?.login.clone();
        let mut repos = self.repos.lock().await;
        Ok(accessible(&mut repos, &login, repo)?.info.clone())
    }

    async fn create_repository(&self, token: &str, name: &str) -> Result<RepoInfo, GitHubError> {
        let login = self.user(token)?.login.clone();
        let repo = RepoRef::new(login, name);
        if self.repos.lock().await.contains_key(&repo.to_string()) {
            return Err(GitHubError::NameTaken(name.to_string()));
        }
        self.insert_repository(&repo, &[], Some(REPO_DESCRIPTION))
            .await;
        self.repository(token, &repo).await
    }

    async fn get_contents(
        &self,
        token: &str,
        repo: &RepoRef,
        path: &str,
    ) -> Result<Option<FileContents>, GitHubError> {
        let login = self.user(token)?.login.clone();
        let mut repos = self.repos.lock().await;
        let found = accessible(&mut repos, &login, repo)?;
        Ok(found.files.get(path).map(|file| FileContents {
            sha: file.sha.clone(),
            bytes: file.bytes.clone(),
        }))
    }

    async fn put_contents(
        &self,
        token: &str,
        repo: &RepoRef,
        path: &str,
        put: PutContents<'_>,
    ) -> Result<String, GitHubError> {
        let login = self.user(token)?.login.clone();
        if self.rejected_paths.lock().await.contains(path) {
            return Err(GitHubError::Status {
                status: 500,
                message: format!("write to {} rejected", path),
            });
        }
        let mut repos = self.repos.lock().await;
        let found = accessible(&mut repos, &login, repo)?;

        let current = found.files.get(path).map(|f| f.sha.clone());
        if current.as_deref() != put.sha {
            return Err(GitHubError::ShaConflict {
                path: path.to_string(),
                current_sha: current,
            });
        }

        let sha = self.fresh_sha();
        found.files.insert(
            path.to_string(),
            StoredFile {
                sha: sha.clone(),
                bytes: put.bytes.to_vec(),
            },
        );
        self.put_calls.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(repo = %repo, path, message = put.message, "memory commit");
        Ok(sha)
    }
}

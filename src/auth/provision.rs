//! Login against an existing repository, or create and seed a new one.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;

use super::Session;
use crate::errors::AppError;
use crate::github::{GitHubApi, GitHubError, GitHubUser, RepoRef, REPO_DESCRIPTION};
use crate::models::{default_statuses, User};
use crate::store::{Table, TableStore};

/// Resolve the token's identity and open a session on `owner/repo`.
///
/// `owner` defaults to the token's own login.
pub async fn login(
    github: &Arc<dyn GitHubApi>,
    token: &str,
    owner: Option<&str>,
    repo: &str,
) -> Result<Session, AppError> {
    let token = require_token(token)?;
    validate_repo_name(repo)?;
    let user = github.authenticated_user(token).await?;

    let owner = owner
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .unwrap_or(&user.login);
    let repo = RepoRef::new(owner, repo);
    github.repository(token, &repo).await?;

    tracing::info!(login = %user.login, repo = %repo, backend = github.backend_tag(), "session opened");
    Ok(Session::new(user.login, repo, token.to_string()))
}

/// Create a private repository for the token's account and seed every table.
///
/// If an earlier registration created the repository but stopped before every
/// table was written, registering the same name again finishes the seeding.
pub async fn register(
    github: &Arc<dyn GitHubApi>,
    token: &str,
    repo: &str,
) -> Result<Session, AppError> {
    let token = require_token(token)?;
    validate_repo_name(repo)?;
    let user = github.authenticated_user(token).await?;

    let repo = match github.create_repository(token, repo).await {
        Ok(info) => {
            let created = RepoRef::parse(&info.full_name)
                .unwrap_or_else(|| RepoRef::new(&user.login, repo));
            tracing::info!(login = %user.login, repo = %created, "repository created");
            created
        }
        Err(GitHubError::NameTaken(name)) => {
            let existing = RepoRef::new(&user.login, repo);
            if !is_unfinished(github, token, &existing).await? {
                return Err(GitHubError::NameTaken(name).into());
            }
            tracing::warn!(login = %user.login, repo = %existing, "resuming seeding of unfinished repository");
            existing
        }
        Err(e) => return Err(e.into()),
    };

    let store = TableStore::new(github.clone(), repo.clone(), token);
    seed_tables(&store, &user).await.map_err(|e| {
        tracing::error!(repo = %repo, error = %e, "seeding stopped");
        e.context(format!(
            "{} was created but not fully initialized; register it again to finish",
            repo
        ))
    })?;

    Ok(Session::new(user.login, repo, token.to_string()))
}

/// A repository this backend created whose tables are not all written yet.
async fn is_unfinished(
    github: &Arc<dyn GitHubApi>,
    token: &str,
    repo: &RepoRef,
) -> Result<bool, AppError> {
    let info = github.repository(token, repo).await?;
    if info.description.as_deref() != Some(REPO_DESCRIPTION) {
        return Ok(false);
    }
    for table in Table::ALL {
        if github.get_contents(token, repo, table.path()).await?.is_none() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Write every table that does not exist yet.
async fn seed_tables(store: &TableStore, user: &GitHubUser) -> Result<(), AppError> {
    for table in Table::ALL {
        if store.read(table).await?.sha.is_some() {
            tracing::debug!(repo = %store.repo(), table = %table, "table already seeded");
            continue;
        }
        let value = match table {
            Table::Users => {
                let name = user.name.as_deref().unwrap_or(&user.login);
                let email = user.email.clone().unwrap_or_default();
                serde_json::to_value(vec![User::administrator(name, &email)])?
            }
            Table::Statuses => serde_json::to_value(default_statuses())?,
            _ => Value::Array(Vec::new()),
        };
        store
            .write(table, &value, &format!("Initialize {}", table.path()), None)
            .await?;
    }
    tracing::debug!(repo = %store.repo(), tables = Table::ALL.len(), "repository seeded");
    Ok(())
}

fn require_token(token: &str) -> Result<&str, AppError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized("A GitHub token is required".to_string()));
    }
    Ok(token)
}

static REPO_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]{1,100}$").ok());

/// GitHub repository names: letters, digits, `.`, `-`, `_`; at most 100 chars.
pub fn validate_repo_name(name: &str) -> Result<(), AppError> {
    let valid = REPO_NAME.as_ref().is_some_and(|re| re.is_match(name));
    if !valid || name == "." || name == ".." {
        return Err(AppError::Validation(format!(
            "{:?} is not a valid repository name",
            name
        )));
    }
    Ok(())
}

//! reqwest-backed GitHub client.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{
    FileContents, GitHubApi, GitHubError, GitHubUser, PutContents, RepoInfo, RepoRef,
    REPO_DESCRIPTION,
};

const USER_AGENT: &str = concat!("fleetdesk-backend/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// GitHub REST client over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpGitHub {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: PutResponseContent,
}

#[derive(Debug, Deserialize)]
struct PutResponseContent {
    sha: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn mentions(&self, needle: &str) -> bool {
        self.message.to_lowercase().contains(needle)
            || self.errors.iter().any(|e| {
                e.message
                    .as_deref()
                    .is_some_and(|m| m.to_lowercase().contains(needle))
            })
    }
}

impl HttpGitHub {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GitHubError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GitHubError::Transport(format!("client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GitHubError> {
        request
            .send()
            .await
            .map_err(|e| GitHubError::Transport(e.to_string()))
    }
}

async fn error_body(response: Response) -> ErrorBody {
    response.json::<ErrorBody>().await.unwrap_or_default()
}

/// Map the status codes every endpoint shares.
async fn status_error(response: Response, subject: &str) -> GitHubError {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED => GitHubError::Unauthorized,
        StatusCode::FORBIDDEN => GitHubError::Forbidden(subject.to_string()),
        StatusCode::NOT_FOUND => GitHubError::NotFound(subject.to_string()),
        _ => GitHubError::Status {
            status: status.as_u16(),
            message: error_body(response).await.message,
        },
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, GitHubError> {
    response
        .json::<T>()
        .await
        .map_err(|e| GitHubError::Decode(e.to_string()))
}

#[async_trait]
impl GitHubApi for HttpGitHub {
    fn backend_tag(&self) -> &'static str {
        "github"
    }

    async fn authenticated_user(&self, token: &str) -> Result<GitHubUser, GitHubError> {
        let response = self.send(self.request(Method::GET, "/user", token)).await?;
        if !response.status().is_success() {
            return Err(match response.status() {
                // A token without user scope still identifies nobody.
                StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => GitHubError::Unauthorized,
                _ => status_error(response, "user").await,
            });
        }
        decode(response).await
    }

    async fn repository(&self, token: &str, repo: &RepoRef) -> Result<RepoInfo, GitHubError> {
        let path = format!("/repos/{}/{}", repo.owner, repo.name);
        let response = self.send(self.request(Method::GET, &path, token)).await?;
        if !response.status().is_success() {
            return Err(status_error(response, &repo.to_string()).await);
        }
        decode(response).await
    }

    async fn create_repository(&self, token: &str, name: &str) -> Result<RepoInfo, GitHubError> {
        let body = json!({
            "name": name,
            "private": true,
            "auto_init": true,
            "description": REPO_DESCRIPTION,
        });
        let response = self
            .send(self.request(Method::POST, "/user/repos", token).json(&body))
            .await?;

        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            let body = error_body(response).await;
            if body.mentions("already exists") {
                return Err(GitHubError::NameTaken(name.to_string()));
            }
            return Err(GitHubError::Status {
                status: 422,
                message: body.message,
            });
        }
        if !response.status().is_success() {
            return Err(status_error(response, "user repositories").await);
        }
        decode(response).await
    }

    async fn get_contents(
        &self,
        token: &str,
        repo: &RepoRef,
        path: &str,
    ) -> Result<Option<FileContents>, GitHubError> {
        let url_path = format!("/repos/{}/{}/contents/{}", repo.owner, repo.name, path);
        let response = self.send(self.request(Method::GET, &url_path, token)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(response, &format!("{}:{}", repo, path)).await);
        }

        let contents: ContentsResponse = decode(response).await?;
        if contents.encoding != "base64" {
            return Err(GitHubError::Decode(format!(
                "{} has unsupported encoding {:?}",
                path, contents.encoding
            )));
        }

        // GitHub wraps base64 at 60 columns.
        let packed: String = contents
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = STANDARD
            .decode(packed)
            .map_err(|e| GitHubError::Decode(format!("{}: {}", path, e)))?;

        Ok(Some(FileContents {
            sha: contents.sha,
            bytes,
        }))
    }

    async fn put_contents(
        &self,
        token: &str,
        repo: &RepoRef,
        path: &str,
        put: PutContents<'_>,
    ) -> Result<String, GitHubError> {
        let url_path = format!("/repos/{}/{}/contents/{}", repo.owner, repo.name, path);
        let mut body = json!({
            "message": put.message,
            "content": STANDARD.encode(put.bytes),
        });
        if let Some(sha) = put.sha {
            body["sha"] = json!(sha);
        }

        let response = self
            .send(self.request(Method::PUT, &url_path, token).json(&body))
            .await?;

        match response.status() {
            StatusCode::CONFLICT => {
                return Err(GitHubError::ShaConflict {
                    path: path.to_string(),
                    current_sha: None,
                })
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body = error_body(response).await;
                if body.mentions("sha") {
                    return Err(GitHubError::ShaConflict {
                        path: path.to_string(),
                        current_sha: None,
                    });
                }
                return Err(GitHubError::Status {
                    status: 422,
                    message: body.message,
                });
            }
            status if !status.is_success() => {
                return Err(status_error(response, &format!("{}:{}", repo, path)).await)
            }
            _ => {}
        }

        let put_response: PutResponse = decode(response).await?;
        Ok(put_response.content.sha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::Value;

    const TOKEN: &str = "ghp_valid";

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {}", TOKEN))
    }

    /// Minimal stand-in for api.github.com.
    async fn spawn_fake_github() -> String {
        let app = Router::new()
            .route(
                "/user",
                get(|headers: HeaderMap| async move {
                    if !authorized(&headers) {
                        return (
                            AxumStatus::UNAUTHORIZED,
                            Json(json!({ "message": "Bad credentials" })),
                        );
                    }
                    (AxumStatus::OK, Json(json!({ "login": "octo", "email": null })))
                }),
            )
            .route(
                "/user/repos",
                post(|Json(body): Json<Value>| async move {
                    if body["name"] == "taken" {
                        return (
                            AxumStatus::UNPROCESSABLE_ENTITY,
                            Json(json!({
                                "message": "Repository creation failed.",
                                "errors": [{ "message": "name already exists on this account" }]
                            })),
                        );
                    }
                    (
                        AxumStatus::CREATED,
                        Json(json!({ "full_name": format!("octo/{}", body["name"].as_str().unwrap_or_default()), "private": true })),
                    )
                }),
            )
            .route(
                "/repos/{owner}/{repo}/contents/{*path}",
                get(|Path((_, _, path)): Path<(String, String, String)>| async move {
                    if path != "drivers.json" {
                        return (AxumStatus::NOT_FOUND, Json(json!({ "message": "Not Found" })));
                    }
                    // Split the base64 payload across lines the way GitHub does.
                    let encoded = STANDARD.encode(br#"[{"id":1,"name":"Anna"}]"#);
                    let (head, tail) = encoded.split_at(10);
                    (
                        AxumStatus::OK,
                        Json(json!({
                            "sha": "sha-drivers",
                            "encoding": "base64",
                            "content": format!("{}\n{}\n", head, tail)
                        })),
                    )
                })
                .put(|Json(body): Json<Value>| async move {
                    if body["sha"] != "sha-drivers" {
                        return (AxumStatus::CONFLICT, Json(json!({ "message": "conflict" })));
                    }
                    (AxumStatus::OK, Json(json!({ "content": { "sha": "sha-next" } })))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str) -> HttpGitHub {
        HttpGitHub::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_user_lookup_and_bad_token() {
        let github = client(&spawn_fake_github().await);

        let user = github.authenticated_user(TOKEN).await.unwrap();
        assert_eq!(user.login, "octo");

        let err = github.authenticated_user("nope").await.unwrap_err();
        assert!(matches!(err, GitHubError::Unauthorized));
    }

    #[tokio::test]
    async fn test_create_repository_name_taken() {
        let github = client(&spawn_fake_github().await);

        let info = github.create_repository(TOKEN, "fleet").await.unwrap();
        assert_eq!(info.full_name, "octo/fleet");

        let err = github.create_repository(TOKEN, "taken").await.unwrap_err();
        assert!(matches!(err, GitHubError::NameTaken(name) if name == "taken"));
    }

    #[tokio::test]
    async fn test_contents_decode_and_missing_file() {
        let github = client(&spawn_fake_github().await);
        let repo = RepoRef::new("octo", "fleet");

        let file = github
            .get_contents(TOKEN, &repo, "drivers.json")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.sha, "sha-drivers");
        let value: Value = serde_json::from_slice(&file.bytes).unwrap();
        assert_eq!(value[0]["name"], "Anna");

        let missing = github.get_contents(TOKEN, &repo, "cars.json").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_put_contents_with_stale_sha_conflicts() {
        let github = client(&spawn_fake_github().await);
        let repo = RepoRef::new("octo", "fleet");

        let put = PutContents {
            message: "Update drivers",
            bytes: b"[]",
            sha: Some("sha-drivers"),
        };
        let sha = github
            .put_contents(TOKEN, &repo, "drivers.json", put)
            .await
            .unwrap();
        assert_eq!(sha, "sha-next");

        let stale = PutContents {
            sha: Some("sha-old"),
            ..put
        };
        let err = github
            .put_contents(TOKEN, &repo, "drivers.json", stale)
            .await
            .unwrap_err();
        assert!(matches!(err, GitHubError::ShaConflict { .. }));
    }
}

//! GitHub releases client.

use super::{Asset, ReleaseClient, ReleaseId, ReleaseInfo, UsernameResolver};
use crate::config::{EnvConfig, ReleaseContext, render_name};
use crate::error::{ErrorExt, PublishError, Result};
use async_trait::async_trait;
use reqwest::{Response, StatusCode, header};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio_util::io::ReaderStream;

const PROVIDER: &str = "github";
const API_BASE: &str = "https://api.github.com";
const UPLOAD_BASE: &str = "https://uploads.github.com";
const TOKEN_VARIABLES: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Client for the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    api_base: String,
    upload_base: String,
    /// Tags whose create request may have reached GitHub without a response
    unconfirmed: Arc<Mutex<HashSet<String>>>,
}

#[derive(Serialize)]
struct CreateReleaseRequest<'a> {
    tag_name: &'a str,
    target_commitish: &'a str,
    name: String,
    body: String,
    draft: bool,
    prerelease: bool,
}

#[derive(Deserialize)]
struct CreatedRelease {
    id: u64,
}

#[derive(Deserialize)]
struct ListedRelease {
    id: u64,
    tag_name: String,
}

#[derive(Deserialize)]
struct ValidationError {
    code: Option<String>,
}

#[derive(Deserialize)]
struct ValidationFailed {
    #[serde(default)]
    errors: Vec<ValidationError>,
}

#[derive(Deserialize)]
struct CommitResponse {
    author: Option<CommitAuthor>,
}

#[derive(Deserialize)]
struct CommitAuthor {
    login: String,
}

fn transient(operation: &str, reason: impl ToString) -> PublishError {
    PublishError::Transient {
        provider: PROVIDER.to_string(),
        operation: operation.to_string(),
        reason: reason.to_string(),
    }
}

fn rejected(operation: &str, reason: impl ToString) -> PublishError {
    PublishError::Rejected {
        provider: PROVIDER.to_string(),
        operation: operation.to_string(),
        reason: reason.to_string(),
    }
}

/// GitHub error bodies carry a `message`; fall back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// A 422 whose errors report `already_exists`
fn already_exists(body: &str) -> bool {
    serde_json::from_str::<ValidationFailed>(body)
        .map(|v| v.errors.iter().any(|e| e.code.as_deref() == Some("already_exists")))
        .unwrap_or(false)
}

fn release_with_tag(releases: &[ListedRelease], tag: &str) -> Option<ReleaseId> {
    releases
        .iter()
        .find(|r| r.tag_name == tag)
        .map(|r| ReleaseId(r.id))
}

/// 5xx and rate limiting are worth retrying; any other non-success is final
fn classify(operation: &str, status: StatusCode, body: &str) -> PublishError {
    let reason = format!("{status}: {}", error_message(body));
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        transient(operation, reason)
    } else {
        rejected(operation, reason)
    }
}

async fn check(response: Response, operation: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify(operation, status, &body).into())
}

impl GitHubClient {
    /// Create a client authenticating with `token`
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| rejected("client setup", e))?;
        Ok(Self {
            http,
            token: token.into(),
            api_base: API_BASE.to_string(),
            upload_base: UPLOAD_BASE.to_string(),
            unconfirmed: Arc::default(),
        })
    }

    /// Create a client from `GITHUB_TOKEN` or `GH_TOKEN`
    pub fn from_env(env: &EnvConfig) -> Result<Self> {
        let token = TOKEN_VARIABLES
            .iter()
            .find_map(|key| env.get(key))
            .ok_or_else(|| PublishError::MissingToken {
                provider: "GitHub".to_string(),
                variables: TOKEN_VARIABLES.join(" or "),
            })?;
        Self::new(token)
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    fn repo_path(info: &ReleaseInfo) -> String {
        format!(
            "repos/{}/{}",
            info.settings.repository_owner, info.settings.repository
        )
    }

    fn unconfirmed(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.unconfirmed.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Release already created for `info.tag`, drafts included
    async fn find_release(&self, info: &ReleaseInfo) -> Result<Option<ReleaseId>> {
        let operation = "list releases";
        let url = format!("{}/{}/releases", self.api_base, Self::repo_path(info));
        let response = self
            .request(reqwest::Method::GET, url)
            .query(&[("per_page", "100")])
            .send()
            .await
            .map_err(|e| transient(operation, e))?;
        let releases: Vec<ListedRelease> = check(response, operation)
            .await?
            .json()
            .await
            .map_err(|e| transient(operation, e))?;
        Ok(release_with_tag(&releases, &info.tag))
    }

    async fn release_body(info: &ReleaseInfo) -> Result<String> {
        match &info.release_notes {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .fs_context("reading release notes", path),
            None => Ok(String::new()),
        }
    }
}

#[async_trait]
impl ReleaseClient for GitHubClient {
    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn release(&self, info: &ReleaseInfo) -> Result<ReleaseId> {
        let operation = "create release";

        // A retry after a lost response must not create a second (draft) release.
        let unconfirmed = self.unconfirmed().contains(&info.tag);
        if unconfirmed {
            if let Some(id) = self.find_release(info).await? {
                log::info!("Release {} already exists (id {id})", info.tag);
                self.unconfirmed().remove(&info.tag);
                return Ok(id);
            }
        }

        let name = match &info.settings.name {
            Some(template) => render_name(
                template,
                &ReleaseContext {
                    project: info.project.clone(),
                    tag: info.tag.clone(),
                },
            )?,
            None => info.tag.clone(),
        };
        let payload = CreateReleaseRequest {
            tag_name: &info.tag,
            target_commitish: &info.commitish,
            name,
            body: Self::release_body(info).await?,
            draft: info.settings.draft,
            prerelease: info.settings.prerelease,
        };

        let url = format!("{}/{}/releases", self.api_base, Self::repo_path(info));
        let response = match self
            .request(reqwest::Method::POST, url)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.unconfirmed().insert(info.tag.clone());
                return Err(transient(operation, e).into());
            }
        };
        self.unconfirmed().remove(&info.tag);
        let created: CreatedRelease = check(response, operation)
            .await?
            .json()
            .await
            .map_err(|e| transient(operation, e))?;

        log::info!(
            "Created GitHub release {} for {} (id {})",
            info.tag,
            Self::repo_path(info),
            created.id
        );
        Ok(ReleaseId(created.id))
    }

    async fn upload_asset(&self, info: &ReleaseInfo, id: ReleaseId, asset: Asset) -> Result<()> {
        let operation = "upload asset";
        let url = format!(
            "{}/{}/releases/{id}/assets",
            self.upload_base,
            Self::repo_path(info)
        );
        let response = self
            .request(reqwest::Method::POST, url)
            .query(&[("name", asset.name.as_str())])
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header(header::CONTENT_LENGTH, asset.size)
            .body(reqwest::Body::wrap_stream(ReaderStream::new(asset.file)))
            .send()
            .await
            .map_err(|e| transient(operation, e))?;

        // Asset names are unique per release: a conflict means an earlier attempt landed.
        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            let body = response.text().await.unwrap_or_default();
            if already_exists(&body) {
                log::warn!("{} was already uploaded to release {id}", asset.name);
                return Ok(());
            }
            return Err(classify(operation, StatusCode::UNPROCESSABLE_ENTITY, &body).into());
        }
        check(response, operation).await?;

        log::debug!("Uploaded {} ({} bytes)", asset.name, asset.size);
        Ok(())
    }

    fn username_resolver(&self) -> Option<&dyn UsernameResolver> {
        Some(self)
    }
}

#[async_trait]
impl UsernameResolver for GitHubClient {
    async fn resolve_username(
        &self,
        info: &ReleaseInfo,
        commit: &str,
        author_email: &str,
    ) -> Result<Option<String>> {
        let operation = "resolve username";
        let url = format!("{}/{}/commits/{commit}", self.api_base, Self::repo_path(info));
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| transient(operation, e))?;

        // Commits that were never pushed have no GitHub author.
        if matches!(
            response.status(),
            StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY
        ) {
            log::debug!("No GitHub commit {commit} for {author_email}");
            return Ok(None);
        }

        let body: CommitResponse = check(response, operation)
            .await?
            .json()
            .await
            .map_err(|e| transient(operation, e))?;
        Ok(body.author.map(|a| a.login))
    }
}

use std::time::Duration;

use axum::http::header::ACCEPT;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::filter::Owner;
use crate::options::Options;

// topics of repositories and check-runs of commits are preview features
pub const PREVIEW_ACCEPT: &str =
    "application/vnd.github.mercy-preview+json,application/vnd.github.antiope-preview+json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRunList {
    pub total_count: u64,
    #[serde(default)]
    pub check_runs: Vec<CheckRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRun {
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub completed_at: Option<String>,
}

#[derive(Clone)]
pub struct Client {
    octocrab: Octocrab,
    timeout: Duration,
}

impl Client {
    pub fn new(options: &Options) -> Result<Self, Error> {
        let timeout = Duration::from_secs(options.timeout);
        let mut builder = Octocrab::builder()
            .base_uri(options.api_base.as_str())?
            .add_header(ACCEPT, PREVIEW_ACCEPT.to_owned())
            .set_connect_timeout(Some(timeout))
            .set_read_timeout(Some(timeout))
            .set_write_timeout(Some(timeout))
            .add_retry_config(RetryConfig::None);
        if let Some((user, pass)) = options.credentials() {
            builder = builder.basic_auth(user.to_owned(), pass.to_owned());
        } else {
            log::info!("no credentials configured, requests are unauthenticated");
        }
        Ok(Client {
            octocrab: builder.build()?,
            timeout,
        })
    }

    /// GET a route relative to the api base and decode the json payload.
    ///
    /// The timeout covers the whole exchange, body included.
    pub async fn fetch<T>(&self, route: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        log::debug!("get {route}");
        let request = self.octocrab.get(route, None::<&()>);
        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| Error::Timeout(route.to_owned()))?;
        Ok(response?)
    }

    /// First page of repositories of the owner, in listing order
    pub async fn repos(&self, owner: &Owner) -> Result<Vec<Repository>, Error> {
        self.fetch(&owner.repos_route()).await
    }

    pub async fn latest_commit(&self, full_name: &str) -> Result<String, Error> {
        let commits: Vec<Commit> = self.fetch(&format!("/repos/{full_name}/commits")).await?;
        commits
            .into_iter()
            .next()
            .map(|c| c.sha)
            .ok_or_else(|| Error::NoCommits(full_name.to_owned()))
    }

    pub async fn check_runs(&self, full_name: &str, sha: &str) -> Result<CheckRunList, Error> {
        self.fetch(&format!("/repos/{full_name}/commits/{sha}/check-runs"))
            .await
    }
}

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::error::Error;
use crate::github::{CheckRun, Client, Repository};
use crate::selection::{Selector, Strategy};

pub const UNKNOWN: &str = "unknown";

/// Presentation-ready result of one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStatus {
    pub name: String,
    pub status: String,
    pub url: String,
    pub time: String,
}

impl RepoStatus {
    pub fn unknown(repo: &Repository) -> Self {
        RepoStatus {
            name: repo.name.clone(),
            status: UNKNOWN.to_owned(),
            url: repo.html_url.clone(),
            time: String::new(),
        }
    }

    pub fn new(repo: &Repository, run: Option<&CheckRun>) -> Self {
        let mut status = Self::unknown(repo);
        if let Some(run) = run {
            // a running check has no conclusion yet, report its status instead
            status.status = run.conclusion.clone().unwrap_or_else(|| run.status.clone());
            status.time = run.completed_at.clone().unwrap_or_default();
        }
        status
    }
}

/// Looks up all repositories concurrently, one task per repository.
///
/// Exactly one status is returned per repository, in the order of `repos`.
/// Failures of a single repository are reported as unknown and never affect
/// the others.
pub async fn build(
    client: &Client,
    repos: Vec<Repository>,
    strategy: Strategy,
) -> Vec<RepoStatus> {
    let count = repos.len();
    let (tx, mut rx) = mpsc::channel(count.max(1));
    let mut fallback = Vec::with_capacity(count);

    for (index, repo) in repos.into_iter().enumerate() {
        fallback.push(RepoStatus::unknown(&repo));
        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let name = &repo.full_name;
            let work = AssertUnwindSafe(repo_status(&client, &repo, strategy));
            let status = match work.catch_unwind().await {
                Ok(Ok(status)) => status,
                Ok(Err(e)) => {
                    log::warn!("failed to look up {name}, status unknown: {e}");
                    RepoStatus::unknown(&repo)
                }
                Err(_) => {
                    log::error!("worker of {name} panicked, status unknown");
                    RepoStatus::unknown(&repo)
                }
            };
            // only fails when the request has been dropped
            if tx.send((index, status)).await.is_err() {
                log::debug!("result of {name} discarded");
            }
        });
    }
    // the channel closes once every worker has reported
    drop(tx);

    let mut slots: Vec<Option<RepoStatus>> = vec![None; count];
    for _ in 0..count {
        match rx.recv().await {
            Some((index, status)) => slots[index] = Some(status),
            None => break,
        }
    }

    slots
        .into_iter()
        .zip(fallback)
        .map(|(slot, fallback)| {
            slot.unwrap_or_else(|| {
                log::warn!("no result for {}, status unknown", fallback.name);
                fallback
            })
        })
        .collect()
}

async fn repo_status(
    client: &Client,
    repo: &Repository,
    strategy: Strategy,
) -> Result<RepoStatus, Error> {
    let name = &repo.full_name;
    let sha = client.latest_commit(name).await?;
    let list = client.check_runs(name, &sha).await?;
    log::debug!("{name}@{sha} has {} check-runs", list.total_count);
    let run = if list.total_count == 0 {
        None
    } else {
        strategy.select(&list.check_runs)
    };
    if let Some(run) = run {
        log::debug!("{name} is represented by check-run '{}'", run.name);
    }
    Ok(RepoStatus::new(repo, run))
}

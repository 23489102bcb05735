use std::collections::BTreeSet;
use std::fmt::{self, Display};

use crate::error::Error;
use crate::github::{Client, Repository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    User(String),
    Organization(String),
}

impl Owner {
    pub fn repos_route(&self) -> String {
        match self {
            Owner::User(name) => format!("/users/{name}/repos"),
            Owner::Organization(name) => format!("/orgs/{name}/repos"),
        }
    }
}

impl Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Owner::User(name) => write!(f, "user {name}"),
            Owner::Organization(name) => write!(f, "org {name}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RepoFilter {
    pub include: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
    pub topics: BTreeSet<String>,
}

impl RepoFilter {
    pub fn new(include: &str, exclude: &str, topics: &str) -> Self {
        RepoFilter {
            include: parse_csv(include),
            exclude: parse_csv(exclude),
            topics: parse_csv(topics),
        }
    }

    pub fn matches(&self, repo: &Repository) -> bool {
        if self.exclude.contains(&repo.name) {
            false
        } else if self.include.contains(&repo.name) {
            true
        } else {
            repo.topics.iter().any(|t| self.topics.contains(t))
        }
    }

    pub fn apply(&self, repos: Vec<Repository>) -> Vec<Repository> {
        repos.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Empty entries are dropped, an empty string is an empty set
pub fn parse_csv(s: &str) -> BTreeSet<String> {
    s.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

pub async fn list(
    client: &Client,
    owner: &Owner,
    filter: &RepoFilter,
) -> Result<Vec<Repository>, Error> {
    let all = client.repos(owner).await?;
    let total = all.len();
    let repos = filter.apply(all);
    let kept = repos.len();
    log::debug!("{kept} of {total} repositories of {owner} selected");
    Ok(repos)
}

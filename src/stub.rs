//! In-process stand-in for the GitHub api, used by tests.

use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use futures::StreamExt;
use serde_json::json;
use tokio::net::TcpListener;

use crate::github::{CheckRun, CheckRunList, Client, Commit, Repository};
use crate::options::Options;

pub const OWNER: &str = "me";

pub fn repo(name: &str, topics: &[&str]) -> Repository {
    Repository {
        name: name.to_owned(),
        full_name: format!("{OWNER}/{name}"),
        html_url: format!("https://github.com/{OWNER}/{name}"),
        topics: topics.iter().map(|t| t.to_string()).collect(),
    }
}

#[derive(Debug, Clone)]
pub struct StubRepo {
    pub repo: Repository,
    pub commits: Vec<String>,
    pub check_runs: Vec<CheckRun>,
    /// answer the commit listing with a server error
    pub broken: bool,
    /// answer the commit listing with json of the wrong shape
    pub malformed: bool,
    /// send the commit listing body in chunks 700ms apart
    pub trickle: bool,
    /// delay before answering the commit listing
    pub delay: Option<Duration>,
}

impl StubRepo {
    pub fn new(name: &str, topics: &[&str]) -> Self {
        StubRepo {
            repo: repo(name, topics),
            commits: Vec::new(),
            check_runs: Vec::new(),
            broken: false,
            malformed: false,
            trickle: false,
            delay: None,
        }
    }

    pub fn commit(mut self, sha: &str) -> Self {
        self.commits.push(sha.to_owned());
        self
    }

    pub fn check_run(mut self, run: CheckRun) -> Self {
        self.check_runs.push(run);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub accept: Vec<String>,
    pub authorization: Option<String>,
}

struct StubState {
    repos: Vec<StubRepo>,
    requests: Mutex<Vec<Recorded>>,
}

impl StubState {
    fn record(&self, uri: &Uri, headers: &HeaderMap) {
        let accept = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_owned)
            .collect();
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        self.requests.lock().unwrap().push(Recorded {
            path: uri.path().to_owned(),
            accept,
            authorization,
        });
    }

    fn find(&self, owner: &str, name: &str) -> Option<&StubRepo> {
        let full_name = format!("{owner}/{name}");
        self.repos.iter().find(|r| r.repo.full_name == full_name)
    }
}

pub struct Stub {
    pub base: String,
    state: Arc<StubState>,
}

impl Stub {
    pub fn options(&self, args: &[&str]) -> Options {
        options(&self.base, args)
    }

    pub fn client(&self) -> Client {
        self.client_with(&[])
    }

    pub fn client_with(&self, args: &[&str]) -> Client {
        Client::new(&self.options(args)).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

fn options(base: &str, args: &[&str]) -> Options {
    let fixed = ["check-board", "--api-base", base, "--user", OWNER];
    let argv = fixed.into_iter().chain(args.iter().copied());
    Options::try_parse_from(argv).unwrap()
}

/// Options pointing at a local port nothing listens on
pub async fn closed_port_options() -> Options {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    options(&format!("http://{addr}"), &[])
}

pub async fn spawn(repos: Vec<StubRepo>) -> Stub {
    let state = Arc::new(StubState {
        repos,
        requests: Mutex::new(Vec::new()),
    });
    let router = Router::new()
        .route("/users/{owner}/repos", get(list_repos))
        .route("/orgs/{owner}/repos", get(list_repos))
        .route("/repos/{owner}/{name}/commits", get(list_commits))
        .route(
            "/repos/{owner}/{name}/commits/{sha}/check-runs",
            get(list_check_runs),
        )
        .with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Stub {
        base: format!("http://{addr}"),
        state,
    }
}

fn github_error(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "message": message,
        "documentation_url": "https://docs.github.com",
    });
    (status, Json(body)).into_response()
}

fn trickle(chunks: &'static [&'static str]) -> Response {
    let stream = futures::stream::iter(chunks).then(|chunk| async move {
        tokio::time::sleep(Duration::from_millis(700)).await;
        Ok::<_, Infallible>(*chunk)
    });
    Response::builder()
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from_stream(stream))
        .unwrap()
}

async fn list_repos(
    State(state): State<Arc<StubState>>,
    Path(owner): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &headers);
    if owner != OWNER {
        return github_error(StatusCode::NOT_FOUND, "Not Found");
    }
    let repos: Vec<Repository> = state.repos.iter().map(|r| r.repo.clone()).collect();
    Json(repos).into_response()
}

async fn list_commits(
    State(state): State<Arc<StubState>>,
    Path((owner, name)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &headers);
    let Some(repo) = state.find(&owner, &name) else {
        return github_error(StatusCode::NOT_FOUND, "Not Found");
    };
    if let Some(delay) = repo.delay {
        tokio::time::sleep(delay).await;
    }
    if repo.broken {
        return github_error(StatusCode::INTERNAL_SERVER_ERROR, "Server Error");
    }
    if repo.malformed {
        return Json(json!({ "not": "an array" })).into_response();
    }
    if repo.trickle {
        return trickle(&["[", " ", " ", " ", " ", " ", "]"]);
    }
    let commits: Vec<Commit> = repo
        .commits
        .iter()
        .map(|sha| Commit { sha: sha.clone() })
        .collect();
    Json(commits).into_response()
}

async fn list_check_runs(
    State(state): State<Arc<StubState>>,
    Path((owner, name, sha)): Path<(String, String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &headers);
    let Some(repo) = state.find(&owner, &name) else {
        return github_error(StatusCode::NOT_FOUND, "Not Found");
    };
    if !repo.commits.contains(&sha) {
        return github_error(StatusCode::NOT_FOUND, "Not Found");
    }
    Json(CheckRunList {
        total_count: repo.check_runs.len() as u64,
        check_runs: repo.check_runs.clone(),
    })
    .into_response()
}

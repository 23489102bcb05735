use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use tokio::net::TcpListener;

use crate::board;
use crate::error::Error;
use crate::filter::{self, Owner, RepoFilter};
use crate::github::Client;
use crate::options::Options;
use crate::page::{self, Style};
use crate::selection::Strategy;

pub struct AppState {
    pub client: Client,
    pub owner: Owner,
    pub filter: RepoFilter,
    pub strategy: Strategy,
    pub style: Style,
}

impl AppState {
    pub fn new(options: &Options) -> Result<Self, Error> {
        Ok(AppState {
            client: Client::new(options)?,
            owner: options.owner()?,
            filter: RepoFilter::new(&options.include, &options.exclude, &options.topics),
            strategy: options.strategy,
            style: Style {
                min_width: options.width.clone(),
            },
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new().route("/", get(dashboard)).with_state(state)
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Response {
    let repos = match filter::list(&state.client, &state.owner, &state.filter).await {
        Ok(repos) => repos,
        Err(e) => {
            log::error!("failed to list repositories of {}: {}", state.owner, e);
            return (
                StatusCode::BAD_GATEWAY,
                format!("failed to list repositories of {}: {e}", state.owner),
            )
                .into_response();
        }
    };
    let count = repos.len();
    let statuses = board::build(&state.client, repos, state.strategy).await;
    log::info!("rendered {count} repositories of {}", state.owner);
    Html(page::render(&statuses, &state.style, Utc::now())).into_response()
}

pub async fn serve(options: &Options) -> Result<(), Error> {
    let state = Arc::new(AppState::new(options)?);
    let app = build_router(state);

    let listener = TcpListener::bind(("0.0.0.0", options.port)).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c: {e}");
        // never resolve, keep serving
        std::future::pending::<()>().await;
    }
}

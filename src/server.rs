use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::{
    config::AppConfig, repository::SubmissionStore, routes,
    submission_service::SubmissionService,
};

/// Everything the handlers need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub submission_service: Arc<SubmissionService>,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(config: AppConfig, submissions: Arc<dyn SubmissionStore>) -> AppState {
        let submission_service = SubmissionService::new(
            submissions.clone(),
            config.upload_dir.clone(),
            config.rewards_dir.clone(),
        );

        // SHA-512 yields exactly the 64 bytes of key material `Key` needs,
        // whatever the length of the configured secret.
        let cookie_key = Key::from(Sha512::digest(config.secret_key.as_bytes()).as_slice());

        AppState {
            config: Arc::new(config),
            submissions,
            submission_service: Arc::new(submission_service),
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/submit", post(routes::submit))
        .route("/success/{token}", get(routes::success))
        .route("/reward/{token}", get(routes::reward))
        .route("/wall", get(routes::wall))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .nest_service("/static/rewards", ServeDir::new(&state.config.rewards_dir))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    state.submission_service.prepare_directories().await?;

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }

        info!("Ctrl-C received, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!("Failed to install the terminate signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

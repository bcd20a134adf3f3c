use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::utils::qr_code::QrCodeError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    QrCode(#[from] QrCodeError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Could not render page: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Html("<!doctype html><title>Not Found</title><h1>Not Found</h1>"),
            )
                .into_response(),

            AppError::Multipart(err) => {
                let status = err.status();
                if status.is_server_error() {
                    error!("Could not read upload: {err}");
                }
                (status, err.body_text()).into_response()
            }

            err => {
                error!("Internal error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Sorry, there was an internal error while handling your request.",
                )
                    .into_response()
            }
        }
    }
}

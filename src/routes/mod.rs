mod flash;
mod form;


use axum::{
    extract::{FromRequestParts, Multipart, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{cookie::SignedCookieJar, Host};
use tracing::{debug, info};

use crate::{
    error::AppError,
    image_types::ImageExtension,
    models::{Submission, Token},
    pages::{render, IndexPage, RewardPage, SuccessPage, WallEntry, WallPage},
    server::AppState,
};

use form::SubmissionForm;

/// The host a request was addressed to: `Forwarded`, `X-Forwarded-Host`, `Host` or the URI
/// authority (HTTP/2 `:authority`), in that order. Missing everywhere is not an error.
type RequestHost = Result<Host, <Host as FromRequestParts<AppState>>::Rejection>;

pub async fn index(jar: SignedCookieJar) -> Result<(SignedCookieJar, Html<String>), AppError> {
    let (jar, error) = flash::take(jar);

    let page = render(IndexPage {
        error: error.map(|e| e.to_string()),
        allowed_extensions: ImageExtension::allowed_list(),
    })?;

    Ok((jar, page))
}

pub async fn submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    host: RequestHost,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let submission = match SubmissionForm::from_multipart(multipart).await?.validate() {
        Ok(submission) => submission,
        Err(err) => {
            info!("Rejected submission: {err}");
            return Ok((flash::set(jar, err), Redirect::to("/")).into_response());
        }
    };

    let base_url = base_url(&state, host);

    let token = state
        .submission_service
        .submit(submission, &base_url)
        .await?;

    Ok(Redirect::to(&format!("/success/{token}")).into_response())
}

pub async fn success(
    State(state): State<AppState>,
    Path(token): Path<String>,
    host: RequestHost,
) -> Result<Html<String>, AppError> {
    let submission = find_submission(&state, &token).await?;

    let reward_url = format!("{}/reward/{}", base_url(&state, host), submission.token);
    let qr_url = format!("/static/rewards/{}", submission.token.qr_filename());

    render(SuccessPage {
        submission,
        qr_url,
        reward_url,
    })
}

pub async fn reward(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Html<String>, AppError> {
    let submission = find_submission(&state, &token).await?;
    render(RewardPage { submission })
}

pub async fn wall(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let entries = state
        .submissions
        .list_all_by_created_at_desc()
        .await?
        .into_iter()
        .map(WallEntry::from)
        .collect();

    render(WallPage { entries })
}

fn base_url(state: &AppState, host: RequestHost) -> String {
    let host = host.ok();
    state
        .config
        .base_url(host.as_ref().map(|Host(host)| host.as_str()))
}

async fn find_submission(state: &AppState, token: &str) -> Result<Submission, AppError> {
    let token = token.parse::<Token>().map_err(|err| {
        debug!("{err}");
        AppError::NotFound
    })?;

    state
        .submissions
        .find_by_token(&token)
        .await?
        .ok_or(AppError::NotFound)
}

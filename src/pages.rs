use askama::Template;
use axum::response::Html;

use crate::{error::AppError, models::Submission, utils::formatting::format_utc};

pub fn render(page: impl Template) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub error: Option<String>,
    pub allowed_extensions: String,
}

#[derive(Template)]
#[template(path = "success.html")]
pub struct SuccessPage {
    pub submission: Submission,
    pub qr_url: String,
    pub reward_url: String,
}

#[derive(Template)]
#[template(path = "reward.html")]
pub struct RewardPage {
    pub submission: Submission,
}

pub struct WallEntry {
    pub name: String,
    pub image_url: String,
    pub submitted_at: String,
}

impl From<Submission> for WallEntry {
    fn from(submission: Submission) -> Self {
        WallEntry {
            image_url: format!("/uploads/{}", submission.image_filename),
            submitted_at: format_utc(submission.created_at),
            name: submission.name,
        }
    }
}

#[derive(Template)]
#[template(path = "wall.html")]
pub struct WallPage {
    pub entries: Vec<WallEntry>,
}

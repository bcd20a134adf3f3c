use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart},
};
use strum::{EnumString, IntoStaticStr};
use thiserror::Error;
use tracing::debug;

use crate::{image_types::ImageExtension, submission_service::ValidSubmission};

use super::TrimmedString;

/// Reasons a submission is turned away. The snake_case variant name doubles as
/// the flash cookie value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionError {
    #[error("Please enter your name.")]
    EmptyName,
    #[error("Please upload an image.")]
    MissingImage,
    #[error("Only {} images are supported.", ImageExtension::allowed_list())]
    UnsupportedExtension,
}

pub struct UploadedPhoto {
    pub filename: String,
    pub bytes: Bytes,
}

/// Raw `POST /submit` fields, before validation.
#[derive(Default)]
pub struct SubmissionForm {
    pub name: TrimmedString,
    pub photo: Option<UploadedPhoto>,
}

impl SubmissionForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<SubmissionForm, MultipartError> {
        let mut form = SubmissionForm::default();

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().map(str::to_owned);

            match field_name.as_deref() {
                Some("name") => {
                    form.name = TrimmedString::from(field.text().await?);
                }

                Some("photo") => {
                    let filename = field.file_name().map(str::to_owned);
                    let bytes = field.bytes().await?;

                    form.photo = filename.map(|filename| UploadedPhoto { filename, bytes });
                }

                other => {
                    debug!("Ignoring unexpected form field {other:?}");
                }
            }
        }

        Ok(form)
    }

    pub fn validate(self) -> Result<ValidSubmission, SubmissionError> {
        if self.name.is_empty() {
            return Err(SubmissionError::EmptyName);
        }

        let photo = match self.photo {
            Some(photo) if !photo.filename.is_empty() => photo,
            _ => return Err(SubmissionError::MissingImage),
        };

        let extension = ImageExtension::from_filename(&photo.filename)
            .ok_or(SubmissionError::UnsupportedExtension)?;

        Ok(ValidSubmission {
            name: self.name.into(),
            extension,
            bytes: photo.bytes,
        })
    }
}

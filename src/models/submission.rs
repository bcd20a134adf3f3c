use std::fmt::Display;

use uuid::Uuid;

use crate::image_types::ImageExtension;

use super::{token::Token, types::UtcDateTime};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubmissionId(pub u64);

/// Name of a stored upload inside the upload directory: random hex plus the
/// lower-cased original extension.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageFilename(String);

impl ImageFilename {
    pub fn generate(extension: ImageExtension) -> ImageFilename {
        ImageFilename(format!("{}.{extension}", Uuid::new_v4().simple()))
    }

    pub fn from_stored(value: String) -> ImageFilename {
        ImageFilename(value)
    }
}

impl Display for ImageFilename {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImageFilename {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub name: String,
    pub image_filename: ImageFilename,
    pub token: Token,
    pub created_at: UtcDateTime,
}

#[derive(Debug)]
pub struct NewSubmission {
    pub name: String,
    pub image_filename: ImageFilename,
    pub token: Token,
    pub created_at: UtcDateTime,
}

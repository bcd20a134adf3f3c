mod submission;
mod token;

pub mod types;

pub use submission::{ImageFilename, NewSubmission, Submission, SubmissionId};
pub use token::{InvalidToken, Token};

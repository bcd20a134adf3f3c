mod submission_form;
mod trimmed_string;

pub use submission_form::{SubmissionError, SubmissionForm};
pub use trimmed_string::TrimmedString;

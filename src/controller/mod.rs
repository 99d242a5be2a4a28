pub mod preview;
pub mod submission;

pub use preview::PreviewController;
pub use submission::{SubmissionController, SubmissionOutcome};

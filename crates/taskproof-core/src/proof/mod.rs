//! Proof-of-completion types and the acceptance decision policy.

pub mod policy;
pub mod verdict;

pub use policy::{ProofDecisionPolicy, FAST_PATH_FEEDBACK, FAST_PATH_MIN_CHARS};

use serde::{Deserialize, Serialize};

/// Evidence submitted for one task completion.
///
/// Immutable once constructed; consumed once by the decision policy.
#[derive(Debug, Clone)]
pub struct ProofSubmission {
    /// Free-text proof, if any
    pub text: Option<String>,
    /// Raw image bytes, if any
    pub image: Option<Vec<u8>>,
    /// Title of the task being proven
    pub task_title: String,
    /// Description of the task being proven
    pub task_description: Option<String>,
}

impl ProofSubmission {
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Character count of the trimmed text proof (0 if absent).
    pub fn trimmed_text_chars(&self) -> usize {
        self.text
            .as_deref()
            .map(|t| t.trim().chars().count())
            .unwrap_or(0)
    }

    /// Neither text nor image present.
    pub fn is_empty(&self) -> bool {
        self.trimmed_text_chars() == 0 && self.image.is_none()
    }
}

/// The outcome of evaluating one submission.
///
/// Produced once per submission and persisted onto the task record by
/// the caller. `feedback` is surfaced verbatim to the end user, so it
/// never carries internal error detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofDecision {
    pub approved: bool,
    pub feedback: String,
}

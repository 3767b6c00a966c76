//! AI classification collaborator.
//!
//! The proof decision policy consumes classification as a capability:
//! the [`Classifier`] trait is the seam, [`openai::OpenAiClassifier`]
//! the production implementation. Tests substitute a fake.

pub mod openai;

pub use openai::OpenAiClassifier;

use crate::error::VerifyError;
use crate::proof::ProofSubmission;

/// Which classification channel to use.
///
/// Image-bearing submissions go through the vision-capable model,
/// text-only submissions through the lighter text model. The policy
/// selects the mode from the submission; it is an explicit parameter,
/// not a hidden special case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyMode {
    Text,
    Vision,
}

/// Task context and proof content handed to the classifier.
#[derive(Debug, Clone)]
pub struct ClassifyRequest<'a> {
    pub task_title: &'a str,
    pub task_description: Option<&'a str>,
    pub proof_text: Option<&'a str>,
    pub image: Option<&'a [u8]>,
}

impl<'a> ClassifyRequest<'a> {
    /// Borrow a request from a proof submission.
    pub fn from_submission(submission: &'a ProofSubmission) -> Self {
        Self {
            task_title: &submission.task_title,
            task_description: submission.task_description.as_deref(),
            proof_text: submission.text.as_deref(),
            image: submission.image.as_deref(),
        }
    }

    /// Mode implied by the request content: vision iff image bytes are present.
    pub fn mode(&self) -> ClassifyMode {
        if self.image.is_some() {
            ClassifyMode::Vision
        } else {
            ClassifyMode::Text
        }
    }
}

/// External AI classification capability.
///
/// Implementations send the request to a hosted model and return its
/// raw response text (expected shape `DECISION||REASON`, parsed by the
/// policy, never trusted). Any transport/auth/quota problem surfaces
/// as a [`VerifyError`]; the policy treats every variant as
/// "unavailable" and fails closed.
pub trait Classifier: Send + Sync {
    fn classify(
        &self,
        system_prompt: &str,
        request: &ClassifyRequest<'_>,
        mode: ClassifyMode,
    ) -> Result<String, VerifyError>;
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "taskproof";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

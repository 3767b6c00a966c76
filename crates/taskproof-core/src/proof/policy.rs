//! Two-tier proof acceptance policy.
//!
//! Tier 1 is a heuristic fast path: a sufficiently long text proof is
//! approved without any external call. Tier 2 delegates to the
//! injected [`Classifier`] and parses its `DECISION||REASON` answer.
//!
//! Every failure of the classifier resolves to a rejection with a
//! fixed feedback string; `decide` never returns an error and never
//! leaks internal error detail into feedback text.

use crate::error::VerifyError;
use crate::proof::{verdict, ProofDecision, ProofSubmission};
use crate::verify::{Classifier, ClassifyMode, ClassifyRequest};

/// Minimum trimmed character count for the fast-path auto-approval.
pub const FAST_PATH_MIN_CHARS: usize = 30;

/// Feedback for fast-path approvals.
pub const FAST_PATH_FEEDBACK: &str = "Proof accepted based on detailed text verification.";

const KEY_MISSING_FEEDBACK: &str = "AI key missing. Proof rejected.";
const TEXT_FAILURE_FEEDBACK: &str = "AI verification failed.";
const IMAGE_FAILURE_FEEDBACK: &str = "AI image verification failed.";

const TEXT_SYSTEM_PROMPT: &str = "You verify if text proves task completion. \
    Respond EXACTLY like this:\n\
    DECISION||REASON\n\
    DECISION = APPROVE or REJECT\n\
    REASON = max 1-2 short sentences.";

const VISION_SYSTEM_PROMPT: &str = "You verify task proof using text + image. \
    Respond EXACTLY:\n\
    DECISION||REASON\n\
    DECISION = APPROVE or REJECT\n\
    REASON = max 1-2 short sentences.";

/// The proof acceptance decision pipeline.
///
/// Owns nothing global: the classifier is injected at construction so
/// tests can substitute a fake.
pub struct ProofDecisionPolicy<C: Classifier> {
    classifier: C,
    min_text_chars: usize,
}

impl<C: Classifier> ProofDecisionPolicy<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            min_text_chars: FAST_PATH_MIN_CHARS,
        }
    }

    /// Override the fast-path threshold (tunable via config).
    pub fn with_min_text_chars(mut self, min_text_chars: usize) -> Self {
        self.min_text_chars = min_text_chars;
        self
    }

    /// Evaluate one submission. Total: all failure paths resolve to a
    /// rejection decision, nothing propagates past this boundary.
    pub fn decide(&self, submission: &ProofSubmission) -> ProofDecision {
        if submission.trimmed_text_chars() >= self.min_text_chars {
            return ProofDecision {
                approved: true,
                feedback: FAST_PATH_FEEDBACK.to_string(),
            };
        }

        let request = ClassifyRequest::from_submission(submission);
        let mode = request.mode();
        let system_prompt = match mode {
            ClassifyMode::Text => TEXT_SYSTEM_PROMPT,
            ClassifyMode::Vision => VISION_SYSTEM_PROMPT,
        };

        match self.classifier.classify(system_prompt, &request, mode) {
            Ok(raw) => verdict::parse(&raw),
            Err(VerifyError::MissingCredential) => {
                eprintln!("warning: no AI API key configured, rejecting proof");
                ProofDecision {
                    approved: false,
                    feedback: KEY_MISSING_FEEDBACK.to_string(),
                }
            }
            Err(e) => {
                eprintln!("warning: AI classification failed: {e}");
                ProofDecision {
                    approved: false,
                    feedback: match mode {
                        ClassifyMode::Text => TEXT_FAILURE_FEEDBACK.to_string(),
                        ClassifyMode::Vision => IMAGE_FAILURE_FEEDBACK.to_string(),
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fake classifier returning a canned response, counting calls.
    struct FakeClassifier {
        response: Result<String, VerifyError>,
        calls: AtomicU32,
    }

    impl FakeClassifier {
        fn ok(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                calls: AtomicU32::new(0),
            }
        }

        fn err(err: VerifyError) -> Self {
            Self {
                response: Err(err),
                calls: AtomicU32::new(0),
            }
        }
    }

    impl Classifier for FakeClassifier {
        fn classify(
            &self,
            _system_prompt: &str,
            _request: &ClassifyRequest<'_>,
            _mode: ClassifyMode,
        ) -> Result<String, VerifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(s) => Ok(s.clone()),
                Err(VerifyError::MissingCredential) => Err(VerifyError::MissingCredential),
                Err(VerifyError::Timeout) => Err(VerifyError::Timeout),
                Err(e) => Err(VerifyError::Http(e.to_string())),
            }
        }
    }

    fn text_submission(text: &str) -> ProofSubmission {
        ProofSubmission {
            text: Some(text.to_string()),
            image: None,
            task_title: "Write weekly report".to_string(),
            task_description: Some("Summarize progress for the team".to_string()),
        }
    }

    fn image_submission() -> ProofSubmission {
        ProofSubmission {
            text: None,
            image: Some(vec![0xff, 0xd8, 0xff, 0xe0]),
            task_title: "Clean the desk".to_string(),
            task_description: None,
        }
    }

    #[test]
    fn long_text_takes_fast_path_without_classifier_call() {
        let classifier = FakeClassifier::err(VerifyError::Timeout);
        let policy = ProofDecisionPolicy::new(classifier);
        let d = policy.decide(&text_submission(
            "I finished the report and sent it to the whole team this morning.",
        ));
        assert!(d.approved);
        assert_eq!(d.feedback, FAST_PATH_FEEDBACK);
        assert_eq!(policy.classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fast_path_threshold_counts_trimmed_chars() {
        // 29 characters after trim: goes to the classifier.
        let classifier = FakeClassifier::ok("REJECT||Too thin");
        let policy = ProofDecisionPolicy::new(classifier);
        let text = format!("   {}   ", "x".repeat(29));
        let d = policy.decide(&text_submission(&text));
        assert!(!d.approved);
        assert_eq!(policy.classifier.calls.load(Ordering::SeqCst), 1);

        // Exactly 30: fast path.
        let classifier = FakeClassifier::err(VerifyError::Timeout);
        let policy = ProofDecisionPolicy::new(classifier);
        let text = format!("   {}   ", "x".repeat(30));
        let d = policy.decide(&text_submission(&text));
        assert!(d.approved);
        assert_eq!(policy.classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn approve_response_is_parsed() {
        let policy = ProofDecisionPolicy::new(FakeClassifier::ok("APPROVE||Looks good"));
        let d = policy.decide(&text_submission("done"));
        assert!(d.approved);
        assert_eq!(d.feedback, "Looks good");
    }

    #[test]
    fn reject_response_is_parsed() {
        let policy = ProofDecisionPolicy::new(FakeClassifier::ok("REJECT||Image unrelated"));
        let d = policy.decide(&image_submission());
        assert!(!d.approved);
        assert_eq!(d.feedback, "Image unrelated");
    }

    #[test]
    fn unstructured_response_fails_closed() {
        let policy = ProofDecisionPolicy::new(FakeClassifier::ok("hard to say really"));
        let d = policy.decide(&text_submission("done"));
        assert!(!d.approved);
        assert_eq!(d.feedback, "hard to say really");
    }

    #[test]
    fn missing_credential_rejects_with_fixed_message() {
        let policy = ProofDecisionPolicy::new(FakeClassifier::err(VerifyError::MissingCredential));
        let d = policy.decide(&text_submission("done"));
        assert!(!d.approved);
        assert_eq!(d.feedback, "AI key missing. Proof rejected.");
    }

    #[test]
    fn transport_failure_rejects_without_leaking_detail() {
        let policy = ProofDecisionPolicy::new(FakeClassifier::err(VerifyError::Http(
            "connection refused to internal-host:443".to_string(),
        )));
        let d = policy.decide(&text_submission("done"));
        assert!(!d.approved);
        assert_eq!(d.feedback, "AI verification failed.");
        assert!(!d.feedback.contains("internal-host"));
    }

    #[test]
    fn vision_failure_uses_image_feedback() {
        let policy = ProofDecisionPolicy::new(FakeClassifier::err(VerifyError::Timeout));
        let d = policy.decide(&image_submission());
        assert!(!d.approved);
        assert_eq!(d.feedback, "AI image verification failed.");
    }

    #[test]
    fn empty_submission_goes_to_classifier() {
        // Callers are expected to pre-validate, but the policy still
        // resolves an empty submission to a decision.
        let policy = ProofDecisionPolicy::new(FakeClassifier::ok("REJECT||No proof provided"));
        let d = policy.decide(&ProofSubmission {
            text: None,
            image: None,
            task_title: "Anything".to_string(),
            task_description: None,
        });
        assert!(!d.approved);
    }
}

//! Parser for the classifier's textual verdict.
//!
//! The AI collaborator is asked to answer in the shape
//!
//! ```text
//! verdict  = decision SEP reason
//! decision = "APPROVE" | "REJECT"   (case-insensitive)
//! SEP      = "||"
//! reason   = free text, at most a couple of sentences
//! ```
//!
//! The response is never trusted to follow the grammar. Splitting
//! happens on the first separator only; a missing separator treats the
//! whole response as the reason and fails closed (approved = false).

use crate::proof::ProofDecision;

const SEPARATOR: &str = "||";
const EMPTY_REASON: &str = "No reason provided.";

/// Parse a raw classifier response into a decision.
pub fn parse(raw: &str) -> ProofDecision {
    match raw.split_once(SEPARATOR) {
        Some((decision, reason)) => {
            let approved = decision.trim().eq_ignore_ascii_case("approve");
            let reason = reason.trim();
            ProofDecision {
                approved,
                feedback: if reason.is_empty() {
                    EMPTY_REASON.to_string()
                } else {
                    reason.to_string()
                },
            }
        }
        None => {
            // No separator: fail closed, keep whatever the model said
            // as the feedback.
            let reason = raw.trim();
            ProofDecision {
                approved: false,
                feedback: if reason.is_empty() {
                    EMPTY_REASON.to_string()
                } else {
                    reason.to_string()
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approve_with_reason() {
        let d = parse("APPROVE||Looks good");
        assert!(d.approved);
        assert_eq!(d.feedback, "Looks good");
    }

    #[test]
    fn reject_with_reason() {
        let d = parse("REJECT||Image unrelated");
        assert!(!d.approved);
        assert_eq!(d.feedback, "Image unrelated");
    }

    #[test]
    fn decision_is_case_insensitive() {
        assert!(parse("approve||ok").approved);
        assert!(parse("ApPrOvE||ok").approved);
        assert!(!parse("Reject||no").approved);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let d = parse("  APPROVE  ||  matches the task  ");
        assert!(d.approved);
        assert_eq!(d.feedback, "matches the task");
    }

    #[test]
    fn missing_separator_fails_closed_with_full_text() {
        let d = parse("This looks like valid proof to me");
        assert!(!d.approved);
        assert_eq!(d.feedback, "This looks like valid proof to me");
    }

    #[test]
    fn bare_approve_without_separator_is_rejected() {
        // Even a literal APPROVE without the separator must not approve.
        let d = parse("APPROVE");
        assert!(!d.approved);
        assert_eq!(d.feedback, "APPROVE");
    }

    #[test]
    fn empty_reason_gets_placeholder() {
        let d = parse("APPROVE||   ");
        assert!(d.approved);
        assert_eq!(d.feedback, "No reason provided.");
    }

    #[test]
    fn empty_response_fails_closed_with_placeholder() {
        let d = parse("");
        assert!(!d.approved);
        assert_eq!(d.feedback, "No reason provided.");
    }

    #[test]
    fn extra_separators_stay_in_the_reason() {
        let d = parse("REJECT||too vague||try again");
        assert!(!d.approved);
        assert_eq!(d.feedback, "too vague||try again");
    }

    #[test]
    fn unknown_decision_token_is_rejection() {
        let d = parse("MAYBE||hard to tell");
        assert!(!d.approved);
        assert_eq!(d.feedback, "hard to tell");
    }
}

//! Task types and the completion flow.
//!
//! A task moves PENDING -> COMPLETED exactly once; points and streak
//! are granted only on that transition. Proof submissions attach a
//! verification record to the task without necessarily completing it.

pub mod flow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task priority.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task lifecycle state.
///
/// Valid transitions:
/// - PENDING → COMPLETED (proof approved, or completed directly)
/// - COMPLETED is terminal; repeating a completion is a no-op and
///   never grants points again
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &TaskStatus) -> bool {
        match self {
            TaskStatus::Pending => matches!(to, TaskStatus::Completed | TaskStatus::Pending),
            TaskStatus::Completed => false, // Terminal state
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Verification state of the proof attached to a task.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProofStatus {
    #[default]
    None,
    Pending,
    Approved,
    Rejected,
}

impl ProofStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofStatus::None => "none",
            ProofStatus::Pending => "pending",
            ProofStatus::Approved => "approved",
            ProofStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(ProofStatus::None),
            "pending" => Some(ProofStatus::Pending),
            "approved" => Some(ProofStatus::Approved),
            "rejected" => Some(ProofStatus::Rejected),
            _ => None,
        }
    }
}

/// Kind of proof attached to a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProofKind {
    Text,
    Image,
}

impl ProofKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofKind::Text => "text",
            ProofKind::Image => "image",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(ProofKind::Text),
            "image" => Some(ProofKind::Image),
            _ => None,
        }
    }
}

/// A tracked task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub profile_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    // Proof-of-completion record
    pub proof_kind: Option<ProofKind>,
    pub proof_text: Option<String>,
    pub proof_path: Option<String>,
    pub proof_status: ProofStatus,
    pub proof_submitted_at: Option<DateTime<Utc>>,
    pub proof_feedback: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_complete() {
        assert!(TaskStatus::Pending.can_transition_to(&TaskStatus::Completed));
    }

    #[test]
    fn completed_is_terminal() {
        assert!(!TaskStatus::Completed.can_transition_to(&TaskStatus::Pending));
        assert!(!TaskStatus::Completed.can_transition_to(&TaskStatus::Completed));
    }

    #[test]
    fn enum_round_trips() {
        for p in ["low", "medium", "high"] {
            assert_eq!(Priority::parse(p).unwrap().as_str(), p);
        }
        for s in ["pending", "completed"] {
            assert_eq!(TaskStatus::parse(s).unwrap().as_str(), s);
        }
        for s in ["none", "pending", "approved", "rejected"] {
            assert_eq!(ProofStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(Priority::parse("urgent").is_none());
        assert!(TaskStatus::parse("done").is_none());
    }
}

//! Completion flow: decision first, ledger second.
//!
//! A proof submission passes through the decision policy; only on
//! approval does the task transition to completed and the streak
//! ledger run. Rejections persist the feedback and leave the task
//! pending. Completing a task directly (no proof required) runs the
//! ledger on the PENDING -> COMPLETED transition only.

use chrono::Utc;

use crate::error::{CoreError, DatabaseError, ValidationError};
use crate::gamification::{CompletionEvent, StreakLedger};
use crate::proof::{ProofDecision, ProofDecisionPolicy, ProofSubmission};
use crate::storage::Database;
use crate::task::{ProofKind, Task, TaskStatus};
use crate::verify::Classifier;

/// Result of submitting proof for a task.
#[derive(Debug)]
pub struct ProofOutcome {
    pub task: Task,
    pub decision: ProofDecision,
}

/// Evaluate a proof submission for a task and apply its consequences.
///
/// `stored_image_path` is where the caller saved the image bytes, for
/// the task's proof record; classification uses the bytes in the
/// submission itself.
pub fn submit_proof<C: Classifier>(
    db: &Database,
    policy: &ProofDecisionPolicy<C>,
    profile_id: i64,
    task_id: i64,
    submission: &ProofSubmission,
    stored_image_path: Option<&str>,
) -> Result<ProofOutcome, CoreError> {
    if submission.is_empty() {
        return Err(ValidationError::EmptyProof.into());
    }

    let task = db
        .get_task(profile_id, task_id)?
        .ok_or(DatabaseError::NotFound {
            entity: "task",
            id: task_id.to_string(),
        })?;

    let decision = policy.decide(submission);

    let kind = if submission.has_image() {
        ProofKind::Image
    } else {
        ProofKind::Text
    };
    db.record_proof(
        task_id,
        kind,
        submission.text.as_deref(),
        stored_image_path,
        &decision,
        Utc::now(),
    )?;

    if decision.approved && task.status.can_transition_to(&TaskStatus::Completed) {
        apply_completion(db, profile_id, task_id)?;
    }

    let task = db
        .get_task(profile_id, task_id)?
        .ok_or(DatabaseError::NotFound {
            entity: "task",
            id: task_id.to_string(),
        })?;

    Ok(ProofOutcome { task, decision })
}

/// Complete a task without proof.
///
/// No-op for an already-completed task: the ledger never runs twice
/// for the same task.
pub fn complete_task(db: &Database, profile_id: i64, task_id: i64) -> Result<Task, CoreError> {
    let task = db
        .get_task(profile_id, task_id)?
        .ok_or(DatabaseError::NotFound {
            entity: "task",
            id: task_id.to_string(),
        })?;

    if task.status.can_transition_to(&TaskStatus::Completed) {
        apply_completion(db, profile_id, task_id)?;
    }

    db.get_task(profile_id, task_id)?
        .ok_or_else(|| {
            CoreError::Database(DatabaseError::NotFound {
                entity: "task",
                id: task_id.to_string(),
            })
        })
}

fn apply_completion(db: &Database, profile_id: i64, task_id: i64) -> Result<(), CoreError> {
    let completed_at = Utc::now();
    db.mark_completed(task_id, completed_at)?;

    let state = db.game_state(profile_id)?;
    let next = StreakLedger::update(&state, CompletionEvent::at(completed_at));
    db.save_game_state(profile_id, &next)?;
    Ok(())
}

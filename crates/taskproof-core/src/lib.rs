//! # Taskproof Core Library
//!
//! This library provides the core business logic for Taskproof, a
//! task tracker with gamified streak/points scoring and AI-assisted
//! proof-of-completion verification. All operations are available via
//! a standalone CLI binary that is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Gamification**: A pure streak/points ledger -- state in,
//!   updated state out, no I/O
//! - **Proof**: The two-tier approve/reject decision policy (fast-path
//!   heuristic plus AI-delegated classification)
//! - **Verify**: The [`Classifier`] trait and the OpenAI-backed
//!   implementation used by the decision policy
//! - **Storage**: SQLite-based task/profile storage and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`StreakLedger`]: Streak and points state machine
//! - [`ProofDecisionPolicy`]: Proof acceptance decision pipeline
//! - [`Database`]: Task, profile and gamification persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod gamification;
pub mod proof;
pub mod storage;
pub mod task;
pub mod verify;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError, VerifyError};
pub use gamification::{CompletionEvent, StreakLedger, UserGameState, POINTS_PER_TASK};
pub use proof::{ProofDecision, ProofDecisionPolicy, ProofSubmission};
pub use storage::{Config, Database};
pub use task::{Priority, ProofStatus, Task, TaskStatus};
pub use verify::{Classifier, ClassifyMode, ClassifyRequest};

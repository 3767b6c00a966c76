//! Task management commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use taskproof_core::storage::Database;
use taskproof_core::task::{flow, Priority};

use crate::common;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Priority: low, medium or high (default: medium)
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Due date (RFC 3339, e.g. 2026-09-01T12:00:00Z)
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks for the active profile
    List,
    /// Get task details
    Get {
        /// Task ID
        id: i64,
    },
    /// Mark a task completed without proof
    Done {
        /// Task ID
        id: i64,
    },
    /// Delete a task
    Rm {
        /// Task ID
        id: i64,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let profile = common::active_profile(&db)?;

    match action {
        TaskAction::Add {
            title,
            description,
            priority,
            due,
        } => {
            let priority = Priority::parse(&priority)
                .ok_or_else(|| format!("invalid priority: {priority}"))?;
            let due_date = due
                .map(|d| {
                    DateTime::parse_from_rfc3339(&d)
                        .map(|dt| dt.with_timezone(&Utc))
                        .map_err(|e| format!("invalid due date: {e}"))
                })
                .transpose()?;
            let id = db.insert_task(profile.id, &title, description.as_deref(), priority, due_date)?;
            let task = db.get_task(profile.id, id)?.ok_or("task vanished after insert")?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List => {
            let tasks = db.list_tasks(profile.id)?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Get { id } => {
            let task = db
                .get_task(profile.id, id)?
                .ok_or_else(|| format!("no such task: {id}"))?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Done { id } => {
            let task = flow::complete_task(&db, profile.id, id)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Rm { id } => {
            if !db.delete_task(profile.id, id)? {
                return Err(format!("no such task: {id}").into());
            }
            eprintln!("Task {id} deleted");
        }
    }
    Ok(())
}

//! Proof submission command.

use clap::Subcommand;
use taskproof_core::proof::{ProofDecisionPolicy, ProofSubmission};
use taskproof_core::storage::{proof_files, Config, Database};
use taskproof_core::task::flow;
use taskproof_core::verify::OpenAiClassifier;

use crate::common;

#[derive(Subcommand)]
pub enum ProofAction {
    /// Submit proof for a task and run verification
    Submit {
        /// Task ID
        id: i64,
        /// Free-text proof
        #[arg(long)]
        text: Option<String>,
        /// Path to a proof image
        #[arg(long)]
        image: Option<String>,
    },
}

pub fn run(action: ProofAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let profile = common::active_profile(&db)?;
    let config = Config::load()?;

    match action {
        ProofAction::Submit { id, text, image } => {
            let task = db
                .get_task(profile.id, id)?
                .ok_or_else(|| format!("no such task: {id}"))?;

            if text.as_deref().map(str::trim).unwrap_or("").is_empty() && image.is_none() {
                return Err("provide --text and/or --image".into());
            }

            // Persist the image before verification so the record
            // survives even a rejected submission.
            let (image_bytes, stored_path) = match image {
                Some(path) => {
                    let bytes = std::fs::read(&path)?;
                    let stored = proof_files::store(&bytes, &path)?;
                    (Some(bytes), Some(stored.to_string_lossy().into_owned()))
                }
                None => (None, None),
            };

            let submission = ProofSubmission {
                text,
                image: image_bytes,
                task_title: task.title.clone(),
                task_description: task.description.clone(),
            };

            let classifier = OpenAiClassifier::new(&config.verifier)?;
            let policy = ProofDecisionPolicy::new(classifier)
                .with_min_text_chars(config.verifier.fast_path_min_chars);

            let outcome = flow::submit_proof(
                &db,
                &policy,
                profile.id,
                id,
                &submission,
                stored_path.as_deref(),
            )?;

            println!("{}", serde_json::to_string_pretty(&outcome.decision)?);
            println!("{}", serde_json::to_string_pretty(&outcome.task)?);
        }
    }
    Ok(())
}

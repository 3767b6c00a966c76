//! End-to-end proof flow tests against a mock AI endpoint.
//!
//! These exercise the real HTTP classifier (mockito standing in for
//! the hosted model), the decision policy, and the completion flow
//! against a real on-disk database.

use taskproof_core::proof::{ProofDecisionPolicy, ProofSubmission};
use taskproof_core::storage::config::VerifierConfig;
use taskproof_core::task::flow;
use taskproof_core::task::TaskStatus;
use taskproof_core::verify::OpenAiClassifier;
use taskproof_core::{Database, Priority, POINTS_PER_TASK};

fn classifier_for(server: &mockito::ServerGuard) -> OpenAiClassifier {
    let config = VerifierConfig {
        api_base: server.url(),
        timeout_secs: 5,
        ..Default::default()
    };
    OpenAiClassifier::new(&config)
        .unwrap()
        .with_api_key("test-key")
}

fn setup_db() -> (tempfile::TempDir, Database, i64, i64) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("test.db")).unwrap();
    let profile = db.create_profile("tester").unwrap();
    let task_id = db
        .insert_task(
            profile.id,
            "Run 5k",
            Some("Around the park"),
            Priority::Medium,
            None,
        )
        .unwrap();
    (dir, db, profile.id, task_id)
}

fn chat_body(content: &str) -> String {
    serde_json::json!({
        "choices": [ { "message": { "role": "assistant", "content": content } } ]
    })
    .to_string()
}

#[test]
fn approved_text_proof_completes_the_task() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body("APPROVE||Looks good"))
        .create();

    let (_dir, db, profile_id, task_id) = setup_db();
    let policy = ProofDecisionPolicy::new(classifier_for(&server));

    let submission = ProofSubmission {
        text: Some("did it".to_string()), // below fast-path threshold
        image: None,
        task_title: "Run 5k".to_string(),
        task_description: Some("Around the park".to_string()),
    };
    let outcome = flow::submit_proof(&db, &policy, profile_id, task_id, &submission, None).unwrap();

    mock.assert();
    assert!(outcome.decision.approved);
    assert_eq!(outcome.decision.feedback, "Looks good");
    assert_eq!(outcome.task.status, TaskStatus::Completed);
    assert_eq!(db.game_state(profile_id).unwrap().total_points, POINTS_PER_TASK);
}

#[test]
fn rejected_vision_proof_stays_pending() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body("REJECT||Image unrelated"))
        .create();

    let (_dir, db, profile_id, task_id) = setup_db();
    let policy = ProofDecisionPolicy::new(classifier_for(&server));

    let submission = ProofSubmission {
        text: None,
        image: Some(vec![0xff, 0xd8, 0xff, 0xe0]),
        task_title: "Run 5k".to_string(),
        task_description: None,
    };
    let outcome = flow::submit_proof(&db, &policy, profile_id, task_id, &submission, None).unwrap();

    mock.assert();
    assert!(!outcome.decision.approved);
    assert_eq!(outcome.decision.feedback, "Image unrelated");
    assert_eq!(outcome.task.status, TaskStatus::Pending);
    assert_eq!(db.game_state(profile_id).unwrap().total_points, 0);
}

#[test]
fn server_error_fails_closed() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("quota exceeded")
        .create();

    let (_dir, db, profile_id, task_id) = setup_db();
    let policy = ProofDecisionPolicy::new(classifier_for(&server));

    let submission = ProofSubmission {
        text: Some("done".to_string()),
        image: None,
        task_title: "Run 5k".to_string(),
        task_description: None,
    };
    let outcome = flow::submit_proof(&db, &policy, profile_id, task_id, &submission, None).unwrap();

    assert!(!outcome.decision.approved);
    assert_eq!(outcome.decision.feedback, "AI verification failed.");
    assert_eq!(outcome.task.status, TaskStatus::Pending);
}

#[test]
fn malformed_body_fails_closed() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"unexpected": true}"#)
        .create();

    let (_dir, db, profile_id, task_id) = setup_db();
    let policy = ProofDecisionPolicy::new(classifier_for(&server));

    let submission = ProofSubmission {
        text: Some("done".to_string()),
        image: None,
        task_title: "Run 5k".to_string(),
        task_description: None,
    };
    let outcome = flow::submit_proof(&db, &policy, profile_id, task_id, &submission, None).unwrap();

    assert!(!outcome.decision.approved);
    assert_eq!(outcome.decision.feedback, "AI verification failed.");
}

#[test]
fn fast_path_never_touches_the_server() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(chat_body("REJECT||should not be called"))
        .expect(0)
        .create();

    let (_dir, db, profile_id, task_id) = setup_db();
    let policy = ProofDecisionPolicy::new(classifier_for(&server));

    let submission = ProofSubmission {
        text: Some("I ran the full five kilometres around the park this morning.".to_string()),
        image: None,
        task_title: "Run 5k".to_string(),
        task_description: None,
    };
    let outcome = flow::submit_proof(&db, &policy, profile_id, task_id, &submission, None).unwrap();

    mock.assert();
    assert!(outcome.decision.approved);
    assert_eq!(
        outcome.decision.feedback,
        "Proof accepted based on detailed text verification."
    );
    assert_eq!(outcome.task.status, TaskStatus::Completed);
}

//! Page-leave guard behavior.

mod common;

use common::{fixture, ok_save};

#[tokio::test]
async fn unload_with_pending_changes_prompts_and_fires_a_last_save() {
    let fix = fixture(None, "", "");
    fix.host.set_content("Hello", "World");
    fix.session.note_input();
    fix.transport.enqueue_save(ok_save("7", 1, "just now"));

    assert!(fix.session.on_unload());
    // The best-effort save runs as a detached task.
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    assert_eq!(fix.transport.save_requests().len(), 1);
    assert_eq!(fix.transport.save_requests()[0].1.body, "World");
}

#[tokio::test]
async fn unload_without_changes_is_silent() {
    let fix = fixture(Some("7"), "Hello", "World");
    assert!(!fix.session.on_unload());
    tokio::task::yield_now().await;
    assert!(fix.transport.save_requests().is_empty());
}

#[tokio::test]
async fn a_completed_save_clears_the_prompt() {
    let fix = fixture(None, "", "");
    fix.host.set_content("Hello", "World");
    fix.session.note_input();
    fix.transport.enqueue_save(ok_save("7", 1, "just now"));

    fix.session
        .save(draftsync_core::SaveKind::Manual)
        .await
        .unwrap();
    assert!(!fix.session.has_unsaved_changes());
    assert!(!fix.session.on_unload());
}

#[tokio::test]
async fn a_form_submission_clears_the_prompt() {
    let fix = fixture(Some("7"), "Hello", "World");
    fix.session.note_input();
    assert!(fix.session.has_unsaved_changes());
    fix.session.form_submitted();
    assert!(!fix.session.on_unload());
    assert!(fix.transport.save_requests().is_empty());
}

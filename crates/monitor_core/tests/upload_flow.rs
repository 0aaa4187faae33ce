use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use monitor_core::{
    update, AppState, Effect, Msg, Severity, UploadOutcome, UploadRequest, NO_FILE_MESSAGE,
    UPLOAD_CREATED_MESSAGE, UPLOAD_FAILED_MESSAGE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(monitor_logging::initialize_for_tests);
}

fn fill_form(state: AppState, file: &str, source: &str, target: &str) -> AppState {
    let (state, _) = update(state, Msg::FileSelected(PathBuf::from(file)));
    let (state, _) = update(state, Msg::SourceLanguageChanged(source.to_string()));
    let (state, _) = update(state, Msg::TargetLanguageChanged(target.to_string()));
    state
}

#[test]
fn submit_emits_one_upload_request() {
    init_logging();
    let state = fill_form(AppState::new(), "doc.pdf", "en", "fr");

    let (state, effects) = update(state, Msg::UploadSubmitted);

    assert_eq!(
        effects,
        vec![Effect::SubmitUpload(UploadRequest {
            file: PathBuf::from("doc.pdf"),
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
        })]
    );
    assert!(state.view().form.submitting);
    assert!(state.in_flight_ids().is_empty());
}

#[test]
fn submit_without_file_sends_nothing() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::UploadSubmitted);

    assert!(effects.is_empty());
    let notes = state.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Error);
    assert_eq!(notes[0].message, NO_FILE_MESSAGE);
}

#[test]
fn accepted_upload_renders_pending_job_and_starts_polling() {
    init_logging();
    let state = fill_form(AppState::new(), "doc.pdf", "en", "fr");
    let (state, _) = update(state, Msg::UploadSubmitted);

    let (mut state, effects) = update(
        state,
        Msg::UploadFinished(UploadOutcome::Accepted { job_id: 42 }),
    );

    assert_eq!(
        effects,
        vec![Effect::SchedulePoll {
            job_id: 42,
            delay: Duration::from_millis(2000),
        }]
    );
    assert_eq!(state.in_flight_ids(), vec![42]);

    let view = state.view();
    assert_eq!(view.jobs.len(), 1);
    assert_eq!(view.jobs[0].element_id, "job-42");
    assert_eq!(view.jobs[0].title, "Job #42");
    assert_eq!(view.jobs[0].badge_label, "Pending");
    assert_eq!(view.jobs[0].badge_class, "status-pending");
    assert_eq!(view.jobs[0].progress_label, "0%");
    assert!(!view.form.submitting);

    let notes = state.take_notifications();
    assert_eq!(notes[0].severity, Severity::Success);
    assert_eq!(notes[0].message, UPLOAD_CREATED_MESSAGE);
}

#[test]
fn accepted_upload_resets_form_to_defaults() {
    init_logging();
    let state = fill_form(AppState::new(), "doc.pdf", "de", "fr");
    let (state, _) = update(state, Msg::UploadSubmitted);
    let (state, _) = update(
        state,
        Msg::UploadFinished(UploadOutcome::Accepted { job_id: 1 }),
    );

    let form = state.form();
    assert_eq!(form.file, None);
    assert_eq!(form.source_language, "en");
    assert_eq!(form.target_language, "es");
}

#[test]
fn rejected_upload_shows_server_message_and_tracks_nothing() {
    init_logging();
    let state = fill_form(AppState::new(), "doc.pdf", "en", "fr");
    let (state, _) = update(state, Msg::UploadSubmitted);

    let (mut state, effects) = update(
        state,
        Msg::UploadFinished(UploadOutcome::Rejected {
            message: "unsupported file type".to_string(),
        }),
    );

    assert!(effects.is_empty());
    assert!(state.in_flight_ids().is_empty());
    assert!(state.view().jobs.is_empty());
    let notes = state.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Error);
    assert_eq!(notes[0].message, "unsupported file type");
    // The form keeps its values so the user can retry.
    assert_eq!(state.form().file, Some(PathBuf::from("doc.pdf")));
}

#[test]
fn transport_failure_shows_generic_message() {
    init_logging();
    let state = fill_form(AppState::new(), "doc.pdf", "en", "fr");
    let (state, _) = update(state, Msg::UploadSubmitted);

    let (mut state, effects) = update(
        state,
        Msg::UploadFinished(UploadOutcome::TransportFailed {
            detail: "connection refused".to_string(),
        }),
    );

    assert!(effects.is_empty());
    assert!(state.in_flight_ids().is_empty());
    let notes = state.take_notifications();
    assert_eq!(notes[0].message, UPLOAD_FAILED_MESSAGE);
    assert!(state.is_idle());
}

#[test]
fn second_upload_does_not_restart_an_active_poll_loop() {
    init_logging();
    let state = fill_form(AppState::new(), "a.docx", "en", "fr");
    let (state, _) = update(state, Msg::UploadSubmitted);
    let (state, first) = update(
        state,
        Msg::UploadFinished(UploadOutcome::Accepted { job_id: 1 }),
    );
    assert_eq!(first.len(), 1);

    let state = fill_form(state, "b.docx", "en", "de");
    let (state, _) = update(state, Msg::UploadSubmitted);
    let (state, second) = update(
        state,
        Msg::UploadFinished(UploadOutcome::Accepted { job_id: 2 }),
    );

    assert_eq!(
        second,
        vec![Effect::SchedulePoll {
            job_id: 2,
            delay: Duration::from_millis(2000),
        }]
    );
    let ids: Vec<_> = state.view().jobs.iter().map(|job| job.job_id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn duplicate_job_id_is_tracked_once() {
    init_logging();
    let state = fill_form(AppState::new(), "a.docx", "en", "fr");
    let (state, _) = update(state, Msg::UploadSubmitted);
    let (state, _) = update(
        state,
        Msg::UploadFinished(UploadOutcome::Accepted { job_id: 5 }),
    );
    let state = fill_form(state, "a.docx", "en", "fr");
    let (state, _) = update(state, Msg::UploadSubmitted);
    let (state, effects) = update(
        state,
        Msg::UploadFinished(UploadOutcome::Accepted { job_id: 5 }),
    );

    assert!(effects.is_empty());
    assert_eq!(state.in_flight_ids(), vec![5]);
    assert_eq!(state.view().jobs.len(), 1);
}

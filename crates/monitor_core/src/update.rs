use monitor_logging::{monitor_debug, monitor_info, monitor_warn};

use crate::{
    AppState, DownloadOutcome, Effect, JobId, JobStatus, Msg, Severity, UploadOutcome,
    UploadRequest,
};

pub const UPLOAD_CREATED_MESSAGE: &str = "Translation job created successfully";
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload document";
pub const NO_FILE_MESSAGE: &str = "Please select a file to upload";
pub const NOT_READY_MESSAGE: &str = "Translation not ready";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download translation";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![state.request_history()],
        Msg::FileSelected(path) => {
            state.form_mut().file = Some(path);
            Vec::new()
        }
        Msg::SourceLanguageChanged(language) => {
            state.form_mut().source_language = language;
            Vec::new()
        }
        Msg::TargetLanguageChanged(language) => {
            state.form_mut().target_language = language;
            Vec::new()
        }
        Msg::UploadSubmitted => {
            let form = state.form().clone();
            match form.file {
                Some(file) => {
                    state.begin_upload();
                    vec![Effect::SubmitUpload(UploadRequest {
                        file,
                        source_language: form.source_language,
                        target_language: form.target_language,
                    })]
                }
                None => {
                    state.notify(Severity::Error, NO_FILE_MESSAGE);
                    Vec::new()
                }
            }
        }
        Msg::UploadFinished(outcome) => {
            state.end_upload();
            match outcome {
                UploadOutcome::Accepted { job_id } => {
                    monitor_info!("Upload accepted job_id={}", job_id);
                    if !state.track(job_id) {
                        monitor_warn!("Job {} is already tracked", job_id);
                    }
                    state.notify(Severity::Success, UPLOAD_CREATED_MESSAGE);
                    state.reset_form();
                    state.render_in_flight()
                }
                UploadOutcome::Rejected { message } => {
                    monitor_info!("Upload rejected: {}", message);
                    state.notify(Severity::Error, message);
                    Vec::new()
                }
                UploadOutcome::TransportFailed { detail } => {
                    monitor_warn!("Upload failed: {}", detail);
                    state.notify(Severity::Error, UPLOAD_FAILED_MESSAGE);
                    Vec::new()
                }
            }
        }
        Msg::StatusReceived { job_id, report } => {
            if !state.is_in_flight(job_id) {
                monitor_debug!("Ignoring status for untracked job {}", job_id);
                return (state, Vec::new());
            }
            monitor_debug!(
                "Job {} status={} progress={:?}",
                job_id,
                report.status.as_wire(),
                report.progress
            );
            state.apply_status(job_id, &report);
            if report.status.is_terminal() {
                finish_job(&mut state, job_id, &report.status)
            } else {
                continue_polling(&mut state, job_id)
            }
        }
        Msg::StatusFailed { job_id, error } => {
            if !state.is_in_flight(job_id) {
                monitor_debug!("Ignoring poll failure for untracked job {}", job_id);
                return (state, Vec::new());
            }
            monitor_warn!("Error polling job {} status: {}", job_id, error);
            continue_polling(&mut state, job_id)
        }
        Msg::HistoryLoaded(records) => {
            state.end_history();
            monitor_debug!("History loaded with {} records", records.len());
            state.replace_history(records);
            Vec::new()
        }
        Msg::HistoryFailed(error) => {
            state.end_history();
            monitor_warn!("Error loading translation history: {}", error);
            Vec::new()
        }
        Msg::DownloadRequested { job_id } => {
            let file_name = state
                .history_record(job_id)
                .filter(|record| record.status == JobStatus::Completed)
                .map(|record| format!("translated_{}", record.original_filename));
            match file_name {
                Some(file_name) => {
                    state.begin_download();
                    vec![Effect::DownloadResult { job_id, file_name }]
                }
                None => {
                    state.notify(Severity::Error, NOT_READY_MESSAGE);
                    Vec::new()
                }
            }
        }
        Msg::DownloadFinished { job_id, outcome } => {
            state.end_download();
            match outcome {
                DownloadOutcome::Saved { path } => {
                    monitor_info!("Job {} saved to {}", job_id, path.display());
                    state.notify(
                        Severity::Success,
                        format!("Saved translation to {}", path.display()),
                    );
                }
                DownloadOutcome::Rejected { message } => {
                    state.notify(Severity::Error, message);
                }
                DownloadOutcome::TransportFailed { detail } => {
                    monitor_warn!("Download of job {} failed: {}", job_id, detail);
                    state.notify(Severity::Error, DOWNLOAD_FAILED_MESSAGE);
                }
            }
            Vec::new()
        }
        Msg::HealthCheckRequested => {
            state.begin_health();
            vec![Effect::CheckHealth]
        }
        Msg::HealthReported(report) => {
            state.end_health();
            if report.healthy {
                state.notify(Severity::Success, "Service healthy");
            } else {
                state.notify(
                    Severity::Error,
                    format!("Service unhealthy: {}", report.detail),
                );
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn finish_job(state: &mut AppState, job_id: JobId, status: &JobStatus) -> Vec<Effect> {
    monitor_info!("Job {} reached terminal status {}", job_id, status.as_wire());
    state.untrack(job_id);
    vec![state.request_history()]
}

/// Schedules the next poll, or drops the job if the policy gave up on it.
fn continue_polling(state: &mut AppState, job_id: JobId) -> Vec<Effect> {
    let Some(attempts) = state.record_attempt(job_id) else {
        return Vec::new();
    };
    let policy = state.policy();
    if policy.is_exhausted(attempts) {
        monitor_warn!("Giving up on job {} after {} polls", job_id, attempts);
        state.untrack(job_id);
        state.notify(
            Severity::Warning,
            format!("Stopped polling job #{job_id} after {attempts} attempts"),
        );
        return vec![state.request_history()];
    }
    state.mark_dirty();
    vec![Effect::SchedulePoll {
        job_id,
        delay: policy.delay_after(attempts),
    }]
}

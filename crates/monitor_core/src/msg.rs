use std::path::PathBuf;

use crate::{HistoryRecord, JobId, StatusReport};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Controller started; loads the initial history.
    Started,
    /// User picked the file to translate.
    FileSelected(PathBuf),
    SourceLanguageChanged(String),
    TargetLanguageChanged(String),
    /// User submitted the upload form.
    UploadSubmitted,
    /// Result of the job-creation request.
    UploadFinished(UploadOutcome),
    /// A poll for `job_id` returned a decoded status.
    StatusReceived { job_id: JobId, report: StatusReport },
    /// A poll for `job_id` failed in transport or decoding.
    StatusFailed { job_id: JobId, error: String },
    HistoryLoaded(Vec<HistoryRecord>),
    HistoryFailed(String),
    /// User asked for the translated result of a job.
    DownloadRequested { job_id: JobId },
    DownloadFinished { job_id: JobId, outcome: DownloadOutcome },
    HealthCheckRequested,
    HealthReported(HealthReport),
    /// Render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted { job_id: JobId },
    /// Server answered with a non-success status and an error message.
    Rejected { message: String },
    /// The request could not be sent, or the response could not be read.
    TransportFailed { detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved { path: PathBuf },
    Rejected { message: String },
    TransportFailed { detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub healthy: bool,
    pub detail: String,
}

use std::path::PathBuf;
use std::time::Duration;

use crate::JobId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue exactly one job-creation request.
    SubmitUpload(UploadRequest),
    /// Fetch the status of `job_id` once `delay` has elapsed.
    SchedulePoll { job_id: JobId, delay: Duration },
    /// Fetch the full history snapshot.
    FetchHistory,
    /// Download the translated result of a completed job.
    DownloadResult { job_id: JobId, file_name: String },
    CheckHealth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: PathBuf,
    pub source_language: String,
    pub target_language: String,
}

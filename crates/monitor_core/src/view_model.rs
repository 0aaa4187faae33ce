use crate::JobId;

/// Element id correlating an in-flight job with its rendered row.
pub fn element_id(job_id: JobId) -> String {
    format!("job-{job_id}")
}

/// Path of the result endpoint for a job.
pub fn download_href(job_id: JobId) -> String {
    format!("/api/jobs/{job_id}/download")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub form: UploadFormView,
    pub in_flight_count: usize,
    pub jobs: Vec<JobStatusView>,
    pub history: Vec<HistoryRowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadFormView {
    pub file: Option<String>,
    pub source_language: String,
    pub target_language: String,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusView {
    pub job_id: JobId,
    pub element_id: String,
    pub title: String,
    pub badge_label: String,
    pub badge_class: String,
    pub progress_percent: u8,
    pub progress_label: String,
    pub message: Option<String>,
    /// Still a member of the in-flight set.
    pub polling: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub job_id: JobId,
    pub filename: String,
    pub language_pair: String,
    pub status_label: String,
    pub badge_class: String,
    pub created_at: String,
    pub download_href: Option<String>,
}

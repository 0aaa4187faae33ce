//! Monitor core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod poll;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, UploadRequest};
pub use msg::{DownloadOutcome, HealthReport, Msg, UploadOutcome};
pub use poll::{Backoff, PollPolicy, DEFAULT_POLL_INTERVAL};
pub use state::{
    progress_update, AppState, FormDefaults, HistoryRecord, JobId, JobStatus, Notification,
    Severity, StatusReport, UploadForm,
};
pub use update::{
    update, DOWNLOAD_FAILED_MESSAGE, NOT_READY_MESSAGE, NO_FILE_MESSAGE, UPLOAD_CREATED_MESSAGE,
    UPLOAD_FAILED_MESSAGE,
};
pub use view_model::{
    download_href, element_id, AppViewModel, HistoryRowView, JobStatusView, UploadFormView,
};

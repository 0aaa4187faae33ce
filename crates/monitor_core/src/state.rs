use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::view_model::{
    download_href, element_id, AppViewModel, HistoryRowView, JobStatusView, UploadFormView,
};
use crate::{Effect, PollPolicy};

pub type JobId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    /// Any status string the client does not know; never terminal.
    Other(String),
}

impl JobStatus {
    /// Parses a wire status. `processing` is the server model's name for `running`.
    pub fn from_wire(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "pending" => JobStatus::Pending,
            "running" | "processing" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Other(trimmed.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Other(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Badge text: the wire status with its first character upper-cased.
    pub fn badge_label(&self) -> String {
        let wire = self.as_wire();
        let mut chars = wire.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn badge_class(&self) -> String {
        format!("status-{}", self.as_wire())
    }
}

/// One decoded `GET /api/jobs/{id}/status` response.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub status: JobStatus,
    pub progress: Option<f64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub id: JobId,
    pub original_filename: String,
    pub source_language: String,
    pub target_language: String,
    pub status: JobStatus,
    /// Status exactly as the server sent it; the history badge shows this.
    pub wire_status: String,
    /// Server timestamp, kept verbatim; localized at render time.
    pub created_at: String,
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Values the upload form returns to after a reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDefaults {
    pub source_language: String,
    pub target_language: String,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "es".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub file: Option<PathBuf>,
    pub source_language: String,
    pub target_language: String,
}

impl UploadForm {
    fn from_defaults(defaults: &FormDefaults) -> Self {
        Self {
            file: None,
            source_language: defaults.source_language.clone(),
            target_language: defaults.target_language.clone(),
        }
    }
}

/// Poll bookkeeping for one member of the in-flight set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PollSlot {
    loop_started: bool,
    attempts: u32,
}

/// What the in-flight panel currently shows for one job.
#[derive(Debug, Clone, PartialEq)]
struct JobElement {
    status: JobStatus,
    progress: u8,
    message: Option<String>,
}

impl JobElement {
    fn fresh() -> Self {
        Self {
            status: JobStatus::Pending,
            progress: 0,
            message: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PendingRequests {
    uploads: usize,
    history: usize,
    downloads: usize,
    health: usize,
}

impl PendingRequests {
    fn is_empty(&self) -> bool {
        self.uploads == 0 && self.history == 0 && self.downloads == 0 && self.health == 0
    }
}

/// Bar value to apply for a reported progress, or `None` to leave the bar alone.
///
/// Missing, zero and NaN progress never update the bar, so a reported `0`
/// cannot clear a higher value shown earlier. Other values are rounded and
/// clamped to `0..=100`.
pub fn progress_update(reported: Option<f64>) -> Option<u8> {
    let value = reported?;
    if value == 0.0 || value.is_nan() {
        return None;
    }
    Some(value.round().clamp(0.0, 100.0) as u8)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    policy: PollPolicy,
    defaults: FormDefaults,
    form: UploadForm,
    in_flight: BTreeMap<JobId, PollSlot>,
    elements: BTreeMap<JobId, JobElement>,
    history: Vec<HistoryRecord>,
    pending: PendingRequests,
    notifications: Vec<Notification>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(PollPolicy::default(), FormDefaults::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(policy: PollPolicy, defaults: FormDefaults) -> Self {
        Self {
            policy,
            form: UploadForm::from_defaults(&defaults),
            defaults,
            in_flight: BTreeMap::new(),
            elements: BTreeMap::new(),
            history: Vec::new(),
            pending: PendingRequests::default(),
            notifications: Vec::new(),
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let jobs = self
            .elements
            .iter()
            .map(|(job_id, element)| JobStatusView {
                job_id: *job_id,
                element_id: element_id(*job_id),
                title: format!("Job #{job_id}"),
                badge_label: element.status.badge_label(),
                badge_class: element.status.badge_class(),
                progress_percent: element.progress,
                progress_label: format!("{}%", element.progress),
                message: element.message.clone(),
                polling: self.in_flight.contains_key(job_id),
            })
            .collect();

        let history = self
            .history
            .iter()
            .map(|record| HistoryRowView {
                job_id: record.id,
                filename: record.original_filename.clone(),
                language_pair: format!(
                    "{} → {}",
                    record.source_language, record.target_language
                ),
                status_label: record.wire_status.clone(),
                badge_class: format!("status-{}", record.wire_status),
                created_at: record.created_at.clone(),
                download_href: (record.status == JobStatus::Completed)
                    .then(|| download_href(record.id)),
            })
            .collect();

        AppViewModel {
            form: UploadFormView {
                file: self
                    .form
                    .file
                    .as_ref()
                    .map(|path| path.display().to_string()),
                source_language: self.form.source_language.clone(),
                target_language: self.form.target_language.clone(),
                submitting: self.pending.uploads > 0,
            },
            in_flight_count: self.in_flight.len(),
            jobs,
            history,
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Drains notifications raised since the last call, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn in_flight_ids(&self) -> Vec<JobId> {
        self.in_flight.keys().copied().collect()
    }

    pub fn is_in_flight(&self, job_id: JobId) -> bool {
        self.in_flight.contains_key(&job_id)
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    /// True once nothing is being polled and no request is outstanding.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty() && self.pending.is_empty()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.notifications.push(Notification {
            severity,
            message: message.into(),
        });
        self.dirty = true;
    }

    pub(crate) fn form_mut(&mut self) -> &mut UploadForm {
        self.dirty = true;
        &mut self.form
    }

    pub(crate) fn reset_form(&mut self) {
        self.form = UploadForm::from_defaults(&self.defaults);
        self.dirty = true;
    }

    pub(crate) fn begin_upload(&mut self) {
        self.pending.uploads += 1;
        self.dirty = true;
    }

    pub(crate) fn end_upload(&mut self) {
        self.pending.uploads = self.pending.uploads.saturating_sub(1);
        self.dirty = true;
    }

    pub(crate) fn request_history(&mut self) -> Effect {
        self.pending.history += 1;
        Effect::FetchHistory
    }

    pub(crate) fn end_history(&mut self) {
        self.pending.history = self.pending.history.saturating_sub(1);
    }

    pub(crate) fn begin_download(&mut self) {
        self.pending.downloads += 1;
    }

    pub(crate) fn end_download(&mut self) {
        self.pending.downloads = self.pending.downloads.saturating_sub(1);
    }

    pub(crate) fn begin_health(&mut self) {
        self.pending.health += 1;
    }

    pub(crate) fn end_health(&mut self) {
        self.pending.health = self.pending.health.saturating_sub(1);
    }

    /// Adds a job to the in-flight set. Returns false if it was already tracked.
    pub(crate) fn track(&mut self, job_id: JobId) -> bool {
        if self.in_flight.contains_key(&job_id) {
            return false;
        }
        self.in_flight.insert(job_id, PollSlot::default());
        true
    }

    /// Rebuilds the in-flight panel from the current set.
    ///
    /// Jobs whose poll loop is already running keep their element and loop;
    /// the rest get a fresh pending element and their first scheduled poll.
    pub(crate) fn render_in_flight(&mut self) -> Vec<Effect> {
        self.elements
            .retain(|job_id, _| self.in_flight.contains_key(job_id));

        let mut effects = Vec::new();
        for (job_id, slot) in self.in_flight.iter_mut() {
            if slot.loop_started {
                continue;
            }
            slot.loop_started = true;
            self.elements.insert(*job_id, JobElement::fresh());
            effects.push(Effect::SchedulePoll {
                job_id: *job_id,
                delay: self.policy.interval,
            });
        }
        self.dirty = true;
        effects
    }

    /// Copies a poll response onto the job's element, if it is still shown.
    pub(crate) fn apply_status(&mut self, job_id: JobId, report: &StatusReport) {
        if let Some(element) = self.elements.get_mut(&job_id) {
            element.status = report.status.clone();
            if let Some(progress) = progress_update(report.progress) {
                element.progress = progress;
            }
            if report.message.is_some() {
                element.message = report.message.clone();
            }
            self.dirty = true;
        }
    }

    /// Counts one finished poll round-trip and returns the new total.
    pub(crate) fn record_attempt(&mut self, job_id: JobId) -> Option<u32> {
        let slot = self.in_flight.get_mut(&job_id)?;
        slot.attempts = slot.attempts.saturating_add(1);
        Some(slot.attempts)
    }

    /// Removes a job from the in-flight set; its element stays until the next rebuild.
    pub(crate) fn untrack(&mut self, job_id: JobId) -> bool {
        let removed = self.in_flight.remove(&job_id).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    pub(crate) fn replace_history(&mut self, records: Vec<HistoryRecord>) {
        self.history = records;
        self.dirty = true;
    }

    pub(crate) fn history_record(&self, job_id: JobId) -> Option<&HistoryRecord> {
        self.history.iter().find(|record| record.id == job_id)
    }
}

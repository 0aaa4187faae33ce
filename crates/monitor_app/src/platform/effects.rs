use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use monitor_client::{
    ApiError, ClientCommand, ClientEvent, ClientHandle, ClientSettings, EventSink, HistoryEntry,
    JobStatusBody,
};
use monitor_core::{
    DownloadOutcome, Effect, HealthReport, HistoryRecord, JobStatus, Msg, StatusReport,
    UploadOutcome,
};
use monitor_logging::{monitor_debug, monitor_info};

/// Executes core effects through the HTTP client.
pub struct EffectRunner {
    client: ClientHandle,
    download_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(
        settings: ClientSettings,
        download_dir: PathBuf,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Result<Self, ApiError> {
        let sink = Arc::new(MsgSink { tx: msg_tx });
        let client = ClientHandle::new(settings, sink)?;
        Ok(Self {
            client,
            download_dir,
        })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.client.send(to_command(effect, &self.download_dir));
        }
    }

    pub fn shutdown(&self) {
        self.client.shutdown();
    }
}

fn to_command(effect: Effect, download_dir: &std::path::Path) -> ClientCommand {
    match effect {
        Effect::SubmitUpload(request) => {
            monitor_info!(
                "SubmitUpload file={} {} -> {}",
                request.file.display(),
                request.source_language,
                request.target_language
            );
            ClientCommand::Upload {
                file: request.file,
                source_language: request.source_language,
                target_language: request.target_language,
            }
        }
        Effect::SchedulePoll { job_id, delay } => {
            monitor_debug!("SchedulePoll job_id={} delay_ms={}", job_id, delay.as_millis());
            ClientCommand::PollStatus { job_id, delay }
        }
        Effect::FetchHistory => ClientCommand::LoadHistory,
        Effect::DownloadResult { job_id, file_name } => ClientCommand::Download {
            job_id,
            dest_dir: download_dir.to_path_buf(),
            file_name,
        },
        Effect::CheckHealth => ClientCommand::CheckHealth,
    }
}

/// Turns client events into messages for the controller loop.
struct MsgSink {
    tx: mpsc::Sender<Msg>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(map_event(event));
    }
}

fn map_event(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::UploadFinished(result) => Msg::UploadFinished(match result {
            Ok(job_id) => UploadOutcome::Accepted { job_id },
            Err(ApiError::Rejected { message, .. }) => UploadOutcome::Rejected { message },
            Err(err) => UploadOutcome::TransportFailed {
                detail: err.to_string(),
            },
        }),
        ClientEvent::StatusFetched { job_id, result } => match result {
            Ok(body) => Msg::StatusReceived {
                job_id,
                report: map_status(body),
            },
            Err(err) => Msg::StatusFailed {
                job_id,
                error: err.to_string(),
            },
        },
        ClientEvent::HistoryFetched(result) => match result {
            Ok(entries) => Msg::HistoryLoaded(entries.into_iter().map(map_history).collect()),
            Err(err) => Msg::HistoryFailed(err.to_string()),
        },
        ClientEvent::DownloadFinished { job_id, result } => Msg::DownloadFinished {
            job_id,
            outcome: match result {
                Ok(path) => DownloadOutcome::Saved { path },
                Err(ApiError::Rejected { message, .. }) => DownloadOutcome::Rejected { message },
                Err(err) => DownloadOutcome::TransportFailed {
                    detail: err.to_string(),
                },
            },
        },
        ClientEvent::HealthChecked(result) => Msg::HealthReported(match result {
            Ok(body) => HealthReport {
                healthy: body.is_healthy(),
                detail: body.status,
            },
            Err(err) => HealthReport {
                healthy: false,
                detail: err.to_string(),
            },
        }),
    }
}

fn map_status(body: JobStatusBody) -> StatusReport {
    StatusReport {
        status: JobStatus::from_wire(&body.status),
        progress: body.progress,
        message: body.message,
    }
}

fn map_history(entry: HistoryEntry) -> HistoryRecord {
    HistoryRecord {
        id: entry.id,
        original_filename: entry.original_filename,
        source_language: entry.source_language,
        target_language: entry.target_language,
        status: JobStatus::from_wire(&entry.status),
        wire_status: entry.status,
        created_at: entry.created_at,
        progress: entry.progress,
    }
}

use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use monitor_logging::{monitor_debug, monitor_info};
use tokio_util::sync::CancellationToken;

use crate::api::{ClientSettings, ReqwestApi, TranslationApi};
use crate::{ApiError, HealthBody, HistoryEntry, JobId, JobStatusBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Upload {
        file: PathBuf,
        source_language: String,
        target_language: String,
    },
    /// Wait `delay`, then fetch the status of `job_id` once.
    PollStatus { job_id: JobId, delay: Duration },
    LoadHistory,
    Download {
        job_id: JobId,
        dest_dir: PathBuf,
        file_name: String,
    },
    CheckHealth,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    UploadFinished(Result<JobId, ApiError>),
    StatusFetched {
        job_id: JobId,
        result: Result<JobStatusBody, ApiError>,
    },
    HistoryFetched(Result<Vec<HistoryEntry>, ApiError>),
    DownloadFinished {
        job_id: JobId,
        result: Result<PathBuf, ApiError>,
    },
    HealthChecked(Result<HealthBody, ApiError>),
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs client commands on a background tokio runtime and reports results to a sink.
///
/// Dropping the handle cancels every scheduled poll and request still outstanding.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    shutdown: CancellationToken,
}

impl ClientHandle {
    pub fn new(settings: ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, ApiError> {
        let api = ReqwestApi::new(&settings)?;
        monitor_info!("Client targeting {}", api.base_url());
        Self::with_api(Arc::new(api), sink)
    }

    pub fn with_api(api: Arc<dyn TranslationApi>, sink: Arc<dyn EventSink>) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|err| ApiError::Io(err.to_string()))?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<ClientCommand>();
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let sink = sink.clone();
                let token = token.clone();
                runtime.spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {}
                        event = handle_command(api.as_ref(), command) => sink.emit(event),
                    }
                });
            }
            monitor_debug!("Client command channel closed");
            token.cancel();
        });

        Ok(Self { cmd_tx, shutdown })
    }

    pub fn send(&self, command: ClientCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for ClientHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_command(api: &dyn TranslationApi, command: ClientCommand) -> ClientEvent {
    match command {
        ClientCommand::Upload {
            file,
            source_language,
            target_language,
        } => ClientEvent::UploadFinished(
            api.upload(&file, &source_language, &target_language).await,
        ),
        ClientCommand::PollStatus { job_id, delay } => {
            tokio::time::sleep(delay).await;
            ClientEvent::StatusFetched {
                job_id,
                result: api.job_status(job_id).await,
            }
        }
        ClientCommand::LoadHistory => ClientEvent::HistoryFetched(api.history().await),
        ClientCommand::Download {
            job_id,
            dest_dir,
            file_name,
        } => ClientEvent::DownloadFinished {
            job_id,
            result: api.download(job_id, &dest_dir, &file_name).await,
        },
        ClientCommand::CheckHealth => ClientEvent::HealthChecked(api.health().await),
    }
}

//! Monitor client: HTTP access to the translation service and effect execution.
mod api;
mod engine;
mod persist;
mod types;

pub use api::{ClientSettings, ReqwestApi, TranslationApi};
pub use engine::{ChannelEventSink, ClientCommand, ClientEvent, ClientHandle, EventSink};
pub use persist::{ensure_output_dir, AtomicFileWriter, PartialFile, PersistError};
pub use types::{ApiError, HealthBody, HistoryEntry, JobId, JobStatusBody, UploadAccepted};

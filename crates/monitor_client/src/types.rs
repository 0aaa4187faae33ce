use serde::{Deserialize, Deserializer};

pub type JobId = u64;

/// Body of a successful `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadAccepted {
    #[serde(deserialize_with = "deserialize_job_id")]
    pub job_id: JobId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of any failed request that carries a server-side reason.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobStatusBody {
    pub status: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryEntry {
    #[serde(deserialize_with = "deserialize_job_id")]
    pub id: JobId,
    pub original_filename: String,
    pub source_language: String,
    pub target_language: String,
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthBody {
    pub status: String,
}

impl HealthBody {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("invalid server url: {0}")]
    InvalidBaseUrl(String),
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("io error: {0}")]
    Io(String),
}

impl ApiError {
    /// True when the server understood the request and refused it with a reason.
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }
}

/// Job ids arrive as integers, but some deployments send numeric strings.
fn deserialize_job_id<'de, D>(deserializer: D) -> Result<JobId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid job id {text:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_body_accepts_numeric_string_ids() {
        let body: UploadAccepted =
            serde_json::from_str(r#"{"job_id":"42","status":"pending"}"#).unwrap();
        assert_eq!(body.job_id, 42);
        assert_eq!(body.status.as_deref(), Some("pending"));

        let err = serde_json::from_str::<UploadAccepted>(r#"{"job_id":"abc"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn status_body_tolerates_null_progress() {
        let body: JobStatusBody =
            serde_json::from_str(r#"{"status":"pending","progress":null,"message":null}"#)
                .unwrap();
        assert_eq!(body.progress, None);
        assert_eq!(body.message, None);
    }

    #[test]
    fn only_rejections_count_as_validation() {
        assert!(ApiError::Rejected {
            status: 400,
            message: "No file provided".into()
        }
        .is_validation());
        assert!(!ApiError::Timeout.is_validation());
        assert!(!ApiError::HttpStatus(500).is_validation());
    }
}

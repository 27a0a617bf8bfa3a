//! Core types for clean-audio
//!
//! Mirrors the subset of the Auphonic JSON API consumed by this tool. All
//! responses arrive wrapped in an envelope object whose `data` field carries
//! the payload.

use serde::{Deserialize, Serialize};

/// Generic response envelope used by every API endpoint
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
    /// The actual payload; absent on some error responses
    pub data: Option<T>,
}

/// A server-stored configuration profile, fetched fresh each run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Preset {
    /// Opaque identifier used when creating a production
    pub uuid: String,
    /// Human-readable name matched exactly against the CLI argument
    pub preset_name: String,
}

/// A remote processing job created by the upload
#[derive(Clone, Debug, Deserialize)]
pub struct Production {
    /// Opaque job identifier; immutable for the rest of the run
    ///
    /// Optional because a malformed creation response may omit it; the
    /// submitter turns that into a distinct fatal error.
    pub uuid: Option<String>,
    /// Title the server recorded for the job
    pub title: Option<String>,
}

/// Production status code as reported by the status endpoint
///
/// The numeric codes are the server's: 1 waiting, 2 processing, 3 done,
/// 4 audio processing, 5 error. Codes outside that set deserialize to
/// [`StatusCode::Unknown`] so new server-side codes never break parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCode {
    /// Queued server-side, not yet started
    Waiting,
    /// Main processing in progress
    Processing,
    /// Terminal success; output files are available
    Done,
    /// Audio-stage processing in progress
    AudioProcessing,
    /// Terminal failure
    Error,
    /// Any code this client does not recognize
    Unknown(i64),
}

impl StatusCode {
    /// Convert the raw integer code to a StatusCode
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => StatusCode::Waiting,
            2 => StatusCode::Processing,
            3 => StatusCode::Done,
            4 => StatusCode::AudioProcessing,
            5 => StatusCode::Error,
            other => StatusCode::Unknown(other),
        }
    }

    /// The raw integer code
    pub fn code(&self) -> i64 {
        match self {
            StatusCode::Waiting => 1,
            StatusCode::Processing => 2,
            StatusCode::Done => 3,
            StatusCode::AudioProcessing => 4,
            StatusCode::Error => 5,
            StatusCode::Unknown(other) => *other,
        }
    }

    /// True for the codes that mean the job is still running
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            StatusCode::Waiting | StatusCode::Processing | StatusCode::AudioProcessing
        )
    }

    /// True for the codes from which no further transition occurs
    pub fn is_terminal(&self) -> bool {
        matches!(self, StatusCode::Done | StatusCode::Error)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StatusCode::Waiting => "waiting",
            StatusCode::Processing => "processing",
            StatusCode::Done => "done",
            StatusCode::AudioProcessing => "audio processing",
            StatusCode::Error => "error",
            StatusCode::Unknown(code) => return write!(f, "unknown ({code})"),
        };
        f.write_str(name)
    }
}

impl<'de> Deserialize<'de> for StatusCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = i64::deserialize(deserializer)?;
        Ok(StatusCode::from_code(code))
    }
}

impl Serialize for StatusCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

/// Payload of the status endpoint
#[derive(Clone, Debug, Deserialize)]
pub struct ProductionStatus {
    /// Current status code
    pub status: StatusCode,
    /// Server-side human-readable status name
    pub status_string: Option<String>,
}

/// One artifact produced by a completed production
///
/// Both fields are optional on the wire; descriptors missing either one are
/// skipped during download rather than failing the batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputFile {
    /// Pre-signed download URL
    pub download_url: Option<String>,
    /// Server-chosen filename for the artifact
    pub filename: Option<String>,
}

/// Full production resource, fetched after a terminal status
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductionDetails {
    /// Artifacts available for download (empty until the job is done)
    #[serde(default)]
    pub output_files: Vec<OutputFile>,
    /// Short error description, present after a failed run
    pub error_summary: Option<String>,
    /// Detailed error description, present after a failed run
    pub error_message: Option<String>,
    /// Non-fatal warnings collected during processing
    pub warning_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_known_values() {
        assert_eq!(StatusCode::from_code(1), StatusCode::Waiting);
        assert_eq!(StatusCode::from_code(2), StatusCode::Processing);
        assert_eq!(StatusCode::from_code(3), StatusCode::Done);
        assert_eq!(StatusCode::from_code(4), StatusCode::AudioProcessing);
        assert_eq!(StatusCode::from_code(5), StatusCode::Error);
        assert_eq!(StatusCode::from_code(9), StatusCode::Unknown(9));
    }

    #[test]
    fn status_code_round_trips_unknown() {
        let parsed: StatusCode = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, StatusCode::Unknown(42));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "42");
    }

    #[test]
    fn status_predicates() {
        assert!(StatusCode::Waiting.is_in_progress());
        assert!(StatusCode::AudioProcessing.is_in_progress());
        assert!(!StatusCode::Done.is_in_progress());
        assert!(StatusCode::Done.is_terminal());
        assert!(StatusCode::Error.is_terminal());
        assert!(!StatusCode::Unknown(7).is_terminal());
        assert!(!StatusCode::Unknown(7).is_in_progress());
    }

    #[test]
    fn status_payload_deserializes() {
        let json = r#"{"status": 2, "status_string": "Processing"}"#;
        let status: ProductionStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.status, StatusCode::Processing);
        assert_eq!(status.status_string.as_deref(), Some("Processing"));
    }

    #[test]
    fn details_default_to_empty_outputs() {
        let details: ProductionDetails = serde_json::from_str("{}").unwrap();
        assert!(details.output_files.is_empty());
        assert!(details.error_summary.is_none());
    }

    #[test]
    fn envelope_tolerates_missing_data() {
        let envelope: Envelope<Production> = serde_json::from_str("{}").unwrap();
        assert!(envelope.data.is_none());
    }
}

use crate::device_snapshot::DeviceKind;
use thiserror::Error;

/// Everything that can go wrong between the vendor API and the registry.
///
/// Transport and decode failures abort one device kind's contribution to a
/// collection pass; they are only fatal during the startup sanity poll.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("missing configuration: {0} is not set")]
    Config(&'static str),
    #[error("transport error: {0}")]
    Transport(#[from] diqwest::error::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode {kind} status response: {source}")]
    Decode {
        kind: DeviceKind,
        source: reqwest::Error,
    },
    #[error("device poll task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

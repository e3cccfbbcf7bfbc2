// src/attendance/decoder.rs

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use super::camera::MediaStream;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The stream stopped before anything was read.
    StreamEnded,
    Unreadable(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::StreamEnded => write!(f, "camera stream ended"),
            DecodeError::Unreadable(reason) => write!(f, "barcode unreadable: {}", reason),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Reads a barcode from a live camera stream.
#[async_trait]
pub trait BarcodeDecoder: Send + Sync {
    async fn decode(&self, stream: &MediaStream) -> Result<String, DecodeError>;
}

/// Simulated decoder: waits a fixed delay and then reports a fixed payload.
///
/// No frames are inspected. A real decoder that reads frames until it finds
/// a code can replace it behind [`BarcodeDecoder`].
#[derive(Debug, Clone)]
pub struct SimulatedDecoder {
    delay: Duration,
    payload: String,
}

impl SimulatedDecoder {
    pub const PAYLOAD: &'static str = "SIMULATED-SCAN";

    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            payload: Self::PAYLOAD.to_string(),
        }
    }
}

#[async_trait]
impl BarcodeDecoder for SimulatedDecoder {
    async fn decode(&self, stream: &MediaStream) -> Result<String, DecodeError> {
        tokio::time::sleep(self.delay).await;
        if !stream.is_active() {
            return Err(DecodeError::StreamEnded);
        }
        Ok(self.payload.clone())
    }
}

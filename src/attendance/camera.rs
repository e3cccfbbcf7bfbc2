// src/attendance/camera.rs

//! Camera access for scanning.
//!
//! A [`MediaStream`] holds the device until every track is stopped.
//! [`CameraLease`] owns a stream for the duration of one scan and stops it
//! when dropped, whichever way the scan ends.

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Rear camera, pointed at the barcode.
    Environment,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    PermissionDenied,
    /// Another stream still holds the device.
    Busy,
    Unavailable(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::PermissionDenied => write!(f, "camera permission denied"),
            CameraError::Busy => write!(f, "camera is in use"),
            CameraError::Unavailable(reason) => write!(f, "camera unavailable: {}", reason),
        }
    }
}

impl std::error::Error for CameraError {}

/// One video track. Clones share the live flag.
#[derive(Debug, Clone)]
pub struct MediaTrack {
    id: String,
    live: Arc<AtomicBool>,
}

impl MediaTrack {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct MediaStream {
    tracks: Vec<MediaTrack>,
}

impl MediaStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn is_active(&self) -> bool {
        self.tracks.iter().any(MediaTrack::is_live)
    }

    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}

#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Opens a stream for `holder`, the client the scan runs for.
    async fn acquire(&self, holder: &str, facing: Facing) -> Result<MediaStream, CameraError>;
}

/// A stream that is stopped when the lease goes out of scope.
#[derive(Debug)]
pub struct CameraLease {
    stream: MediaStream,
}

impl CameraLease {
    pub fn new(stream: MediaStream) -> Self {
        Self { stream }
    }
}

impl Deref for CameraLease {
    type Target = MediaStream;

    fn deref(&self) -> &MediaStream {
        &self.stream
    }
}

impl Drop for CameraLease {
    fn drop(&mut self) {
        self.stream.stop_all();
        for track in &self.stream.tracks {
            tracing::debug!("Camera track {} released", track.id());
        }
    }
}

/// In-process camera used by the server and in tests.
///
/// Grants or denies access according to its permission flag. Each holder
/// gets its own device: a second stream for the same holder is refused while
/// the first is live, other holders are unaffected.
#[derive(Debug)]
pub struct VirtualCamera {
    granted: AtomicBool,
    issued: Mutex<Vec<(String, MediaTrack)>>,
}

impl VirtualCamera {
    pub fn new(granted: bool) -> Self {
        Self {
            granted: AtomicBool::new(granted),
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn set_permission(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    /// Tracks handed out that have not been stopped.
    pub fn live_tracks(&self) -> usize {
        self.issued_tracks().iter().filter(|t| t.is_live()).count()
    }

    pub fn issued_tracks(&self) -> Vec<MediaTrack> {
        let issued = match self.issued.lock() {
            Ok(issued) => issued,
            Err(poisoned) => poisoned.into_inner(),
        };
        issued.iter().map(|(_, track)| track.clone()).collect()
    }
}

#[async_trait]
impl CameraDevice for VirtualCamera {
    async fn acquire(&self, holder: &str, facing: Facing) -> Result<MediaStream, CameraError> {
        if !self.granted.load(Ordering::SeqCst) {
            return Err(CameraError::PermissionDenied);
        }

        let mut issued = match self.issued.lock() {
            Ok(issued) => issued,
            Err(poisoned) => poisoned.into_inner(),
        };
        if issued
            .iter()
            .any(|(owner, track)| owner == holder && track.is_live())
        {
            return Err(CameraError::Busy);
        }
        issued.retain(|(_, track)| track.is_live());

        let label = match facing {
            Facing::Environment => "environment",
            Facing::User => "user",
        };
        let track = MediaTrack::new(format!("{}-{}", label, uuid::Uuid::new_v4().simple()));
        issued.push((holder.to_string(), track.clone()));

        Ok(MediaStream::new(vec![track]))
    }
}

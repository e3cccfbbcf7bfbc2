// src/attendance/mod.rs

//! Barcode check-in.
//!
//! One [`AttendanceWorkflow`] lives for one visit to the attendance view:
//! it loads the student's history when mounted, and a scan moves it
//! `Idle -> Scanning -> Success | Error`. `Error` goes back to `Idle` on
//! retry; `Success` is final for the visit.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;

use crate::config::ATTENDANCE_HISTORY_LIMIT;
use crate::models::attendance::{AttendanceFilter, AttendanceRecord, NewAttendance};
use crate::repository::Repository;
use crate::session::StudentIdentity;

pub mod camera;
pub mod clock;
pub mod decoder;

use camera::{CameraDevice, CameraError, CameraLease, Facing};
use clock::{Clock, classify_arrival, date_key, time_key};
use decoder::BarcodeDecoder;

/// Camera holder for a visit without a student identity.
const GUEST_HOLDER: &str = "guest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    PermissionDenied,
    CameraBusy,
    CameraUnavailable(String),
    Decode(String),
    /// No student identity to record against.
    MissingStudent,
    Persistence(String),
}

impl ScanError {
    /// Message shown to the student.
    pub fn message(&self) -> &'static str {
        match self {
            ScanError::PermissionDenied => {
                "Tidak dapat mengakses kamera. Pastikan izin kamera diberikan."
            }
            ScanError::CameraBusy => {
                "Kamera sedang digunakan. Tutup pemindaian lain lalu coba lagi."
            }
            ScanError::CameraUnavailable(_) => "Kamera tidak tersedia.",
            ScanError::Decode(_) => "Barcode tidak terbaca. Silakan coba lagi.",
            ScanError::MissingStudent => "Data siswa tidak ditemukan",
            ScanError::Persistence(_) => "Gagal mencatat absensi. Silakan coba lagi.",
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::CameraUnavailable(detail)
            | ScanError::Decode(detail)
            | ScanError::Persistence(detail) => write!(f, "{} ({})", self.message(), detail),
            _ => f.write_str(self.message()),
        }
    }
}

impl From<CameraError> for ScanError {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::PermissionDenied => ScanError::PermissionDenied,
            CameraError::Busy => ScanError::CameraBusy,
            CameraError::Unavailable(reason) => ScanError::CameraUnavailable(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    Success,
    Error(ScanError),
}

impl ScanState {
    /// Whether the state machine permits moving to `next`.
    pub fn allows(&self, next: &ScanState) -> bool {
        matches!(
            (self, next),
            (ScanState::Idle, ScanState::Scanning)
                | (ScanState::Scanning, ScanState::Success)
                | (ScanState::Scanning, ScanState::Error(_))
                | (ScanState::Scanning, ScanState::Idle)
                | (ScanState::Error(_), ScanState::Idle)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Recorded(AttendanceRecord),
    /// Today's record already exists; no scan was started.
    AlreadyCheckedIn(AttendanceRecord),
    /// Stopped before anything was written.
    Cancelled,
    Failed(ScanError),
}

/// Devices and time source a scan runs against.
#[derive(Clone)]
pub struct ScanDevices {
    pub camera: Arc<dyn CameraDevice>,
    pub decoder: Arc<dyn BarcodeDecoder>,
    pub clock: Arc<dyn Clock>,
}

pub struct AttendanceWorkflow {
    repo: Repository,
    devices: ScanDevices,
    student: Option<StudentIdentity>,
    state: ScanState,
    history: Vec<AttendanceRecord>,
    today: Option<AttendanceRecord>,
}

impl AttendanceWorkflow {
    /// Opens the view: loads the student's recent history and today's entry.
    ///
    /// A failed history read is logged and leaves the history empty.
    pub async fn mount(
        repo: Repository,
        devices: ScanDevices,
        student: Option<StudentIdentity>,
    ) -> Self {
        let mut workflow = Self {
            repo,
            devices,
            student,
            state: ScanState::Idle,
            history: Vec::new(),
            today: None,
        };
        if let Err(e) = workflow.refresh_history().await {
            tracing::error!("Failed to load attendance history: {}", e);
        }
        workflow
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn history(&self) -> &[AttendanceRecord] {
        &self.history
    }

    pub fn today(&self) -> Option<&AttendanceRecord> {
        self.today.as_ref()
    }

    /// The scan control is only offered until today's record exists.
    pub fn can_scan(&self) -> bool {
        self.today.is_none() && matches!(self.state, ScanState::Idle | ScanState::Error(_))
    }

    /// `Error -> Idle`.
    pub fn retry(&mut self) {
        if matches!(self.state, ScanState::Error(_)) {
            self.transition(ScanState::Idle);
        }
    }

    pub async fn scan(&mut self) -> ScanOutcome {
        self.scan_until(std::future::pending::<()>()).await
    }

    /// Runs one scan, abandoning it if `cancel` completes first.
    ///
    /// The camera is held only while scanning and is released on every
    /// exit, including when this future is dropped part way.
    pub async fn scan_until<F>(&mut self, cancel: F) -> ScanOutcome
    where
        F: Future<Output = ()>,
    {
        if let Some(today) = &self.today {
            return ScanOutcome::AlreadyCheckedIn(today.clone());
        }
        // Scanning again after an error is the retry.
        self.retry();
        if self.state != ScanState::Idle {
            tracing::warn!("Scan requested in state {:?}", self.state);
            return ScanOutcome::Cancelled;
        }

        self.transition(ScanState::Scanning);

        let holder = self
            .student
            .as_ref()
            .map_or(GUEST_HOLDER, |s| s.student_id.as_str());
        let stream = match self.devices.camera.acquire(holder, Facing::Environment).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("Camera acquisition failed: {}", e);
                return self.fail(e.into());
            }
        };
        let lease = CameraLease::new(stream);

        let decoded = tokio::select! {
            _ = cancel => None,
            result = self.devices.decoder.decode(&lease) => Some(result),
        };
        drop(lease);

        let payload = match decoded {
            None => {
                tracing::info!("Scan cancelled");
                self.transition(ScanState::Idle);
                return ScanOutcome::Cancelled;
            }
            Some(Err(e)) => return self.fail(ScanError::Decode(e.to_string())),
            Some(Ok(payload)) => payload,
        };
        tracing::debug!("Decoded barcode payload {:?}", payload);

        let Some(student) = self.student.clone() else {
            return self.fail(ScanError::MissingStudent);
        };

        let now = self.devices.clock.now();
        let data = NewAttendance {
            student_id: student.student_id.clone(),
            student_name: student.name.clone(),
            date: date_key(&now),
            time: time_key(&now),
            status: classify_arrival(now.time()),
            notes: None,
        };

        let id = match self.repo.create_attendance(data.clone()).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Failed to record attendance: {}", e);
                return self.fail(ScanError::Persistence(e.to_string()));
            }
        };

        tracing::info!(
            "Attendance recorded for {} on {} at {} ({})",
            student.student_id,
            data.date,
            data.time,
            data.status
        );
        self.transition(ScanState::Success);

        if let Err(e) = self.refresh_history().await {
            tracing::warn!("Failed to refresh attendance history: {}", e);
        }

        let record = match &self.today {
            Some(today) if today.id == id => today.clone(),
            _ => {
                let record = AttendanceRecord {
                    id,
                    student_id: data.student_id,
                    student_name: data.student_name,
                    date: data.date,
                    time: data.time,
                    status: data.status,
                    notes: data.notes,
                    created_at: Utc::now(),
                };
                if self.today.is_none() {
                    self.history.insert(0, record.clone());
                    self.today = Some(record.clone());
                }
                record
            }
        };

        ScanOutcome::Recorded(record)
    }

    async fn refresh_history(&mut self) -> Result<(), crate::repository::RepoError> {
        let Some(student) = &self.student else {
            return Ok(());
        };

        let history = self
            .repo
            .list_attendance(&AttendanceFilter {
                student_id: Some(student.student_id.clone()),
                date: None,
                limit: Some(ATTENDANCE_HISTORY_LIMIT),
            })
            .await?;

        let today = date_key(&self.devices.clock.now());
        self.today = history.iter().find(|r| r.date == today).cloned();
        self.history = history;
        Ok(())
    }

    fn fail(&mut self, error: ScanError) -> ScanOutcome {
        self.transition(ScanState::Error(error.clone()));
        ScanOutcome::Failed(error)
    }

    fn transition(&mut self, next: ScanState) {
        debug_assert!(
            self.state.allows(&next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }
}

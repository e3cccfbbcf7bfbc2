use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;

use crate::attendance::{
    ScanDevices,
    camera::VirtualCamera,
    clock::{Clock, SystemClock},
    decoder::SimulatedDecoder,
};
use crate::config::Config;
use crate::repository::Repository;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub config: Config,
    pub sessions: SessionStore,
    pub devices: ScanDevices,
}

impl AppState {
    /// Wires the default devices: the virtual camera, the simulated decoder
    /// and the host clock.
    pub fn new(repo: Repository, config: Config) -> Self {
        let devices = ScanDevices {
            camera: Arc::new(VirtualCamera::new(config.camera_available)),
            decoder: Arc::new(SimulatedDecoder::new(Duration::from_millis(
                config.scan_delay_ms,
            ))),
            clock: Arc::new(SystemClock),
        };
        Self::with_devices(repo, config, devices)
    }

    pub fn with_devices(repo: Repository, config: Config, devices: ScanDevices) -> Self {
        let sessions = SessionStore::new(&config.jwt_secret, config.jwt_expiration);
        Self {
            repo,
            config,
            sessions,
            devices,
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.devices.clock.as_ref()
    }
}

impl FromRef<AppState> for Repository {
    fn from_ref(state: &AppState) -> Self {
        state.repo.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

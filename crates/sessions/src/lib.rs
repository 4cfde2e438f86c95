//! Per-browser-session state for the authorization flow.
//!
//! Each session is keyed by an opaque id carried in a cookie and holds the
//! access token obtained by that session's flow together with the device
//! directory fetched with it. Nothing here is process-global: two browsers
//! running the flow at once see only their own devices.

use {
    dashmap::DashMap,
    hcauth_appliances::{Appliance, DeviceDirectory},
    secrecy::{ExposeSecret, SecretString},
    tracing::debug,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("no authorization flow for this browser session")]
    UnknownSession,
    #[error("device {0} was not listed in this authorization flow")]
    UnknownDevice(String),
}

struct FlowSession {
    token: SecretString,
    devices: DeviceDirectory,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, FlowSession>,
}

/// Fresh random session id.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly exchanged token, replacing anything the session held.
    pub fn store_token(&self, session_id: &str, token: SecretString) {
        self.sessions.insert(session_id.to_string(), FlowSession {
            token,
            devices: DeviceDirectory::default(),
        });
        debug!(sessions = self.sessions.len(), "session authorized");
    }

    /// Attach the device directory fetched for this session's flow.
    pub fn set_devices(
        &self,
        session_id: &str,
        devices: DeviceDirectory,
    ) -> Result<(), LookupError> {
        let mut session = self
            .sessions
            .get_mut(session_id)
            .ok_or(LookupError::UnknownSession)?;
        session.devices = devices;
        Ok(())
    }

    /// The token stored for a session, if it completed an authorization.
    pub fn current_token(&self, session_id: &str) -> Option<SecretString> {
        self.sessions
            .get(session_id)
            .map(|s| SecretString::new(s.token.expose_secret().clone()))
    }

    pub fn lookup_device(&self, session_id: &str, ha_id: &str) -> Result<Appliance, LookupError> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or(LookupError::UnknownSession)?;
        session
            .devices
            .get(ha_id)
            .cloned()
            .ok_or_else(|| LookupError::UnknownDevice(ha_id.to_string()))
    }

    /// Drop a session. Returns whether one existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// src/core/store.rs — In-memory session registry with TTL and upload cleanup

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::session::Session;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared handle to a registered session.
///
/// The async mutex serializes propose/revise on one session; the store's own
/// lock is never held while a session is generating.
pub type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

struct Entry {
    session: SessionHandle,
    expires_at: Instant,
    uploads: Vec<PathBuf>,
}

/// Sessions keyed by id. Every access goes through one mutex.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a session, replacing any entry under the same id.
    pub fn set(&self, id: impl Into<String>, session: Session) -> SessionHandle {
        let handle = Arc::new(tokio::sync::Mutex::new(session));
        let mut map = self.lock();
        if let Some(old) = map.insert(
            id.into(),
            Entry {
                session: handle.clone(),
                expires_at: Instant::now() + self.ttl,
                uploads: Vec::new(),
            },
        ) {
            remove_uploads(&old.uploads);
        }
        handle
    }

    /// Look up a live session and extend its TTL.
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        let mut map = self.lock();
        purge_locked(&mut map, Instant::now());
        let entry = map.get_mut(id)?;
        entry.expires_at = Instant::now() + self.ttl;
        Some(entry.session.clone())
    }

    /// Refresh the TTL without touching the session. False when absent.
    pub fn heartbeat(&self, id: &str) -> bool {
        let mut map = self.lock();
        purge_locked(&mut map, Instant::now());
        match map.get_mut(id) {
            Some(entry) => {
                entry.expires_at = Instant::now() + self.ttl;
                true
            }
            None => false,
        }
    }

    /// Link an uploaded file to a session so it is removed with it.
    pub fn add_upload(&self, id: &str, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if id.is_empty() || path.as_os_str().is_empty() {
            return false;
        }
        let mut map = self.lock();
        match map.get_mut(id) {
            Some(entry) => {
                entry.uploads.push(path.to_path_buf());
                true
            }
            None => false,
        }
    }

    /// Drop a session and unlink its uploads. Returns whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        let mut map = self.lock();
        match map.remove(id) {
            Some(entry) => {
                remove_uploads(&entry.uploads);
                tracing::debug!(session = id, "session deleted");
                true
            }
            None => false,
        }
    }

    /// Remove every expired entry. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let mut map = self.lock();
        purge_locked(&mut map, Instant::now())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Periodically purge expired sessions until `cancel` fires.
    pub fn spawn_sweeper(&self, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("session sweeper stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        let purged = store.purge_expired();
                        if purged > 0 {
                            tracing::info!(purged, "expired sessions purged");
                        }
                    }
                }
            }
        })
    }
}

fn purge_locked(map: &mut HashMap<String, Entry>, now: Instant) -> usize {
    let before = map.len();
    map.retain(|id, entry| {
        if entry.expires_at > now {
            return true;
        }
        tracing::debug!(session = %id, "session expired");
        remove_uploads(&entry.uploads);
        false
    });
    before - map.len()
}

/// Best-effort: failures are logged, never returned.
fn remove_uploads(paths: &[PathBuf]) {
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!("removed upload {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("failed to remove upload {}: {e}", path.display()),
        }
    }
}

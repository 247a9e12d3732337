use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    Online,
    Offline,
}

/// Shared view of whether the remote store is in use.
///
/// Every mirror holds a clone. Once offline, the process stays offline and
/// the in-memory mirrors are the only state.
#[derive(Clone)]
pub struct Backend {
    pool: Option<PgPool>,
    offline: Arc<AtomicBool>,
}

impl Backend {
    pub fn remote(pool: PgPool) -> Self {
        Self {
            pool: Some(pool),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// No remote store at all; starts offline.
    pub fn demo() -> Self {
        Self {
            pool: None,
            offline: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.pool.is_none() || self.offline.load(Ordering::SeqCst)
    }

    pub fn mode(&self) -> ConnectionMode {
        if self.is_offline() {
            ConnectionMode::Offline
        } else {
            ConnectionMode::Online
        }
    }

    pub fn go_offline(&self, reason: &str) {
        if !self.offline.swap(true, Ordering::SeqCst) {
            log::warn!("Switching to offline mode: {}", reason);
        }
    }

    /// The remote pool, or `None` when local state is the only state.
    pub fn pool(&self) -> Option<&PgPool> {
        if self.is_offline() {
            None
        } else {
            self.pool.as_ref()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_backend_is_offline_without_pool() {
        let backend = Backend::demo();
        assert!(backend.is_offline());
        assert!(backend.pool().is_none());
        assert_eq!(backend.mode(), ConnectionMode::Offline);
    }

    #[test]
    fn going_offline_is_shared_between_clones() {
        let backend = Backend::demo();
        let clone = backend.clone();
        clone.go_offline("test");
        assert!(backend.is_offline());
    }
}

//! Per-application deployment lock
//!
//! Deployments of one application share its working tree, so only one may
//! run at a time. A second request is refused rather than queued.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Set of applications with a deployment in flight
#[derive(Debug, Clone, Default)]
pub struct DeployLocks {
    active: Arc<Mutex<HashSet<String>>>,
}

/// Held for the lifetime of one deployment; releases the application on drop
#[derive(Debug)]
pub struct DeployGuard {
    active: Arc<Mutex<HashSet<String>>>,
    app: String,
}

impl DeployLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `app`, or None when a deployment of it is already running
    pub fn try_acquire(&self, app: &str) -> Option<DeployGuard> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(app.to_string()) {
            debug!("{} is already being deployed", app);
            return None;
        }
        Some(DeployGuard {
            active: self.active.clone(),
            app: app.to_string(),
        })
    }

    #[cfg(test)]
    fn is_locked(&self, app: &str) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(app)
    }
}

impl DeployGuard {
    pub fn app(&self) -> &str {
        &self.app
    }
}

impl Drop for DeployGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.app);
    }
}

//! Process-wide connectivity state.

use std::sync::Arc;

use tokio::sync::watch;

/// Online/offline flag shared by every client clone. Online by default; the
/// embedding application flips it from its own reachability probes. Mutating
/// calls consult the flag before dispatch and fail fast while offline.
#[derive(Debug, Clone)]
pub struct Connectivity {
    tx: Arc<watch::Sender<bool>>,
}

impl Connectivity {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(true);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn set_online(&self, online: bool) {
        self.tx.send_replace(online);
    }

    /// Watch for transitions, e.g. to invalidate caches on reconnect.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new()
    }
}

use crate::storage::{self, Storage, RESCUE_MODE_KEY, RESCUE_STARTED_KEY};
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RescueMode {
    Normal,
    Rescue { since_ms: f64 },
}

type Listener = Box<dyn FnMut(RescueMode)>;

/// The one copy of the rescue flag. Every change is written through to storage
/// and pushed to subscribers, so the UI never has to poll.
pub struct RescueState {
    mode: RescueMode,
    listeners: Vec<Listener>,
}

impl RescueState {
    pub fn new() -> Self {
        RescueState {
            mode: RescueMode::Normal,
            listeners: Vec::new(),
        }
    }

    /// Reads the persisted flag. A rescue flag without a usable start time is
    /// dated `now_ms` and the repaired record is saved back.
    pub fn restore(storage: &mut dyn Storage, now_ms: f64) -> Self {
        let active: bool = storage::load(storage, RESCUE_MODE_KEY).unwrap_or(false);
        let mut state = Self::new();
        if active {
            let stored: Option<f64> = storage::load(storage, RESCUE_STARTED_KEY);
            let since_ms = match stored {
                Some(t) if t.is_finite() && t > 0.0 && t <= now_ms => t,
                _ => {
                    warn!("rescue: missing or invalid start time, using load time");
                    storage::save(storage, RESCUE_STARTED_KEY, &now_ms);
                    now_ms
                }
            };
            state.mode = RescueMode::Rescue { since_ms };
        }
        state
    }

    pub fn mode(&self) -> RescueMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        matches!(self.mode, RescueMode::Rescue { .. })
    }

    pub fn started_at(&self) -> Option<f64> {
        match self.mode {
            RescueMode::Rescue { since_ms } => Some(since_ms),
            RescueMode::Normal => None,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(RescueMode) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// NORMAL -> RESCUE. Returns false if already in rescue mode.
    pub fn enter(&mut self, now_ms: f64, storage: &mut dyn Storage) -> bool {
        if self.is_active() {
            return false;
        }
        info!("rescue: entering rescue mode");
        self.mode = RescueMode::Rescue { since_ms: now_ms };
        storage::save(storage, RESCUE_MODE_KEY, &true);
        storage::save(storage, RESCUE_STARTED_KEY, &now_ms);
        self.publish();
        true
    }

    /// RESCUE -> NORMAL. Returns when rescue mode started, or `None` if it was not active.
    pub fn leave(&mut self, storage: &mut dyn Storage) -> Option<f64> {
        let since_ms = self.started_at()?;
        info!("rescue: leaving rescue mode");
        self.mode = RescueMode::Normal;
        storage::save(storage, RESCUE_MODE_KEY, &false);
        storage::remove(storage, RESCUE_STARTED_KEY);
        self.publish();
        Some(since_ms)
    }

    fn publish(&mut self) {
        let mode = self.mode;
        for listener in self.listeners.iter_mut() {
            listener(mode);
        }
    }
}

impl Default for RescueState {
    fn default() -> Self {
        Self::new()
    }
}

//! Session state machine for the assistant.
//!
//! All mutable session state lives behind a single [`StateHandle`]; every
//! mutation goes through it and publishes the resulting snapshot on a
//! broadcast channel so state subscribers (`/ws/state`) can re-broadcast it.
//!
//! Invariant: the assistant can only be awake while the safety interlock is
//! enabled. Disabling safety or the wake word forces the sleep reset.

use crate::error::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;

/// Capacity of the state-update broadcast channel.
const UPDATE_CAPACITY: usize = 32;

/// Persona selector. Changes the generated instructions only, never the
/// action vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantMode {
    #[default]
    Butler,
    Demo,
    Copilot,
    Companion,
}

impl AssistantMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Butler => "butler",
            Self::Demo => "demo",
            Self::Copilot => "copilot",
            Self::Companion => "companion",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "butler" => Some(Self::Butler),
            "demo" => Some(Self::Demo),
            "copilot" => Some(Self::Copilot),
            "companion" => Some(Self::Companion),
            _ => None,
        }
    }
}

/// Full session state, returned by every transition and serialized on the
/// HTTP/WS surface in camelCase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub is_awake: bool,
    pub is_listening: bool,
    pub wake_word_enabled: bool,
    pub safety_enabled: bool,
    pub mode: AssistantMode,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            is_awake: false,
            is_listening: false,
            wake_word_enabled: false,
            safety_enabled: true,
            mode: AssistantMode::Butler,
        }
    }
}

/// Exclusive-access handle to the process-wide session state.
///
/// Cloning is cheap; all clones share the same state and broadcast channel.
#[derive(Clone)]
pub struct StateHandle {
    inner: Arc<Mutex<StateSnapshot>>,
    updates: broadcast::Sender<StateSnapshot>,
}

impl Default for StateHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHandle {
    #[must_use]
    pub fn new() -> Self {
        let (updates, _rx) = broadcast::channel(UPDATE_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(StateSnapshot::default())),
            updates,
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        *self.lock()
    }

    /// Subscribe to state updates. A snapshot is published after every
    /// mutation, including ones that leave the state unchanged.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateSnapshot> {
        self.updates.subscribe()
    }

    /// Wake the assistant.
    ///
    /// # Errors
    ///
    /// Rejected with no state change when the safety interlock is engaged
    /// (`safety_enabled = false`).
    pub fn wake(&self) -> Result<StateSnapshot> {
        let snapshot = {
            let mut state = self.lock();
            if !state.safety_enabled {
                return Err(AssistantError::State(
                    "Safety switch is engaged".to_owned(),
                ));
            }
            state.is_awake = true;
            state.is_listening = true;
            *state
        };
        self.publish(snapshot);
        Ok(snapshot)
    }

    /// Put the assistant to sleep. Always succeeds.
    pub fn sleep(&self) -> StateSnapshot {
        let snapshot = {
            let mut state = self.lock();
            state.is_awake = false;
            state.is_listening = false;
            *state
        };
        self.publish(snapshot);
        snapshot
    }

    /// Flip the wake-word flag; disabling it forces the sleep reset.
    pub fn toggle_wake_word(&self) -> StateSnapshot {
        let snapshot = {
            let mut state = self.lock();
            state.wake_word_enabled = !state.wake_word_enabled;
            if !state.wake_word_enabled {
                state.is_awake = false;
                state.is_listening = false;
            }
            *state
        };
        self.publish(snapshot);
        snapshot
    }

    /// Flip the safety interlock; engaging it (now-false) forces the sleep
    /// reset regardless of prior state.
    pub fn toggle_safety(&self) -> StateSnapshot {
        let snapshot = {
            let mut state = self.lock();
            state.safety_enabled = !state.safety_enabled;
            if !state.safety_enabled {
                state.is_awake = false;
                state.is_listening = false;
            }
            *state
        };
        self.publish(snapshot);
        snapshot
    }

    /// Change the active persona. Pure assignment, no effect on the
    /// awake/listening flags.
    pub fn set_mode(&self, mode: AssistantMode) -> StateSnapshot {
        let snapshot = {
            let mut state = self.lock();
            state.mode = mode;
            *state
        };
        self.publish(snapshot);
        snapshot
    }

    /// Clear the listening flag. Used by the voice gateway when the active
    /// session closes.
    pub fn stop_listening(&self) -> StateSnapshot {
        let snapshot = {
            let mut state = self.lock();
            state.is_listening = false;
            *state
        };
        self.publish(snapshot);
        snapshot
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StateSnapshot> {
        // State mutations cannot panic while holding the lock, but recover
        // from poisoning anyway rather than propagating a panic.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, snapshot: StateSnapshot) {
        // No receivers is fine; nobody may be watching /ws/state.
        let _ = self.updates.send(snapshot);
    }
}

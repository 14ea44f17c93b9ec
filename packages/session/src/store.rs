//! Application-wide login state.

use std::sync::{PoisonError, RwLock};

use crate::events::EventChannel;

#[derive(Debug, Default)]
struct LoginState {
    access_token: Option<String>,
}

/// Holds the access token and announces login state changes.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<LoginState>,
    /// Fires with the new state whenever the user logs in or out.
    pub login_changed: EventChannel<bool>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.read().access_token.is_some()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    /// Stores a new token. Emits `login_changed(true)` when previously
    /// logged out.
    pub fn log_in(&self, access_token: impl Into<String>) {
        let was_logged_in = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.access_token.replace(access_token.into()).is_some()
        };
        if !was_logged_in {
            log::info!("Logged in");
            self.login_changed.emit(&true);
        }
    }

    /// Drops the token. Emits `login_changed(false)` when previously
    /// logged in.
    pub fn log_out(&self) {
        let was_logged_in = self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .access_token
            .take()
            .is_some();
        if was_logged_in {
            log::info!("Logged out");
            self.login_changed.emit(&false);
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, LoginState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn emits_only_on_state_change() {
        let store = SessionStore::new();
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        let _subscription = store
            .login_changed
            .subscribe(move |logged_in| sink.lock().unwrap().push(*logged_in));

        store.log_in("first");
        store.log_in("refreshed");
        assert_eq!(store.access_token().as_deref(), Some("refreshed"));
        store.log_out();
        store.log_out();

        assert_eq!(*changes.lock().unwrap(), [true, false]);
        assert!(!store.is_logged_in());
    }
}

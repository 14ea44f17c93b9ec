//! Typed publish/subscribe channels.
//!
//! Every live listener of a channel fires on [`EventChannel::emit`]. A
//! listener stays registered for as long as its [`Subscription`] lives.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use hackathon_survey_filters_models::FilterCombination;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

/// A channel for events of type `T`.
pub struct EventChannel<T> {
    listeners: Arc<Mutex<Listeners<T>>>,
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }
}

impl<T> std::fmt::Debug for EventChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<T: 'static> EventChannel<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`. It is removed when the returned
    /// [`Subscription`] is dropped or unsubscribed.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut listeners = self
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, Arc::new(listener)));
            id
        };

        let weak: Weak<Mutex<Listeners<T>>> = Arc::downgrade(&self.listeners);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    listeners
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .entries
                        .retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Calls every live listener with `event`, in subscription order.
    ///
    /// Listeners run outside the channel lock, so they may subscribe or
    /// unsubscribe reentrantly.
    pub fn emit(&self, event: &T) {
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }
}

impl<T> EventChannel<T> {
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}

/// Keeps a listener registered. Unsubscribes on drop.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Removes the listener now.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Notifications around filter editing.
#[derive(Debug, Default)]
pub struct FilterEvents {
    /// The active filter combinations changed.
    pub filters_updated: EventChannel<Vec<FilterCombination>>,
    /// A combination was saved as a preset.
    pub filter_saved: EventChannel<FilterCombination>,
    /// The filter editor was opened (`true`) or closed.
    pub filters_open: EventChannel<bool>,
}

impl FilterEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

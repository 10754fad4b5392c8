use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::{Rc, Weak},
};

use crate::{ChangeHandler, ChangeListener, LocationHost, LocationSnapshot};

struct Subscriber {
    callback: Box<dyn Fn(&LocationSnapshot)>,
    subscribed: Cell<bool>,
}

#[derive(Default)]
struct StoreState {
    current: Rc<LocationSnapshot>,
    subscribers: Vec<Rc<Subscriber>>,
    active: bool,
    listener: Option<ChangeListener>,
    notifying: bool,
    pending: VecDeque<Rc<LocationSnapshot>>,
}

struct StoreInner {
    host: Rc<dyn LocationHost>,
    state: RefCell<StoreState>,
}

/// An observable copy of the host's current location.
///
/// Every subscriber is called once with the current [`LocationSnapshot`] when it subscribes, and
/// again after every change the store observes. Changes come from two places:
/// - native navigation the host reports, like the back button or a fragment link
/// - explicit calls to [`LocationStore::sync`], which the [`Navigator`](crate::Navigator) makes
///   after each of its mutations
///
/// The store only listens to the host while it has subscribers. It attaches when the first
/// subscriber arrives and detaches when the last one leaves, capturing a fresh snapshot every time
/// it attaches.
///
/// Snapshots are delivered to subscribers in the order they subscribed. A pass always completes
/// before the next one starts: a sync requested from inside a subscriber is queued until every
/// subscriber has seen the current snapshot. Consecutive identical snapshots are still delivered.
///
/// ```rust
/// # use std::{cell::RefCell, rc::Rc};
/// # use slocation::{LocationStore, MemoryHost};
/// let host = Rc::new(MemoryHost::new("https://example.com/a").unwrap());
/// let store = LocationStore::new(host.clone());
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = seen.clone();
/// let subscription = store.subscribe(move |location| {
///     sink.borrow_mut().push(location.pathname.clone())
/// });
///
/// host.navigate_fragment("top");
/// assert_eq!(*seen.borrow(), ["/a", "/a", "/a"]);
///
/// subscription.unsubscribe();
/// assert!(!store.is_active());
/// ```
#[derive(Clone)]
pub struct LocationStore {
    inner: Rc<StoreInner>,
}

impl LocationStore {
    /// Create a store on top of `host`. Nothing is attached until the first subscription.
    pub fn new(host: Rc<dyn LocationHost>) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                host,
                state: Default::default(),
            }),
        }
    }

    /// Register `callback` and immediately call it with the current location.
    ///
    /// The callback stays registered until the returned [`Subscription`] is dropped or
    /// [unsubscribed](Subscription::unsubscribe).
    pub fn subscribe(&self, callback: impl Fn(&LocationSnapshot) + 'static) -> Subscription {
        let subscriber = Rc::new(Subscriber {
            callback: Box::new(callback),
            subscribed: Cell::new(true),
        });

        let needs_activation = {
            let mut state = self.inner.state.borrow_mut();
            state.subscribers.push(subscriber.clone());
            !state.active
        };
        if needs_activation {
            self.activate();
        }

        let current = self.inner.state.borrow().current.clone();
        (subscriber.callback)(&current);

        Subscription {
            store: Rc::downgrade(&self.inner),
            subscriber: Some(subscriber),
        }
    }

    /// Capture a fresh snapshot from the host and deliver it to every subscriber.
    ///
    /// Does nothing while the store has no subscribers, since the next subscription captures a
    /// fresh snapshot anyway.
    pub fn sync(&self) {
        if !self.is_active() {
            tracing::trace!("skipping location sync without subscribers");
            return;
        }

        let snapshot = self.inner.host.current_snapshot();
        self.notify(Rc::new(snapshot));
    }

    /// The current location.
    ///
    /// While the store has subscribers this is the snapshot they last received. Otherwise it is
    /// read from the host.
    pub fn get(&self) -> LocationSnapshot {
        let state = self.inner.state.borrow();
        match state.active {
            true => LocationSnapshot::clone(&state.current),
            false => self.inner.host.current_snapshot(),
        }
    }

    /// The number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.state.borrow().subscribers.len()
    }

    /// Whether the store currently has subscribers and listens to the host.
    pub fn is_active(&self) -> bool {
        self.inner.state.borrow().active
    }

    /// Whether a native change listener is attached to the host.
    ///
    /// This stays `false` while active for hosts that can't observe native navigation.
    pub fn is_listening(&self) -> bool {
        self.inner.state.borrow().listener.is_some()
    }

    fn activate(&self) {
        let snapshot = self.inner.host.current_snapshot();

        let store = Rc::downgrade(&self.inner);
        let handler: ChangeHandler = Rc::new(move |signal| {
            if let Some(inner) = store.upgrade() {
                tracing::trace!(?signal, "native location change");
                LocationStore { inner }.sync();
            }
        });
        let listener = self.inner.host.on_change(handler);

        let mut state = self.inner.state.borrow_mut();
        tracing::debug!(
            href = %snapshot.href,
            listening = listener.is_some(),
            "location store activated"
        );
        state.current = Rc::new(snapshot);
        state.listener = listener;
        state.active = true;
    }

    fn notify(&self, snapshot: Rc<LocationSnapshot>) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.pending.push_back(snapshot);
            if state.notifying {
                tracing::trace!("queueing location change behind the running pass");
                return;
            }
            state.notifying = true;
        }

        let _guard = NotifyGuard(&self.inner.state);
        loop {
            let (snapshot, subscribers) = {
                let mut state = self.inner.state.borrow_mut();
                let Some(snapshot) = state.pending.pop_front() else {
                    break;
                };
                state.current = snapshot.clone();
                (snapshot, state.subscribers.clone())
            };

            tracing::trace!(
                href = %snapshot.href,
                subscribers = subscribers.len(),
                "notifying location subscribers"
            );
            for subscriber in subscribers {
                // unsubscribed earlier in this pass
                if subscriber.subscribed.get() {
                    (subscriber.callback)(&snapshot);
                }
            }
        }
    }
}

// resets the pass even if a subscriber panics
struct NotifyGuard<'a>(&'a RefCell<StoreState>);

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.0.borrow_mut();
        state.notifying = false;
        state.pending.clear();
    }
}

impl std::fmt::Debug for LocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("LocationStore")
            .field("current", &state.current)
            .field("subscribers", &state.subscribers.len())
            .field("active", &state.active)
            .finish()
    }
}

/// A live registration with a [`LocationStore`].
///
/// Dropping the subscription unsubscribes it, just like calling
/// [`Subscription::unsubscribe`]. Once unsubscribed, the callback is never called again, even if
/// a delivery pass is currently running.
#[must_use = "dropping a `Subscription` unsubscribes it immediately"]
pub struct Subscription {
    store: Weak<StoreInner>,
    subscriber: Option<Rc<Subscriber>>,
}

impl Subscription {
    /// Remove the callback from the store. When it was the last one, the store detaches from the
    /// host.
    pub fn unsubscribe(mut self) {
        self.dispose();
    }

    /// Whether the callback is still registered.
    pub fn is_subscribed(&self) -> bool {
        self.subscriber
            .as_ref()
            .is_some_and(|subscriber| subscriber.subscribed.get())
    }

    fn dispose(&mut self) {
        let Some(subscriber) = self.subscriber.take() else {
            return;
        };
        subscriber.subscribed.set(false);

        let Some(inner) = self.store.upgrade() else {
            return;
        };

        let listener = {
            let mut state = inner.state.borrow_mut();
            state
                .subscribers
                .retain(|other| !Rc::ptr_eq(other, &subscriber));
            if !state.subscribers.is_empty() || !state.active {
                return;
            }
            // snapshots queued by this period must not leak into the next one
            state.active = false;
            state.pending.clear();
            state.listener.take()
        };

        tracing::debug!(
            detached = listener.is_some(),
            "location store deactivated"
        );
        // the host may run its own code while detaching
        drop(listener);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}

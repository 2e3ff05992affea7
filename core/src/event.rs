use std::{
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Weak,
    },
};
use crossbeam_skiplist::SkipSet;

/// Marker trait for events that can be dispatched to listeners.
pub trait Event: fmt::Debug + Send + Sync {}

#[derive(Debug)]
struct ListenerEntry<E: Event> {
    // Weak pointer so that dropping a `Listener` deregisters its callback.
    callback: Weak<dyn Fn(&E) + Send + Sync>,
    // Insertion sequence number; listeners are called in the order added.
    order: usize,
}

// Comparison is based solely on the insertion order.
impl<E: Event> Eq for ListenerEntry<E> {}

impl<E: Event> PartialEq for ListenerEntry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl<E: Event> Ord for ListenerEntry<E> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.order.cmp(&other.order)
    }
}

impl<E: Event> PartialOrd for ListenerEntry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// Global atomic counter to assign a unique order to each listener upon creation.
static LISTENER_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A list of listeners for a specific event type `E`.
///
/// Listeners are stored in a `SkipSet` ordered by their insertion sequence,
/// ensuring they are called in the order they were added.
pub struct ListenerList<E: Event> {
    inner: SkipSet<ListenerEntry<E>>,
}

impl<E: Event + 'static> ListenerList<E> {
    /// Creates a new, empty listener list.
    pub fn new() -> Self {
        ListenerList {
            inner: SkipSet::new(),
        }
    }

    /// Dispatches an event to all registered listeners in order.
    ///
    /// Each handler runs synchronously, to completion, before the next one
    /// starts. Entries whose `Weak` callback no longer upgrades (their
    /// `Listener` handle was dropped) are removed from the list.
    ///
    /// This method is `pub(crate)` so that only event owners within this
    /// crate can dispatch; hosts go through the explicit emit methods.
    pub(crate) fn dispatch(&self, event: &E) {
        let mut stale = Vec::new();

        for entry in self.inner.iter() {
            if let Some(callback) = entry.callback.upgrade() {
                callback(event);
            } else {
                // Removing during iteration is problematic; collect the
                // orders and clean up afterwards.
                stale.push(entry.order);
            }
        }

        let dummy: Arc<dyn Fn(&E) + Send + Sync> = Arc::new(Self::dummy_handler);
        for order in stale {
            // Temporary key for the removal lookup; only `order` matters
            // for comparison.
            let key = ListenerEntry {
                callback: Arc::downgrade(&dummy),
                order,
            };
            self.inner.remove(&key);
        }
    }

    // Never called; exists to satisfy the Weak pointer type for removal keys.
    fn dummy_handler(_: &E) {
        unreachable!()
    }
}

impl<E: Event + 'static> Default for ListenerList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for ListenerList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerList")
            .field("listener_count", &self.inner.len())
            .finish()
    }
}

/// Represents an active listener registration.
///
/// When this struct is dropped, the listener is effectively deregistered,
/// and its entry will be cleaned up from the `ListenerList` upon the next
/// dispatch. It holds the only strong reference to the callback closure.
pub struct Listener<E: Event> {
    #[allow(dead_code)] // Kept for lifetime management, not direct use
    arc: Arc<dyn Fn(&E) + Send + Sync>,
    order: usize,
}

impl<E: Event + 'static> Listener<E> {
    /// Creates a new listener and registers it with the given `ListenerList`.
    ///
    /// Keep the returned instance alive for as long as the listener should
    /// be active; dropping it deregisters the callback.
    pub fn new<F>(listeners: &ListenerList<E>, callback: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let order = LISTENER_ID_COUNTER.fetch_add(1, Ordering::SeqCst);
        let arc: Arc<dyn Fn(&E) + Send + Sync> = Arc::new(callback);
        let entry = ListenerEntry {
            callback: Arc::downgrade(&arc),
            order,
        };
        listeners.inner.insert(entry);

        Listener { arc, order }
    }
}

impl<E: Event> fmt::Debug for Listener<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("order", &self.order)
            .finish()
    }
}

/// Macro to define a struct holding named `ListenerList` fields for various
/// event types.
macro_rules! define_event_listeners {
    ($struct_name:ident { $($field_name:ident: $event_type:ty),* $(,)? }) => {
        /// Holds listener lists for various events.
        #[derive(Debug, Default)]
        pub struct $struct_name {
            $(
                pub $field_name: $crate::event::ListenerList<$event_type>,
            )*
        }

        impl $struct_name {
            /// Creates a new instance with empty listener lists.
            pub fn new() -> Self {
                Self {
                    $(
                        $field_name: $crate::event::ListenerList::new(),
                    )*
                }
            }
        }
    };
}

pub(crate) use define_event_listeners;


#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug)]
    struct Ping(&'static str);
    impl Event for Ping {}

    define_event_listeners!(TestEvents {
        on_ping: Ping,
    });

    #[test]
    fn test_listener_registration_and_dispatch() {
        let listeners = TestEvents::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen1 = seen.clone();
        let _handle1 = Listener::new(&listeners.on_ping, move |event: &Ping| {
            seen1.try_lock().unwrap().push(format!("first:{}", event.0));
        });
        let seen2 = seen.clone();
        let _handle2 = Listener::new(&listeners.on_ping, move |event: &Ping| {
            seen2.try_lock().unwrap().push(format!("second:{}", event.0));
        });

        listeners.on_ping.dispatch(&Ping("a"));

        assert_eq!(
            *seen.try_lock().unwrap(),
            vec!["first:a".to_string(), "second:a".to_string()]
        );
    }

    #[test]
    fn test_listener_cleanup_on_drop() {
        let listeners = TestEvents::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        {
            let seen = seen.clone();
            let _temp = Listener::new(&listeners.on_ping, move |_: &Ping| {
                seen.try_lock().unwrap().push("called");
            });
            assert_eq!(listeners.on_ping.inner.len(), 1);
            // _temp is dropped here
        }

        // Cleanup happens lazily during dispatch
        assert_eq!(listeners.on_ping.inner.len(), 1);
        listeners.on_ping.dispatch(&Ping("x"));
        assert_eq!(listeners.on_ping.inner.len(), 0);

        // The dropped listener must not have run
        assert!(seen.try_lock().unwrap().is_empty());
    }

    #[test]
    fn test_listener_order() {
        let listeners = TestEvents::new();
        let call_order = Arc::new(Mutex::new(Vec::new()));
        let (co_a, co_b, co_c) = (call_order.clone(), call_order.clone(), call_order.clone());

        let _listener_a = Listener::new(&listeners.on_ping, move |_: &Ping| {
            co_a.try_lock().unwrap().push("A");
        });
        let _listener_b = Listener::new(&listeners.on_ping, move |_: &Ping| {
            co_b.try_lock().unwrap().push("B");
        });
        let _listener_c = Listener::new(&listeners.on_ping, move |_: &Ping| {
            co_c.try_lock().unwrap().push("C");
        });

        listeners.on_ping.dispatch(&Ping("x"));

        assert_eq!(
            std::mem::take(&mut *call_order.try_lock().unwrap()),
            vec!["A", "B", "C"]
        );
    }
}

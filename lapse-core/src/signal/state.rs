use crate::signal::read::ReadSignal;
use crate::signal::subscription::{Detach, ListenerId, Subscription};
use crate::signal::{BoxedSignal, Listener, Ref, Signal};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

struct Entry<T> {
    id: ListenerId,
    attached: Cell<bool>,
    // Sequence number of the last value already covered by the initial delivery.
    joined_at: u64,
    listener: Listener<T>,
}

struct Shared<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<Rc<Entry<T>>>>,
    next_id: Cell<u64>,
    published: Cell<u64>,
    dispatching: Cell<bool>,
    pending: RefCell<VecDeque<(u64, T)>>,
}

impl<T> Detach for Shared<T> {
    fn detach(&self, id: ListenerId) {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(index) = listeners.iter().position(|entry| entry.id == id) {
            let entry = listeners.remove(index);
            entry.attached.set(false);
        }
    }

    fn is_attached(&self, id: ListenerId) -> bool {
        self.listeners.borrow().iter().any(|entry| entry.id == id)
    }
}

/// Ends a dispatch round, even if a listener panics. Values still queued by then are dropped.
struct DispatchGuard<'a, T>(&'a Shared<T>);

impl<T> Drop for DispatchGuard<'_, T> {
    fn drop(&mut self) {
        self.0.pending.borrow_mut().clear();
        self.0.dispatching.set(false);
    }
}

/// Simple signal implementation based on [Rc] and [RefCell] to get/set a value and notify listeners when it changes.
///
/// Listeners are notified synchronously, in registration order, before [Signal::set] returns.
/// A value set from inside a listener is queued and published once the current round is done,
/// so every listener sees values in the order they were set.
///
/// You can also mutate the inner value, but only in a set scope via [StateSignal::mutate].
pub struct StateSignal<T: 'static> {
    shared: Rc<Shared<T>>,
}

impl<T: Clone + 'static> StateSignal<T> {
    /// Creates a new signal with the given value.
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                value: RefCell::new(value),
                listeners: RefCell::new(Vec::with_capacity(1)),
                next_id: Cell::new(0),
                published: Cell::new(0),
                dispatching: Cell::new(false),
                pending: RefCell::new(VecDeque::new()),
            }),
        }
    }

    /// Mutate the inner value in a set scope. This scope is needed in order to notify listeners of the change.
    pub fn mutate(&self, op: impl FnOnce(&mut T)) {
        let value = {
            let mut value = self.shared.value.borrow_mut();
            op(&mut value);
            value.clone()
        };
        self.publish(value);
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.borrow().len()
    }

    /// A read-only view sharing this signal's value and listeners.
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal::new(self.clone())
    }

    fn publish(&self, value: T) {
        let seq = self.shared.published.get() + 1;
        self.shared.published.set(seq);
        self.shared.pending.borrow_mut().push_back((seq, value));
        if self.shared.dispatching.replace(true) {
            // The outer dispatch loop picks it up.
            return;
        }
        let _guard = DispatchGuard(&*self.shared);

        loop {
            let next = self.shared.pending.borrow_mut().pop_front();
            let Some((seq, value)) = next else { break };

            let listeners: Vec<Rc<Entry<T>>> = self.shared.listeners.borrow().clone();
            for entry in listeners {
                if entry.attached.get() && seq > entry.joined_at {
                    (entry.listener)(&value);
                }
            }
        }
    }
}

impl<T: Clone + PartialEq + 'static> StateSignal<T> {
    /// Set the value, but only notify listeners if it differs from the current one.
    ///
    /// Returns `true` if the value changed.
    pub fn set_if_changed(&self, value: T) -> bool {
        if *self.shared.value.borrow() == value {
            return false;
        }
        self.set_value(value);
        true
    }
}

impl<T: Clone + 'static> Signal<T> for StateSignal<T> {
    fn get(&self) -> Ref<'_, T> {
        Ref::Ref(self.shared.value.borrow())
    }

    fn set_value(&self, value: T) {
        self.mutate(move |old| *old = value);
    }

    fn listen(&self, listener: Listener<T>) -> Subscription {
        let id = ListenerId(self.shared.next_id.get());
        self.shared.next_id.set(id.0.wrapping_add(1));

        // The cell already holds the newest queued value, so older queued ones are skipped.
        let entry = Rc::new(Entry {
            id,
            attached: Cell::new(true),
            joined_at: self.shared.published.get(),
            listener,
        });
        self.shared.listeners.borrow_mut().push(entry.clone());

        let current = self.shared.value.borrow().clone();
        (entry.listener)(&current);

        let source: Weak<dyn Detach> = Rc::downgrade(&self.shared) as Weak<dyn Detach>;
        Subscription::new(source, id)
    }

    fn notify(&self) {
        let current = self.shared.value.borrow().clone();
        self.publish(current);
    }

    fn dyn_clone(&self) -> BoxedSignal<T> {
        Box::new(self.clone())
    }
}

impl<T: 'static> Clone for StateSignal<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Clone + Default + 'static> Default for StateSignal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(&T) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |value: &T| sink.borrow_mut().push(value.clone()))
    }

    #[test]
    fn test_subscribe_yields_current_value_first() {
        let signal = StateSignal::new(7);
        let (seen, listener) = recorder();

        let _sub = signal.subscribe(listener);
        signal.set(8);

        assert_eq!(*seen.borrow(), vec![7, 8]);
    }

    #[test]
    fn test_listeners_notified_in_registration_order() {
        let signal = StateSignal::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let order = order.clone();
            signal.subscribe(move |v| order.borrow_mut().push(("first", *v)))
        };
        let second = {
            let order = order.clone();
            signal.subscribe(move |v| order.borrow_mut().push(("second", *v)))
        };
        order.borrow_mut().clear();

        signal.set(1);

        assert_eq!(*order.borrow(), vec![("first", 1), ("second", 1)]);
        drop((first, second));
    }

    #[test]
    fn test_dropping_subscription_stops_delivery() {
        let signal = StateSignal::new(0);
        let (seen, listener) = recorder();

        let sub = signal.subscribe(listener);
        signal.set(1);
        drop(sub);
        signal.set(2);

        assert_eq!(*seen.borrow(), vec![0, 1]);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn test_dispose_after_signal_dropped_is_noop() {
        let signal = StateSignal::new(String::from("a"));
        let sub = signal.subscribe(|_| {});
        assert!(sub.is_active());

        drop(signal);

        assert!(!sub.is_active());
        sub.dispose();
    }

    #[test]
    fn test_set_from_listener_is_delivered_in_order() {
        let signal = StateSignal::new(0);

        let bouncer = {
            let signal = signal.clone();
            signal.clone().subscribe(move |v| {
                if *v == 1 {
                    signal.set(2);
                }
            })
        };
        let (seen, listener) = recorder();
        let _sub = signal.subscribe(listener);

        signal.set(1);

        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
        assert_eq!(*signal.get(), 2);
        drop(bouncer);
    }

    #[test]
    fn test_subscribe_during_dispatch_skips_older_queued_values() {
        let signal = StateSignal::new(0);
        let (late_seen, late_listener) = recorder();
        let late_listener = Rc::new(RefCell::new(Some(late_listener)));
        let late_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let _joiner = {
            let signal = signal.clone();
            let late_sub = late_sub.clone();
            signal.clone().subscribe(move |v| {
                if *v == 1 {
                    signal.set(2);
                    signal.set(3);
                    if let Some(listener) = late_listener.borrow_mut().take() {
                        *late_sub.borrow_mut() = Some(signal.subscribe(listener));
                    }
                }
            })
        };

        signal.set(1);
        signal.set(4);

        assert_eq!(*late_seen.borrow(), vec![3, 4]);
    }

    #[test]
    fn test_panicking_listener_drops_queued_values() {
        let signal = StateSignal::new(0);

        let _bouncer = {
            let signal = signal.clone();
            signal.clone().subscribe(move |v| {
                if *v == 1 {
                    signal.set(2);
                }
            })
        };
        let _panicker = signal.subscribe(|v| {
            if *v == 1 {
                panic!("listener failed");
            }
        });
        let (seen, listener) = recorder();
        let _sub = signal.subscribe(listener);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| signal.set(1)));
        assert!(result.is_err());

        signal.set(5);

        assert_eq!(*seen.borrow(), vec![0, 5]);
        assert_eq!(*signal.get(), 5);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_skips_listener() {
        let signal = StateSignal::new(0);
        let (seen, listener) = recorder();
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let _killer = {
            let victim = victim.clone();
            signal.subscribe(move |v| {
                if *v == 1 {
                    victim.borrow_mut().take();
                }
            })
        };
        *victim.borrow_mut() = Some(signal.subscribe(listener));

        signal.set(1);

        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn test_set_if_changed() {
        let signal = StateSignal::new(3);
        let (seen, listener) = recorder();
        let _sub = signal.subscribe(listener);

        assert!(!signal.set_if_changed(3));
        assert!(signal.set_if_changed(4));

        assert_eq!(*seen.borrow(), vec![3, 4]);
    }

    #[test]
    fn test_notify_republishes_current_value() {
        let signal = StateSignal::new(5);
        let (seen, listener) = recorder();
        let _sub = signal.subscribe(listener);

        signal.notify();

        assert_eq!(*seen.borrow(), vec![5, 5]);
    }
}

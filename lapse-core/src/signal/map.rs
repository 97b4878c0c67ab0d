use crate::signal::subscription::Subscription;
use crate::signal::{BoxedSignal, Listener, Ref, Signal};
use std::rc::Rc;

/// A signal wrapping another signal and applying a mapping function, when the inner value is requested.
/// This signal cannot be directly mutated. Use [MapSignal::signal] to get the inner signal.
///
/// Listeners receive the mapped value of every value the inner signal publishes.
///
/// Calling [Signal::set] or [Signal::set_value] has no effect.
pub struct MapSignal<T: 'static, U: 'static> {
    signal: BoxedSignal<T>,
    map: Rc<dyn Fn(&T) -> U>,
}

impl<T: 'static, U: 'static> MapSignal<T, U> {
    /// Create a new map signal using the given inner signal and mapping function.
    pub fn new(signal: BoxedSignal<T>, map: impl Fn(&T) -> U + 'static) -> Self {
        Self {
            signal,
            map: Rc::new(map),
        }
    }

    /// Get the inner signal.
    pub fn signal(&self) -> BoxedSignal<T> {
        self.signal.dyn_clone()
    }

    /// Get the inner signal's value, without applying the mapping function.
    pub fn get_unmapped(&self) -> Ref<'_, T> {
        self.signal.get()
    }
}

impl<T: 'static, U: 'static> Signal<U> for MapSignal<T, U> {
    fn get(&self) -> Ref<'_, U> {
        let value = self.get_unmapped();
        Ref::Owned((self.map)(&*value))
    }

    fn set_value(&self, _: U) {}

    fn listen(&self, listener: Listener<U>) -> Subscription {
        let map = self.map.clone();
        self.signal.listen(Box::new(move |value: &T| listener(&map(value))))
    }

    fn notify(&self) {
        self.signal.notify();
    }

    fn dyn_clone(&self) -> BoxedSignal<U> {
        Box::new(self.clone())
    }
}

impl<T: 'static, U: 'static> Clone for MapSignal<T, U> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.dyn_clone(),
            map: self.map.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::signal::state::StateSignal;
    use crate::signal::Signal;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_map_follows_inner_signal() {
        let counter = StateSignal::new(5);
        let label = counter.map(|i| i.to_string());
        assert_eq!(*label.get(), "5");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            label.subscribe(move |s: &String| seen.borrow_mut().push(s.clone()))
        };
        counter.set(-3);

        assert_eq!(*seen.borrow(), vec!["5".to_string(), "-3".to_string()]);
        assert_eq!(*label.get_unmapped(), -3);
    }

    #[test]
    fn test_map_of_map() {
        let counter = StateSignal::new(2);
        let doubled = counter.map(|i| i * 2);
        let text = doubled.map(|i| format!("<{i}>"));

        counter.set(4);
        assert_eq!(*text.get(), "<8>");
    }
}

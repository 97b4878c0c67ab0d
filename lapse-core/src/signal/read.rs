use crate::signal::state::StateSignal;
use crate::signal::subscription::Subscription;
use crate::signal::{BoxedSignal, Listener, Ref, Signal};

/// A read-only view of a [StateSignal].
///
/// Shares the value and the listeners with the signal it was created from, but can't change it.
/// Calling [Signal::set] or [Signal::set_value] has no effect.
pub struct ReadSignal<T: 'static> {
    inner: StateSignal<T>,
}

impl<T: Clone + 'static> ReadSignal<T> {
    pub(crate) fn new(inner: StateSignal<T>) -> Self {
        Self { inner }
    }
}

impl<T: Clone + 'static> Signal<T> for ReadSignal<T> {
    fn get(&self) -> Ref<'_, T> {
        self.inner.get()
    }

    fn set_value(&self, _: T) {}

    fn listen(&self, listener: Listener<T>) -> Subscription {
        self.inner.listen(listener)
    }

    fn notify(&self) {
        self.inner.notify();
    }

    fn dyn_clone(&self) -> BoxedSignal<T> {
        Box::new(self.clone())
    }
}

impl<T: 'static> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_ignores_set() {
        let signal = StateSignal::new(1);
        let view = signal.read_only();

        view.set(5);
        assert_eq!(*view.get(), 1);

        signal.set(2);
        assert_eq!(*view.get(), 2);
    }
}

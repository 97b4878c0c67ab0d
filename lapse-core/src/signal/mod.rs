use crate::signal::map::MapSignal;
use crate::signal::subscription::Subscription;

pub use crate::reference::Ref;

/// Contains the [StateSignal](state::StateSignal), the mutable observable value holder.
pub mod state;

/// Contains the [MapSignal](map::MapSignal), a read-only view applying a mapping function.
pub mod map;

/// Contains the [ReadSignal](read::ReadSignal), a read-only view of a state signal.
pub mod read;

/// Contains the [Subscription](subscription::Subscription) handle and the
/// [SubscriptionBag](subscription::SubscriptionBag).
pub mod subscription;

/// A callback invoked with every value a signal publishes.
pub type Listener<T> = Box<dyn Fn(&T)>;

/// A boxed signal.
pub type BoxedSignal<T> = Box<dyn Signal<T>>;

/// An observable value.
///
/// Subscribing yields the current value right away and then every subsequent change, in the
/// order the changes happened, until the returned [Subscription] is dropped or disposed.
pub trait Signal<T: 'static> {
    /// Get a reference to the current value of the signal.
    fn get(&self) -> Ref<'_, T>;

    /// Set the value of the signal and notify listeners.
    ///
    /// Read-only signals ignore this.
    fn set_value(&self, value: T);

    /// Register a listener. It is invoked immediately with the current value.
    fn listen(&self, listener: Listener<T>) -> Subscription;

    /// Publish the current value to all listeners again.
    fn notify(&self);

    /// Converts the signal into a dynamically typed boxed signal.
    fn dyn_clone(&self) -> BoxedSignal<T>;

    /// Set the value of the signal and notify listeners.
    fn set(&self, value: impl Into<T>)
    where
        Self: Sized,
    {
        self.set_value(value.into());
    }

    /// Subscribe with a closure. See [Signal::listen].
    fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription
    where
        Self: Sized,
    {
        self.listen(Box::new(listener))
    }

    /// Map the value of the signal into a read-only signal of another type.
    fn map<U: 'static>(&self, map: impl Fn(&T) -> U + 'static) -> MapSignal<T, U>
    where
        Self: Sized,
    {
        MapSignal::new(self.dyn_clone(), map)
    }
}

use std::cell::Ref as CellRef;
use std::fmt;
use std::ops::Deref;

/// A read handle to a signal value.
///
/// Either borrows the value straight out of the signal's cell, or owns a freshly computed one
/// (as returned by [MapSignal](crate::signal::map::MapSignal)).
///
/// **NOTE:** A [Ref::Ref] keeps the signal's cell borrowed. Setting the same signal while still
/// holding it will panic, so don't keep it around longer than needed.
pub enum Ref<'a, T> {
    /// An owned value.
    Owned(T),
    /// A borrow of a [RefCell](std::cell::RefCell).
    Ref(CellRef<'a, T>),
}

impl<T: Clone> Ref<'_, T> {
    /// Clone the value out, releasing any borrow.
    pub fn into_owned(self) -> T {
        match self {
            Ref::Owned(value) => value,
            Ref::Ref(value) => value.clone(),
        }
    }
}

impl<T> Deref for Ref<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        match self {
            Ref::Owned(value) => value,
            Ref::Ref(value) => value,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Ref<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

impl<T: fmt::Display> fmt::Display for Ref<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

impl<T: PartialEq> PartialEq<T> for Ref<'_, T> {
    fn eq(&self, other: &T) -> bool {
        **self == *other
    }
}

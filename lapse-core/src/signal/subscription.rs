use std::fmt;
use std::rc::Weak;

/// Identifies a listener within one signal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ListenerId(pub(crate) u64);

/// Implemented by signal storage so a [Subscription] can detach its listener
/// without knowing the value type.
pub(crate) trait Detach {
    fn detach(&self, id: ListenerId);

    fn is_attached(&self, id: ListenerId) -> bool;
}

/// Handle to a registered listener.
///
/// Delivery stops when the handle is dropped or [disposed](Subscription::dispose).
/// The handle only holds a weak link to the signal, so it never keeps it alive and
/// disposing after the signal is gone does nothing.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    link: Option<(Weak<dyn Detach>, ListenerId)>,
}

impl Subscription {
    pub(crate) fn new(source: Weak<dyn Detach>, id: ListenerId) -> Self {
        Self {
            link: Some((source, id)),
        }
    }

    /// A subscription that isn't attached to anything.
    ///
    /// Returned by signals that never publish.
    pub fn empty() -> Self {
        Self { link: None }
    }

    /// Returns `true` while the listener is still registered on a live signal.
    pub fn is_active(&self) -> bool {
        match &self.link {
            Some((source, id)) => source
                .upgrade()
                .is_some_and(|source| source.is_attached(*id)),
            None => false,
        }
    }

    /// Stop delivery now.
    pub fn dispose(mut self) {
        self.detach();
    }

    /// Move the subscription into a bag, tying its lifetime to the bag.
    pub fn disposed_by(self, bag: &mut SubscriptionBag) {
        bag.insert(self);
    }

    fn detach(&mut self) {
        if let Some((source, id)) = self.link.take() {
            if let Some(source) = source.upgrade() {
                source.detach(id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Collects subscriptions that should live exactly as long as some owner,
/// typically one screen. Dropping the bag disposes all of them.
#[derive(Debug, Default)]
pub struct SubscriptionBag {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscription to the bag.
    pub fn insert(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Number of subscriptions held.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns `true` if the bag holds no subscriptions.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Dispose every held subscription, leaving the bag empty and reusable.
    pub fn dispose(&mut self) {
        log::trace!("Disposing {} subscriptions", self.subscriptions.len());
        self.subscriptions.clear();
    }
}

impl Extend<Subscription> for SubscriptionBag {
    fn extend<I: IntoIterator<Item = Subscription>>(&mut self, iter: I) {
        self.subscriptions.extend(iter);
    }
}

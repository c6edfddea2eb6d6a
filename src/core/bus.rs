//! Notification bus - Process-local publish/subscribe keyed by channel.
//!
//! Producers publish typed [`Event`]s; every handler registered on the event's
//! [`Channel`] is invoked synchronously, in registration order, before
//! [`NotificationBus::notify`] returns. Nothing is buffered: an event published
//! while a channel has no subscribers is dropped.
//!
//! The bus is an owned value rather than a global. Cloning it yields another
//! handle to the same registry, so components share one bus by passing clones
//! around, while separately constructed buses never see each other's traffic.

use crate::entities::{Profile, Transaction};
use parking_lot::Mutex;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};
use tracing::{debug, error, trace};

/// Logical table an event belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Member and administrator profiles
    Profiles,
    /// Deposit and withdrawal records
    Transactions,
}

impl Channel {
    /// Table name as used in log output
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Profiles => "profiles",
            Self::Transactions => "transactions",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Change to the profile collection
#[derive(Clone, Debug, PartialEq)]
pub enum ProfileEvent {
    /// Insert the profile, or replace the one with the same id
    Upserted(Profile),
    /// Remove the profile with this id everywhere it is displayed
    Deleted {
        /// Id of the removed profile
        id: String,
    },
}

/// Change to the transaction collection
#[derive(Clone, Debug, PartialEq)]
pub enum TransactionEvent {
    /// A new transaction was confirmed
    Recorded(Transaction),
}

/// Payload carried by the bus. The variant decides the channel.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Published on [`Channel::Profiles`]
    Profile(ProfileEvent),
    /// Published on [`Channel::Transactions`]
    Transaction(TransactionEvent),
}

impl Event {
    #[must_use]
    pub const fn channel(&self) -> Channel {
        match self {
            Self::Profile(_) => Channel::Profiles,
            Self::Transaction(_) => Channel::Transactions,
        }
    }
}

impl From<ProfileEvent> for Event {
    fn from(event: ProfileEvent) -> Self {
        Self::Profile(event)
    }
}

impl From<TransactionEvent> for Event {
    fn from(event: TransactionEvent) -> Self {
        Self::Transaction(event)
    }
}

type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

struct Listener {
    id: u64,
    channel: Channel,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<Listener>,
    disposed: bool,
}

/// Shared handle to a publish/subscribe registry.
#[derive(Clone, Default)]
pub struct NotificationBus {
    registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("NotificationBus")
            .field("listeners", &registry.listeners.len())
            .field("disposed", &registry.disposed)
            .finish()
    }
}

impl NotificationBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for every future event on `channel`.
    ///
    /// The returned [`Subscription`] deregisters the handler when
    /// [`Subscription::unsubscribe`] is called. Subscribing to a disposed bus
    /// returns a subscription that never fires.
    pub fn subscribe<F>(&self, channel: Channel, handler: F) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;

        if registry.disposed {
            debug!(%channel, "Ignoring subscription on disposed bus");
        } else {
            registry.listeners.push(Listener {
                id,
                channel,
                handler: Arc::new(handler),
            });
            trace!(%channel, listener = id, "Listener registered");
        }

        Subscription {
            id,
            channel,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Subscribes to the profile channel with a handler typed to [`ProfileEvent`].
    pub fn subscribe_profiles<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&ProfileEvent) + Send + Sync + 'static,
    {
        self.subscribe(Channel::Profiles, move |event| {
            if let Event::Profile(profile_event) = event {
                handler(profile_event);
            }
        })
    }

    /// Subscribes to the transaction channel with a handler typed to [`TransactionEvent`].
    pub fn subscribe_transactions<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&TransactionEvent) + Send + Sync + 'static,
    {
        self.subscribe(Channel::Transactions, move |event| {
            if let Event::Transaction(transaction_event) = event {
                handler(transaction_event);
            }
        })
    }

    /// Delivers `event` to every handler currently registered on its channel.
    ///
    /// Handlers run on the calling thread in registration order. The handler
    /// list is snapshotted first, so a handler may publish or subscribe
    /// without deadlocking; listeners added during delivery only see later
    /// events. A panicking handler is logged and skipped. Returns the number
    /// of handlers that completed.
    pub fn notify(&self, event: impl Into<Event>) -> usize {
        let event = event.into();
        let channel = event.channel();

        let handlers: Vec<(u64, Handler)> = {
            let registry = self.registry.lock();
            registry
                .listeners
                .iter()
                .filter(|listener| listener.channel == channel)
                .map(|listener| (listener.id, Arc::clone(&listener.handler)))
                .collect()
        };

        if handlers.is_empty() {
            debug!(%channel, "No subscribers, event dropped");
            return 0;
        }

        let mut delivered = 0;
        for (id, handler) in handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    error!(%channel, listener = id, "Subscriber panicked while handling event");
                }
            }
        }
        trace!(%channel, delivered, "Event delivered");
        delivered
    }

    /// Number of handlers registered on `channel`
    #[must_use]
    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.registry
            .lock()
            .listeners
            .iter()
            .filter(|listener| listener.channel == channel)
            .count()
    }

    /// Drops every listener and refuses new ones. Later events are dropped.
    pub fn dispose(&self) {
        let mut registry = self.registry.lock();
        let dropped = registry.listeners.len();
        registry.listeners.clear();
        registry.disposed = true;
        debug!(dropped, "Notification bus disposed");
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.registry.lock().disposed
    }
}

/// Capability to deregister one handler.
#[must_use = "dropping a Subscription leaves the handler registered"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    channel: Channel,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Removes the handler. A no-op if the bus is already gone or disposed.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .listeners
                .retain(|listener| listener.id != self.id);
            trace!(channel = %self.channel, listener = self.id, "Listener removed");
        }
    }
}

// crates/clipscout-core/src/bus.rs
//
// Typed pub/sub bus for cross-component signaling. One Bus instance carries
// one event type; construct it once per session and hand clones to whoever
// publishes or subscribes — there is no global instance.
//
// Live fan-out only: no history, no replay, no queue. A publish reaches the
// listeners subscribed at that moment, in subscription order; a subscriber
// added afterwards missed it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// "Seek the player to this offset" — published when the user activates a
/// timestamp, consumed by every mounted player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeekEvent {
    pub seconds: f64,
}

/// The session-wide seek channel.
pub type SeekBus = Bus<SeekEvent>;

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Listener<E> {
    id:       u64,
    callback: Callback<E>,
}

pub struct Bus<E> {
    listeners: Arc<Mutex<Vec<Listener<E>>>>,
    next_id:   Arc<AtomicU64>,
}

// Manual impls: derives would put bounds on E, which carries no state here.
impl<E> Clone for Bus<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
            next_id:   Arc::clone(&self.next_id),
        }
    }
}

impl<E> Default for Bus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Bus<E> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id:   Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe a listener. It stays registered until the returned handle's
    /// `unsubscribe` is called — dropping the handle does NOT unsubscribe,
    /// so fire-and-forget subscribers can discard it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription<E>
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push(Listener { id, callback: Arc::new(callback) });
        Subscription { id, listeners: Arc::downgrade(&self.listeners) }
    }

    /// Deliver `event` to every listener subscribed right now, synchronously,
    /// in subscription order. No subscribers → no-op.
    ///
    /// Delivery runs off a snapshot taken under the lock, so a callback may
    /// subscribe or unsubscribe mid-delivery without poisoning the dispatch
    /// loop; such changes take effect from the next publish.
    pub fn publish(&self, event: E) {
        let snapshot: Vec<Callback<E>> =
            self.lock().iter().map(|l| Arc::clone(&l.callback)).collect();
        for callback in snapshot {
            callback(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Listener<E>>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Handle returned by `Bus::subscribe`.
pub struct Subscription<E> {
    id:        u64,
    listeners: Weak<Mutex<Vec<Listener<E>>>>,
}

impl<E> Subscription<E> {
    /// Remove the listener this handle was created for. Safe to call after
    /// the bus is gone, or from inside a callback during a publish.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .retain(|l| l.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI32;

    #[test]
    fn publish_with_no_subscribers_is_a_noop() {
        let bus: SeekBus = Bus::new();
        bus.publish(SeekEvent { seconds: 3.5 });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn all_subscribers_receive_in_subscription_order() {
        let bus: SeekBus = Bus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o1 = Arc::clone(&order);
        let _s1 = bus.subscribe(move |e: &SeekEvent| o1.lock().unwrap().push((1, e.seconds)));
        let o2 = Arc::clone(&order);
        let _s2 = bus.subscribe(move |e: &SeekEvent| o2.lock().unwrap().push((2, e.seconds)));

        bus.publish(SeekEvent { seconds: 2.0 });
        bus.publish(SeekEvent { seconds: 4.0 });

        let got = order.lock().unwrap().clone();
        assert_eq!(got, vec![(1, 2.0), (2, 2.0), (1, 4.0), (2, 4.0)]);
    }

    #[test]
    fn late_subscriber_misses_earlier_publishes() {
        let bus: SeekBus = Bus::new();
        bus.publish(SeekEvent { seconds: 1.0 });

        let count = Arc::new(AtomicI32::new(0));
        let c = Arc::clone(&count);
        let _sub = bus.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(count.load(Ordering::SeqCst), 0);
        bus.publish(SeekEvent { seconds: 2.0 });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus: SeekBus = Bus::new();
        let count = Arc::new(AtomicI32::new(0));
        let c = Arc::clone(&count);
        let sub = bus.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(SeekEvent { seconds: 1.0 });
        sub.unsubscribe();
        bus.publish(SeekEvent { seconds: 2.0 });

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribing_mid_delivery_does_not_panic_the_dispatch() {
        let bus: SeekBus = Bus::new();
        let second_count = Arc::new(AtomicI32::new(0));

        let c = Arc::clone(&second_count);
        let second = bus.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        // First listener tears down the second while a publish is running.
        let slot = Arc::new(Mutex::new(Some(second)));
        let s = Arc::clone(&slot);
        let _first = bus.subscribe(move |_| {
            if let Some(sub) = s.lock().unwrap().take() {
                sub.unsubscribe();
            }
        });
        // subscribe() appended _first after second, so on the first publish
        // the snapshot still contains the second listener.

        bus.publish(SeekEvent { seconds: 1.0 });
        bus.publish(SeekEvent { seconds: 2.0 });

        // Second listener saw the publish it was still snapshotted into,
        // and nothing afterwards.
        assert_eq!(second_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cloned_bus_shares_subscribers() {
        let bus: SeekBus = Bus::new();
        let count = Arc::new(AtomicI32::new(0));
        let c = Arc::clone(&count);
        let _sub = bus.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let publisher = bus.clone();
        publisher.publish(SeekEvent { seconds: 7.0 });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}

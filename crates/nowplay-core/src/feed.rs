#![forbid(unsafe_code)]

//! Render feed: the latest [`PanelSnapshot`] plus the renderers listening
//! for it.
//!
//! The controller publishes after every offset or phase change; renderers
//! hold a [`SnapshotFeed`] handle and either poll [`SnapshotFeed::latest`]
//! or register a listener. Everything lives on the UI thread.
//!
//! # Invariants
//!
//! 1. Publishing a snapshot equal to the latest one notifies nobody.
//! 2. Listeners run in registration order, with no borrow of the feed held,
//!    so a listener may read the feed or subscribe another listener.
//! 3. Dropping a [`Subscription`] removes its listener immediately.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::controller::PanelSnapshot;

type Listener = Rc<dyn Fn(&PanelSnapshot)>;

struct FeedState {
    latest: PanelSnapshot,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Shared handle to the published panel snapshot. Clones see the same feed.
#[derive(Clone)]
pub struct SnapshotFeed {
    state: Rc<RefCell<FeedState>>,
}

impl std::fmt::Debug for SnapshotFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SnapshotFeed")
            .field("latest", &state.latest)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl SnapshotFeed {
    pub(crate) fn new(initial: PanelSnapshot) -> Self {
        Self {
            state: Rc::new(RefCell::new(FeedState {
                latest: initial,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn latest(&self) -> PanelSnapshot {
        self.state.borrow().latest
    }

    /// Run `listener` on every future snapshot until the returned guard drops.
    pub fn subscribe(&self, listener: impl Fn(&PanelSnapshot) + 'static) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push((id, Rc::new(listener)));
        Subscription {
            feed: Rc::downgrade(&self.state),
            id,
        }
    }

    pub(crate) fn publish(&self, snapshot: PanelSnapshot) {
        let listeners: Vec<Listener> = {
            let mut state = self.state.borrow_mut();
            if state.latest == snapshot {
                return;
            }
            state.latest = snapshot;
            state.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
        };
        for listener in &listeners {
            listener(&snapshot);
        }
    }
}

/// Keeps a feed listener registered while alive.
pub struct Subscription {
    feed: Weak<RefCell<FeedState>>,
    id: u64,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(feed) = self.feed.upgrade()
            && let Ok(mut state) = feed.try_borrow_mut()
        {
            state.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PanelPhase, PanelState};
    use crate::visual::DerivedVisualState;
    use std::cell::Cell;

    fn snapshot(offset: f64) -> PanelSnapshot {
        PanelSnapshot {
            offset,
            state: PanelState::Expanded,
            phase: PanelPhase::Dragging,
            visuals: DerivedVisualState::at(offset, 300.0),
        }
    }

    fn counting(feed: &SnapshotFeed) -> (Rc<Cell<u32>>, Subscription) {
        let calls = Rc::new(Cell::new(0));
        let sink = Rc::clone(&calls);
        let sub = feed.subscribe(move |_| sink.set(sink.get() + 1));
        (calls, sub)
    }

    #[test]
    fn publish_reaches_listeners_and_updates_latest() {
        let feed = SnapshotFeed::new(snapshot(0.0));
        let seen = Rc::new(Cell::new(0.0));
        let sink = Rc::clone(&seen);
        let _sub = feed.subscribe(move |snap| sink.set(snap.offset));

        feed.publish(snapshot(42.0));
        assert_eq!(seen.get(), 42.0);
        assert_eq!(feed.latest().offset, 42.0);
    }

    #[test]
    fn unchanged_snapshot_is_not_republished() {
        let feed = SnapshotFeed::new(snapshot(10.0));
        let (calls, _sub) = counting(&feed);
        feed.publish(snapshot(10.0));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let feed = SnapshotFeed::new(snapshot(0.0));
        let (calls, sub) = counting(&feed);
        feed.publish(snapshot(1.0));
        drop(sub);
        feed.publish(snapshot(2.0));
        assert_eq!(calls.get(), 1);
        assert_eq!(feed.state.borrow().listeners.len(), 0);
    }

    #[test]
    fn listener_may_read_the_feed() {
        let feed = SnapshotFeed::new(snapshot(0.0));
        let reader = feed.clone();
        let seen = Rc::new(Cell::new(0.0));
        let sink = Rc::clone(&seen);
        let _sub = feed.subscribe(move |_| sink.set(reader.latest().offset));
        feed.publish(snapshot(7.0));
        assert_eq!(seen.get(), 7.0);
    }
}

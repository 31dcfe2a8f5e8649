use std::collections::HashSet;
use std::sync::mpsc::{channel, Receiver, Sender};

use log::debug;

use crate::data::model::RowKey;

// ---------------------------------------------------------------------------
// HiliteEvent – what the authority broadcasts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HiliteEvent {
    /// Keys were hilited. Carries the complete set hilit after the change.
    Hilite(HashSet<RowKey>),
    /// Carries only the keys that were just unhilited.
    Unhilite(HashSet<RowKey>),
    ClearAll,
}

/// Sink for hilite requests issued by a view.
pub trait HiliteAuthority {
    fn fire_hilite(&mut self, keys: &HashSet<RowKey>);
    fn fire_unhilite(&mut self, keys: &HashSet<RowKey>);
    fn fire_clear_all(&mut self);
}

// ---------------------------------------------------------------------------
// HiliteHandler – in-process authority with channel subscribers
// ---------------------------------------------------------------------------

/// Keeps the globally hilit key set and fans every change out to its
/// subscribers. Subscribers that dropped their receiver are pruned on the
/// next broadcast.
#[derive(Debug, Default)]
pub struct HiliteHandler {
    hilit: HashSet<RowKey>,
    subscribers: Vec<Sender<HiliteEvent>>,
}

impl HiliteHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<HiliteEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn hilit_keys(&self) -> &HashSet<RowKey> {
        &self.hilit
    }

    pub fn is_hilit(&self, key: &RowKey) -> bool {
        self.hilit.contains(key)
    }

    fn broadcast(&mut self, event: HiliteEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        debug!("hilite event sent to {} subscribers", self.subscribers.len());
    }
}

impl HiliteAuthority for HiliteHandler {
    fn fire_hilite(&mut self, keys: &HashSet<RowKey>) {
        self.hilit.extend(keys.iter().cloned());
        self.broadcast(HiliteEvent::Hilite(self.hilit.clone()));
    }

    fn fire_unhilite(&mut self, keys: &HashSet<RowKey>) {
        self.hilit.retain(|k| !keys.contains(k));
        self.broadcast(HiliteEvent::Unhilite(keys.clone()));
    }

    fn fire_clear_all(&mut self) {
        self.hilit.clear();
        self.broadcast(HiliteEvent::ClearAll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> HashSet<RowKey> {
        names.iter().map(|n| RowKey::from(*n)).collect()
    }

    #[test]
    fn tracks_hilit_keys() {
        let mut handler = HiliteHandler::new();
        handler.fire_hilite(&set(&["a", "b"]));
        handler.fire_hilite(&set(&["c"]));
        handler.fire_unhilite(&set(&["b"]));
        assert_eq!(handler.hilit_keys(), &set(&["a", "c"]));
        handler.fire_clear_all();
        assert!(handler.hilit_keys().is_empty());
    }

    #[test]
    fn subscribers_receive_events_in_order() {
        let mut handler = HiliteHandler::new();
        let rx = handler.subscribe();
        handler.fire_hilite(&set(&["a"]));
        handler.fire_hilite(&set(&["b"]));
        handler.fire_unhilite(&set(&["a"]));
        handler.fire_clear_all();

        let events: Vec<HiliteEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                HiliteEvent::Hilite(set(&["a"])),
                HiliteEvent::Hilite(set(&["a", "b"])),
                HiliteEvent::Unhilite(set(&["a"])),
                HiliteEvent::ClearAll,
            ]
        );
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut handler = HiliteHandler::new();
        let rx = handler.subscribe();
        drop(rx);
        handler.fire_clear_all();
        assert!(handler.subscribers.is_empty());
    }
}

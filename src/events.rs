//! Chart event subscription.
//!
//! Callers subscribe via [`EventController`] with an [`EventFilter`] and
//! receive [`ChartEvent`]s on an `mpsc` channel. Each event carries a set of
//! [`EventKind`] flags so a single occurrence can match several categories
//! (switching directly from one layer to another is both `LAYER_LEFT` and
//! `LAYER_ENTERED`).

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::data::catalog::SeriesId;

// ─────────────────────────────────────────────────────────────────────────────
// EventKind – bitflags
// ─────────────────────────────────────────────────────────────────────────────

/// Bitflags describing the categories an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u32);

impl EventKind {
    /// A non-empty table was rendered.
    pub const DATA_UPDATED: Self = Self(1 << 0);
    /// The surface was cleared because input was empty.
    pub const DATA_CLEARED: Self = Self(1 << 1);
    /// The pointer entered a layer.
    pub const LAYER_ENTERED: Self = Self(1 << 2);
    /// The pointer left a layer.
    pub const LAYER_LEFT: Self = Self(1 << 3);
    /// The pointer moved while a layer is hovered.
    pub const POINTER_MOVED: Self = Self(1 << 4);
    /// The chart was written to a file.
    pub const EXPORT: Self = Self(1 << 5);

    pub const ALL: Self = Self(u32::MAX);

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for EventKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EventKind {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        if *self == EventKind::ALL {
            return write!(f, "ALL");
        }
        let pairs: &[(EventKind, &str)] = &[
            (EventKind::DATA_UPDATED, "DATA_UPDATED"),
            (EventKind::DATA_CLEARED, "DATA_CLEARED"),
            (EventKind::LAYER_ENTERED, "LAYER_ENTERED"),
            (EventKind::LAYER_LEFT, "LAYER_LEFT"),
            (EventKind::POINTER_MOVED, "POINTER_MOVED"),
            (EventKind::EXPORT, "EXPORT"),
        ];
        let mut names = Vec::new();
        let mut known_bits = 0;
        for (kind, name) in pairs {
            known_bits |= kind.0;
            if self.contains(*kind) {
                names.push((*name).to_string());
            }
        }
        let extra = self.0 & !known_bits;
        if extra != 0 {
            names.push(format!("0x{:x}", extra));
        }
        write!(f, "{}", names.join("|"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ChartEvent
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ChartEvent {
    pub kinds: EventKind,
    /// Series entered (for `LAYER_ENTERED`) or currently hovered (for `POINTER_MOVED`).
    pub series: Option<SeriesId>,
    /// Series whose hover ended (for `LAYER_LEFT`).
    pub previous: Option<SeriesId>,
    /// Pointer position in surface coordinates.
    pub pointer: Option<[f32; 2]>,
    /// Number of layers drawn (for `DATA_UPDATED`).
    pub layer_count: Option<usize>,
    /// Export format and path (for `EXPORT`).
    pub export: Option<(String, String)>,
}

impl ChartEvent {
    pub fn new(kinds: EventKind) -> Self {
        Self {
            kinds,
            series: None,
            previous: None,
            pointer: None,
            layer_count: None,
            export: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventFilter
// ─────────────────────────────────────────────────────────────────────────────

/// OR-mask selecting which categories a subscriber receives.
#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub mask: EventKind,
}

impl EventFilter {
    pub const fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    pub const fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    #[inline]
    pub fn matches(&self, event: &ChartEvent) -> bool {
        event.kinds.intersects(self.mask)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventController
// ─────────────────────────────────────────────────────────────────────────────

struct Subscriber {
    filter: EventFilter,
    sender: Sender<ChartEvent>,
}

/// Collects chart events and fans them out to subscribers.
///
/// Cloning yields another handle to the same subscriber list.
#[derive(Clone, Default)]
pub struct EventController {
    inner: Arc<Mutex<Vec<Subscriber>>>,
}

impl EventController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events matching `filter`.
    pub fn subscribe(&self, filter: EventFilter) -> Receiver<ChartEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        if let Ok(mut subs) = self.inner.lock() {
            subs.push(Subscriber { filter, sender: tx });
        }
        rx
    }

    pub fn subscribe_all(&self) -> Receiver<ChartEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Deliver `event` to every matching subscriber, dropping closed channels.
    pub fn emit(&self, event: ChartEvent) {
        let Ok(mut subs) = self.inner.lock() else {
            return;
        };
        subs.retain(|sub| !sub.filter.matches(&event) || sub.sender.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().map(|s| s.len()).unwrap_or(0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_union_and_intersection() {
        let combined = EventKind::LAYER_ENTERED | EventKind::LAYER_LEFT;
        assert!(combined.contains(EventKind::LAYER_LEFT));
        assert!(combined.intersects(EventKind::LAYER_ENTERED));
        assert!(!EventKind::EXPORT.intersects(combined));
    }

    #[test]
    fn display_lists_flag_names() {
        let k = EventKind::LAYER_ENTERED | EventKind::LAYER_LEFT;
        assert_eq!(k.to_string(), "LAYER_ENTERED|LAYER_LEFT");
        assert_eq!(EventKind(0).to_string(), "EMPTY");
    }

    #[test]
    fn closed_subscribers_are_dropped_on_emit() {
        let ctrl = EventController::new();
        let rx = ctrl.subscribe_all();
        drop(rx);
        ctrl.emit(ChartEvent::new(EventKind::DATA_UPDATED));
        assert_eq!(ctrl.subscriber_count(), 0);
    }
}

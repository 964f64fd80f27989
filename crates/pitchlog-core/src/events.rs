// Event log: the ordered, undoable list of scouted events for one session,
// plus the place -> drag -> commit gesture that creates them.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::notify::Notifier;
use crate::pitch::markings::Segment;
use crate::pitch::{PitchMapper, PixelPoint, RelativePoint};
use crate::pointer::{PointerEvent, PointerKind};
use crate::xmodel;

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// What happened at a logged position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ShotOn,
    ShotOff,
    Goal,
    Assist,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::ShotOn,
        EventKind::ShotOff,
        EventKind::Goal,
        EventKind::Assist,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ShotOn => "shot_on",
            EventKind::ShotOff => "shot_off",
            EventKind::Goal => "goal",
            EventKind::Assist => "assist",
        }
    }

    pub fn from_str_kind(s: &str) -> Option<Self> {
        EventKind::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Human-readable label for pickers and lists.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::ShotOn => "Shot on target",
            EventKind::ShotOff => "Shot off target",
            EventKind::Goal => "Goal",
            EventKind::Assist => "Assist",
        }
    }

    /// Shots carry an xG value; assists carry xA.
    pub fn is_shot(&self) -> bool {
        !matches!(self, EventKind::Assist)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One logged event. Positions are half-pitch relative coordinates; pixels
/// never leave the gesture handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub start: RelativePoint,
    pub end: Option<RelativePoint>,
    pub kind: EventKind,
    pub xg: Option<f64>,
    pub xa: Option<f64>,
}

impl Event {
    /// Create an event at `start`, computing the value that applies to
    /// `kind` once. Later changes to `end` never touch it.
    pub fn new(kind: EventKind, start: RelativePoint) -> Self {
        let (xg, xa) = if kind.is_shot() {
            (Some(xmodel::xg(start)), None)
        } else {
            (None, Some(xmodel::xa(start)))
        };
        Event {
            start,
            end: None,
            kind,
            xg,
            xa,
        }
    }
}

/// Info label for the most recent event: `xG: 0.42`, `xA: 0.15`, or
/// `xG/xA: --` when there is nothing to show.
pub fn value_label(event: Option<&Event>) -> String {
    match event {
        Some(Event { xg: Some(xg), .. }) => format!("xG: {xg:.2}"),
        Some(Event { xa: Some(xa), .. }) => format!("xA: {xa:.2}"),
        _ => "xG/xA: --".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Aggregates over a log. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionSummary {
    pub goals: u32,
    pub assists: u32,
    /// Shots on target, goals included.
    pub shots_on: u32,
    pub shots_off: u32,
    pub total_xg: f64,
    pub total_xa: f64,
}

impl SessionSummary {
    pub fn total_shots(&self) -> u32 {
        self.shots_on + self.shots_off
    }
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Change notifications emitted by [`EventLog`].
#[derive(Debug, Clone, PartialEq)]
pub enum LogChange {
    /// A pointer-down appended an in-progress event at `index`.
    Placed { index: usize },
    /// The in-progress event at `index` went through its pointer-up.
    Committed { index: usize },
    /// An in-progress event was removed by undo.
    Cancelled,
    /// The most recent committed event was removed by undo.
    Undone,
    Cleared,
    Restored { count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// The last event in the log is in progress. `preview` is the most
    /// recent pointer-move position, if any.
    Placed { preview: Option<PixelPoint> },
}

#[derive(Debug)]
pub struct EventLog {
    events: Vec<Event>,
    gesture: Gesture,
    notifier: Notifier<LogChange>,
}

impl Default for EventLog {
    fn default() -> Self {
        EventLog {
            events: Vec::new(),
            gesture: Gesture::Idle,
            notifier: Notifier::new(),
        }
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<LogChange> {
        self.notifier.subscribe()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Whether an event is between its pointer-down and pointer-up.
    pub fn is_placing(&self) -> bool {
        matches!(self.gesture, Gesture::Placed { .. })
    }

    /// Start a new event at `at`. Ignored (returns `false`) while another
    /// event is in progress or when `at` is off the pitch.
    pub fn pointer_down(&mut self, mapper: &PitchMapper, at: PixelPoint, kind: EventKind) -> bool {
        if self.is_placing() {
            debug!("pointer down ignored: event already in progress");
            return false;
        }
        let Some(rel) = mapper.to_relative(at) else {
            return false;
        };

        let event = Event::new(kind, rel);
        info!(
            "placed {} at ({:.3}, {:.3}) xg={:?} xa={:?}",
            kind.as_str(),
            rel.rx,
            rel.ry,
            event.xg,
            event.xa
        );
        self.events.push(event);
        self.gesture = Gesture::Placed { preview: None };
        let index = self.events.len() - 1;
        self.notifier.emit(LogChange::Placed { index });
        true
    }

    /// Track the drag preview. Never mutates the in-progress event.
    pub fn pointer_move(&mut self, at: PixelPoint) -> bool {
        match &mut self.gesture {
            Gesture::Placed { preview } => {
                *preview = Some(at);
                true
            }
            Gesture::Idle => false,
        }
    }

    /// Finish the in-progress event. A release inside the pitch at a point
    /// other than the start sets the direction target; a release outside,
    /// or a plain tap, leaves it absent for good. A release exactly at the
    /// press point is a tap: `end` stays `None` instead of repeating `start`.
    pub fn pointer_up(&mut self, mapper: &PitchMapper, at: PixelPoint) -> bool {
        if !self.is_placing() {
            return false;
        }
        self.gesture = Gesture::Idle;

        let index = self.events.len().saturating_sub(1);
        if let Some(event) = self.events.last_mut() {
            match mapper.to_relative(at) {
                Some(rel) if rel != event.start => {
                    event.end = Some(rel);
                    debug!("event {index} directed to ({:.3}, {:.3})", rel.rx, rel.ry);
                }
                Some(_) => {}
                None => debug!("event {index} released off pitch, no direction"),
            }
        }
        self.notifier.emit(LogChange::Committed { index });
        true
    }

    /// Route a pointer sample to the matching gesture step.
    pub fn handle_pointer(
        &mut self,
        mapper: &PitchMapper,
        event: PointerEvent,
        kind: EventKind,
    ) -> bool {
        match event.kind {
            PointerKind::Down => self.pointer_down(mapper, event.at, kind),
            PointerKind::Move => self.pointer_move(event.at),
            PointerKind::Up => self.pointer_up(mapper, event.at),
        }
    }

    /// Transient drag line from the in-progress event to the pointer, in the
    /// mapper's current pixel space.
    pub fn preview_line(&self, mapper: &PitchMapper) -> Option<Segment> {
        let Gesture::Placed { preview: Some(to) } = self.gesture else {
            return None;
        };
        let start = self.events.last()?.start;
        Some(Segment {
            from: mapper.to_absolute(start),
            to,
        })
    }

    /// Remove the most recent event. An in-progress event is cancelled
    /// outright. Returns `false` when there was nothing to remove.
    pub fn undo(&mut self) -> bool {
        if self.is_placing() {
            self.events.pop();
            self.gesture = Gesture::Idle;
            info!("cancelled in-progress event");
            self.notifier.emit(LogChange::Cancelled);
            return true;
        }
        match self.events.pop() {
            Some(event) => {
                info!("undid {} ({} left)", event.kind.as_str(), self.events.len());
                self.notifier.emit(LogChange::Undone);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        let count = self.events.len();
        self.events.clear();
        self.gesture = Gesture::Idle;
        info!("cleared {count} events");
        self.notifier.emit(LogChange::Cleared);
    }

    /// Replace the log with previously committed events, e.g. after a crash.
    pub fn restore(&mut self, events: Vec<Event>) {
        let count = events.len();
        self.events = events;
        self.gesture = Gesture::Idle;
        info!("restored {count} events");
        self.notifier.emit(LogChange::Restored { count });
    }

    /// Counts and expected-value totals over the whole log.
    pub fn summarize(&self) -> SessionSummary {
        let mut s = SessionSummary::default();
        for event in &self.events {
            match event.kind {
                EventKind::Goal => {
                    s.goals += 1;
                    s.shots_on += 1;
                }
                EventKind::ShotOn => s.shots_on += 1,
                EventKind::ShotOff => s.shots_off += 1,
                EventKind::Assist => s.assists += 1,
            }
            if event.kind.is_shot() {
                s.total_xg += event.xg.unwrap_or(0.0);
            } else {
                s.total_xa += event.xa.unwrap_or(0.0);
            }
        }
        s
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Messages flowing from the terminal input layer into the App.

use pitchlog_core::events::EventKind;
use pitchlog_core::pointer::PointerEvent;

/// Which pitch widget a pointer sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchTarget {
    /// Full pitch: position picker.
    Full,
    /// Attacking half: event logger.
    Half,
}

/// Commands produced by the input layer and applied by [`crate::app::App`].
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Switch the kind used for the next placed event.
    SelectKind(EventKind),
    CycleFormation,
    CycleRole,
    CycleGameType,
    /// Move the session date by whole days.
    ShiftDate { days: i64 },
    /// Move the session time by minutes.
    ShiftTime { minutes: i64 },
    Deselect,
    Undo,
    /// Remove every event. Only sent after the user confirmed.
    Clear,
    Save,
    Quit,
    /// A pointer sample already translated into the target widget's pixel space.
    Pointer {
        target: PitchTarget,
        event: PointerEvent,
    },
}

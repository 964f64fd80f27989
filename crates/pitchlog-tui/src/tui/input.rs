// Keyboard and mouse input handling.
//
// Keys become UserCommands or local ViewState changes (confirmation
// prompts). Mouse events are translated from terminal cells into the pixel
// space of the pitch they belong to, using the viewports of the last frame.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use pitchlog_core::events::EventKind;
use pitchlog_core::pointer::PointerEvent;

use super::ViewState;
use crate::protocol::{PitchTarget, UserCommand};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be applied by the
/// App. Returns `None` when the key was consumed locally (entering or
/// cancelling a confirmation) or is unbound.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.confirm_clear {
        return handle_confirm_clear(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            Some(UserCommand::SelectKind(EventKind::ALL[idx]))
        }
        KeyCode::Char('f') => Some(UserCommand::CycleFormation),
        KeyCode::Char('r') => Some(UserCommand::CycleRole),
        KeyCode::Char('g') => Some(UserCommand::CycleGameType),
        KeyCode::Char('d') => Some(UserCommand::ShiftDate { days: 1 }),
        KeyCode::Char('D') => Some(UserCommand::ShiftDate { days: -1 }),
        KeyCode::Char('h') => Some(UserCommand::ShiftTime { minutes: 60 }),
        KeyCode::Char('H') => Some(UserCommand::ShiftTime { minutes: -60 }),
        KeyCode::Char('m') => Some(UserCommand::ShiftTime { minutes: 1 }),
        KeyCode::Char('M') => Some(UserCommand::ShiftTime { minutes: -1 }),
        KeyCode::Esc => Some(UserCommand::Deselect),
        KeyCode::Char('u') => Some(UserCommand::Undo),
        KeyCode::Char('s') => Some(UserCommand::Save),

        // Destructive or terminal actions ask first
        KeyCode::Char('c') => {
            view_state.confirm_clear = true;
            None
        }
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// `y` or `q` confirms, `n` or `Esc` cancels, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// `y` confirms, `n` or `Esc` cancels, everything else is blocked.
fn handle_confirm_clear(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            view_state.confirm_clear = false;
            Some(UserCommand::Clear)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_clear = false;
            None
        }
        _ => None,
    }
}

/// Handle a mouse event.
///
/// A left press on the full pitch is a position pick. A left press on the
/// half pitch starts an event; the drag and the release that follow are
/// routed to the half pitch wherever the cursor is.
///
/// While a confirmation prompt is open no new press is accepted, but a drag
/// that started before the prompt still runs to its release.
pub fn handle_mouse(mouse_event: MouseEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let prompt_open = view_state.confirm_quit || view_state.confirm_clear;
    let (column, row) = (mouse_event.column, mouse_event.row);

    match mouse_event.kind {
        MouseEventKind::Down(_) if prompt_open => None,
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(vp) = view_state.full_pitch.filter(|vp| vp.contains_cell(column, row)) {
                let at = vp.to_pixel(column, row);
                return Some(UserCommand::Pointer {
                    target: PitchTarget::Full,
                    event: PointerEvent::down(at.x, at.y),
                });
            }
            let vp = view_state.half_pitch.filter(|vp| vp.contains_cell(column, row))?;
            let at = vp.to_pixel(column, row);
            view_state.dragging = true;
            Some(half(PointerEvent::down(at.x, at.y)))
        }
        MouseEventKind::Drag(MouseButton::Left) if view_state.dragging => {
            let at = view_state.half_pitch?.to_pixel(column, row);
            Some(half(PointerEvent::moved(at.x, at.y)))
        }
        MouseEventKind::Up(MouseButton::Left) if view_state.dragging => {
            view_state.dragging = false;
            let at = view_state.half_pitch?.to_pixel(column, row);
            Some(half(PointerEvent::up(at.x, at.y)))
        }
        _ => None,
    }
}

fn half(event: PointerEvent) -> UserCommand {
    UserCommand::Pointer {
        target: PitchTarget::Half,
        event,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

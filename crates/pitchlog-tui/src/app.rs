// Application state and orchestration logic.
//
// One capture screen: the two pitch mappers, the position selection, the
// event log and the session metadata. Commands from the input layer are
// applied synchronously; change notifications from the core are drained
// right after each command to keep the session metadata and the SQLite
// journal in step with the log.

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use pitchlog_core::config::Config;
use pitchlog_core::db::Database;
use pitchlog_core::events::{EventKind, EventLog, LogChange};
use pitchlog_core::formation;
use pitchlog_core::pitch::{Bounds, PitchKind, PitchMapper};
use pitchlog_core::pointer::PointerKind;
use pitchlog_core::selection::{SelectionChange, SelectionState};
use pitchlog_core::session::{self, GameType, SessionMeta, SessionRecord};

use crate::protocol::{PitchTarget, UserCommand};

// ---------------------------------------------------------------------------
// Screen state persistence
// ---------------------------------------------------------------------------

/// Key in the `session_state` table holding [`ScreenState`].
pub const SCREEN_STATE_KEY: &str = "screen";

/// The screen choices that survive a restart alongside the journalled events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenState {
    pub formation: String,
    pub selected: Option<String>,
    pub role: Option<String>,
    pub game_type: GameType,
    pub event_kind: EventKind,
    /// Session start. Absent in state written before it was tracked.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<NaiveTime>,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub config: Config,
    pub db: Database,
    /// Journal key for the events of this screen.
    pub session_id: String,
    pub full_pitch: PitchMapper,
    pub half_pitch: PitchMapper,
    pub selection: SelectionState,
    pub log: EventLog,
    pub meta: SessionMeta,
    /// Kind given to the next placed event.
    pub event_kind: EventKind,
    /// Last transient message for the status bar.
    pub status: Option<String>,
    selection_rx: mpsc::UnboundedReceiver<SelectionChange>,
    log_rx: mpsc::UnboundedReceiver<LogChange>,
}

impl App {
    pub fn new(config: Config, db: Database, session_id: String) -> Self {
        let mut selection = SelectionState::new(&config.session.formation);
        let mut log = EventLog::new();
        let selection_rx = selection.subscribe();
        let log_rx = log.subscribe();
        let meta = SessionMeta::now(config.session.game_type);
        let event_kind = config.session.event_kind;

        App {
            config,
            db,
            session_id,
            full_pitch: PitchMapper::new(PitchKind::Full),
            half_pitch: PitchMapper::new(PitchKind::Half),
            selection,
            log,
            meta,
            event_kind,
            status: None,
            selection_rx,
            log_rx,
        }
    }

    /// Apply one command. Returns `true` when the app should exit.
    pub fn handle_command(&mut self, cmd: UserCommand) -> bool {
        let mut screen_changed = false;
        match cmd {
            UserCommand::SelectKind(kind) => {
                debug!("event kind set to {}", kind.as_str());
                self.event_kind = kind;
                screen_changed = true;
            }
            UserCommand::CycleFormation => {
                let formation = self.selection.cycle_formation();
                self.status = Some(format!("Formation {formation}"));
                screen_changed = true;
            }
            UserCommand::CycleRole => {
                self.cycle_role();
                screen_changed = true;
            }
            UserCommand::CycleGameType => {
                self.meta.game_type = self.meta.game_type.next();
                info!("game type set to {}", self.meta.game_type);
                screen_changed = true;
            }
            UserCommand::ShiftDate { days } => {
                self.meta.shift_date(days);
                self.status = Some(format!("Date {}", self.meta.date.format("%Y-%m-%d")));
                screen_changed = true;
            }
            UserCommand::ShiftTime { minutes } => {
                self.meta.shift_time(minutes);
                self.status = Some(format!("Time {}", self.meta.time.format("%H:%M:%S")));
                screen_changed = true;
            }
            UserCommand::Deselect => {
                self.selection.deselect();
                screen_changed = true;
            }
            UserCommand::Undo => {
                let message = if self.log.undo() {
                    "Last event removed"
                } else {
                    "Nothing to undo"
                };
                self.status = Some(message.to_string());
            }
            UserCommand::Clear => {
                self.log.clear();
                self.status = Some("All data cleared".to_string());
            }
            UserCommand::Save => {
                self.save_session();
            }
            UserCommand::Quit => {
                info!("quit requested");
                return true;
            }
            UserCommand::Pointer { target, event } => match target {
                PitchTarget::Full => {
                    if event.kind == PointerKind::Down {
                        let radius = self.config.pitch.slot_hit_radius;
                        if self.selection.select_at(&self.full_pitch, event.at, radius).is_some() {
                            screen_changed = true;
                        }
                    }
                }
                PitchTarget::Half => {
                    self.log.handle_pointer(&self.half_pitch, event, self.event_kind);
                }
            },
        }
        // Selection changes may rewrite the role, so drain before persisting.
        if self.drain_updates() {
            screen_changed = true;
        }
        if screen_changed {
            self.persist_screen();
        }
        false
    }

    /// Fit both pitches to their widget bounds. Idempotent for equal bounds.
    pub fn resize(&mut self, full: Bounds, half: Bounds) {
        if self.full_pitch.resize(full) {
            debug!("full pitch rect now {:?}", self.full_pitch.rect());
        }
        if self.half_pitch.resize(half) {
            debug!("half pitch rect now {:?}", self.half_pitch.rect());
        }
    }

    /// Process pending core notifications. Returns `true` when the selection
    /// changed.
    pub fn drain_updates(&mut self) -> bool {
        let mut selection_changed = false;
        while let Ok(change) = self.selection_rx.try_recv() {
            selection_changed = true;
            self.meta.role = match change {
                SelectionChange::Selected(name) => {
                    formation::role_options(&name).first().map(|role| role.to_string())
                }
                SelectionChange::Cleared => None,
            };
        }
        while let Ok(change) = self.log_rx.try_recv() {
            if let Err(e) = self.journal(&change) {
                warn!("journal update failed for {change:?}: {e:#}");
            }
        }
        selection_changed
    }

    /// Mirror one log change into the SQLite journal. Only committed events
    /// are written.
    fn journal(&self, change: &LogChange) -> anyhow::Result<()> {
        match change {
            LogChange::Committed { index } => {
                if let Some(event) = self.log.events().get(*index) {
                    self.db.record_event(&self.session_id, *index, event)?;
                }
            }
            LogChange::Undone => {
                self.db.remove_last_event(&self.session_id)?;
            }
            LogChange::Cleared => self.db.clear_session(&self.session_id)?,
            LogChange::Placed { .. } | LogChange::Cancelled | LogChange::Restored { .. } => {}
        }
        Ok(())
    }

    /// Advance to the next role label of the selected slot, wrapping around.
    pub fn cycle_role(&mut self) {
        let options = self.selection.role_options();
        if options.is_empty() {
            self.status = Some("Select a position first".to_string());
            return;
        }
        let current = self
            .meta
            .role
            .as_deref()
            .and_then(|role| options.iter().position(|o| *o == role));
        let next = match current {
            Some(i) => options[(i + 1) % options.len()],
            None => options[0],
        };
        info!("role set to {next}");
        self.meta.role = Some(next.to_string());
    }

    /// Export the current session. The log is left untouched.
    pub fn save_session(&mut self) {
        let record = SessionRecord::build(&self.meta, &self.selection, &self.log);
        match session::export(&self.config.history_dir(), &self.config.user.id, &record) {
            Ok(path) => {
                info!("session saved to {}", path.display());
                self.status = Some(format!("Stats saved to {}", record.file_name()));
            }
            Err(e) => {
                warn!("session export failed: {e:#}");
                self.status = Some(format!("Error saving file: {e:#}"));
            }
        }
    }

    pub fn screen_state(&self) -> ScreenState {
        ScreenState {
            formation: self.selection.formation().to_string(),
            selected: self.selection.selected().map(str::to_string),
            role: self.meta.role.clone(),
            game_type: self.meta.game_type,
            event_kind: self.event_kind,
            date: Some(self.meta.date),
            time: Some(self.meta.time),
        }
    }

    fn persist_screen(&self) {
        let result = serde_json::to_value(self.screen_state())
            .context("failed to serialize screen state")
            .and_then(|value| self.db.save_state(SCREEN_STATE_KEY, &value));
        if let Err(e) = result {
            warn!("failed to persist screen state: {e:#}");
        }
    }

    /// Re-apply saved screen choices. Unknown formations, slots or roles are
    /// dropped in favour of the defaults.
    pub fn apply_screen_state(&mut self, state: &ScreenState) {
        self.selection.set_formation(&state.formation);
        if let Some(slot) = &state.selected {
            self.selection.select(slot);
        }
        self.drain_updates();
        if let Some(role) = &state.role {
            if self.selection.role_options().contains(&role.as_str()) {
                self.meta.role = Some(role.clone());
            }
        }
        self.meta.game_type = state.game_type;
        self.event_kind = state.event_kind;
        if let Some(date) = state.date {
            self.meta.date = date;
        }
        if let Some(time) = state.time {
            self.meta.time = time;
        }
    }
}

// ---------------------------------------------------------------------------
// Crash recovery
// ---------------------------------------------------------------------------

/// Restore the screen and any journalled events for `app.session_id`.
/// A first run stores the screen straight away so the session start time
/// survives a restart.
///
/// Returns `true` when events were restored.
pub fn recover_from_db(app: &mut App) -> anyhow::Result<bool> {
    match app.db.load_state(SCREEN_STATE_KEY)? {
        Some(value) => match serde_json::from_value::<ScreenState>(value) {
            Ok(state) => app.apply_screen_state(&state),
            Err(e) => warn!("ignoring unreadable screen state: {e}"),
        },
        None => app.persist_screen(),
    }

    if !app.db.has_session_in_progress(&app.session_id)? {
        info!("No events journalled for session_id={}, starting fresh", app.session_id);
        return Ok(false);
    }

    let events = app
        .db
        .load_events(&app.session_id)
        .context("failed to load journalled events")?;
    info!(
        "Crash recovery: restoring {} events for session_id={}",
        events.len(),
        app.session_id
    );
    app.log.restore(events);
    app.drain_updates();
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

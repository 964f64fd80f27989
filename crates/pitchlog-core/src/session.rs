// Session metadata and the exported session record.
//
// The record layout is a durable contract read by other tooling: field
// names, their order, and `null` for a missing drag target must not change.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::events::{Event, EventKind, EventLog};
use crate::selection::SelectionState;

/// Placeholder written for a position or role that was never chosen.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Game type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameType {
    #[serde(rename = "Fun Game")]
    FunGame,
    Training,
    #[default]
    Match,
}

impl GameType {
    pub const ALL: [GameType; 3] = [GameType::FunGame, GameType::Training, GameType::Match];

    pub fn label(&self) -> &'static str {
        match self {
            GameType::FunGame => "Fun Game",
            GameType::Training => "Training",
            GameType::Match => "Match",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        GameType::ALL.into_iter().find(|g| g.label() == s)
    }

    pub fn next(&self) -> Self {
        match self {
            GameType::FunGame => GameType::Training,
            GameType::Training => GameType::Match,
            GameType::Match => GameType::FunGame,
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Everything about a session that is not on the pitch.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMeta {
    pub game_type: GameType,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub role: Option<String>,
}

impl SessionMeta {
    /// Metadata stamped with the current local date and time, to the second.
    pub fn now(game_type: GameType) -> Self {
        let now = chrono::Local::now().naive_local();
        SessionMeta {
            game_type,
            date: now.date(),
            time: now.time().with_nanosecond(0).unwrap_or(now.time()),
            role: None,
        }
    }

    pub fn started_at(&self) -> NaiveDateTime {
        NaiveDateTime::new(self.date, self.time)
    }

    /// Move the session date by `days`. Out-of-range results are ignored.
    pub fn shift_date(&mut self, days: i64) {
        if let Some(date) = self.date.checked_add_signed(Duration::days(days)) {
            self.date = date;
        }
    }

    /// Move the session time by `minutes`, wrapping at midnight without
    /// touching the date.
    pub fn shift_time(&mut self, minutes: i64) {
        self.time = self.time.overflowing_add_signed(Duration::minutes(minutes)).0;
    }
}

// ---------------------------------------------------------------------------
// Exported record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_info: SessionInfo,
    pub stats: SessionStats,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub game_type: GameType,
    pub formation: String,
    pub position: String,
    pub role: String,
    pub date: NaiveDate,
    #[serde(with = "hms")]
    pub time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub goals: u32,
    pub assists: u32,
    pub shots_on_target: u32,
    pub shots_off_target: u32,
    pub total_xg: f64,
    pub total_xa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub rel_pos: [f64; 2],
    /// Serialized as `null` when the event has no drag target.
    pub rel_end_pos: Option<[f64; 2]>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub xg: Option<f64>,
    pub xa: Option<f64>,
}

impl From<&Event> for EventRecord {
    fn from(e: &Event) -> Self {
        EventRecord {
            rel_pos: e.start.as_array(),
            rel_end_pos: e.end.map(|p| p.as_array()),
            kind: e.kind,
            xg: e.xg,
            xa: e.xa,
        }
    }
}

impl SessionRecord {
    /// Snapshot the current screen state into an exportable record.
    pub fn build(meta: &SessionMeta, selection: &SelectionState, log: &EventLog) -> Self {
        let summary = log.summarize();
        SessionRecord {
            session_info: SessionInfo {
                game_type: meta.game_type,
                formation: selection.formation().to_string(),
                position: selection.selected().unwrap_or(NOT_AVAILABLE).to_string(),
                role: meta.role.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                date: meta.date,
                time: meta.time,
            },
            stats: SessionStats {
                goals: summary.goals,
                assists: summary.assists,
                shots_on_target: summary.shots_on,
                shots_off_target: summary.shots_off,
                total_xg: summary.total_xg,
                total_xa: summary.total_xa,
            },
            events: log.events().iter().map(EventRecord::from).collect(),
        }
    }

    /// `session_YYYYMMDD_HHMMSS.json`, from the session's own date and time.
    pub fn file_name(&self) -> String {
        NaiveDateTime::new(self.session_info.date, self.session_info.time)
            .format("session_%Y%m%d_%H%M%S.json")
            .to_string()
    }
}

mod hms {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// File export
// ---------------------------------------------------------------------------

/// A user id is used as a directory name, so it must be a single, ordinary
/// path component.
pub fn is_valid_user_id(id: &str) -> bool {
    !id.trim().is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && !id.contains('\0')
}

/// Write `record` to `<history_dir>/<user_id>/session_YYYYMMDD_HHMMSS.json`
/// as 4-space indented JSON, creating directories as needed. Returns the
/// path written.
pub fn export(history_dir: &Path, user_id: &str, record: &SessionRecord) -> Result<PathBuf> {
    if !is_valid_user_id(user_id) {
        bail!("invalid user id {user_id:?}");
    }
    let dir = history_dir.join(user_id);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create history directory {}", dir.display()))?;

    let path = dir.join(record.file_name());
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record
        .serialize(&mut ser)
        .context("failed to serialize session record")?;

    fs::write(&path, &buf).with_context(|| format!("failed to write {}", path.display()))?;
    info!("saved {} events to {}", record.events.len(), path.display());
    Ok(path)
}

/// Load a record written by [`export`].
pub fn read_record(path: &Path) -> Result<SessionRecord> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::RelativePoint;

    fn meta() -> SessionMeta {
        SessionMeta {
            game_type: GameType::FunGame,
            date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            time: NaiveTime::from_hms_opt(18, 30, 5).unwrap(),
            role: None,
        }
    }

    fn sample_log() -> EventLog {
        let mut goal = Event::new(EventKind::Goal, RelativePoint::new(0.5, 0.0));
        goal.end = Some(RelativePoint::new(0.5, 0.25));
        let assist = Event::new(EventKind::Assist, RelativePoint::new(0.5, 0.4));
        let mut log = EventLog::new();
        log.restore(vec![goal, assist]);
        log
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("pitchlog_session_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn game_type_labels_and_cycle() {
        assert_eq!(serde_json::to_string(&GameType::FunGame).unwrap(), "\"Fun Game\"");
        assert_eq!(GameType::from_label("Training"), Some(GameType::Training));
        assert_eq!(GameType::from_label("Cup"), None);
        assert_eq!(GameType::Match.next(), GameType::FunGame);
        assert_eq!(GameType::default(), GameType::Match);
    }

    #[test]
    fn shift_date_moves_by_whole_days() {
        let mut m = meta();
        m.shift_date(1);
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2024, 5, 18).unwrap());
        m.shift_date(-31);
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2024, 4, 17).unwrap());
        assert_eq!(m.time, meta().time);
    }

    #[test]
    fn shift_time_wraps_without_changing_date() {
        let mut m = meta();
        m.shift_time(-60);
        assert_eq!(m.time, NaiveTime::from_hms_opt(17, 30, 5).unwrap());
        m.shift_time(7 * 60);
        assert_eq!(m.time, NaiveTime::from_hms_opt(0, 30, 5).unwrap());
        assert_eq!(m.date, meta().date);
    }

    #[test]
    fn record_defaults_to_not_available() {
        let selection = SelectionState::new("4-3-3");
        let record = SessionRecord::build(&meta(), &selection, &EventLog::new());
        assert_eq!(record.session_info.position, "N/A");
        assert_eq!(record.session_info.role, "N/A");
        assert_eq!(record.session_info.formation, "4-3-3");
        assert!(record.events.is_empty());
    }

    #[test]
    fn record_json_shape() {
        let mut selection = SelectionState::new("4-4-2");
        selection.select("GK");
        let mut m = meta();
        m.role = Some("Sweeper Keeper".into());

        let record = SessionRecord::build(&m, &selection, &sample_log());
        let json = serde_json::to_value(&record).unwrap();

        let info = &json["session_info"];
        assert_eq!(info["game_type"], "Fun Game");
        assert_eq!(info["position"], "GK");
        assert_eq!(info["role"], "Sweeper Keeper");
        assert_eq!(info["date"], "2024-05-17");
        assert_eq!(info["time"], "18:30:05");

        let stats = &json["stats"];
        assert_eq!(stats["goals"], 1);
        assert_eq!(stats["assists"], 1);
        assert_eq!(stats["shots_on_target"], 1);
        assert_eq!(stats["shots_off_target"], 0);

        let events = json["events"].as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["type"], "goal");
        assert_eq!(events[0]["rel_pos"], serde_json::json!([0.5, 0.0]));
        assert_eq!(events[0]["rel_end_pos"], serde_json::json!([0.5, 0.25]));
        assert_eq!(events[0]["xa"], serde_json::Value::Null);
        // A missing drag target is written as null, not omitted.
        let assist = events[1].as_object().unwrap();
        assert!(assist.contains_key("rel_end_pos"));
        assert!(assist["rel_end_pos"].is_null());
        assert!(assist["xg"].is_null());
    }

    #[test]
    fn file_name_uses_session_timestamp() {
        let record = SessionRecord::build(&meta(), &SelectionState::default(), &EventLog::new());
        assert_eq!(record.file_name(), "session_20240517_183005.json");
    }

    #[test]
    fn export_writes_indented_json_and_reads_back() {
        let dir = temp_dir("export");
        let record = SessionRecord::build(&meta(), &SelectionState::default(), &sample_log());

        let path = export(&dir, "alice", &record).unwrap();
        assert_eq!(path, dir.join("alice").join("session_20240517_183005.json"));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("{\n    \"session_info\": {\n        \"game_type\""));
        let back = read_record(&path).unwrap();
        assert_eq!(back.session_info, record.session_info);
        assert_eq!(back.stats.goals, 1);
        assert_eq!(back.events.len(), 2);
        assert_eq!(back.events[1].kind, EventKind::Assist);
        assert_eq!(back.events[1].rel_end_pos, None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_rejects_unsafe_user_ids() {
        let dir = temp_dir("unsafe");
        let record = SessionRecord::build(&meta(), &SelectionState::default(), &EventLog::new());
        for id in ["", "  ", "..", ".", "a/b", "a\\b"] {
            assert!(export(&dir, id, &record).is_err(), "{id:?} accepted");
        }
        assert!(!dir.exists());
    }

    #[test]
    fn read_record_reports_bad_json() {
        let dir = temp_dir("bad");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = read_record(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn meta_now_has_whole_seconds() {
        let m = SessionMeta::now(GameType::Training);
        assert_eq!(m.time.nanosecond(), 0);
        assert_eq!(m.started_at().date(), m.date);
    }
}

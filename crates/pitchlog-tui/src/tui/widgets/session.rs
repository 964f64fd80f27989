// Session details panel: game type, date, formation, position and role.

use pitchlog_core::events::EventKind;
use pitchlog_core::selection::SelectionState;
use pitchlog_core::session::{SessionMeta, NOT_AVAILABLE};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

/// Render the session details panel into the given area.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    meta: &SessionMeta,
    selection: &SelectionState,
    kind: EventKind,
) {
    let lines = build_session_lines(meta, selection, kind);
    let paragraph = Paragraph::new(lines).block(Block::bordered().title(" Session "));
    frame.render_widget(paragraph, area);
}

fn row(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<11}"), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    ])
}

/// One line per detail. Missing position or role show as "N/A", the same
/// placeholder the export uses.
pub fn build_session_lines(
    meta: &SessionMeta,
    selection: &SelectionState,
    kind: EventKind,
) -> Vec<Line<'static>> {
    vec![
        row("Game type", meta.game_type.to_string()),
        row("Date", meta.date.format("%Y-%m-%d").to_string()),
        row("Time", meta.time.format("%H:%M:%S").to_string()),
        row("Formation", selection.formation().to_string()),
        row("Position", selection.selected().unwrap_or(NOT_AVAILABLE).to_string()),
        row("Role", meta.role.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())),
        row("Logging", kind.label().to_string()),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pitchlog_core::session::GameType;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn lines_show_placeholders_without_selection() {
        let meta = SessionMeta::now(GameType::Training);
        let lines = build_session_lines(&meta, &SelectionState::default(), EventKind::Goal);
        assert_eq!(lines.len(), 7);
        assert!(line_text(&lines[0]).ends_with("Training"));
        assert!(line_text(&lines[4]).ends_with("N/A"));
        assert!(line_text(&lines[5]).ends_with("N/A"));
        assert!(line_text(&lines[6]).ends_with("Goal"));
    }

    #[test]
    fn lines_show_position_and_role() {
        let mut meta = SessionMeta::now(GameType::FunGame);
        let mut selection = SelectionState::new("3-5-2");
        selection.select("CDM");
        meta.role = Some("Anchor Man".to_string());
        let lines = build_session_lines(&meta, &selection, EventKind::ShotOn);
        assert!(line_text(&lines[0]).ends_with("Fun Game"));
        assert!(line_text(&lines[3]).ends_with("3-5-2"));
        assert!(line_text(&lines[4]).ends_with("CDM"));
        assert!(line_text(&lines[5]).ends_with("Anchor Man"));
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(40, 9);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let meta = SessionMeta::now(GameType::Match);
        let selection = SelectionState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &meta, &selection, EventKind::Assist))
            .unwrap();
    }
}

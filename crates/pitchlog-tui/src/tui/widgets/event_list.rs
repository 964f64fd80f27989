// Event list panel: logged events, newest first.

use pitchlog_core::events::Event;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem};
use ratatui::Frame;

use super::pitch::marker;

/// Render the event list into the given area. Only as many of the most
/// recent events as fit are shown.
pub fn render(frame: &mut Frame, area: Rect, events: &[Event]) {
    let block = Block::bordered().title(format!(" Events ({}) ", events.len()));
    let visible = usize::from(area.height.saturating_sub(2));

    let items: Vec<ListItem> = if events.is_empty() {
        vec![ListItem::new(Span::styled(
            "No events yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        events
            .iter()
            .enumerate()
            .rev()
            .take(visible)
            .map(|(i, e)| ListItem::new(event_line(i + 1, e)))
            .collect()
    };

    frame.render_widget(List::new(items).block(block), area);
}

/// One row: number, glyph, kind, value and a direction arrow when the
/// event has a target.
pub fn event_line(number: usize, event: &Event) -> Line<'static> {
    let (glyph, color) = marker(event.kind);
    let value = match (event.xg, event.xa) {
        (Some(xg), _) => format!("xG {xg:.2}"),
        (None, Some(xa)) => format!("xA {xa:.2}"),
        (None, None) => String::new(),
    };
    let mut spans = vec![
        Span::styled(format!("{number:>3} "), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{glyph} "), Style::default().fg(color)),
        Span::styled(format!("{:<16}", event.kind.label()), Style::default().fg(Color::White)),
        Span::raw(value),
    ];
    if event.end.is_some() {
        spans.push(Span::styled(" ->", Style::default().fg(Color::Gray)));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::test_util::{buffer_contains, buffer_lines};
    use pitchlog_core::events::EventKind;
    use pitchlog_core::pitch::RelativePoint;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn shot_line_shows_xg() {
        let e = Event::new(EventKind::ShotOff, RelativePoint::new(0.5, 0.2));
        let text = line_text(&event_line(3, &e));
        assert!(text.starts_with("  3 x Shot off target"));
        assert!(text.contains("xG "));
        assert!(!text.ends_with("->"));
    }

    #[test]
    fn assist_line_shows_xa_and_direction() {
        let mut e = Event::new(EventKind::Assist, RelativePoint::new(0.1, 0.1));
        e.end = Some(RelativePoint::new(0.5, 0.05));
        let text = line_text(&event_line(1, &e));
        assert!(text.contains("xA "));
        assert!(text.ends_with("->"));
    }

    #[test]
    fn newest_event_is_listed_first() {
        let events = vec![
            Event::new(EventKind::Goal, RelativePoint::new(0.5, 0.1)),
            Event::new(EventKind::Assist, RelativePoint::new(0.2, 0.1)),
        ];
        let backend = ratatui::backend::TestBackend::new(40, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &events))
            .unwrap();
        let lines = buffer_lines(&terminal);
        assert!(lines[0].contains("Events (2)"));
        assert!(lines[1].contains("Assist"));
        assert!(lines[2].contains("Goal"));
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let backend = ratatui::backend::TestBackend::new(30, 5);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, frame.area(), &[])).unwrap();
        assert!(buffer_contains(&terminal, "No events yet"));
    }
}

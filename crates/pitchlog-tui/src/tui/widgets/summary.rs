// Summary panel: counts and expected-value totals for the session.

use pitchlog_core::events::SessionSummary;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

/// Render the summary panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, summary: &SessionSummary) {
    let paragraph = Paragraph::new(build_summary_lines(summary))
        .block(Block::bordered().title(" Summary "));
    frame.render_widget(paragraph, area);
}

/// Format an expected-value total, e.g. "1.27".
pub fn format_total(value: f64) -> String {
    format!("{value:.2}")
}

pub fn build_summary_lines(s: &SessionSummary) -> Vec<Line<'static>> {
    let rows = [
        ("Goals", s.goals.to_string()),
        ("Assists", s.assists.to_string()),
        ("Shots on target", s.shots_on.to_string()),
        ("Shots off target", s.shots_off.to_string()),
        ("Total shots", s.total_shots().to_string()),
        ("Expected Goals (xG)", format_total(s.total_xg)),
        ("Expected Assists (xA)", format_total(s.total_xa)),
    ];
    rows.into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<22}"), Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{value:>6}"),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(line: &Line) -> String {
        line.spans[1].content.trim().to_string()
    }

    #[test]
    fn format_total_two_decimals() {
        assert_eq!(format_total(0.0), "0.00");
        assert_eq!(format_total(1.266), "1.27");
    }

    #[test]
    fn empty_summary_is_all_zero() {
        let lines = build_summary_lines(&SessionSummary::default());
        assert_eq!(lines.len(), 7);
        let values: Vec<String> = lines.iter().map(value_of).collect();
        assert_eq!(values, ["0", "0", "0", "0", "0", "0.00", "0.00"]);
    }

    #[test]
    fn total_shots_combines_on_and_off() {
        let summary = SessionSummary {
            goals: 1,
            assists: 2,
            shots_on: 3,
            shots_off: 4,
            total_xg: 0.5,
            total_xa: 0.25,
        };
        let lines = build_summary_lines(&summary);
        assert_eq!(value_of(&lines[4]), "7");
        assert_eq!(value_of(&lines[5]), "0.50");
        assert_eq!(value_of(&lines[6]), "0.25");
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(30, 9);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &SessionSummary::default()))
            .unwrap();
    }
}

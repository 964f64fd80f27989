// Status bar widget: active event kind and the last status message.

use pitchlog_core::events::EventKind;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::pitch::marker;

/// Render the status bar into the given area.
///
/// Layout: [app name] [kind selector] [status message]
pub fn render(frame: &mut Frame, area: Rect, active: EventKind, status: Option<&str>) {
    let mut spans = vec![Span::styled(
        " PITCHLOG ",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
    spans.extend(kind_spans(active));

    if let Some(message) = status {
        spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(message.to_string(), Style::default().fg(Color::Yellow)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Short selector label, e.g. "1:Shot on".
pub fn kind_label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::ShotOn => "1:Shot on",
        EventKind::ShotOff => "2:Shot off",
        EventKind::Goal => "3:Goal",
        EventKind::Assist => "4:Assist",
    }
}

/// One bracketed span per kind, the active one highlighted in its marker
/// colour. E.g. "[1:Shot on] [2:Shot off] [3:Goal] [4:Assist]"
pub fn kind_spans(active: EventKind) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for kind in EventKind::ALL {
        let style = if kind == active {
            let (_, color) = marker(kind);
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", kind_label(kind)), style));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

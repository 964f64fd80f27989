// Pitch canvases: the full pitch with formation slots and the attacking
// half with logged events.
//
// Both draw in the viewport's y-up pixel space, the same space the pitch
// mappers were fitted to, so geometry from the core goes straight onto the
// canvas.

use pitchlog_core::events::{self, EventKind, EventLog};
use pitchlog_core::formation;
use pitchlog_core::pitch::markings::{self, Markings};
use pitchlog_core::pitch::PitchMapper;
use pitchlog_core::selection::SelectionState;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle as CanvasCircle, Context, Line as CanvasLine, Points};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::tui::layout::Viewport;

const LINE_COLOR: Color = Color::White;
const PREVIEW_COLOR: Color = Color::Yellow;
/// Polyline resolution for arcs.
const ARC_SEGMENTS: usize = 24;

/// Glyph and colour for an event kind.
pub fn marker(kind: EventKind) -> (&'static str, Color) {
    match kind {
        EventKind::Goal => ("*", Color::Green),
        EventKind::ShotOn => ("o", Color::Cyan),
        EventKind::ShotOff => ("x", Color::Red),
        EventKind::Assist => ("#", Color::Magenta),
    }
}

fn draw_markings(ctx: &mut Context, m: &Markings) {
    for seg in &m.lines {
        ctx.draw(&CanvasLine::new(seg.from.x, seg.from.y, seg.to.x, seg.to.y, LINE_COLOR));
    }
    for circle in &m.circles {
        ctx.draw(&CanvasCircle {
            x: circle.center.x,
            y: circle.center.y,
            radius: circle.radius,
            color: LINE_COLOR,
        });
    }
    for arc in &m.arcs {
        let points = arc.sample(ARC_SEGMENTS);
        for pair in points.windows(2) {
            ctx.draw(&CanvasLine::new(pair[0].x, pair[0].y, pair[1].x, pair[1].y, LINE_COLOR));
        }
    }
    let spots: Vec<(f64, f64)> = m.spots.iter().map(|p| (p.x, p.y)).collect();
    ctx.draw(&Points {
        coords: &spots,
        color: LINE_COLOR,
    });
}

fn canvas_block(title: String) -> Block<'static> {
    Block::bordered().title(title)
}

// ---------------------------------------------------------------------------
// Full pitch
// ---------------------------------------------------------------------------

/// Render the position picker: markings plus every slot of the current
/// formation, the selected one highlighted.
pub fn render_full(
    frame: &mut Frame,
    area: Rect,
    viewport: &Viewport,
    mapper: &PitchMapper,
    selection: &SelectionState,
) {
    let rect = mapper.rect();
    let m = markings::for_kind(mapper.kind(), &rect);
    let slots = formation::slots_for(selection.formation());
    let selected = selection.selected();

    let canvas = Canvas::default()
        .block(canvas_block(format!(" Position ({}) ", selection.formation())))
        .marker(Marker::Braille)
        .x_bounds([0.0, viewport.width()])
        .y_bounds([0.0, viewport.height()])
        .paint(move |ctx| {
            draw_markings(ctx, &m);
            ctx.layer();
            for slot in slots {
                let p = mapper.to_absolute(slot.rel);
                let style = if Some(slot.name) == selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                // Centre the label on the slot; one unit per column.
                let x = p.x - slot.name.len() as f64 / 2.0;
                ctx.print(x, p.y, Span::styled(slot.name, style));
            }
        });
    frame.render_widget(canvas, area);
}

// ---------------------------------------------------------------------------
// Half pitch
// ---------------------------------------------------------------------------

/// Render the event logger: markings, events with their direction lines,
/// the drag preview and the value label of the latest event.
pub fn render_half(
    frame: &mut Frame,
    area: Rect,
    viewport: &Viewport,
    mapper: &PitchMapper,
    log: &EventLog,
) {
    let rect = mapper.rect();
    let m = markings::for_kind(mapper.kind(), &rect);
    let label = events::value_label(log.last());
    let preview = log.preview_line(mapper);

    let block = canvas_block(" Events ".to_string()).title_top(
        Line::from(format!(" {label} "))
            .style(Style::default().add_modifier(Modifier::BOLD))
            .right_aligned(),
    );

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, viewport.width()])
        .y_bounds([0.0, viewport.height()])
        .paint(move |ctx| {
            draw_markings(ctx, &m);
            ctx.layer();
            for event in log.events() {
                let (_, color) = marker(event.kind);
                if let Some(end) = event.end {
                    let from = mapper.to_absolute(event.start);
                    let to = mapper.to_absolute(end);
                    ctx.draw(&CanvasLine::new(from.x, from.y, to.x, to.y, color));
                }
            }
            if let Some(seg) = &preview {
                ctx.draw(&CanvasLine::new(
                    seg.from.x,
                    seg.from.y,
                    seg.to.x,
                    seg.to.y,
                    PREVIEW_COLOR,
                ));
            }
            for event in log.events() {
                let (glyph, color) = marker(event.kind);
                let p = mapper.to_absolute(event.start);
                ctx.print(
                    p.x - 0.5,
                    p.y,
                    Span::styled(glyph, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                );
            }
        });
    frame.render_widget(canvas, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::test_util::buffer_contains;
    use pitchlog_core::pitch::{PitchKind, RelativePoint};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn fitted(kind: PitchKind, area: Rect) -> (Viewport, PitchMapper) {
        let vp = Viewport::inside_border(area, 2.0);
        let mut mapper = PitchMapper::new(kind);
        mapper.resize(vp.bounds());
        (vp, mapper)
    }

    #[test]
    fn markers_are_distinct() {
        let glyphs: Vec<&str> = EventKind::ALL.iter().map(|k| marker(*k).0).collect();
        assert_eq!(glyphs, ["o", "x", "*", "#"]);
    }

    #[test]
    fn full_pitch_shows_formation_and_slots() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut selection = SelectionState::new("4-4-2");
        selection.select("GK");
        terminal
            .draw(|frame| {
                let area = frame.area();
                let (vp, mapper) = fitted(PitchKind::Full, area);
                render_full(frame, area, &vp, &mapper, &selection);
            })
            .unwrap();
        assert!(buffer_contains(&terminal, "Position (4-4-2)"));
        assert!(buffer_contains(&terminal, "GK"));
        assert!(buffer_contains(&terminal, "RCB"));
    }

    #[test]
    fn half_pitch_shows_value_label_and_glyphs() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let area = Rect::new(0, 0, 80, 30);
        let (vp, mapper) = fitted(PitchKind::Half, area);
        let mut log = EventLog::new();
        let p = mapper.to_absolute(RelativePoint::new(0.5, 0.0));
        log.pointer_down(&mapper, p, EventKind::Goal);
        log.pointer_up(&mapper, p);

        terminal
            .draw(|frame| render_half(frame, area, &vp, &mapper, &log))
            .unwrap();
        assert!(buffer_contains(&terminal, "xG: 0.99"));
        assert!(buffer_contains(&terminal, "*"));
    }

    #[test]
    fn half_pitch_empty_log_shows_placeholder() {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let area = Rect::new(0, 0, 60, 20);
        let (vp, mapper) = fitted(PitchKind::Half, area);
        let log = EventLog::new();
        terminal
            .draw(|frame| render_half(frame, area, &vp, &mapper, &log))
            .unwrap();
        assert!(buffer_contains(&terminal, "xG/xA: --"));
    }

    #[test]
    fn half_pitch_renders_mid_drag() {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let area = Rect::new(0, 0, 60, 20);
        let (vp, mapper) = fitted(PitchKind::Half, area);
        let mut log = EventLog::new();
        let start = mapper.to_absolute(RelativePoint::new(0.3, 0.4));
        log.pointer_down(&mapper, start, EventKind::Assist);
        log.pointer_move(mapper.to_absolute(RelativePoint::new(0.6, 0.2)));
        terminal
            .draw(|frame| render_half(frame, area, &vp, &mapper, &log))
            .unwrap();
        assert!(buffer_contains(&terminal, "#"));
    }

    #[test]
    fn zero_sized_area_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
        let selection = SelectionState::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                let (vp, mapper) = fitted(PitchKind::Full, area);
                render_full(frame, area, &vp, &mapper, &selection);
            })
            .unwrap();
    }
}

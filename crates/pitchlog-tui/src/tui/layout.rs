// Screen layout: panel arrangement and pitch viewports.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-----------------------------+--------------------+
// | Full Pitch (45%)             | Session (9 rows)   |
// |                              +--------------------+
// +-----------------------------+ Summary (9 rows)   |
// | Half Pitch (55%)             +--------------------+
// |                              | Event List (fill)  |
// +-----------------------------+--------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use pitchlog_core::pitch::{Bounds, PixelPoint};
use ratatui::layout::{Constraint, Direction, Layout, Margin, Position, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: active event kind and the last status message.
    pub status_bar: Rect,
    /// Position picker.
    pub full_pitch: Rect,
    /// Event logger.
    pub half_pitch: Rect,
    /// Game type, date, formation, position and role.
    pub session: Rect,
    pub summary: Rect,
    pub event_list: Rect,
    /// Bottom row: key hints or a pending confirmation.
    pub help_bar: Rect,
}

/// Build the screen layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(middle);

    let pitches = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(horizontal[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Min(3),
        ])
        .split(horizontal[1]);

    AppLayout {
        status_bar,
        full_pitch: pitches[0],
        half_pitch: pitches[1],
        session: sidebar[0],
        summary: sidebar[1],
        event_list: sidebar[2],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// The drawable inside of a bordered pitch panel, viewed as widget pixel
/// space: one unit per column, `cell_aspect` units per row, y growing upward
/// from the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    pub cell_aspect: f64,
}

impl Viewport {
    pub fn new(area: Rect, cell_aspect: f64) -> Self {
        Viewport { area, cell_aspect }
    }

    /// Viewport inside a one-cell border around `panel`.
    pub fn inside_border(panel: Rect, cell_aspect: f64) -> Self {
        Viewport::new(panel.inner(Margin::new(1, 1)), cell_aspect)
    }

    pub fn width(&self) -> f64 {
        f64::from(self.area.width)
    }

    pub fn height(&self) -> f64 {
        f64::from(self.area.height) * self.cell_aspect
    }

    /// Widget bounds handed to the pitch mapper.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.width(), self.height())
    }

    pub fn contains_cell(&self, column: u16, row: u16) -> bool {
        self.area.contains(Position::new(column, row))
    }

    /// Centre of a terminal cell in this viewport's pixel space. Cells
    /// outside the viewport map outside the bounds.
    pub fn to_pixel(&self, column: u16, row: u16) -> PixelPoint {
        let x = f64::from(column) - f64::from(self.area.x) + 0.5;
        let rows_up = f64::from(self.area.y) + f64::from(self.area.height) - 1.0 - f64::from(row);
        PixelPoint::new(x, (rows_up + 0.5) * self.cell_aspect)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

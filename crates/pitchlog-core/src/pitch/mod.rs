// Pitch geometry: aspect-locked pitch rectangles and the mapping between
// widget pixel space and pitch-relative coordinates.
//
// Pixel space is y-up: a larger `y` is further from the widget's bottom edge.
// Relative coordinates have their origin at the pitch's lower-left corner.

pub mod markings;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Real-world dimensions (meters)
// ---------------------------------------------------------------------------

/// Full pitch length, drawn along the horizontal axis.
pub const FULL_PITCH_LENGTH_M: f64 = 105.0;
/// Pitch width. Horizontal axis of the half pitch, vertical axis of the full pitch.
pub const PITCH_WIDTH_M: f64 = 68.0;
/// Depth of one half, goal line to halfway line.
pub const HALF_PITCH_DEPTH_M: f64 = 52.5;

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

/// A point in widget pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        PixelPoint { x, y }
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_sq(&self, other: &PixelPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// A position expressed as fractions of the pitch's width and height.
///
/// `(0, 0)` is the lower-left corner, `(1, 1)` the upper-right. This is the
/// only spatial representation that is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativePoint {
    pub rx: f64,
    pub ry: f64,
}

impl RelativePoint {
    pub const fn new(rx: f64, ry: f64) -> Self {
        RelativePoint { rx, ry }
    }

    /// The `[rx, ry]` pair used by the export format.
    pub fn as_array(&self) -> [f64; 2] {
        [self.rx, self.ry]
    }
}

// ---------------------------------------------------------------------------
// Bounds and PitchRect
// ---------------------------------------------------------------------------

/// Axis-aligned rectangle in pixel space. Used both for the hosting widget's
/// bounds and for the fitted pitch rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Bounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive containment test on all four edges.
    pub fn contains(&self, p: PixelPoint) -> bool {
        self.x <= p.x
            && p.x <= self.x + self.width
            && self.y <= p.y
            && p.y <= self.y + self.height
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// The largest rectangle of a fixed aspect ratio centered inside a widget.
pub type PitchRect = Bounds;

/// Fit the maximal rectangle with aspect `aspect` (width / height) centered
/// inside `bounds`.
///
/// Wider-than-aspect bounds are height-constrained, everything else is
/// width-constrained. Non-positive bounds collapse to an empty rectangle at
/// the bounds' center.
pub fn fit_rect(bounds: Bounds, aspect: f64) -> PitchRect {
    if bounds.is_degenerate() || !(aspect > 0.0) {
        let c = bounds.center();
        return Bounds::new(c.x, c.y, 0.0, 0.0);
    }

    let (width, height) = if bounds.width / bounds.height > aspect {
        (bounds.height * aspect, bounds.height)
    } else {
        (bounds.width, bounds.width / aspect)
    };

    Bounds {
        x: bounds.x + (bounds.width - width) / 2.0,
        y: bounds.y + (bounds.height - height) / 2.0,
        width,
        height,
    }
}

// ---------------------------------------------------------------------------
// PitchKind
// ---------------------------------------------------------------------------

/// The two pitch renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchKind {
    /// Whole pitch used for formation/position selection.
    Full,
    /// Attacking half used for shot and assist logging. The goal sits on the
    /// bottom edge; width is the "across" axis, height the "forward" axis.
    Half,
}

impl PitchKind {
    /// Real-world extent of the horizontal axis, in meters.
    pub fn real_width(&self) -> f64 {
        match self {
            PitchKind::Full => FULL_PITCH_LENGTH_M,
            PitchKind::Half => PITCH_WIDTH_M,
        }
    }

    /// Real-world extent of the vertical axis, in meters.
    pub fn real_height(&self) -> f64 {
        match self {
            PitchKind::Full => PITCH_WIDTH_M,
            PitchKind::Half => HALF_PITCH_DEPTH_M,
        }
    }

    /// Width / height of the pitch rectangle.
    pub fn aspect(&self) -> f64 {
        self.real_width() / self.real_height()
    }
}

// ---------------------------------------------------------------------------
// PitchMapper
// ---------------------------------------------------------------------------

/// Owns the fitted rectangle for one pitch instance and converts between
/// pixel and relative coordinates.
///
/// The rectangle is derived state: call [`PitchMapper::resize`] whenever the
/// hosting widget moves or changes size.
#[derive(Debug, Clone)]
pub struct PitchMapper {
    kind: PitchKind,
    bounds: Bounds,
    rect: PitchRect,
}

impl PitchMapper {
    /// Create a mapper with empty bounds. Nothing maps until the first resize.
    pub fn new(kind: PitchKind) -> Self {
        PitchMapper {
            kind,
            bounds: Bounds::default(),
            rect: Bounds::default(),
        }
    }

    /// Create a mapper already fitted to `bounds`.
    pub fn with_bounds(kind: PitchKind, bounds: Bounds) -> Self {
        let mut mapper = PitchMapper::new(kind);
        mapper.resize(bounds);
        mapper
    }

    pub fn kind(&self) -> PitchKind {
        self.kind
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn rect(&self) -> PitchRect {
        self.rect
    }

    /// Recompute the pitch rectangle for new widget bounds. Returns `true`
    /// when the rectangle changed. Same bounds always produce the same rect.
    pub fn resize(&mut self, bounds: Bounds) -> bool {
        let rect = fit_rect(bounds, self.kind.aspect());
        self.bounds = bounds;
        let changed = rect != self.rect;
        self.rect = rect;
        changed
    }

    /// Whether a pixel lies on or inside the pitch rectangle.
    pub fn contains(&self, p: PixelPoint) -> bool {
        self.rect.width > 0.0 && self.rect.height > 0.0 && self.rect.contains(p)
    }

    /// Map a pixel to pitch-relative coordinates. Points outside the pitch
    /// rectangle are rejected rather than clamped.
    pub fn to_relative(&self, p: PixelPoint) -> Option<RelativePoint> {
        if !self.contains(p) {
            return None;
        }
        Some(RelativePoint {
            rx: (p.x - self.rect.x) / self.rect.width,
            ry: (p.y - self.rect.y) / self.rect.height,
        })
    }

    /// Map relative coordinates back to pixel space.
    pub fn to_absolute(&self, rel: RelativePoint) -> PixelPoint {
        PixelPoint {
            x: self.rect.x + rel.rx * self.rect.width,
            y: self.rect.y + rel.ry * self.rect.height,
        }
    }

    /// Pixels per meter along the horizontal axis.
    pub fn px_per_meter_x(&self) -> f64 {
        self.rect.width / self.kind.real_width()
    }

    /// Pixels per meter along the vertical axis.
    pub fn px_per_meter_y(&self) -> f64 {
        self.rect.height / self.kind.real_height()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Pitch overlay geometry: lines, boxes, circles and arcs derived purely from a
// fitted pitch rectangle. Renderers draw these; nothing here is stateful.

use std::f64::consts::PI;

use super::{PitchKind, PitchRect, PixelPoint};

const CENTER_CIRCLE_RADIUS_M: f64 = 9.15;
const PENALTY_AREA_WIDTH_M: f64 = 40.32;
const PENALTY_AREA_DEPTH_M: f64 = 16.5;
const GOAL_AREA_WIDTH_M: f64 = 18.32;
const GOAL_AREA_DEPTH_M: f64 = 5.5;
const PENALTY_SPOT_DISTANCE_M: f64 = 11.0;
const GOAL_WIDTH_M: f64 = 7.32;
const GOAL_DEPTH_M: f64 = 2.0;
const PENALTY_ARC_START_DEG: f64 = 35.0;
const PENALTY_ARC_END_DEG: f64 = 145.0;

/// A straight line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: PixelPoint,
    pub to: PixelPoint,
}

/// A full circle outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: PixelPoint,
    pub radius: f64,
}

/// A circular arc from `start` to `end` radians, counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: PixelPoint,
    pub radius: f64,
    pub start: f64,
    pub end: f64,
}

impl Arc {
    /// Points along the arc, `segments + 1` of them including both ends.
    pub fn sample(&self, segments: usize) -> Vec<PixelPoint> {
        let segments = segments.max(1);
        let sweep = self.end - self.start;
        (0..=segments)
            .map(|i| {
                let angle = self.start + sweep * i as f64 / segments as f64;
                PixelPoint::new(
                    self.center.x + self.radius * angle.cos(),
                    self.center.y + self.radius * angle.sin(),
                )
            })
            .collect()
    }
}

/// Everything a renderer needs to draw one pitch's markings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Markings {
    pub lines: Vec<Segment>,
    pub circles: Vec<Circle>,
    pub arcs: Vec<Arc>,
    pub spots: Vec<PixelPoint>,
}

impl Markings {
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.lines.push(Segment {
            from: PixelPoint::new(x1, y1),
            to: PixelPoint::new(x2, y2),
        });
    }

    /// Three sides of a box standing on the horizontal line `base_y`,
    /// extending `depth` towards `+y` (or `-y` when negative).
    fn open_box(&mut self, x1: f64, x2: f64, base_y: f64, depth: f64) {
        let top = base_y + depth;
        self.line(x1, base_y, x1, top);
        self.line(x2, base_y, x2, top);
        self.line(x1, top, x2, top);
    }

    fn outline(&mut self, rect: &PitchRect) {
        let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
        self.line(x, y, x + w, y);
        self.line(x, y, x, y + h);
        self.line(x + w, y, x + w, y + h);
        self.line(x, y + h, x + w, y + h);
    }
}

/// Build the markings for `kind` fitted to `rect`.
pub fn for_kind(kind: PitchKind, rect: &PitchRect) -> Markings {
    match kind {
        PitchKind::Full => full_pitch(rect),
        PitchKind::Half => half_pitch(rect),
    }
}

/// Full pitch: play runs bottom to top, so penalty areas sit on the top and
/// bottom edges and the halfway line is horizontal.
pub fn full_pitch(rect: &PitchRect) -> Markings {
    let mut m = Markings::default();
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return m;
    }
    // Horizontal axis spans 105 m, vertical spans 68 m.
    let sx = rect.width / PitchKind::Full.real_width();
    let sy = rect.height / PitchKind::Full.real_height();
    let center = rect.center();

    m.outline(rect);
    m.line(rect.x, center.y, rect.x + rect.width, center.y);
    m.circles.push(Circle {
        center,
        radius: CENTER_CIRCLE_RADIUS_M * sx,
    });
    m.spots.push(center);

    let pa_half = PENALTY_AREA_WIDTH_M * sx / 2.0;
    let pa_depth = PENALTY_AREA_DEPTH_M * sy;
    m.open_box(center.x - pa_half, center.x + pa_half, rect.y, pa_depth);
    m.open_box(
        center.x - pa_half,
        center.x + pa_half,
        rect.y + rect.height,
        -pa_depth,
    );
    m
}

/// Attacking half: goal on the bottom edge, halfway line on the top edge.
pub fn half_pitch(rect: &PitchRect) -> Markings {
    let mut m = Markings::default();
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return m;
    }
    let sx = rect.width / PitchKind::Half.real_width();
    let sy = rect.height / PitchKind::Half.real_height();
    let cx = rect.x + rect.width / 2.0;
    let top = rect.y + rect.height;

    m.outline(rect);

    // Centre circle: only the half that lies on this side of the halfway line.
    m.arcs.push(Arc {
        center: PixelPoint::new(cx, top),
        radius: CENTER_CIRCLE_RADIUS_M * sx,
        start: PI,
        end: 2.0 * PI,
    });
    m.spots.push(PixelPoint::new(cx, top));

    // Goal mouth, drawn behind the goal line.
    let goal_half = GOAL_WIDTH_M * sx / 2.0;
    m.open_box(cx - goal_half, cx + goal_half, rect.y, -GOAL_DEPTH_M * sy);

    let pa_half = PENALTY_AREA_WIDTH_M * sx / 2.0;
    m.open_box(cx - pa_half, cx + pa_half, rect.y, PENALTY_AREA_DEPTH_M * sy);

    let ga_half = GOAL_AREA_WIDTH_M * sx / 2.0;
    m.open_box(cx - ga_half, cx + ga_half, rect.y, GOAL_AREA_DEPTH_M * sy);

    let spot = PixelPoint::new(cx, rect.y + PENALTY_SPOT_DISTANCE_M * sy);
    m.spots.push(spot);
    m.arcs.push(Arc {
        center: spot,
        radius: CENTER_CIRCLE_RADIUS_M * sx,
        start: PENALTY_ARC_START_DEG.to_radians(),
        end: PENALTY_ARC_END_DEG.to_radians(),
    });
    m
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

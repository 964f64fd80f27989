// Expected-value model: closed-form xG and xA from a half-pitch position.
//
// This is a simple geometric heuristic, not a fitted statistical model. The
// functional form is kept exactly so that stored values stay reproducible.

use crate::pitch::{RelativePoint, HALF_PITCH_DEPTH_M, PITCH_WIDTH_M};

/// Goal mouth width in meters.
pub const GOAL_WIDTH_M: f64 = 7.32;
/// Half the goal mouth: posts sit at `x = ±POST_OFFSET_M` on the goal line.
pub const POST_OFFSET_M: f64 = GOAL_WIDTH_M / 2.0;

/// Upper bound of any xG value.
pub const XG_CAP: f64 = 0.99;
/// xG for a shot taken from the post itself.
pub const XG_ON_POST: f64 = 0.95;
/// Shots closer than this to the goal line get [`XG_CAP`].
const GOAL_LINE_EPSILON_M: f64 = 0.01;

const XG_BASE: f64 = 0.8;
const XG_DISTANCE_DECAY_M: f64 = 8.0;
const XG_ANGLE_REFERENCE: f64 = 0.7;
const XG_ANGLE_EXPONENT: f64 = 0.7;

/// Cap of the generic xA fallback.
pub const XA_FALLBACK_CAP: f64 = 0.15;

/// Half-pitch position in meters: `x` across from the goal center (negative
/// is left), `y` forward from the goal line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Meters {
    pub x: f64,
    pub y: f64,
}

impl Meters {
    pub fn from_relative(rel: RelativePoint) -> Self {
        Meters {
            x: (rel.rx - 0.5) * PITCH_WIDTH_M,
            y: rel.ry * HALF_PITCH_DEPTH_M,
        }
    }

    /// Distance to the goal center.
    pub fn distance(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Expected goals for a shot from `rel` on the half pitch. Always in `(0, 0.99]`.
pub fn xg(rel: RelativePoint) -> f64 {
    xg_at(Meters::from_relative(rel))
}

fn xg_at(m: Meters) -> f64 {
    if m.y <= GOAL_LINE_EPSILON_M {
        return XG_CAP;
    }

    let to_left_post_sq = (m.x + POST_OFFSET_M).powi(2) + m.y * m.y;
    let to_right_post_sq = (m.x - POST_OFFSET_M).powi(2) + m.y * m.y;
    if to_left_post_sq == 0.0 || to_right_post_sq == 0.0 {
        return XG_ON_POST;
    }

    let angle = shot_angle(to_left_post_sq, to_right_post_sq);
    let decay = XG_BASE * (-m.distance() / XG_DISTANCE_DECAY_M).exp();
    let value = decay * (angle / XG_ANGLE_REFERENCE).powf(XG_ANGLE_EXPONENT);
    value.min(XG_CAP)
}

/// Angle subtended by the goal mouth, from the squared distances to each
/// post (law of cosines). The cosine is clamped so rounding can never push
/// `acos` out of its domain.
fn shot_angle(to_left_post_sq: f64, to_right_post_sq: f64) -> f64 {
    let cos = (to_left_post_sq + to_right_post_sq - GOAL_WIDTH_M * GOAL_WIDTH_M)
        / (2.0 * (to_left_post_sq * to_right_post_sq).sqrt());
    cos.clamp(-1.0, 1.0).acos()
}

/// Expected assists for a pass from `rel` on the half pitch.
///
/// Zones are checked in order and the first match wins:
/// 1. wide of the posts within 10 m of the goal line (cutbacks),
/// 2. central, between 16.5 m and 30 m out (edge of the box),
/// 3. everything else: a capped distance decay.
pub fn xa(rel: RelativePoint) -> f64 {
    xa_at(Meters::from_relative(rel))
}

fn xa_at(m: Meters) -> f64 {
    if m.y < 10.0 && m.x.abs() > POST_OFFSET_M {
        return 0.15 + (10.0 - m.y) * 0.02;
    }
    if m.y > 16.5 && m.y < 30.0 && m.x.abs() < 12.0 {
        return 0.08 + (30.0 - m.y) * 0.007;
    }
    (0.12 * (-m.distance() / 20.0).exp()).min(XA_FALLBACK_CAP)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn rel(rx: f64, ry: f64) -> RelativePoint {
        RelativePoint::new(rx, ry)
    }

    #[test]
    fn meter_conversion() {
        let m = Meters::from_relative(rel(0.0, 1.0));
        assert!((m.x + 34.0).abs() < EPS);
        assert!((m.y - 52.5).abs() < EPS);
        let c = Meters::from_relative(rel(0.5, 0.0));
        assert_eq!(c.distance(), 0.0);
    }

    #[test]
    fn goal_line_is_capped() {
        assert_eq!(xg(rel(0.5, 0.0)), 0.99);
        assert_eq!(xg(rel(0.0, 0.0)), 0.99);
        // 0.01 m is the inclusive edge of the goal-line rule.
        assert_eq!(xg_at(Meters { x: 20.0, y: 0.01 }), 0.99);
    }

    #[test]
    fn goal_line_rule_wins_over_post_rule() {
        // Both posts sit on the goal line, so the cap applies first.
        assert_eq!(xg_at(Meters { x: POST_OFFSET_M, y: 0.0 }), XG_CAP);
        assert_eq!(xg_at(Meters { x: -POST_OFFSET_M, y: 0.0 }), XG_CAP);
    }

    #[test]
    fn close_central_shots_hit_the_cap() {
        assert_eq!(xg(rel(0.5, 0.01)), 0.99);
    }

    #[test]
    fn penalty_spot_value() {
        // 11 m out, dead center.
        let m = Meters { x: 0.0, y: 11.0 };
        let angle = 2.0 * (POST_OFFSET_M / 11.0).atan();
        let expected = 0.8 * (-11.0f64 / 8.0).exp() * (angle / 0.7).powf(0.7);
        assert!((xg_at(m) - expected).abs() < 1e-12);
        assert!(expected > 0.2 && expected < 0.35, "{expected}");
    }

    #[test]
    fn xg_decreases_with_distance_on_center_line() {
        let mut previous = f64::INFINITY;
        for i in 1..=100 {
            let value = xg(rel(0.5, i as f64 / 100.0));
            assert!(value <= previous + EPS, "ry={} value={value} previous={previous}", i);
            previous = value;
        }
    }

    #[test]
    fn xg_decreases_with_distance_along_an_angled_ray() {
        // Fixed bearing of 30 degrees off the center line.
        let bearing = 30f64.to_radians();
        let mut previous = f64::INFINITY;
        for step in 1..=40 {
            let d = step as f64;
            let m = Meters {
                x: d * bearing.sin(),
                y: d * bearing.cos(),
            };
            let value = xg_at(m);
            assert!(value <= previous + EPS, "d={d} value={value}");
            previous = value;
        }
    }

    #[test]
    fn xg_approaches_cap_near_goal_line() {
        for ry in [0.005, 0.001, 0.0001] {
            assert!((xg(rel(0.5, ry)) - 0.99).abs() < EPS);
        }
    }

    #[test]
    fn xg_is_finite_and_in_range_everywhere() {
        for i in 0..=50 {
            for j in 0..=50 {
                let value = xg(rel(i as f64 / 50.0, j as f64 / 50.0));
                assert!(value.is_finite(), "NaN at ({i}, {j})");
                assert!(value > 0.0 && value <= 0.99, "{value} at ({i}, {j})");
            }
        }
    }

    #[test]
    fn shot_angle_clamps_degenerate_cosines() {
        // Collinear with both posts: cosine rounds to exactly +-1.
        let angle = shot_angle(100.0, (10.0 + GOAL_WIDTH_M).powi(2));
        assert!(angle.is_finite());
        assert!(angle.abs() < 1e-6);
    }

    #[test]
    fn xa_cutback_zone() {
        // x = -27.2 m, y = 5.25 m
        let expected = 0.15 + (10.0 - 5.25) * 0.02;
        assert!((xa(rel(0.1, 0.1)) - expected).abs() < EPS);
    }

    #[test]
    fn xa_cutback_needs_to_be_wide_of_the_posts() {
        // Central and close falls through to the fallback.
        let value = xa(rel(0.5, 0.1));
        let expected = 0.12 * (-5.25f64 / 20.0).exp();
        assert!((value - expected).abs() < EPS);
    }

    #[test]
    fn xa_edge_of_box_zone() {
        // y = 21 m, central
        let expected = 0.08 + (30.0 - 21.0) * 0.007;
        assert!((xa(rel(0.5, 0.4)) - expected).abs() < EPS);
    }

    #[test]
    fn xa_edge_of_box_bounds_are_exclusive() {
        // Exactly 16.5 m and 30 m out are not in the edge-of-box zone.
        let near = xa_at(Meters { x: 0.0, y: 16.5 });
        assert!((near - 0.12 * (-16.5f64 / 20.0).exp()).abs() < EPS);
        let far = xa_at(Meters { x: 0.0, y: 30.0 });
        assert!((far - 0.12 * (-30.0f64 / 20.0).exp()).abs() < EPS);
        // 12 m across is outside too.
        let wide = xa_at(Meters { x: 12.0, y: 20.0 });
        assert!(wide < 0.08);
    }

    #[test]
    fn xa_deep_central_uses_fallback() {
        let value = xa(rel(0.5, 0.9));
        let expected = 0.12 * (-(0.9 * 52.5f64) / 20.0).exp();
        assert!((value - expected).abs() < EPS);
        assert!(value <= 0.15);
    }

    #[test]
    fn xa_fallback_never_exceeds_cap() {
        for i in 0..=20 {
            for j in 0..=20 {
                let r = rel(i as f64 / 20.0, j as f64 / 20.0);
                let m = Meters::from_relative(r);
                let in_zone = (m.y < 10.0 && m.x.abs() > POST_OFFSET_M)
                    || (m.y > 16.5 && m.y < 30.0 && m.x.abs() < 12.0);
                let value = xa(r);
                assert!(value.is_finite() && value >= 0.0);
                if !in_zone {
                    assert!(value <= XA_FALLBACK_CAP);
                }
            }
        }
    }
}

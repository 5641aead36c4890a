use crate::models::Corners;

/// Default blend factor for corner smoothing
pub const DEFAULT_SMOOTHING: f32 = 0.35;

/// Exponentially smooths detected corners across ticks.
///
/// The first detection after a loss snaps directly; later detections move
/// each corner `factor` of the way towards the new position. Any tick
/// without an accepted detection clears the track.
///
/// Incoming corners are rotated to line up with the tracked ones before
/// blending, so a code turning past 45 degrees (where the top-left label
/// moves to the neighbouring corner) keeps its shape.
#[derive(Debug, Clone)]
pub struct CornerTracker {
    factor: f32,
    tracked: Option<Corners>,
}

impl CornerTracker {
    /// Tracker with the given blend factor, clamped to `(0, 1]`
    pub fn new(factor: f32) -> Self {
        Self {
            factor: factor.clamp(f32::EPSILON, 1.0),
            tracked: None,
        }
    }

    /// Feed this tick's corners and get the corners to draw
    pub fn update(&mut self, detection: Option<Corners>) -> Option<Corners> {
        let next = match (detection, self.tracked) {
            (None, _) => None,
            (Some(points), None) => Some(points),
            (Some(points), Some(prev)) => {
                let points = align_to(&prev, points);
                Some(std::array::from_fn(|i| prev[i].lerp(&points[i], self.factor)))
            }
        };
        self.tracked = next;
        next
    }

    /// Current smoothed corners, if tracking
    pub fn tracked(&self) -> Option<Corners> {
        self.tracked
    }

    /// Blend factor in use
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Drop the current track
    pub fn reset(&mut self) {
        self.tracked = None;
    }
}

/// Cyclic rotation of `points` closest to `prev` in summed squared distance
fn align_to(prev: &Corners, points: Corners) -> Corners {
    let cost = |shift: usize| -> f32 {
        (0..4)
            .map(|i| {
                let p = points[(i + shift) % 4];
                let dx = p.x - prev[i].x;
                let dy = p.y - prev[i].y;
                dx * dx + dy * dy
            })
            .sum()
    };
    let best = (0..4)
        .min_by(|a, b| cost(*a).total_cmp(&cost(*b)))
        .unwrap_or(0);
    let mut aligned = points;
    aligned.rotate_left(best);
    aligned
}

impl Default for CornerTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Detection, Point};

    fn square(offset: f32, size: f32) -> Corners {
        [
            Point::new(offset, offset),
            Point::new(offset + size, offset),
            Point::new(offset + size, offset + size),
            Point::new(offset, offset + size),
        ]
    }

    #[test]
    fn test_first_acquisition_snaps() {
        let mut tracker = CornerTracker::default();
        assert_eq!(tracker.update(Some(square(10.0, 50.0))), Some(square(10.0, 50.0)));
    }

    #[test]
    fn test_subsequent_update_strictly_between() {
        let mut tracker = CornerTracker::default();
        let first = square(10.0, 50.0);
        let second = square(30.0, 80.0);
        tracker.update(Some(first));
        let out = tracker.update(Some(second)).unwrap();
        for i in 0..4 {
            assert!(out[i].x > first[i].x && out[i].x < second[i].x);
            assert!(out[i].y > first[i].y && out[i].y < second[i].y);
        }
        let expected = first[0].x + (second[0].x - first[0].x) * DEFAULT_SMOOTHING;
        assert!((out[0].x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_none_clears_state() {
        let mut tracker = CornerTracker::default();
        tracker.update(Some(square(10.0, 50.0)));
        assert_eq!(tracker.update(None), None);
        assert_eq!(tracker.tracked(), None);
        // Re-acquisition snaps again rather than blending from stale state
        assert_eq!(tracker.update(Some(square(200.0, 20.0))), Some(square(200.0, 20.0)));
    }

    #[test]
    fn test_converges_on_stationary_code() {
        let mut tracker = CornerTracker::new(0.4);
        tracker.update(Some(square(0.0, 10.0)));
        let target = square(100.0, 10.0);
        let mut out = None;
        for _ in 0..40 {
            out = tracker.update(Some(target));
        }
        assert!(out.unwrap()[0].distance(&target[0]) < 0.01);
    }

    fn rotated_square(cx: f32, cy: f32, size: f32, degrees: f32) -> Vec<Point> {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let h = size / 2.0;
        [(-h, -h), (h, -h), (h, h), (-h, h)]
            .iter()
            .map(|&(x, y)| Point::new(cx + x * cos - y * sin, cy + x * sin + y * cos))
            .collect()
    }

    fn area(c: &Corners) -> f32 {
        let twice: f32 = (0..4)
            .map(|i| {
                let (a, b) = (c[i], c[(i + 1) % 4]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.0
    }

    #[test]
    fn test_rotation_past_45_degrees_keeps_shape() {
        let mut tracker = CornerTracker::default();
        let before = Detection::from_raw("x", &rotated_square(320.0, 240.0, 100.0, 44.0)).unwrap();
        let after = Detection::from_raw("x", &rotated_square(320.0, 240.0, 100.0, 46.0)).unwrap();
        // Normalization labels a different physical corner as top-left
        assert!(before.corners[0].distance(&after.corners[0]) > 50.0);

        tracker.update(Some(before.corners));
        tracker.update(Some(before.corners));
        let first = tracker.update(Some(after.corners)).unwrap();
        let second = tracker.update(Some(after.corners)).unwrap();

        for out in [first, second] {
            assert!(area(&out) > 9900.0, "area {}", area(&out));
        }
        // Each smoothed corner stays next to a physical corner of the code
        for p in second {
            let nearest = after
                .corners
                .iter()
                .map(|c| c.distance(&p))
                .fold(f32::INFINITY, f32::min);
            assert!(nearest < 3.0, "corner drifted {nearest}");
        }
    }

    #[test]
    fn test_align_keeps_already_matching_order() {
        let a = square(10.0, 50.0);
        assert_eq!(align_to(&a, a), a);
        let shifted = [a[1], a[2], a[3], a[0]];
        assert_eq!(align_to(&a, shifted), a);
    }
}

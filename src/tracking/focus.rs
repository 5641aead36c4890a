use crate::models::{Detection, Point};

/// Default fraction trimmed from each frame edge
pub const DEFAULT_MARGIN_FRACTION: f32 = 0.20;

/// Accepts detections centered inside the central region of the frame.
///
/// With the default margin of 20% the active region is the middle 60% x 60%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusGate {
    margin_fraction: f32,
}

impl FocusGate {
    /// Gate trimming `margin_fraction` of width and height from every edge
    pub fn new(margin_fraction: f32) -> Self {
        Self { margin_fraction }
    }

    /// Configured margin
    pub fn margin_fraction(&self) -> f32 {
        self.margin_fraction
    }

    /// True when the detection's center lies strictly inside the focus region
    pub fn accepts(&self, detection: &Detection, frame_width: usize, frame_height: usize) -> bool {
        center_in_focus(
            detection.center(),
            frame_width as f32,
            frame_height as f32,
            self.margin_fraction,
        )
    }
}

impl Default for FocusGate {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN_FRACTION)
    }
}

/// Strict containment test of `center` in the inset rectangle
pub fn center_in_focus(center: Point, width: f32, height: f32, margin_fraction: f32) -> bool {
    let min_x = width * margin_fraction;
    let max_x = width * (1.0 - margin_fraction);
    let min_y = height * margin_fraction;
    let max_y = height * (1.0 - margin_fraction);
    center.x > min_x && center.x < max_x && center.y > min_y && center.y < max_y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centered_at(x: f32, y: f32) -> Detection {
        Detection::new(
            "p",
            [
                Point::new(x - 5.0, y - 5.0),
                Point::new(x + 5.0, y - 5.0),
                Point::new(x + 5.0, y + 5.0),
                Point::new(x - 5.0, y + 5.0),
            ],
        )
    }

    #[test]
    fn test_midpoint_always_accepted() {
        for margin in [0.0, 0.1, 0.2, 0.3, 0.45, 0.49] {
            let gate = FocusGate::new(margin);
            assert!(gate.accepts(&centered_at(320.0, 240.0), 640, 480), "margin {margin}");
        }
    }

    #[test]
    fn test_frame_corner_always_rejected() {
        for margin in [0.01, 0.2, 0.4] {
            assert!(!center_in_focus(Point::new(0.0, 0.0), 640.0, 480.0, margin));
            assert!(!center_in_focus(Point::new(640.0, 480.0), 640.0, 480.0, margin));
        }
    }

    #[test]
    fn test_boundary_is_exclusive() {
        // 20% of 100 = 20: exactly on the inset edge is outside
        assert!(!center_in_focus(Point::new(20.0, 50.0), 100.0, 100.0, 0.2));
        assert!(center_in_focus(Point::new(20.5, 50.0), 100.0, 100.0, 0.2));
        assert!(!center_in_focus(Point::new(50.0, 80.0), 100.0, 100.0, 0.2));
    }

    #[test]
    fn test_off_center_rejected_by_default_gate() {
        let gate = FocusGate::default();
        assert!(!gate.accepts(&centered_at(60.0, 240.0), 640, 480));
        assert!(gate.accepts(&centered_at(200.0, 200.0), 640, 480));
    }
}

use super::Point;

/// Four code corners ordered top-left, top-right, bottom-right, bottom-left
pub type Corners = [Point; 4];

/// One successful decode for a single frame
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Decoded text content
    pub payload: String,
    /// Corner geometry in frame pixel coordinates
    pub corners: Corners,
}

impl Detection {
    /// Create a detection from already-ordered corners
    pub fn new(payload: impl Into<String>, corners: Corners) -> Self {
        Self {
            payload: payload.into(),
            corners,
        }
    }

    /// Normalize a decoder result with corners in arbitrary order or count.
    ///
    /// Exactly four points are reordered clockwise from top-left. Any other
    /// non-empty set is replaced by its bounding box. Returns `None` for an
    /// empty payload or no points at all.
    pub fn from_raw(payload: impl Into<String>, points: &[Point]) -> Option<Self> {
        let payload = payload.into();
        if payload.is_empty() {
            return None;
        }
        let corners = match points.len() {
            0 => return None,
            4 => order_corners([points[0], points[1], points[2], points[3]]),
            _ => bounding_corners(points),
        };
        Some(Self { payload, corners })
    }

    /// Center of the code, taken on the top-left/bottom-right diagonal
    pub fn center(&self) -> Point {
        self.corners[0].midpoint(&self.corners[2])
    }
}

/// Reorder four points clockwise (in image space, y down) starting at top-left.
pub fn order_corners(points: Corners) -> Corners {
    let cx = points.iter().map(|p| p.x).sum::<f32>() / 4.0;
    let cy = points.iter().map(|p| p.y).sum::<f32>() / 4.0;

    let mut sorted = points;
    // atan2 grows clockwise on screen because y points down
    sorted.sort_by(|a, b| {
        let aa = (a.y - cy).atan2(a.x - cx);
        let ab = (b.y - cy).atan2(b.x - cx);
        aa.partial_cmp(&ab).unwrap_or(std::cmp::Ordering::Equal)
    });

    let start = sorted
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (a.x + a.y)
                .partial_cmp(&(b.x + b.y))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    sorted.rotate_left(start);
    sorted
}

fn bounding_corners(points: &[Point]) -> Corners {
    let min_x = points.iter().fold(f32::INFINITY, |a, p| a.min(p.x));
    let min_y = points.iter().fold(f32::INFINITY, |a, p| a.min(p.y));
    let max_x = points.iter().fold(f32::NEG_INFINITY, |a, p| a.max(p.x));
    let max_y = points.iter().fold(f32::NEG_INFINITY, |a, p| a.max(p.y));
    [
        Point::new(min_x, min_y),
        Point::new(max_x, min_y),
        Point::new(max_x, max_y),
        Point::new(min_x, max_y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Corners {
        [
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
            Point::new(50.0, 50.0),
            Point::new(10.0, 50.0),
        ]
    }

    #[test]
    fn test_order_corners_already_ordered() {
        assert_eq!(order_corners(square()), square());
    }

    #[test]
    fn test_order_corners_shuffled() {
        let s = square();
        let shuffled = [s[2], s[0], s[3], s[1]];
        assert_eq!(order_corners(shuffled), s);
    }

    #[test]
    fn test_from_raw_bounding_box() {
        let pts = [
            Point::new(12.0, 30.0),
            Point::new(40.0, 8.0),
            Point::new(25.0, 44.0),
        ];
        let det = Detection::from_raw("x", &pts).unwrap();
        assert_eq!(det.corners[0], Point::new(12.0, 8.0));
        assert_eq!(det.corners[2], Point::new(40.0, 44.0));
    }

    #[test]
    fn test_from_raw_rejects_empty() {
        assert!(Detection::from_raw("", &square()).is_none());
        assert!(Detection::from_raw("x", &[]).is_none());
    }

    #[test]
    fn test_center_uses_diagonal() {
        let det = Detection::new("x", square());
        assert_eq!(det.center(), Point::new(30.0, 30.0));
    }
}

// File: crates/vizbind-core/src/mark.rs
// Summary: Mark geometry and paint attributes, with hit testing and interpolation.

use crate::types::{lerp_f32, Point, Rgba};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rect,
    Circle,
    Line,
    Area,
    Region,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect { x: f32, y: f32, width: f32, height: f32 },
    Circle { cx: f32, cy: f32, r: f32 },
    /// Open polyline.
    Line { points: Vec<Point> },
    /// Band between two polylines sharing x positions.
    Area { upper: Vec<Point>, lower: Vec<Point> },
    /// Filled polygons (even-odd rule), one entry per ring.
    Region { rings: Vec<Vec<Point>> },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect { .. } => ShapeKind::Rect,
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Line { .. } => ShapeKind::Line,
            Shape::Area { .. } => ShapeKind::Area,
            Shape::Region { .. } => ShapeKind::Region,
        }
    }

    /// Whether `p` falls inside the filled shape. Open lines never hit.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Rect { x, y, width, height } => {
                p.x >= *x && p.x <= x + width && p.y >= *y && p.y <= y + height
            }
            Shape::Circle { cx, cy, r } => {
                let (dx, dy) = (p.x - cx, p.y - cy);
                dx * dx + dy * dy <= r * r
            }
            Shape::Line { .. } => false,
            Shape::Area { upper, lower } => {
                let ring: Vec<Point> = upper.iter().chain(lower.iter().rev()).copied().collect();
                ring_contains(&ring, p)
            }
            Shape::Region { rings } => {
                rings.iter().filter(|ring| ring_contains(ring, p)).count() % 2 == 1
            }
        }
    }

    /// Interpolate geometry. Shapes of different kind or vertex count jump to `to` at t > 0.
    pub fn lerp(&self, to: &Shape, t: f32) -> Shape {
        let pts = |a: &[Point], b: &[Point]| -> Option<Vec<Point>> {
            (a.len() == b.len()).then(|| a.iter().zip(b).map(|(p, q)| p.lerp(*q, t)).collect())
        };
        let mixed = match (self, to) {
            (
                Shape::Rect { x, y, width, height },
                Shape::Rect { x: x1, y: y1, width: w1, height: h1 },
            ) => Some(Shape::Rect {
                x: lerp_f32(*x, *x1, t),
                y: lerp_f32(*y, *y1, t),
                width: lerp_f32(*width, *w1, t),
                height: lerp_f32(*height, *h1, t),
            }),
            (Shape::Circle { cx, cy, r }, Shape::Circle { cx: cx1, cy: cy1, r: r1 }) => Some(Shape::Circle {
                cx: lerp_f32(*cx, *cx1, t),
                cy: lerp_f32(*cy, *cy1, t),
                r: lerp_f32(*r, *r1, t),
            }),
            (Shape::Line { points }, Shape::Line { points: p1 }) => {
                pts(points, p1).map(|points| Shape::Line { points })
            }
            (Shape::Area { upper, lower }, Shape::Area { upper: u1, lower: l1 }) => {
                match (pts(upper, u1), pts(lower, l1)) {
                    (Some(upper), Some(lower)) => Some(Shape::Area { upper, lower }),
                    _ => None,
                }
            }
            _ => None,
        };
        match mixed {
            Some(s) => s,
            None if t <= 0.0 => self.clone(),
            None => to.clone(),
        }
    }
}

/// Even-odd ray casting against one closed ring.
fn ring_contains(ring: &[Point], p: Point) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Geometry plus paint for one visual element.
#[derive(Clone, Debug, PartialEq)]
pub struct Attributes {
    pub shape: Shape,
    pub fill: Option<Rgba>,
    pub stroke: Option<Rgba>,
    pub stroke_width: f32,
    pub opacity: f32,
}

impl Attributes {
    pub fn new(shape: Shape) -> Self {
        Self { shape, fill: None, stroke: None, stroke_width: 1.0, opacity: 1.0 }
    }

    pub fn fill(mut self, color: Rgba) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn stroke(mut self, color: Rgba, width: f32) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn lerp(&self, to: &Attributes, t: f32) -> Attributes {
        let color = |a: Option<Rgba>, b: Option<Rgba>| match (a, b) {
            (Some(a), Some(b)) => Some(a.lerp(b, t)),
            _ => b,
        };
        Attributes {
            shape: self.shape.lerp(&to.shape, t),
            fill: color(self.fill, to.fill),
            stroke: color(self.stroke, to.stroke),
            stroke_width: lerp_f32(self.stroke_width, to.stroke_width, t),
            opacity: lerp_f32(self.opacity, to.opacity, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f32, y0: f32, s: f32) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x0 + s, y0),
            Point::new(x0 + s, y0 + s),
            Point::new(x0, y0 + s),
        ]
    }

    #[test]
    fn region_with_hole() {
        let shape = Shape::Region { rings: vec![square(0.0, 0.0, 10.0), square(4.0, 4.0, 2.0)] };
        assert!(shape.contains(Point::new(1.0, 1.0)));
        assert!(!shape.contains(Point::new(5.0, 5.0)));
        assert!(!shape.contains(Point::new(11.0, 5.0)));
    }

    #[test]
    fn area_contains_between_bounds() {
        let shape = Shape::Area {
            upper: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            lower: vec![Point::new(0.0, 10.0), Point::new(10.0, 10.0)],
        };
        assert!(shape.contains(Point::new(5.0, 5.0)));
        assert!(!shape.contains(Point::new(5.0, 15.0)));
    }

    #[test]
    fn rect_lerp_halfway() {
        let a = Shape::Rect { x: 0.0, y: 100.0, width: 10.0, height: 0.0 };
        let b = Shape::Rect { x: 0.0, y: 50.0, width: 10.0, height: 50.0 };
        assert_eq!(a.lerp(&b, 0.5), Shape::Rect { x: 0.0, y: 75.0, width: 10.0, height: 25.0 });
    }

    #[test]
    fn mismatched_shapes_jump() {
        let a = Shape::Line { points: vec![Point::new(0.0, 0.0)] };
        let b = Shape::Line { points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)] };
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 0.1), b);
    }
}

use std::ops::{Add, Mul, Neg, Sub};

/// Tolerance for zero-length directions and on-border comparisons.
///
/// Diagram coordinates are small normalized values, so a fixed epsilon is
/// fine; anything shorter than this is treated as no direction at all.
pub const EPSILON: f32 = 1e-5;

/// A 2D point or direction in diagram space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// An axis-aligned rectangle with its origin at the lower-left corner
/// (diagram space is y-up; the render sink flips for screen output).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when all four components are finite. NaN and infinity have no
    /// border to clip to, so such rects are rejected before routing sees
    /// them.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Unit vector from `a` to `b`, or `None` when the points coincide within
/// [`EPSILON`]. Callers treat `None` as "no routing possible"; a NaN vector
/// never escapes.
pub fn direction(a: Vec2, b: Vec2) -> Option<Vec2> {
    let d = b - a;
    let len = d.length();
    if len < EPSILON {
        return None;
    }
    Some(Vec2::new(d.x / len, d.y / len))
}

/// The 90° counter-clockwise rotation of `v`.
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Exit point of a ray cast from the rectangle's center along the unit
/// direction `dir`.
///
/// The ray hits whichever face pair it reaches first: `t` is the smaller of
/// the parametric distances to the vertical and horizontal faces, so the
/// result lies exactly on one of the four edges for any direction, including
/// flat or tall rectangles where the direction-dominant axis is not the
/// exit face. Axis-aligned directions leave one distance infinite and the
/// other face is used, so there is no division by zero.
pub fn clip_to_border(rect: &Rect, dir: Vec2) -> Vec2 {
    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;

    let tx = if dir.x.abs() > EPSILON {
        half_w / dir.x.abs()
    } else {
        f32::INFINITY
    };
    let ty = if dir.y.abs() > EPSILON {
        half_h / dir.y.abs()
    } else {
        f32::INFINITY
    };
    let t = tx.min(ty);

    rect.center() + dir * t
}

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;

use crate::Error;

/// Computes the mathematically correct value of `a` modulo `n`. The result
/// is in `[0, n)` for positive `n`, unlike the remainder operator.
pub fn true_mod(a: f64, n: f64) -> f64 {
  let r = a % n;
  if r < 0.0 {
    r + n
  } else {
    r
  }
}

/// The sign of `x` as -1.0, 0.0 or 1.0.
pub fn sign(x: f64) -> f64 {
  if x > 0.0 {
    1.0
  } else if x < 0.0 {
    -1.0
  } else {
    0.0
  }
}

/// The angle `v` makes with the x-axis, in `[0, 2 * PI)`. The zero vector
/// reports an angle of zero.
pub fn x_angle(v: DVec2) -> f64 {
  if v.length() == 0.0 {
    0.0
  } else if v.x == 0.0 {
    FRAC_PI_2 + if v.y < 0.0 { PI } else { 0.0 }
  } else {
    true_mod(
      (v.y / v.x).atan() + if v.x < 0.0 { PI } else { 0.0 },
      2.0 * PI,
    )
  }
}

/// The unit vector at angle `angle` (taken modulo `2 * PI`) from the x-axis.
pub fn unit_from_angle(angle: f64) -> DVec2 {
  let bound = true_mod(angle, 2.0 * PI);
  DVec2::new(bound.cos(), bound.sin())
}

/// `v` rotated by `angle`, preserving its norm.
pub fn rotated(v: DVec2, angle: f64) -> DVec2 {
  unit_from_angle(x_angle(v) + angle) * v.length()
}

/// The angle `a` makes with `b`, as the difference of their x-angles. The
/// result is not reduced to any particular range.
pub fn angle_from(a: DVec2, b: DVec2) -> f64 {
  x_angle(a) - x_angle(b)
}

/// Projects `v` onto `onto`. Note the projection always points along
/// `+onto`: its norm is `|v . onto| / |onto|`, absolute value included. The
/// velocity-obstacle construction relies on this convention when it sorts
/// out which cone edge is nearest.
pub fn project_onto(v: DVec2, onto: DVec2) -> DVec2 {
  normalized_to(onto, v.dot(onto).abs() / onto.length())
}

/// `v` rescaled to norm `new_norm`. The zero vector is returned unchanged.
pub fn normalized_to(v: DVec2, new_norm: f64) -> DVec2 {
  let norm = v.length();
  if norm == 0.0 {
    v
  } else {
    v * (new_norm / norm)
  }
}

/// `v` with its norm clamped to at most `max_norm`.
pub fn limit_norm(v: DVec2, max_norm: f64) -> DVec2 {
  if v.length() > max_norm {
    normalized_to(v, max_norm)
  } else {
    v
  }
}

/// A line in the plane, stored as `y = slope * x + y_intercept`. A vertical
/// line has a slope of `f64::INFINITY` and is positioned by its x-intercept
/// alone.
///
/// The intercept that does not define the line is held at zero: a vertical
/// line has `y_intercept == 0` and a horizontal line has `x_intercept == 0`.
/// Callers must check `is_vertical`/`is_horizontal` before trusting either
/// value, since an intercept of zero can also be genuine.
///
/// All predicates use exact floating-point comparison. The solver's branch
/// selection depends on these sign tests staying self-consistent, so no
/// epsilon is introduced anywhere.
#[derive(Clone, Copy, Debug)]
pub struct Line {
  slope: f64,
  y_intercept: f64,
  x_intercept: f64,
}

impl Line {
  /// The line through `p1` and `p2`. Vertical when the points share an x
  /// coordinate but not a y coordinate; horizontal through `p1` when the
  /// points are equal.
  pub fn through_points(p1: DVec2, p2: DVec2) -> Line {
    if p1.x == p2.x && p1.y != p2.y {
      Line { slope: f64::INFINITY, y_intercept: 0.0, x_intercept: p1.x }
    } else {
      let slope = if p1 == p2 { 0.0 } else { (p2.y - p1.y) / (p2.x - p1.x) };
      let y_intercept = p1.y - p1.x * slope;
      Line {
        slope,
        y_intercept,
        x_intercept: if slope == 0.0 { 0.0 } else { -y_intercept / slope },
      }
    }
  }

  /// A line from a slope and an intercept. `intercept` is read as the
  /// x-intercept when the slope is infinite (negative infinity is
  /// normalized to positive, keeping a single vertical representative) and
  /// as the y-intercept otherwise.
  pub fn from_slope_intercept(slope: f64, intercept: f64) -> Line {
    let slope =
      if slope == f64::NEG_INFINITY { f64::INFINITY } else { slope };
    if slope == f64::INFINITY {
      Line { slope, y_intercept: 0.0, x_intercept: intercept }
    } else if slope == 0.0 {
      Line { slope, y_intercept: intercept, x_intercept: 0.0 }
    } else {
      Line { slope, y_intercept: intercept, x_intercept: -intercept / slope }
    }
  }

  /// The line through the origin making angle `x_angle` (modulo `PI`) with
  /// the x-axis. Vertical when the bounded angle is exactly `PI / 2`.
  pub fn from_x_angle(x_angle: f64) -> Line {
    let bound = true_mod(x_angle, PI);
    let slope =
      if bound == FRAC_PI_2 { f64::INFINITY } else { bound.tan() };
    Line { slope, y_intercept: 0.0, x_intercept: 0.0 }
  }

  /// The line through the origin and `p`.
  pub fn through_origin(p: DVec2) -> Line {
    Line::through_points(DVec2::ZERO, p)
  }

  /// The perpendicular to `other` through `p`.
  pub fn perpendicular_through(other: &Line, p: DVec2) -> Line {
    if other.is_horizontal() {
      Line { slope: f64::INFINITY, y_intercept: 0.0, x_intercept: p.x }
    } else {
      let slope = -1.0 / other.slope;
      let y_intercept = p.y - p.x * slope;
      Line {
        slope,
        y_intercept,
        x_intercept: if slope == 0.0 { 0.0 } else { -y_intercept / slope },
      }
    }
  }

  pub fn slope(&self) -> f64 {
    self.slope
  }

  /// The y-intercept; zero (and meaningless) when the line is vertical.
  pub fn y_intercept(&self) -> f64 {
    self.y_intercept
  }

  /// The x-intercept; zero (and meaningless) when the line is horizontal.
  pub fn x_intercept(&self) -> f64 {
    self.x_intercept
  }

  /// The angle this line makes with the x-axis, in `[0, PI)`.
  pub fn x_angle(&self) -> f64 {
    true_mod(self.slope.atan(), PI)
  }

  pub fn is_vertical(&self) -> bool {
    self.slope == f64::INFINITY
  }

  pub fn is_horizontal(&self) -> bool {
    self.slope == 0.0
  }

  /// Whether `p` lies exactly on this line.
  pub fn contains(&self, p: DVec2) -> bool {
    if self.is_vertical() {
      p.x == self.x_intercept
    } else {
      p.y == self.slope * p.x + self.y_intercept
    }
  }

  /// This line rotated by `angle` about the origin. Like the angle
  /// constructor, the result passes through the origin.
  pub fn rotated(&self, angle: f64) -> Line {
    Line::from_x_angle(self.x_angle() + angle)
  }

  pub fn is_parallel_to(&self, other: &Line) -> bool {
    self.slope == other.slope
  }

  /// The intersection point of this line and `other`. Fails with
  /// [`Error::LinesParallel`] when the slopes are equal.
  pub fn intersect(&self, other: &Line) -> Result<DVec2, Error> {
    if self.is_parallel_to(other) {
      Err(Error::LinesParallel)
    } else if self.is_vertical() {
      other.point_at_x(self.x_intercept)
    } else if other.is_vertical() {
      self.point_at_x(other.x_intercept)
    } else {
      self.point_at_x(
        (other.y_intercept - self.y_intercept) / (self.slope - other.slope),
      )
    }
  }

  /// The point on this line at the given x coordinate. Fails with
  /// [`Error::LineVertical`] when the line does not define one.
  pub fn point_at_x(&self, x: f64) -> Result<DVec2, Error> {
    if self.is_vertical() {
      Err(Error::LineVertical)
    } else {
      Ok(DVec2::new(x, self.slope * x + self.y_intercept))
    }
  }

  /// The point on this line at the given y coordinate. Fails with
  /// [`Error::LineHorizontal`] when the line does not define one.
  pub fn point_at_y(&self, y: f64) -> Result<DVec2, Error> {
    if self.is_horizontal() {
      Err(Error::LineHorizontal)
    } else if self.is_vertical() {
      Ok(DVec2::new(self.x_intercept, y))
    } else {
      Ok(DVec2::new((y - self.y_intercept) / self.slope, y))
    }
  }

  /// The orthogonal projection of `p` onto this line.
  pub fn projection_of(&self, p: DVec2) -> DVec2 {
    if self.is_vertical() {
      DVec2::new(self.x_intercept, p.y)
    } else {
      let denom = self.slope * self.slope + 1.0;
      DVec2::new(
        (p.x + self.slope * (p.y - self.y_intercept)) / denom,
        (self.slope * (p.x + self.slope * p.y) + self.y_intercept) / denom,
      )
    }
  }
}

impl PartialEq for Line {
  fn eq(&self, other: &Line) -> bool {
    self.slope == other.slope
      && if self.is_vertical() {
        self.x_intercept == other.x_intercept
      } else {
        self.y_intercept == other.y_intercept
      }
  }
}

/// One closed half of the plane, described by a point on its bounding line
/// and a normal pointing into the permitted side. Points on the bounding
/// line are included.
#[derive(Clone, Copy, Debug)]
pub struct HalfPlane {
  normal_pos: DVec2,
  normal: DVec2,
  bounding_line: Line,
}

impl HalfPlane {
  /// Builds the half-plane `{ p : (p - normal_pos) . normal >= 0 }`. A zero
  /// normal defaults to `(0, 1)`.
  pub fn new(normal_pos: DVec2, normal: DVec2) -> HalfPlane {
    let normal =
      if normal.length() == 0.0 { DVec2::new(0.0, 1.0) } else { normal };
    let bounding_line = if normal.y == 0.0 {
      Line::from_slope_intercept(f64::INFINITY, normal_pos.x)
    } else {
      let slope = -normal.x / normal.y;
      Line::from_slope_intercept(slope, normal_pos.y - normal_pos.x * slope)
    };
    HalfPlane { normal_pos, normal, bounding_line }
  }

  /// The point the normal is anchored at. Always on the bounding line.
  pub fn normal_pos(&self) -> DVec2 {
    self.normal_pos
  }

  pub fn normal(&self) -> DVec2 {
    self.normal
  }

  pub fn bounding_line(&self) -> &Line {
    &self.bounding_line
  }

  /// Whether `p` is in this half-plane. The bounding line counts as inside.
  pub fn contains(&self, p: DVec2) -> bool {
    (p - self.normal_pos).dot(self.normal) >= 0.0
  }
}

/// Half-planes compare by bounding line alone, so two half-planes with
/// opposite normals on the same line are equal. The solver only uses
/// equality loosely; callers needing area identity must also compare
/// normals.
impl PartialEq for HalfPlane {
  fn eq(&self, other: &HalfPlane) -> bool {
    self.bounding_line == other.bounding_line
  }
}

#[cfg(test)]
#[path = "geometry_test.rs"]
mod test;

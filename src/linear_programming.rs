use glam::DVec2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::{angle_from, limit_norm, sign, true_mod, HalfPlane};
use crate::Error;

use std::f64::consts::PI;

/// Finds the point closest to `pref_velocity` that lies inside every
/// half-plane of `half_planes` and inside the disk of radius `max_speed`,
/// or fails with [`Error::Infeasible`] when no such point exists.
///
/// The half-planes are shuffled in place with `rng` before the incremental
/// pass, which makes the expected cost linear in the number of constraints.
/// The optimum itself does not depend on the permutation; supplying a seeded
/// generator makes runs reproducible bit for bit.
///
/// `pref_velocity` is expected to satisfy `|pref_velocity| <= max_speed`; a
/// longer preferred velocity is clamped onto the disk before solving.
pub fn solve_linear_program(
  half_planes: &mut [HalfPlane],
  pref_velocity: DVec2,
  max_speed: f64,
  rng: &mut impl Rng,
) -> Result<DVec2, Error> {
  half_planes.shuffle(rng);

  let mut solution = limit_norm(pref_velocity, max_speed);

  for i in 0..half_planes.len() {
    let h_i = &half_planes[i];
    if h_i.contains(solution) {
      continue;
    }

    // The current solution violates h_i, so the new optimum lies on h_i's
    // bounding line. Intersect that line with the circle of radius
    // `max_speed`: substituting y = slope * x + y_intercept into
    // x^2 + y^2 = max_speed^2 gives a quadratic in x with the coefficients
    // `a` and `b` below. A vertical line falls straight out of Pythagoras
    // instead, so only the discriminant's sign is kept for it and `a`/`b`
    // stay unused.
    let line = *h_i.bounding_line();
    let normal = h_i.normal();

    let (discriminant, a, b) = if line.is_vertical() {
      (sign(max_speed - line.x_intercept().abs()), 0.0, 0.0)
    } else {
      let a = line.slope() * line.slope() + 1.0;
      let b = 2.0 * line.slope() * line.y_intercept();
      (
        4.0
          * (max_speed * max_speed * a
            - line.y_intercept() * line.y_intercept()),
        a,
        b,
      )
    };

    if discriminant < 0.0 {
      // The bounding line misses the disk entirely. Either the disk is on
      // the permitted side of h_i and the constraint is redundant, or no
      // point of the disk satisfies it.
      if normal.dot(h_i.normal_pos()) < 0.0 {
        continue;
      }
      return Err(Error::Infeasible);
    }

    if discriminant == 0.0 {
      if normal.dot(h_i.normal_pos()) < 0.0 {
        continue;
      }
      // The only point of the disk inside h_i is the tangent point, so the
      // whole program collapses onto it. One final sweep decides between
      // that point and infeasibility.
      let tangent = if line.is_vertical() {
        line.point_at_y(0.0)?
      } else {
        line.point_at_x(-b / (2.0 * a))?
      };
      for h in half_planes.iter() {
        if !h.contains(tangent) {
          return Err(Error::Infeasible);
        }
      }
      return Ok(tangent);
    }

    // Two chord endpoints, parameterized along the bounding line: by y for
    // a vertical line, by x otherwise. "left" and "right" are defined with
    // respect to the half-plane's normal, so they are swapped when the
    // normal points down (or left, for a vertical line).
    let (mut left, mut right) = if line.is_vertical() {
      let chord = (max_speed * max_speed
        - line.x_intercept() * line.x_intercept())
      .sqrt();
      (chord, -chord)
    } else {
      (
        (-b - discriminant.sqrt()) / (2.0 * a),
        (-b + discriminant.sqrt()) / (2.0 * a),
      )
    };

    if (line.is_vertical() && normal.x < 0.0)
      || (!line.is_vertical() && normal.y < 0.0)
    {
      std::mem::swap(&mut left, &mut right);
    }

    for h in &half_planes[..i] {
      if line.is_parallel_to(h.bounding_line()) {
        // Parallel constraints either overlap along the whole bounding
        // line or exclude it entirely.
        if normal.dot(h.normal()) > 0.0 || h_i.contains(h.normal_pos()) {
          continue;
        }
        return Err(Error::Infeasible);
      }

      let angle_diff = true_mod(angle_from(normal, h.normal()), 2.0 * PI);
      let intersection = line.intersect(h.bounding_line())?;

      // An angle difference below PI constrains the left end of the chord,
      // above PI the right end. The update only applies when it tightens
      // the interval in the direction given by the normal's sign.
      if angle_diff < PI {
        if line.is_vertical() {
          if (normal.x < 0.0) == (intersection.y > left) {
            left = intersection.y;
          }
        } else if (normal.y < 0.0) == (intersection.x < left) {
          left = intersection.x;
        }
      } else if line.is_vertical() {
        if (normal.x < 0.0) == (intersection.y < right) {
          right = intersection.y;
        }
      } else if (normal.y < 0.0) == (intersection.x > right) {
        right = intersection.x;
      }
    }

    let interval_empty = if line.is_vertical() {
      if normal.x > 0.0 {
        left < right
      } else {
        left > right
      }
    } else if normal.y < 0.0 {
      left < right
    } else {
      left > right
    };
    if interval_empty {
      return Err(Error::Infeasible);
    }

    // The optimum on this line is the projection of the preferred velocity,
    // clamped into the oriented interval.
    let projection = line.projection_of(pref_velocity);

    solution = if line.is_vertical() {
      if (normal.x < 0.0) == (projection.y < left) {
        line.point_at_y(left)?
      } else if (normal.x < 0.0) == (projection.y > right) {
        line.point_at_y(right)?
      } else {
        projection
      }
    } else if (normal.y < 0.0) == (projection.x > left) {
      line.point_at_x(left)?
    } else if (normal.y < 0.0) == (projection.x < right) {
      line.point_at_x(right)?
    } else {
      projection
    };
  }

  Ok(solution)
}

#[cfg(test)]
#[path = "linear_programming_test.rs"]
mod test;

//! Reciprocal collision avoidance for disk-shaped agents.
//!
//! Each simulation step, every agent derives one velocity-space half-plane
//! per nearby agent (the reciprocal half of the truncated velocity
//! obstacle) and then picks the velocity closest to its preferred velocity
//! that satisfies all of them, via a randomized incremental linear program
//! bounded by its speed disk. With every agent running the same rule, each
//! pair shares the avoidance effort evenly and no pair collides within the
//! lookahead horizon.

mod geometry;
mod linear_programming;
mod simulator;

use glam::DVec2;
use thiserror::Error;

use geometry::limit_norm;

pub use geometry::{HalfPlane, Line};
pub use linear_programming::solve_linear_program;
pub use simulator::{Simulator, SimulatorConfig};

/// Everything that can fail in this crate. The geometric variants mark
/// queries a line cannot answer and normally indicate a bug at the call
/// site; `Infeasible` is the one runtime failure, raised when an agent's
/// constraints leave no velocity inside its speed disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
  /// Two parallel lines have no unique intersection point.
  #[error("the lines are parallel and have no unique intersection")]
  LinesParallel,
  /// A vertical line has no unique point at a given x coordinate.
  #[error("the line is vertical and has no unique point at the given x")]
  LineVertical,
  /// A horizontal line has no unique point at a given y coordinate.
  #[error("the line is horizontal and has no unique point at the given y")]
  LineHorizontal,
  /// No velocity inside the speed disk satisfies every half-plane.
  #[error("no velocity inside the speed disk satisfies every half-plane")]
  Infeasible,
}

// A single disk-shaped agent moving toward a fixed destination.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
  // Assigned by the simulator in registration order. Agent equality is id
  // equality, so it is only meaningful between agents registered with the
  // same simulator.
  id: usize,
  position: DVec2,
  destination: DVec2,
  velocity: DVec2,
  // Where the agent would head ignoring everyone else: the destination
  // direction at up to `max_speed`. Kept in sync with `position`.
  pref_velocity: DVec2,
  radius: f64,
  max_speed: f64,
}

impl Agent {
  /// Creates an agent at `position` heading for `destination`, with zero
  /// initial velocity. `radius` must be positive and `max_speed`
  /// non-negative.
  pub fn new(
    position: DVec2,
    destination: DVec2,
    radius: f64,
    max_speed: f64,
  ) -> Agent {
    assert!(radius > 0.0, "radius must be positive, was {}", radius);
    assert!(
      max_speed >= 0.0,
      "max_speed must be non-negative, was {}",
      max_speed
    );

    Agent {
      id: 0,
      position,
      destination,
      velocity: DVec2::ZERO,
      pref_velocity: limit_norm(destination - position, max_speed),
      radius,
      max_speed,
    }
  }

  /// Creates an agent whose destination is its current position, as if it
  /// had already arrived.
  pub fn stationary(position: DVec2, radius: f64, max_speed: f64) -> Agent {
    Agent::new(position, position, radius, max_speed)
  }

  pub fn id(&self) -> usize {
    self.id
  }

  pub fn position(&self) -> DVec2 {
    self.position
  }

  pub fn destination(&self) -> DVec2 {
    self.destination
  }

  pub fn velocity(&self) -> DVec2 {
    self.velocity
  }

  pub fn pref_velocity(&self) -> DVec2 {
    self.pref_velocity
  }

  pub fn radius(&self) -> f64 {
    self.radius
  }

  pub fn max_speed(&self) -> f64 {
    self.max_speed
  }

  /// Whether this agent is within `threshold` of its destination.
  pub fn arrived(&self, threshold: f64) -> bool {
    (self.destination - self.position).length() <= threshold
  }

  pub(crate) fn set_id(&mut self, id: usize) {
    self.id = id;
  }

  // Integrates the current velocity for `delta_t` time and refreshes the
  // preferred velocity for the new position.
  pub(crate) fn advance(&mut self, delta_t: f64) {
    self.position += self.velocity * delta_t;
    self.pref_velocity =
      limit_norm(self.destination - self.position, self.max_speed);
  }

  // Commits a new velocity, limited to the norm of the current preferred
  // velocity (itself at most `max_speed`).
  pub(crate) fn update_velocity(&mut self, velocity: DVec2) {
    self.velocity = limit_norm(velocity, self.pref_velocity.length());
  }

  /// The half-planes this agent must respect for the coming `tau` seconds:
  /// one per other agent within `2 * max_speed` of it, in input order.
  /// Agents farther away cannot close the gap within the horizon under the
  /// symmetric-speed assumption, so no constraint is produced for them.
  pub fn avoidance_halfplanes(
    &self,
    agents: &[Agent],
    tau: f64,
  ) -> Result<Vec<HalfPlane>, Error> {
    let mut half_planes = Vec::new();
    for other in agents {
      if *self != *other
        && self.position.distance(other.position) <= 2.0 * self.max_speed
      {
        half_planes.push(self.halfplane_for_neighbour(other, tau)?);
      }
    }
    Ok(half_planes)
  }

  /// The reciprocal avoidance half-plane induced on this agent by `other`.
  ///
  /// In relative-velocity space the pair's velocity obstacle is a cone from
  /// the origin over the disk of radius `radius + other.radius` centered at
  /// the relative position, truncated at `1 / tau`. The construction finds
  /// the boundary circle of that obstacle nearest the relative velocity,
  /// takes `u` as the shortest translation moving the relative velocity
  /// through it, and grants this agent half of `u`: with `other` running
  /// the same computation the pair splits the correction evenly.
  pub fn halfplane_for_neighbour(
    &self,
    other: &Agent,
    tau: f64,
  ) -> Result<HalfPlane, Error> {
    let velocity_diff = self.velocity - other.velocity;

    let main_circle_center = other.position - self.position;
    let truncation_circle_center = main_circle_center / tau;
    let main_circle_radius = self.radius + other.radius;

    let axis = main_circle_center;

    let half_aperture = (main_circle_radius / axis.length()).asin();

    let left_projection = geometry::project_onto(
      velocity_diff,
      geometry::rotated(axis, half_aperture),
    );
    let right_projection = geometry::project_onto(
      velocity_diff,
      geometry::rotated(axis, -half_aperture),
    );

    let mut closest_circle_center = truncation_circle_center;

    // A relative velocity pointing away from the other agent can only fall
    // in the truncated part of the obstacle, so the cone edges are only
    // examined when it points toward it.
    if velocity_diff.dot(axis) > 0.0 {
      let projection = if left_projection.dot(axis) <= 0.0 {
        right_projection
      } else if right_projection.dot(axis) <= 0.0 {
        left_projection
      } else if left_projection.length() > right_projection.length() {
        left_projection
      } else {
        right_projection
      };

      // The boundary circle tangent to the cone edge at that projection
      // has its center where the perpendicular through the relative
      // velocity meets the cone axis.
      let edge = Line::through_origin(projection);
      let perpendicular = Line::perpendicular_through(&edge, velocity_diff);
      let candidate = perpendicular
        .intersect(&Line::through_origin(main_circle_center))?;

      if candidate.length() > truncation_circle_center.length() {
        closest_circle_center = candidate;
      }
    }

    let closest_circle_radius =
      main_circle_radius * closest_circle_center.length() / axis.length();

    let center_to_velocity = velocity_diff - closest_circle_center;

    // When the relative velocity sits exactly on the chosen center the
    // direction to the border is degenerate; either cone edge projection
    // serves, and the right one is used.
    let center_to_border = if center_to_velocity.length() == 0.0 {
      right_projection - velocity_diff
    } else {
      geometry::normalized_to(center_to_velocity, closest_circle_radius)
    };

    let u = center_to_border - center_to_velocity;

    Ok(HalfPlane::new(self.velocity + u / 2.0, center_to_border))
  }
}

impl PartialEq for Agent {
  fn eq(&self, other: &Agent) -> bool {
    self.id == other.id
  }
}

impl Eq for Agent {}

#[cfg(test)]
#[path = "lib_test.rs"]
mod test;

use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::solve_linear_program;
use crate::geometry::HalfPlane;
use crate::Error;

fn rng(seed: u64) -> StdRng {
  StdRng::seed_from_u64(seed)
}

mod unconstrained_tests {
  use super::*;

  #[test]
  fn no_constraints_return_the_preference() {
    assert_eq!(
      solve_linear_program(&mut [], DVec2::new(0.5, 0.25), 1.0, &mut rng(0)),
      Ok(DVec2::new(0.5, 0.25))
    );
  }

  #[test]
  fn an_overlong_preference_is_clamped_to_the_disk() {
    assert_eq!(
      solve_linear_program(&mut [], DVec2::new(2.0, 0.0), 1.0, &mut rng(0)),
      Ok(DVec2::new(1.0, 0.0))
    );
  }

  #[test]
  fn a_satisfied_constraint_changes_nothing() {
    let mut half_planes =
      [HalfPlane::new(DVec2::new(-2.0, 0.0), DVec2::new(1.0, 0.0))];
    assert_eq!(
      solve_linear_program(
        &mut half_planes,
        DVec2::new(1.0, 0.0),
        1.0,
        &mut rng(0)
      ),
      Ok(DVec2::new(1.0, 0.0))
    );
  }
}

mod single_constraint_tests {
  use super::*;

  #[test]
  fn a_vertical_boundary_attracts_the_preference() {
    let mut half_planes =
      [HalfPlane::new(DVec2::new(0.5, 0.0), DVec2::new(1.0, 0.0))];
    assert_eq!(
      solve_linear_program(&mut half_planes, DVec2::ZERO, 1.0, &mut rng(0)),
      Ok(DVec2::new(0.5, 0.0))
    );
  }

  #[test]
  fn a_left_facing_vertical_boundary_attracts_the_preference() {
    let mut half_planes =
      [HalfPlane::new(DVec2::new(-0.5, 0.0), DVec2::new(-1.0, 0.0))];
    assert_eq!(
      solve_linear_program(&mut half_planes, DVec2::ZERO, 1.0, &mut rng(0)),
      Ok(DVec2::new(-0.5, 0.0))
    );
  }

  #[test]
  fn a_diagonal_boundary_attracts_the_preference() {
    let mut half_planes =
      [HalfPlane::new(DVec2::new(0.5, 0.5), DVec2::new(1.0, 1.0))];
    assert_eq!(
      solve_linear_program(&mut half_planes, DVec2::ZERO, 1.0, &mut rng(0)),
      Ok(DVec2::new(0.5, 0.5))
    );
  }

  #[test]
  fn a_horizontal_boundary_attracts_the_preference() {
    let mut half_planes =
      [HalfPlane::new(DVec2::new(0.0, 0.5), DVec2::new(0.0, 1.0))];
    assert_eq!(
      solve_linear_program(&mut half_planes, DVec2::ZERO, 1.0, &mut rng(0)),
      Ok(DVec2::new(0.0, 0.5))
    );
  }

  #[test]
  fn a_boundary_outside_the_disk_is_infeasible() {
    let mut half_planes =
      [HalfPlane::new(DVec2::new(2.0, 0.0), DVec2::new(1.0, 0.0))];
    assert_eq!(
      solve_linear_program(
        &mut half_planes,
        DVec2::new(1.0, 0.0),
        1.0,
        &mut rng(0)
      ),
      Err(Error::Infeasible)
    );
  }

  #[test]
  fn a_tangent_boundary_forces_the_tangent_point() {
    let mut half_planes =
      [HalfPlane::new(DVec2::new(1.0, 0.0), DVec2::new(1.0, 0.0))];
    assert_eq!(
      solve_linear_program(&mut half_planes, DVec2::ZERO, 1.0, &mut rng(0)),
      Ok(DVec2::new(1.0, 0.0))
    );
  }
}

mod constraint_interaction_tests {
  use super::*;

  #[test]
  fn the_tangent_point_must_satisfy_every_other_constraint() {
    for seed in 0..4 {
      let mut half_planes = [
        HalfPlane::new(DVec2::new(1.0, 0.0), DVec2::new(1.0, 0.0)),
        HalfPlane::new(DVec2::ZERO, DVec2::new(-1.0, 0.0)),
      ];
      assert_eq!(
        solve_linear_program(
          &mut half_planes,
          DVec2::ZERO,
          1.0,
          &mut rng(seed)
        ),
        Err(Error::Infeasible)
      );
    }
  }

  #[test]
  fn opposed_parallel_constraints_are_infeasible() {
    for seed in 0..4 {
      let mut half_planes = [
        HalfPlane::new(DVec2::new(0.5, 0.0), DVec2::new(1.0, 0.0)),
        HalfPlane::new(DVec2::new(-0.5, 0.0), DVec2::new(-1.0, 0.0)),
      ];
      assert_eq!(
        solve_linear_program(
          &mut half_planes,
          DVec2::ZERO,
          1.0,
          &mut rng(seed)
        ),
        Err(Error::Infeasible)
      );
    }
  }

  #[test]
  fn aligned_parallel_constraints_keep_the_tighter_one() {
    for seed in 0..4 {
      let mut half_planes = [
        HalfPlane::new(DVec2::new(0.5, 0.0), DVec2::new(1.0, 0.0)),
        HalfPlane::new(DVec2::new(0.25, 0.0), DVec2::new(1.0, 0.0)),
      ];
      assert_eq!(
        solve_linear_program(
          &mut half_planes,
          DVec2::ZERO,
          1.0,
          &mut rng(seed)
        ),
        Ok(DVec2::new(0.5, 0.0))
      );
    }
  }

  #[test]
  fn crossing_constraints_meet_at_the_corner() {
    // The optimum (0.25, 0.5) is the corner of the two half-planes, and it
    // does not depend on the processing order.
    for seed in 0..8 {
      let mut half_planes = [
        HalfPlane::new(DVec2::new(0.0, 0.5), DVec2::new(0.0, 1.0)),
        HalfPlane::new(DVec2::new(0.25, 0.0), DVec2::new(1.0, 0.0)),
      ];
      assert_eq!(
        solve_linear_program(
          &mut half_planes,
          DVec2::ZERO,
          1.0,
          &mut rng(seed)
        ),
        Ok(DVec2::new(0.25, 0.5))
      );
    }
  }

  #[test]
  fn solutions_satisfy_every_constraint_and_the_disk() {
    for seed in 0..8 {
      let mut half_planes = [
        HalfPlane::new(DVec2::new(0.0, 0.5), DVec2::new(0.0, 1.0)),
        HalfPlane::new(DVec2::new(0.25, 0.0), DVec2::new(1.0, 0.0)),
        HalfPlane::new(DVec2::new(0.9, 0.0), DVec2::new(-1.0, 0.0)),
        HalfPlane::new(DVec2::ZERO, DVec2::new(1.0, 1.0)),
      ];

      let solution = solve_linear_program(
        &mut half_planes,
        DVec2::new(2.0, -1.0),
        1.0,
        &mut rng(seed),
      )
      .unwrap();

      assert!(solution.length() <= 1.0 + 1e-9, "solution: {}", solution);
      for half_plane in &half_planes {
        assert!(
          (solution - half_plane.normal_pos()).dot(half_plane.normal())
            >= -1e-9,
          "solution {} violates the half-plane at {}",
          solution,
          half_plane.normal_pos()
        );
      }
    }
  }
}

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::linear_programming::solve_linear_program;
use crate::{Agent, Error};

/// Parameters shared by every agent in a simulation.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulatorConfig {
  /// The collision lookahead horizon: committed velocities keep every pair
  /// collision-free for at least this long.
  pub tau: f64,
  /// The simulation time step.
  pub delta_t: f64,
  /// The distance to its destination at which an agent counts as arrived.
  pub arrival_threshold: f64,
  /// Seed for the solver's permutations. Equal seeds reproduce a run
  /// exactly; `None` seeds from entropy.
  pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
  fn default() -> SimulatorConfig {
    SimulatorConfig {
      tau: 0.01,
      delta_t: 0.01,
      arrival_threshold: 0.1,
      seed: None,
    }
  }
}

/// Owns a population of agents and steps them toward their destinations.
///
/// The simulator mutates its agents only inside [`Simulator::iteration`]
/// and [`Simulator::move_agents`]; between calls a driver may freely read
/// positions and velocities through [`Simulator::agents`]. No locking is
/// done here, so a driver running the loop on its own thread must
/// synchronize externally if it needs a consistent snapshot mid-step.
pub struct Simulator {
  agents: Vec<Agent>,
  tau: f64,
  delta_t: f64,
  arrival_threshold: f64,
  rng: StdRng,
}

impl Simulator {
  /// Takes ownership of `agents`, assigning ids in sequence order.
  pub fn new(mut agents: Vec<Agent>, config: SimulatorConfig) -> Simulator {
    assert!(config.tau > 0.0, "tau must be positive, was {}", config.tau);
    assert!(
      config.delta_t > 0.0,
      "delta_t must be positive, was {}",
      config.delta_t
    );
    assert!(
      config.arrival_threshold >= 0.0,
      "arrival_threshold must be non-negative, was {}",
      config.arrival_threshold
    );

    for (id, agent) in agents.iter_mut().enumerate() {
      agent.set_id(id);
    }

    let rng = match config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };

    Simulator {
      agents,
      tau: config.tau,
      delta_t: config.delta_t,
      arrival_threshold: config.arrival_threshold,
      rng,
    }
  }

  pub fn agents(&self) -> &[Agent] {
    &self.agents
  }

  pub fn agent(&self, index: usize) -> &Agent {
    &self.agents[index]
  }

  pub fn agent_count(&self) -> usize {
    self.agents.len()
  }

  pub fn tau(&self) -> f64 {
    self.tau
  }

  pub fn delta_t(&self) -> f64 {
    self.delta_t
  }

  pub fn arrival_threshold(&self) -> f64 {
    self.arrival_threshold
  }

  /// Decides a new velocity for every agent and commits them all at once.
  ///
  /// The computation pass reads a fixed snapshot: every agent's constraints
  /// are built from the velocities of the previous step, and nothing is
  /// committed until all agents have been solved. An [`Error::Infeasible`]
  /// from any agent aborts the whole iteration before the commit pass, so
  /// the simulator is never left half-updated.
  pub fn iteration(&mut self) -> Result<(), Error> {
    let tau = self.tau;
    let agents = &self.agents;
    let rng = &mut self.rng;

    let mut new_velocities = Vec::with_capacity(agents.len());
    for agent in agents {
      let mut half_planes = agent.avoidance_halfplanes(agents, tau)?;
      new_velocities.push(solve_linear_program(
        &mut half_planes,
        agent.pref_velocity(),
        agent.max_speed(),
        rng,
      )?);
    }

    for (agent, new_velocity) in self.agents.iter_mut().zip(new_velocities)
    {
      agent.update_velocity(new_velocity);
    }

    Ok(())
  }

  /// Moves every agent along its committed velocity for `delta_t` time,
  /// refreshing its preferred velocity.
  pub fn move_agents(&mut self, delta_t: f64) {
    for agent in &mut self.agents {
      agent.advance(delta_t);
    }
  }

  /// One decision-and-motion cycle: [`Simulator::iteration`] followed by
  /// [`Simulator::move_agents`] with the configured time step. Drivers that
  /// render between the two phases call them separately instead.
  pub fn step(&mut self) -> Result<(), Error> {
    self.iteration()?;
    self.move_agents(self.delta_t);
    Ok(())
  }

  /// Steps until every agent has arrived, up to `max_iterations` steps.
  /// Returns the number of steps taken, or `None` when the budget ran out
  /// first.
  pub fn run(&mut self, max_iterations: usize) -> Result<Option<usize>, Error> {
    for performed in 0..max_iterations {
      if self.converged() {
        return Ok(Some(performed));
      }
      self.step()?;
    }
    Ok(if self.converged() { Some(max_iterations) } else { None })
  }

  /// Whether every agent is within the arrival threshold of its
  /// destination.
  pub fn converged(&self) -> bool {
    self.agents.iter().all(|agent| agent.arrived(self.arrival_threshold))
  }

  /// Teardown hook for drivers that want a place to release resources when
  /// a run ends. The simulator itself has nothing to release.
  pub fn finalize(&mut self) {}
}

#[cfg(test)]
#[path = "simulator_test.rs"]
mod test;

use ndarray::Array2;
use std::mem;

use super::{ring_field, stable_dt, step_into, Config, ConfigError};

/// Where a [`Simulation`] is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Done,
}

/// Owned FTCS integration of the heat equation on the unit square.
///
/// Holds the current field and a scratch buffer of the same shape; each
/// step writes the scratch buffer from the current field and swaps them,
/// so no step allocates.
pub struct Simulation {
    cur: Array2<f64>,
    next: Array2<f64>,
    config: Config,
    dt: f64,
    steps_completed: usize,
    phase: Phase,
}

impl Simulation {
    /// Validate `config`, derive the time step from the stability bound
    /// and set up the annulus initial condition.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let (nx, ny) = config.validate()?;

        // Zero diffusivity leaves the bound unbounded and the field
        // frozen; pin dt to zero so a * dt stays finite.
        let dt = if config.diffusivity > 0.0 {
            config.dt_scale * stable_dt(config.dx, config.dy, config.diffusivity)
        } else {
            0.0
        };

        let cur = ring_field(nx, ny, config.dx, config.dy);
        let next = cur.clone();

        Ok(Self {
            cur,
            next,
            config,
            dt,
            steps_completed: 0,
            phase: Phase::NotStarted,
        })
    }

    /// Apply one FTCS step and swap the buffers.
    ///
    /// Returns `false` without touching the field once all requested
    /// steps have run; the phase is `Done` from then on. A run with
    /// `timesteps == 0` goes straight to `Done`.
    pub fn advance(&mut self) -> bool {
        if self.steps_completed == self.config.timesteps {
            self.phase = Phase::Done;
            return false;
        }

        self.phase = Phase::Running;

        step_into(
            &mut self.next,
            &self.cur,
            self.config.diffusivity,
            self.dt,
            self.config.dx,
            self.config.dy,
        );
        mem::swap(&mut self.cur, &mut self.next);
        self.steps_completed += 1;

        if self.steps_completed == self.config.timesteps {
            self.phase = Phase::Done;
        }

        true
    }

    /// Run to completion and return the final field.
    pub fn run(&mut self) -> &Array2<f64> {
        while self.advance() {}
        &self.cur
    }

    /// Run to completion, handing the field and the 1-based step index
    /// `m` to `observe` at the start of each step.
    ///
    /// The observer sees the result of step `m - 1` (the initial
    /// condition for `m == 1`), never a partially updated grid.
    pub fn run_with<F>(&mut self, mut observe: F) -> &Array2<f64>
    where
        F: FnMut(&Array2<f64>, usize),
    {
        while self.steps_completed < self.config.timesteps {
            observe(&self.cur, self.steps_completed + 1);
            self.advance();
        }

        self.phase = Phase::Done;
        &self.cur
    }

    /// The field after the most recently completed step.
    pub fn field(&self) -> &Array2<f64> {
        &self.cur
    }

    pub fn dim(&self) -> (usize, usize) {
        self.cur.dim()
    }

    /// Time step derived at construction; never exceeds the stability
    /// bound.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of completed steps, between 0 and `timesteps`.
    pub fn steps_completed(&self) -> usize {
        self.steps_completed
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::d2::step;

    fn config() -> Config {
        Config::new(0.1, 0.1, 0.5, 5)
    }

    #[test]
    fn test_phase_transitions() {
        let mut sim = Simulation::new(config()).unwrap();
        assert_eq!(sim.phase(), Phase::NotStarted);

        assert!(sim.advance());
        assert_eq!(sim.phase(), Phase::Running);

        sim.run();
        assert_eq!(sim.phase(), Phase::Done);
        assert_eq!(sim.steps_completed(), 5);

        // Further calls are no-ops.
        assert!(!sim.advance());
        assert_eq!(sim.steps_completed(), 5);
    }

    #[test]
    fn test_zero_timesteps_leaves_initial_condition() {
        let mut sim = Simulation::new(Config::new(0.1, 0.1, 0.5, 0)).unwrap();
        let initial = ring_field(10, 10, 0.1, 0.1);

        assert_eq!(sim.run(), &initial);
        assert_eq!(sim.phase(), Phase::Done);
        assert_eq!(sim.steps_completed(), 0);
    }

    #[test]
    fn test_run_matches_repeated_step() {
        // The driver is nothing but k applications of the pure stepper.
        let mut sim = Simulation::new(config()).unwrap();
        let dt = sim.dt();

        let mut reference = ring_field(10, 10, 0.1, 0.1);
        for _ in 0..5 {
            reference = step(&reference, 0.5, dt, 0.1, 0.1);
        }

        assert_eq!(sim.run(), &reference);
    }

    #[test]
    fn test_observer_sees_start_of_step_field() {
        let mut sim = Simulation::new(Config::new(0.1, 0.1, 0.5, 3)).unwrap();
        let dt = sim.dt();

        let mut frames = Vec::new();
        sim.run_with(|t, m| frames.push((m, t.clone())));

        assert_eq!(frames.len(), 3);

        let mut expected = ring_field(10, 10, 0.1, 0.1);
        for (m, frame) in frames {
            assert_eq!(frame, expected, "frame at step {}", m);
            expected = step(&expected, 0.5, dt, 0.1, 0.1);
        }

        // After the run the field is one step ahead of the last frame.
        assert_eq!(sim.field(), &expected);
    }

    #[test]
    fn test_observer_step_indices_are_one_based() {
        let mut sim = Simulation::new(config()).unwrap();

        let mut seen = Vec::new();
        sim.run_with(|_, m| seen.push(m));

        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_run_with_zero_timesteps_never_observes() {
        let mut sim = Simulation::new(Config::new(0.1, 0.1, 0.5, 0)).unwrap();

        let mut calls = 0;
        sim.run_with(|_, _| calls += 1);

        assert_eq!(calls, 0);
        assert_eq!(sim.phase(), Phase::Done);
    }

    #[test]
    fn test_dt_respects_scale() {
        let sim = Simulation::new(config()).unwrap();
        let half = Simulation::new(config().dt_scale(0.5)).unwrap();

        assert_eq!(sim.dt(), stable_dt(0.1, 0.1, 0.5));
        assert_eq!(half.dt(), 0.5 * stable_dt(0.1, 0.1, 0.5));
        assert!(half.dt() <= stable_dt(0.1, 0.1, 0.5));
    }

    #[test]
    fn test_zero_diffusivity_freezes_field() {
        let mut sim = Simulation::new(Config::new(0.1, 0.1, 0.0, 10)).unwrap();
        let initial = ring_field(10, 10, 0.1, 0.1);

        assert_eq!(sim.dt(), 0.0);
        assert_eq!(sim.run(), &initial);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(Simulation::new(Config::new(-0.1, 0.1, 0.5, 10)).is_err());
        assert!(Simulation::new(Config::new(0.4, 0.4, 0.5, 10)).is_err());
    }
}

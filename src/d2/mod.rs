use cgmath::{vec2, MetricSpace};
use ndarray::{Array, Array2};
use std::error::Error;
use std::fmt;

mod sim;

pub use sim::{Phase, Simulation};

/// Maximum stable explicit time step for diffusivity `a` on a grid with
/// spacings `dx`, `dy`.
///
/// Forward-Euler diffusion diverges for any larger step; `a == 0.0` leaves
/// the bound unbounded (`+inf`).
pub fn stable_dt(dx: f64, dy: f64, a: f64) -> f64 {
    let dx2 = dx * dx;
    let dy2 = dy * dy;

    dx2 * dy2 / (2.0 * a * (dx2 + dy2))
}

/// Binary annulus centred on (0.5, 0.5): 1.0 where the squared distance to
/// the centre lies in [0.05, 0.1], 0.0 elsewhere (including the whole
/// boundary ring for any resolution that resolves the annulus).
pub fn ring_field(nx: usize, ny: usize, dx: f64, dy: f64) -> Array2<f64> {
    let center = vec2(0.5, 0.5);

    Array::from_shape_fn((nx, ny), |(i, j)| {
        let r2 = vec2(i as f64 * dx, j as f64 * dy).distance2(center);

        if 0.05 <= r2 && r2 <= 0.1 {
            1.0
        } else {
            0.0
        }
    })
}

/// Advance `t` by one FTCS step and return the next field.
///
/// `t` is left untouched, so a renderer still holding it keeps seeing the
/// pre-step frame.
pub fn step(t: &Array2<f64>, a: f64, dt: f64, dx: f64, dy: f64) -> Array2<f64> {
    let mut next = Array::zeros(t.dim());
    step_into(&mut next, t, a, dt, dx, dy);
    next
}

/// FTCS update of `next` from `cur`: interior cells get the 5-point
/// Laplacian, the outermost ring is copied through unchanged (Dirichlet).
///
/// All reads come from `cur`, so no cell ever sees an already-updated
/// neighbour within the same step.
pub fn step_into(next: &mut Array2<f64>, cur: &Array2<f64>, a: f64, dt: f64, dx: f64, dy: f64) {
    assert_eq!(next.dim(), cur.dim());

    let (w, h) = cur.dim();

    assert!(w >= 3);
    assert!(h >= 3);

    let rx = a * dt / (dx * dx);
    let ry = a * dt / (dy * dy);

    next.indexed_iter_mut().for_each(|((i, j), e)| {
        *e = if i == 0 || i + 1 == w || j == 0 || j + 1 == h {
            cur[[i, j]]
        } else {
            cur[[i, j]]
                + rx * (cur[[i + 1, j]] - 2.0 * cur[[i, j]] + cur[[i - 1, j]])
                + ry * (cur[[i, j + 1]] - 2.0 * cur[[i, j]] + cur[[i, j - 1]])
        };
    })
}

/// Run parameters for a [`Simulation`] on the unit square.
///
/// Grid dimensions are derived as `nx = floor(1/dx)`, `ny = floor(1/dy)`;
/// the time step is derived from [`stable_dt`] and is not configurable
/// directly.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub dx: f64,
    pub dy: f64,
    pub diffusivity: f64,
    pub timesteps: usize,
    /// Fraction of the stability bound to run at, in (0, 1]. Running at
    /// the bound itself keeps visible high-frequency noise; smaller values
    /// trade extra steps for smoothness.
    pub dt_scale: f64,
}

impl Config {
    pub fn new(dx: f64, dy: f64, diffusivity: f64, timesteps: usize) -> Self {
        Self {
            dx,
            dy,
            diffusivity,
            timesteps,
            dt_scale: 1.0,
        }
    }

    pub fn dt_scale(mut self, dt_scale: f64) -> Self {
        self.dt_scale = dt_scale;
        self
    }

    /// Check every parameter and derive the grid dimensions.
    pub(crate) fn validate(&self) -> Result<(usize, usize), ConfigError> {
        if !(self.dx.is_finite() && self.dx > 0.0) {
            return Err(ConfigError::NonPositiveSpacing("dx", self.dx));
        }

        if !(self.dy.is_finite() && self.dy > 0.0) {
            return Err(ConfigError::NonPositiveSpacing("dy", self.dy));
        }

        if !(self.diffusivity.is_finite() && self.diffusivity >= 0.0) {
            return Err(ConfigError::NegativeDiffusivity(self.diffusivity));
        }

        if !(self.dt_scale.is_finite() && self.dt_scale > 0.0 && self.dt_scale <= 1.0) {
            return Err(ConfigError::DtScaleOutOfRange(self.dt_scale));
        }

        let nx = (1.0 / self.dx).floor() as usize;
        let ny = (1.0 / self.dy).floor() as usize;

        // The stencil needs at least one interior cell in each direction.
        if nx < 3 || ny < 3 {
            return Err(ConfigError::GridTooSmall { nx, ny });
        }

        Ok((nx, ny))
    }
}

/// Rejected [`Config`]. The stepper itself is never reached with a
/// malformed grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    NonPositiveSpacing(&'static str, f64),
    NegativeDiffusivity(f64),
    DtScaleOutOfRange(f64),
    GridTooSmall { nx: usize, ny: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveSpacing(axis, value) => {
                write!(f, "{} must be a positive finite number, got {}", axis, value)
            }
            ConfigError::NegativeDiffusivity(value) => {
                write!(f, "diffusivity must be finite and >= 0, got {}", value)
            }
            ConfigError::DtScaleOutOfRange(value) => {
                write!(f, "dt_scale must lie in (0, 1], got {}", value)
            }
            ConfigError::GridTooSmall { nx, ny } => {
                write!(f, "grid {}x{} has no interior cells, need at least 3x3", nx, ny)
            }
        }
    }
}

impl Error for ConfigError {}

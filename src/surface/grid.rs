//! Parametric surface sampling

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::rasterizer::Vec3;

/// Upper bound of the u parameter (two turns of the helix)
pub const U_MAX: f32 = 4.0 * PI;
/// Upper bound of the v parameter (one turn around the tube)
pub const V_MAX: f32 = 2.0 * PI;

/// Shape and sampling density of the helical tube
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceParams {
    /// Helix radius, also the rise per radian of u
    pub alpha: f32,
    /// Tube radius
    pub beta: f32,
    pub u_steps: usize,
    pub v_steps: usize,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            alpha: 2.0,
            beta: 0.5,
            u_steps: 50,
            v_steps: 50,
        }
    }
}

impl SurfaceParams {
    pub fn validate(&self) -> Result<()> {
        if self.u_steps < 2 {
            return Err(ViewerError::invalid("u_steps", self.u_steps as f64, "at least 2"));
        }
        if self.v_steps < 2 {
            return Err(ViewerError::invalid("v_steps", self.v_steps as f64, "at least 2"));
        }
        if !self.alpha.is_finite() {
            return Err(ViewerError::invalid("alpha", self.alpha, "a finite value"));
        }
        if !self.beta.is_finite() {
            return Err(ViewerError::invalid("beta", self.beta, "a finite value"));
        }
        Ok(())
    }

    /// Surface point for parameters (u, v)
    pub fn point(&self, u: f32, v: f32) -> Vec3 {
        let ring = self.alpha + self.beta * v.cos();
        Vec3::new(
            ring * u.cos(),
            ring * u.sin(),
            self.beta * v.sin() + self.alpha * u,
        )
    }
}

/// Sampled surface points, rows along u and columns along v
#[derive(Debug, Clone)]
pub struct SurfaceGrid {
    points: Vec<Vec3>,
    u_steps: usize,
    v_steps: usize,
}

impl SurfaceGrid {
    pub fn u_steps(&self) -> usize {
        self.u_steps
    }

    pub fn v_steps(&self) -> usize {
        self.v_steps
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[cfg(test)]
    pub fn get(&self, u_index: usize, v_index: usize) -> Option<Vec3> {
        if u_index < self.u_steps && v_index < self.v_steps {
            Some(self.points[u_index * self.v_steps + v_index])
        } else {
            None
        }
    }

    /// Row of points sharing one u sample
    pub fn row(&self, u_index: usize) -> &[Vec3] {
        let start = u_index * self.v_steps;
        &self.points[start..start + self.v_steps]
    }
}

/// `steps` evenly spaced samples from 0 to `bound`, both ends included
fn linspace(bound: f32, steps: usize) -> impl Iterator<Item = f32> {
    let last = (steps - 1) as f32;
    (0..steps).map(move |k| bound * (k as f32 / last))
}

/// Sample the surface on a `u_steps x v_steps` grid
pub fn generate(params: &SurfaceParams) -> Result<SurfaceGrid> {
    params.validate()?;

    let mut points = Vec::with_capacity(params.u_steps * params.v_steps);
    for u in linspace(U_MAX, params.u_steps) {
        for v in linspace(V_MAX, params.v_steps) {
            points.push(params.point(u, v));
        }
    }

    Ok(SurfaceGrid {
        points,
        u_steps: params.u_steps,
        v_steps: params.v_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(u_steps: usize, v_steps: usize) -> SurfaceParams {
        SurfaceParams {
            alpha: 2.0,
            beta: 0.5,
            u_steps,
            v_steps,
        }
    }

    #[test]
    fn test_grid_size() {
        for (u, v) in [(2, 2), (3, 7), (50, 50)] {
            let grid = generate(&params(u, v)).unwrap();
            assert_eq!(grid.len(), u * v);
            assert_eq!(grid.u_steps(), u);
            assert_eq!(grid.v_steps(), v);
        }
    }

    #[test]
    fn test_minimal_grid_corners() {
        let grid = generate(&params(2, 2)).unwrap();
        let origin = grid.get(0, 0).unwrap();
        assert_eq!(origin, Vec3::new(2.5, 0.0, 0.0));

        // u = 4π: back on the x axis, risen by alpha * 4π
        let top = grid.get(1, 0).unwrap();
        assert_relative_eq!(top.x, 2.5, epsilon = 1e-5);
        assert_relative_eq!(top.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(top.z, 2.0 * U_MAX, epsilon = 1e-4);

        // v = 2π closes the tube onto its first sample
        let closed = grid.get(0, 1).unwrap();
        assert_relative_eq!(closed.x, 2.5, epsilon = 1e-5);
        assert_relative_eq!(closed.z, 0.0, epsilon = 1e-5);
        assert!(grid.get(2, 0).is_none());
    }

    #[test]
    fn test_linspace_endpoints() {
        let samples: Vec<f32> = linspace(U_MAX, 5).collect();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[4], U_MAX);
        assert_relative_eq!(samples[2], 2.0 * PI, epsilon = 1e-6);
    }

    #[test]
    fn test_rows_follow_u() {
        let p = params(4, 3);
        let grid = generate(&p).unwrap();
        let u1 = U_MAX / 3.0;
        let expected = p.point(u1, PI);
        let actual = grid.row(1)[1];
        assert_relative_eq!(actual.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(actual.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(actual.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn test_too_few_steps_rejected() {
        assert!(generate(&params(1, 50)).is_err());
        assert!(generate(&params(50, 1)).is_err());
        assert!(generate(&params(0, 0)).is_err());
    }
}

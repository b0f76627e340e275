//! Grid to triangle list

use super::grid::SurfaceGrid;
use crate::rasterizer::Triangle;

/// Split every grid cell into two triangles.
///
/// For a cell with corners `p1 = (i, j)`, `p2 = (i+1, j)`, `p3 = (i, j+1)`
/// and `p4 = (i+1, j+1)` this emits `(p1, p2, p3)` then `(p2, p4, p3)`.
/// The last row and column are not stitched back to the first.
pub fn build_triangles(grid: SurfaceGrid) -> Vec<Triangle> {
    let rows = grid.u_steps();
    let cols = grid.v_steps();
    let mut triangles = Vec::with_capacity(2 * (rows - 1) * (cols - 1));

    for i in 0..rows - 1 {
        let (here, next) = (grid.row(i), grid.row(i + 1));
        for j in 0..cols - 1 {
            let p1 = here[j];
            let p2 = next[j];
            let p3 = here[j + 1];
            let p4 = next[j + 1];
            triangles.push(Triangle::new(p1, p2, p3));
            triangles.push(Triangle::new(p2, p4, p3));
        }
    }

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{generate, SurfaceParams};

    fn grid(u_steps: usize, v_steps: usize) -> SurfaceGrid {
        generate(&SurfaceParams {
            alpha: 2.0,
            beta: 0.5,
            u_steps,
            v_steps,
        })
        .unwrap()
    }

    #[test]
    fn test_triangle_count() {
        for (u, v) in [(2, 2), (2, 5), (6, 3), (50, 50)] {
            let tris = build_triangles(grid(u, v));
            assert_eq!(tris.len(), 2 * (u - 1) * (v - 1));
        }
    }

    #[test]
    fn test_winding_order() {
        let g = grid(3, 3);
        let p = |i, j| g.get(i, j).unwrap();
        let (p1, p2, p3, p4) = (p(1, 1), p(2, 1), p(1, 2), p(2, 2));

        let tris = build_triangles(g.clone());
        // Cell (1, 1) is the fourth cell visited, row-major
        assert_eq!(tris[6], Triangle::new(p1, p2, p3));
        assert_eq!(tris[7], Triangle::new(p2, p4, p3));
    }

    #[test]
    fn test_minimal_grid_gives_two_triangles() {
        let tris = build_triangles(grid(2, 2));
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[0].vertices[0], crate::rasterizer::Vec3::new(2.5, 0.0, 0.0));
    }
}
